pub mod bybit;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::Listing;

#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetches the current page of online listings for one pair,
    /// best price first.
    async fn fetch_listings(&self, pair: &PairConfig) -> Result<Vec<Listing>>;
    fn source_id(&self) -> &str;
}

/// Which side of the book to read. Wire codes follow the exchange:
/// buying the asset is "0", selling it is "1".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn wire_code(&self) -> &'static str {
        match self {
            Side::Buy => "0",
            Side::Sell => "1",
        }
    }
}

/// One currency pair to sample, as configured.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PairConfig {
    pub from_currency: String,
    pub to_currency: String,
    pub side: Side,
    /// Trade amount used to filter listings, in `from_currency` units.
    pub amount: String,
    pub payment_method_id: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ExchangeConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    /// Listings requested per page. The sample window can never see
    /// past this.
    pub page_size: u32,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        ExchangeConfig {
            base_url: "https://api2.bybit.com".to_string(),
            request_timeout_secs: 10,
            page_size: 10,
        }
    }
}
