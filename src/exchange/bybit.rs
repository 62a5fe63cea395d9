use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::exchange::{ExchangeConfig, ListingSource, PairConfig};
use crate::types::Listing;

const ONLINE_ITEMS_PATH: &str = "/fiat/otc/item/online";

/// Client for the exchange's fiat OTC listing endpoint.
pub struct BybitOtcClient {
    client: Client,
    base_url: String,
    page_size: u32,
}

impl BybitOtcClient {
    pub fn new(config: &ExchangeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent("RateInfra/0.1")
            .build()?;

        Ok(BybitOtcClient {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            page_size: config.page_size,
        })
    }
}

#[async_trait]
impl ListingSource for BybitOtcClient {
    async fn fetch_listings(&self, pair: &PairConfig) -> Result<Vec<Listing>> {
        let request = OnlineItemsRequest {
            token_id: &pair.to_currency,
            currency_id: &pair.from_currency,
            payment: vec![pair.payment_method_id.as_str()],
            side: pair.side.wire_code(),
            size: self.page_size.to_string(),
            page: "1",
            amount: &pair.amount,
            va_maker: false,
            bulk_maker: false,
            can_trade: true,
            verification_filter: 0,
            sort_type: "TRADE_PRICE",
            payment_period: Vec::new(),
            item_region: 1,
        };

        let url = format!("{}{}", self.base_url, ONLINE_ITEMS_PATH);
        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        let parsed: OnlineItemsResponse = serde_json::from_slice(&body)
            .map_err(|e| Error::DeserializationError(e.to_string()))?;

        if parsed.ret_code != 0 {
            return Err(Error::ApiError {
                code: parsed.ret_code,
                message: parsed.ret_msg,
            });
        }

        Ok(parsed.result.map(|book| book.items).unwrap_or_default())
    }

    fn source_id(&self) -> &str {
        "bybit-otc"
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OnlineItemsRequest<'a> {
    /// Asset being traded, e.g. "USDT".
    token_id: &'a str,
    /// Fiat currency it trades against, e.g. "RUB".
    currency_id: &'a str,
    payment: Vec<&'a str>,
    side: &'static str,
    size: String,
    page: &'static str,
    amount: &'a str,
    va_maker: bool,
    bulk_maker: bool,
    can_trade: bool,
    verification_filter: i32,
    sort_type: &'static str,
    payment_period: Vec<String>,
    item_region: i32,
}

#[derive(Deserialize)]
struct OnlineItemsResponse {
    #[serde(default)]
    ret_code: i64,
    #[serde(default)]
    ret_msg: String,
    result: Option<ListingBook>,
}

#[derive(Deserialize)]
struct ListingBook {
    #[serde(default)]
    items: Vec<Listing>,
}
