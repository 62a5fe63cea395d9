use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One persisted observation of a pair's median price.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RateRecord {
    pub from_currency: String,
    pub to_currency: String,
    pub amount: String,
    pub payment_method_id: String,
    pub median_price: f64,
    pub observed_at: DateTime<Utc>,
}
