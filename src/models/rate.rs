use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One tracked exchange rate. At most one row per pair; `rate` is
/// quote-per-base and `last_updated` is bumped on every mutation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CurrencyRate {
    pub id: Uuid,
    pub pair: String,
    pub rate: f64,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCurrencyRate {
    pub pair: String,
    pub rate: f64,
}
