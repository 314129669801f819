use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One entry in the append-only conversion ledger. `conversion_rate` is a
/// snapshot of the rate used at conversion time and is never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CurrencyConversion {
    pub id: Uuid,
    pub user_id: Uuid,
    pub from_currency: String,
    pub to_currency: String,
    pub amount: f64,
    pub converted_amount: f64,
    pub conversion_rate: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub from_currency: String,
    pub to_currency: String,
    pub amount: f64,
}
