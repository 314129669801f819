use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One historical snapshot of a rate's value. Append-only: written when a
/// rate value changes (manual edit or sync), never updated afterwards.
/// `rate` is a copy of the value at observation time, not a live reference.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RateObservation {
    pub id: Uuid,
    pub currency_rate_id: Uuid,
    pub rate: f64,
    pub observed_at: DateTime<Utc>,
}
