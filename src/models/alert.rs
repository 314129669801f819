use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A user-defined price alert. `pair` is stored as a plain string on
/// purpose: the pair must exist in the rate store when the alert is
/// created, but the alert survives later deletion of the rate row.
///
/// Invariant: `triggered_at` is non-null iff `triggered` is true. The
/// transition to triggered is one-way; nothing ever un-triggers an alert.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CurrencyAlert {
    pub id: Uuid,
    pub user_id: Uuid,
    pub pair: String,
    pub target_rate: f64,
    pub triggered: bool,
    pub triggered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl CurrencyAlert {
    pub fn is_pending(&self) -> bool {
        !self.triggered
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCurrencyAlert {
    pub pair: String,
    pub target_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCurrencyAlert {
    pub pair: String,
    pub target_rate: f64,
}
