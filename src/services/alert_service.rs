//! Threshold alerts: pending until the live rate for their pair first
//! exceeds the target, then triggered forever.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{CreateCurrencyAlert, CurrencyAlert, UpdateCurrencyAlert};
use crate::services::rate_service::RateService;

#[derive(Clone)]
pub struct AlertService {
    db_pool: PgPool,
    rates: RateService,
}

/// Trigger condition: current rate strictly greater than the target.
pub fn should_trigger(current_rate: f64, target_rate: f64) -> bool {
    current_rate > target_rate
}

/// Owner-scoped update. Touches pair and target only; the trigger
/// transition is one-way, so `triggered`/`triggered_at` must never appear
/// in this SET clause.
const UPDATE_ALERT_SQL: &str = r#"
    UPDATE currency_alerts
    SET pair = $1, target_rate = $2
    WHERE id = $3 AND user_id = $4
    RETURNING id, user_id, pair, target_rate, triggered, triggered_at, created_at
"#;

impl AlertService {
    pub fn new(db_pool: PgPool) -> Self {
        Self {
            rates: RateService::new(db_pool.clone()),
            db_pool,
        }
    }

    /// The pair must exist in the rate store at creation time. It is
    /// stored denormalized afterwards, so the alert outlives the rate row.
    pub async fn create_alert(
        &self,
        user_id: Uuid,
        create: &CreateCurrencyAlert,
    ) -> Result<CurrencyAlert, AppError> {
        if self.rates.find_by_pair(&create.pair).await?.is_none() {
            return Err(AppError::ValidationError(format!(
                "Currency pair does not exist: {}",
                create.pair
            )));
        }

        let alert = sqlx::query_as::<_, CurrencyAlert>(
            r#"
            INSERT INTO currency_alerts (user_id, pair, target_rate)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, pair, target_rate, triggered, triggered_at, created_at
            "#,
        )
        .bind(user_id)
        .bind(&create.pair)
        .bind(create.target_rate)
        .fetch_one(&self.db_pool)
        .await?;

        info!("Created alert {} on {} for user {}", alert.id, alert.pair, user_id);
        Ok(alert)
    }

    pub async fn list_alerts(&self, user_id: Uuid) -> Result<Vec<CurrencyAlert>, AppError> {
        let alerts = sqlx::query_as::<_, CurrencyAlert>(
            r#"
            SELECT id, user_id, pair, target_rate, triggered, triggered_at, created_at
            FROM currency_alerts
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(alerts)
    }

    /// Scoped strictly to the owner; someone else's alert looks absent.
    pub async fn get_alert(
        &self,
        alert_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<CurrencyAlert>, AppError> {
        let alert = sqlx::query_as::<_, CurrencyAlert>(
            r#"
            SELECT id, user_id, pair, target_rate, triggered, triggered_at, created_at
            FROM currency_alerts
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(alert_id)
        .bind(user_id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(alert)
    }

    /// Updates pair and target only. Triggered state is left alone even
    /// when the target moves; the pair is not re-validated here.
    pub async fn update_alert(
        &self,
        alert_id: Uuid,
        user_id: Uuid,
        update: &UpdateCurrencyAlert,
    ) -> Result<CurrencyAlert, AppError> {
        let alert = sqlx::query_as::<_, CurrencyAlert>(UPDATE_ALERT_SQL)
            .bind(&update.pair)
            .bind(update.target_rate)
            .bind(alert_id)
            .bind(user_id)
            .fetch_optional(&self.db_pool)
            .await?;

        alert.ok_or_else(|| AppError::NotFound(format!("Alert not found: {}", alert_id)))
    }

    pub async fn delete_alert(&self, alert_id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM currency_alerts WHERE id = $1 AND user_id = $2")
            .bind(alert_id)
            .bind(user_id)
            .execute(&self.db_pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// One evaluation pass over every pending alert. Each transition is a
    /// single conditional UPDATE, so a rerun (or a concurrent pass) can
    /// never move `triggered_at` once set, and alerts sharing a pair are
    /// evaluated independently. Returns how many alerts fired.
    pub async fn check_and_trigger_alerts(&self) -> Result<u64, AppError> {
        let pending = sqlx::query_as::<_, CurrencyAlert>(
            r#"
            SELECT id, user_id, pair, target_rate, triggered, triggered_at, created_at
            FROM currency_alerts
            WHERE triggered = FALSE
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.db_pool)
        .await?;

        let mut fired = 0u64;

        for alert in pending {
            let Some(rate) = self.rates.find_by_pair(&alert.pair).await? else {
                // pair was deleted after the alert was created; skip
                continue;
            };

            if !should_trigger(rate.rate, alert.target_rate) {
                continue;
            }

            let result = sqlx::query(
                r#"
                UPDATE currency_alerts
                SET triggered = TRUE, triggered_at = NOW()
                WHERE id = $1 AND triggered = FALSE
                "#,
            )
            .bind(alert.id)
            .execute(&self.db_pool)
            .await?;

            if result.rows_affected() > 0 {
                info!(
                    "Alert {} triggered: {} at {} crossed target {}",
                    alert.id, alert.pair, rate.rate, alert.target_rate
                );
                fired += 1;
            }
        }

        Ok(fired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_is_strictly_greater() {
        assert!(should_trigger(0.92, 0.85));
        assert!(!should_trigger(0.85, 0.85));
        assert!(!should_trigger(0.80, 0.85));
    }

    #[test]
    fn test_trigger_near_equality() {
        assert!(should_trigger(0.85 + f64::EPSILON, 0.85));
    }

    #[test]
    fn test_update_statement_leaves_trigger_fields_alone() {
        // the one-way transition: an update can move pair and target but
        // must never write the trigger columns
        let set_clause = UPDATE_ALERT_SQL
            .split("WHERE")
            .next()
            .expect("statement has a WHERE clause");

        assert!(set_clause.contains("pair"));
        assert!(set_clause.contains("target_rate"));
        assert!(!set_clause.contains("triggered"));
        assert!(!set_clause.contains("triggered_at"));
    }
}
