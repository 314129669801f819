//! Rate store: owns `CurrencyRate` rows and enforces pair uniqueness.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{validate_pair, CreateCurrencyRate, CurrencyRate};

#[derive(Clone)]
pub struct RateService {
    db_pool: PgPool,
}

/// Result of an idempotent pair lookup for downstream callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairCheck {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pair: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkRateError {
    pub pair: String,
    pub error: String,
}

/// Bulk creation commits partially: successes and per-entry errors are
/// both returned, never an all-or-nothing transaction.
#[derive(Debug, Clone, Serialize)]
pub struct BulkCreateResult {
    pub created: Vec<CurrencyRate>,
    pub errors: Vec<BulkRateError>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PairSummary {
    pub id: Uuid,
    pub pair: String,
}

/// Batch-local validation for one bulk entry: pair shape, whitelist, and
/// in-batch duplicates (first occurrence wins). Store-existence is checked
/// separately against the database.
fn validate_bulk_entry(pair: &str, seen: &mut HashSet<String>) -> Result<(), String> {
    if seen.contains(pair) {
        return Err(format!("Duplicate currency pair: {}", pair));
    }
    seen.insert(pair.to_string());

    validate_pair(pair).map(|_| ()).map_err(|e| match e {
        AppError::ValidationError(msg) => msg,
        other => other.to_string(),
    })
}

impl RateService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    pub async fn create_rate(&self, create: &CreateCurrencyRate) -> Result<CurrencyRate, AppError> {
        validate_pair(&create.pair)?;

        if self.find_by_pair(&create.pair).await?.is_some() {
            return Err(AppError::ValidationError(format!(
                "Currency pair already exists: {}",
                create.pair
            )));
        }

        let rate = sqlx::query_as::<_, CurrencyRate>(
            r#"
            INSERT INTO currency_rates (pair, rate, last_updated)
            VALUES ($1, $2, NOW())
            RETURNING id, pair, rate, last_updated
            "#,
        )
        .bind(&create.pair)
        .bind(create.rate)
        .fetch_one(&self.db_pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => AppError::ValidationError(format!(
                "Currency pair already exists: {}",
                create.pair
            )),
            _ => AppError::DatabaseError(e.to_string()),
        })?;

        info!("Created currency rate {} ({})", rate.pair, rate.id);
        Ok(rate)
    }

    /// Processes every entry independently; one bad entry never aborts the
    /// batch.
    pub async fn bulk_create(
        &self,
        entries: Vec<CreateCurrencyRate>,
    ) -> Result<BulkCreateResult, AppError> {
        let mut created = Vec::new();
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for entry in entries {
            if let Err(message) = validate_bulk_entry(&entry.pair, &mut seen) {
                errors.push(BulkRateError {
                    pair: entry.pair,
                    error: message,
                });
                continue;
            }

            match self.create_rate(&entry).await {
                Ok(rate) => created.push(rate),
                Err(AppError::ValidationError(message)) => errors.push(BulkRateError {
                    pair: entry.pair,
                    error: message,
                }),
                Err(other) => return Err(other),
            }
        }

        info!(
            "Bulk rate creation: {} created, {} rejected",
            created.len(),
            errors.len()
        );
        Ok(BulkCreateResult { created, errors })
    }

    /// Deletes every rate whose id is in the set; missing ids are ignored.
    /// Observations go with their rate via the cascade.
    pub async fn delete_by_ids(&self, ids: &[Uuid]) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM currency_rates WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.db_pool)
            .await?;

        info!("Deleted {} currency rates", result.rows_affected());
        Ok(result.rows_affected())
    }

    pub async fn delete_rate(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM currency_rates WHERE id = $1")
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Currency rate not found: {}", id)));
        }
        Ok(())
    }

    /// Manual edit: the new value and its observation commit together.
    pub async fn manual_update(
        &self,
        id: Uuid,
        new_rate: Option<f64>,
    ) -> Result<CurrencyRate, AppError> {
        let rate = new_rate
            .ok_or_else(|| AppError::ValidationError("Rate not provided".to_string()))?;
        self.apply_rate(id, rate).await
    }

    /// Writes a new rate value and appends the matching observation in a
    /// single transaction. Shared by manual updates and the sync endpoint;
    /// the history must never silently omit a mutation.
    pub async fn apply_rate(&self, id: Uuid, new_rate: f64) -> Result<CurrencyRate, AppError> {
        let mut tx = self.db_pool.begin().await?;

        let updated = sqlx::query_as::<_, CurrencyRate>(
            r#"
            UPDATE currency_rates
            SET rate = $1, last_updated = NOW()
            WHERE id = $2
            RETURNING id, pair, rate, last_updated
            "#,
        )
        .bind(new_rate)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let updated = updated
            .ok_or_else(|| AppError::NotFound(format!("Currency rate not found: {}", id)))?;

        sqlx::query(
            "INSERT INTO rate_observations (currency_rate_id, rate, observed_at) VALUES ($1, $2, NOW())",
        )
        .bind(id)
        .bind(new_rate)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("Updated rate {} to {}", updated.pair, new_rate);
        Ok(updated)
    }

    pub async fn get_rate(&self, id: Uuid) -> Result<Option<CurrencyRate>, AppError> {
        let rate = sqlx::query_as::<_, CurrencyRate>(
            "SELECT id, pair, rate, last_updated FROM currency_rates WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(rate)
    }

    /// Lookup by natural key. First match by id if duplicates somehow
    /// exist, which the unique constraint should rule out.
    pub async fn find_by_pair(&self, pair: &str) -> Result<Option<CurrencyRate>, AppError> {
        let rate = sqlx::query_as::<_, CurrencyRate>(
            "SELECT id, pair, rate, last_updated FROM currency_rates WHERE pair = $1 ORDER BY id LIMIT 1",
        )
        .bind(pair)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(rate)
    }

    pub async fn check_pair(&self, pair: &str) -> Result<PairCheck, AppError> {
        let (base, quote) = crate::models::split_pair(pair)?;
        if base == quote {
            return Err(AppError::ValidationError(format!(
                "Invalid currency pair: {}. The currencies must be different.",
                pair
            )));
        }

        Ok(match self.find_by_pair(pair).await? {
            Some(rate) => PairCheck {
                exists: true,
                id: Some(rate.id),
                pair: Some(rate.pair),
                rate: Some(rate.rate),
            },
            None => PairCheck {
                exists: false,
                id: None,
                pair: None,
                rate: None,
            },
        })
    }

    pub async fn list_pairs(&self) -> Result<Vec<PairSummary>, AppError> {
        let pairs = sqlx::query_as::<_, PairSummary>(
            "SELECT id, pair FROM currency_rates ORDER BY pair",
        )
        .fetch_all(&self.db_pool)
        .await?;

        Ok(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_entry_duplicate_in_batch() {
        let mut seen = HashSet::new();
        assert!(validate_bulk_entry("USD/EUR", &mut seen).is_ok());

        let err = validate_bulk_entry("USD/EUR", &mut seen).unwrap_err();
        assert_eq!(err, "Duplicate currency pair: USD/EUR");
    }

    #[test]
    fn test_bulk_entry_first_occurrence_wins() {
        let mut seen = HashSet::new();
        assert!(validate_bulk_entry("USD/EUR", &mut seen).is_ok());
        assert!(validate_bulk_entry("GBP/JPY", &mut seen).is_ok());
        assert!(validate_bulk_entry("USD/EUR", &mut seen).is_err());
        // a later unrelated entry is unaffected by the duplicate
        assert!(validate_bulk_entry("EUR/USD", &mut seen).is_ok());
    }

    #[test]
    fn test_bulk_entry_equal_codes() {
        let mut seen = HashSet::new();
        let err = validate_bulk_entry("USD/USD", &mut seen).unwrap_err();
        assert!(err.contains("must be different"));
    }

    #[test]
    fn test_bulk_entry_unsupported_code() {
        let mut seen = HashSet::new();
        let err = validate_bulk_entry("USD/XXX", &mut seen).unwrap_err();
        assert!(err.contains("not valid"));
    }
}
