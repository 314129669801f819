//! Currency conversions against currently stored rates. Every successful
//! conversion lands in an append-only ledger with the rate snapshotted.

use serde::Serialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{split_pair, ConversionRequest, CurrencyConversion};
use crate::services::rate_service::RateService;

#[derive(Clone)]
pub struct ConversionService {
    db_pool: PgPool,
    rates: RateService,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkConversionError {
    pub input: ConversionRequest,
    #[serde(rename = "errorMessage")]
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkConversionResult {
    pub results: Vec<CurrencyConversion>,
    pub errors: Vec<BulkConversionError>,
}

impl ConversionService {
    pub fn new(db_pool: PgPool) -> Self {
        Self {
            rates: RateService::new(db_pool.clone()),
            db_pool,
        }
    }

    /// Exact `from/to` pair lookup only: no inverse pairs, no
    /// triangulation. Nothing is written when the pair is missing.
    pub async fn convert(
        &self,
        user_id: Uuid,
        amount: f64,
        from_currency: &str,
        to_currency: &str,
    ) -> Result<CurrencyConversion, AppError> {
        if amount <= 0.0 {
            return Err(AppError::ValidationError(
                "Amount must be greater than zero".to_string(),
            ));
        }

        let pair = format!("{}/{}", from_currency, to_currency);
        let rate = self
            .rates
            .find_by_pair(&pair)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Currency pair not found: {}", pair)))?;

        let converted_amount = amount * rate.rate;

        let conversion = sqlx::query_as::<_, CurrencyConversion>(
            r#"
            INSERT INTO currency_conversions
                (user_id, from_currency, to_currency, amount, converted_amount, conversion_rate)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, from_currency, to_currency, amount,
                      converted_amount, conversion_rate, timestamp
            "#,
        )
        .bind(user_id)
        .bind(from_currency)
        .bind(to_currency)
        .bind(amount)
        .bind(converted_amount)
        .bind(rate.rate)
        .fetch_one(&self.db_pool)
        .await?;

        info!(
            "Converted {} {} to {} {} at {}",
            amount, from_currency, converted_amount, to_currency, rate.rate
        );
        Ok(conversion)
    }

    /// Resolves the pair by rate id first, then follows the normal path.
    pub async fn convert_by_id(
        &self,
        user_id: Uuid,
        rate_id: Uuid,
        amount: f64,
    ) -> Result<CurrencyConversion, AppError> {
        let rate = self
            .rates
            .get_rate(rate_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Currency rate not found: {}", rate_id)))?;

        let (from_currency, to_currency) = split_pair(&rate.pair)?;
        self.convert(user_id, amount, from_currency, to_currency).await
    }

    /// Each request is processed on its own; bad amounts and missing
    /// pairs become error entries instead of aborting the batch.
    pub async fn bulk_convert(
        &self,
        user_id: Uuid,
        requests: Vec<ConversionRequest>,
    ) -> Result<BulkConversionResult, AppError> {
        let mut results = Vec::new();
        let mut errors = Vec::new();

        for request in requests {
            match self
                .convert(
                    user_id,
                    request.amount,
                    &request.from_currency,
                    &request.to_currency,
                )
                .await
            {
                Ok(conversion) => results.push(conversion),
                Err(AppError::ValidationError(message)) | Err(AppError::NotFound(message)) => {
                    errors.push(BulkConversionError {
                        input: request,
                        error: message,
                    });
                }
                Err(other) => return Err(other),
            }
        }

        info!(
            "Bulk conversion: {} succeeded, {} rejected",
            results.len(),
            errors.len()
        );
        Ok(BulkConversionResult { results, errors })
    }

    /// The user's conversion ledger, newest first.
    pub async fn history(&self, user_id: Uuid) -> Result<Vec<CurrencyConversion>, AppError> {
        let conversions = sqlx::query_as::<_, CurrencyConversion>(
            r#"
            SELECT id, user_id, from_currency, to_currency, amount,
                   converted_amount, conversion_rate, timestamp
            FROM currency_conversions
            WHERE user_id = $1
            ORDER BY timestamp DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(conversions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_error_entry_wire_shape() {
        let entry = BulkConversionError {
            input: ConversionRequest {
                from_currency: "USD".to_string(),
                to_currency: "EUR".to_string(),
                amount: 25.0,
            },
            error: "Currency pair not found: USD/EUR".to_string(),
        };

        let value = serde_json::to_value(&entry).unwrap();
        assert!(value.get("errorMessage").is_some());
        assert!(value.get("error").is_none());
        assert_eq!(value["input"]["from_currency"], "USD");
    }
}
