//! Derived, on-demand views over the rate store and observation history.
//! Nothing here is cached or materialized; every call recomputes from the
//! rows as they stand.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{CurrencyRate, RateObservation};

#[derive(Clone)]
pub struct AnalyticsService {
    db_pool: PgPool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinMaxRate {
    pub min_rate: f64,
    pub max_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RateStatus {
    pub pair: String,
    pub status: String,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailySummaryEntry {
    pub pair: String,
    pub current_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage_change: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PairDetails {
    pub pair: String,
    pub current_rate: f64,
    pub daily_fluctuation: f64,
    pub highest_rate: Option<f64>,
    pub lowest_rate: Option<f64>,
}

/// Number of days after which a rate without updates counts as inactive.
const STALE_AFTER_DAYS: i64 = 3;

/// Percentage change guarded against a zero base: a zero initial value
/// yields 0.0 instead of a division.
pub fn percentage_change(current: f64, initial: f64) -> f64 {
    if initial == 0.0 {
        return 0.0;
    }
    (current - initial) / initial * 100.0
}

pub fn start_of_today() -> DateTime<Utc> {
    Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Today's initial observation for the daily summary: an observation
/// stamped exactly at the start of day wins, otherwise the day's first
/// chronologically. `observations` must be today's rows in ascending
/// `observed_at` order.
pub fn initial_today_midnight_preferred<'a>(
    observations: &'a [RateObservation],
    start_of_day: DateTime<Utc>,
) -> Option<&'a RateObservation> {
    observations
        .iter()
        .find(|obs| obs.observed_at == start_of_day)
        .or_else(|| observations.first())
}

/// Today's initial observation for pair details: strictly the earliest
/// observation recorded today.
pub fn earliest_today(observations: &[RateObservation]) -> Option<&RateObservation> {
    observations.first()
}

pub fn status_label(now: DateTime<Utc>, last_updated: DateTime<Utc>) -> &'static str {
    if now - last_updated <= Duration::days(STALE_AFTER_DAYS) {
        "active"
    } else {
        "inactive"
    }
}

impl AnalyticsService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Min and max over the full observation history of one rate. None
    /// when the rate has no observations at all.
    pub async fn min_max(&self, rate_id: Uuid) -> Result<Option<MinMaxRate>, AppError> {
        let row: (Option<f64>, Option<f64>) = sqlx::query_as(
            "SELECT MIN(rate), MAX(rate) FROM rate_observations WHERE currency_rate_id = $1",
        )
        .bind(rate_id)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(match row {
            (Some(min_rate), Some(max_rate)) => Some(MinMaxRate { min_rate, max_rate }),
            _ => None,
        })
    }

    /// All observations for a rate, most recent first.
    pub async fn trend(&self, rate_id: Uuid) -> Result<Vec<RateObservation>, AppError> {
        let observations = sqlx::query_as::<_, RateObservation>(
            r#"
            SELECT id, currency_rate_id, rate, observed_at
            FROM rate_observations
            WHERE currency_rate_id = $1
            ORDER BY observed_at DESC
            "#,
        )
        .bind(rate_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(observations)
    }

    /// Every observation across all rates, most recent first.
    pub async fn all_observations(&self) -> Result<Vec<RateObservation>, AppError> {
        let observations = sqlx::query_as::<_, RateObservation>(
            r#"
            SELECT id, currency_rate_id, rate, observed_at
            FROM rate_observations
            ORDER BY observed_at DESC
            "#,
        )
        .fetch_all(&self.db_pool)
        .await?;

        Ok(observations)
    }

    /// The 10 most recently updated rates.
    pub async fn latest_rates(&self) -> Result<Vec<CurrencyRate>, AppError> {
        let rates = sqlx::query_as::<_, CurrencyRate>(
            "SELECT id, pair, rate, last_updated FROM currency_rates ORDER BY last_updated DESC LIMIT 10",
        )
        .fetch_all(&self.db_pool)
        .await?;

        Ok(rates)
    }

    pub async fn status(&self, rate_id: Uuid) -> Result<RateStatus, AppError> {
        let rate = self.fetch_rate(rate_id).await?;

        Ok(RateStatus {
            pair: rate.pair,
            status: status_label(Utc::now(), rate.last_updated).to_string(),
            last_updated: rate.last_updated,
        })
    }

    /// Per-rate daily movement. Rates with no observation today report
    /// absent initial/percentage values rather than zeros.
    pub async fn daily_summary(&self) -> Result<Vec<DailySummaryEntry>, AppError> {
        let rates = sqlx::query_as::<_, CurrencyRate>(
            "SELECT id, pair, rate, last_updated FROM currency_rates ORDER BY pair",
        )
        .fetch_all(&self.db_pool)
        .await?;

        let start_of_day = start_of_today();
        let mut summary = Vec::with_capacity(rates.len());

        for rate in rates {
            let today = self.observations_today(rate.id, start_of_day).await?;
            let initial = initial_today_midnight_preferred(&today, start_of_day);

            summary.push(DailySummaryEntry {
                current_rate: rate.rate,
                initial_rate: initial.map(|obs| obs.rate),
                percentage_change: initial.map(|obs| percentage_change(rate.rate, obs.rate)),
                pair: rate.pair,
            });
        }

        Ok(summary)
    }

    /// Full detail view for one rate: daily fluctuation (0.0 when nothing
    /// was observed today) and all-time extremes (nullable when the
    /// history is empty).
    pub async fn pair_details(&self, rate_id: Uuid) -> Result<PairDetails, AppError> {
        let rate = self.fetch_rate(rate_id).await?;

        let today = self.observations_today(rate_id, start_of_today()).await?;
        let daily_fluctuation = earliest_today(&today)
            .map(|obs| percentage_change(rate.rate, obs.rate))
            .unwrap_or(0.0);

        let min_max = self.min_max(rate_id).await?;

        Ok(PairDetails {
            pair: rate.pair,
            current_rate: rate.rate,
            daily_fluctuation,
            highest_rate: min_max.as_ref().map(|mm| mm.max_rate),
            lowest_rate: min_max.map(|mm| mm.min_rate),
        })
    }

    async fn fetch_rate(&self, rate_id: Uuid) -> Result<CurrencyRate, AppError> {
        sqlx::query_as::<_, CurrencyRate>(
            "SELECT id, pair, rate, last_updated FROM currency_rates WHERE id = $1",
        )
        .bind(rate_id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Currency rate not found: {}", rate_id)))
    }

    /// Today's observations in ascending order, so the first element is
    /// the earliest.
    async fn observations_today(
        &self,
        rate_id: Uuid,
        start_of_day: DateTime<Utc>,
    ) -> Result<Vec<RateObservation>, AppError> {
        let observations = sqlx::query_as::<_, RateObservation>(
            r#"
            SELECT id, currency_rate_id, rate, observed_at
            FROM rate_observations
            WHERE currency_rate_id = $1 AND observed_at >= $2
            ORDER BY observed_at ASC
            "#,
        )
        .bind(rate_id)
        .bind(start_of_day)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(observations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn obs(rate: f64, observed_at: DateTime<Utc>) -> RateObservation {
        RateObservation {
            id: Uuid::new_v4(),
            currency_rate_id: Uuid::new_v4(),
            rate,
            observed_at,
        }
    }

    #[test]
    fn test_percentage_change() {
        assert_eq!(percentage_change(0.92, 0.90), (0.92 - 0.90) / 0.90 * 100.0);
        assert!(percentage_change(0.85, 0.90) < 0.0);
    }

    #[test]
    fn test_percentage_change_zero_initial() {
        assert_eq!(percentage_change(1.5, 0.0), 0.0);
    }

    proptest! {
        #[test]
        fn test_percentage_change_is_finite(
            current in -1e6f64..1e6,
            initial in 0.01f64..1e6,
        ) {
            prop_assert!(percentage_change(current, initial).is_finite());
        }
    }

    #[test]
    fn test_midnight_observation_preferred() {
        let midnight = start_of_today();
        let later = midnight + Duration::hours(3);
        let earlier = midnight + Duration::hours(1);

        // ascending order with a midnight row present
        let observations = vec![obs(1.0, midnight), obs(1.1, earlier), obs(1.2, later)];
        let initial = initial_today_midnight_preferred(&observations, midnight).unwrap();
        assert_eq!(initial.rate, 1.0);
    }

    #[test]
    fn test_falls_back_to_earliest_without_midnight_row() {
        let midnight = start_of_today();
        let observations = vec![
            obs(1.1, midnight + Duration::hours(1)),
            obs(1.2, midnight + Duration::hours(3)),
        ];
        let initial = initial_today_midnight_preferred(&observations, midnight).unwrap();
        assert_eq!(initial.rate, 1.1);
    }

    #[test]
    fn test_no_observations_today() {
        let midnight = start_of_today();
        assert!(initial_today_midnight_preferred(&[], midnight).is_none());
        assert!(earliest_today(&[]).is_none());
    }

    #[test]
    fn test_earliest_today_takes_first_ascending() {
        let midnight = start_of_today();
        let observations = vec![obs(1.0, midnight), obs(1.5, midnight + Duration::hours(2))];
        assert_eq!(earliest_today(&observations).unwrap().rate, 1.0);
    }

    #[test]
    fn test_status_label_boundaries() {
        let now = Utc::now();
        assert_eq!(status_label(now, now - Duration::days(1)), "active");
        assert_eq!(status_label(now, now - Duration::days(3)), "active");
        assert_eq!(
            status_label(now, now - Duration::days(3) - Duration::seconds(1)),
            "inactive"
        );
    }
}
