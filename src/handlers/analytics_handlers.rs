//! Read-only analytics endpoints over rates and their history.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{CurrencyRate, RateObservation};
use crate::services::analytics_service::{
    DailySummaryEntry, MinMaxRate, PairDetails, RateStatus,
};
use crate::services::AnalyticsService;
use crate::AppState;

pub async fn get_min_max(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MinMaxRate>, AppError> {
    let min_max = AnalyticsService::new(state.db_pool.clone())
        .min_max(id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("Currency pair not found or no historical data available".to_string())
        })?;
    Ok(Json(min_max))
}

pub async fn get_trend(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<RateObservation>>, AppError> {
    let trend = AnalyticsService::new(state.db_pool.clone()).trend(id).await?;
    Ok(Json(trend))
}

pub async fn get_all_observations(
    State(state): State<AppState>,
) -> Result<Json<Vec<RateObservation>>, AppError> {
    let observations = AnalyticsService::new(state.db_pool.clone())
        .all_observations()
        .await?;
    Ok(Json(observations))
}

pub async fn get_latest_rates(
    State(state): State<AppState>,
) -> Result<Json<Vec<CurrencyRate>>, AppError> {
    let rates = AnalyticsService::new(state.db_pool.clone())
        .latest_rates()
        .await?;
    Ok(Json(rates))
}

pub async fn get_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RateStatus>, AppError> {
    let status = AnalyticsService::new(state.db_pool.clone()).status(id).await?;
    Ok(Json(status))
}

pub async fn get_daily_summary(
    State(state): State<AppState>,
) -> Result<Json<Vec<DailySummaryEntry>>, AppError> {
    let summary = AnalyticsService::new(state.db_pool.clone())
        .daily_summary()
        .await?;
    Ok(Json(summary))
}

pub async fn get_pair_details(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PairDetails>, AppError> {
    let details = AnalyticsService::new(state.db_pool.clone())
        .pair_details(id)
        .await?;
    Ok(Json(details))
}

pub fn create_analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/rates/latest", get(get_latest_rates))
        .route("/rates/history", get(get_all_observations))
        .route("/rates/:id/min-max", get(get_min_max))
        .route("/rates/:id/trend", get(get_trend))
        .route("/rates/:id/status", get(get_status))
        .route("/rates/:id/details", get(get_pair_details))
        .route("/summary/daily", get(get_daily_summary))
}
