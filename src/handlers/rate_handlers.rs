//! Rate store and sync endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{CreateCurrencyRate, CurrencyRate};
use crate::services::rate_service::{BulkCreateResult, PairCheck, PairSummary};
use crate::services::{RateService, SyncConnector};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct BulkCreateRequest {
    pub rates: Vec<CreateCurrencyRate>,
}

#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct ManualUpdateRequest {
    pub rate: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct PairCheckRequest {
    pub pair: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub message: String,
    pub pair: String,
    pub rate: f64,
}

pub async fn create_rate(
    State(state): State<AppState>,
    Json(request): Json<CreateCurrencyRate>,
) -> Result<(StatusCode, Json<CurrencyRate>), AppError> {
    let rate = RateService::new(state.db_pool.clone())
        .create_rate(&request)
        .await?;
    Ok((StatusCode::CREATED, Json(rate)))
}

pub async fn bulk_create_rates(
    State(state): State<AppState>,
    Json(request): Json<BulkCreateRequest>,
) -> Result<(StatusCode, Json<BulkCreateResult>), AppError> {
    let result = RateService::new(state.db_pool.clone())
        .bulk_create(request.rates)
        .await?;
    Ok((StatusCode::CREATED, Json(result)))
}

pub async fn bulk_delete_rates(
    State(state): State<AppState>,
    Json(request): Json<BulkDeleteRequest>,
) -> Result<Json<Value>, AppError> {
    if request.ids.is_empty() {
        return Err(AppError::ValidationError("No IDs provided".to_string()));
    }

    let deleted_count = RateService::new(state.db_pool.clone())
        .delete_by_ids(&request.ids)
        .await?;

    Ok(Json(json!({
        "status": "success",
        "deleted_count": deleted_count,
    })))
}

pub async fn manual_update_rate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ManualUpdateRequest>,
) -> Result<Json<CurrencyRate>, AppError> {
    let rate = RateService::new(state.db_pool.clone())
        .manual_update(id, request.rate)
        .await?;
    Ok(Json(rate))
}

pub async fn delete_rate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    RateService::new(state.db_pool.clone()).delete_rate(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn check_pair(
    State(state): State<AppState>,
    Json(request): Json<PairCheckRequest>,
) -> Result<Json<PairCheck>, AppError> {
    let pair = request
        .pair
        .ok_or_else(|| AppError::ValidationError("Currency pair not provided".to_string()))?;

    let check = RateService::new(state.db_pool.clone()).check_pair(&pair).await?;
    Ok(Json(check))
}

pub async fn list_pairs(
    State(state): State<AppState>,
) -> Result<Json<Vec<PairSummary>>, AppError> {
    let pairs = RateService::new(state.db_pool.clone()).list_pairs().await?;
    Ok(Json(pairs))
}

/// Fetches a live quote through the connector, then commits the new rate
/// together with its observation.
pub async fn sync_rate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SyncResponse>, AppError> {
    let rate_service = RateService::new(state.db_pool.clone());

    let currency_rate = rate_service
        .get_rate(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Currency rate not found: {}", id)))?;

    let connector = SyncConnector::new(state.quote_provider.clone());
    let live_rate = connector.fetch_rate(&currency_rate).await?;

    let updated = rate_service.apply_rate(id, live_rate).await?;

    Ok(Json(SyncResponse {
        message: "Currency rate synced successfully".to_string(),
        pair: updated.pair,
        rate: updated.rate,
    }))
}

pub fn create_rate_routes() -> Router<AppState> {
    Router::new()
        .route("/rates", post(create_rate))
        .route("/rates", get(list_pairs))
        .route("/rates/bulk", post(bulk_create_rates))
        .route("/rates/bulk", delete(bulk_delete_rates))
        .route("/rates/check", post(check_pair))
        .route("/rates/:id/manual", put(manual_update_rate))
        .route("/rates/:id/manual", delete(delete_rate))
        .route("/rates/:id/sync", post(sync_rate))
}
