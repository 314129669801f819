//! Conversion endpoints: single, by rate id, bulk, and the user ledger.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::{ConversionRequest, CurrencyConversion};
use crate::services::{BulkConversionResult, ConversionService};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct BulkConvertRequest {
    pub conversions: Vec<ConversionRequest>,
}

#[derive(Debug, Deserialize)]
pub struct ConvertByIdRequest {
    pub amount: f64,
}

pub async fn convert(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<ConversionRequest>,
) -> Result<Json<CurrencyConversion>, AppError> {
    let conversion = ConversionService::new(state.db_pool.clone())
        .convert(
            user.0,
            request.amount,
            &request.from_currency,
            &request.to_currency,
        )
        .await?;
    Ok(Json(conversion))
}

pub async fn convert_by_id(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<ConvertByIdRequest>,
) -> Result<Json<CurrencyConversion>, AppError> {
    let conversion = ConversionService::new(state.db_pool.clone())
        .convert_by_id(user.0, id, request.amount)
        .await?;
    Ok(Json(conversion))
}

pub async fn bulk_convert(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<BulkConvertRequest>,
) -> Result<Json<BulkConversionResult>, AppError> {
    let result = ConversionService::new(state.db_pool.clone())
        .bulk_convert(user.0, request.conversions)
        .await?;
    Ok(Json(result))
}

pub async fn conversion_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<CurrencyConversion>>, AppError> {
    let history = ConversionService::new(state.db_pool.clone())
        .history(user.0)
        .await?;
    Ok(Json(history))
}

pub fn create_conversion_routes() -> Router<AppState> {
    Router::new()
        .route("/convert", post(convert))
        .route("/convert/bulk", post(bulk_convert))
        .route("/convert/:id", post(convert_by_id))
        .route("/conversions", get(conversion_history))
}
