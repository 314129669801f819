//! User-scoped alert CRUD plus the trigger pass. Ownership misses are
//! reported as not-found so nothing leaks about other users' alerts.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::{CreateCurrencyAlert, CurrencyAlert, UpdateCurrencyAlert};
use crate::services::AlertService;
use crate::AppState;

pub async fn list_alerts(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<CurrencyAlert>>, AppError> {
    let alerts = AlertService::new(state.db_pool.clone())
        .list_alerts(user.0)
        .await?;
    Ok(Json(alerts))
}

pub async fn create_alert(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateCurrencyAlert>,
) -> Result<(StatusCode, Json<CurrencyAlert>), AppError> {
    let alert = AlertService::new(state.db_pool.clone())
        .create_alert(user.0, &request)
        .await?;
    Ok((StatusCode::CREATED, Json(alert)))
}

pub async fn get_alert(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<CurrencyAlert>, AppError> {
    let alert = AlertService::new(state.db_pool.clone())
        .get_alert(id, user.0)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Alert not found: {}", id)))?;
    Ok(Json(alert))
}

pub async fn update_alert(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCurrencyAlert>,
) -> Result<Json<CurrencyAlert>, AppError> {
    let alert = AlertService::new(state.db_pool.clone())
        .update_alert(id, user.0, &request)
        .await?;
    Ok(Json(alert))
}

pub async fn delete_alert(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = AlertService::new(state.db_pool.clone())
        .delete_alert(id, user.0)
        .await?;

    if !deleted {
        return Err(AppError::NotFound(format!("Alert not found: {}", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Runs one evaluation pass. Invoked externally (cron or on demand); the
/// pass itself is idempotent.
pub async fn trigger_alerts(
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let fired = AlertService::new(state.db_pool.clone())
        .check_and_trigger_alerts()
        .await?;

    Ok(Json(json!({
        "message": "Alerts checked and triggered if necessary",
        "triggered_count": fired,
    })))
}

pub fn create_alert_routes() -> Router<AppState> {
    Router::new()
        .route("/alerts", get(list_alerts).post(create_alert))
        .route("/alerts/trigger", post(trigger_alerts))
        .route(
            "/alerts/:id",
            get(get_alert).put(update_alert).delete(delete_alert),
        )
}
