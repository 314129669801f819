//! Bearer-token authentication middleware.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::auth::claims::AuthUser;
use crate::auth::jwt::JwtService;

/// Validates the `Authorization: Bearer` header and stashes the
/// authenticated user id in request extensions for the handlers.
pub async fn jwt_auth_middleware(
    State(jwt_service): State<Arc<JwtService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token =
        JwtService::extract_token_from_header(auth_header).ok_or(StatusCode::UNAUTHORIZED)?;

    let claims = jwt_service
        .validate_token(token)
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let user_id = claims.user_id().ok_or(StatusCode::UNAUTHORIZED)?;
    request.extensions_mut().insert(AuthUser(user_id));

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request as HttpRequest, middleware, routing::get, Extension, Router};
    use tower::ServiceExt;
    use uuid::Uuid;

    async fn whoami(Extension(user): Extension<AuthUser>) -> String {
        user.0.to_string()
    }

    fn test_app(jwt_service: Arc<JwtService>) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .layer(middleware::from_fn_with_state(
                jwt_service.clone(),
                jwt_auth_middleware,
            ))
    }

    #[tokio::test]
    async fn test_valid_token_passes_user_through() {
        let jwt_service = Arc::new(JwtService::from_secret("test-secret"));
        let user_id = Uuid::new_v4();
        let token = jwt_service
            .generate_token(user_id, "alice".to_string(), 1)
            .unwrap();

        let response = test_app(jwt_service)
            .oneshot(
                HttpRequest::builder()
                    .uri("/whoami")
                    .header("Authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_token_rejected() {
        let jwt_service = Arc::new(JwtService::from_secret("test-secret"));

        let response = test_app(jwt_service)
            .oneshot(
                HttpRequest::builder()
                    .uri("/whoami")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
