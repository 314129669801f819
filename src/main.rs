use std::sync::Arc;

use currency_monitor::{
    auth::JwtService,
    build_router,
    config::Settings,
    database::{establish_connection, run_migrations},
    services::HttpQuoteProvider,
    AppState,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let settings = Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.logging.level.clone())),
        )
        .init();

    info!("Starting currency-monitor");

    let db_pool = establish_connection(&settings.database.url).await?;
    run_migrations(&db_pool).await?;
    info!("Database ready");

    let jwt_service = Arc::new(JwtService::from_secret(&settings.auth.jwt_secret));
    let quote_provider = Arc::new(HttpQuoteProvider::new(&settings.quote_provider)?);

    let app_state = AppState {
        db_pool,
        settings: settings.clone(),
        jwt_service,
        quote_provider,
    };

    let app = build_router(app_state);

    let addr = format!("{}:{}", settings.api.host, settings.api.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Received shutdown signal");
        })
        .await?;

    info!("Shutting down currency-monitor");
    Ok(())
}
