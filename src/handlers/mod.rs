pub mod alert_handlers;
pub mod analytics_handlers;
pub mod conversion_handlers;
pub mod health;
pub mod rate_handlers;

pub use alert_handlers::create_alert_routes;
pub use analytics_handlers::create_analytics_routes;
pub use conversion_handlers::create_conversion_routes;
pub use health::health_check;
pub use rate_handlers::create_rate_routes;
