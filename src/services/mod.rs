pub mod alert_service;
pub mod analytics_service;
pub mod conversion_service;
pub mod rate_service;
pub mod sync_service;

pub use alert_service::AlertService;
pub use analytics_service::AnalyticsService;
pub use conversion_service::{BulkConversionResult, ConversionService};
pub use rate_service::{BulkCreateResult, PairCheck, RateService};
pub use sync_service::{HttpQuoteProvider, QuoteError, QuoteProvider, SyncConnector};
