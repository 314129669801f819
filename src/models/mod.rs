pub mod alert;
pub mod conversion;
pub mod currency;
pub mod observation;
pub mod rate;

pub use alert::{CreateCurrencyAlert, CurrencyAlert, UpdateCurrencyAlert};
pub use conversion::{ConversionRequest, CurrencyConversion};
pub use currency::{is_supported_currency, split_pair, validate_pair, SUPPORTED_CURRENCIES};
pub use observation::RateObservation;
pub use rate::{CreateCurrencyRate, CurrencyRate};
