//! Supported-currency whitelist and pair string validation.
//!
//! A pair is a string `BASE/QUOTE` naming a directed exchange rate. Both
//! codes must come from the fixed whitelist below and must differ.

use crate::error::AppError;

/// Single source of truth for the supported currency codes.
pub const SUPPORTED_CURRENCIES: [&str; 35] = [
    "USD", "EUR", "GBP", "JPY", "AUD", "CAD", "CHF", "CNY", "HKD", "NZD",
    "SEK", "KRW", "SGD", "NOK", "MXN", "INR", "RUB", "ZAR", "TRY", "BRL",
    "TWD", "DKK", "PLN", "THB", "IDR", "HUF", "CZK", "ILS", "CLP", "PHP",
    "AED", "COP", "SAR", "MYR", "RON",
];

pub fn is_supported_currency(code: &str) -> bool {
    SUPPORTED_CURRENCIES.contains(&code)
}

/// Splits `BASE/QUOTE` into its two codes. Fails on anything that is not
/// exactly two non-empty segments joined by a single `/`.
pub fn split_pair(pair: &str) -> Result<(&str, &str), AppError> {
    let mut parts = pair.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(base), Some(quote), None) if !base.is_empty() && !quote.is_empty() => {
            Ok((base, quote))
        }
        _ => Err(AppError::ValidationError(format!(
            "Invalid currency pair: {}. Expected format BASE/QUOTE.",
            pair
        ))),
    }
}

/// Full pair validation: well-formed, distinct codes, both whitelisted.
pub fn validate_pair(pair: &str) -> Result<(&str, &str), AppError> {
    let (base, quote) = split_pair(pair)?;

    if base == quote {
        return Err(AppError::ValidationError(format!(
            "Invalid currency pair: {}. The currencies must be different.",
            pair
        )));
    }

    if !is_supported_currency(base) || !is_supported_currency(quote) {
        return Err(AppError::ValidationError(format!(
            "Invalid currency pair: {}. One or both currencies are not valid.",
            pair
        )));
    }

    Ok((base, quote))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_valid_pair() {
        let (base, quote) = validate_pair("USD/EUR").unwrap();
        assert_eq!(base, "USD");
        assert_eq!(quote, "EUR");
    }

    #[test]
    fn test_equal_codes_rejected() {
        assert!(validate_pair("USD/USD").is_err());
    }

    #[test]
    fn test_unsupported_code_rejected() {
        assert!(validate_pair("USD/XXX").is_err());
        assert!(validate_pair("XXX/EUR").is_err());
    }

    #[test]
    fn test_malformed_pairs_rejected() {
        assert!(validate_pair("USDEUR").is_err());
        assert!(validate_pair("USD/EUR/GBP").is_err());
        assert!(validate_pair("/EUR").is_err());
        assert!(validate_pair("USD/").is_err());
        assert!(validate_pair("").is_err());
    }

    #[test]
    fn test_whitelist_size() {
        assert_eq!(SUPPORTED_CURRENCIES.len(), 35);
        assert!(is_supported_currency("RON"));
        assert!(!is_supported_currency("BTC"));
    }

    proptest! {
        #[test]
        fn test_all_distinct_whitelisted_pairs_validate(
            a in 0usize..35,
            b in 0usize..35,
        ) {
            prop_assume!(a != b);
            let pair = format!("{}/{}", SUPPORTED_CURRENCIES[a], SUPPORTED_CURRENCIES[b]);
            prop_assert!(validate_pair(&pair).is_ok());
        }
    }
}
