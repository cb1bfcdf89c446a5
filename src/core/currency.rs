//! Reference currencies and the rate provider abstraction

use crate::core::error::RefreshError;
use async_trait::async_trait;
use std::collections::HashMap;

/// All rates are expressed as units of a currency per one Myanmar Kyat.
pub const BASE_CURRENCY: &str = "MMK";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Currency {
    pub code: &'static str,
    pub name: &'static str,
    pub flag: &'static str,
}

/// Currencies offered for selection, in display order. The base comes first.
pub const CURRENCIES: &[Currency] = &[
    Currency {
        code: "MMK",
        name: "Myanmar Kyat",
        flag: "🇲🇲",
    },
    Currency {
        code: "CNY",
        name: "Chinese Yuan",
        flag: "🇨🇳",
    },
    Currency {
        code: "JPY",
        name: "Japanese Yen",
        flag: "🇯🇵",
    },
    Currency {
        code: "USD",
        name: "US Dollar",
        flag: "🇺🇸",
    },
    Currency {
        code: "EUR",
        name: "Euro",
        flag: "🇪🇺",
    },
    Currency {
        code: "GBP",
        name: "British Pound",
        flag: "🇬🇧",
    },
    Currency {
        code: "THB",
        name: "Thai Baht",
        flag: "🇹🇭",
    },
    Currency {
        code: "SGD",
        name: "Singapore Dollar",
        flag: "🇸🇬",
    },
    Currency {
        code: "KRW",
        name: "South Korean Won",
        flag: "🇰🇷",
    },
];

pub fn find_currency(code: &str) -> Option<&'static Currency> {
    CURRENCIES
        .iter()
        .find(|c| c.code.eq_ignore_ascii_case(code.trim()))
}

/// Normalizes a user supplied code and checks it against [`CURRENCIES`].
pub fn parse_currency_code(input: &str) -> Result<String, String> {
    find_currency(input)
        .map(|c| c.code.to_string())
        .ok_or_else(|| {
            let known: Vec<&str> = CURRENCIES.iter().map(|c| c.code).collect();
            format!(
                "Unsupported currency: {}. Expected one of {}",
                input.trim(),
                known.join(", ")
            )
        })
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Returns units of each currency per one unit of `base`.
    async fn fetch_rates(&self, base: &str) -> Result<HashMap<String, f64>, RefreshError>;
}
