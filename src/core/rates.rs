//! The base-anchored rate table.

use crate::core::currency::CURRENCIES;
use std::collections::{BTreeMap, HashMap};

/// Maps a currency code to how many units of it equal one unit of the base.
///
/// A stored value of `0` marks a currency whose rate has not been loaded.
/// Readers never see the sentinel directly: [`RateTable::rate`] only yields
/// strictly positive, finite values.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    base: String,
    rates: BTreeMap<String, f64>,
}

impl RateTable {
    /// An unloaded table: the base at 1, every other reference currency at 0.
    pub fn new(base: &str) -> Self {
        let mut rates: BTreeMap<String, f64> = CURRENCIES
            .iter()
            .map(|c| (c.code.to_string(), 0.0))
            .collect();
        rates.insert(base.to_string(), 1.0);
        Self {
            base: base.to_string(),
            rates,
        }
    }

    /// Builds a fresh table from a provider mapping. The base entry is always
    /// re-asserted as exactly 1, whatever the provider sent for it.
    pub fn from_provider(base: &str, provided: HashMap<String, f64>) -> Self {
        let mut rates: BTreeMap<String, f64> = provided.into_iter().collect();
        rates.insert(base.to_string(), 1.0);
        Self {
            base: base.to_string(),
            rates,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates
            .get(code)
            .copied()
            .filter(|r| r.is_finite() && *r > 0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.rates
            .keys()
            .map(|code| (code.as_str(), self.rate(code)))
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// True once any currency other than the base has a usable rate.
    pub fn is_loaded(&self) -> bool {
        self.iter()
            .any(|(code, rate)| code != self.base && rate.is_some())
    }
}
