//! Rate table, conversion rules and the ambient plumbing around them

pub mod config;
pub mod convert;
pub mod currency;
pub mod error;
pub mod log;
pub mod manager;
pub mod rates;

// Re-export main types for cleaner imports
pub use convert::{ConversionRequest, ConversionResult, convert};
pub use currency::{BASE_CURRENCY, CURRENCIES, Currency, RateProvider};
pub use error::{ConversionError, RefreshError};
pub use manager::{RateSnapshot, RateTableManager, RefreshOutcome, RefreshStatus};
pub use rates::RateTable;
