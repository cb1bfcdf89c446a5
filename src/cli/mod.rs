//! Terminal presentation of the rate table and conversions

pub mod convert;
pub mod interactive;
pub mod rates;
pub mod setup;
pub mod ui;
