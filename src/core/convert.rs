//! Pairwise conversion through the base currency.
//!
//! Every function here is pure: results depend only on the table and the
//! request, and nothing in the table is touched.

use crate::core::error::ConversionError;
use crate::core::rates::RateTable;

/// Parses user input into a non-negative amount. Anything that is not a
/// finite, non-negative number becomes zero.
pub fn parse_amount(input: &str) -> f64 {
    sanitize_amount(input.trim().parse::<f64>().unwrap_or(0.0))
}

fn sanitize_amount(amount: f64) -> f64 {
    if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub amount: f64,
    pub source: String,
    pub target: String,
}

impl ConversionRequest {
    pub fn new(amount: f64, source: &str, target: &str) -> Self {
        Self {
            amount: sanitize_amount(amount),
            source: source.to_string(),
            target: target.to_string(),
        }
    }

    pub fn parse(amount: &str, source: &str, target: &str) -> Self {
        Self::new(parse_amount(amount), source, target)
    }

    /// Same amount, source and target exchanged.
    pub fn swapped(&self) -> Self {
        Self {
            amount: self.amount,
            source: self.target.clone(),
            target: self.source.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConversionResult {
    /// `unit_rate` is how many target units one source unit buys.
    Converted { amount: f64, unit_rate: f64 },
    Unavailable(ConversionError),
}

impl ConversionResult {
    pub fn converted(&self) -> Option<f64> {
        match self {
            ConversionResult::Converted { amount, .. } => Some(*amount),
            ConversionResult::Unavailable(_) => None,
        }
    }

    pub fn unit_rate(&self) -> Option<f64> {
        match self {
            ConversionResult::Converted { unit_rate, .. } => Some(*unit_rate),
            ConversionResult::Unavailable(_) => None,
        }
    }

    pub fn converted_or_zero(&self) -> f64 {
        self.converted().unwrap_or(0.0)
    }

    pub fn error(&self) -> Option<&ConversionError> {
        match self {
            ConversionResult::Converted { .. } => None,
            ConversionResult::Unavailable(e) => Some(e),
        }
    }
}

/// Converts `amount` of `source` into `target`, pivoting through the base.
pub fn convert_amount(
    table: &RateTable,
    amount: f64,
    source: &str,
    target: &str,
) -> Result<f64, ConversionError> {
    let source_rate = || {
        table
            .rate(source)
            .ok_or_else(|| ConversionError::DivisionByUnavailableRate(source.to_string()))
    };
    let target_rate = || {
        table
            .rate(target)
            .ok_or_else(|| ConversionError::UnavailableRate(target.to_string()))
    };

    let base = table.base();
    if source == base {
        Ok(amount * target_rate()?)
    } else if target == base {
        Ok(amount / source_rate()?)
    } else {
        let in_base = amount / source_rate()?;
        Ok(in_base * target_rate()?)
    }
}

pub fn convert(table: &RateTable, request: &ConversionRequest) -> ConversionResult {
    let converted = convert_amount(table, request.amount, &request.source, &request.target);
    let unit_rate = convert_amount(table, 1.0, &request.source, &request.target);

    match (converted, unit_rate) {
        (Ok(amount), Ok(unit_rate)) => ConversionResult::Converted { amount, unit_rate },
        (Err(e), _) | (_, Err(e)) => ConversionResult::Unavailable(e),
    }
}
