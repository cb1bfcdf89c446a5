use super::{rates, ui};
use crate::core::config::DisplayConfig;
use crate::core::currency::find_currency;
use crate::core::{ConversionRequest, ConversionResult, RateTableManager, RefreshStatus};
use anyhow::Result;
use std::sync::Arc;

fn flag(code: &str) -> &'static str {
    find_currency(code).map_or("", |c| c.flag)
}

/// Two lines: the converted amount, then the unit rate for the pair.
pub fn render_conversion(
    request: &ConversionRequest,
    result: &ConversionResult,
    display: &DisplayConfig,
) -> String {
    let (source, target) = (&request.source, &request.target);
    let amount = display.format_amount(request.amount);

    match result {
        ConversionResult::Converted {
            amount: converted,
            unit_rate,
        } => format!(
            "{} {amount} {source} = {} {target}\n{}",
            flag(source),
            ui::style_text(&display.format_amount(*converted), ui::StyleType::Value),
            ui::style_text(
                &format!(
                    "1 {source} = {} {target}",
                    display.format_unit_rate(source, target, *unit_rate)
                ),
                ui::StyleType::Subtle
            ),
        ),
        ConversionResult::Unavailable(e) => format!(
            "{} {amount} {source} = -- {target}\n{}",
            flag(source),
            ui::style_text(&e.to_string(), ui::StyleType::Error),
        ),
    }
}

pub async fn run(
    manager: &Arc<RateTableManager>,
    request: &ConversionRequest,
    display: &DisplayConfig,
) -> Result<()> {
    let snapshot = rates::load(manager).await?;
    if snapshot.status != RefreshStatus::Ready {
        println!("{}", ui::status_line(&snapshot));
    }

    let result = manager.convert(request);
    println!("{}", render_conversion(request, &result, display));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BASE_CURRENCY, ConversionError, RateTable, convert};
    use std::collections::HashMap;

    fn table() -> RateTable {
        RateTable::from_provider(
            BASE_CURRENCY,
            HashMap::from([("CNY".to_string(), 0.0034), ("USD".to_string(), 0.00048)]),
        )
    }

    #[test]
    fn test_render_from_base() {
        let request = ConversionRequest::new(1000.0, "MMK", "CNY");
        let rendered = render_conversion(
            &request,
            &convert(&table(), &request),
            &DisplayConfig::default(),
        );

        assert!(rendered.contains("1000.00 MMK = "));
        assert!(rendered.contains("3.40"));
        assert!(rendered.contains("1 MMK = 0.003400 CNY"));
    }

    #[test]
    fn test_render_into_base_uses_base_precision() {
        let request = ConversionRequest::new(100.0, "USD", "MMK");
        let rendered = render_conversion(
            &request,
            &convert(&table(), &request),
            &DisplayConfig::default(),
        );

        assert!(rendered.contains("208333.33"));
        assert!(rendered.contains("1 USD = 2083.33 MMK"));
    }

    #[test]
    fn test_render_unavailable() {
        let request = ConversionRequest::new(5.0, "KRW", "MMK");
        let result =
            ConversionResult::Unavailable(ConversionError::DivisionByUnavailableRate("KRW".into()));
        let rendered = render_conversion(&request, &result, &DisplayConfig::default());

        assert!(rendered.contains("5.00 KRW = -- MMK"));
        assert!(rendered.contains("No rate available for KRW"));
    }
}
