use crate::core::config::DisplayConfig;
use crate::core::{RateSnapshot, RefreshStatus};
use chrono::{DateTime, Local, Utc};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Value,
    Live,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Value => style(text).yellow().bold(),
        StyleType::Live => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Formats an `Option<T>` into a `Cell`. `None` is displayed as "N/A".
pub fn format_optional_cell<T>(value: Option<T>, format_fn: impl Fn(T) -> String) -> Cell {
    value.map_or(
        Cell::new("N/A")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
        |v| Cell::new(format_fn(v)).set_alignment(CellAlignment::Right),
    )
}

/// Creates a spinner shown while rates are loading.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.blue} {msg}")
    {
        pb.set_style(spinner_style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local)
        .format("%b %-d, %Y, %I:%M %p")
        .to_string()
}

/// One line describing where the rates stand: live, updating, or failed.
pub fn status_line(snapshot: &RateSnapshot) -> String {
    let updated = snapshot
        .last_updated_at
        .map(|at| format!("Updated: {}", format_timestamp(at)));

    match (&snapshot.status, updated) {
        (RefreshStatus::Ready, Some(updated)) => {
            format!("{} {}", style_text("● Live", StyleType::Live), updated)
        }
        (RefreshStatus::Loading, updated) => {
            let stale = updated.map(|u| format!(" ({u})")).unwrap_or_default();
            style_text(&format!("Updating...{stale}"), StyleType::Subtle)
        }
        (RefreshStatus::Error(e), updated) => {
            let stale = updated
                .map(|u| format!("\nShowing stale rates. {u}"))
                .unwrap_or_default();
            format!("{}{}", style_text(&e.to_string(), StyleType::Error), stale)
        }
        (_, _) => style_text("Rates not loaded yet", StyleType::Subtle),
    }
}

/// Renders every non-base currency's rate per one base unit.
pub fn rates_table(snapshot: &RateSnapshot, display: &DisplayConfig) -> Table {
    let mut table = new_styled_table();
    table.set_header(vec![
        header_cell(""),
        header_cell("Code"),
        header_cell("Currency"),
        header_cell(&format!("Rate (per 1 {})", snapshot.table.base())),
    ]);

    for currency in crate::core::CURRENCIES
        .iter()
        .filter(|c| c.code != snapshot.table.base())
    {
        table.add_row(vec![
            Cell::new(currency.flag),
            Cell::new(currency.code).add_attribute(Attribute::Bold),
            Cell::new(currency.name),
            format_optional_cell(snapshot.table.rate(currency.code), |r| {
                display.format_rate(r)
            }),
        ]);
    }
    table
}
