use super::ui;
use crate::core::config::DisplayConfig;
use crate::core::{RateSnapshot, RateTableManager};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Runs the startup refresh behind a spinner and returns the resulting state.
/// A failed refresh is not an error here: it shows up in the snapshot status.
pub async fn load(manager: &Arc<RateTableManager>) -> Result<RateSnapshot> {
    if let Some(handle) = manager.begin() {
        let pb = ui::new_spinner("Loading real-time exchange rates...");
        let joined = handle.await;
        pb.finish_and_clear();
        let outcome = joined.context("Rate refresh task failed")?;
        tracing::debug!(?outcome, "Startup refresh finished");
    }
    Ok(manager.snapshot())
}

pub fn render(snapshot: &RateSnapshot, display: &DisplayConfig) -> String {
    format!(
        "{}\n\n{}\n{}",
        ui::style_text("Exchange Rates", ui::StyleType::Title),
        ui::rates_table(snapshot, display),
        ui::status_line(snapshot)
    )
}

pub async fn run(manager: &Arc<RateTableManager>, display: &DisplayConfig) -> Result<()> {
    let snapshot = load(manager).await?;
    println!("{}", render(&snapshot, display));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{RateProvider, RefreshError};
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct PanickingProvider;

    #[async_trait]
    impl RateProvider for PanickingProvider {
        async fn fetch_rates(&self, _base: &str) -> Result<HashMap<String, f64>, RefreshError> {
            panic!("provider blew up");
        }
    }

    #[tokio::test]
    async fn test_load_reports_a_panicked_refresh_task() {
        let manager = Arc::new(RateTableManager::new(Arc::new(PanickingProvider)));

        let err = load(&manager).await.unwrap_err();
        assert!(err.to_string().contains("Rate refresh task failed"));
        // Nothing was applied; the manager is still serving the initial table.
        assert!(!manager.table().is_loaded());
    }
}
