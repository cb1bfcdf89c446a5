pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::currency::parse_currency_code;
use crate::core::{ConversionRequest, RateTableManager};
use crate::providers::ExchangeRateApiProvider;
use anyhow::{Result, anyhow};
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Rates,
    Convert {
        amount: Option<String>,
        from: Option<String>,
        to: Option<String>,
    },
    Interactive,
}

pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!(
        base_url = %config.provider.base_url,
        defaults = ?config.defaults,
        display = ?config.display,
        "Loaded config"
    );
    Ok(config)
}

pub fn build_manager(config: &AppConfig) -> Result<Arc<RateTableManager>> {
    let api_key = config.api_key();
    debug!(has_api_key = api_key.is_some(), "Resolved rate provider credential");

    let provider = ExchangeRateApiProvider::new(
        &config.provider.base_url,
        api_key,
        config.provider.timeout(),
    )?;
    Ok(Arc::new(RateTableManager::new(Arc::new(provider))))
}

/// Falls back to the configured default, which is validated like user input.
fn resolve_code(code: Option<String>, default: &str) -> Result<String> {
    match code {
        Some(code) => Ok(code),
        None => parse_currency_code(default).map_err(|e| anyhow!("Invalid default in config: {e}")),
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency converter starting...");

    let config = load_config(config_path)?;
    let manager = build_manager(&config)?;

    match command {
        AppCommand::Rates => cli::rates::run(&manager, &config.display).await,
        AppCommand::Convert { amount, from, to } => {
            let from = resolve_code(from, &config.defaults.from)?;
            let to = resolve_code(to, &config.defaults.to)?;
            let amount = amount.unwrap_or_else(|| config.defaults.amount.clone());
            let request = ConversionRequest::parse(&amount, &from, &to);
            cli::convert::run(&manager, &request, &config.display).await
        }
        AppCommand::Interactive => cli::interactive::run(manager, &config).await,
    }
}
