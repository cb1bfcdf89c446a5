use crate::core::currency::BASE_CURRENCY;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

/// Environment variable that overrides `provider.api_key`.
pub const API_KEY_ENV: &str = "EXCHANGE_RATE_API_KEY";

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: "https://v6.exchangerate-api.com".to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Initial selection for `convert` and the interactive session.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct DefaultsConfig {
    pub amount: String,
    pub from: String,
    pub to: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            amount: "1000".to_string(),
            from: BASE_CURRENCY.to_string(),
            to: "CNY".to_string(),
        }
    }
}

/// Decimal places used when printing values. Unit rates into the base
/// currency are large numbers, so they get fewer places than other rates.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub amount_decimals: usize,
    pub rate_decimals: usize,
    pub base_rate_decimals: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            amount_decimals: 2,
            rate_decimals: 6,
            base_rate_decimals: 2,
        }
    }
}

impl DisplayConfig {
    pub fn format_amount(&self, amount: f64) -> String {
        format!("{:.*}", self.amount_decimals, amount)
    }

    pub fn format_rate(&self, rate: f64) -> String {
        format!("{:.*}", self.rate_decimals, rate)
    }

    /// Formats the "1 source = X target" figure.
    pub fn format_unit_rate(&self, source: &str, target: &str, rate: f64) -> String {
        let decimals = if source != BASE_CURRENCY && target == BASE_CURRENCY {
            self.base_rate_decimals
        } else {
            self.rate_decimals
        };
        format!("{rate:.decimals$}")
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    pub defaults: DefaultsConfig,
    pub display: DisplayConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("", "", "kyat").context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// The credential to call the provider with. The environment wins over
    /// the file; blank values count as missing.
    pub fn api_key(&self) -> Option<String> {
        Self::resolve_api_key(std::env::var(API_KEY_ENV).ok(), self.provider.api_key.clone())
    }

    fn resolve_api_key(from_env: Option<String>, from_file: Option<String>) -> Option<String> {
        [from_env, from_file]
            .into_iter()
            .flatten()
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty())
    }
}
