use crate::core::rates::RateTable;
use crate::core::returns::InvestmentBasis;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};
use tracing::debug;

pub const GOLDAPI_TOKEN_ENV: &str = "GOLDAPI_ACCESS_TOKEN";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GoldApiProviderConfig {
    pub base_url: String,
    #[serde(default = "default_metal")]
    pub metal: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct YahooProviderConfig {
    pub base_url: String,
    #[serde(default = "default_index_symbol")]
    pub index_symbol: String,
    #[serde(default = "default_index_name")]
    pub index_name: String,
}

fn default_metal() -> String {
    "XAU".to_string()
}

fn default_index_symbol() -> String {
    "^NSEI".to_string()
}

fn default_index_name() -> String {
    "Nifty 50".to_string()
}

impl Default for GoldApiProviderConfig {
    fn default() -> Self {
        GoldApiProviderConfig {
            base_url: "https://www.goldapi.io".to_string(),
            metal: default_metal(),
        }
    }
}

impl Default for YahooProviderConfig {
    fn default() -> Self {
        YahooProviderConfig {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            index_symbol: default_index_symbol(),
            index_name: default_index_name(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub goldapi: GoldApiProviderConfig,
    #[serde(default)]
    pub yahoo: YahooProviderConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_history_window_days")]
    pub history_window_days: u32,
    #[serde(default)]
    pub investment_basis: InvestmentBasis,
    #[serde(default)]
    pub fd_rates: RateTable,
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_history_window_days() -> u32 {
    365
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            currency: default_currency(),
            providers: ProvidersConfig::default(),
            timeout_secs: default_timeout_secs(),
            history_window_days: default_history_window_days(),
            investment_basis: InvestmentBasis::default(),
            fd_rates: RateTable::default(),
        }
    }
}

impl AppConfig {
    /// Loads the default config file, falling back to built-in defaults when
    /// none has been created yet.
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
        let proj_dirs = ProjectDirs::from("in", "invplan", "invplan")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be at least 1");
        }
        self.fd_rates.validate()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Deployment secrets. Never read from the config file.
#[derive(Clone, Default)]
pub struct Secrets {
    pub goldapi_token: Option<String>,
}

impl Secrets {
    pub fn from_env() -> Self {
        let goldapi_token = std::env::var(GOLDAPI_TOKEN_ENV)
            .ok()
            .filter(|token| !token.trim().is_empty());
        if goldapi_token.is_none() {
            debug!("{} is not set", GOLDAPI_TOKEN_ENV);
        }
        Secrets { goldapi_token }
    }
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("goldapi_token", &self.goldapi_token.as_ref().map(|_| "***"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(config.currency, "INR");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.history_window_days, 365);
        assert_eq!(config.investment_basis, InvestmentBasis::GrownDeposits);
        assert_eq!(config.providers.goldapi.base_url, "https://www.goldapi.io");
        assert_eq!(config.providers.goldapi.metal, "XAU");
        assert_eq!(config.providers.yahoo.index_symbol, "^NSEI");
        assert_eq!(config.providers.yahoo.index_name, "Nifty 50");
        assert_eq!(config.fd_rates, RateTable::default());
    }

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
currency: "INR"
timeout_secs: 3
history_window_days: 180
investment_basis: principal
providers:
  goldapi:
    base_url: "http://example.com/gold"
  yahoo:
    base_url: "http://example.com/yahoo"
    index_symbol: "^NSEBANK"
    index_name: "Nifty Bank"
fd_rates:
  HDFC:
    "1 Year": 6.6
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert_eq!(config.history_window_days, 180);
        assert_eq!(config.investment_basis, InvestmentBasis::Principal);
        assert_eq!(config.providers.goldapi.base_url, "http://example.com/gold");
        assert_eq!(config.providers.goldapi.metal, "XAU");
        assert_eq!(config.providers.yahoo.index_symbol, "^NSEBANK");
        assert_eq!(config.providers.yahoo.index_name, "Nifty Bank");
        assert_eq!(config.fd_rates.rate("HDFC", "1 Year"), Some(6.6));
        assert_eq!(config.fd_rates.rate("SBI", "1 Year"), None);
    }

    #[test]
    fn test_load_from_path_rejects_bad_rates() -> Result<()> {
        let file = tempfile::NamedTempFile::new()?;
        fs::write(file.path(), "fd_rates:\n  SBI:\n    \"1 Year\": -2.0\n")?;

        let err = AppConfig::load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
        Ok(())
    }

    #[test]
    fn test_load_from_path_rejects_zero_timeout() -> Result<()> {
        let file = tempfile::NamedTempFile::new()?;
        fs::write(file.path(), "timeout_secs: 0\n")?;

        let err = AppConfig::load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
        assert_eq!(
            err.root_cause().to_string(),
            "timeout_secs must be at least 1"
        );
        Ok(())
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let err = AppConfig::load_from_path("/nonexistent/invplan/config.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_secrets_debug_hides_token() {
        let secrets = Secrets {
            goldapi_token: Some("goldapi-abc123".to_string()),
        };
        let printed = format!("{secrets:?}");
        assert!(!printed.contains("abc123"));
        assert!(printed.contains("***"));
    }
}
