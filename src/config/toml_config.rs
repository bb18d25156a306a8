use crate::core::cache::DEFAULT_SESSION_KEY;
use crate::core::fetcher::DEFAULT_API_BASE;
use crate::core::ConfigProvider;
use crate::utils::error::{RaiseError, Result};
pub use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_INFLATION: f64 = 31.07;
const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RaiseConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// JSON file holding the session; without it the session ends with the process.
    pub path: Option<String>,
    pub key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    pub inflation: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: Option<LogFormat>,
}

impl RaiseConfig {
    /// Load the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RaiseError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RaiseError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RaiseError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_provider_url("provider.base_url", self.api_base())?;

        if let Some(timeout) = self.provider.timeout_seconds {
            validation::validate_min("provider.timeout_seconds", timeout, 1)?;
        }

        if let Some(path) = &self.session.path {
            validation::validate_path("session.path", path)?;
        }

        validation::validate_session_key("session.key", self.session_key())?;

        if let Some(inflation) = self.defaults.inflation {
            validation::validate_inflation_percent("defaults.inflation", inflation)?;
        }

        Ok(())
    }

    pub fn log_format(&self) -> LogFormat {
        self.logging.format.unwrap_or_default()
    }
}

impl ConfigProvider for RaiseConfig {
    fn api_base(&self) -> &str {
        self.provider.base_url.as_deref().unwrap_or(DEFAULT_API_BASE)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.provider
                .timeout_seconds
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        )
    }

    fn session_key(&self) -> &str {
        self.session.key.as_deref().unwrap_or(DEFAULT_SESSION_KEY)
    }

    fn session_path(&self) -> Option<&str> {
        self.session.path.as_deref()
    }

    fn default_inflation(&self) -> Option<f64> {
        Some(self.defaults.inflation.unwrap_or(DEFAULT_INFLATION))
    }
}

impl Validate for RaiseConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
