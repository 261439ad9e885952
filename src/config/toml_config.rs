use crate::core::ConfigProvider;
use crate::utils::error::{Result, ShopError};
use crate::utils::validation::{validate_non_empty_string, validate_path, validate_url, Validate};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

pub const DEFAULT_BASKET_KEY: &str = "orderItems";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub cdn_url: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub path: String,
    pub basket_key: Option<String>,
}

impl ShopConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ShopError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses after `${VAR}` substitution.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let expanded = Self::substitute_env_vars(content);

        toml::from_str(&expanded).map_err(|e| ShopError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Unset variables are left as written so the parse or validation error names them.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &Captures| {
                std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
            })
            .into_owned()
    }
}

impl ConfigProvider for ShopConfig {
    fn api_url(&self) -> &str {
        &self.api.base_url
    }

    fn cdn_url(&self) -> &str {
        &self.api.cdn_url
    }

    fn storage_path(&self) -> &str {
        &self.storage.path
    }

    fn basket_key(&self) -> &str {
        self.storage
            .basket_key
            .as_deref()
            .unwrap_or(DEFAULT_BASKET_KEY)
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.api.timeout_seconds
    }
}

impl Validate for ShopConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api.base_url", &self.api.base_url)?;
        validate_url("api.cdn_url", &self.api.cdn_url)?;
        validate_path("storage.path", &self.storage.path)?;
        validate_non_empty_string("storage.basket_key", self.basket_key())?;

        if self.api.timeout_seconds == Some(0) {
            return Err(ShopError::InvalidConfigValueError {
                field: "api.timeout_seconds".to_string(),
                value: "0".to_string(),
                reason: "Timeout must be at least 1 second".to_string(),
            });
        }

        Ok(())
    }
}
