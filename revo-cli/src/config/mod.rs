//! Configuration module for the `revo` CLI.
//!
//! Handles loading configuration from TOML files, CLI arguments,
//! and environment variables.

pub mod file;

use crate::config::file::FileConfig;
use revo_core::config::BookingConfig;
use revo_core::utils::RetryPolicy;
use revo_sdk::config::{BackendConfig, CustomerProfile};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Loaded configuration result containing all parts.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub backend: BackendConfig,
    pub booking: BookingConfig,
    pub customer: CustomerProfile,
    pub download_dir: PathBuf,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    base_url_override: Option<Url>,
    email_override: Option<String>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(
        config_path: impl AsRef<Path>,
        base_url_override: Option<Url>,
        email_override: Option<String>,
    ) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            base_url_override,
            email_override,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file
    /// 2. Apply CLI and environment overrides
    /// 3. Validate the configuration
    /// 4. Build the runtime configuration
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        let mut file_config: FileConfig = toml::from_str(&config_content)?;

        if let Some(base_url) = &self.base_url_override {
            file_config.backend.base_url = base_url.to_string();
        }
        if let Some(email) = &self.email_override {
            file_config.customer.email = email.clone();
        }

        let base_url = self.validate(&file_config)?;
        Ok(build_loaded_config(file_config, base_url))
    }

    fn validate(&self, config: &FileConfig) -> Result<Url, ConfigError> {
        let base_url = Url::parse(&config.backend.base_url).map_err(|e| {
            ConfigError::ValidationError(format!(
                "invalid backend base_url {}: {e}",
                config.backend.base_url
            ))
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::ValidationError(format!(
                "backend base_url must be http or https, got {}",
                base_url.scheme()
            )));
        }

        if !(1..=3).contains(&config.retry.max_attempts) {
            return Err(ConfigError::ValidationError(format!(
                "retry.max_attempts must be between 1 and 3, got {}",
                config.retry.max_attempts
            )));
        }
        if config.retry.max_delay_ms > 5000 {
            return Err(ConfigError::ValidationError(format!(
                "retry.max_delay_ms must not exceed 5000, got {}",
                config.retry.max_delay_ms
            )));
        }
        if config.retry.base_delay_ms > config.retry.max_delay_ms {
            return Err(ConfigError::ValidationError(
                "retry.base_delay_ms must not exceed retry.max_delay_ms".to_string(),
            ));
        }

        if config.payment.currency.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "payment.currency must not be empty".to_string(),
            ));
        }
        if config.customer.email.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "customer.email is not set (use the config file or REVO_CUSTOMER_EMAIL)"
                    .to_string(),
            ));
        }

        Ok(base_url)
    }
}

fn build_loaded_config(file_config: FileConfig, base_url: Url) -> LoadedConfig {
    let backend = BackendConfig::new(base_url).with_timeouts(
        Duration::from_secs(file_config.backend.request_timeout_secs),
        Duration::from_secs(file_config.backend.finalization_timeout_secs),
        Duration::from_secs(file_config.backend.download_timeout_secs),
    );

    let retry = RetryPolicy::new(
        file_config.retry.max_attempts,
        Duration::from_millis(file_config.retry.base_delay_ms),
        Duration::from_millis(file_config.retry.max_delay_ms),
    );

    LoadedConfig {
        backend,
        booking: BookingConfig {
            currency: file_config.payment.currency.trim().to_uppercase(),
            merchant_name: file_config.payment.merchant_name,
            theme_color: file_config.payment.theme_color,
            intent_retry: retry,
            finalize_retry: retry,
        },
        customer: CustomerProfile::new(
            file_config.customer.email.trim(),
            file_config.customer.name,
            file_config.customer.contact,
        ),
        download_dir: file_config.media.download_dir,
    }
}
