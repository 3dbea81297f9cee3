//! TOML file configuration structures.
//!
//! These structs directly map to the `revo-config.toml` file format.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    pub backend: BackendConfig,
    #[serde(default)]
    pub payment: PaymentConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub customer: CustomerConfig,
    #[serde(default)]
    pub media: MediaConfig,
}

/// Backend connection section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the design-services backend (e.g. "https://api.example.com/").
    pub base_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_finalization_timeout")]
    pub finalization_timeout_secs: u64,
    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    30
}

fn default_finalization_timeout() -> u64 {
    60
}

fn default_download_timeout() -> u64 {
    120
}

/// Gateway checkout presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_merchant_name")]
    pub merchant_name: String,
    #[serde(default = "default_theme_color")]
    pub theme_color: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            merchant_name: default_merchant_name(),
            theme_color: default_theme_color(),
        }
    }
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_merchant_name() -> String {
    "Revo Touch".to_string()
}

fn default_theme_color() -> String {
    "#FFCE07".to_string()
}

/// Retry settings shared by order creation and finalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    5000
}

/// The customer the CLI books for.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerConfig {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub contact: String,
}

/// Where downloaded previews are stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
        }
    }
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("./designs")
}
