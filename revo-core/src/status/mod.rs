//! Design status poller.
//!
//! Pulls order status and preview images on demand (screen focus, explicit
//! refresh). Nothing here retries or caches: failures go straight back to
//! the caller, which offers a manual retry.

mod download;

pub use download::{DownloadError, DownloadProgress, MediaLibrary, download_to_library};

use revo_sdk::client::{BackendClient, ClientError};
use revo_sdk::objects::{DesignStatus, OrderSummary};
use thiserror::Error;
use time::Date;
use time::macros::format_description;
use tracing::{debug, warn};
use url::Url;

/// Errors from status and preview lookups.
#[derive(Debug, Error)]
pub enum StatusError {
    #[error("order {0} not found")]
    NotFound(String),

    #[error("no preview image for order {0}")]
    NoPreview(String),

    #[error("network error: {0}")]
    Network(#[from] ClientError),

    #[error("invalid preview url {raw}: {source}")]
    InvalidPreviewUrl {
        raw: String,
        #[source]
        source: url::ParseError,
    },
}

impl StatusError {
    /// Both a missing order and a missing preview are "not found" for the UI.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StatusError::NotFound(_) | StatusError::NoPreview(_))
    }
}

/// Steps of the order tracker shown to the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProgressStep {
    Research,
    Design,
    Testing,
    Completed,
}

impl ProgressStep {
    pub const ALL: [ProgressStep; 4] = [
        ProgressStep::Research,
        ProgressStep::Design,
        ProgressStep::Testing,
        ProgressStep::Completed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProgressStep::Research => "Research",
            ProgressStep::Design => "Design",
            ProgressStep::Testing => "Testing",
            ProgressStep::Completed => "Completed",
        }
    }
}

/// Current state of one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderStatus {
    pub order_id: String,
    pub custom_order_id: Option<String>,
    pub checked_option: Option<String>,
    pub status: DesignStatus,
    /// Absolute preview URL, if the designers uploaded one.
    pub preview_image_url: Option<Url>,
    pub order_date: Option<String>,
    pub delivery_date: Option<String>,
}

impl OrderStatus {
    /// Tracker position: corrections stay on the testing step.
    pub fn progress_step(&self) -> ProgressStep {
        match self.status {
            DesignStatus::Designing => ProgressStep::Design,
            DesignStatus::Testing | DesignStatus::Correction => ProgressStep::Testing,
            DesignStatus::Delivered => ProgressStep::Completed,
        }
    }

    pub fn order_date(&self) -> Option<Date> {
        self.order_date.as_deref().and_then(parse_date)
    }

    pub fn delivery_date(&self) -> Option<Date> {
        self.delivery_date.as_deref().and_then(parse_date)
    }
}

/// Parse the `YYYY-MM-DD` prefix of a date or datetime string.
fn parse_date(raw: &str) -> Option<Date> {
    let prefix = raw.get(..10)?;
    Date::parse(prefix, format_description!("[year]-[month]-[day]")).ok()
}

pub struct DesignStatusPoller {
    client: BackendClient,
    email: String,
}

impl DesignStatusPoller {
    /// `email` identifies the customer whose orders are listed.
    pub fn new(client: BackendClient, email: impl Into<String>) -> Self {
        Self {
            client,
            email: email.into(),
        }
    }

    /// All orders of the customer, newest first as the backend returns them.
    pub async fn list_orders(&self) -> Result<Vec<OrderStatus>, StatusError> {
        let orders = self.client.show_orders(&self.email).await?;
        debug!(count = orders.len(), "Fetched order list");
        Ok(orders.into_iter().map(|o| self.to_status(o)).collect())
    }

    /// Current status of `order_id`.
    pub async fn fetch_status(&self, order_id: &str) -> Result<OrderStatus, StatusError> {
        self.list_orders()
            .await?
            .into_iter()
            .find(|o| o.order_id == order_id || o.custom_order_id.as_deref() == Some(order_id))
            .ok_or_else(|| StatusError::NotFound(order_id.to_owned()))
    }

    /// Absolute URL of the preview image of `order_id`.
    pub async fn fetch_preview_image(&self, order_id: &str) -> Result<Url, StatusError> {
        let response = match self.client.preview_image(order_id).await {
            Ok(r) => r,
            Err(e) if e.status().is_some_and(|s| s == reqwest::StatusCode::NOT_FOUND) => {
                return Err(StatusError::NotFound(order_id.to_owned()));
            }
            Err(e) => return Err(e.into()),
        };

        let raw = response
            .preview_image
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| StatusError::NoPreview(order_id.to_owned()))?;

        self.client
            .config()
            .resolve_media_url(&raw)
            .map_err(|source| StatusError::InvalidPreviewUrl { raw, source })
    }

    /// Download `url` into the customer's media library.
    pub async fn download_preview_image(
        &self,
        url: Url,
        library: &dyn MediaLibrary,
        progress: impl FnMut(DownloadProgress) + Send,
    ) -> Result<std::path::PathBuf, DownloadError> {
        download_to_library(&self.client, url, library, progress).await
    }

    fn to_status(&self, summary: OrderSummary) -> OrderStatus {
        let preview_image_url = summary
            .preview_image
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .and_then(|raw| match self.client.config().resolve_media_url(raw) {
                Ok(url) => Some(url),
                Err(e) => {
                    warn!(order_id = %summary.order_id, raw = raw, error = %e, "Ignoring unparsable preview url");
                    None
                }
            });

        OrderStatus {
            order_id: summary.order_id,
            custom_order_id: summary.custom_order_id,
            checked_option: summary.checked_option,
            status: summary.order_status,
            preview_image_url,
            order_date: summary.order_date,
            delivery_date: summary.delivery_date,
        }
    }
}
