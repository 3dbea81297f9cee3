//! HTTP client for the Revo Touch backend.
//!
//! Gated behind the `client` cargo feature so downstream crates that only
//! need the shared types do not pull in `reqwest`.

mod backend;
mod multipart;

pub use backend::BackendClient;

use reqwest::StatusCode;

use crate::objects::ApiErrorBody;

/// Errors produced by the SDK HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure (DNS, TLS, connection reset, timeout, …).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("api error: status {status}, body: {body}")]
    Api { status: StatusCode, body: String },

    /// Response body could not be deserialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The base URL could not be joined with the endpoint path.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    /// HTTP status of an API error, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status(),
            _ => None,
        }
    }

    /// The request did not complete within its timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Http(e) if e.is_timeout())
    }

    /// The request never reached the server or the connection dropped
    /// before a response arrived.
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            ClientError::Http(e) if !e.is_timeout() && (e.is_connect() || e.is_request() || e.is_body())
        )
    }

    /// The `error` (or `message`) field of a JSON error body.
    pub fn api_message(&self) -> Option<String> {
        let ClientError::Api { body, .. } = self else {
            return None;
        };
        let parsed: ApiErrorBody = serde_json::from_str(body).ok()?;
        parsed.error.or(parsed.message)
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ClientError> {
    let resp = ensure_success(resp).await?;
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(ClientError::Json)
}

async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Api { status, body });
    }
    Ok(resp)
}
