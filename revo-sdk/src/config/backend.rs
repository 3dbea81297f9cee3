//! Backend connection configuration.

use std::time::Duration;
use url::Url;

/// Default timeout for small JSON requests.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Default timeout for the multipart order finalization request.
pub const DEFAULT_FINALIZATION_TIMEOUT: Duration = Duration::from_secs(60);
/// Default timeout for preview image downloads.
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// Where the backend lives and how long each kind of request may take.
///
/// The base URL may carry a path prefix (e.g. `https://host/revotouch/`);
/// endpoints are always joined relative to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    base_url: Url,
    /// Timeout for JSON requests (order creation, status, preview lookup).
    pub request_timeout: Duration,
    /// Timeout for each order finalization attempt.
    pub finalization_timeout: Duration,
    /// Timeout for downloading a preview image.
    pub download_timeout: Duration,
}

impl BackendConfig {
    /// Create a config with default timeouts.
    pub fn new(mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            base_url,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            finalization_timeout: DEFAULT_FINALIZATION_TIMEOUT,
            download_timeout: DEFAULT_DOWNLOAD_TIMEOUT,
        }
    }

    pub fn with_timeouts(
        mut self,
        request: Duration,
        finalization: Duration,
        download: Duration,
    ) -> Self {
        self.request_timeout = request;
        self.finalization_timeout = finalization;
        self.download_timeout = download;
        self
    }

    /// The normalized base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Join an API path such as `/api/order/create/` onto the base URL,
    /// keeping any path prefix the base URL carries.
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path.trim_start_matches('/'))
    }

    /// Resolve a media reference returned by the backend.
    ///
    /// Absolute `http(s)` URLs are used as-is and protocol-relative ones
    /// (`//cdn.example.com/a.png`) take the base URL's scheme. Anything else
    /// is treated as a path under the base URL, so `/media/x.jpg` becomes
    /// `<BASE_URL>/media/x.jpg`.
    pub fn resolve_media_url(&self, raw: &str) -> Result<Url, url::ParseError> {
        let raw = raw.trim();
        if let Ok(url) = Url::parse(raw) {
            if matches!(url.scheme(), "http" | "https") {
                return Ok(url);
            }
        }
        if raw.starts_with("//") {
            return self.base_url.join(raw);
        }
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = raw.trim_start_matches('/');
        Url::parse(&format!("{base}/{path}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base: &str) -> BackendConfig {
        BackendConfig::new(Url::parse(base).unwrap())
    }

    #[test]
    fn test_endpoint_keeps_path_prefix() {
        let cfg = config("http://radbodesigns.com/revotouch");
        assert_eq!(
            cfg.endpoint("/api/order/create/").unwrap().as_str(),
            "http://radbodesigns.com/revotouch/api/order/create/"
        );

        let cfg = config("http://127.0.0.1:8000/");
        assert_eq!(
            cfg.endpoint("api/order/show/").unwrap().as_str(),
            "http://127.0.0.1:8000/api/order/show/"
        );
    }

    #[test]
    fn test_resolve_media_url() {
        let cfg = config("https://designs.example.com");
        assert_eq!(
            cfg.resolve_media_url("/media/x.jpg").unwrap().as_str(),
            "https://designs.example.com/media/x.jpg"
        );
        assert_eq!(
            cfg.resolve_media_url("https://cdn.example.com/a.png")
                .unwrap()
                .as_str(),
            "https://cdn.example.com/a.png"
        );

        assert_eq!(
            cfg.resolve_media_url("HTTPS://CDN.example.com/a.png")
                .unwrap()
                .as_str(),
            "https://cdn.example.com/a.png"
        );
        assert_eq!(
            cfg.resolve_media_url("//cdn.example.com/a.png")
                .unwrap()
                .as_str(),
            "https://cdn.example.com/a.png"
        );

        let prefixed = config("http://radbodesigns.com/revotouch/");
        assert_eq!(
            prefixed.resolve_media_url("/media/x.jpg").unwrap().as_str(),
            "http://radbodesigns.com/revotouch/media/x.jpg"
        );
    }
}
