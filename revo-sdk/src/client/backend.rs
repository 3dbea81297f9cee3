//! Backend API client (mobile client → design-services backend).
//!
//! Every request carries an explicit timeout taken from [`BackendConfig`].

use reqwest::Client;

use super::{ClientError, ensure_success, parse_response};
use crate::config::BackendConfig;
use crate::objects::{
    CompleteOrderForm, CompleteOrderResponse, CreateOrderRequest, CreateOrderResponse,
    CreatedOrder, OrderSummary, PreviewImageRequest, PreviewImageResponse, ShowOrdersRequest,
    UpdateForm,
};

const CREATE_ORDER: &str = "/api/order/create/";
const COMPLETE_ORDER: &str = "/api/order/complete/";
const PREVIEW_IMAGE: &str = "/api/order/preview_image/";
const SHOW_ORDERS: &str = "/api/order/show/";
const SUBMIT_UPDATE: &str = "/api/order/submit-update/";

/// Typed HTTP client for the design-services backend.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    config: BackendConfig,
}

impl BackendClient {
    /// Create a new `BackendClient`.
    pub fn new(config: BackendConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure a proxy). Per-request timeouts still apply.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// `POST /api/order/create/` – create the gateway order for a payment.
    pub async fn create_order(
        &self,
        request: &CreateOrderRequest,
    ) -> Result<CreatedOrder, ClientError> {
        let url = self.config.endpoint(CREATE_ORDER)?;

        let resp = self
            .http
            .post(url)
            .timeout(self.config.request_timeout)
            .json(request)
            .send()
            .await?;

        let created: CreateOrderResponse = parse_response(resp).await?;
        Ok(created.data)
    }

    /// `POST /api/order/complete/` – finalize a paid booking with its
    /// attachments.
    pub async fn complete_order(
        &self,
        form: &CompleteOrderForm,
    ) -> Result<CompleteOrderResponse, ClientError> {
        let url = self.config.endpoint(COMPLETE_ORDER)?;

        let resp = self
            .http
            .post(url)
            .timeout(self.config.finalization_timeout)
            .header(reqwest::header::ACCEPT, "application/json")
            .multipart(form.to_multipart()?)
            .send()
            .await?;

        let resp = ensure_success(resp).await?;
        let bytes = resp.bytes().await?;
        // Success is decided by the status code; the body is informational.
        Ok(serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Order completion body is not the expected JSON");
            CompleteOrderResponse::default()
        }))
    }

    /// `POST /api/order/preview_image/` – look up the preview of an order.
    pub async fn preview_image(
        &self,
        order_id: &str,
    ) -> Result<PreviewImageResponse, ClientError> {
        let url = self.config.endpoint(PREVIEW_IMAGE)?;

        let resp = self
            .http
            .post(url)
            .timeout(self.config.request_timeout)
            .json(&PreviewImageRequest {
                order_id: order_id.to_owned(),
            })
            .send()
            .await?;

        parse_response(resp).await
    }

    /// `POST /api/order/show/` – list the orders placed with `email`.
    pub async fn show_orders(&self, email: &str) -> Result<Vec<OrderSummary>, ClientError> {
        let url = self.config.endpoint(SHOW_ORDERS)?;

        let resp = self
            .http
            .post(url)
            .timeout(self.config.request_timeout)
            .json(&ShowOrdersRequest {
                email: email.to_owned(),
            })
            .send()
            .await?;

        parse_response(resp).await
    }

    /// `POST /api/order/submit-update/` – request changes to a design.
    pub async fn submit_update(&self, form: &UpdateForm) -> Result<(), ClientError> {
        let url = self.config.endpoint(SUBMIT_UPDATE)?;

        let resp = self
            .http
            .post(url)
            .timeout(self.config.finalization_timeout)
            .header(reqwest::header::ACCEPT, "application/json")
            .multipart(form.to_multipart()?)
            .send()
            .await?;

        ensure_success(resp).await?;
        Ok(())
    }

    /// `GET <url>` – start downloading a media file.
    ///
    /// Returns the response once the status is known to be successful so the
    /// caller can stream the body with [`reqwest::Response::chunk`].
    pub async fn download(&self, url: url::Url) -> Result<reqwest::Response, ClientError> {
        let resp = self
            .http
            .get(url)
            .timeout(self.config.download_timeout)
            .send()
            .await?;

        ensure_success(resp).await
    }
}
