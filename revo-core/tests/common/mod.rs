// tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::{Multipart, Path as UrlPath, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use revo_core::config::BookingConfig;
use revo_core::payment::{GatewayError, PaymentGateway};
use revo_core::status::MediaLibrary;
use revo_core::utils::RetryPolicy;
use revo_sdk::client::BackendClient;
use revo_sdk::config::{BackendConfig, CustomerProfile};
use revo_sdk::objects::{CheckoutOptions, CheckoutSuccess};
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

pub const GATEWAY_ORDER_ID: &str = "order_Nx81test";
pub const GATEWAY_KEY: &str = "rzp_test_key";
pub const PAYMENT_ID: &str = "pay_Nx81paid";
pub const SIGNATURE: &str = "sig_ok";
pub const BOOKED_ORDER_ID: &str = "RT-1001";
pub const CUSTOMER_EMAIL: &str = "asha@example.com";

// --- Scripted replies ---

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
    pub delay: Option<Duration>,
}

impl Reply {
    pub fn ok(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body,
            delay: None,
        }
    }

    pub fn status(status: StatusCode) -> Self {
        Self {
            status,
            body: json!({ "error": status.canonical_reason().unwrap_or("error") }),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Hit counter plus a queue of scripted replies. Once the queue is empty
/// the endpoint falls back to its default reply.
#[derive(Default)]
pub struct Endpoint {
    hits: AtomicUsize,
    script: Mutex<VecDeque<Reply>>,
}

impl Endpoint {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn push(&self, reply: Reply) {
        self.script.lock().unwrap().push_back(reply);
    }

    pub fn push_n(&self, n: usize, reply: Reply) {
        for _ in 0..n {
            self.push(reply.clone());
        }
    }

    fn next(&self) -> Option<Reply> {
        self.hits.fetch_add(1, Ordering::SeqCst);
        self.script.lock().unwrap().pop_front()
    }

    async fn respond(&self, default: impl FnOnce() -> Reply) -> Response {
        let reply = self.next().unwrap_or_else(default);
        if let Some(delay) = reply.delay {
            tokio::time::sleep(delay).await;
        }
        (reply.status, Json(reply.body)).into_response()
    }
}

// --- Recorded requests ---

#[derive(Debug, Clone)]
pub struct ReceivedFile {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub size: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ReceivedForm {
    pub texts: HashMap<String, String>,
    pub files: Vec<ReceivedFile>,
}

impl ReceivedForm {
    pub fn files_in(&self, field: &str) -> Vec<&ReceivedFile> {
        self.files.iter().filter(|f| f.field == field).collect()
    }

    pub fn json(&self, field: &str) -> Value {
        self.texts
            .get(field)
            .map(|raw| serde_json::from_str(raw).unwrap())
            .unwrap_or(Value::Null)
    }
}

async fn read_form(mut multipart: Multipart) -> ReceivedForm {
    let mut form = ReceivedForm::default();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_owned();
        let file_name = field.file_name().map(str::to_owned);
        let content_type = field.content_type().unwrap_or_default().to_owned();
        let data = field.bytes().await.unwrap_or_default();
        match file_name {
            Some(file_name) => form.files.push(ReceivedFile {
                field: name,
                file_name,
                content_type,
                size: data.len(),
            }),
            None => {
                form.texts
                    .insert(name, String::from_utf8_lossy(&data).into_owned());
            }
        }
    }
    form
}

// --- Backend state and handlers ---

#[derive(Default)]
pub struct BackendState {
    pub create: Endpoint,
    pub complete: Endpoint,
    pub preview: Endpoint,
    pub show: Endpoint,
    pub update: Endpoint,
    pub media: Endpoint,

    pub create_bodies: Mutex<Vec<Value>>,
    pub completed_forms: Mutex<Vec<ReceivedForm>>,
    pub update_forms: Mutex<Vec<ReceivedForm>>,
    pub show_bodies: Mutex<Vec<Value>>,

    /// Order list returned by `/api/order/show/`.
    pub orders: Mutex<Vec<Value>>,
    /// `order_id -> preview_image` for `/api/order/preview_image/`.
    pub previews: Mutex<HashMap<String, Value>>,
    /// `path under /media/ -> bytes`.
    pub media_files: Mutex<HashMap<String, Vec<u8>>>,
}

type Shared = State<Arc<BackendState>>;

async fn create_order(State(state): Shared, Json(body): Json<Value>) -> Response {
    state.create_bodies.lock().unwrap().push(body);
    state
        .create
        .respond(|| {
            Reply::ok(json!({
                "data": { "order_id": GATEWAY_ORDER_ID, "key_id": GATEWAY_KEY }
            }))
        })
        .await
}

async fn complete_order(State(state): Shared, multipart: Multipart) -> Response {
    let form = read_form(multipart).await;
    state.completed_forms.lock().unwrap().push(form);
    state
        .complete
        .respond(|| Reply::ok(json!({ "status": "success", "order_id": BOOKED_ORDER_ID })))
        .await
}

async fn preview_image(State(state): Shared, Json(body): Json<Value>) -> Response {
    let order_id = body["order_id"].as_str().unwrap_or_default().to_owned();
    let preview = state.previews.lock().unwrap().get(&order_id).cloned();
    state
        .preview
        .respond(|| match preview {
            Some(preview_image) => Reply::ok(json!({ "preview_image": preview_image })),
            None => Reply::status(StatusCode::NOT_FOUND),
        })
        .await
}

async fn show_orders(State(state): Shared, Json(body): Json<Value>) -> Response {
    state.show_bodies.lock().unwrap().push(body);
    let orders = state.orders.lock().unwrap().clone();
    state.show.respond(|| Reply::ok(Value::Array(orders))).await
}

async fn submit_update(State(state): Shared, multipart: Multipart) -> Response {
    let form = read_form(multipart).await;
    state.update_forms.lock().unwrap().push(form);
    state
        .update
        .respond(|| Reply::ok(json!({ "message": "Update submitted" })))
        .await
}

async fn media(State(state): Shared, UrlPath(path): UrlPath<String>) -> Response {
    if let Some(reply) = state.media.next() {
        return (reply.status, Json(reply.body)).into_response();
    }
    let path = path.trim_start_matches('/');
    let bytes = state.media_files.lock().unwrap().get(path).cloned();
    match bytes {
        Some(bytes) => ([(header::CONTENT_TYPE, "image/jpeg")], bytes).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// In-process stand-in for the design-services backend.
pub struct FakeBackend {
    pub state: Arc<BackendState>,
    pub base_url: Url,
    task: JoinHandle<()>,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let state = Arc::new(BackendState::default());
        let router = Router::new()
            .route("/api/order/create/", post(create_order))
            .route("/api/order/complete/", post(complete_order))
            .route("/api/order/preview_image/", post(preview_image))
            .route("/api/order/show/", post(show_orders))
            .route("/api/order/submit-update/", post(submit_update))
            .route("/media/{*path}", get(media))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            state,
            base_url: Url::parse(&format!("http://{addr}/")).unwrap(),
            task,
        }
    }

    pub fn client(&self) -> BackendClient {
        self.client_with_timeout(Duration::from_secs(5))
    }

    pub fn client_with_timeout(&self, timeout: Duration) -> BackendClient {
        let config =
            BackendConfig::new(self.base_url.clone()).with_timeouts(timeout, timeout, timeout);
        BackendClient::new(config)
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// A base URL nothing listens on.
pub async fn unreachable_client() -> BackendClient {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let config = BackendConfig::new(Url::parse(&format!("http://{addr}/")).unwrap());
    BackendClient::new(config)
}

// --- Booking fixtures ---

pub fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(3, Duration::from_millis(1), Duration::from_millis(5))
}

pub fn booking_config() -> BookingConfig {
    BookingConfig {
        intent_retry: fast_retry(),
        finalize_retry: fast_retry(),
        ..BookingConfig::default()
    }
}

pub fn customer() -> CustomerProfile {
    CustomerProfile::new(CUSTOMER_EMAIL, "Asha", "9000000000")
}

#[derive(Debug, Clone)]
pub enum GatewayBehaviour {
    Approve,
    Cancel,
    Fail(String),
    /// Report a payment for some other order.
    WrongOrder,
}

pub struct ScriptedGateway {
    behaviour: GatewayBehaviour,
    calls: AtomicUsize,
    pub last_options: Mutex<Option<CheckoutOptions>>,
}

impl ScriptedGateway {
    pub fn new(behaviour: GatewayBehaviour) -> Arc<Self> {
        Arc::new(Self {
            behaviour,
            calls: AtomicUsize::new(0),
            last_options: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    async fn checkout(&self, options: CheckoutOptions) -> Result<CheckoutSuccess, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let order_id = options.order_id.clone();
        *self.last_options.lock().unwrap() = Some(options);

        match &self.behaviour {
            GatewayBehaviour::Approve => Ok(CheckoutSuccess {
                razorpay_payment_id: PAYMENT_ID.into(),
                razorpay_order_id: order_id,
                razorpay_signature: SIGNATURE.into(),
            }),
            GatewayBehaviour::Cancel => Err(GatewayError::Cancelled),
            GatewayBehaviour::Fail(reason) => Err(GatewayError::Failed(reason.clone())),
            GatewayBehaviour::WrongOrder => Ok(CheckoutSuccess {
                razorpay_payment_id: PAYMENT_ID.into(),
                razorpay_order_id: "order_someone_else".into(),
                razorpay_signature: SIGNATURE.into(),
            }),
        }
    }
}

/// Media library backed by a temporary directory.
pub struct TempLibrary {
    pub root: tempfile::TempDir,
    granted: bool,
    permission_requests: AtomicUsize,
    fail_save: AtomicBool,
}

impl TempLibrary {
    pub fn new(granted: bool) -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
            granted,
            permission_requests: AtomicUsize::new(0),
            fail_save: AtomicBool::new(false),
        }
    }

    pub fn failing_save(self) -> Self {
        self.fail_save.store(true, Ordering::SeqCst);
        self
    }

    pub fn permission_requests(&self) -> usize {
        self.permission_requests.load(Ordering::SeqCst)
    }

    pub fn library_dir(&self) -> PathBuf {
        self.root.path().join("library")
    }

    /// Every file left anywhere under the root.
    pub fn all_files(&self) -> Vec<PathBuf> {
        fn walk(dir: &Path, out: &mut Vec<PathBuf>) {
            let Ok(entries) = std::fs::read_dir(dir) else {
                return;
            };
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    walk(&path, out);
                } else {
                    out.push(path);
                }
            }
        }
        let mut files = Vec::new();
        walk(self.root.path(), &mut files);
        files
    }
}

#[async_trait]
impl MediaLibrary for TempLibrary {
    async fn request_write_permission(&self) -> std::io::Result<bool> {
        self.permission_requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.granted)
    }

    fn staging_dir(&self) -> PathBuf {
        self.root.path().join(".staging")
    }

    async fn save(&self, staged: &Path, file_name: &str) -> std::io::Result<PathBuf> {
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(std::io::Error::other("library is read-only"));
        }
        let dir = self.library_dir();
        tokio::fs::create_dir_all(&dir).await?;
        let target = dir.join(file_name);
        tokio::fs::rename(staged, &target).await?;
        Ok(target)
    }
}

/// Write a few small attachment files into a fresh temp dir.
pub fn attachment_files() -> (tempfile::TempDir, PathBuf, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("reference.jpg");
    let voice_a = dir.path().join("brief-1.m4a");
    let voice_b = dir.path().join("brief-2.m4a");
    std::fs::write(&image, vec![0xFFu8; 2048]).unwrap();
    std::fs::write(&voice_a, vec![1u8; 512]).unwrap();
    std::fs::write(&voice_b, vec![2u8; 256]).unwrap();
    (dir, image, voice_a, voice_b)
}
