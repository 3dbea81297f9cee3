// tests/status_tests.rs
mod common;

use axum::http::StatusCode;
use common::*;
use revo_core::status::{DesignStatusPoller, DownloadError, DownloadProgress, ProgressStep, StatusError};
use revo_sdk::objects::DesignStatus;
use serde_json::json;

fn seed_orders(backend: &FakeBackend) {
    *backend.state.orders.lock().unwrap() = vec![
        json!({
            "order_id": 42,
            "custom_order_id": "RT-0042",
            "checked_option": "Logo Design (Single Option)",
            "order_date": "2024-11-02",
            "delivery_date": "2024-11-04T18:00:00Z",
            "order_status": 3,
            "preview_image": "/media/previews/42.jpg"
        }),
        json!({
            "order_id": "43",
            "checked_option": "Flyer",
            "order_status": 1,
            "preview_image": null
        }),
    ];
}

#[tokio::test]
async fn test_fetch_status_is_idempotent() {
    let backend = FakeBackend::start().await;
    seed_orders(&backend);
    let poller = DesignStatusPoller::new(backend.client(), CUSTOMER_EMAIL);

    let first = poller.fetch_status("42").await.unwrap();
    let second = poller.fetch_status("42").await.unwrap();
    assert_eq!(first, second);
    assert_eq!(backend.state.show.hits(), 2);
    assert_eq!(backend.state.show_bodies.lock().unwrap()[0]["email"], CUSTOMER_EMAIL);

    assert_eq!(first.status, DesignStatus::Correction);
    assert_eq!(first.progress_step(), ProgressStep::Testing);
    assert_eq!(
        first.preview_image_url.clone().unwrap(),
        backend.base_url.join("media/previews/42.jpg").unwrap()
    );
    assert_eq!(first.delivery_date().unwrap().day(), 4);
}

#[tokio::test]
async fn test_fetch_status_by_custom_order_id() {
    let backend = FakeBackend::start().await;
    seed_orders(&backend);
    let poller = DesignStatusPoller::new(backend.client(), CUSTOMER_EMAIL);

    let status = poller.fetch_status("RT-0042").await.unwrap();
    assert_eq!(status.order_id, "42");

    let orders = poller.list_orders().await.unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[1].progress_step(), ProgressStep::Design);
    assert!(orders[1].preview_image_url.is_none());
}

#[tokio::test]
async fn test_unknown_order_is_not_found() {
    let backend = FakeBackend::start().await;
    seed_orders(&backend);
    let poller = DesignStatusPoller::new(backend.client(), CUSTOMER_EMAIL);

    let err = poller.fetch_status("999").await.unwrap_err();
    assert!(matches!(err, StatusError::NotFound(ref id) if id == "999"));
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_status_server_error_is_reported() {
    let backend = FakeBackend::start().await;
    backend
        .state
        .show
        .push(Reply::status(StatusCode::INTERNAL_SERVER_ERROR));
    let poller = DesignStatusPoller::new(backend.client(), CUSTOMER_EMAIL);

    let err = poller.fetch_status("42").await.unwrap_err();
    assert!(matches!(err, StatusError::Network(_)));
    assert!(!err.is_not_found());
    // No retry on the read path.
    assert_eq!(backend.state.show.hits(), 1);
}

#[tokio::test]
async fn test_preview_relative_path_resolves_against_base_url() {
    let backend = FakeBackend::start().await;
    backend
        .state
        .previews
        .lock()
        .unwrap()
        .insert("42".into(), json!("/media/x.jpg"));
    let poller = DesignStatusPoller::new(backend.client(), CUSTOMER_EMAIL);

    let url = poller.fetch_preview_image("42").await.unwrap();
    assert_eq!(url.as_str(), format!("{}media/x.jpg", backend.base_url));
}

#[tokio::test]
async fn test_preview_absolute_url_is_kept() {
    let backend = FakeBackend::start().await;
    backend
        .state
        .previews
        .lock()
        .unwrap()
        .insert("42".into(), json!("https://cdn.example.com/designs/42.png"));
    let poller = DesignStatusPoller::new(backend.client(), CUSTOMER_EMAIL);

    let url = poller.fetch_preview_image("42").await.unwrap();
    assert_eq!(url.as_str(), "https://cdn.example.com/designs/42.png");
}

#[tokio::test]
async fn test_missing_preview() {
    let backend = FakeBackend::start().await;
    backend
        .state
        .previews
        .lock()
        .unwrap()
        .insert("43".into(), serde_json::Value::Null);
    let poller = DesignStatusPoller::new(backend.client(), CUSTOMER_EMAIL);

    let err = poller.fetch_preview_image("43").await.unwrap_err();
    assert!(matches!(err, StatusError::NoPreview(_)));

    // The backend answers 404 for orders it does not know.
    let err = poller.fetch_preview_image("999").await.unwrap_err();
    assert!(matches!(err, StatusError::NotFound(_)));
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_download_saves_into_library() {
    let backend = FakeBackend::start().await;
    let image = vec![7u8; 64 * 1024];
    backend
        .state
        .media_files
        .lock()
        .unwrap()
        .insert("previews/42.jpg".into(), image.clone());
    let poller = DesignStatusPoller::new(backend.client(), CUSTOMER_EMAIL);
    let library = TempLibrary::new(true);
    let url = backend.base_url.join("media/previews/42.jpg").unwrap();

    let mut updates: Vec<DownloadProgress> = Vec::new();
    let saved = poller
        .download_preview_image(url, &library, |p| updates.push(p))
        .await
        .unwrap();

    assert_eq!(saved, library.library_dir().join("42.jpg"));
    assert_eq!(std::fs::read(&saved).unwrap(), image);
    assert_eq!(library.all_files(), vec![saved]);

    let last = updates.last().unwrap();
    assert_eq!(last.received, image.len() as u64);
    assert_eq!(last.total, Some(image.len() as u64));
    assert!(updates.windows(2).all(|w| w[0].received <= w[1].received));
}

#[tokio::test]
async fn test_download_requires_permission() {
    let backend = FakeBackend::start().await;
    let poller = DesignStatusPoller::new(backend.client(), CUSTOMER_EMAIL);
    let library = TempLibrary::new(false);
    let url = backend.base_url.join("media/previews/42.jpg").unwrap();

    let err = poller
        .download_preview_image(url, &library, |_| {})
        .await
        .unwrap_err();

    assert!(matches!(err, DownloadError::PermissionDenied));
    assert_eq!(library.permission_requests(), 1);
    assert_eq!(backend.state.media.hits(), 0);
    assert!(library.all_files().is_empty());
}

#[tokio::test]
async fn test_failed_download_leaves_no_file() {
    let backend = FakeBackend::start().await;
    backend
        .state
        .media
        .push(Reply::status(StatusCode::INTERNAL_SERVER_ERROR));
    let poller = DesignStatusPoller::new(backend.client(), CUSTOMER_EMAIL);
    let library = TempLibrary::new(true);
    let url = backend.base_url.join("media/previews/42.jpg").unwrap();

    let err = poller
        .download_preview_image(url, &library, |_| {})
        .await
        .unwrap_err();

    assert!(matches!(err, DownloadError::Request(_)));
    assert!(library.all_files().is_empty());
}

#[tokio::test]
async fn test_failed_save_removes_staged_file() {
    let backend = FakeBackend::start().await;
    backend
        .state
        .media_files
        .lock()
        .unwrap()
        .insert("previews/42.jpg".into(), vec![1u8; 4096]);
    let poller = DesignStatusPoller::new(backend.client(), CUSTOMER_EMAIL);
    let library = TempLibrary::new(true).failing_save();
    let url = backend.base_url.join("media/previews/42.jpg").unwrap();

    let err = poller
        .download_preview_image(url, &library, |_| {})
        .await
        .unwrap_err();

    assert!(matches!(err, DownloadError::Io(_)));
    assert!(library.all_files().is_empty());
}
