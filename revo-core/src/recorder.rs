//! Audio capture seam.
//!
//! The capture device is platform specific, so the draft builder talks to it
//! through [`AudioRecorder`]. Starting a capture hands out an
//! [`ActiveCapture`] that owns the device until it is stopped or dropped.

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors reported by an audio recorder.
#[derive(Debug, Error)]
pub enum RecorderError {
    /// The user has not granted microphone access.
    #[error("microphone permission denied")]
    PermissionDenied,

    /// Another capture already holds the device.
    #[error("audio device is busy")]
    DeviceBusy,

    /// The capture failed mid-way or could not be finalized.
    #[error("audio capture failed: {0}")]
    Capture(String),
}

/// A finished recording on local storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedAudio {
    pub path: PathBuf,
    pub duration: Duration,
}

/// Starts audio captures.
#[async_trait]
pub trait AudioRecorder: Send + Sync {
    /// Acquire the capture device and start recording.
    async fn start(&self) -> Result<Box<dyn ActiveCapture>, RecorderError>;
}

/// A capture in progress.
///
/// Implementations must release the capture device when the value is
/// dropped, so a failed [`stop`](ActiveCapture::stop) never leaves the
/// device held.
#[async_trait]
pub trait ActiveCapture: Send + Sync {
    /// Stop recording and return the finished file.
    async fn stop(self: Box<Self>) -> Result<CapturedAudio, RecorderError>;
}
