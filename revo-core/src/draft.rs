//! Order draft builder.
//!
//! Accumulates the selected services, reference images, voice notes and the
//! free-text brief for one booking, and decides whether the result may be
//! handed to the payment stage.

use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::recorder::{ActiveCapture, AudioRecorder, RecorderError};
use crate::utils::mime::mime_for_path;
use crate::utils::money::to_minor_units;

/// Reasons a draft may not be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("please enter a description")]
    EmptyDescription,

    #[error("no service option selected")]
    NoOptionsSelected,

    #[error("invalid amount {0}")]
    InvalidAmount(Decimal),

    #[error("a voice recording is still in progress")]
    RecordingInProgress,

    /// The draft total no longer matches the amount that was already paid.
    #[error("amount changed after payment: paid {paid} minor units, draft has {current}")]
    AmountChanged { paid: i64, current: i64 },
}

/// A reference image picked from the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub path: PathBuf,
    pub mime: &'static str,
}

impl Attachment {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mime = mime_for_path(&path);
        Self { path, mime }
    }
}

/// A completed voice recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceNote {
    pub path: PathBuf,
    pub duration: Duration,
}

impl VoiceNote {
    pub fn new(path: impl Into<PathBuf>, duration: Duration) -> Self {
        Self {
            path: path.into(),
            duration,
        }
    }

    pub fn mime(&self) -> &'static str {
        mime_for_path(&self.path)
    }

    /// Display length, e.g. `1:05`.
    pub fn duration_label(&self) -> String {
        format_duration(self.duration)
    }
}

/// Format a duration as `minutes:seconds`, rounded to the nearest second,
/// with zero-padded seconds.
pub fn format_duration(duration: Duration) -> String {
    let total = (duration.as_millis() + 500) / 1000;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Everything the customer has entered for one booking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingDraft {
    pub selected_options: Vec<String>,
    /// Total in major units.
    pub total_amount: Decimal,
    pub description: String,
    pub reference_images: Vec<Attachment>,
    pub voice_notes: Vec<VoiceNote>,
}

impl BookingDraft {
    /// The total converted to minor units; must be positive and whole.
    pub fn amount_minor_units(&self) -> Result<i64, ValidationError> {
        match to_minor_units(self.total_amount) {
            Some(minor) if minor > 0 => Ok(minor),
            _ => Err(ValidationError::InvalidAmount(self.total_amount)),
        }
    }
}

/// Result of [`DraftBuilder::toggle_recording`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordingToggle {
    Started,
    Stopped(VoiceNote),
}

/// Owns a [`BookingDraft`] and the recording currently in progress, if any.
#[derive(Default)]
pub struct DraftBuilder {
    draft: BookingDraft,
    recording: Option<Box<dyn ActiveCapture>>,
}

impl std::fmt::Debug for DraftBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraftBuilder")
            .field("draft", &self.draft)
            .field("recording", &self.recording.is_some())
            .finish()
    }
}

impl DraftBuilder {
    pub fn new(selected_options: Vec<String>, total_amount: Decimal) -> Self {
        Self {
            draft: BookingDraft {
                selected_options,
                total_amount,
                ..Default::default()
            },
            recording: None,
        }
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn set_selection(&mut self, selected_options: Vec<String>, total_amount: Decimal) {
        self.draft.selected_options = selected_options;
        self.draft.total_amount = total_amount;
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
    }

    /// Append a reference image. Duplicates are kept.
    pub fn add_image(&mut self, path: impl Into<PathBuf>) {
        let attachment = Attachment::new(path);
        debug!(path = %attachment.path.display(), mime = attachment.mime, "Reference image added");
        self.draft.reference_images.push(attachment);
    }

    pub fn remove_image(&mut self, path: &Path) {
        self.draft.reference_images.retain(|a| a.path != path);
    }

    /// Append a voice note recorded elsewhere.
    pub fn add_voice_note(&mut self, path: impl Into<PathBuf>, duration: Duration) {
        self.draft.voice_notes.push(VoiceNote::new(path, duration));
    }

    pub fn clear_voice_notes(&mut self) {
        self.draft.voice_notes.clear();
    }

    pub fn is_recording(&self) -> bool {
        self.recording.is_some()
    }

    /// Start a recording if none is active, otherwise stop the active one and
    /// append it to the voice notes.
    ///
    /// When stopping fails the capture handle is dropped, which releases the
    /// device, and the builder returns to the idle state.
    pub async fn toggle_recording(
        &mut self,
        recorder: &dyn AudioRecorder,
    ) -> Result<RecordingToggle, RecorderError> {
        match self.recording.take() {
            None => {
                let capture = recorder.start().await?;
                self.recording = Some(capture);
                debug!("Voice recording started");
                Ok(RecordingToggle::Started)
            }
            Some(capture) => {
                let audio = capture.stop().await?;
                let note = VoiceNote::new(audio.path, audio.duration);
                debug!(duration = %note.duration_label(), "Voice recording stopped");
                self.draft.voice_notes.push(note.clone());
                Ok(RecordingToggle::Stopped(note))
            }
        }
    }

    /// Check that the draft can go to payment.
    pub fn validate_for_submission(&self) -> Result<&BookingDraft, ValidationError> {
        if self.recording.is_some() {
            return Err(ValidationError::RecordingInProgress);
        }
        if self.draft.selected_options.is_empty() {
            return Err(ValidationError::NoOptionsSelected);
        }
        if self.draft.description.trim().is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        self.draft.amount_minor_units()?;
        Ok(&self.draft)
    }
}
