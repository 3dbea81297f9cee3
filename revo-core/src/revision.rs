//! Design update requests on an existing order.
//!
//! After a preview is available the customer can describe changes and attach
//! voice notes. This is a foreground action: one request, no retry.

use revo_sdk::client::{BackendClient, ClientError};
use revo_sdk::objects::UpdateForm;
use thiserror::Error;
use tracing::info;

use crate::draft::VoiceNote;
use crate::utils::attachments::{AttachmentError, read_file_part};

#[derive(Debug, Error)]
pub enum RevisionError {
    #[error("please enter a description")]
    EmptyDescription,

    #[error(transparent)]
    Attachment(#[from] AttachmentError),

    #[error("failed to submit update: {}", request_message(.0))]
    Request(#[from] ClientError),
}

fn request_message(error: &ClientError) -> String {
    error.api_message().unwrap_or_else(|| error.to_string())
}

/// A change request for one order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesignUpdate {
    pub order_id: String,
    pub description: String,
    pub voice_notes: Vec<VoiceNote>,
}

impl DesignUpdate {
    pub fn new(order_id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            description: description.into(),
            voice_notes: Vec::new(),
        }
    }

    pub fn with_voice_note(mut self, note: VoiceNote) -> Self {
        self.voice_notes.push(note);
        self
    }
}

/// Send `update` to the backend. Every voice note is attached.
pub async fn submit_update(client: &BackendClient, update: &DesignUpdate) -> Result<(), RevisionError> {
    let description = update.description.trim();
    if description.is_empty() {
        return Err(RevisionError::EmptyDescription);
    }

    let mut voice_messages = Vec::with_capacity(update.voice_notes.len());
    for note in &update.voice_notes {
        voice_messages.push(read_file_part(&note.path, note.mime()).await?);
    }

    let form = UpdateForm {
        order_id: update.order_id.clone(),
        description: description.to_owned(),
        voice_messages,
    };
    client.submit_update(&form).await?;

    info!(
        order_id = %update.order_id,
        voice_notes = update.voice_notes.len(),
        "Design update submitted"
    );
    Ok(())
}
