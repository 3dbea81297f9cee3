//! Order finalization submitter.
//!
//! Sends the paid booking (payment proof, attachments, booking details) to
//! the backend as one multipart request. Retries only repeat this request;
//! they never touch payment creation.

use revo_sdk::client::{BackendClient, ClientError};
use revo_sdk::objects::{BookingDetails, CompleteOrderForm, FilePart};
use thiserror::Error;
use tracing::info;

use crate::draft::BookingDraft;
use crate::payment::PaymentProof;
use crate::utils::attachments::{AttachmentError, read_file_part};
use crate::utils::{RetryFailure, RetryPolicy, retry_with_backoff};

/// Failure classes of a finalization attempt.
#[derive(Debug, Error)]
pub enum FinalizeError {
    #[error("finalization timed out")]
    Timeout,

    #[error("network unreachable: {0}")]
    NetworkUnreachable(#[source] ClientError),

    #[error("attachments are too large to upload")]
    PayloadTooLarge,

    #[error("server error (status {status})")]
    ServerError { status: u16, message: Option<String> },

    /// Any other non-2xx answer.
    #[error("finalization rejected (status {status})")]
    Rejected { status: u16, message: Option<String> },

    #[error(transparent)]
    Attachment(#[from] AttachmentError),

    #[error("request could not be built: {0}")]
    Client(#[source] ClientError),
}

impl FinalizeError {
    /// Only timeouts, unreachable networks and server errors are retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FinalizeError::Timeout
                | FinalizeError::NetworkUnreachable(_)
                | FinalizeError::ServerError { .. }
        )
    }
}

impl From<ClientError> for FinalizeError {
    fn from(error: ClientError) -> Self {
        if error.is_timeout() {
            return FinalizeError::Timeout;
        }
        if let Some(status) = error.status() {
            let message = error.api_message();
            return match status.as_u16() {
                413 => FinalizeError::PayloadTooLarge,
                s if status.is_server_error() => FinalizeError::ServerError { status: s, message },
                s => FinalizeError::Rejected { status: s, message },
            };
        }
        if error.is_unreachable() {
            return FinalizeError::NetworkUnreachable(error);
        }
        FinalizeError::Client(error)
    }
}

/// A finalization the backend accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finalized {
    /// Identifier of the booked order, when the backend reports one.
    pub order_id: Option<String>,
    pub attempts: u32,
}

pub struct FinalizationSubmitter {
    client: BackendClient,
    policy: RetryPolicy,
}

impl FinalizationSubmitter {
    pub fn new(client: BackendClient, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// Submit `draft` together with `proof`.
    ///
    /// Attachments are read once; a file that cannot be read fails the call
    /// before any request (reported with `attempts == 0`). Every voice note
    /// is sent.
    pub async fn submit(
        &self,
        draft: &BookingDraft,
        proof: &PaymentProof,
        email: &str,
    ) -> Result<Finalized, RetryFailure<FinalizeError>> {
        let form = build_form(draft, proof, email)
            .await
            .map_err(|e| RetryFailure {
                error: FinalizeError::from(e),
                attempts: 0,
            })?;

        info!(
            order_id = %proof.order_id,
            payment_id = %proof.payment_id,
            images = form.images.len(),
            recordings = form.recordings.len(),
            bytes = form.attachment_bytes(),
            "Submitting order finalization"
        );

        let (response, attempts) = retry_with_backoff(
            &self.policy,
            "complete_order",
            FinalizeError::is_retryable,
            |attempt| {
                let form = &form;
                async move {
                    self.client
                        .complete_order(form)
                        .await
                        .map(|resp| (resp, attempt))
                        .map_err(FinalizeError::from)
                }
            },
        )
        .await?;

        let order_id = response.order_id().map(str::to_owned);
        info!(
            order_id = ?order_id,
            payment_id = %proof.payment_id,
            attempts = attempts,
            "Order finalized"
        );

        Ok(Finalized { order_id, attempts })
    }
}

async fn build_form(
    draft: &BookingDraft,
    proof: &PaymentProof,
    email: &str,
) -> Result<CompleteOrderForm, AttachmentError> {
    let mut images: Vec<FilePart> = Vec::with_capacity(draft.reference_images.len());
    for image in &draft.reference_images {
        images.push(read_file_part(&image.path, image.mime).await?);
    }

    let mut recordings: Vec<FilePart> = Vec::with_capacity(draft.voice_notes.len());
    for note in &draft.voice_notes {
        recordings.push(read_file_part(&note.path, note.mime()).await?);
    }

    Ok(CompleteOrderForm {
        payment_id: proof.payment_id.clone(),
        order_id: proof.order_id.clone(),
        signature: proof.signature.clone(),
        images,
        recordings,
        booking_details: BookingDetails {
            amount: draft.total_amount,
            options: draft.selected_options.clone(),
            description: draft.description.trim().to_owned(),
            email: email.to_owned(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn api_error(status: StatusCode) -> ClientError {
        ClientError::Api {
            status,
            body: r#"{"error": "boom"}"#.to_string(),
        }
    }

    #[test]
    fn test_classification() {
        assert!(matches!(
            FinalizeError::from(api_error(StatusCode::PAYLOAD_TOO_LARGE)),
            FinalizeError::PayloadTooLarge
        ));
        assert!(matches!(
            FinalizeError::from(api_error(StatusCode::BAD_GATEWAY)),
            FinalizeError::ServerError { status: 502, .. }
        ));
        let rejected = FinalizeError::from(api_error(StatusCode::BAD_REQUEST));
        assert!(matches!(
            &rejected,
            FinalizeError::Rejected { status: 400, message: Some(m) } if m == "boom"
        ));
    }

    #[test]
    fn test_retryable_classes() {
        assert!(FinalizeError::Timeout.is_retryable());
        assert!(
            FinalizeError::ServerError {
                status: 500,
                message: None
            }
            .is_retryable()
        );
        assert!(!FinalizeError::PayloadTooLarge.is_retryable());
        assert!(
            !FinalizeError::Rejected {
                status: 400,
                message: None
            }
            .is_retryable()
        );
    }
}
