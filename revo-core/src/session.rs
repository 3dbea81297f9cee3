//! Booking session.
//!
//! A [`BookingSession`] owns the draft and the progress of one booking
//! attempt and is passed by `&mut` through the pipeline stages:
//!
//! 1. validate the draft (never touches the network)
//! 2. create the payment intent (retried on transient failures)
//! 3. open the gateway and wait for the customer
//! 4. finalize the order (retried, never repeats steps 2 and 3)
//!
//! Once a payment is captured the session keeps the proof. Submitting again
//! only re-runs step 4.

use revo_sdk::client::BackendClient;
use revo_sdk::config::CustomerProfile;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::BookingConfig;
use crate::draft::{BookingDraft, DraftBuilder, ValidationError};
use crate::events::{BookingStage, StageReceiver, StageSender, stage_channel};
use crate::finalize::{FinalizationSubmitter, FinalizeError};
use crate::payment::{GatewayError, IntentError, PaymentCoordinator, PaymentGateway, PaymentIntent, PaymentProof};

/// Why a booking attempt ended before any money was taken.
#[derive(Debug)]
pub enum FailureReason {
    OrderCreation(IntentError),
    Payment(GatewayError),
}

impl FailureReason {
    pub fn code(&self) -> &'static str {
        match self {
            FailureReason::OrderCreation(_) => "order-creation",
            FailureReason::Payment(_) => "payment",
        }
    }
}

/// Outcome of a booking attempt.
#[derive(Debug)]
pub enum SubmissionResult {
    Pending,
    Succeeded {
        order_id: Option<String>,
        proof: PaymentProof,
    },
    Failed(FailureReason),
    /// Payment captured but the backend did not confirm the order. The proof
    /// is kept for support reconciliation.
    SucceededButUnconfirmed {
        proof: PaymentProof,
        failure: FinalizeError,
        attempts: u32,
    },
}

impl SubmissionResult {
    /// The payment id, whenever money has been taken.
    pub fn payment_id(&self) -> Option<&str> {
        match self {
            SubmissionResult::Succeeded { proof, .. }
            | SubmissionResult::SucceededButUnconfirmed { proof, .. } => {
                Some(proof.payment_id.as_str())
            }
            _ => None,
        }
    }

    /// One message for the customer. Failures before capture say nothing was
    /// charged; failures after capture name the payment id for support.
    pub fn user_message(&self) -> String {
        match self {
            SubmissionResult::Pending => "Your booking has not been submitted yet.".to_owned(),
            SubmissionResult::Succeeded { order_id: Some(id), .. } => {
                format!("Booking confirmed. Your order id is {id}.")
            }
            SubmissionResult::Succeeded { order_id: None, .. } => "Booking confirmed.".to_owned(),
            SubmissionResult::Failed(FailureReason::OrderCreation(_)) => {
                "We could not start the payment. Nothing was charged, please try again.".to_owned()
            }
            SubmissionResult::Failed(FailureReason::Payment(GatewayError::Cancelled)) => {
                "Payment cancelled. Nothing was charged, you can try again.".to_owned()
            }
            SubmissionResult::Failed(FailureReason::Payment(GatewayError::OrderMismatch {
                actual,
                ..
            })) => format!(
                "The payment could not be matched to this booking. If you were charged, \
                 contact support with order reference {actual}."
            ),
            SubmissionResult::Failed(FailureReason::Payment(e)) => {
                format!("Payment did not go through ({e}). Nothing was charged, please try again.")
            }
            SubmissionResult::SucceededButUnconfirmed {
                proof,
                failure: FinalizeError::PayloadTooLarge,
                ..
            } => format!(
                "Your payment succeeded (payment id {}), but the attachments are too large to \
                 upload. Remove some attachments and submit again, or contact support with this \
                 payment id.",
                proof.payment_id
            ),
            SubmissionResult::SucceededButUnconfirmed { proof, .. } => format!(
                "Your payment succeeded but we could not confirm your booking. Please contact \
                 support with payment id {} (order {}).",
                proof.payment_id, proof.order_id
            ),
        }
    }
}

/// The stage services a session runs through.
pub struct BookingPipeline {
    coordinator: PaymentCoordinator,
    submitter: FinalizationSubmitter,
    gateway: Arc<dyn PaymentGateway>,
    customer: CustomerProfile,
}

impl BookingPipeline {
    pub fn new(
        client: BackendClient,
        config: BookingConfig,
        gateway: Arc<dyn PaymentGateway>,
        customer: CustomerProfile,
    ) -> Self {
        let submitter = FinalizationSubmitter::new(client.clone(), config.finalize_retry);
        Self {
            coordinator: PaymentCoordinator::new(client, config),
            submitter,
            gateway,
            customer,
        }
    }

    pub fn customer(&self) -> &CustomerProfile {
        &self.customer
    }
}

pub struct BookingSession {
    id: Uuid,
    builder: DraftBuilder,
    stage_tx: StageSender,
    intent: Option<PaymentIntent>,
    proof: Option<PaymentProof>,
    result: SubmissionResult,
}

impl BookingSession {
    pub fn new(selected_options: Vec<String>, total_amount: Decimal) -> Self {
        let (stage_tx, _) = stage_channel();
        Self {
            id: Uuid::now_v7(),
            builder: DraftBuilder::new(selected_options, total_amount),
            stage_tx,
            intent: None,
            proof: None,
            result: SubmissionResult::Pending,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn draft(&self) -> &BookingDraft {
        self.builder.draft()
    }

    /// Mutable access to the draft, e.g. to drop attachments after a
    /// `PayloadTooLarge` finalization failure.
    pub fn draft_mut(&mut self) -> &mut DraftBuilder {
        &mut self.builder
    }

    pub fn stage(&self) -> BookingStage {
        *self.stage_tx.borrow()
    }

    /// Watch stage transitions.
    pub fn subscribe(&self) -> StageReceiver {
        self.stage_tx.subscribe()
    }

    pub fn intent(&self) -> Option<&PaymentIntent> {
        self.intent.as_ref()
    }

    pub fn proof(&self) -> Option<&PaymentProof> {
        self.proof.as_ref()
    }

    pub fn result(&self) -> &SubmissionResult {
        &self.result
    }

    fn set_stage(&self, stage: BookingStage) {
        info!(session = %self.id, stage = %stage, "Booking stage changed");
        // Nobody listening is fine.
        self.stage_tx.send_replace(stage);
    }

    /// Run the booking.
    ///
    /// Validation errors are returned before any request. Everything that
    /// happens after validation is reported through the returned
    /// [`SubmissionResult`].
    #[instrument(skip_all, fields(session = %self.id))]
    pub async fn submit(
        &mut self,
        pipeline: &BookingPipeline,
    ) -> Result<&SubmissionResult, ValidationError> {
        if self.stage() == BookingStage::Succeeded {
            return Ok(&self.result);
        }

        let draft = self.builder.validate_for_submission()?.clone();
        let amount = draft.amount_minor_units()?;

        if self.proof.is_some() {
            return self.retry_finalization(pipeline).await;
        }

        if let Some(proof) = self.pay(pipeline, &draft, amount).await {
            self.finalize(pipeline, &draft, proof).await;
        }
        Ok(&self.result)
    }

    /// Re-run only the finalization of an already captured payment, e.g.
    /// after removing attachments that were too large.
    ///
    /// Without a captured payment this does nothing and returns the current
    /// result. The draft total must still match the paid amount.
    #[instrument(skip_all, fields(session = %self.id))]
    pub async fn retry_finalization(
        &mut self,
        pipeline: &BookingPipeline,
    ) -> Result<&SubmissionResult, ValidationError> {
        let Some(proof) = self.proof.clone() else {
            return Ok(&self.result);
        };
        if self.stage() == BookingStage::Succeeded {
            return Ok(&self.result);
        }

        let draft = self.builder.validate_for_submission()?.clone();
        let amount = draft.amount_minor_units()?;
        let paid = self.intent.as_ref().map_or(amount, |i| i.amount_minor_units);
        if paid != amount {
            return Err(ValidationError::AmountChanged {
                paid,
                current: amount,
            });
        }

        info!(payment_id = %proof.payment_id, "Retrying order finalization");
        self.finalize(pipeline, &draft, proof).await;
        Ok(&self.result)
    }

    /// Steps 2 and 3. Returns the proof, or `None` with `result` set to the
    /// failure.
    async fn pay(
        &mut self,
        pipeline: &BookingPipeline,
        draft: &BookingDraft,
        amount: i64,
    ) -> Option<PaymentProof> {
        self.set_stage(BookingStage::Draft);
        self.intent = None;
        self.result = SubmissionResult::Pending;

        let intent = match pipeline.coordinator.create_intent(amount).await {
            Ok(intent) => intent,
            Err(e) => {
                warn!(error = %e, "Payment intent creation failed");
                self.result = SubmissionResult::Failed(FailureReason::OrderCreation(e));
                self.set_stage(BookingStage::IntentCreationFailed);
                return None;
            }
        };
        self.intent = Some(intent.clone());
        self.set_stage(BookingStage::IntentCreated);

        self.set_stage(BookingStage::GatewayOpen);
        let description = draft.selected_options.join(", ");
        let proof = match pipeline
            .coordinator
            .open_gateway(pipeline.gateway.as_ref(), &intent, &pipeline.customer, &description)
            .await
        {
            Ok(proof) => proof,
            Err(e) => {
                self.result = SubmissionResult::Failed(FailureReason::Payment(e));
                self.set_stage(BookingStage::PaymentFailed);
                return None;
            }
        };

        self.proof = Some(proof.clone());
        self.set_stage(BookingStage::PaymentCaptured);
        Some(proof)
    }

    /// Step 4.
    async fn finalize(&mut self, pipeline: &BookingPipeline, draft: &BookingDraft, proof: PaymentProof) {
        self.set_stage(BookingStage::Finalizing);

        match pipeline
            .submitter
            .submit(draft, &proof, &pipeline.customer.email)
            .await
        {
            Ok(finalized) => {
                self.result = SubmissionResult::Succeeded {
                    order_id: finalized.order_id,
                    proof,
                };
                self.set_stage(BookingStage::Succeeded);
            }
            Err(failure) => {
                warn!(
                    payment_id = %proof.payment_id,
                    order_id = %proof.order_id,
                    attempts = failure.attempts,
                    error = %failure.error,
                    "Payment captured but order finalization failed"
                );
                self.result = SubmissionResult::SucceededButUnconfirmed {
                    proof,
                    failure: failure.error,
                    attempts: failure.attempts,
                };
                self.set_stage(BookingStage::SucceededButUnconfirmed);
            }
        }
    }
}
