//! Booking stage notifications.
//!
//! A booking session publishes every stage transition on a `watch` channel.
//! Receivers only ever see the latest stage; a front end that goes away just
//! drops its receiver and the session carries on.

use tokio::sync::watch;

/// Stages of a single booking attempt.
///
/// ```text
/// Draft → IntentCreated → GatewayOpen → PaymentCaptured → Finalizing → Succeeded
///   │           │                │                            └──────→ SucceededButUnconfirmed
///   └→ IntentCreationFailed      └→ PaymentFailed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingStage {
    Draft,
    IntentCreated,
    GatewayOpen,
    PaymentCaptured,
    Finalizing,
    Succeeded,
    SucceededButUnconfirmed,
    PaymentFailed,
    IntentCreationFailed,
}

impl BookingStage {
    /// No further transition happens without an explicit new submission.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            BookingStage::Succeeded
                | BookingStage::SucceededButUnconfirmed
                | BookingStage::PaymentFailed
                | BookingStage::IntentCreationFailed
        )
    }

    /// Money has been taken for this attempt.
    pub fn is_captured(self) -> bool {
        matches!(
            self,
            BookingStage::PaymentCaptured
                | BookingStage::Finalizing
                | BookingStage::Succeeded
                | BookingStage::SucceededButUnconfirmed
        )
    }
}

impl std::fmt::Display for BookingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingStage::Draft => write!(f, "draft"),
            BookingStage::IntentCreated => write!(f, "intent_created"),
            BookingStage::GatewayOpen => write!(f, "gateway_open"),
            BookingStage::PaymentCaptured => write!(f, "payment_captured"),
            BookingStage::Finalizing => write!(f, "finalizing"),
            BookingStage::Succeeded => write!(f, "succeeded"),
            BookingStage::SucceededButUnconfirmed => write!(f, "succeeded_but_unconfirmed"),
            BookingStage::PaymentFailed => write!(f, "payment_failed"),
            BookingStage::IntentCreationFailed => write!(f, "intent_creation_failed"),
        }
    }
}

/// Sender handle for stage updates.
pub type StageSender = watch::Sender<BookingStage>;
/// Receiver handle for stage updates.
pub type StageReceiver = watch::Receiver<BookingStage>;

/// Create a new stage channel starting at [`BookingStage::Draft`].
pub fn stage_channel() -> (StageSender, StageReceiver) {
    watch::channel(BookingStage::Draft)
}
