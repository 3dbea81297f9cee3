//! Payment handoff: intent creation on the backend and the gateway checkout.

mod coordinator;

pub use coordinator::PaymentCoordinator;

use async_trait::async_trait;
use revo_sdk::client::ClientError;
use revo_sdk::objects::{CheckoutOptions, CheckoutSuccess};
use thiserror::Error;

/// A gateway order created by the backend for one booking attempt.
///
/// Single use: a captured payment is never followed by a second intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntent {
    pub order_id: String,
    /// Publishable gateway key delivered with the order.
    pub gateway_key: Option<String>,
    pub amount_minor_units: i64,
    pub currency: String,
}

/// Proof of a captured payment as reported by the gateway.
///
/// The signature is verified by the backend during finalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentProof {
    pub payment_id: String,
    pub order_id: String,
    pub signature: String,
}

impl From<CheckoutSuccess> for PaymentProof {
    fn from(value: CheckoutSuccess) -> Self {
        Self {
            payment_id: value.razorpay_payment_id,
            order_id: value.razorpay_order_id,
            signature: value.razorpay_signature,
        }
    }
}

/// The gateway's checkout screen.
///
/// `checkout` may suspend for as long as the customer needs; it resolves when
/// the payment is captured, fails, or is cancelled.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn checkout(&self, options: CheckoutOptions) -> Result<CheckoutSuccess, GatewayError>;
}

/// Errors from the gateway stage. None of them leave a charge behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("payment cancelled by the user")]
    Cancelled,

    #[error("payment failed: {0}")]
    Failed(String),

    /// The gateway reported a payment for a different order.
    #[error("payment reported for order {actual}, expected {expected}")]
    OrderMismatch { expected: String, actual: String },
}

/// Errors from payment intent creation.
#[derive(Debug, Error)]
pub enum IntentError {
    /// Rejected locally; no request was sent.
    #[error("invalid amount: {0} minor units")]
    InvalidAmount(i64),

    #[error("order creation failed after {attempts} attempt(s): {source}")]
    Request {
        attempts: u32,
        #[source]
        source: ClientError,
    },
}

/// Timeouts, unreachable hosts and 5xx answers are worth another attempt.
pub(crate) fn is_transient(error: &ClientError) -> bool {
    error.is_timeout()
        || error.is_unreachable()
        || error.status().is_some_and(|s| s.is_server_error())
}
