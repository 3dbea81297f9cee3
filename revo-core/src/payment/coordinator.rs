//! PaymentCoordinator.
//!
//! Obtains a [`PaymentIntent`] from the backend and drives the gateway
//! checkout for it. Intent creation is retried on transient failures; the
//! gateway call never is.

use revo_sdk::client::BackendClient;
use revo_sdk::config::CustomerProfile;
use revo_sdk::objects::{CheckoutOptions, CreateOrderRequest, Prefill, Theme};
use tracing::{info, warn};

use super::{GatewayError, IntentError, PaymentGateway, PaymentIntent, PaymentProof, is_transient};
use crate::config::BookingConfig;
use crate::utils::{RetryFailure, retry_with_backoff};

pub struct PaymentCoordinator {
    client: BackendClient,
    config: BookingConfig,
}

impl PaymentCoordinator {
    pub fn new(client: BackendClient, config: BookingConfig) -> Self {
        Self { client, config }
    }

    /// Ask the backend for a gateway order of `amount_minor_units`.
    ///
    /// Non-positive amounts are rejected without a request.
    pub async fn create_intent(&self, amount_minor_units: i64) -> Result<PaymentIntent, IntentError> {
        if amount_minor_units <= 0 {
            return Err(IntentError::InvalidAmount(amount_minor_units));
        }

        let request = CreateOrderRequest {
            amount: amount_minor_units,
            currency: self.config.currency.clone(),
        };

        let created = retry_with_backoff(
            &self.config.intent_retry,
            "create_order",
            is_transient,
            |_| self.client.create_order(&request),
        )
        .await
        .map_err(|RetryFailure { error, attempts }| IntentError::Request {
            attempts,
            source: error,
        })?;

        info!(
            order_id = %created.order_id,
            amount = amount_minor_units,
            currency = %request.currency,
            "Payment intent created"
        );

        Ok(PaymentIntent {
            order_id: created.order_id,
            gateway_key: created.key_id,
            amount_minor_units,
            currency: request.currency,
        })
    }

    /// Build the checkout options the gateway screen is opened with.
    pub fn checkout_options(
        &self,
        intent: &PaymentIntent,
        customer: &CustomerProfile,
        description: &str,
    ) -> CheckoutOptions {
        CheckoutOptions {
            key: intent.gateway_key.clone(),
            amount: intent.amount_minor_units,
            currency: intent.currency.clone(),
            name: self.config.merchant_name.clone(),
            description: description.to_owned(),
            order_id: intent.order_id.clone(),
            prefill: Prefill {
                email: customer.email.clone(),
                contact: customer.contact.clone(),
                name: customer.name.clone(),
            },
            theme: Theme {
                color: self.config.theme_color.clone(),
            },
        }
    }

    /// Open the gateway for `intent` and wait for the customer.
    ///
    /// The returned proof is guaranteed to belong to `intent`.
    pub async fn open_gateway(
        &self,
        gateway: &dyn PaymentGateway,
        intent: &PaymentIntent,
        customer: &CustomerProfile,
        description: &str,
    ) -> Result<PaymentProof, GatewayError> {
        let options = self.checkout_options(intent, customer, description);
        info!(order_id = %intent.order_id, "Opening payment gateway");

        let proof: PaymentProof = match gateway.checkout(options).await {
            Ok(success) => success.into(),
            Err(e) => {
                warn!(order_id = %intent.order_id, error = %e, "Payment not completed");
                return Err(e);
            }
        };

        if proof.order_id != intent.order_id {
            warn!(
                expected = %intent.order_id,
                actual = %proof.order_id,
                "Gateway returned a payment for another order"
            );
            return Err(GatewayError::OrderMismatch {
                expected: intent.order_id.clone(),
                actual: proof.order_id,
            });
        }

        info!(
            order_id = %proof.order_id,
            payment_id = %proof.payment_id,
            "Payment captured"
        );
        Ok(proof)
    }
}
