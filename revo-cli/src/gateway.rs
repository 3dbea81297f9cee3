//! Payment gateway driven from the terminal.
//!
//! The checkout options are printed so the payment can be completed in the
//! gateway's hosted checkout; the customer then pastes back the payment id
//! and signature the gateway reported.

use async_trait::async_trait;
use revo_core::payment::{GatewayError, PaymentGateway};
use revo_sdk::objects::{CheckoutOptions, CheckoutSuccess};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::terminal::Terminal;

pub struct TerminalGateway {
    terminal: Arc<Terminal>,
}

impl TerminalGateway {
    pub fn new(terminal: Arc<Terminal>) -> Self {
        Self { terminal }
    }

    async fn read(&self, question: &str) -> Result<Option<String>, GatewayError> {
        let answer = self
            .terminal
            .prompt(question)
            .await
            .map_err(|e| GatewayError::Failed(format!("failed to read input: {e}")))?;
        Ok(answer.filter(|a| !a.is_empty()))
    }
}

/// `199900` minor units → `1999.00`.
fn format_amount(minor_units: i64) -> String {
    Decimal::new(minor_units, 2).to_string()
}

#[async_trait]
impl PaymentGateway for TerminalGateway {
    async fn checkout(&self, options: CheckoutOptions) -> Result<CheckoutSuccess, GatewayError> {
        println!();
        println!(
            "Pay {} {} to {} ({})",
            format_amount(options.amount),
            options.currency,
            options.name,
            options.description
        );
        match serde_json::to_string_pretty(&options) {
            Ok(json) => println!("Checkout options:\n{json}"),
            Err(e) => tracing::warn!(error = %e, "Failed to render checkout options"),
        }

        let Some(payment_id) = self.read("Payment id (empty to cancel): ").await? else {
            return Err(GatewayError::Cancelled);
        };
        let Some(signature) = self.read("Payment signature: ").await? else {
            return Err(GatewayError::Failed("no payment signature provided".to_string()));
        };

        Ok(CheckoutSuccess {
            razorpay_payment_id: payment_id,
            razorpay_order_id: options.order_id,
            razorpay_signature: signature,
        })
    }
}
