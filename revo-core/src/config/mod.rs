//! Runtime configuration for the booking pipeline.
//!
//! Built by the CLI from its config file; every value here is already
//! validated.

use crate::utils::RetryPolicy;

/// Settings shared by the payment coordinator and the finalization
/// submitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingConfig {
    /// ISO currency code sent with every order (e.g. `INR`).
    pub currency: String,
    /// Merchant name shown on the gateway's checkout screen.
    pub merchant_name: String,
    /// Accent color for the gateway's checkout screen.
    pub theme_color: String,
    /// Retry policy for order (payment intent) creation.
    pub intent_retry: RetryPolicy,
    /// Retry policy for order finalization.
    pub finalize_retry: RetryPolicy,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            currency: "INR".to_owned(),
            merchant_name: "Revo Touch".to_owned(),
            theme_color: "#FFCE07".to_owned(),
            intent_retry: RetryPolicy::default(),
            finalize_retry: RetryPolicy::default(),
        }
    }
}
