//! Payment gateway checkout boundary.
//!
//! The gateway UI is opened with [`CheckoutOptions`] and reports back a
//! [`CheckoutSuccess`] once the customer has paid. Field names follow the
//! gateway's own checkout contract.

use serde::{Deserialize, Serialize};

/// Options handed to the gateway's checkout screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutOptions {
    /// Publishable key delivered by the backend at order creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Amount in minor units.
    pub amount: i64,
    pub currency: String,
    /// Merchant display name.
    pub name: String,
    pub description: String,
    pub order_id: String,
    pub prefill: Prefill,
    pub theme: Theme,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefill {
    pub email: String,
    pub contact: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub color: String,
}

/// What the gateway returns after a captured payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSuccess {
    pub razorpay_payment_id: String,
    pub razorpay_order_id: String,
    pub razorpay_signature: String,
}
