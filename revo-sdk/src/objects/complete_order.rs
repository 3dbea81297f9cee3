//! Multipart body for `POST /api/order/complete/`.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

pub const FIELD_PAYMENT_ID: &str = "razorpay_payment_id";
pub const FIELD_ORDER_ID: &str = "razorpay_order_id";
pub const FIELD_SIGNATURE: &str = "razorpay_signature";
pub const FIELD_IMAGES: &str = "images[]";
pub const FIELD_RECORDINGS: &str = "recordings[]";
pub const FIELD_BOOKING_DETAILS: &str = "booking_details";

/// JSON document sent in the `booking_details` part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDetails {
    /// Total in major units.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: rust_decimal::Decimal,
    pub options: Vec<String>,
    pub description: String,
    pub email: String,
}

/// A file attached to a multipart request.
///
/// The content is held as [`Bytes`] so a request can be rebuilt for every
/// retry without re-reading the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub file_name: String,
    pub mime: String,
    pub content: Bytes,
}

/// Everything the finalization request carries.
#[derive(Debug, Clone, PartialEq)]
pub struct CompleteOrderForm {
    pub payment_id: String,
    pub order_id: String,
    pub signature: String,
    pub images: Vec<FilePart>,
    pub recordings: Vec<FilePart>,
    pub booking_details: BookingDetails,
}

impl CompleteOrderForm {
    /// Total size of the attached files in bytes.
    pub fn attachment_bytes(&self) -> usize {
        self.images
            .iter()
            .chain(self.recordings.iter())
            .map(|p| p.content.len())
            .sum()
    }
}

/// Response body of a successful finalization.
///
/// The backend has answered with either a bare `order_id` or one nested in
/// `data`; both are accepted and neither is required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompleteOrderResponse {
    #[serde(default, deserialize_with = "super::opt_string_or_number")]
    order_id: Option<String>,
    #[serde(default)]
    data: Option<CompletedOrderData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CompletedOrderData {
    #[serde(default, deserialize_with = "super::opt_string_or_number")]
    order_id: Option<String>,
}

impl CompleteOrderResponse {
    /// The identifier of the created order, if the backend reported one.
    pub fn order_id(&self) -> Option<&str> {
        self.order_id
            .as_deref()
            .or_else(|| self.data.as_ref().and_then(|d| d.order_id.as_deref()))
    }
}
