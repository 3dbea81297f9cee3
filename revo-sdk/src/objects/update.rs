//! Multipart body for `POST /api/order/submit-update/`.

use super::FilePart;

pub const FIELD_ORDER_ID: &str = "order_id";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_VOICE_MESSAGES: &str = "voice_messages";

/// A change request on an order that already has a preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateForm {
    pub order_id: String,
    pub description: String,
    pub voice_messages: Vec<FilePart>,
}
