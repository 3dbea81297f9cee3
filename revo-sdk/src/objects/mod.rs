pub mod checkout;
pub mod complete_order;
pub mod create_order;
pub mod order_status;
pub mod update;

pub use checkout::{CheckoutOptions, CheckoutSuccess, Prefill, Theme};
pub use complete_order::{BookingDetails, CompleteOrderForm, CompleteOrderResponse, FilePart};
pub use create_order::{CreateOrderRequest, CreateOrderResponse, CreatedOrder};
pub use order_status::{
    DesignStatus, OrderSummary, PreviewImageRequest, PreviewImageResponse, ShowOrdersRequest,
};
pub use update::UpdateForm;

use serde::{Deserialize, Deserializer};

/// Error body the backend sends alongside non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Accept identifiers the backend sends either as JSON strings or numbers.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Int(n) => n.to_string(),
    })
}

pub(crate) fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Str(s)) => Some(s),
        Some(Raw::Int(n)) => Some(n.to_string()),
        None => None,
    })
}
