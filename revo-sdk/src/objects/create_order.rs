use serde::{Deserialize, Serialize};

/// Request body for `POST /api/order/create/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    /// Amount in minor units (paise).
    pub amount: i64,
    pub currency: String,
}

/// Response body for `POST /api/order/create/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    pub data: CreatedOrder,
}

/// The gateway order created by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedOrder {
    #[serde(deserialize_with = "super::string_or_number")]
    pub order_id: String,
    /// Publishable gateway key. The client never ships one of its own.
    #[serde(default, alias = "key")]
    pub key_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_created_order() {
        let body = r#"{"data":{"order_id":"order_NxY12","key_id":"rzp_live_abc"}}"#;
        let resp: CreateOrderResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.data.order_id, "order_NxY12");
        assert_eq!(resp.data.key_id.as_deref(), Some("rzp_live_abc"));

        let body = r#"{"data":{"order_id":"order_NxY12"}}"#;
        let resp: CreateOrderResponse = serde_json::from_str(body).unwrap();
        assert!(resp.data.key_id.is_none());
    }
}
