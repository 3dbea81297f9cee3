//! Read-side order types: order list and preview image lookup.

use serde::{Deserialize, Serialize};

/// Request body for `POST /api/order/show/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowOrdersRequest {
    pub email: String,
}

/// One entry of the order list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    #[serde(deserialize_with = "super::string_or_number")]
    pub order_id: String,
    #[serde(default, deserialize_with = "super::opt_string_or_number")]
    pub custom_order_id: Option<String>,
    #[serde(default)]
    pub checked_option: Option<String>,
    #[serde(default)]
    pub order_date: Option<String>,
    #[serde(default)]
    pub delivery_date: Option<String>,
    pub order_status: DesignStatus,
    #[serde(default)]
    pub preview_image: Option<String>,
}

/// Request body for `POST /api/order/preview_image/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewImageRequest {
    pub order_id: String,
}

/// Response body for `POST /api/order/preview_image/`.
///
/// `preview_image` is either an absolute URL or a root-relative path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewImageResponse {
    #[serde(default)]
    pub preview_image: Option<String>,
}

/// Production stage of a design order, encoded as `1..=4` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DesignStatus {
    Designing,
    Testing,
    Correction,
    Delivered,
}

impl TryFrom<u8> for DesignStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Designing),
            2 => Ok(Self::Testing),
            3 => Ok(Self::Correction),
            4 => Ok(Self::Delivered),
            other => Err(format!("unknown order status code {other}")),
        }
    }
}

impl From<DesignStatus> for u8 {
    fn from(value: DesignStatus) -> Self {
        match value {
            DesignStatus::Designing => 1,
            DesignStatus::Testing => 2,
            DesignStatus::Correction => 3,
            DesignStatus::Delivered => 4,
        }
    }
}

impl std::fmt::Display for DesignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DesignStatus::Designing => write!(f, "designing"),
            DesignStatus::Testing => write!(f, "testing"),
            DesignStatus::Correction => write!(f, "correction"),
            DesignStatus::Delivered => write!(f, "delivered"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_order_list() {
        let body = r#"[
            {"order_id": 17, "custom_order_id": "RT-0017", "checked_option": "Flyer",
             "order_date": "2024-11-02T10:00:00Z", "delivery_date": null,
             "order_status": 3, "preview_image": "/media/previews/17.jpg"}
        ]"#;
        let orders: Vec<OrderSummary> = serde_json::from_str(body).unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].order_id, "17");
        assert_eq!(orders[0].order_status, DesignStatus::Correction);
        assert!(orders[0].delivery_date.is_none());
    }

    #[test]
    fn test_unknown_status_code_is_rejected() {
        let body = r#"{"order_id": "1", "order_status": 9}"#;
        assert!(serde_json::from_str::<OrderSummary>(body).is_err());
    }
}
