use serde::{Deserialize, Serialize};

/// Body posted to a checkout endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub order_id: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutStatus {
    #[serde(rename = "PAID")]
    Paid,
    #[serde(rename = "ORDER_ACCEPTED")]
    OrderAccepted,
}

/// Reply from a checkout endpoint. The blocking path answers with
/// `PAID` and the settled order id; the queue-backed path answers with
/// `ORDER_ACCEPTED` and a human-readable note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutReceipt {
    pub status: CheckoutStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckoutReceipt {
    pub fn paid(order_id: impl Into<String>) -> Self {
        Self {
            status: CheckoutStatus::Paid,
            order_id: Some(order_id.into()),
            message: None,
        }
    }

    pub fn accepted(message: impl Into<String>) -> Self {
        Self {
            status: CheckoutStatus::OrderAccepted,
            order_id: None,
            message: Some(message.into()),
        }
    }
}
