use async_trait::async_trait;
use reqwest::StatusCode;
use shared::protocol::{CheckoutReceipt, OrderRequest};
use thiserror::Error;

/// Failure taxonomy for a single outbound checkout call. The harness
/// collapses all of these to a FAILED log entry; the variants exist for
/// diagnostics.
#[derive(Debug, Error)]
pub enum PlaceOrderError {
    #[error("checkout endpoint unreachable: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("checkout endpoint returned status {status}")]
    Status { status: StatusCode },
    #[error("checkout endpoint returned an unreadable body: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("no checkout endpoint configured")]
    Unconfigured,
}

#[async_trait]
pub trait CheckoutTransport: Send + Sync {
    async fn place_order(&self, order: &OrderRequest) -> Result<CheckoutReceipt, PlaceOrderError>;
}

/// Posts orders to one checkout endpoint over HTTP. No request timeout
/// is applied: a dispatch waits for the remote to settle, however long
/// that takes.
pub struct HttpCheckout {
    http: reqwest::Client,
    endpoint_url: String,
}

impl HttpCheckout {
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint_url)
    }

    pub fn with_client(http: reqwest::Client, endpoint_url: impl Into<String>) -> Self {
        Self {
            http,
            endpoint_url: endpoint_url.into(),
        }
    }
}

#[async_trait]
impl CheckoutTransport for HttpCheckout {
    async fn place_order(&self, order: &OrderRequest) -> Result<CheckoutReceipt, PlaceOrderError> {
        let response = self
            .http
            .post(&self.endpoint_url)
            .json(order)
            .send()
            .await
            .map_err(PlaceOrderError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlaceOrderError::Status { status });
        }

        response.json().await.map_err(PlaceOrderError::Decode)
    }
}

pub struct MissingTransport;

#[async_trait]
impl CheckoutTransport for MissingTransport {
    async fn place_order(&self, _order: &OrderRequest) -> Result<CheckoutReceipt, PlaceOrderError> {
        Err(PlaceOrderError::Unconfigured)
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
