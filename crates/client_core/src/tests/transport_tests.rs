use std::net::SocketAddr;
use std::time::Duration;

use axum::{http::StatusCode, routing::post, Json, Router};
use shared::{
    domain::{DispatchMode, DispatchStatus},
    protocol::{CheckoutReceipt, CheckoutStatus, OrderRequest},
};
use tokio::{net::TcpListener, task::JoinHandle};

use super::*;
use crate::{DispatchHarness, DispatchOutcome};

fn order() -> OrderRequest {
    OrderRequest {
        order_id: "ord-sync-1".into(),
        amount: 100.0,
    }
}

async fn serve(app: Router) -> (SocketAddr, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let task = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    (addr, task)
}

async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    addr
}

#[tokio::test]
async fn success_reply_parses_into_a_receipt() {
    let app = Router::new().route(
        "/checkout",
        post(|Json(order): Json<OrderRequest>| async move {
            Json(CheckoutReceipt::paid(order.order_id))
        }),
    );
    let (addr, server) = serve(app).await;

    let transport = HttpCheckout::new(format!("http://{addr}/checkout"));
    let receipt = transport.place_order(&order()).await.expect("receipt");
    assert_eq!(receipt.status, CheckoutStatus::Paid);
    assert_eq!(receipt.order_id.as_deref(), Some("ord-sync-1"));

    server.abort();
}

#[tokio::test]
async fn non_success_status_maps_to_status_error() {
    let app = Router::new().route("/checkout", post(|| async { StatusCode::BAD_GATEWAY }));
    let (addr, server) = serve(app).await;

    let transport = HttpCheckout::new(format!("http://{addr}/checkout"));
    let err = transport.place_order(&order()).await.expect_err("must fail");
    match err {
        PlaceOrderError::Status { status } => assert_eq!(status.as_u16(), 502),
        other => panic!("unexpected error: {other}"),
    }

    server.abort();
}

#[tokio::test]
async fn unreadable_body_maps_to_decode_error() {
    let app = Router::new().route("/checkout", post(|| async { "accepted" }));
    let (addr, server) = serve(app).await;

    let transport = HttpCheckout::new(format!("http://{addr}/checkout"));
    let err = transport.place_order(&order()).await.expect_err("must fail");
    assert!(
        matches!(err, PlaceOrderError::Decode(_)),
        "unexpected error: {err}"
    );

    server.abort();
}

#[tokio::test]
async fn unreachable_endpoint_maps_to_transport_error() {
    let addr = unused_addr().await;

    let transport = HttpCheckout::new(format!("http://{addr}/checkout"));
    let err = transport.place_order(&order()).await.expect_err("must fail");
    assert!(
        matches!(err, PlaceOrderError::Transport(_)),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn harness_measures_a_live_round_trip() {
    let app = Router::new().route(
        "/checkout",
        post(|Json(_order): Json<OrderRequest>| async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Json(CheckoutReceipt::accepted(
                "Order received and processing started.",
            ))
        }),
    );
    let (addr, server) = serve(app).await;

    let harness = DispatchHarness::over_http(
        format!("http://{addr}/missing"),
        format!("http://{addr}/checkout"),
    );
    let outcome = harness.dispatch(DispatchMode::Async).await;
    let DispatchOutcome::Settled(entry) = outcome else {
        panic!("expected settlement");
    };
    assert_eq!(entry.status, DispatchStatus::Success);
    assert!(
        (30..=300).contains(&entry.duration_ms),
        "duration {}",
        entry.duration_ms
    );

    server.abort();
}

#[tokio::test]
async fn harness_logs_a_failure_for_a_dead_endpoint() {
    let addr = unused_addr().await;

    let harness = DispatchHarness::over_http(
        format!("http://{addr}/checkout"),
        format!("http://{addr}/checkout"),
    );
    let outcome = harness.dispatch(DispatchMode::Sync).await;
    let DispatchOutcome::Settled(entry) = outcome else {
        panic!("expected settlement");
    };
    assert_eq!(entry.status, DispatchStatus::Failed);
    assert_eq!(harness.recorded_total().await, 1);
}
