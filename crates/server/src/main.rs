use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{CheckoutReceipt, OrderRequest},
};
use tokio::sync::mpsc;
use tracing::{info, warn};

mod config;
mod payment;

use config::{load_settings, ServiceMode, Settings};

#[derive(Clone)]
struct AppState {
    settings: Settings,
    orders: mpsc::Sender<OrderRequest>,
}

impl AppState {
    fn payment_delay(&self) -> Duration {
        Duration::from_millis(self.settings.payment_delay_ms)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    info!(mode = settings.mode.as_str(), "starting checkout service");

    let (orders_tx, orders_rx) = mpsc::channel(settings.queue_capacity);
    tokio::spawn(payment::run_consumer(
        orders_rx,
        Duration::from_millis(settings.payment_delay_ms),
    ));

    let addr: SocketAddr = settings.server_bind.parse()?;
    let state = AppState {
        settings,
        orders: orders_tx,
    };
    let app = build_router(Arc::new(state));

    info!(%addr, "checkout service listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(service_info))
        .route("/healthz", get(healthz))
        .route("/checkout", post(checkout))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn service_info(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "checkout-service",
        "mode": state.settings.mode.as_str(),
    }))
}

async fn checkout(
    State(state): State<Arc<AppState>>,
    Json(order): Json<OrderRequest>,
) -> Result<Json<CheckoutReceipt>, (StatusCode, Json<ApiError>)> {
    match state.settings.mode {
        ServiceMode::Sync => {
            info!(order_id = %order.order_id, "dispatching payment synchronously");
            let receipt = payment::process_payment(&order, state.payment_delay()).await;
            Ok(Json(receipt))
        }
        ServiceMode::Async => match state.orders.try_send(order.clone()) {
            Ok(()) => {
                info!(order_id = %order.order_id, "order published to queue");
                Ok(Json(CheckoutReceipt::accepted(
                    "Order received and processing started.",
                )))
            }
            Err(err) => {
                warn!(order_id = %order.order_id, %err, "queue rejected order");
                Err((
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(ApiError::new(
                        ErrorCode::Unavailable,
                        "Messaging service unavailable",
                    )),
                ))
            }
        },
    }
}
