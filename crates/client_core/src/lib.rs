use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use chrono::Utc;
use shared::{
    domain::{DispatchMode, DispatchStatus},
    protocol::OrderRequest,
};
use tokio::{
    sync::{broadcast, Mutex},
    time::Instant,
};
use tracing::{debug, warn};

pub mod activity;
pub mod transport;
pub mod view;

pub use activity::{ActivityLog, LogEntry};
pub use transport::{CheckoutTransport, HttpCheckout, MissingTransport, PlaceOrderError};

/// Fixed amount attached to every demo order.
pub const ORDER_AMOUNT: f64 = 100.0;

#[derive(Debug, Clone)]
pub enum HarnessEvent {
    DispatchStarted {
        mode: DispatchMode,
        order_id: String,
    },
    DispatchSettled {
        entry: LogEntry,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Settled(LogEntry),
    /// The mode already had a call in flight; nothing was dispatched
    /// and nothing was logged.
    AlreadyInFlight,
}

struct HarnessState {
    inflight: HashSet<DispatchMode>,
    last_settled: HashMap<DispatchMode, Instant>,
}

/// Drives both checkout paths and owns all client-side dispatch state:
/// the per-mode in-flight flags, the order-id counter, and the activity
/// log. The two modes never share an in-flight flag; a slow call on one
/// path does not gate the other.
pub struct DispatchHarness {
    sync_transport: Arc<dyn CheckoutTransport>,
    async_transport: Arc<dyn CheckoutTransport>,
    order_seq: AtomicU64,
    inner: Mutex<HarnessState>,
    activity: Mutex<ActivityLog>,
    events: broadcast::Sender<HarnessEvent>,
}

impl DispatchHarness {
    pub fn new(
        sync_transport: Arc<dyn CheckoutTransport>,
        async_transport: Arc<dyn CheckoutTransport>,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            sync_transport,
            async_transport,
            order_seq: AtomicU64::new(0),
            inner: Mutex::new(HarnessState {
                inflight: HashSet::new(),
                last_settled: HashMap::new(),
            }),
            activity: Mutex::new(ActivityLog::new()),
            events,
        })
    }

    /// Harness wired to two HTTP endpoints, sharing one client.
    pub fn over_http(sync_url: impl Into<String>, async_url: impl Into<String>) -> Arc<Self> {
        let http = reqwest::Client::new();
        Self::new(
            Arc::new(HttpCheckout::with_client(http.clone(), sync_url)),
            Arc::new(HttpCheckout::with_client(http, async_url)),
        )
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<HarnessEvent> {
        self.events.subscribe()
    }

    /// Runs one dispatch on `mode` to settlement. Exactly one log entry
    /// is recorded per settled dispatch, success or failure alike, and
    /// the in-flight flag is released either way so the trigger becomes
    /// available again. Re-triggering a mode that is already in flight
    /// is a silent no-op.
    pub async fn dispatch(&self, mode: DispatchMode) -> DispatchOutcome {
        {
            let mut guard = self.inner.lock().await;
            if !guard.inflight.insert(mode) {
                debug!(
                    mode = mode.as_str(),
                    "dispatch suppressed; a call is already in flight"
                );
                return DispatchOutcome::AlreadyInFlight;
            }
        }

        let order = OrderRequest {
            order_id: self.next_order_id(mode),
            amount: ORDER_AMOUNT,
        };
        let _ = self.events.send(HarnessEvent::DispatchStarted {
            mode,
            order_id: order.order_id.clone(),
        });

        let started = Instant::now();
        let result = self.transport_for(mode).place_order(&order).await;
        let duration_ms = round_to_millis(started.elapsed());

        let status = match &result {
            Ok(receipt) => {
                debug!(
                    mode = mode.as_str(),
                    order_id = %order.order_id,
                    status = ?receipt.status,
                    duration_ms,
                    "checkout settled"
                );
                DispatchStatus::Success
            }
            Err(err) => {
                warn!(
                    mode = mode.as_str(),
                    order_id = %order.order_id,
                    duration_ms,
                    %err,
                    "checkout failed"
                );
                DispatchStatus::Failed
            }
        };

        let entry = {
            let mut log = self.activity.lock().await;
            log.record(mode, duration_ms, status, Utc::now())
        };
        let _ = self.events.send(HarnessEvent::DispatchSettled {
            entry: entry.clone(),
        });

        {
            let mut guard = self.inner.lock().await;
            guard.inflight.remove(&mode);
            guard.last_settled.insert(mode, Instant::now());
        }

        DispatchOutcome::Settled(entry)
    }

    /// Fire-and-forget trigger for UI-style callers. Back-to-back
    /// triggers on different modes run concurrently.
    pub fn trigger(self: &Arc<Self>, mode: DispatchMode) {
        let harness = Arc::clone(self);
        tokio::spawn(async move {
            let _ = harness.dispatch(mode).await;
        });
    }

    pub async fn is_busy(&self, mode: DispatchMode) -> bool {
        self.inner.lock().await.inflight.contains(&mode)
    }

    /// True if `mode` settled no longer than `window` ago.
    pub async fn settled_within(&self, mode: DispatchMode, window: Duration) -> bool {
        self.inner
            .lock()
            .await
            .last_settled
            .get(&mode)
            .is_some_and(|at| at.elapsed() <= window)
    }

    pub async fn recent_entries(&self, n: usize) -> Vec<LogEntry> {
        self.activity.lock().await.recent(n).cloned().collect()
    }

    pub async fn recorded_total(&self) -> u64 {
        self.activity.lock().await.count()
    }

    /// Session reset; entry ids keep increasing across a clear.
    pub async fn clear_activity(&self) {
        self.activity.lock().await.clear();
    }

    fn transport_for(&self, mode: DispatchMode) -> &Arc<dyn CheckoutTransport> {
        match mode {
            DispatchMode::Sync => &self.sync_transport,
            DispatchMode::Async => &self.async_transport,
        }
    }

    fn next_order_id(&self, mode: DispatchMode) -> String {
        let seq = self.order_seq.fetch_add(1, Ordering::Relaxed) + 1;
        match mode {
            DispatchMode::Sync => format!("ord-sync-{seq}"),
            DispatchMode::Async => format!("ord-async-{seq}"),
        }
    }
}

fn round_to_millis(elapsed: Duration) -> u64 {
    (elapsed.as_secs_f64() * 1000.0).round() as u64
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
