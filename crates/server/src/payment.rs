use std::time::Duration;

use shared::protocol::{CheckoutReceipt, OrderRequest};
use tokio::sync::mpsc;
use tracing::info;

/// Simulated downstream payment processor. The fixed delay is the whole
/// point of the demo: the blocking endpoint eats it inline, the
/// queue-backed endpoint hides it behind the consumer.
pub async fn process_payment(order: &OrderRequest, delay: Duration) -> CheckoutReceipt {
    info!(order_id = %order.order_id, amount = order.amount, "processing payment");
    tokio::time::sleep(delay).await;
    info!(order_id = %order.order_id, "payment completed");
    CheckoutReceipt::paid(order.order_id.clone())
}

/// Drains the simulated `order.created` queue one order at a time, the
/// way a broker consumer would.
pub async fn run_consumer(mut orders: mpsc::Receiver<OrderRequest>, delay: Duration) {
    while let Some(order) = orders.recv().await {
        info!(order_id = %order.order_id, "order received from queue");
        let receipt = process_payment(&order, delay).await;
        info!(order_id = %order.order_id, status = ?receipt.status, "payment.completed");
    }
}

#[cfg(test)]
mod tests {
    use shared::protocol::CheckoutStatus;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn payment_settles_paid_after_the_configured_delay() {
        let order = OrderRequest {
            order_id: "ord-sync-1".into(),
            amount: 100.0,
        };
        let receipt = process_payment(&order, Duration::from_millis(3000)).await;
        assert_eq!(receipt.status, CheckoutStatus::Paid);
        assert_eq!(receipt.order_id.as_deref(), Some("ord-sync-1"));
    }

    #[tokio::test(start_paused = true)]
    async fn consumer_drains_queued_orders_in_order() {
        let (tx, rx) = mpsc::channel(4);
        let consumer = tokio::spawn(run_consumer(rx, Duration::from_millis(10)));

        for seq in 1..=3 {
            tx.send(OrderRequest {
                order_id: format!("ord-async-{seq}"),
                amount: 100.0,
            })
            .await
            .expect("send");
        }
        drop(tx);

        consumer.await.expect("consumer exits once the queue closes");
    }
}
