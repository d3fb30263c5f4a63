//! The processing window of a single order.
//!
//! One task per order owns every timer that can resolve it: the countdown
//! interval, the gateway completion, the cancel-enable sleep and the user's
//! cancel request. The task is the only writer of the order's workflow state,
//! so exactly one of them can produce the terminal transition.

use crate::application::config::CheckoutConfig;
use crate::domain::order::{CheckoutOrder, OrderStatus};
use crate::domain::ports::{OrderStoreHandle, PaymentGatewayHandle};
use crate::domain::workflow::{CheckoutStep, CheckoutView, Countdown, FailureReason};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, error, info, warn};

enum Resolution {
    Paid { reference: String },
    Failed(FailureReason),
}

pub(crate) struct ProcessingTask {
    pub(crate) order: CheckoutOrder,
    pub(crate) started: Instant,
    pub(crate) store: OrderStoreHandle,
    pub(crate) gateway: PaymentGatewayHandle,
    pub(crate) config: CheckoutConfig,
    pub(crate) view: Arc<watch::Sender<CheckoutView>>,
    pub(crate) cancel_rx: mpsc::Receiver<()>,
}

impl ProcessingTask {
    pub(crate) fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(self) {
        let Self {
            order,
            started,
            store,
            gateway,
            config,
            view,
            mut cancel_rx,
        } = self;
        let order_id = order.order_id;
        let mut countdown = Countdown::new(config.countdown_ticks());

        // All timers live in this block and are dropped together when it ends,
        // before the terminal state is persisted or published.
        let resolution = {
            let mut ticker = time::interval_at(started + config.tick, config.tick);
            let mut grace = Box::pin(time::sleep_until(started + config.cancel_grace));
            let mut completion = gateway.confirmation(&order);
            let mut gateway_settled = false;
            let mut cancel_enabled = false;

            loop {
                tokio::select! {
                    biased;

                    Some(()) = cancel_rx.recv(), if cancel_enabled => {
                        break Resolution::Failed(FailureReason::UserCancelled);
                    }
                    result = &mut completion, if !gateway_settled => match result {
                        Ok(confirmation) => {
                            break Resolution::Paid { reference: confirmation.reference };
                        }
                        Err(e) => {
                            warn!(%order_id, error = %e, "Payment gateway failed; waiting for timeout");
                            gateway_settled = true;
                        }
                    },
                    _ = &mut grace, if !cancel_enabled => {
                        cancel_enabled = true;
                        view.send_modify(|v| v.cancel_enabled = true);
                        debug!(%order_id, "Cancellation enabled");
                    }
                    _ = ticker.tick() => {
                        if countdown.tick() {
                            break Resolution::Failed(FailureReason::Timeout);
                        }
                        view.send_modify(|v| v.countdown = countdown);
                        debug!(%order_id, remaining = countdown.remaining, "Countdown tick");
                    }
                }
            }
        };

        let (status, reason) = match resolution {
            Resolution::Paid { reference } => {
                info!(%order_id, %reference, "Payment confirmed");
                (OrderStatus::Paid, None)
            }
            Resolution::Failed(reason) => {
                info!(%order_id, %reason, "Order failed");
                (OrderStatus::Failed, Some(reason))
            }
        };

        if let Err(e) = store.set_status(order_id, status).await {
            error!(%order_id, %status, error = %e, "Failed to persist terminal order status");
        }

        view.send_modify(|v| {
            v.step = CheckoutStep::Result;
            v.countdown = countdown;
            v.cancel_enabled = false;
            v.reason = reason;
            if let Some(order) = v.order.as_mut() {
                order.status = status;
            }
        });
    }
}
