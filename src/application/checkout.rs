use crate::application::config::CheckoutConfig;
use crate::application::processing::ProcessingTask;
use crate::domain::cart::Cart;
use crate::domain::order::{CheckoutOrder, OrderStatus};
use crate::domain::ports::{OrderStoreHandle, PaymentGatewayHandle};
use crate::domain::workflow::{CheckoutOutcome, CheckoutStep, CheckoutView, Countdown};
use crate::error::{CheckoutError, Result};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

struct ActiveOrder {
    started: Instant,
    cancel_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

/// Drives an order from cart review through payment to the result screen.
///
/// The controller owns the client-visible [`CheckoutView`] and publishes every
/// change on a `watch` channel. While an order is processing, a dedicated task
/// owns the countdown, the gateway completion and the cancel grace period;
/// resetting or dropping the controller aborts that task, so no timer can fire
/// against a disposed order.
pub struct CheckoutController {
    store: OrderStoreHandle,
    gateway: PaymentGatewayHandle,
    config: CheckoutConfig,
    view: Arc<watch::Sender<CheckoutView>>,
    active: Option<ActiveOrder>,
}

impl CheckoutController {
    /// Creates a controller in the `cart` step.
    ///
    /// # Arguments
    ///
    /// * `store` - The system of record for submitted orders.
    /// * `gateway` - The source of payment completion events.
    /// * `config` - Timing policy for the processing window.
    pub fn new(
        store: OrderStoreHandle,
        gateway: PaymentGatewayHandle,
        config: CheckoutConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            gateway,
            config,
            view: Arc::new(watch::Sender::new(CheckoutView::default())),
            active: None,
        })
    }

    /// Current snapshot of the checkout screen.
    pub fn view(&self) -> CheckoutView {
        self.view.borrow().clone()
    }

    pub fn step(&self) -> CheckoutStep {
        self.view.borrow().step
    }

    /// Receives every view change, including countdown ticks.
    pub fn subscribe(&self) -> watch::Receiver<CheckoutView> {
        self.view.subscribe()
    }

    /// Submits `cart` for payment and starts the processing window.
    ///
    /// On any store failure the controller stays in the `cart` step.
    pub async fn submit(&mut self, cart: &Cart) -> Result<CheckoutOrder> {
        let step = self.step();
        if step != CheckoutStep::Cart {
            return Err(CheckoutError::InvalidStep {
                expected: CheckoutStep::Cart,
                actual: step,
            });
        }
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let mut order = self.store.submit(cart).await?;
        self.store
            .set_status(order.order_id, OrderStatus::Processing)
            .await?;
        order.status = OrderStatus::Processing;

        info!(
            order_id = %order.order_id,
            items = cart.item_count(),
            total = %order.total,
            "Order submitted; processing payment"
        );

        let started = Instant::now();
        let (cancel_tx, cancel_rx) = mpsc::channel(1);
        self.view.send_replace(CheckoutView {
            step: CheckoutStep::Processing,
            order: Some(order.clone()),
            countdown: Countdown::new(self.config.countdown_ticks()),
            cancel_enabled: false,
            reason: None,
        });

        let task = ProcessingTask {
            order: order.clone(),
            started,
            store: Arc::clone(&self.store),
            gateway: Arc::clone(&self.gateway),
            config: self.config.clone(),
            view: Arc::clone(&self.view),
            cancel_rx,
        }
        .spawn();

        self.active = Some(ActiveOrder {
            started,
            cancel_tx,
            task,
        });

        Ok(order)
    }

    /// Cancels the processing order on the user's behalf.
    ///
    /// Only available once the grace period has elapsed. Returns the order's
    /// actual outcome, which is `paid` if the payment completed first.
    pub async fn cancel(&self) -> Result<CheckoutOutcome> {
        let view = self.view();
        let active = match (&self.active, view.step) {
            (Some(active), CheckoutStep::Processing) => active,
            (_, actual) => {
                return Err(CheckoutError::InvalidStep {
                    expected: CheckoutStep::Processing,
                    actual,
                });
            }
        };

        if !view.cancel_enabled {
            let remaining = self
                .config
                .cancel_grace
                .saturating_sub(active.started.elapsed());
            return Err(CheckoutError::CancelUnavailable { remaining });
        }

        if active.cancel_tx.try_send(()).is_err() {
            debug!("Cancellation already requested");
        }
        self.wait_for_result().await
    }

    /// Waits until the processing order reaches a terminal status.
    pub async fn wait_for_result(&self) -> Result<CheckoutOutcome> {
        let mut rx = self.view.subscribe();
        let view = rx
            .wait_for(|v| v.step != CheckoutStep::Processing)
            .await
            .map_err(|e| CheckoutError::InternalError(Box::new(e)))?
            .clone();

        view.outcome().ok_or(CheckoutError::InvalidStep {
            expected: CheckoutStep::Processing,
            actual: view.step,
        })
    }

    /// Leaves the result screen and starts over with an empty order.
    pub fn reset(&mut self) -> Result<()> {
        match self.step() {
            CheckoutStep::Cart => Ok(()),
            CheckoutStep::Processing => Err(CheckoutError::InvalidStep {
                expected: CheckoutStep::Result,
                actual: CheckoutStep::Processing,
            }),
            CheckoutStep::Result => {
                self.abort_active();
                self.view.send_replace(CheckoutView::default());
                info!("Checkout reset");
                Ok(())
            }
        }
    }

    /// Tears the checkout down, stopping every timer of the current order.
    ///
    /// A processing order is left `processing` in the store; the caller went
    /// away before it resolved.
    pub fn dispose(&mut self) {
        self.abort_active();
        self.view.send_replace(CheckoutView::default());
    }

    fn abort_active(&mut self) {
        if let Some(active) = self.active.take() {
            active.task.abort();
        }
    }
}

impl Drop for CheckoutController {
    fn drop(&mut self) {
        self.abort_active();
    }
}
