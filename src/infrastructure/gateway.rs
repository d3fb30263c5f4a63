use crate::domain::order::{CheckoutOrder, OrderId};
use crate::domain::ports::{PaymentConfirmation, PaymentGateway};
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use rand::Rng;
use std::collections::{HashMap, VecDeque};
use std::ops::Range;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

/// How long a confirmation that arrives before its checkout is kept.
const EARLY_CONFIRMATION_TTL: Duration = Duration::from_secs(60);
/// Upper bound on confirmations kept for orders nobody is waiting on.
const EARLY_CONFIRMATION_CAPACITY: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Delay {
    Fixed(Duration),
    Random(Range<Duration>),
    Never,
}

/// Stand-in for a real payment provider: confirms every payment after a delay.
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    delay: Delay,
}

impl SimulatedGateway {
    /// Confirms after a delay drawn uniformly from `window`.
    pub fn random(window: Range<Duration>) -> Self {
        Self {
            delay: Delay::Random(window),
        }
    }

    pub fn fixed(delay: Duration) -> Self {
        Self {
            delay: Delay::Fixed(delay),
        }
    }

    /// Never confirms; every order runs into its timeout unless cancelled.
    pub fn never() -> Self {
        Self { delay: Delay::Never }
    }

    fn next_delay(&self) -> Option<Duration> {
        match &self.delay {
            Delay::Fixed(delay) => Some(*delay),
            Delay::Random(window) if window.is_empty() => Some(window.start),
            Delay::Random(window) => Some(rand::thread_rng().gen_range(window.clone())),
            Delay::Never => None,
        }
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn confirmation(&self, order: &CheckoutOrder) -> Result<PaymentConfirmation> {
        let Some(delay) = self.next_delay() else {
            return std::future::pending().await;
        };
        debug!(order_id = %order.order_id, ?delay, "Simulating payment");
        tokio::time::sleep(delay).await;
        Ok(PaymentConfirmation {
            reference: format!("sim-{}", Uuid::new_v4()),
        })
    }
}

struct EarlyConfirmation {
    order_id: OrderId,
    confirmation: PaymentConfirmation,
    received: Instant,
}

#[derive(Default)]
struct Slots {
    waiting: HashMap<OrderId, oneshot::Sender<PaymentConfirmation>>,
    early: VecDeque<EarlyConfirmation>,
}

impl Slots {
    fn prune(&mut self) {
        let now = Instant::now();
        self.early
            .retain(|entry| now.duration_since(entry.received) < EARLY_CONFIRMATION_TTL);
    }

    fn take_early(&mut self, order_id: OrderId) -> Option<PaymentConfirmation> {
        self.prune();
        let index = self.early.iter().position(|e| e.order_id == order_id)?;
        self.early.remove(index).map(|e| e.confirmation)
    }

    fn keep_early(&mut self, order_id: OrderId, confirmation: PaymentConfirmation) {
        self.prune();
        self.early.retain(|e| e.order_id != order_id);
        if self.early.len() >= EARLY_CONFIRMATION_CAPACITY {
            self.early.pop_front();
        }
        self.early.push_back(EarlyConfirmation {
            order_id,
            confirmation,
            received: Instant::now(),
        });
    }
}

/// Gateway driven by external notifications, e.g. a provider webhook.
///
/// The checkout waits on [`PaymentGateway::confirmation`] until someone calls
/// [`CallbackGateway::notify`] for the same order. A notification that arrives
/// before the checkout starts waiting is kept for a minute, and at most
/// 1024 of them are kept at once. A waiting slot is released as soon as its
/// checkout stops waiting, whether it was paid, failed or torn down.
#[derive(Default, Clone)]
pub struct CallbackGateway {
    slots: Arc<Mutex<Slots>>,
}

impl CallbackGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Delivers a confirmation for `order_id`.
    ///
    /// Returns `true` if a checkout was waiting on it. Otherwise the
    /// confirmation is kept for a checkout that has not started waiting yet.
    pub fn notify(&self, order_id: OrderId, confirmation: PaymentConfirmation) -> bool {
        let mut slots = self.slots();
        match slots.waiting.remove(&order_id) {
            Some(tx) => {
                let delivered = tx.send(confirmation).is_ok();
                if !delivered {
                    debug!(%order_id, "Confirmation arrived after the order resolved");
                }
                delivered
            }
            None => {
                slots.keep_early(order_id, confirmation);
                debug!(
                    %order_id,
                    early = slots.early.len(),
                    "Keeping confirmation for a later checkout"
                );
                false
            }
        }
    }

    /// Number of waiting checkouts plus unexpired early confirmations.
    pub fn pending(&self) -> usize {
        let mut slots = self.slots();
        slots.prune();
        slots.waiting.len() + slots.early.len()
    }
}

/// Releases the waiting slot when the checkout stops waiting, including when
/// its future is dropped on timeout, cancellation or teardown.
struct WaitingSlot<'a> {
    gateway: &'a CallbackGateway,
    order_id: OrderId,
}

impl Drop for WaitingSlot<'_> {
    fn drop(&mut self) {
        self.gateway.slots().waiting.remove(&self.order_id);
    }
}

#[async_trait]
impl PaymentGateway for CallbackGateway {
    async fn confirmation(&self, order: &CheckoutOrder) -> Result<PaymentConfirmation> {
        let order_id = order.order_id;
        let rx = {
            let mut slots = self.slots();
            if let Some(confirmation) = slots.take_early(order_id) {
                return Ok(confirmation);
            }
            let (tx, rx) = oneshot::channel();
            slots.waiting.insert(order_id, tx);
            rx
        };
        let _slot = WaitingSlot {
            gateway: self,
            order_id,
        };
        rx.await
            .map_err(|e| CheckoutError::InternalError(Box::new(e)))
    }
}
