use crate::domain::cart::Cart;
use crate::domain::order::{CheckoutOrder, OrderId, OrderStatus};
use crate::domain::ports::OrderStore;
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use jiff::Timestamp;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory order store.
///
/// Uses `Arc<RwLock<HashMap<OrderId, CheckoutOrder>>>` to allow shared concurrent access.
/// Ideal for testing or single-run sessions where persistence is not required.
#[derive(Default, Clone)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<OrderId, CheckoutOrder>>>,
}

impl InMemoryOrderStore {
    /// Creates a new, empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn submit(&self, cart: &Cart) -> Result<CheckoutOrder> {
        let order = CheckoutOrder::new(OrderId::new(), cart, Timestamp::now())?;
        let mut orders = self.orders.write().await;
        orders.insert(order.order_id, order.clone());
        Ok(order)
    }

    async fn set_status(&self, order_id: OrderId, status: OrderStatus) -> Result<()> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(&order_id)
            .ok_or(CheckoutError::OrderNotFound(order_id))?;
        order.status.ensure_transition(order_id, status)?;
        order.status = status;
        Ok(())
    }

    async fn get(&self, order_id: OrderId) -> Result<Option<CheckoutOrder>> {
        let orders = self.orders.read().await;
        Ok(orders.get(&order_id).cloned())
    }

    async fn all_orders(&self) -> Result<Vec<CheckoutOrder>> {
        let orders = self.orders.read().await;
        let mut all: Vec<CheckoutOrder> = orders.values().cloned().collect();
        all.sort_by_key(|order| (order.created_at, order.order_id));
        Ok(all)
    }
}
