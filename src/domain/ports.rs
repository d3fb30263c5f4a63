use super::cart::Cart;
use super::order::{CheckoutOrder, OrderId, OrderStatus};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The server-side system of record for orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Creates a `pending` order from a snapshot of `cart`.
    async fn submit(&self, cart: &Cart) -> Result<CheckoutOrder>;
    /// Persists a status. Setting the same status twice is harmless.
    async fn set_status(&self, order_id: OrderId, status: OrderStatus) -> Result<()>;
    async fn get(&self, order_id: OrderId) -> Result<Option<CheckoutOrder>>;
    async fn all_orders(&self) -> Result<Vec<CheckoutOrder>>;
}

/// Proof that a payment went through.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct PaymentConfirmation {
    pub reference: String,
}

/// Source of payment completion events.
///
/// The checkout workflow only cares that `confirmation` eventually resolves;
/// whether that is a simulated delay or a gateway webhook is up to the
/// implementation.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn confirmation(&self, order: &CheckoutOrder) -> Result<PaymentConfirmation>;
}

pub type OrderStoreHandle = Arc<dyn OrderStore>;
pub type PaymentGatewayHandle = Arc<dyn PaymentGateway>;
