use crate::domain::cart::Cart;
use crate::domain::money::Money;
use crate::error::CheckoutError;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub Uuid);

impl OrderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Paid,
    Failed,
}

impl OrderStatus {
    /// `Paid` and `Failed` end the order's lifecycle.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Paid | OrderStatus::Failed)
    }

    /// Checks that an order in this status may move to `next`.
    ///
    /// Terminal statuses only accept themselves, so a resolved order is never
    /// re-transitioned.
    pub fn ensure_transition(
        self,
        order_id: OrderId,
        next: OrderStatus,
    ) -> Result<(), CheckoutError> {
        if self.is_terminal() && self != next {
            return Err(CheckoutError::AlreadyTerminal {
                order_id,
                status: self,
            });
        }
        Ok(())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Paid => "paid",
            OrderStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A submitted cart awaiting payment confirmation.
///
/// The order store is the system of record; the checkout workflow only ever
/// moves `status` forward and never deletes orders.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct CheckoutOrder {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub cart_snapshot: Cart,
    pub subtotal: Money,
    pub total: Money,
    pub created_at: Timestamp,
}

impl CheckoutOrder {
    /// Snapshots `cart` into a new pending order.
    pub fn new(
        order_id: OrderId,
        cart: &Cart,
        created_at: Timestamp,
    ) -> Result<Self, CheckoutError> {
        let subtotal = cart.subtotal()?;
        Ok(Self {
            order_id,
            status: OrderStatus::Pending,
            cart_snapshot: cart.clone(),
            subtotal,
            total: subtotal,
            created_at,
        })
    }
}
