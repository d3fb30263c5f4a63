use crate::domain::order::{OrderId, OrderStatus};
use crate::domain::workflow::CheckoutStep;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Cannot check out an empty cart")]
    EmptyCart,
    #[error("Checkout is in the {actual} step, expected {expected}")]
    InvalidStep {
        expected: CheckoutStep,
        actual: CheckoutStep,
    },
    #[error("Cancellation is not available for another {remaining:?}")]
    CancelUnavailable { remaining: Duration },
    #[error("Order {0} not found")]
    OrderNotFound(OrderId),
    #[error("Order {order_id} is already {status}")]
    AlreadyTerminal {
        order_id: OrderId,
        status: OrderStatus,
    },
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDbError(#[from] rocksdb::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, CheckoutError>;
