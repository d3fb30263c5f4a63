use crate::domain::cart::Cart;
use crate::domain::order::{CheckoutOrder, OrderId, OrderStatus};
use crate::domain::ports::OrderStore;
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use jiff::Timestamp;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing orders.
pub const CF_ORDERS: &str = "orders";

/// A persistent order store implementation using RocksDB.
///
/// Orders are stored as JSON under their UUID bytes in the "orders" Column
/// Family, so a later run with the same path sees every earlier order.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// # Arguments
    ///
    /// * `path` - The filesystem path where the database will be stored.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_orders = ColumnFamilyDescriptor::new(CF_ORDERS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_orders])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn orders_cf(&self) -> Result<&ColumnFamily> {
        self.db.cf_handle(CF_ORDERS).ok_or_else(|| {
            CheckoutError::InternalError(Box::new(std::io::Error::other(
                "Orders column family not found",
            )))
        })
    }

    fn put(&self, order: &CheckoutOrder) -> Result<()> {
        let cf = self.orders_cf()?;
        let value = serde_json::to_vec(order)?;
        self.db.put_cf(&cf, order.order_id.0.as_bytes(), value)?;
        Ok(())
    }
}

#[async_trait]
impl OrderStore for RocksDBStore {
    async fn submit(&self, cart: &Cart) -> Result<CheckoutOrder> {
        let order = CheckoutOrder::new(OrderId::new(), cart, Timestamp::now())?;
        self.put(&order)?;
        Ok(order)
    }

    async fn set_status(&self, order_id: OrderId, status: OrderStatus) -> Result<()> {
        let mut order = self
            .get(order_id)
            .await?
            .ok_or(CheckoutError::OrderNotFound(order_id))?;
        order.status.ensure_transition(order_id, status)?;
        if order.status != status {
            order.status = status;
            self.put(&order)?;
        }
        Ok(())
    }

    async fn get(&self, order_id: OrderId) -> Result<Option<CheckoutOrder>> {
        let cf = self.orders_cf()?;
        match self.db.get_cf(&cf, order_id.0.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn all_orders(&self) -> Result<Vec<CheckoutOrder>> {
        let cf = self.orders_cf()?;

        let mut orders = Vec::new();
        for item in self.db.iterator_cf(&cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item?;
            let order: CheckoutOrder = serde_json::from_slice(&value)?;
            orders.push(order);
        }
        orders.sort_by_key(|order| (order.created_at, order.order_id));

        Ok(orders)
    }
}
