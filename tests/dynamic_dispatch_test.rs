use gamecart::domain::order::OrderStatus;
use gamecart::domain::ports::{OrderStoreHandle, PaymentGatewayHandle};
use gamecart::infrastructure::gateway::SimulatedGateway;
use gamecart::infrastructure::in_memory::InMemoryOrderStore;
use std::sync::Arc;
use std::time::Duration;

mod common;

#[tokio::test]
async fn test_ports_as_trait_objects() {
    let store: OrderStoreHandle = Arc::new(InMemoryOrderStore::new());
    let gateway: PaymentGatewayHandle = Arc::new(SimulatedGateway::fixed(Duration::ZERO));

    let order = store.submit(&common::sample_cart()).await.unwrap();

    // Verify Send + Sync by spawning tasks
    let store_handle = {
        let store = Arc::clone(&store);
        let order_id = order.order_id;
        tokio::spawn(async move {
            store.set_status(order_id, OrderStatus::Paid).await.unwrap();
            store.get(order_id).await.unwrap().unwrap()
        })
    };
    let gateway_handle = {
        let order = order.clone();
        tokio::spawn(async move { gateway.confirmation(&order).await.unwrap() })
    };

    let stored = store_handle.await.unwrap();
    assert_eq!(stored.status, OrderStatus::Paid);

    let confirmation = gateway_handle.await.unwrap();
    assert!(confirmation.reference.starts_with("sim-"));
}
