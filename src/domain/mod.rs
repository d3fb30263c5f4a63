//! Domain types for the storefront checkout: money, carts, the catalog,
//! orders, the workflow's client-visible state, and the ports to external
//! collaborators.

pub mod cart;
pub mod catalog;
pub mod money;
pub mod order;
pub mod ports;
pub mod workflow;
