//! Checkout workflow for the GameCart digital-goods storefront.
//!
//! A cart of game packages and gift cards is submitted as an order, which then
//! spends a bounded processing window waiting for payment. The window ends in
//! exactly one of: payment confirmation, timeout, or user cancellation.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
