//! Application layer containing the checkout workflow orchestration.
//!
//! `CheckoutController` is the entry point: it submits orders, exposes the
//! client-visible view, and hands each processing order to its own task that
//! owns the order's timers.

pub mod checkout;
pub mod config;
mod processing;
