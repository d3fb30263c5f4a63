//! File formats at the edge of the crate: carts and results as CSV, the
//! catalog as JSON.

pub mod csv;
pub mod json;
