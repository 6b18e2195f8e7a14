//! Runtime boundary over the shared contract crate.

pub use product_api_core::{contract, numeric, routing};
