//! Shared product API domain primitives.
//!
//! This crate owns the request/response contract, route resolution, and
//! numeric normalization for the product API. It intentionally excludes
//! AWS SDK and Lambda runtime concerns.

pub mod contract;
pub mod numeric;
pub mod routing;
