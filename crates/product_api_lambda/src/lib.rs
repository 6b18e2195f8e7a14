//! AWS-oriented adapters and handlers for the product API.
//!
//! This crate owns runtime integration details (the Lambda handler, the
//! DynamoDB store adapter) and exposes a single runtime module boundary for
//! the contract, routing, and numeric primitives.

pub mod adapters;
pub mod handlers;
pub mod runtime;
