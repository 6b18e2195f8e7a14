use serde_json::{Map, Value};

use crate::runtime::contract::ProductItem;

/// Opaque scan continuation token, resubmitted verbatim until the store
/// stops returning one.
pub type ScanCursor = Map<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct ScanPage {
    pub items: Vec<ProductItem>,
    pub next_cursor: Option<ScanCursor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store rejected the request; the message is safe to return to the
    /// caller.
    Client(String),
    /// Transport, serialization, or any other failure. Logged only, never
    /// echoed to the caller.
    Internal(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Client(message) => write!(f, "store client error: {message}"),
            Self::Internal(message) => write!(f, "store internal error: {message}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Port over the external item store. One implementation talks to DynamoDB;
/// tests substitute doubles.
pub trait ProductStore {
    /// Key lookup. `projection` restricts the returned attributes. A missing
    /// item is `Ok(None)`, not an error.
    fn get_item(
        &self,
        product_id: i64,
        projection: Option<&str>,
    ) -> Result<Option<ProductItem>, StoreError>;

    /// Unconditional put: an existing item with the same key is silently
    /// overwritten.
    fn put_item(&self, item: &ProductItem) -> Result<(), StoreError>;

    /// Sets a single attribute on an existing item and returns the updated
    /// attribute values. Fails with a client error when no item exists for
    /// the key.
    fn update_attribute(
        &self,
        product_id: i64,
        attribute: &str,
        value: &Value,
    ) -> Result<ProductItem, StoreError>;

    /// Deletes the item and returns its prior value. Deleting a missing key
    /// succeeds with `Ok(None)`.
    fn delete_item(&self, product_id: i64) -> Result<Option<ProductItem>, StoreError>;

    /// Fetches one page of a table scan. `cursor` is the continuation token
    /// from the previous page.
    fn scan_page(
        &self,
        projection: Option<&str>,
        cursor: Option<&ScanCursor>,
    ) -> Result<ScanPage, StoreError>;
}
