use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const PRODUCT_KEY_ATTRIBUTE: &str = "productId";
pub const STOCK_LEVEL_ATTRIBUTE: &str = "stockLevel";

/// Attribute names a caller may set through the update endpoint. The key
/// attribute is deliberately absent: the primary key is immutable.
pub const MUTABLE_ATTRIBUTES: &[&str] = &[
    "productName",
    "description",
    "category",
    "price",
    STOCK_LEVEL_ATTRIBUTE,
];

/// A product record as it crosses the wire: free-form attributes keyed by
/// name, with `productId` as the only required (integer) attribute.
pub type ProductItem = Map<String, Value>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateProductRequest {
    pub product_id: i64,
    pub item: ProductItem,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub product_id: i64,
    pub update_key: String,
    pub update_value: Value,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProductRequest {
    pub product_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

impl CreateProductRequest {
    /// Accepts any JSON object as the submitted record, but the key
    /// attribute must be present and integer-valued before a write is
    /// attempted.
    pub fn parse(body: &Value) -> Result<Self, ValidationError> {
        let Some(object) = body.as_object() else {
            return Err(ValidationError::new("Request body must be a JSON object"));
        };

        let Some(key_value) = object.get(PRODUCT_KEY_ATTRIBUTE) else {
            return Err(ValidationError::new(format!(
                "Request body is missing '{PRODUCT_KEY_ATTRIBUTE}'"
            )));
        };

        let Some(product_id) = key_value.as_i64() else {
            return Err(ValidationError::new(format!(
                "'{PRODUCT_KEY_ATTRIBUTE}' must be an integer"
            )));
        };

        Ok(Self {
            product_id,
            item: object.clone(),
        })
    }
}

impl UpdateProductRequest {
    /// Parses and validates an update body. `updateKey` must name an
    /// allow-listed mutable attribute; caller input never reaches a store
    /// expression unchecked.
    pub fn parse(body: &Value) -> Result<Self, ValidationError> {
        let request: Self = serde_json::from_value(body.clone())
            .map_err(|error| ValidationError::new(format!("Malformed update request: {error}")))?;

        if !MUTABLE_ATTRIBUTES.contains(&request.update_key.as_str()) {
            return Err(ValidationError::new(format!(
                "Attribute '{}' is not updatable",
                request.update_key
            )));
        }

        Ok(request)
    }
}

impl DeleteProductRequest {
    pub fn parse(body: &Value) -> Result<Self, ValidationError> {
        serde_json::from_value(body.clone())
            .map_err(|error| ValidationError::new(format!("Malformed delete request: {error}")))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn create_request_keeps_free_form_attributes() {
        let body = json!({
            "productId": 42,
            "productName": "wrench",
            "stockLevel": 7,
            "color": "red"
        });

        let request = CreateProductRequest::parse(&body).expect("body should parse");
        assert_eq!(request.product_id, 42);
        assert_eq!(request.item.len(), 4);
        assert_eq!(request.item["color"], json!("red"));
    }

    #[test]
    fn create_request_rejects_missing_product_id() {
        let error = CreateProductRequest::parse(&json!({"productName": "wrench"}))
            .expect_err("body should fail");
        assert_eq!(error.message(), "Request body is missing 'productId'");
    }

    #[test]
    fn create_request_rejects_non_integer_product_id() {
        let error = CreateProductRequest::parse(&json!({"productId": "42"}))
            .expect_err("body should fail");
        assert_eq!(error.message(), "'productId' must be an integer");
    }

    #[test]
    fn create_request_rejects_non_object_body() {
        let error =
            CreateProductRequest::parse(&json!([1, 2, 3])).expect_err("body should fail");
        assert_eq!(error.message(), "Request body must be a JSON object");
    }

    #[test]
    fn update_request_accepts_allow_listed_attribute() {
        let body = json!({
            "productId": 7,
            "updateKey": "stockLevel",
            "updateValue": 120
        });

        let request = UpdateProductRequest::parse(&body).expect("body should parse");
        assert_eq!(request.product_id, 7);
        assert_eq!(request.update_key, "stockLevel");
        assert_eq!(request.update_value, json!(120));
    }

    #[test]
    fn update_request_rejects_unknown_attribute() {
        let body = json!({
            "productId": 7,
            "updateKey": "stockLevel = :v REMOVE secret",
            "updateValue": 0
        });

        let error = UpdateProductRequest::parse(&body).expect_err("body should fail");
        assert_eq!(
            error.message(),
            "Attribute 'stockLevel = :v REMOVE secret' is not updatable"
        );
    }

    #[test]
    fn update_request_rejects_key_attribute() {
        let body = json!({
            "productId": 7,
            "updateKey": "productId",
            "updateValue": 8
        });

        UpdateProductRequest::parse(&body).expect_err("key attribute should not be updatable");
    }

    #[test]
    fn update_request_rejects_missing_fields() {
        let error = UpdateProductRequest::parse(&json!({"productId": 7}))
            .expect_err("body should fail");
        assert!(error.message().starts_with("Malformed update request"));
    }

    #[test]
    fn delete_request_requires_integer_product_id() {
        let request =
            DeleteProductRequest::parse(&json!({"productId": 3})).expect("body should parse");
        assert_eq!(request.product_id, 3);

        DeleteProductRequest::parse(&json!({"productId": "three"}))
            .expect_err("body should fail");
    }
}
