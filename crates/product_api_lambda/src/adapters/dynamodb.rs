use std::collections::HashMap;
use std::future::Future;

use aws_sdk_dynamodb::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client;
use serde_json::{Map, Value};

use crate::adapters::store::{ProductStore, ScanCursor, ScanPage, StoreError};
use crate::runtime::contract::{ProductItem, PRODUCT_KEY_ATTRIBUTE};
use crate::runtime::numeric::decimal_to_number;

/// DynamoDB-backed implementation of the store port. Constructed once in
/// `main` and handed to the dispatcher by reference; there is no implicit
/// process-wide handle.
pub struct DynamoDbProductStore {
    client: Client,
    table_name: String,
}

impl DynamoDbProductStore {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

impl ProductStore for DynamoDbProductStore {
    fn get_item(
        &self,
        product_id: i64,
        projection: Option<&str>,
    ) -> Result<Option<ProductItem>, StoreError> {
        let mut request = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(key_for(product_id)));
        if let Some(projection) = projection {
            request = request.projection_expression(projection);
        }

        let output = block_on(request.send()).map_err(map_sdk_error)?;
        output.item().map(item_to_json).transpose()
    }

    fn put_item(&self, item: &ProductItem) -> Result<(), StoreError> {
        block_on(
            self.client
                .put_item()
                .table_name(&self.table_name)
                .set_item(Some(json_to_item(item)))
                .send(),
        )
        .map_err(map_sdk_error)?;
        Ok(())
    }

    fn update_attribute(
        &self,
        product_id: i64,
        attribute: &str,
        value: &Value,
    ) -> Result<ProductItem, StoreError> {
        // The attribute name is bound through a placeholder, never spliced
        // into the expression text.
        let output = block_on(
            self.client
                .update_item()
                .table_name(&self.table_name)
                .set_key(Some(key_for(product_id)))
                .update_expression("SET #attr = :value")
                .condition_expression("attribute_exists(#key)")
                .expression_attribute_names("#attr", attribute)
                .expression_attribute_names("#key", PRODUCT_KEY_ATTRIBUTE)
                .expression_attribute_values(":value", value_to_attribute(value))
                .return_values(ReturnValue::UpdatedNew)
                .send(),
        )
        .map_err(|error| {
            if let SdkError::ServiceError(context) = &error {
                if context.err().is_conditional_check_failed_exception() {
                    return StoreError::Client(format!(
                        "No product found with {PRODUCT_KEY_ATTRIBUTE} {product_id}"
                    ));
                }
            }
            map_sdk_error(error)
        })?;

        match output.attributes() {
            Some(attributes) => item_to_json(attributes),
            None => Ok(ProductItem::new()),
        }
    }

    fn delete_item(&self, product_id: i64) -> Result<Option<ProductItem>, StoreError> {
        let output = block_on(
            self.client
                .delete_item()
                .table_name(&self.table_name)
                .set_key(Some(key_for(product_id)))
                .return_values(ReturnValue::AllOld)
                .send(),
        )
        .map_err(map_sdk_error)?;

        output.attributes().map(item_to_json).transpose()
    }

    fn scan_page(
        &self,
        projection: Option<&str>,
        cursor: Option<&ScanCursor>,
    ) -> Result<ScanPage, StoreError> {
        let mut request = self.client.scan().table_name(&self.table_name);
        if let Some(projection) = projection {
            request = request.projection_expression(projection);
        }
        if let Some(cursor) = cursor {
            request = request.set_exclusive_start_key(Some(json_to_item(cursor)));
        }

        let output = block_on(request.send()).map_err(map_sdk_error)?;
        let items = output
            .items()
            .iter()
            .map(item_to_json)
            .collect::<Result<Vec<_>, _>>()?;
        let next_cursor = output.last_evaluated_key().map(item_to_json).transpose()?;

        Ok(ScanPage { items, next_cursor })
    }
}

/// Handlers are synchronous; SDK calls bridge onto the ambient multi-thread
/// runtime.
fn block_on<T>(future: impl Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

fn key_for(product_id: i64) -> HashMap<String, AttributeValue> {
    HashMap::from([(
        PRODUCT_KEY_ATTRIBUTE.to_string(),
        AttributeValue::N(product_id.to_string()),
    )])
}

fn map_sdk_error<E>(error: SdkError<E>) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    match error {
        SdkError::ServiceError(context) => {
            let service_error = context.into_err();
            StoreError::Client(
                service_error
                    .message()
                    .unwrap_or("The item store rejected the request")
                    .to_string(),
            )
        }
        other => StoreError::Internal(other.to_string()),
    }
}

/// Converts a stored attribute tree to a JSON value, normalizing every
/// decimal on the way: integral decimals become JSON integers, everything
/// else a float. Applies recursively through nested maps and lists.
pub fn attribute_to_value(attribute: &AttributeValue) -> Result<Value, StoreError> {
    match attribute {
        AttributeValue::S(text) => Ok(Value::String(text.clone())),
        AttributeValue::N(text) => number_value(text),
        AttributeValue::Bool(flag) => Ok(Value::Bool(*flag)),
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::L(entries) => entries
            .iter()
            .map(attribute_to_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        AttributeValue::M(entries) => {
            let mut object = Map::with_capacity(entries.len());
            for (name, entry) in entries {
                object.insert(name.clone(), attribute_to_value(entry)?);
            }
            Ok(Value::Object(object))
        }
        AttributeValue::Ss(values) => Ok(Value::Array(
            values.iter().cloned().map(Value::String).collect(),
        )),
        AttributeValue::Ns(values) => values
            .iter()
            .map(|text| number_value(text))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        other => Err(StoreError::Internal(format!(
            "Unsupported attribute value: {other:?}"
        ))),
    }
}

fn number_value(text: &str) -> Result<Value, StoreError> {
    decimal_to_number(text)
        .map(Value::Number)
        .map_err(|error| StoreError::Internal(error.message().to_string()))
}

pub fn value_to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(flag) => AttributeValue::Bool(*flag),
        Value::Number(number) => AttributeValue::N(number.to_string()),
        Value::String(text) => AttributeValue::S(text.clone()),
        Value::Array(entries) => {
            AttributeValue::L(entries.iter().map(value_to_attribute).collect())
        }
        Value::Object(entries) => AttributeValue::M(
            entries
                .iter()
                .map(|(name, entry)| (name.clone(), value_to_attribute(entry)))
                .collect(),
        ),
    }
}

pub fn item_to_json(item: &HashMap<String, AttributeValue>) -> Result<ProductItem, StoreError> {
    let mut object = ProductItem::new();
    for (name, attribute) in item {
        object.insert(name.clone(), attribute_to_value(attribute)?);
    }
    Ok(object)
}

pub fn json_to_item(object: &ProductItem) -> HashMap<String, AttributeValue> {
    object
        .iter()
        .map(|(name, value)| (name.clone(), value_to_attribute(value)))
        .collect()
}
