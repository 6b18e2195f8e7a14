use serde::Serialize;
use serde_json::{json, Value};

use crate::adapters::store::{ProductStore, ScanCursor, StoreError};
use crate::runtime::contract::{
    ApiGatewayResponse, CreateProductRequest, DeleteProductRequest, ProductItem,
    UpdateProductRequest, ValidationError, STOCK_LEVEL_ATTRIBUTE,
};
use crate::runtime::routing::{resolve_route, Route};

pub const STATUS_BODY: &str = "Service is operational";
pub const NOT_FOUND_BODY: &str = "404 Not Found";
pub const GENERIC_ERROR_BODY: &str = "Error processing request";

enum HandlerError {
    Validation(ValidationError),
    Store(StoreError),
}

impl From<ValidationError> for HandlerError {
    fn from(error: ValidationError) -> Self {
        Self::Validation(error)
    }
}

impl From<StoreError> for HandlerError {
    fn from(error: StoreError) -> Self {
        Self::Store(error)
    }
}

/// Entry point for one invocation: routes the event and runs exactly one
/// handler. Nothing propagates past this function; every failure becomes a
/// 400 and unmatched routes a 404.
pub fn handle_api_event(event: Value, store: &dyn ProductStore) -> ApiGatewayResponse {
    log_api_info(
        "request_received",
        json!({
            "httpMethod": event.get("httpMethod"),
            "path": event.get("path"),
        }),
    );

    match dispatch(&event, store) {
        Ok(response) => response,
        Err(HandlerError::Store(StoreError::Client(message))) => {
            log_api_error("store_client_error", json!({"message": message}));
            error_response(400, Value::String(message))
        }
        Err(HandlerError::Store(StoreError::Internal(detail))) => {
            log_api_error("store_internal_error", json!({"detail": detail}));
            error_response(400, Value::String(GENERIC_ERROR_BODY.to_string()))
        }
        Err(HandlerError::Validation(error)) => {
            log_api_error("request_rejected", json!({"reason": error.message()}));
            error_response(400, Value::String(GENERIC_ERROR_BODY.to_string()))
        }
    }
}

fn dispatch(
    event: &Value,
    store: &dyn ProductStore,
) -> Result<ApiGatewayResponse, HandlerError> {
    let method = event
        .get("httpMethod")
        .and_then(Value::as_str)
        .ok_or_else(|| ValidationError::new("Request event is missing httpMethod"))?;
    let path = event
        .get("path")
        .and_then(Value::as_str)
        .ok_or_else(|| ValidationError::new("Request event is missing path"))?;

    match resolve_route(method, path)? {
        Route::StatusCheck => Ok(success_response(&STATUS_BODY)),
        Route::ListProducts => list_products(store),
        Route::GetProduct { product_id } => get_product(store, product_id),
        Route::CreateProduct => create_product(store, &request_body(event)?),
        Route::UpdateProduct => update_product(store, &request_body(event)?),
        Route::DeleteProduct => delete_product(store, &request_body(event)?),
        Route::TotalInventory => total_inventory(store),
        Route::ProductInventory { product_id } => product_inventory(store, product_id),
        Route::NotFound => Ok(error_response(
            404,
            Value::String(NOT_FOUND_BODY.to_string()),
        )),
    }
}

fn get_product(
    store: &dyn ProductStore,
    product_id: i64,
) -> Result<ApiGatewayResponse, HandlerError> {
    // A missing item is still a 200; the body is null.
    let item = store.get_item(product_id, None)?;
    Ok(success_response(&item))
}

fn product_inventory(
    store: &dyn ProductStore,
    product_id: i64,
) -> Result<ApiGatewayResponse, HandlerError> {
    let item = store.get_item(product_id, Some(STOCK_LEVEL_ATTRIBUTE))?;
    Ok(success_response(&item))
}

fn list_products(store: &dyn ProductStore) -> Result<ApiGatewayResponse, HandlerError> {
    let products = scan_all(store, None)?;
    Ok(success_response(&json!({ "products": products })))
}

fn total_inventory(store: &dyn ProductStore) -> Result<ApiGatewayResponse, HandlerError> {
    let items = scan_all(store, Some(STOCK_LEVEL_ATTRIBUTE))?;
    let total: i64 = items.iter().map(stock_level_units).sum();
    Ok(success_response(&json!({ "inventory": total })))
}

fn create_product(
    store: &dyn ProductStore,
    body: &Value,
) -> Result<ApiGatewayResponse, HandlerError> {
    let request = CreateProductRequest::parse(body)?;
    store.put_item(&request.item)?;

    log_api_info("product_saved", json!({"productId": request.product_id}));
    Ok(success_response(&json!({
        "operation": "SAVE",
        "message": "SUCCESS",
        "item": request.item,
    })))
}

fn update_product(
    store: &dyn ProductStore,
    body: &Value,
) -> Result<ApiGatewayResponse, HandlerError> {
    let request = UpdateProductRequest::parse(body)?;
    let updated =
        store.update_attribute(request.product_id, &request.update_key, &request.update_value)?;

    log_api_info(
        "product_updated",
        json!({"productId": request.product_id, "updateKey": request.update_key}),
    );
    Ok(success_response(&json!({
        "operation": "UPDATE",
        "message": "SUCCESS",
        "updatedAttributes": updated,
    })))
}

fn delete_product(
    store: &dyn ProductStore,
    body: &Value,
) -> Result<ApiGatewayResponse, HandlerError> {
    let request = DeleteProductRequest::parse(body)?;
    let previous = store.delete_item(request.product_id)?;

    log_api_info("product_deleted", json!({"productId": request.product_id}));
    Ok(success_response(&json!({
        "operation": "DELETE",
        "message": "SUCCESS",
        "item": previous,
    })))
}

/// Drains a paginated scan into one sequence, following the continuation
/// cursor until the store stops returning one. Iterative on purpose: page
/// counts are unbounded.
fn scan_all(
    store: &dyn ProductStore,
    projection: Option<&str>,
) -> Result<Vec<ProductItem>, StoreError> {
    let mut items = Vec::new();
    let mut cursor: Option<ScanCursor> = None;

    loop {
        let page = store.scan_page(projection, cursor.as_ref())?;
        items.extend(page.items);
        cursor = page.next_cursor;
        if cursor.is_none() {
            break;
        }
    }

    Ok(items)
}

/// Stock units an item contributes to the aggregate: the per-product
/// fractional part is not meaningful, so values truncate toward zero.
/// Missing or non-numeric stock levels contribute nothing.
fn stock_level_units(item: &ProductItem) -> i64 {
    match item.get(STOCK_LEVEL_ATTRIBUTE) {
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|value| value as i64))
            .unwrap_or(0),
        _ => 0,
    }
}

fn request_body(event: &Value) -> Result<Value, ValidationError> {
    match event.get("body") {
        None | Some(Value::Null) => Err(ValidationError::new("Request body is required")),
        Some(Value::String(text)) => serde_json::from_str(text)
            .map_err(|error| ValidationError::new(format!("Malformed JSON body: {error}"))),
        Some(body @ Value::Object(_)) => Ok(body.clone()),
        Some(_) => Err(ValidationError::new("Request body must be a JSON object")),
    }
}

fn success_response(payload: &impl Serialize) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code: 200,
        headers: json!({"Content-Type": "application/json"}),
        body: serde_json::to_string(payload).expect("response payload should serialize"),
    }
}

fn error_response(status_code: u16, payload: Value) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code,
        headers: json!({"Content-Type": "application/json"}),
        body: payload.to_string(),
    }
}

fn log_api_info(event: &str, details: Value) {
    eprintln!(
        "{}",
        json!({
            "component": "product_api",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

fn log_api_error(event: &str, details: Value) {
    eprintln!(
        "{}",
        json!({
            "component": "product_api",
            "level": "error",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}
