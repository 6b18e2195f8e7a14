use crate::contract::ValidationError;

pub const STATUS_PATH: &str = "/status";
pub const PRODUCTS_PATH: &str = "/products";
pub const INVENTORY_PATH: &str = "/inventory";

/// Every operation the API exposes. `NotFound` is a route, not an error:
/// unmatched requests deterministically produce a 404 body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    StatusCheck,
    ListProducts,
    GetProduct { product_id: i64 },
    CreateProduct,
    UpdateProduct,
    DeleteProduct,
    TotalInventory,
    ProductInventory { product_id: i64 },
    NotFound,
}

/// Resolves a method/path pair to a route. A trailing path segment that
/// should be an integer id but is not parseable is a validation error, which
/// the dispatcher surfaces as a generic 400.
pub fn resolve_route(method: &str, path: &str) -> Result<Route, ValidationError> {
    let route = match (method, path) {
        ("GET", STATUS_PATH) => Route::StatusCheck,
        ("GET", PRODUCTS_PATH) => Route::ListProducts,
        ("POST", PRODUCTS_PATH) => Route::CreateProduct,
        ("PUT", PRODUCTS_PATH) => Route::UpdateProduct,
        ("DELETE", PRODUCTS_PATH) => Route::DeleteProduct,
        ("GET", INVENTORY_PATH) => Route::TotalInventory,
        ("GET", _) => {
            if let Some(segment) = id_segment(path, PRODUCTS_PATH) {
                Route::GetProduct {
                    product_id: parse_id_segment(segment)?,
                }
            } else if let Some(segment) = id_segment(path, INVENTORY_PATH) {
                Route::ProductInventory {
                    product_id: parse_id_segment(segment)?,
                }
            } else {
                Route::NotFound
            }
        }
        _ => Route::NotFound,
    };
    Ok(route)
}

fn id_segment<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    path.strip_prefix(prefix)?.strip_prefix('/')
}

fn parse_id_segment(segment: &str) -> Result<i64, ValidationError> {
    segment.parse::<i64>().map_err(|_| {
        ValidationError::new(format!(
            "Path segment '{segment}' is not a valid product id"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_status_check() {
        assert_eq!(
            resolve_route("GET", "/status").expect("route should resolve"),
            Route::StatusCheck
        );
    }

    #[test]
    fn resolves_product_collection_routes_by_method() {
        assert_eq!(
            resolve_route("GET", "/products").expect("route should resolve"),
            Route::ListProducts
        );
        assert_eq!(
            resolve_route("POST", "/products").expect("route should resolve"),
            Route::CreateProduct
        );
        assert_eq!(
            resolve_route("PUT", "/products").expect("route should resolve"),
            Route::UpdateProduct
        );
        assert_eq!(
            resolve_route("DELETE", "/products").expect("route should resolve"),
            Route::DeleteProduct
        );
    }

    #[test]
    fn resolves_single_product_by_trailing_id() {
        assert_eq!(
            resolve_route("GET", "/products/42").expect("route should resolve"),
            Route::GetProduct { product_id: 42 }
        );
        assert_eq!(
            resolve_route("GET", "/inventory/-3").expect("route should resolve"),
            Route::ProductInventory { product_id: -3 }
        );
    }

    #[test]
    fn resolves_inventory_aggregate() {
        assert_eq!(
            resolve_route("GET", "/inventory").expect("route should resolve"),
            Route::TotalInventory
        );
    }

    #[test]
    fn rejects_non_integer_id_segment() {
        let error = resolve_route("GET", "/products/abc").expect_err("route should fail");
        assert_eq!(
            error.message(),
            "Path segment 'abc' is not a valid product id"
        );

        resolve_route("GET", "/products/1/reviews").expect_err("route should fail");
    }

    #[test]
    fn unmatched_requests_fall_through_to_not_found() {
        assert_eq!(
            resolve_route("PATCH", "/products").expect("route should resolve"),
            Route::NotFound
        );
        assert_eq!(
            resolve_route("GET", "/orders").expect("route should resolve"),
            Route::NotFound
        );
        // Prefix match requires the separator; this is not a product route.
        assert_eq!(
            resolve_route("GET", "/productsabc").expect("route should resolve"),
            Route::NotFound
        );
        assert_eq!(
            resolve_route("POST", "/status").expect("route should resolve"),
            Route::NotFound
        );
    }
}
