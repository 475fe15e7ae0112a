//! Integration tests for the product-master endpoints.
//!
//! These tests require:
//! - A running `PostgreSQL` database populated by the upstream MES
//! - The API server running (cargo run -p mes-api)
//!
//! Run with: cargo test -p mes-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::Value;

/// Base URL for the dashboard API (configurable via environment).
fn base_url() -> String {
    std::env::var("MES_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

fn client() -> Client {
    Client::new()
}

// ============================================================================
// List Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running mes-api server and MES database"]
async fn test_product_list_is_bare_array() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/api/production-products"))
        .send()
        .await
        .expect("Failed to get product list");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");

    // These endpoints answer bare JSON, no success envelope
    let rows = body.as_array().expect("response should be an array");
    if let Some(row) = rows.first() {
        assert!(row.get("ItemCode").is_some());
        assert!(row.get("ItemName").is_some());
    }
}

#[tokio::test]
#[ignore = "Requires running mes-api server and MES database"]
async fn test_product_types_list() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/api/production-products/types"))
        .send()
        .await
        .expect("Failed to get product types");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert!(body.is_array());
}

// ============================================================================
// Search Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running mes-api server and MES database"]
async fn test_product_search_page_shape() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .get(format!(
            "{base_url}/api/production-products/search?page=1&pageSize=10"
        ))
        .send()
        .await
        .expect("Failed to search products");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");

    assert_eq!(body.get("page").and_then(Value::as_i64), Some(1));
    assert_eq!(body.get("pageSize").and_then(Value::as_i64), Some(10));
    assert!(body.get("total").is_some_and(Value::is_i64));

    let items = body
        .get("items")
        .and_then(Value::as_array)
        .expect("items should be an array");
    assert!(items.len() <= 10);

    for item in items {
        // Products without MHU rows still come back with an empty array
        assert!(item.get("MhuTypes").is_some_and(Value::is_array));
    }
}

#[tokio::test]
#[ignore = "Requires running mes-api server and MES database"]
async fn test_product_search_status_filter() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .get(format!(
            "{base_url}/api/production-products/search?statuses=ACTIVE"
        ))
        .send()
        .await
        .expect("Failed to search active products");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");

    for item in body
        .get("items")
        .and_then(Value::as_array)
        .expect("items should be an array")
    {
        assert_eq!(
            item.get("Item_Status").and_then(Value::as_str),
            Some("ACTIVE")
        );
    }

    // INACTIVE also matches rows with no status recorded
    let resp = client
        .get(format!(
            "{base_url}/api/production-products/search?statuses=INACTIVE"
        ))
        .send()
        .await
        .expect("Failed to search inactive products");

    let body: Value = resp.json().await.expect("Failed to parse response");
    for item in body
        .get("items")
        .and_then(Value::as_array)
        .expect("items should be an array")
    {
        let status = item.get("Item_Status");
        assert!(status.is_some_and(|s| s.is_null() || s.as_str() == Some("INACTIVE")));
    }
}

// ============================================================================
// Detail & Stats Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running mes-api server and MES database"]
async fn test_product_show_not_found_shape() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .get(format!(
            "{base_url}/api/production-products/no-such-item-xyzzy"
        ))
        .send()
        .await
        .expect("Failed to get product detail");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("Failed to parse response");

    // Failure shape is {error: message}, not the standard envelope
    assert!(body.get("error").is_some_and(Value::is_string));
    assert!(body.get("success").is_none());
}

#[tokio::test]
#[ignore = "Requires running mes-api server and MES database"]
async fn test_product_stats_counters() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/api/production-products/stats"))
        .send()
        .await
        .expect("Failed to get product stats");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");

    let total = body
        .get("totalProducts")
        .and_then(Value::as_i64)
        .expect("totalProducts");
    let active = body
        .get("activeProducts")
        .and_then(Value::as_i64)
        .expect("activeProducts");
    assert!(active <= total);
    assert!(body.get("totalTypes").is_some_and(Value::is_i64));
    assert!(body.get("totalCategories").is_some_and(Value::is_i64));
    assert!(body.get("totalGroups").is_some_and(Value::is_i64));
}
