//! Integration tests for the material-consumption log endpoints.
//!
//! These tests require:
//! - A running `PostgreSQL` database populated by the upstream MES
//! - The API server running (cargo run -p mes-api)
//!
//! Run with: cargo test -p mes-integration-tests -- --ignored

use mes_core::Outcome;
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
async fn test_material_list_shape() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .get(format!(
            "{base_url}/api/production-materials?page=1&pageSize=10"
        ))
        .send()
        .await
        .expect("Failed to get material list");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body.get("success"), Some(&Value::Bool(true)));

    let data = body
        .get("data")
        .and_then(Value::as_array)
        .expect("data should be an array");
    assert!(data.len() <= 10);

    for row in data {
        assert!(row.get("id").is_some_and(Value::is_i64));
        assert!(row.get("count").is_some_and(Value::is_i64));
        // Legacy column spellings survive serialization untouched
        assert!(row.as_object().is_some_and(|o| o.contains_key("respone")));
        assert!(
            row.as_object()
                .is_some_and(|o| o.contains_key("operator_ID"))
        );
    }
}

// ============================================================================
// Search Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running mes-api server and MES database"]
async fn test_material_search_by_outcome() {
    let client = client();
    let base_url = base_url();

    for outcome in [Outcome::Success, Outcome::Failed] {
        let resp = client
            .get(format!(
                "{base_url}/api/production-materials/search?respone={}",
                outcome.as_str()
            ))
            .send()
            .await
            .expect("Failed to search by outcome");

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = resp.json().await.expect("Failed to parse response");

        for row in body
            .get("data")
            .and_then(Value::as_array)
            .expect("data should be an array")
        {
            assert_eq!(
                row.get("respone").and_then(Value::as_str),
                Some(outcome.as_str())
            );
        }
    }
}

#[tokio::test]
#[ignore = "Requires running mes-api server and MES database"]
async fn test_material_search_null_sentinel() {
    let client = client();
    let base_url = base_url();

    // The literal token NULL selects rows where the column is null
    let resp = client
        .get(format!(
            "{base_url}/api/production-materials/search?batchCode=NULL"
        ))
        .send()
        .await
        .expect("Failed to search with NULL sentinel");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");

    for row in body
        .get("data")
        .and_then(Value::as_array)
        .expect("data should be an array")
    {
        assert!(row.get("batchCode").is_some_and(Value::is_null));
    }
}

#[tokio::test]
#[ignore = "Requires running mes-api server and MES database"]
async fn test_material_search_csv_filters() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .get(format!(
            "{base_url}/api/production-materials/search?ingredientCode=ING-1,ING-2&fromDate=2024-01-01&toDate=2024-12-31"
        ))
        .send()
        .await
        .expect("Failed to search with CSV filters");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");

    for row in body
        .get("data")
        .and_then(Value::as_array)
        .expect("data should be an array")
    {
        let code = row.get("ingredientCode").and_then(Value::as_str);
        assert!(matches!(code, Some("ING-1" | "ING-2")));
    }
}

// ============================================================================
// Stats & Dropdown Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running mes-api server and MES database"]
async fn test_material_stats_match_filtered_stats() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/api/production-materials/stats"))
        .send()
        .await
        .expect("Failed to get stats");
    assert_eq!(resp.status(), StatusCode::OK);
    let unfiltered: Value = resp.json().await.expect("Failed to parse stats");
    let total = unfiltered
        .pointer("/data/total")
        .and_then(Value::as_i64)
        .expect("total should be a number");

    // An empty filter set must count the same rows
    let resp = client
        .get(format!("{base_url}/api/production-materials/stats/search"))
        .send()
        .await
        .expect("Failed to get filtered stats");
    let filtered: Value = resp.json().await.expect("Failed to parse filtered stats");
    assert_eq!(filtered.pointer("/data/total").and_then(Value::as_i64), Some(total));
}

#[tokio::test]
#[ignore = "Requires running mes-api server and MES database"]
async fn test_batch_codes_sorted_numerically() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/api/production-materials/batch-codes"))
        .send()
        .await
        .expect("Failed to get batch codes");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");

    let codes: Vec<i64> = body
        .get("data")
        .and_then(Value::as_array)
        .expect("data should be an array")
        .iter()
        .filter_map(|v| v.get("batchCode")?.as_str()?.parse().ok())
        .collect();

    // Numeric sort, not lexicographic: 2 before 10
    let mut sorted = codes.clone();
    sorted.sort_unstable();
    assert_eq!(codes, sorted);
}

#[tokio::test]
#[ignore = "Requires running mes-api server and MES database"]
async fn test_ingredients_dropdown_scoped_by_order() {
    let client = client();
    let base_url = base_url();

    // Unscoped call returns the full distinct list
    let resp = client
        .get(format!("{base_url}/api/production-materials/ingredients"))
        .send()
        .await
        .expect("Failed to get ingredients");
    assert_eq!(resp.status(), StatusCode::OK);
    let all: Value = resp.json().await.expect("Failed to parse response");
    let all_len = all
        .get("data")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);

    // Scoping to a nonexistent order returns an empty list
    let resp = client
        .get(format!(
            "{base_url}/api/production-materials/ingredients?productionOrderNumber=no-such-po-xyzzy"
        ))
        .send()
        .await
        .expect("Failed to get scoped ingredients");
    let scoped: Value = resp.json().await.expect("Failed to parse response");
    let scoped_len = scoped
        .get("data")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);

    assert!(scoped_len <= all_len);
    assert_eq!(scoped_len, 0);
}
