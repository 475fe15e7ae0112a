//! Integration tests for the MES dashboard API.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the API against a populated MES database
//! cargo run -p mes-api
//!
//! # Run integration tests
//! cargo test -p mes-integration-tests -- --ignored
//! ```
//!
//! The base URL defaults to `http://localhost:8000` and can be overridden
//! with the `MES_BASE_URL` environment variable.
//!
//! # Test Categories
//!
//! - `api_production_orders` - Order list, search, stats, and filter tests
//! - `api_order_detail` - Batch, consumption grid, and grouping tests
//! - `api_recipes` - Recipe list, search, and detail tests
//! - `api_products` - Product master and MHU type tests
//! - `api_materials` - Material consumption log tests
//!
//! All tests are read-only; they assert response shapes and internal
//! consistency rather than exact row contents, since the upstream MES
//! database owns the data.
