//! HTTP route handlers for the dashboard API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                                    - Liveness check
//! GET  /health/ready                              - Readiness check (SELECT 1)
//!
//! # Production orders
//! GET  /api/production-orders                     - Paginated order list
//! GET  /api/production-orders/search              - Filtered order list
//! GET  /api/production-orders/stats               - Order counters
//! GET  /api/production-orders/stats/search        - Filtered counters
//! GET  /api/production-orders/filters             - Distinct filter values
//!
//! # Order detail
//! GET  /api/production-order-detail/batches                 - Batches of one order
//! GET  /api/production-order-detail/ingredients-by-product  - Recipe ingredients (cached)
//! POST /api/production-order-detail/material-consumptions   - Batch/ingredient grid
//! GET  /api/production-order-detail/material-consumptions-exclude-batches - Unplanned rows
//! GET  /api/production-order-detail/material-consumptions/grouped - Per-ingredient aggregates
//! GET  /api/production-order-detail/batch-codes-with-materials - Batch codes with draws
//! POST /api/production-order-detail/product-masters-by-codes - Bulk item-name lookup
//! GET  /api/production-order-detail/{id}                    - One order
//!
//! # Recipes
//! GET  /api/production-recipes                    - All recipe headers
//! GET  /api/production-recipes/search             - Filtered/paginated headers
//! GET  /api/production-recipes/stats              - Recipe counters
//! GET  /api/production-recipes/stats/search       - Filtered counters
//! GET  /api/production-recipe-detail/{id}         - Recipe with linked collections
//!
//! # Products (bare JSON responses, no envelope)
//! GET  /api/production-products                   - Flat product/MHU join
//! GET  /api/production-products/types             - Distinct item types
//! GET  /api/production-products/search            - Filtered/paginated products
//! GET  /api/production-products/stats             - Product counters
//! GET  /api/production-products/stats/search      - Filtered counters
//! GET  /api/production-products/{id}              - One product by item code
//!
//! # Materials
//! GET  /api/production-materials                  - Paginated consumption log
//! GET  /api/production-materials/search           - Filtered log
//! GET  /api/production-materials/production-orders - Distinct order numbers
//! GET  /api/production-materials/batch-codes      - Distinct batch codes
//! GET  /api/production-materials/ingredients      - Distinct ingredient codes
//! GET  /api/production-materials/stats            - Row count
//! GET  /api/production-materials/stats/search     - Filtered row count
//! ```

pub mod materials;
pub mod order_detail;
pub mod orders;
pub mod products;
pub mod recipe_detail;
pub mod recipes;

use axum::{
    Router,
    routing::{get, post},
};
use serde::Serialize;

use crate::state::AppState;

/// Success envelope used by every non-products endpoint.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: "Success".to_string(),
            data,
        }
    }
}

/// Success envelope for paginated lists.
#[derive(Debug, Serialize)]
pub struct PageEnvelope<T> {
    pub success: bool,
    pub message: String,
    pub total: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
    pub page: i64,
    pub limit: i64,
    pub data: Vec<T>,
}

/// Assemble the full API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/api/production-orders", orders_routes())
        .nest("/api/production-order-detail", order_detail_routes())
        .nest("/api/production-recipes", recipes_routes())
        .nest("/api/production-recipe-detail", recipe_detail_routes())
        .nest("/api/production-products", products_routes())
        .nest("/api/production-materials", materials_routes())
}

fn orders_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list))
        .route("/search", get(orders::search))
        .route("/stats", get(orders::stats))
        .route("/stats/search", get(orders::stats_search))
        .route("/filters", get(orders::filters))
}

fn order_detail_routes() -> Router<AppState> {
    Router::new()
        .route("/batches", get(order_detail::batches))
        .route(
            "/ingredients-by-product",
            get(order_detail::ingredients_by_product),
        )
        .route(
            "/material-consumptions",
            post(order_detail::material_consumptions),
        )
        .route(
            "/material-consumptions-exclude-batches",
            get(order_detail::material_consumptions_unplanned),
        )
        .route(
            "/material-consumptions/grouped",
            get(order_detail::material_consumptions_grouped),
        )
        .route(
            "/batch-codes-with-materials",
            get(order_detail::batch_codes_with_materials),
        )
        .route(
            "/product-masters-by-codes",
            post(order_detail::product_masters_by_codes),
        )
        .route("/{id}", get(order_detail::show))
}

fn recipes_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(recipes::list))
        .route("/search", get(recipes::search))
        .route("/stats", get(recipes::stats))
        .route("/stats/search", get(recipes::stats_search))
}

fn recipe_detail_routes() -> Router<AppState> {
    Router::new().route("/{id}", get(recipe_detail::show))
}

fn products_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list))
        .route("/types", get(products::types))
        .route("/search", get(products::search))
        .route("/stats", get(products::stats))
        .route("/stats/search", get(products::stats_search))
        .route("/{id}", get(products::show))
}

fn materials_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(materials::list))
        .route("/search", get(materials::search))
        .route("/production-orders", get(materials::production_orders))
        .route("/batch-codes", get(materials::batch_codes))
        .route("/ingredients", get(materials::ingredients))
        .route("/stats", get(materials::stats))
        .route("/stats/search", get(materials::stats_search))
}
