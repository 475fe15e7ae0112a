//! Products route handlers.
//!
//! These endpoints predate the standard envelope and answer bare JSON
//! objects, with `{error: message}` on failure. Kept as-is so the
//! products pages of the SPA work unchanged.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::db::products::{self, ProductSearch};
use crate::error::ProductError;
use crate::models::product::{ProductJoinRow, ProductMaster, ProductPage, ProductStats};
use crate::query::{DEFAULT_LIMIT, Pagination};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub status: Option<String>,
    pub statuses: Option<String>,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub types: Option<String>,
    pub page: Option<String>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<String>,
}

impl SearchParams {
    fn to_search(&self) -> ProductSearch {
        ProductSearch {
            q: self.q.clone(),
            statuses: self.statuses.clone(),
            status: self.status.clone(),
            types: self.types.clone(),
            item_type: self.item_type.clone(),
        }
    }
}

/// `GET /api/production-products`
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductJoinRow>>, ProductError> {
    let data = products::list(state.pool()).await?;
    Ok(Json(data))
}

/// `GET /api/production-products/types`
pub async fn types(
    State(state): State<AppState>,
) -> Result<Json<Vec<Option<String>>>, ProductError> {
    let data = products::types(state.pool()).await?;
    Ok(Json(data))
}

/// `GET /api/production-products/search`
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ProductPage>, ProductError> {
    let page = Pagination::from_params(
        params.page.as_deref(),
        params.page_size.as_deref(),
        DEFAULT_LIMIT,
    );
    let (items, total) = products::search(state.pool(), &params.to_search(), page).await?;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok(Json(ProductPage {
        items,
        total,
        page: page.page as u32,
        page_size: page.limit as u32,
    }))
}

/// `GET /api/production-products/stats`
pub async fn stats(State(state): State<AppState>) -> Result<Json<ProductStats>, ProductError> {
    let stats = products::stats(state.pool(), None).await?;
    Ok(Json(stats))
}

/// `GET /api/production-products/stats/search`
pub async fn stats_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ProductStats>, ProductError> {
    let stats = products::stats(state.pool(), Some(&params.to_search())).await?;
    Ok(Json(stats))
}

/// `GET /api/production-products/{id}`
///
/// The path segment is the item code, not a numeric id.
pub async fn show(
    State(state): State<AppState>,
    Path(item_code): Path<String>,
) -> Result<Json<ProductMaster>, ProductError> {
    let product = products::find_by_item_code(state.pool(), &item_code)
        .await?
        .ok_or(ProductError::NotFound)?;
    Ok(Json(product))
}
