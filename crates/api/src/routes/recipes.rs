//! Recipes route handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::db::recipes::{self, RecipeSearch};
use crate::error::AppError;
use crate::models::recipe::{Recipe, RecipeStats};
use crate::query::{DEFAULT_LIMIT, Pagination};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub statuses: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl SearchParams {
    fn to_search(&self) -> RecipeSearch {
        RecipeSearch {
            search: self.search.clone(),
            statuses: self.statuses.clone(),
            status: self.status.clone(),
        }
    }
}

/// Unpaginated list response, with the row count alongside.
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub data: Vec<Recipe>,
    pub count: usize,
}

/// `GET /api/production-recipes`
pub async fn list(State(state): State<AppState>) -> Result<Json<ListResponse>, AppError> {
    let data = recipes::list(state.pool()).await?;
    let count = data.len();
    Ok(Json(ListResponse {
        success: true,
        data,
        count,
    }))
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub data: Vec<Recipe>,
    pub total: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
    pub page: i64,
    pub limit: i64,
}

/// `GET /api/production-recipes/search`
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let page = Pagination::from_params(params.page.as_deref(), params.limit.as_deref(), DEFAULT_LIMIT);
    let (data, total) = recipes::search(state.pool(), &params.to_search(), page).await?;

    // An empty result still reports one page, matching what the pager
    // component expects here.
    let total_pages = if total > 0 { page.total_pages(total) } else { 1 };

    Ok(Json(SearchResponse {
        success: true,
        data,
        total,
        total_pages,
        page: page.page,
        limit: page.limit,
    }))
}

#[derive(Debug, Serialize)]
pub struct StatsEnvelope {
    pub success: bool,
    pub message: String,
    pub stats: RecipeStats,
}

/// `GET /api/production-recipes/stats`
pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsEnvelope>, AppError> {
    let stats = recipes::stats(state.pool()).await?;
    Ok(Json(StatsEnvelope {
        success: true,
        message: "Success".to_string(),
        stats,
    }))
}

/// `GET /api/production-recipes/stats/search`
pub async fn stats_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<StatsEnvelope>, AppError> {
    let stats = recipes::stats_search(state.pool(), &params.to_search()).await?;
    Ok(Json(StatsEnvelope {
        success: true,
        message: "Success".to_string(),
        stats,
    }))
}
