//! Production-orders route handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::db::orders::{self, OrderSearch};
use crate::error::AppError;
use crate::models::order::{OrderFilters, OrderStats, ProductionOrderSummary};
use crate::query::{DEFAULT_LIMIT, Pagination};
use crate::routes::PageEnvelope;
use crate::state::AppState;

/// Query parameters shared by the list endpoints. `total` echoes the
/// count from a previous page so later pages skip the count query.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub total: Option<String>,
}

impl ListParams {
    fn pagination(&self) -> Pagination {
        Pagination::from_params(self.page.as_deref(), self.limit.as_deref(), DEFAULT_LIMIT)
    }

    fn known_total(&self) -> i64 {
        self.total
            .as_deref()
            .and_then(|t| t.trim().parse().ok())
            .unwrap_or(0)
    }
}

/// Search parameters for the filtered endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub search_query: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub process_areas: Option<String>,
    pub statuses: Option<String>,
    pub shifts: Option<String>,
    #[serde(flatten)]
    pub list: ListParams,
}

impl SearchParams {
    fn to_search(&self) -> OrderSearch {
        OrderSearch {
            search_query: self.search_query.clone(),
            date_from: self.date_from.clone(),
            date_to: self.date_to.clone(),
            process_areas: self.process_areas.clone(),
            shifts: self.shifts.clone(),
            statuses: self.statuses.clone(),
        }
    }
}

/// `GET /api/production-orders`
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<PageEnvelope<ProductionOrderSummary>>, AppError> {
    let page = params.pagination();
    let (data, total) = orders::list(state.pool(), page, params.known_total()).await?;

    Ok(Json(PageEnvelope {
        success: true,
        message: "Success".to_string(),
        total,
        total_pages: page.total_pages(total),
        page: page.page,
        limit: page.limit,
        data,
    }))
}

/// `GET /api/production-orders/search`
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<PageEnvelope<ProductionOrderSummary>>, AppError> {
    let page = params.list.pagination();
    let (data, total) = orders::search(
        state.pool(),
        &params.to_search(),
        page,
        params.list.known_total(),
    )
    .await?;

    Ok(Json(PageEnvelope {
        success: true,
        message: "Success".to_string(),
        total,
        total_pages: page.total_pages(total),
        page: page.page,
        limit: page.limit,
        data,
    }))
}

/// Stats responses keep their payload under `stats`, not `data`.
#[derive(Debug, Serialize)]
pub struct StatsEnvelope {
    pub success: bool,
    pub message: String,
    pub stats: OrderStats,
}

/// `GET /api/production-orders/stats`
pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsEnvelope>, AppError> {
    let stats = orders::stats(state.pool()).await?;
    Ok(Json(StatsEnvelope {
        success: true,
        message: "Success".to_string(),
        stats,
    }))
}

/// `GET /api/production-orders/stats/search`
pub async fn stats_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<StatsEnvelope>, AppError> {
    let stats = orders::stats_search(state.pool(), &params.to_search()).await?;
    Ok(Json(StatsEnvelope {
        success: true,
        message: "Success".to_string(),
        stats,
    }))
}

/// `GET /api/production-orders/filters`
///
/// Returns the bare `{processAreas, shifts}` object the filter
/// dropdowns consume, no envelope.
pub async fn filters(State(state): State<AppState>) -> Result<Json<OrderFilters>, AppError> {
    let filters = orders::filters(state.pool()).await?;
    Ok(Json(filters))
}
