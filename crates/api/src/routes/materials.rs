//! Materials route handlers: the raw consumption log and its filter
//! dropdown sources.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::db::materials::{self, MaterialSearch};
use crate::error::AppError;
use crate::models::consumption::{
    BatchCodeRef, IngredientRef, MaterialConsumption, MaterialStats, ProductionOrderRef,
};
use crate::query::{DEFAULT_LIST_LIMIT, Pagination};
use crate::routes::Envelope;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub production_order_number: Option<String>,
    pub batch_code: Option<String>,
    pub ingredient_code: Option<String>,
    pub respone: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

impl SearchParams {
    fn to_search(&self) -> MaterialSearch {
        MaterialSearch {
            production_order_number: self.production_order_number.clone(),
            batch_code: self.batch_code.clone(),
            ingredient_code: self.ingredient_code.clone(),
            respone: self.respone.clone(),
            from_date: self.from_date.clone(),
            to_date: self.to_date.clone(),
        }
    }

    fn pagination(&self) -> Pagination {
        Pagination::from_params(
            self.page.as_deref(),
            self.page_size.as_deref(),
            DEFAULT_LIST_LIMIT,
        )
    }
}

/// `GET /api/production-materials`
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Envelope<Vec<MaterialConsumption>>>, AppError> {
    let data = materials::list(state.pool(), params.pagination()).await?;
    Ok(Json(Envelope::ok(data)))
}

/// `GET /api/production-materials/search`
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Envelope<Vec<MaterialConsumption>>>, AppError> {
    let data = materials::search(state.pool(), &params.to_search(), params.pagination()).await?;
    Ok(Json(Envelope::ok(data)))
}

/// `GET /api/production-materials/production-orders`
pub async fn production_orders(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<ProductionOrderRef>>>, AppError> {
    let data = materials::production_orders(state.pool()).await?;
    Ok(Json(Envelope::ok(data)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeParams {
    pub production_order_number: Option<String>,
    pub batch_code: Option<String>,
}

impl ScopeParams {
    fn order_number(&self) -> Option<&str> {
        self.production_order_number
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }

    fn batch(&self) -> Option<&str> {
        self.batch_code
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
    }
}

/// `GET /api/production-materials/batch-codes`
pub async fn batch_codes(
    State(state): State<AppState>,
    Query(params): Query<ScopeParams>,
) -> Result<Json<Envelope<Vec<BatchCodeRef>>>, AppError> {
    let data = materials::batch_codes(state.pool(), params.order_number()).await?;
    Ok(Json(Envelope::ok(data)))
}

/// `GET /api/production-materials/ingredients`
pub async fn ingredients(
    State(state): State<AppState>,
    Query(params): Query<ScopeParams>,
) -> Result<Json<Envelope<Vec<IngredientRef>>>, AppError> {
    let data = materials::ingredients(state.pool(), params.order_number(), params.batch()).await?;
    Ok(Json(Envelope::ok(data)))
}

/// `GET /api/production-materials/stats`
pub async fn stats(
    State(state): State<AppState>,
) -> Result<Json<Envelope<MaterialStats>>, AppError> {
    let total = materials::stats(state.pool()).await?;
    Ok(Json(Envelope::ok(MaterialStats { total })))
}

/// `GET /api/production-materials/stats/search`
pub async fn stats_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Envelope<MaterialStats>>, AppError> {
    let total = materials::stats_search(state.pool(), &params.to_search()).await?;
    Ok(Json(Envelope::ok(MaterialStats { total })))
}
