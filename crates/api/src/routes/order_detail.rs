//! Order-detail route handlers: batches, ingredients, and the
//! consumption grid of one production order.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use mes_core::consumption::{ConsumedFilter, ConsumptionRow, group_by_ingredient};
use mes_core::plan::plan_quantity;
use mes_core::ProductionOrderId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::db::order_detail as repo;
use crate::error::AppError;
use crate::models::order::OrderDetail;
use crate::models::order_detail::{
    Batch, BatchCodeEntry, GridRow, GroupedConsumption, IngredientsByProduct, ItemCodeName,
    UnplannedRow,
};
use crate::query::{DEFAULT_LIMIT, Pagination};
use crate::routes::Envelope;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchesParams {
    pub production_order_id: Option<String>,
}

/// `GET /api/production-order-detail/batches`
pub async fn batches(
    State(state): State<AppState>,
    Query(params): Query<BatchesParams>,
) -> Result<Json<Envelope<Vec<Batch>>>, AppError> {
    let id: i32 = params
        .production_order_id
        .as_deref()
        .and_then(|raw| raw.trim().parse().ok())
        .ok_or_else(|| AppError::BadRequest("Invalid production order id".to_string()))?;

    let data = repo::batches(state.pool(), ProductionOrderId::new(id)).await?;
    Ok(Json(Envelope::ok(data)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderNumberParams {
    pub production_order_number: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl OrderNumberParams {
    fn order_number(&self) -> Result<&str, AppError> {
        match self.production_order_number.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => Ok(n),
            _ => Err(AppError::BadRequest(
                "productionOrderNumber is required".to_string(),
            )),
        }
    }

    fn pagination(&self) -> Pagination {
        Pagination::from_params(self.page.as_deref(), self.limit.as_deref(), DEFAULT_LIMIT)
    }
}

/// `GET /api/production-order-detail/ingredients-by-product`
///
/// Whole responses are cached for five minutes keyed by order number;
/// recipe data only moves when the ERP publishes a new version.
pub async fn ingredients_by_product(
    State(state): State<AppState>,
    Query(params): Query<OrderNumberParams>,
) -> Result<Json<IngredientsByProduct>, AppError> {
    let order_number = params.order_number()?;

    if let Some(cached) = state.ingredient_cache().get(order_number).await {
        return Ok(Json((*cached).clone()));
    }

    let data = repo::ingredients_by_product(state.pool(), order_number).await?;
    if data.is_empty() {
        return Err(AppError::NotFound("No ingredient data found".to_string()));
    }

    let response = IngredientsByProduct {
        success: true,
        message: "Success".to_string(),
        product_code: data[0].product_code.clone(),
        recipe_version: data[0].recipe_version.clone(),
        total: data.len(),
        data,
    };
    state
        .ingredient_cache()
        .insert(order_number.to_string(), Arc::new(response.clone()))
        .await;

    Ok(Json(response))
}

/// Consumption responses carry page bookkeeping next to the data.
#[derive(Debug, Serialize)]
pub struct GridEnvelope {
    pub success: bool,
    pub message: String,
    pub page: i64,
    pub limit: i64,
    pub data: Vec<GridRow>,
}

/// `POST /api/production-order-detail/material-consumptions`
pub async fn material_consumptions(
    State(state): State<AppState>,
    Query(params): Query<OrderNumberParams>,
) -> Result<Json<GridEnvelope>, AppError> {
    let order_number = params.order_number()?;
    let page = params.pagination();

    let data = repo::consumption_grid(state.pool(), order_number, page).await?;
    Ok(Json(GridEnvelope {
        success: true,
        message: "Success".to_string(),
        page: page.page,
        limit: page.limit,
        data,
    }))
}

#[derive(Debug, Serialize)]
pub struct UnplannedEnvelope {
    pub success: bool,
    pub message: String,
    pub page: i64,
    pub limit: i64,
    #[serde(rename = "totalCount")]
    pub total_count: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
    pub data: Vec<UnplannedRow>,
}

/// `GET /api/production-order-detail/material-consumptions-exclude-batches`
pub async fn material_consumptions_unplanned(
    State(state): State<AppState>,
    Query(params): Query<OrderNumberParams>,
) -> Result<Json<UnplannedEnvelope>, AppError> {
    let order_number = params.order_number()?;
    let page = params.pagination();

    let (total_count, data) = repo::unplanned(state.pool(), order_number, page).await?;
    let message = if total_count == 0 { "No data" } else { "Success" };

    Ok(Json(UnplannedEnvelope {
        success: true,
        message: message.to_string(),
        page: page.page,
        limit: page.limit,
        total_count,
        total_pages: page.total_pages(total_count),
        data,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedParams {
    pub production_order_number: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    /// `consumed`, `unconsumed`, or absent for everything.
    pub filter: Option<String>,
}

/// `GET /api/production-order-detail/material-consumptions/grouped`
///
/// Runs the page of grid rows through the ingredient aggregation
/// pipeline and attaches each group's plan quantity, derived from the
/// recipe totals, the order quantity, and the summed batch plan.
pub async fn material_consumptions_grouped(
    State(state): State<AppState>,
    Query(params): Query<GroupedParams>,
) -> Result<Json<Envelope<Vec<GroupedConsumption>>>, AppError> {
    let order_number = match params.production_order_number.as_deref().map(str::trim) {
        Some(n) if !n.is_empty() => n,
        _ => {
            return Err(AppError::BadRequest(
                "productionOrderNumber is required".to_string(),
            ));
        }
    };
    let page = Pagination::from_params(params.page.as_deref(), params.limit.as_deref(), DEFAULT_LIMIT);
    let filter = match params.filter.as_deref().map(str::trim) {
        Some("consumed") => ConsumedFilter::Consumed,
        Some("unconsumed") => ConsumedFilter::Unconsumed,
        _ => ConsumedFilter::All,
    };

    let grid = repo::consumption_grid(state.pool(), order_number, page).await?;
    let rows: Vec<ConsumptionRow> = grid.into_iter().map(to_core_row).collect();
    let groups = group_by_ingredient(rows, filter);

    // Recipe totals are keyed by the same display code the grid rows
    // carry, so group lookups do not have to split the name back off.
    let recipe_rows = repo::ingredients_by_product(state.pool(), order_number).await?;
    let mut recipe_totals: HashMap<String, Decimal> = HashMap::new();
    for row in &recipe_rows {
        let key = crate::models::order::display_code(
            row.ingredient_code.clone(),
            row.item_name.as_deref(),
        )
        .unwrap_or_default();
        *recipe_totals.entry(key).or_default() += row.quantity.unwrap_or(Decimal::ZERO);
    }

    let order_qty = repo::order_quantity(state.pool(), order_number)
        .await?
        .unwrap_or(Decimal::ZERO);
    let batch_qty = repo::batch_plan_total(state.pool(), order_number).await?;

    let data = groups
        .into_iter()
        .map(|group| {
            let recipe_qty = recipe_totals
                .get(&group.ingredient_code)
                .copied()
                .unwrap_or(Decimal::ZERO);
            let plan = plan_quantity(recipe_qty, order_qty, batch_qty);
            GroupedConsumption::from_group(group, plan)
        })
        .collect();

    Ok(Json(Envelope::ok(data)))
}

fn to_core_row(row: GridRow) -> ConsumptionRow {
    ConsumptionRow {
        id: row.id,
        batch_code: row.batch_code,
        ingredient_code: row.ingredient_code.unwrap_or_default(),
        lot: Some(row.lot),
        quantity: row.quantity,
        datetime: row.datetime,
        respone: row.respone,
    }
}

/// `GET /api/production-order-detail/batch-codes-with-materials`
pub async fn batch_codes_with_materials(
    State(state): State<AppState>,
    Query(params): Query<OrderNumberParams>,
) -> Result<Json<Envelope<Vec<BatchCodeEntry>>>, AppError> {
    let order_number = params.order_number()?;
    let data = repo::batch_codes_with_materials(state.pool(), order_number).await?;
    Ok(Json(Envelope::ok(data)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCodesBody {
    pub item_codes: Option<Vec<String>>,
}

/// `POST /api/production-order-detail/product-masters-by-codes`
pub async fn product_masters_by_codes(
    State(state): State<AppState>,
    Json(body): Json<ItemCodesBody>,
) -> Result<Json<Envelope<Vec<ItemCodeName>>>, AppError> {
    let item_codes = match body.item_codes {
        Some(codes) if !codes.is_empty() => codes,
        _ => {
            return Err(AppError::BadRequest(
                "itemCodes must be a non-empty array".to_string(),
            ));
        }
    };

    let data = repo::product_masters_by_codes(state.pool(), &item_codes).await?;
    Ok(Json(Envelope::ok(data)))
}

/// `GET /api/production-order-detail/{id}`
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<OrderDetail>>, AppError> {
    let id: i32 = id
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid production order id".to_string()))?;

    let order = repo::find_by_id(state.pool(), ProductionOrderId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Production order not found".to_string()))?;

    Ok(Json(Envelope::ok(order)))
}
