//! Production-orders repository.
//!
//! Order status is derived, not read from the stored column: an order is
//! running (1) as soon as any consumption row references its order
//! number. The list queries therefore join an aggregate over
//! `mes_material_consumption` for the status, current batch, and batch
//! totals.

use chrono::NaiveDateTime;
use mes_core::OrderStatus;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use crate::models::order::{
    OrderFilters, OrderStats, ProductionOrderSummary, display_code,
};
use crate::query::{NullMatch, Pagination, WhereBuilder};

use super::RepositoryError;

/// Search filters accepted by the orders list and stats endpoints.
#[derive(Debug, Clone, Default)]
pub struct OrderSearch {
    pub search_query: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub process_areas: Option<String>,
    pub shifts: Option<String>,
    pub statuses: Option<String>,
}

impl OrderSearch {
    /// Build the shared WHERE conditions. The status tokens map to
    /// presence (running) or absence (pending) of consumption rows.
    fn apply(&self, builder: &mut WhereBuilder) {
        builder
            .like_any(
                &[
                    "po.production_order_number",
                    "po.product_code",
                    "po.production_line",
                    "po.recipe_code",
                ],
                self.search_query.as_deref(),
            )
            .date_window(
                "po.planned_start",
                self.date_from.as_deref(),
                self.date_to.as_deref(),
            )
            .csv_in(
                "po.process_area",
                self.process_areas.as_deref(),
                NullMatch::SqlNull,
            )
            .csv_in("po.shift", self.shifts.as_deref(), NullMatch::SqlNull);

        if let Some(statuses) = self.statuses.as_deref() {
            let wanted: Vec<OrderStatus> = statuses
                .split(',')
                .filter_map(OrderStatus::from_param)
                .collect();
            let mut parts = Vec::new();
            if wanted.contains(&OrderStatus::Running) {
                parts.push("mmc.production_order_number IS NOT NULL");
            }
            if wanted.contains(&OrderStatus::Pending) {
                parts.push("mmc.production_order_number IS NULL");
            }
            match parts.len() {
                1 => {
                    builder.push_raw(parts[0]);
                }
                2 => {
                    builder.push_raw(format!("({})", parts.join(" OR ")));
                }
                _ => {}
            }
        }
    }
}

#[derive(Debug, FromRow)]
struct OrderRow {
    production_order_id: i32,
    production_order_number: Option<String>,
    production_line: Option<String>,
    product_code: Option<String>,
    recipe_code: Option<String>,
    recipe_version: Option<String>,
    shift: Option<String>,
    planned_start: Option<NaiveDateTime>,
    planned_end: Option<NaiveDateTime>,
    quantity: Option<Decimal>,
    unit_of_measurement: Option<String>,
    lot_number: Option<String>,
    plant: Option<String>,
    shopfloor: Option<String>,
    process_area: Option<String>,
    item_name: Option<String>,
    recipe_name: Option<String>,
    status: i32,
    current_batch: i64,
    total_batches: i64,
}

impl From<OrderRow> for ProductionOrderSummary {
    fn from(row: OrderRow) -> Self {
        let product_code = display_code(row.product_code, row.item_name.as_deref());
        let recipe_code = display_code(row.recipe_code, row.recipe_name.as_deref());
        Self {
            production_order_id: row.production_order_id.into(),
            production_order_number: row.production_order_number,
            production_line: row.production_line,
            product_code,
            recipe_code,
            recipe_version: row.recipe_version,
            shift: row.shift,
            planned_start: row.planned_start,
            planned_end: row.planned_end,
            quantity: row.quantity,
            unit_of_measurement: row.unit_of_measurement,
            lot_number: row.lot_number,
            plant: row.plant,
            shopfloor: row.shopfloor,
            process_area: row.process_area,
            item_name: row.item_name,
            recipe_name: row.recipe_name,
            status: row.status,
            current_batch: row.current_batch,
            total_batches: row.total_batches,
        }
    }
}

const ORDER_COLUMNS: &str = r"
    po.production_order_id,
    po.production_order_number,
    po.production_line,
    po.product_code,
    po.recipe_code,
    po.recipe_version,
    po.shift,
    po.planned_start,
    po.planned_end,
    po.quantity,
    po.unit_of_measurement,
    po.lot_number,
    po.plant,
    po.shopfloor,
    po.process_area,
    pm.item_name,
    rd.recipe_name,
    CASE WHEN mmc.production_order_number IS NOT NULL THEN 1 ELSE 0 END AS status,
    COALESCE(mmc.max_batch_code, 0) AS current_batch,
    COALESCE(b.total_batches, 0) AS total_batches
";

const ORDER_JOINS: &str = r"
    LEFT JOIN product_masters pm
        ON po.product_code = pm.item_code
    LEFT JOIN (
        SELECT production_order_number,
               MAX(CAST(NULLIF(btrim(batch_code), '') AS BIGINT)) AS max_batch_code
        FROM mes_material_consumption
        GROUP BY production_order_number
    ) mmc
        ON po.production_order_number = mmc.production_order_number
    LEFT JOIN (
        SELECT production_order_id, COUNT(*) AS total_batches
        FROM batches
        GROUP BY production_order_id
    ) b
        ON po.production_order_id = b.production_order_id
";

/// Paginated order list without filters.
///
/// The count query only runs on page 1 (or when the client did not echo
/// a previous total back); later pages reuse the client-supplied total.
#[tracing::instrument(skip(pool))]
pub async fn list(
    pool: &PgPool,
    page: Pagination,
    known_total: i64,
) -> Result<(Vec<ProductionOrderSummary>, i64), RepositoryError> {
    let total = if page.page == 1 || known_total == 0 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM production_orders")
            .fetch_one(pool)
            .await?
    } else {
        known_total
    };

    let sql = format!(
        r"SELECT {ORDER_COLUMNS}
        FROM production_orders po
        LEFT JOIN recipe_details rd
            ON po.recipe_code = rd.recipe_code
           AND po.recipe_version = rd.version
           AND po.production_line = rd.production_line
        {ORDER_JOINS}
        ORDER BY po.production_order_id DESC
        LIMIT $1 OFFSET $2"
    );
    let rows = sqlx::query_as::<_, OrderRow>(&sql)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

    Ok((rows.into_iter().map(Into::into).collect(), total))
}

/// Filtered order list. Same column set as [`list`], but the recipe
/// join drops the production-line condition so free-text searches still
/// match recipes reused across lines.
#[tracing::instrument(skip(pool, search))]
pub async fn search(
    pool: &PgPool,
    search: &OrderSearch,
    page: Pagination,
    known_total: i64,
) -> Result<(Vec<ProductionOrderSummary>, i64), RepositoryError> {
    let mut builder = WhereBuilder::new();
    search.apply(&mut builder);

    let total = if page.page == 1 || known_total == 0 {
        let sql = format!(
            r"SELECT COUNT(*)
            FROM production_orders po
            LEFT JOIN (
                SELECT DISTINCT production_order_number
                FROM mes_material_consumption
            ) mmc
                ON po.production_order_number = mmc.production_order_number
            {}",
            builder.clause()
        );
        builder
            .bind_scalar(sqlx::query_scalar::<_, i64>(&sql))
            .fetch_one(pool)
            .await?
    } else {
        known_total
    };

    let limit_ph = builder.bind_count() + 1;
    let offset_ph = builder.bind_count() + 2;
    let sql = format!(
        r"SELECT {ORDER_COLUMNS}
        FROM production_orders po
        LEFT JOIN recipe_details rd
            ON po.recipe_code = rd.recipe_code
           AND po.recipe_version = rd.version
        {ORDER_JOINS}
        {}
        ORDER BY po.production_order_id DESC
        LIMIT ${limit_ph} OFFSET ${offset_ph}",
        builder.clause()
    );
    let rows = builder
        .bind_all(sqlx::query_as::<_, OrderRow>(&sql))
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

    Ok((rows.into_iter().map(Into::into).collect(), total))
}

#[derive(Debug, FromRow)]
struct StatsRow {
    total: i64,
    completed: i64,
    in_progress: i64,
}

impl From<StatsRow> for OrderStats {
    fn from(row: StatsRow) -> Self {
        Self {
            total: row.total,
            in_progress: row.in_progress,
            completed: row.completed,
            stopped: row.total - row.in_progress,
        }
    }
}

const STATS_SELECT: &str = r"
    WITH running_po AS (
        SELECT DISTINCT production_order_number
        FROM mes_material_consumption
    )
    SELECT
        COUNT(*) AS total,
        COALESCE(SUM(CASE WHEN po.status = 2 THEN 1 ELSE 0 END), 0) AS completed,
        COALESCE(SUM(CASE WHEN r.production_order_number IS NOT NULL THEN 1 ELSE 0 END), 0) AS in_progress
    FROM production_orders po
    LEFT JOIN running_po r
        ON r.production_order_number = po.production_order_number
";

/// Dashboard counters over all orders.
#[tracing::instrument(skip(pool))]
pub async fn stats(pool: &PgPool) -> Result<OrderStats, RepositoryError> {
    let row = sqlx::query_as::<_, StatsRow>(STATS_SELECT)
        .fetch_one(pool)
        .await?;
    Ok(row.into())
}

/// Dashboard counters over the filtered order set.
#[tracing::instrument(skip(pool, search))]
pub async fn stats_search(
    pool: &PgPool,
    search: &OrderSearch,
) -> Result<OrderStats, RepositoryError> {
    // The stats query joins the distinct consumption orders as `mmc` so
    // the status tokens resolve against the same alias as the search.
    let mut builder = WhereBuilder::new();
    search.apply(&mut builder);

    let sql = format!(
        r"WITH running_po AS (
            SELECT DISTINCT production_order_number
            FROM mes_material_consumption
        )
        SELECT
            COUNT(*) AS total,
            COALESCE(SUM(CASE WHEN po.status = 2 THEN 1 ELSE 0 END), 0) AS completed,
            COALESCE(SUM(CASE WHEN mmc.production_order_number IS NOT NULL THEN 1 ELSE 0 END), 0) AS in_progress
        FROM production_orders po
        LEFT JOIN running_po mmc
            ON mmc.production_order_number = po.production_order_number
        {}",
        builder.clause()
    );
    let row = builder
        .bind_all(sqlx::query_as::<_, StatsRow>(&sql))
        .fetch_one(pool)
        .await?;
    Ok(row.into())
}

/// Distinct non-blank process areas and shifts for the filter dropdowns.
#[tracing::instrument(skip(pool))]
pub async fn filters(pool: &PgPool) -> Result<OrderFilters, RepositoryError> {
    let process_areas = sqlx::query_scalar::<_, String>(
        r"SELECT DISTINCT process_area
        FROM production_orders
        WHERE process_area IS NOT NULL AND btrim(process_area) <> ''",
    )
    .fetch_all(pool)
    .await?;

    let shifts = sqlx::query_scalar::<_, String>(
        r"SELECT DISTINCT shift
        FROM production_orders
        WHERE shift IS NOT NULL AND btrim(shift) <> ''",
    )
    .fetch_all(pool)
    .await?;

    Ok(OrderFilters {
        process_areas,
        shifts,
    })
}
