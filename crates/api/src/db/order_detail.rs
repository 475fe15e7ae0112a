//! Order-detail repository: batches, recipe ingredients, and the
//! consumption grid for one production order.

use chrono::NaiveDateTime;
use mes_core::ProductionOrderId;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use crate::models::order::{OrderDetail, display_code};
use crate::models::order_detail::{
    Batch, BatchCodeEntry, GridRow, ItemCodeName, RecipeIngredientRow, UnplannedRow,
};
use crate::query::Pagination;

use super::RepositoryError;

/// Batches belonging to one production order.
#[tracing::instrument(skip(pool))]
pub async fn batches(
    pool: &PgPool,
    production_order_id: ProductionOrderId,
) -> Result<Vec<Batch>, RepositoryError> {
    let rows = sqlx::query_as::<_, BatchRow>(
        r"SELECT batch_id, production_order_id, batch_number, plan_quantity, unit_of_measurement
        FROM batches
        WHERE production_order_id = $1",
    )
    .bind(production_order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

#[derive(Debug, FromRow)]
struct BatchRow {
    batch_id: i32,
    production_order_id: i32,
    batch_number: Option<String>,
    plan_quantity: Option<Decimal>,
    unit_of_measurement: Option<String>,
}

impl From<BatchRow> for Batch {
    fn from(row: BatchRow) -> Self {
        Self {
            batch_id: row.batch_id.into(),
            production_order_id: row.production_order_id.into(),
            batch_number: row.batch_number,
            plan_quantity: row.plan_quantity,
            unit_of_measurement: row.unit_of_measurement,
        }
    }
}

/// Recipe ingredient lines for the order's product and recipe version.
#[tracing::instrument(skip(pool))]
pub async fn ingredients_by_product(
    pool: &PgPool,
    production_order_number: &str,
) -> Result<Vec<RecipeIngredientRow>, RepositoryError> {
    let rows = sqlx::query_as::<_, RecipeIngredientDbRow>(
        r"SELECT
            i.ingredient_code,
            i.quantity,
            i.unit_of_measurement,
            pm.item_name,
            po.product_code,
            po.recipe_version
        FROM production_orders po
        JOIN recipe_details rd
            ON rd.product_code = po.product_code
           AND rd.version = po.recipe_version
        JOIN processes p
            ON p.recipe_details_id = rd.recipe_details_id
        JOIN ingredients i
            ON i.process_id = p.process_id
        LEFT JOIN product_masters pm
            ON pm.item_code = i.ingredient_code
        WHERE po.production_order_number = $1",
    )
    .bind(production_order_number)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

#[derive(Debug, FromRow)]
struct RecipeIngredientDbRow {
    ingredient_code: Option<String>,
    quantity: Option<Decimal>,
    unit_of_measurement: Option<String>,
    item_name: Option<String>,
    product_code: Option<String>,
    recipe_version: Option<String>,
}

impl From<RecipeIngredientDbRow> for RecipeIngredientRow {
    fn from(row: RecipeIngredientDbRow) -> Self {
        Self {
            ingredient_code: row.ingredient_code,
            quantity: row.quantity,
            unit_of_measurement: row.unit_of_measurement,
            item_name: row.item_name,
            product_code: row.product_code,
            recipe_version: row.recipe_version,
        }
    }
}

// The grid pages over batches, not rows: the page of batch numbers is
// cross-joined with the recipe's ingredient set so unconsumed cells
// come back as placeholder rows, then unioned with draws of ingredients
// outside the recipe. The order number placeholder is reused across the
// CTEs, so the statement binds three parameters in total.
const GRID_SQL: &str = r#"
    WITH batch_cte AS (
        SELECT
            b.batch_number AS batch_code,
            ROW_NUMBER() OVER (ORDER BY b.batch_number) AS rn
        FROM batches b
        JOIN production_orders po
            ON po.production_order_id = b.production_order_id
        WHERE po.production_order_number = $1
    ),
    paged_batch AS (
        SELECT batch_code
        FROM batch_cte
        WHERE rn BETWEEN $2 AND $3
    ),
    recipe_ingredient AS (
        SELECT DISTINCT
            i.ingredient_code,
            pm.item_name
        FROM production_orders po
        JOIN recipe_details rd
            ON rd.product_code = po.product_code
           AND rd.version = po.recipe_version
        JOIN processes p ON p.recipe_details_id = rd.recipe_details_id
        JOIN ingredients i ON i.process_id = p.process_id
        LEFT JOIN product_masters pm ON pm.item_code = i.ingredient_code
        WHERE po.production_order_number = $1
    ),
    extra_ingredient AS (
        SELECT DISTINCT
            mc.ingredient_code,
            pm.item_name
        FROM mes_material_consumption mc
        JOIN paged_batch pb
            ON pb.batch_code = mc.batch_code
        LEFT JOIN recipe_ingredient r
            ON r.ingredient_code = mc.ingredient_code
        LEFT JOIN product_masters pm
            ON pm.item_code = mc.ingredient_code
        WHERE mc.production_order_number = $1
          AND r.ingredient_code IS NULL
    )

    SELECT
        pb.batch_code,
        r.ingredient_code,
        r.item_name,
        mc.id,
        mc.lot,
        mc.quantity,
        COALESCE(mc.unit_of_measurement, ing.unit_of_measurement) AS unit_of_measurement,
        mc.datetime,
        mc.operator_id,
        mc.supply_machine,
        mc.count,
        mc.request,
        mc.respone,
        mc.status1,
        mc."timestamp"
    FROM paged_batch pb
    CROSS JOIN recipe_ingredient r
    LEFT JOIN mes_material_consumption mc
        ON mc.production_order_number = $1
       AND mc.batch_code = pb.batch_code
       AND mc.ingredient_code = r.ingredient_code
    LEFT JOIN ingredients ing
        ON ing.ingredient_code = r.ingredient_code

    UNION ALL

    SELECT
        mc.batch_code,
        e.ingredient_code,
        e.item_name,
        mc.id,
        mc.lot,
        mc.quantity,
        mc.unit_of_measurement,
        mc.datetime,
        mc.operator_id,
        mc.supply_machine,
        mc.count,
        mc.request,
        mc.respone,
        mc.status1,
        mc."timestamp"
    FROM mes_material_consumption mc
    JOIN paged_batch pb
        ON pb.batch_code = mc.batch_code
    JOIN extra_ingredient e
        ON e.ingredient_code = mc.ingredient_code
    WHERE mc.production_order_number = $1

    ORDER BY batch_code, ingredient_code
"#;

/// One page of the batch-by-ingredient consumption grid.
///
/// This is by far the heaviest statement in the service; it runs inside
/// a transaction with a 120 second statement timeout instead of the
/// pool default.
#[tracing::instrument(skip(pool))]
pub async fn consumption_grid(
    pool: &PgPool,
    production_order_number: &str,
    page: Pagination,
) -> Result<Vec<GridRow>, RepositoryError> {
    let from = page.offset() + 1;
    let to = page.page * page.limit;

    let mut tx = pool.begin().await?;
    sqlx::query("SET LOCAL statement_timeout = '120s'")
        .execute(&mut *tx)
        .await?;
    let rows = sqlx::query_as::<_, GridDbRow>(GRID_SQL)
        .bind(production_order_number)
        .bind(from)
        .bind(to)
        .fetch_all(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

#[derive(Debug, FromRow)]
struct GridDbRow {
    batch_code: Option<String>,
    ingredient_code: Option<String>,
    item_name: Option<String>,
    id: Option<i32>,
    lot: Option<String>,
    quantity: Option<Decimal>,
    unit_of_measurement: Option<String>,
    datetime: Option<NaiveDateTime>,
    operator_id: Option<String>,
    supply_machine: Option<String>,
    count: Option<i32>,
    request: Option<String>,
    respone: Option<String>,
    status1: Option<String>,
    timestamp: Option<NaiveDateTime>,
}

impl From<GridDbRow> for GridRow {
    fn from(row: GridDbRow) -> Self {
        let ingredient_code = display_code(row.ingredient_code, row.item_name.as_deref());
        Self {
            id: row.id.map(Into::into),
            batch_code: row.batch_code,
            ingredient_code,
            lot: row.lot.unwrap_or_default(),
            quantity: row.quantity,
            unit_of_measurement: row.unit_of_measurement.unwrap_or_default(),
            datetime: row.datetime,
            operator_id: row.operator_id,
            supply_machine: row.supply_machine,
            count: row.count.unwrap_or(0),
            request: row.request,
            respone: row.respone,
            status1: row.status1,
            timestamp: row.timestamp,
        }
    }
}

/// Count and page of consumption rows outside any batch.
#[tracing::instrument(skip(pool))]
pub async fn unplanned(
    pool: &PgPool,
    production_order_number: &str,
    page: Pagination,
) -> Result<(i64, Vec<UnplannedRow>), RepositoryError> {
    let total: i64 = sqlx::query_scalar(
        r"SELECT COUNT(*)
        FROM mes_material_consumption mc
        WHERE mc.production_order_number = $1
          AND mc.batch_code IS NULL",
    )
    .bind(production_order_number)
    .fetch_one(pool)
    .await?;

    if total == 0 {
        return Ok((0, Vec::new()));
    }

    let rows = sqlx::query_as::<_, UnplannedDbRow>(
        r#"SELECT
            mc.id,
            mc.production_order_number,
            mc.batch_code,
            mc.ingredient_code,
            pm.item_name,
            mc.lot,
            mc.quantity,
            mc.unit_of_measurement,
            mc.datetime,
            mc.operator_id,
            mc.supply_machine,
            mc.count,
            mc.request,
            mc.respone,
            mc.status1,
            mc."timestamp"
        FROM mes_material_consumption mc
        LEFT JOIN product_masters pm
            ON pm.item_code = mc.ingredient_code
        WHERE mc.production_order_number = $1
          AND mc.batch_code IS NULL
        ORDER BY mc.id DESC
        LIMIT $2 OFFSET $3"#,
    )
    .bind(production_order_number)
    .bind(page.limit)
    .bind(page.offset())
    .fetch_all(pool)
    .await?;

    Ok((total, rows.into_iter().map(Into::into).collect()))
}

#[derive(Debug, FromRow)]
struct UnplannedDbRow {
    id: i32,
    production_order_number: Option<String>,
    batch_code: Option<String>,
    ingredient_code: Option<String>,
    item_name: Option<String>,
    lot: Option<String>,
    quantity: Option<Decimal>,
    unit_of_measurement: Option<String>,
    datetime: Option<NaiveDateTime>,
    operator_id: Option<String>,
    supply_machine: Option<String>,
    count: Option<i32>,
    request: Option<String>,
    respone: Option<String>,
    status1: Option<String>,
    timestamp: Option<NaiveDateTime>,
}

impl From<UnplannedDbRow> for UnplannedRow {
    fn from(row: UnplannedDbRow) -> Self {
        let ingredient_code = display_code(row.ingredient_code, row.item_name.as_deref());
        Self {
            id: row.id.into(),
            production_order_number: row.production_order_number,
            batch_code: row.batch_code,
            ingredient_code,
            lot: row.lot,
            quantity: row.quantity,
            unit_of_measurement: row.unit_of_measurement,
            datetime: row.datetime,
            operator_id: row.operator_id,
            supply_machine: row.supply_machine,
            count: row.count.unwrap_or(0),
            request: row.request,
            respone: row.respone,
            status1: row.status1,
            timestamp: row.timestamp,
        }
    }
}

/// Distinct batch codes carrying consumption rows for one order.
#[tracing::instrument(skip(pool))]
pub async fn batch_codes_with_materials(
    pool: &PgPool,
    production_order_number: &str,
) -> Result<Vec<BatchCodeEntry>, RepositoryError> {
    let codes = sqlx::query_scalar::<_, Option<String>>(
        r"SELECT DISTINCT batch_code
        FROM mes_material_consumption
        WHERE production_order_number = $1
        ORDER BY batch_code ASC",
    )
    .bind(production_order_number)
    .fetch_all(pool)
    .await?;
    Ok(codes
        .into_iter()
        .map(|batch_code| BatchCodeEntry { batch_code })
        .collect())
}

/// Display names for a set of item codes, skipping unnamed items.
#[tracing::instrument(skip(pool, item_codes))]
pub async fn product_masters_by_codes(
    pool: &PgPool,
    item_codes: &[String],
) -> Result<Vec<ItemCodeName>, RepositoryError> {
    let placeholders: Vec<String> = (1..=item_codes.len()).map(|i| format!("${i}")).collect();
    let sql = format!(
        r"SELECT item_code, item_name
        FROM product_masters
        WHERE item_code IN ({})
          AND item_name IS NOT NULL",
        placeholders.join(", ")
    );

    let mut query = sqlx::query_as::<_, ItemCodeNameRow>(&sql);
    for code in item_codes {
        query = query.bind(code);
    }
    let rows = query.fetch_all(pool).await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

#[derive(Debug, FromRow)]
struct ItemCodeNameRow {
    item_code: String,
    item_name: String,
}

impl From<ItemCodeNameRow> for ItemCodeName {
    fn from(row: ItemCodeNameRow) -> Self {
        Self {
            item_code: row.item_code,
            item_name: row.item_name,
        }
    }
}

/// Single order with joined names, derived status, and batch aggregates.
#[tracing::instrument(skip(pool))]
pub async fn find_by_id(
    pool: &PgPool,
    production_order_id: ProductionOrderId,
) -> Result<Option<OrderDetail>, RepositoryError> {
    let row = sqlx::query_as::<_, OrderDetailRow>(
        r#"SELECT
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
            po."timestamp",
            po.plant,
            po.shopfloor,
            po.process_area,
            pm.item_name,
            ing.plan_quantity AS product_quantity,
            rd.recipe_name,
            CASE WHEN COUNT(mc.id) > 0 THEN 1 ELSE 0 END AS has_mes_data,
            MAX(CAST(NULLIF(btrim(mc.batch_code), '') AS BIGINT)) AS current_batch,
            COUNT(DISTINCT b.batch_number) AS total_batches
        FROM production_orders po
        LEFT JOIN product_masters pm
            ON po.product_code = pm.item_code
        LEFT JOIN products ing
            ON po.product_code = ing.product_code
        LEFT JOIN recipe_details rd
            ON po.recipe_code = rd.recipe_code
           AND po.recipe_version = rd.version
        LEFT JOIN mes_material_consumption mc
            ON mc.production_order_number = po.production_order_number
        LEFT JOIN batches b
            ON b.production_order_id = po.production_order_id
        WHERE po.production_order_id = $1
        GROUP BY
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
            po."timestamp",
            po.plant,
            po.shopfloor,
            po.process_area,
            pm.item_name,
            ing.plan_quantity,
            rd.recipe_name"#,
    )
    .bind(production_order_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Into::into))
}

#[derive(Debug, FromRow)]
struct OrderDetailRow {
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
    timestamp: Option<NaiveDateTime>,
    plant: Option<String>,
    shopfloor: Option<String>,
    process_area: Option<String>,
    item_name: Option<String>,
    product_quantity: Option<Decimal>,
    recipe_name: Option<String>,
    has_mes_data: i32,
    current_batch: Option<i64>,
    total_batches: i64,
}

impl From<OrderDetailRow> for OrderDetail {
    fn from(row: OrderDetailRow) -> Self {
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
            timestamp: row.timestamp,
            plant: row.plant,
            shopfloor: row.shopfloor,
            process_area: row.process_area,
            item_name: row.item_name,
            recipe_name: row.recipe_name,
            has_mes_data: row.has_mes_data,
            status: row.has_mes_data,
            current_batch: row.current_batch.unwrap_or(0),
            total_batches: row.total_batches,
            product_quantity: row.product_quantity,
        }
    }
}

/// Planned quantity of the order, for the plan-quantity derivation.
#[tracing::instrument(skip(pool))]
pub async fn order_quantity(
    pool: &PgPool,
    production_order_number: &str,
) -> Result<Option<Decimal>, RepositoryError> {
    let quantity = sqlx::query_scalar::<_, Option<Decimal>>(
        r"SELECT quantity
        FROM production_orders
        WHERE production_order_number = $1",
    )
    .bind(production_order_number)
    .fetch_optional(pool)
    .await?;
    Ok(quantity.flatten())
}

/// Summed plan quantity over the order's batches.
#[tracing::instrument(skip(pool))]
pub async fn batch_plan_total(
    pool: &PgPool,
    production_order_number: &str,
) -> Result<Decimal, RepositoryError> {
    let total = sqlx::query_scalar::<_, Decimal>(
        r"SELECT COALESCE(SUM(b.plan_quantity), 0)
        FROM batches b
        JOIN production_orders po
            ON po.production_order_id = b.production_order_id
        WHERE po.production_order_number = $1",
    )
    .bind(production_order_number)
    .fetch_one(pool)
    .await?;
    Ok(total)
}
