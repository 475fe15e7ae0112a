//! Material-consumption log repository.
//!
//! The search WHERE clause is the full CSV/NULL-sentinel filter set:
//! order numbers use the empty-string convention for the `NULL` token,
//! batch and ingredient codes are genuinely nullable columns.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use crate::models::consumption::{
    BatchCodeRef, IngredientRef, MaterialConsumption, ProductionOrderRef,
};
use crate::query::{NullMatch, Pagination, WhereBuilder};

use super::RepositoryError;

/// Search filters for the consumption log.
#[derive(Debug, Clone, Default)]
pub struct MaterialSearch {
    pub production_order_number: Option<String>,
    pub batch_code: Option<String>,
    pub ingredient_code: Option<String>,
    pub respone: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

impl MaterialSearch {
    fn apply(&self, builder: &mut WhereBuilder) {
        builder
            .csv_in(
                "production_order_number",
                self.production_order_number.as_deref(),
                NullMatch::EmptyString,
            )
            .csv_in("batch_code", self.batch_code.as_deref(), NullMatch::SqlNull)
            .csv_in(
                "ingredient_code",
                self.ingredient_code.as_deref(),
                NullMatch::SqlNull,
            )
            .outcome("respone", self.respone.as_deref())
            .date_range("datetime", self.from_date.as_deref(), self.to_date.as_deref());
    }
}

const CONSUMPTION_COLUMNS: &str = r#"
    id,
    production_order_number,
    batch_code,
    ingredient_code,
    lot,
    quantity,
    unit_of_measurement,
    datetime,
    operator_id,
    supply_machine,
    count,
    request,
    respone,
    status1,
    "timestamp"
"#;

#[derive(Debug, FromRow)]
struct ConsumptionDbRow {
    id: i32,
    production_order_number: Option<String>,
    batch_code: Option<String>,
    ingredient_code: Option<String>,
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

impl From<ConsumptionDbRow> for MaterialConsumption {
    fn from(row: ConsumptionDbRow) -> Self {
        Self {
            id: row.id.into(),
            production_order_number: row.production_order_number,
            batch_code: row.batch_code,
            ingredient_code: row.ingredient_code,
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

/// One page of the raw log, newest draws first.
#[tracing::instrument(skip(pool))]
pub async fn list(
    pool: &PgPool,
    page: Pagination,
) -> Result<Vec<MaterialConsumption>, RepositoryError> {
    let sql = format!(
        r"SELECT {CONSUMPTION_COLUMNS}
        FROM mes_material_consumption
        ORDER BY datetime DESC
        LIMIT $1 OFFSET $2"
    );
    let rows = sqlx::query_as::<_, ConsumptionDbRow>(&sql)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Filtered page of the log.
#[tracing::instrument(skip(pool, search))]
pub async fn search(
    pool: &PgPool,
    search: &MaterialSearch,
    page: Pagination,
) -> Result<Vec<MaterialConsumption>, RepositoryError> {
    let mut builder = WhereBuilder::new();
    search.apply(&mut builder);

    let limit_ph = builder.bind_count() + 1;
    let offset_ph = builder.bind_count() + 2;
    let sql = format!(
        r"SELECT {CONSUMPTION_COLUMNS}
        FROM mes_material_consumption
        {}
        ORDER BY datetime DESC
        LIMIT ${limit_ph} OFFSET ${offset_ph}",
        builder.clause()
    );
    let rows = builder
        .bind_all(sqlx::query_as::<_, ConsumptionDbRow>(&sql))
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Total row count.
#[tracing::instrument(skip(pool))]
pub async fn stats(pool: &PgPool) -> Result<i64, RepositoryError> {
    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM mes_material_consumption")
        .fetch_one(pool)
        .await?;
    Ok(total)
}

/// Row count matching the filters.
#[tracing::instrument(skip(pool, search))]
pub async fn stats_search(pool: &PgPool, search: &MaterialSearch) -> Result<i64, RepositoryError> {
    let mut builder = WhereBuilder::new();
    search.apply(&mut builder);

    let sql = format!(
        "SELECT COUNT(*) FROM mes_material_consumption {}",
        builder.clause()
    );
    let total = builder
        .bind_scalar(sqlx::query_scalar::<_, i64>(&sql))
        .fetch_one(pool)
        .await?;
    Ok(total)
}

/// Distinct order numbers appearing in the log.
#[tracing::instrument(skip(pool))]
pub async fn production_orders(pool: &PgPool) -> Result<Vec<ProductionOrderRef>, RepositoryError> {
    let numbers = sqlx::query_scalar::<_, Option<String>>(
        r"SELECT DISTINCT production_order_number
        FROM mes_material_consumption
        ORDER BY production_order_number ASC",
    )
    .fetch_all(pool)
    .await?;
    Ok(numbers
        .into_iter()
        .map(|production_order_number| ProductionOrderRef {
            production_order_number,
        })
        .collect())
}

/// Distinct non-blank batch codes, numerically sorted, optionally
/// narrowed to one order.
#[tracing::instrument(skip(pool))]
pub async fn batch_codes(
    pool: &PgPool,
    production_order_number: Option<&str>,
) -> Result<Vec<BatchCodeRef>, RepositoryError> {
    let mut builder = WhereBuilder::new();
    builder
        .push_raw("batch_code IS NOT NULL")
        .push_raw("btrim(batch_code) <> ''")
        .equals("production_order_number", production_order_number);

    // DISTINCT happens in the subquery so the numeric sort expression
    // does not have to appear in the select list.
    let sql = format!(
        r"SELECT batch_code
        FROM (
            SELECT DISTINCT batch_code
            FROM mes_material_consumption
            {}
        ) t
        ORDER BY CAST(batch_code AS INTEGER) ASC",
        builder.clause()
    );
    let codes = builder
        .bind_scalar(sqlx::query_scalar::<_, String>(&sql))
        .fetch_all(pool)
        .await?;
    Ok(codes
        .into_iter()
        .map(|code| BatchCodeRef {
            batch_code: Some(code),
        })
        .collect())
}

/// Distinct non-blank ingredient codes, optionally narrowed to one
/// order and/or batch.
#[tracing::instrument(skip(pool))]
pub async fn ingredients(
    pool: &PgPool,
    production_order_number: Option<&str>,
    batch_code: Option<&str>,
) -> Result<Vec<IngredientRef>, RepositoryError> {
    let mut builder = WhereBuilder::new();
    builder
        .push_raw("ingredient_code IS NOT NULL")
        .push_raw("btrim(ingredient_code) <> ''")
        .equals("production_order_number", production_order_number)
        .equals("batch_code", batch_code);

    let sql = format!(
        r"SELECT DISTINCT ingredient_code
        FROM mes_material_consumption
        {}
        ORDER BY ingredient_code ASC",
        builder.clause()
    );
    let codes = builder
        .bind_scalar(sqlx::query_scalar::<_, String>(&sql))
        .fetch_all(pool)
        .await?;
    Ok(codes
        .into_iter()
        .map(|ingredient_code| IngredientRef { ingredient_code })
        .collect())
}
