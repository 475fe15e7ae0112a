//! Recipes repository: list/search over recipe headers, stats, and the
//! full recipe-detail payload.

use chrono::NaiveDateTime;
use mes_core::{RecipeDetailsId, RecipeStatus};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use crate::models::recipe::{
    ByProduct, Ingredient, Parameter, Process, Recipe, RecipeDetail, RecipeProduct, RecipeStats,
};
use crate::query::{Pagination, WhereBuilder};

use super::RepositoryError;

/// Search filters for the recipes list and stats.
#[derive(Debug, Clone, Default)]
pub struct RecipeSearch {
    pub search: Option<String>,
    /// CSV of `active`/`inactive` tokens. Takes precedence over `status`.
    pub statuses: Option<String>,
    /// Single `active`/`inactive` token, older clients.
    pub status: Option<String>,
}

impl RecipeSearch {
    fn parsed_statuses(&self) -> Vec<RecipeStatus> {
        if let Some(csv) = self.statuses.as_deref() {
            let parsed: Vec<RecipeStatus> =
                csv.split(',').filter_map(RecipeStatus::from_param).collect();
            if !parsed.is_empty() {
                return parsed;
            }
        }
        self.status
            .as_deref()
            .and_then(RecipeStatus::from_param)
            .into_iter()
            .collect()
    }

    /// Anything that is not exactly `Active` (NULL included) counts as
    /// inactive, matching how the status column is populated upstream.
    fn apply(&self, builder: &mut WhereBuilder, with_status: bool) {
        builder.like_any(
            &["recipe_code", "product_code", "product_name"],
            self.search.as_deref(),
        );

        if !with_status {
            return;
        }
        let statuses = self.parsed_statuses();
        let parts: Vec<&str> = statuses
            .iter()
            .map(|s| match s {
                RecipeStatus::Active => "recipe_status = 'Active'",
                RecipeStatus::Inactive => {
                    "(recipe_status NOT IN ('Active') OR recipe_status IS NULL)"
                }
            })
            .collect();
        match parts.len() {
            0 => {}
            1 => {
                builder.push_raw(parts[0]);
            }
            _ => {
                builder.push_raw(format!("({})", parts.join(" OR ")));
            }
        }
    }
}

#[derive(Debug, FromRow)]
struct RecipeRow {
    recipe_details_id: i32,
    recipe_code: Option<String>,
    recipe_name: Option<String>,
    product_code: Option<String>,
    product_name: Option<String>,
    version: Option<String>,
    production_line: Option<String>,
    recipe_status: Option<String>,
    timestamp: Option<NaiveDateTime>,
}

impl From<RecipeRow> for Recipe {
    fn from(row: RecipeRow) -> Self {
        Self {
            recipe_details_id: row.recipe_details_id.into(),
            recipe_code: row.recipe_code,
            recipe_name: row.recipe_name,
            product_code: row.product_code,
            product_name: row.product_name,
            version: row.version,
            production_line: row.production_line,
            recipe_status: row.recipe_status,
            timestamp: row.timestamp,
        }
    }
}

const RECIPE_COLUMNS: &str = r#"
    recipe_details_id,
    recipe_code,
    recipe_name,
    product_code,
    product_name,
    version,
    production_line,
    recipe_status,
    "timestamp"
"#;

/// Every recipe header, newest first.
#[tracing::instrument(skip(pool))]
pub async fn list(pool: &PgPool) -> Result<Vec<Recipe>, RepositoryError> {
    let sql = format!(
        r"SELECT {RECIPE_COLUMNS}
        FROM recipe_details
        ORDER BY recipe_details_id DESC"
    );
    let rows = sqlx::query_as::<_, RecipeRow>(&sql).fetch_all(pool).await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Filtered and paginated recipe headers, with the total match count.
#[tracing::instrument(skip(pool, search))]
pub async fn search(
    pool: &PgPool,
    search: &RecipeSearch,
    page: Pagination,
) -> Result<(Vec<Recipe>, i64), RepositoryError> {
    let mut builder = WhereBuilder::new();
    search.apply(&mut builder, true);

    let count_sql = format!("SELECT COUNT(*) FROM recipe_details {}", builder.clause());
    let total = builder
        .bind_scalar(sqlx::query_scalar::<_, i64>(&count_sql))
        .fetch_one(pool)
        .await?;

    let limit_ph = builder.bind_count() + 1;
    let offset_ph = builder.bind_count() + 2;
    let sql = format!(
        r"SELECT {RECIPE_COLUMNS}
        FROM recipe_details
        {}
        ORDER BY recipe_details_id DESC
        LIMIT ${limit_ph} OFFSET ${offset_ph}",
        builder.clause()
    );
    let rows = builder
        .bind_all(sqlx::query_as::<_, RecipeRow>(&sql))
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

    Ok((rows.into_iter().map(Into::into).collect(), total))
}

/// Recipe counters, unfiltered.
#[tracing::instrument(skip(pool))]
pub async fn stats(pool: &PgPool) -> Result<RecipeStats, RepositoryError> {
    stats_search(pool, &RecipeSearch::default()).await
}

/// Recipe counters over the filtered set.
///
/// `active` intersects the caller's status filter with the Active
/// condition rather than replacing it, so selecting only `inactive`
/// reports zero actives.
#[tracing::instrument(skip(pool, search))]
pub async fn stats_search(
    pool: &PgPool,
    search: &RecipeSearch,
) -> Result<RecipeStats, RepositoryError> {
    let mut full = WhereBuilder::new();
    search.apply(&mut full, true);
    let total_sql = format!("SELECT COUNT(*) FROM recipe_details {}", full.clause());
    let total = full
        .bind_scalar(sqlx::query_scalar::<_, i64>(&total_sql))
        .fetch_one(pool)
        .await?;

    let mut active = WhereBuilder::new();
    search.apply(&mut active, true);
    active.push_raw("recipe_status = 'Active'");
    let active_sql = format!("SELECT COUNT(*) FROM recipe_details {}", active.clause());
    let active = active
        .bind_scalar(sqlx::query_scalar::<_, i64>(&active_sql))
        .fetch_one(pool)
        .await?;

    let mut versions = WhereBuilder::new();
    search.apply(&mut versions, true);
    let versions_sql = format!(
        "SELECT COUNT(DISTINCT version) FROM recipe_details {}",
        versions.clause()
    );
    let total_versions = versions
        .bind_scalar(sqlx::query_scalar::<_, i64>(&versions_sql))
        .fetch_one(pool)
        .await?;

    Ok(RecipeStats {
        total,
        active,
        total_versions,
        draft: 0,
    })
}

/// Recipe header by id, or `None`.
#[tracing::instrument(skip(pool))]
pub async fn find_by_id(
    pool: &PgPool,
    recipe_details_id: RecipeDetailsId,
) -> Result<Option<Recipe>, RepositoryError> {
    let sql = format!(
        r"SELECT {RECIPE_COLUMNS}
        FROM recipe_details
        WHERE recipe_details_id = $1"
    );
    let row = sqlx::query_as::<_, RecipeRow>(&sql)
        .bind(recipe_details_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Into::into))
}

/// Full detail payload for one recipe: the header plus every linked
/// collection. Returns `None` when the recipe does not exist.
#[tracing::instrument(skip(pool))]
pub async fn detail(
    pool: &PgPool,
    recipe_details_id: RecipeDetailsId,
) -> Result<Option<RecipeDetail>, RepositoryError> {
    let Some(recipe) = find_by_id(pool, recipe_details_id).await? else {
        return Ok(None);
    };

    let processes = sqlx::query_as::<_, ProcessRow>(
        r"SELECT process_id, recipe_details_id, process_name, sequence
        FROM processes
        WHERE recipe_details_id = $1",
    )
    .bind(recipe_details_id)
    .fetch_all(pool)
    .await?;
    let processes: Vec<Process> = processes.into_iter().map(Into::into).collect();

    let ingredients = sqlx::query_as::<_, IngredientRow>(
        r"SELECT
            i.ingredient_id,
            i.process_id,
            i.ingredient_code,
            i.quantity,
            i.unit_of_measurement,
            pm.item_name
        FROM ingredients i
        LEFT JOIN product_masters pm
            ON i.ingredient_code = pm.item_code
        WHERE i.process_id IN (
            SELECT process_id FROM processes WHERE recipe_details_id = $1
        )",
    )
    .bind(recipe_details_id)
    .fetch_all(pool)
    .await?;

    let mut products = Vec::new();
    let mut by_products = Vec::new();
    if let Some(product_code) = recipe.product_code.as_deref() {
        let product_rows = sqlx::query_as::<_, RecipeProductRow>(
            r"SELECT
                p.product_code,
                p.plan_quantity,
                p.unit_of_measurement,
                pm.item_name
            FROM products p
            LEFT JOIN product_masters pm
                ON p.product_code = pm.item_code
            WHERE p.product_code = $1",
        )
        .bind(product_code)
        .fetch_all(pool)
        .await?;
        products = product_rows.into_iter().map(Into::into).collect();

        let by_product_rows = sqlx::query_as::<_, ByProductRow>(
            r"SELECT by_product_code, quantity, unit_of_measurement
            FROM by_products
            WHERE by_product_code = $1",
        )
        .bind(product_code)
        .fetch_all(pool)
        .await?;
        by_products = by_product_rows.into_iter().map(Into::into).collect();
    }

    let parameters = sqlx::query_as::<_, ParameterRow>(
        r"SELECT
            p.parameter_id,
            p.process_id,
            p.code,
            p.value,
            p.unit_of_measurement,
            ppm.name AS parameter_name
        FROM parameters p
        LEFT JOIN process_parameter_masters ppm
            ON p.code = ppm.code
        WHERE p.process_id IN (
            SELECT process_id FROM processes WHERE recipe_details_id = $1
        )",
    )
    .bind(recipe_details_id)
    .fetch_all(pool)
    .await?;

    Ok(Some(RecipeDetail {
        recipe,
        processes,
        ingredients: ingredients.into_iter().map(Into::into).collect(),
        products,
        by_products,
        parameters: parameters.into_iter().map(Into::into).collect(),
    }))
}

#[derive(Debug, FromRow)]
struct ProcessRow {
    process_id: i32,
    recipe_details_id: i32,
    process_name: Option<String>,
    sequence: Option<i32>,
}

impl From<ProcessRow> for Process {
    fn from(row: ProcessRow) -> Self {
        Self {
            process_id: row.process_id.into(),
            recipe_details_id: row.recipe_details_id.into(),
            process_name: row.process_name,
            sequence: row.sequence,
        }
    }
}

#[derive(Debug, FromRow)]
struct IngredientRow {
    ingredient_id: i32,
    process_id: i32,
    ingredient_code: Option<String>,
    quantity: Option<Decimal>,
    unit_of_measurement: Option<String>,
    item_name: Option<String>,
}

impl From<IngredientRow> for Ingredient {
    fn from(row: IngredientRow) -> Self {
        Self {
            ingredient_id: row.ingredient_id.into(),
            process_id: row.process_id.into(),
            ingredient_code: row.ingredient_code,
            quantity: row.quantity,
            unit_of_measurement: row.unit_of_measurement,
            item_name: row.item_name,
        }
    }
}

#[derive(Debug, FromRow)]
struct RecipeProductRow {
    product_code: Option<String>,
    plan_quantity: Option<Decimal>,
    unit_of_measurement: Option<String>,
    item_name: Option<String>,
}

impl From<RecipeProductRow> for RecipeProduct {
    fn from(row: RecipeProductRow) -> Self {
        Self {
            product_code: row.product_code,
            plan_quantity: row.plan_quantity,
            unit_of_measurement: row.unit_of_measurement,
            item_name: row.item_name,
        }
    }
}

#[derive(Debug, FromRow)]
struct ByProductRow {
    by_product_code: Option<String>,
    quantity: Option<Decimal>,
    unit_of_measurement: Option<String>,
}

impl From<ByProductRow> for ByProduct {
    fn from(row: ByProductRow) -> Self {
        Self {
            by_product_code: row.by_product_code,
            quantity: row.quantity,
            unit_of_measurement: row.unit_of_measurement,
        }
    }
}

#[derive(Debug, FromRow)]
struct ParameterRow {
    parameter_id: i32,
    process_id: i32,
    code: Option<String>,
    value: Option<String>,
    unit_of_measurement: Option<String>,
    parameter_name: Option<String>,
}

impl From<ParameterRow> for Parameter {
    fn from(row: ParameterRow) -> Self {
        Self {
            parameter_id: row.parameter_id.into(),
            process_id: row.process_id.into(),
            code: row.code,
            value: row.value,
            unit_of_measurement: row.unit_of_measurement,
            parameter_name: row.parameter_name,
        }
    }
}
