//! Product-masters repository.
//!
//! The search and by-code lookups aggregate each product's unit
//! conversions (`mhu_types`) into a JSON array inside the statement, so
//! one row per product comes back with its conversions nested.

use chrono::NaiveDateTime;
use mes_core::ItemStatus;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use crate::models::product::{MhuType, ProductJoinRow, ProductMaster, ProductStats};
use crate::query::{Pagination, WhereBuilder};

use super::RepositoryError;

/// Search filters for the products list and stats.
#[derive(Debug, Clone, Default)]
pub struct ProductSearch {
    pub q: Option<String>,
    /// CSV of `ACTIVE`/`INACTIVE` tokens. Takes precedence over `status`.
    pub statuses: Option<String>,
    pub status: Option<String>,
    /// CSV of item types. Takes precedence over `type`.
    pub types: Option<String>,
    pub item_type: Option<String>,
}

impl ProductSearch {
    fn parsed_statuses(&self) -> Vec<ItemStatus> {
        if let Some(csv) = self.statuses.as_deref() {
            let parsed: Vec<ItemStatus> =
                csv.split(',').filter_map(ItemStatus::from_param).collect();
            if !parsed.is_empty() {
                return parsed;
            }
        }
        self.status
            .as_deref()
            .and_then(ItemStatus::from_param)
            .into_iter()
            .collect()
    }

    fn apply(&self, builder: &mut WhereBuilder) {
        builder.like_any(
            &["p.item_code", "p.item_name", r#"p."group""#],
            self.q.as_deref(),
        );

        // ACTIVE matches the stored value exactly; INACTIVE also matches
        // NULL, which is how unclassified items behave in the UI.
        let parts: Vec<String> = self
            .parsed_statuses()
            .into_iter()
            .map(|status| {
                let ph = builder.text_placeholder(status.as_str());
                match status {
                    ItemStatus::Active => format!("p.item_status = {ph}"),
                    ItemStatus::Inactive => {
                        format!("(p.item_status = {ph} OR p.item_status IS NULL)")
                    }
                }
            })
            .collect();
        match parts.len() {
            0 => {}
            1 => {
                builder.push_raw(parts[0].clone());
            }
            _ => {
                builder.push_raw(format!("({})", parts.join(" OR ")));
            }
        }

        if self.types.as_deref().is_some_and(|t| !t.trim().is_empty()) {
            builder.csv_in(
                "p.item_type",
                self.types.as_deref(),
                crate::query::NullMatch::SqlNull,
            );
        } else {
            builder.equals("p.item_type", self.item_type.as_deref());
        }
    }
}

/// Product counters, optionally over a filtered set.
#[tracing::instrument(skip(pool, search))]
pub async fn stats(
    pool: &PgPool,
    search: Option<&ProductSearch>,
) -> Result<ProductStats, RepositoryError> {
    let mut builder = WhereBuilder::new();
    if let Some(search) = search {
        search.apply(&mut builder);
    }

    let sql = format!(
        r#"SELECT
            COUNT(*) AS total_products,
            COALESCE(SUM(CASE WHEN p.item_status = 'ACTIVE' THEN 1 ELSE 0 END), 0) AS active_products,
            COUNT(DISTINCT p.item_type) AS total_types,
            COUNT(DISTINCT p.category) AS total_categories,
            COUNT(DISTINCT p."group") AS total_groups
        FROM product_masters p
        {}"#,
        builder.clause()
    );
    let row = builder
        .bind_all(sqlx::query_as::<_, StatsRow>(&sql))
        .fetch_one(pool)
        .await?;
    Ok(row.into())
}

#[derive(Debug, FromRow)]
struct StatsRow {
    total_products: i64,
    active_products: i64,
    total_types: i64,
    total_categories: i64,
    total_groups: i64,
}

impl From<StatsRow> for ProductStats {
    fn from(row: StatsRow) -> Self {
        Self {
            total_products: row.total_products,
            active_products: row.active_products,
            total_types: row.total_types,
            total_categories: row.total_categories,
            total_groups: row.total_groups,
        }
    }
}

/// Flat unpaginated dump, one row per (product, conversion) pair.
#[tracing::instrument(skip(pool))]
pub async fn list(pool: &PgPool) -> Result<Vec<ProductJoinRow>, RepositoryError> {
    let rows = sqlx::query_as::<_, JoinDbRow>(
        r#"SELECT
            p.product_master_id,
            p.item_code,
            p.item_name,
            p.item_type,
            p."group",
            p.category,
            p.brand,
            p.base_unit,
            p.inventory_unit,
            p.item_status,
            p."timestamp",
            m.mhu_type_id,
            m.from_unit,
            m.to_unit,
            m.conversion
        FROM product_masters p
        LEFT JOIN mhu_types m
            ON p.product_master_id = m.product_master_id"#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

#[derive(Debug, FromRow)]
struct JoinDbRow {
    product_master_id: i32,
    item_code: Option<String>,
    item_name: Option<String>,
    item_type: Option<String>,
    group: Option<String>,
    category: Option<String>,
    brand: Option<String>,
    base_unit: Option<String>,
    inventory_unit: Option<String>,
    item_status: Option<String>,
    timestamp: Option<NaiveDateTime>,
    mhu_type_id: Option<i32>,
    from_unit: Option<String>,
    to_unit: Option<String>,
    conversion: Option<Decimal>,
}

impl From<JoinDbRow> for ProductJoinRow {
    fn from(row: JoinDbRow) -> Self {
        Self {
            product_master_id: row.product_master_id.into(),
            item_code: row.item_code,
            item_name: row.item_name,
            item_type: row.item_type,
            group: row.group,
            category: row.category,
            brand: row.brand,
            base_unit: row.base_unit,
            inventory_unit: row.inventory_unit,
            item_status: row.item_status,
            timestamp: row.timestamp,
            mhu_type_id: row.mhu_type_id.map(Into::into),
            from_unit: row.from_unit,
            to_unit: row.to_unit,
            conversion: row.conversion,
        }
    }
}

/// Distinct item types, NULL included (the UI shows it as a blank
/// option).
#[tracing::instrument(skip(pool))]
pub async fn types(pool: &PgPool) -> Result<Vec<Option<String>>, RepositoryError> {
    let types = sqlx::query_scalar::<_, Option<String>>(
        "SELECT DISTINCT item_type FROM product_masters",
    )
    .fetch_all(pool)
    .await?;
    Ok(types)
}

const PRODUCT_SELECT: &str = r#"
    p.product_master_id,
    p.item_code,
    p.item_name,
    p.item_type,
    p."group",
    p.category,
    p.brand,
    p.base_unit,
    p.inventory_unit,
    p.item_status,
    p."timestamp",
    COALESCE((
        SELECT json_agg(json_build_object(
            'MHUTypeId', m.mhu_type_id,
            'FromUnit', m.from_unit,
            'ToUnit', m.to_unit,
            'Conversion', m.conversion
        ))
        FROM mhu_types m
        WHERE m.product_master_id = p.product_master_id
    ), '[]'::json) AS mhu_types
"#;

/// Filtered, paginated products with nested conversions, plus the match
/// count.
#[tracing::instrument(skip(pool, search))]
pub async fn search(
    pool: &PgPool,
    search: &ProductSearch,
    page: Pagination,
) -> Result<(Vec<ProductMaster>, i64), RepositoryError> {
    let mut builder = WhereBuilder::new();
    search.apply(&mut builder);

    let count_sql = format!(
        "SELECT COUNT(*) FROM product_masters p {}",
        builder.clause()
    );
    let total = builder
        .bind_scalar(sqlx::query_scalar::<_, i64>(&count_sql))
        .fetch_one(pool)
        .await?;

    let limit_ph = builder.bind_count() + 1;
    let offset_ph = builder.bind_count() + 2;
    let sql = format!(
        r#"SELECT {PRODUCT_SELECT}
        FROM product_masters p
        {}
        ORDER BY p."timestamp" DESC
        LIMIT ${limit_ph} OFFSET ${offset_ph}"#,
        builder.clause()
    );
    let rows = builder
        .bind_all(sqlx::query_as::<_, ProductDbRow>(&sql))
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

    Ok((rows.into_iter().map(Into::into).collect(), total))
}

/// One product by item code, with nested conversions.
#[tracing::instrument(skip(pool))]
pub async fn find_by_item_code(
    pool: &PgPool,
    item_code: &str,
) -> Result<Option<ProductMaster>, RepositoryError> {
    let sql = format!(
        r"SELECT {PRODUCT_SELECT}
        FROM product_masters p
        WHERE p.item_code = $1"
    );
    let row = sqlx::query_as::<_, ProductDbRow>(&sql)
        .bind(item_code)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Into::into))
}

#[derive(Debug, FromRow)]
struct ProductDbRow {
    product_master_id: i32,
    item_code: Option<String>,
    item_name: Option<String>,
    item_type: Option<String>,
    group: Option<String>,
    category: Option<String>,
    brand: Option<String>,
    base_unit: Option<String>,
    inventory_unit: Option<String>,
    item_status: Option<String>,
    timestamp: Option<NaiveDateTime>,
    mhu_types: serde_json::Value,
}

impl From<ProductDbRow> for ProductMaster {
    fn from(row: ProductDbRow) -> Self {
        // An unparsable aggregate degrades to an empty list rather than
        // failing the whole page.
        let mhu_types: Vec<MhuType> = serde_json::from_value(row.mhu_types).unwrap_or_default();
        Self {
            product_master_id: row.product_master_id.into(),
            item_code: row.item_code,
            item_name: row.item_name,
            item_type: row.item_type,
            group: row.group,
            category: row.category,
            brand: row.brand,
            base_unit: row.base_unit,
            inventory_unit: row.inventory_unit,
            item_status: row.item_status,
            timestamp: row.timestamp,
            mhu_types,
        }
    }
}
