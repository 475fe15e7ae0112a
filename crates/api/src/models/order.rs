use chrono::NaiveDateTime;
use mes_core::ProductionOrderId;
use rust_decimal::Decimal;
use serde::Serialize;

/// One row of the production-orders list grid.
///
/// `ProductCode` and `RecipeCode` are display strings: when the joined
/// item/recipe name is present they become `"CODE - Name"`.
/// `CurrentBatch` is the numeric maximum of the order's consumption
/// batch codes; orders without consumption report `0`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductionOrderSummary {
    pub production_order_id: ProductionOrderId,
    pub production_order_number: Option<String>,
    pub production_line: Option<String>,
    pub product_code: Option<String>,
    pub recipe_code: Option<String>,
    pub recipe_version: Option<String>,
    pub shift: Option<String>,
    pub planned_start: Option<NaiveDateTime>,
    pub planned_end: Option<NaiveDateTime>,
    pub quantity: Option<Decimal>,
    pub unit_of_measurement: Option<String>,
    pub lot_number: Option<String>,
    pub plant: Option<String>,
    pub shopfloor: Option<String>,
    pub process_area: Option<String>,
    pub item_name: Option<String>,
    pub recipe_name: Option<String>,
    pub status: i32,
    pub current_batch: i64,
    pub total_batches: i64,
}

/// Single-order detail payload. Same display-string conventions as the
/// list rows, plus the product plan quantity from the products table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrderDetail {
    pub production_order_id: ProductionOrderId,
    pub production_order_number: Option<String>,
    pub production_line: Option<String>,
    pub product_code: Option<String>,
    pub recipe_code: Option<String>,
    pub recipe_version: Option<String>,
    pub shift: Option<String>,
    pub planned_start: Option<NaiveDateTime>,
    pub planned_end: Option<NaiveDateTime>,
    pub quantity: Option<Decimal>,
    pub unit_of_measurement: Option<String>,
    pub lot_number: Option<String>,
    #[serde(rename = "timestamp")]
    pub timestamp: Option<NaiveDateTime>,
    pub plant: Option<String>,
    pub shopfloor: Option<String>,
    pub process_area: Option<String>,
    pub item_name: Option<String>,
    pub recipe_name: Option<String>,
    #[serde(rename = "HasMESData")]
    pub has_mes_data: i32,
    pub status: i32,
    pub current_batch: i64,
    pub total_batches: i64,
    pub product_quantity: Option<Decimal>,
}

/// Headline counters for the orders dashboard cards.
/// `stopped` is `total - inProgress`.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct OrderStats {
    pub total: i64,
    #[serde(rename = "inProgress")]
    pub in_progress: i64,
    pub completed: i64,
    pub stopped: i64,
}

/// Distinct filter values offered by the orders list UI.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrderFilters {
    #[serde(rename = "processAreas")]
    pub process_areas: Vec<String>,
    pub shifts: Vec<String>,
}

/// Joins a code with its looked-up display name, `"CODE - Name"`.
pub fn display_code(code: Option<String>, name: Option<&str>) -> Option<String> {
    match (code, name) {
        (Some(code), Some(name)) => Some(format!("{code} - {name}")),
        (code, _) => code,
    }
}
