use chrono::NaiveDateTime;
use mes_core::consumption::{ConsumptionRow, IngredientGroup};
use mes_core::plan::PlanQuantity;
use mes_core::{BatchId, ConsumptionId, ProductionOrderId};
use rust_decimal::Decimal;
use serde::Serialize;

/// A batch of a production order. `BatchNumber` is nullable, rows with
/// no batch number mark unplanned consumption windows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Batch {
    pub batch_id: BatchId,
    pub production_order_id: ProductionOrderId,
    pub batch_number: Option<String>,
    pub plan_quantity: Option<Decimal>,
    pub unit_of_measurement: Option<String>,
}

/// One recipe ingredient line of the ingredients-by-product lookup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecipeIngredientRow {
    pub ingredient_code: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit_of_measurement: Option<String>,
    pub item_name: Option<String>,
    pub product_code: Option<String>,
    pub recipe_version: Option<String>,
}

/// Cached payload of the ingredients-by-product endpoint. The whole
/// response body is cached, headers and all, so repeat lookups for the
/// same order skip the database entirely.
#[derive(Debug, Clone, Serialize)]
pub struct IngredientsByProduct {
    pub success: bool,
    pub message: String,
    #[serde(rename = "productCode")]
    pub product_code: Option<String>,
    #[serde(rename = "recipeVersion")]
    pub recipe_version: Option<String>,
    pub total: usize,
    pub data: Vec<RecipeIngredientRow>,
}

/// One cell of the batch-by-ingredient consumption grid. Cells with no
/// matching consumption row keep the recipe side (ingredient code,
/// fallback unit) and null out the rest.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRow {
    pub id: Option<ConsumptionId>,
    pub batch_code: Option<String>,
    pub ingredient_code: Option<String>,
    pub lot: String,
    pub quantity: Option<Decimal>,
    pub unit_of_measurement: String,
    pub datetime: Option<NaiveDateTime>,
    #[serde(rename = "operator_ID")]
    pub operator_id: Option<String>,
    pub supply_machine: Option<String>,
    pub count: i32,
    pub request: Option<String>,
    pub respone: Option<String>,
    pub status1: Option<String>,
    pub timestamp: Option<NaiveDateTime>,
}

/// Consumption row outside any batch (`batchCode` is always null here).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnplannedRow {
    pub id: ConsumptionId,
    pub production_order_number: Option<String>,
    pub batch_code: Option<String>,
    pub ingredient_code: Option<String>,
    pub lot: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit_of_measurement: Option<String>,
    pub datetime: Option<NaiveDateTime>,
    #[serde(rename = "operator_ID")]
    pub operator_id: Option<String>,
    pub supply_machine: Option<String>,
    pub count: i32,
    pub request: Option<String>,
    pub respone: Option<String>,
    pub status1: Option<String>,
    pub timestamp: Option<NaiveDateTime>,
}

/// Distinct batch code carrying consumption rows.
#[derive(Debug, Clone, Serialize)]
pub struct BatchCodeEntry {
    #[serde(rename = "batchCode")]
    pub batch_code: Option<String>,
}

/// Item code with its display name, for the bulk name lookup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemCodeName {
    pub item_code: String,
    pub item_name: String,
}

/// Per-ingredient aggregate of the consumption grid, with the plan
/// quantity the batch is expected to draw.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedConsumption {
    pub ingredient_code: String,
    pub total_quantity: Decimal,
    pub batches: String,
    pub respone: Option<String>,
    pub latest_datetime: Option<NaiveDateTime>,
    pub plan_quantity: PlanQuantity,
    pub items: Vec<ConsumptionRow>,
}

impl GroupedConsumption {
    /// Shapes a core aggregation group for the wire, attaching the
    /// plan quantity computed by the caller.
    pub fn from_group(group: IngredientGroup, plan_quantity: PlanQuantity) -> Self {
        let batches = group.batch_display();
        Self {
            ingredient_code: group.ingredient_code,
            total_quantity: group.total_quantity,
            batches,
            respone: group.respone.map(|o| o.as_str().to_owned()),
            latest_datetime: group.latest_datetime,
            plan_quantity,
            items: group.items,
        }
    }
}
