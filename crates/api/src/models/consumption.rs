use chrono::NaiveDateTime;
use mes_core::ConsumptionId;
use rust_decimal::Decimal;
use serde::Serialize;

/// Full material-consumption log row, as served by the materials pages.
///
/// The upstream schema stores these columns in camelCase and the SPA
/// consumes them verbatim, including the misspelled `respone` outcome
/// column and the `operator_ID` casing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialConsumption {
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

/// Row count for the materials stats cards.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct MaterialStats {
    pub total: i64,
}

/// Distinct production-order number entry for the materials filter lists.
#[derive(Debug, Clone, Serialize)]
pub struct ProductionOrderRef {
    #[serde(rename = "productionOrderNumber")]
    pub production_order_number: Option<String>,
}

/// Distinct batch-code entry for the materials filter lists.
#[derive(Debug, Clone, Serialize)]
pub struct BatchCodeRef {
    #[serde(rename = "batchCode")]
    pub batch_code: Option<String>,
}

/// Distinct ingredient-code entry for the materials filter lists.
#[derive(Debug, Clone, Serialize)]
pub struct IngredientRef {
    #[serde(rename = "ingredientCode")]
    pub ingredient_code: String,
}
