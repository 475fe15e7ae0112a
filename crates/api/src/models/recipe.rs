use chrono::NaiveDateTime;
use mes_core::{IngredientId, ParameterId, ProcessId, RecipeDetailsId};
use rust_decimal::Decimal;
use serde::Serialize;

/// One recipe header row from the recipes list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Recipe {
    pub recipe_details_id: RecipeDetailsId,
    pub recipe_code: Option<String>,
    pub recipe_name: Option<String>,
    pub product_code: Option<String>,
    pub product_name: Option<String>,
    pub version: Option<String>,
    pub production_line: Option<String>,
    pub recipe_status: Option<String>,
    #[serde(rename = "timestamp")]
    pub timestamp: Option<NaiveDateTime>,
}

/// Recipes dashboard counters. `draft` is always zero, the upstream
/// schema has no draft state but the UI card expects the key.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RecipeStats {
    pub total: i64,
    pub active: i64,
    #[serde(rename = "totalVersions")]
    pub total_versions: i64,
    pub draft: i64,
}

/// A process step of a recipe.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Process {
    pub process_id: ProcessId,
    pub recipe_details_id: RecipeDetailsId,
    pub process_name: Option<String>,
    pub sequence: Option<i32>,
}

/// Recipe ingredient joined with its product-master display name.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Ingredient {
    pub ingredient_id: IngredientId,
    pub process_id: ProcessId,
    pub ingredient_code: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit_of_measurement: Option<String>,
    pub item_name: Option<String>,
}

/// Output product of a recipe, joined with its display name.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecipeProduct {
    pub product_code: Option<String>,
    pub plan_quantity: Option<Decimal>,
    pub unit_of_measurement: Option<String>,
    pub item_name: Option<String>,
}

/// Secondary output of a recipe.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ByProduct {
    pub by_product_code: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit_of_measurement: Option<String>,
}

/// Process parameter joined with its master name.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
    pub parameter_id: ParameterId,
    pub process_id: ProcessId,
    pub code: Option<String>,
    pub value: Option<String>,
    pub unit_of_measurement: Option<String>,
    pub parameter_name: Option<String>,
}

/// Full payload of the recipe-detail page: the header plus every
/// linked collection, fetched with separate statements.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeDetail {
    pub recipe: Recipe,
    pub processes: Vec<Process>,
    pub ingredients: Vec<Ingredient>,
    pub products: Vec<RecipeProduct>,
    #[serde(rename = "byProducts")]
    pub by_products: Vec<ByProduct>,
    pub parameters: Vec<Parameter>,
}
