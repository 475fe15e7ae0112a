use chrono::NaiveDateTime;
use mes_core::{MhuTypeId, ProductMasterId};
use rust_decimal::Decimal;
use serde::Serialize;

/// Product master with its unit conversions nested. The products
/// endpoints return these bare, without the success envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductMaster {
    pub product_master_id: ProductMasterId,
    pub item_code: Option<String>,
    pub item_name: Option<String>,
    #[serde(rename = "Item_Type")]
    pub item_type: Option<String>,
    pub group: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub base_unit: Option<String>,
    pub inventory_unit: Option<String>,
    #[serde(rename = "Item_Status")]
    pub item_status: Option<String>,
    #[serde(rename = "timestamp")]
    pub timestamp: Option<NaiveDateTime>,
    pub mhu_types: Vec<MhuType>,
}

/// One unit-conversion factor of a product master.
#[derive(Debug, Clone, Serialize, serde::Deserialize)]
pub struct MhuType {
    #[serde(rename = "MHUTypeId")]
    pub mhu_type_id: MhuTypeId,
    #[serde(rename = "FromUnit")]
    pub from_unit: Option<String>,
    #[serde(rename = "ToUnit")]
    pub to_unit: Option<String>,
    #[serde(rename = "Conversion")]
    pub conversion: Option<Decimal>,
}

/// Flat product row of the unpaginated list, one row per (product, MHU)
/// combination as produced by the left join.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductJoinRow {
    pub product_master_id: ProductMasterId,
    pub item_code: Option<String>,
    pub item_name: Option<String>,
    #[serde(rename = "Item_Type")]
    pub item_type: Option<String>,
    pub group: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub base_unit: Option<String>,
    pub inventory_unit: Option<String>,
    #[serde(rename = "Item_Status")]
    pub item_status: Option<String>,
    #[serde(rename = "timestamp")]
    pub timestamp: Option<NaiveDateTime>,
    #[serde(rename = "MHUTypeId")]
    pub mhu_type_id: Option<MhuTypeId>,
    pub from_unit: Option<String>,
    pub to_unit: Option<String>,
    pub conversion: Option<Decimal>,
}

/// Products dashboard counters, returned bare.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStats {
    pub total_products: i64,
    pub active_products: i64,
    pub total_types: i64,
    pub total_categories: i64,
    pub total_groups: i64,
}

/// Paged result of the product search, returned bare.
#[derive(Debug, Clone, Serialize)]
pub struct ProductPage {
    pub items: Vec<ProductMaster>,
    pub total: i64,
    pub page: u32,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
}
