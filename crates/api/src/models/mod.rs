//! API response models.
//!
//! Field names follow the wire shapes the SPA already consumes: the
//! order/recipe/product rows keep the upstream PascalCase column names,
//! the consumption rows keep camelCase. The mix is inherited from the
//! upstream schema, not a convention to emulate elsewhere.

pub mod consumption;
pub mod order;
pub mod order_detail;
pub mod product;
pub mod recipe;
