//! Plan-quantity derivation for an ingredient/batch pair.
//!
//! The expected draw quantity for an ingredient in one batch scales the
//! recipe-level total by the batch's share of the order:
//!
//! ```text
//! plan = (recipe_quantity / order_quantity) * batch_quantity
//! ```
//!
//! rounded to two decimal places. A zero recipe or batch quantity means the
//! reference data is missing, so the result is the distinct `N/A` sentinel
//! rather than zero - conflating the two would make a genuinely-zero plan
//! indistinguishable from "we don't know".

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

/// Expected draw quantity, or the not-available sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanQuantity {
    Amount(Decimal),
    NotAvailable,
}

impl Serialize for PlanQuantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // Fully qualified so rust_decimal's inherent `Decimal::serialize`
            // (the raw 16-byte form) does not shadow the serde method.
            Self::Amount(d) => Serialize::serialize(d, serializer),
            Self::NotAvailable => serializer.serialize_str("N/A"),
        }
    }
}

impl std::fmt::Display for PlanQuantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Amount(d) => write!(f, "{d}"),
            Self::NotAvailable => f.write_str("N/A"),
        }
    }
}

/// Derive the plan quantity for one ingredient in one batch.
///
/// * `recipe_quantity` - the ingredient's total quantity across all recipe
///   processes for the product
/// * `order_quantity` - the order's total planned quantity
/// * `batch_quantity` - the batch's actual quantity
///
/// Returns [`PlanQuantity::NotAvailable`] when `recipe_quantity` or
/// `batch_quantity` is zero, or when the division is impossible
/// (zero `order_quantity`).
#[must_use]
pub fn plan_quantity(
    recipe_quantity: Decimal,
    order_quantity: Decimal,
    batch_quantity: Decimal,
) -> PlanQuantity {
    if recipe_quantity.is_zero() || batch_quantity.is_zero() {
        return PlanQuantity::NotAvailable;
    }
    recipe_quantity
        .checked_div(order_quantity)
        .map_or(PlanQuantity::NotAvailable, |ratio| {
            PlanQuantity::Amount((ratio * batch_quantity).round_dp(2))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    #[test]
    fn scales_recipe_quantity_by_batch_share() {
        // Order of 1000, recipe calls for 50 of X, batch of 200 -> 10.00.
        assert_eq!(
            plan_quantity(d("50"), d("1000"), d("200")),
            PlanQuantity::Amount(d("10.00"))
        );
    }

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(
            plan_quantity(d("1"), d("3"), d("1")),
            PlanQuantity::Amount(d("0.33"))
        );
    }

    #[test]
    fn zero_reference_data_yields_sentinel_not_zero() {
        assert_eq!(
            plan_quantity(d("0"), d("1000"), d("200")),
            PlanQuantity::NotAvailable
        );
        assert_eq!(
            plan_quantity(d("50"), d("1000"), d("0")),
            PlanQuantity::NotAvailable
        );
        assert_eq!(
            plan_quantity(d("50"), d("0"), d("200")),
            PlanQuantity::NotAvailable
        );
    }

    #[test]
    fn sentinel_serializes_as_the_na_string() {
        let json = serde_json::to_string(&PlanQuantity::NotAvailable).expect("serialize");
        assert_eq!(json, "\"N/A\"");

        let json =
            serde_json::to_string(&plan_quantity(d("50"), d("1000"), d("200"))).expect("serialize");
        assert_eq!(json, "10.0");
    }
}
