//! Grouping and aggregation of material-consumption rows.
//!
//! The consumption grid for a production order is a flat list of rows, one
//! per ingredient-draw event (plus placeholder rows for recipe ingredients
//! that have not been drawn yet). The dashboard displays them grouped per
//! ingredient with summed quantities and an aggregate outcome.
//!
//! The pipeline runs in three named stages, in this exact order:
//!
//! 1. [`filter_rows`] - drop rows not matching the consumed/unconsumed
//!    filter (counts are taken from this stage);
//! 2. [`group_rows`] - group by ingredient code, deduplicating members by
//!    `(id, batch_code)`;
//! 3. [`prune_groups`] - re-apply the filter to each group's member list.
//!
//! Stage 3 looks redundant after stage 1 but the order is load-bearing:
//! totals and counts must come from the pre-group filter while the member
//! arrays must match the post-group prune, exactly as the dashboard has
//! always displayed them.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ConsumptionId, Outcome};

/// How many distinct batch codes to show before eliding.
const BATCH_DISPLAY_LIMIT: usize = 3;

/// One row of the consumption grid.
///
/// `id` is `None` for placeholder rows: a recipe ingredient crossed with a
/// batch that has no recorded draw yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionRow {
    pub id: Option<ConsumptionId>,
    pub batch_code: Option<String>,
    pub ingredient_code: String,
    #[serde(default)]
    pub lot: Option<String>,
    pub quantity: Option<Decimal>,
    pub datetime: Option<NaiveDateTime>,
    /// Raw outcome value, upstream column name `respone` (sic).
    pub respone: Option<String>,
}

impl ConsumptionRow {
    /// A row counts as consumed when a draw event exists for it.
    #[must_use]
    pub const fn is_consumed(&self) -> bool {
        self.id.is_some()
    }
}

/// Consumed/unconsumed filter applied by the dashboard tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsumedFilter {
    #[default]
    All,
    Consumed,
    Unconsumed,
}

impl ConsumedFilter {
    #[must_use]
    pub const fn matches(self, row: &ConsumptionRow) -> bool {
        match self {
            Self::All => true,
            Self::Consumed => row.is_consumed(),
            Self::Unconsumed => !row.is_consumed(),
        }
    }
}

/// Aggregated view of one ingredient across the visible batches.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientGroup {
    pub ingredient_code: String,
    /// Sum of member quantities (missing quantities count as zero).
    pub total_quantity: Decimal,
    /// Draw-event ids of the members, in encounter order.
    pub ids: Vec<ConsumptionId>,
    /// Deduplicated member rows.
    pub items: Vec<ConsumptionRow>,
    /// Aggregate outcome: `Success` iff every member is Success, `Failed`
    /// iff every member is non-null non-Success, `None` when mixed.
    pub respone: Option<Outcome>,
    /// Datetime of the last member encountered during iteration, not the
    /// chronological max. Kept bug-for-bug with the upstream dashboard.
    pub latest_datetime: Option<NaiveDateTime>,
}

impl IngredientGroup {
    fn new(ingredient_code: String) -> Self {
        Self {
            ingredient_code,
            total_quantity: Decimal::ZERO,
            ids: Vec::new(),
            items: Vec::new(),
            respone: None,
            latest_datetime: None,
        }
    }

    /// Distinct batch codes for display, elided with "..." past the first
    /// three.
    #[must_use]
    pub fn batch_display(&self) -> String {
        let mut seen: Vec<&str> = Vec::new();
        let mut elided = false;
        for item in &self.items {
            let Some(code) = item.batch_code.as_deref() else {
                continue;
            };
            if seen.contains(&code) {
                continue;
            }
            if seen.len() == BATCH_DISPLAY_LIMIT {
                elided = true;
                break;
            }
            seen.push(code);
        }
        let mut out = seen.join(", ");
        if elided {
            out.push_str(", ...");
        }
        out
    }
}

/// Stage 1: filter the flat list.
#[must_use]
pub fn filter_rows(rows: Vec<ConsumptionRow>, filter: ConsumedFilter) -> Vec<ConsumptionRow> {
    rows.into_iter().filter(|r| filter.matches(r)).collect()
}

/// Stage 2: group by ingredient code, deduplicating by `(id, batch_code)`.
///
/// Groups come out in first-encounter order of their ingredient code, and a
/// group never has zero members.
#[must_use]
pub fn group_rows(rows: Vec<ConsumptionRow>) -> Vec<IngredientGroup> {
    let mut groups: Vec<IngredientGroup> = Vec::new();

    for row in rows {
        let idx = match groups
            .iter()
            .position(|g| g.ingredient_code == row.ingredient_code)
        {
            Some(idx) => idx,
            None => {
                groups.push(IngredientGroup::new(row.ingredient_code.clone()));
                groups.len() - 1
            }
        };
        let group = &mut groups[idx];

        let duplicate = group
            .items
            .iter()
            .any(|item| item.id == row.id && item.batch_code == row.batch_code);
        if duplicate {
            continue;
        }

        group.total_quantity += row.quantity.unwrap_or(Decimal::ZERO);
        if let Some(id) = row.id {
            group.ids.push(id);
        }
        // Last row encountered wins, whatever its timestamp.
        group.latest_datetime = row.datetime;
        group.items.push(row);
    }

    for group in &mut groups {
        group.respone = aggregate_outcome(&group.items);
    }
    groups
}

/// Stage 3: re-apply the filter inside each group's member list.
#[must_use]
pub fn prune_groups(
    mut groups: Vec<IngredientGroup>,
    filter: ConsumedFilter,
) -> Vec<IngredientGroup> {
    for group in &mut groups {
        group.items.retain(|item| filter.matches(item));
        group
            .ids
            .retain(|id| group.items.iter().any(|item| item.id == Some(*id)));
    }
    groups
}

/// Full pipeline: filter, group, prune.
#[must_use]
pub fn group_by_ingredient(
    rows: Vec<ConsumptionRow>,
    filter: ConsumedFilter,
) -> Vec<IngredientGroup> {
    prune_groups(group_rows(filter_rows(rows, filter)), filter)
}

/// Three-way aggregate outcome over a group's members.
fn aggregate_outcome(items: &[ConsumptionRow]) -> Option<Outcome> {
    if items.is_empty() {
        return None;
    }
    if items.iter().all(|i| i.respone.as_deref() == Some("Success")) {
        return Some(Outcome::Success);
    }
    let all_failed = items
        .iter()
        .all(|i| matches!(i.respone.as_deref(), Some(r) if r != "Success"));
    if all_failed {
        return Some(Outcome::Failed);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .expect("valid date")
            .and_hms_opt(hour, 0, 0)
            .expect("valid time")
    }

    fn row(
        id: Option<i32>,
        batch: Option<&str>,
        ingredient: &str,
        qty: &str,
        respone: Option<&str>,
    ) -> ConsumptionRow {
        ConsumptionRow {
            id: id.map(ConsumptionId::new),
            batch_code: batch.map(String::from),
            ingredient_code: ingredient.to_string(),
            lot: None,
            quantity: Some(qty.parse().expect("decimal")),
            datetime: None,
            respone: respone.map(String::from),
        }
    }

    #[test]
    fn groups_key_on_ingredient_only() {
        let rows = vec![
            row(Some(1), Some("1"), "ING-A", "10", Some("Success")),
            row(Some(2), Some("2"), "ING-A", "5", Some("Success")),
            row(Some(3), Some("1"), "ING-B", "2", Some("Success")),
        ];
        let groups = group_by_ingredient(rows, ConsumedFilter::All);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].ingredient_code, "ING-A");
        assert_eq!(groups[0].items.len(), 2);
        assert_eq!(groups[0].total_quantity, Decimal::from(15));
    }

    #[test]
    fn duplicate_id_batch_pairs_are_suppressed() {
        let rows = vec![
            row(Some(1), Some("1"), "ING-A", "10", Some("Success")),
            row(Some(1), Some("1"), "ING-A", "10", Some("Success")),
            row(Some(1), Some("2"), "ING-A", "4", Some("Success")),
        ];
        let groups = group_by_ingredient(rows, ConsumedFilter::All);
        assert_eq!(groups[0].items.len(), 2);
        assert_eq!(groups[0].total_quantity, Decimal::from(14));
    }

    #[test]
    fn totals_are_conserved_across_groups() {
        let rows = vec![
            row(Some(1), Some("1"), "ING-A", "10.5", Some("Success")),
            row(Some(2), Some("1"), "ING-B", "0.25", None),
            row(Some(3), Some("2"), "ING-B", "1.25", Some("Failed")),
            row(None, Some("3"), "ING-C", "0", None),
        ];
        let flat_total: Decimal = rows
            .iter()
            .map(|r| r.quantity.unwrap_or(Decimal::ZERO))
            .sum();
        let groups = group_by_ingredient(rows, ConsumedFilter::All);
        let grouped_total: Decimal = groups.iter().map(|g| g.total_quantity).sum();
        assert_eq!(grouped_total, flat_total);
    }

    #[test]
    fn all_success_members_aggregate_to_success() {
        let rows = vec![
            row(Some(1), Some("1"), "ING-A", "1", Some("Success")),
            row(Some(2), Some("2"), "ING-A", "1", Some("Success")),
        ];
        let groups = group_by_ingredient(rows, ConsumedFilter::All);
        assert_eq!(groups[0].respone, Some(Outcome::Success));
    }

    #[test]
    fn all_non_null_failures_aggregate_to_failed() {
        let rows = vec![
            row(Some(1), Some("1"), "ING-A", "1", Some("Timeout")),
            row(Some(2), Some("2"), "ING-A", "1", Some("Underweight")),
        ];
        let groups = group_by_ingredient(rows, ConsumedFilter::All);
        assert_eq!(groups[0].respone, Some(Outcome::Failed));
    }

    #[test]
    fn mixed_or_null_outcomes_stay_ambiguous() {
        let mixed = vec![
            row(Some(1), Some("1"), "ING-A", "1", Some("Success")),
            row(Some(2), Some("2"), "ING-A", "1", Some("Timeout")),
        ];
        assert_eq!(
            group_by_ingredient(mixed, ConsumedFilter::All)[0].respone,
            None
        );

        // A NULL outcome blocks the all-failed verdict too.
        let with_null = vec![
            row(Some(1), Some("1"), "ING-A", "1", Some("Timeout")),
            row(Some(2), Some("2"), "ING-A", "1", None),
        ];
        assert_eq!(
            group_by_ingredient(with_null, ConsumedFilter::All)[0].respone,
            None
        );
    }

    #[test]
    fn latest_datetime_is_last_encountered_not_max() {
        let mut first = row(Some(1), Some("1"), "ING-A", "1", Some("Success"));
        first.datetime = Some(dt(20, 8));
        let mut second = row(Some(2), Some("2"), "ING-A", "1", Some("Success"));
        second.datetime = Some(dt(5, 8)); // chronologically earlier

        let groups = group_by_ingredient(vec![first, second], ConsumedFilter::All);
        assert_eq!(groups[0].latest_datetime, Some(dt(5, 8)));
    }

    #[test]
    fn unconsumed_filter_runs_before_grouping() {
        let rows = vec![
            row(Some(1), Some("1"), "ING-A", "10", Some("Success")),
            row(None, Some("2"), "ING-A", "0", None),
            row(None, Some("1"), "ING-B", "0", None),
        ];
        let groups = group_by_ingredient(rows, ConsumedFilter::Unconsumed);
        // The consumed ING-A row must not contribute to the group total.
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].ingredient_code, "ING-A");
        assert_eq!(groups[0].total_quantity, Decimal::ZERO);
        assert!(groups[0].ids.is_empty());
    }

    #[test]
    fn prune_keeps_ids_in_sync_with_items() {
        let rows = vec![
            row(Some(1), Some("1"), "ING-A", "10", Some("Success")),
            row(None, Some("2"), "ING-A", "0", None),
        ];
        let filtered = filter_rows(rows, ConsumedFilter::Consumed);
        let groups = prune_groups(group_rows(filtered), ConsumedFilter::Consumed);
        assert_eq!(groups[0].items.len(), 1);
        assert_eq!(groups[0].ids, vec![ConsumptionId::new(1)]);
    }

    #[test]
    fn batch_display_elides_past_three_codes() {
        let rows = vec![
            row(Some(1), Some("1"), "ING-A", "1", Some("Success")),
            row(Some(2), Some("2"), "ING-A", "1", Some("Success")),
            row(Some(3), Some("2"), "ING-A", "1", Some("Success")),
            row(Some(4), Some("3"), "ING-A", "1", Some("Success")),
            row(Some(5), Some("4"), "ING-A", "1", Some("Success")),
        ];
        let groups = group_by_ingredient(rows, ConsumedFilter::All);
        assert_eq!(groups[0].batch_display(), "1, 2, 3, ...");

        let short = group_by_ingredient(
            vec![row(Some(1), Some("7"), "ING-B", "1", Some("Success"))],
            ConsumedFilter::All,
        );
        assert_eq!(short[0].batch_display(), "7");
    }
}
