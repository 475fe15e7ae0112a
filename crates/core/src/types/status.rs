//! Status enums for MES entities.
//!
//! Most of these mirror free-text columns in the upstream database, so every
//! enum keeps explicit `as_str`/parse helpers matching the wire values the
//! upstream system writes.

use serde::{Deserialize, Serialize};

/// Derived production order status.
///
/// Status is not a stored lifecycle field: an order counts as running as
/// soon as any material-consumption row references its order number. Only
/// the completed state (code 2) comes from the stored column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// No consumption recorded yet (code 0).
    #[default]
    Pending,
    /// At least one consumption row exists (code 1).
    Running,
    /// Stored status says the order finished (code 2).
    Completed,
}

impl OrderStatus {
    /// Numeric code as served in API responses.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Pending => 0,
            Self::Running => 1,
            Self::Completed => 2,
        }
    }

    /// Parse a stored/derived status code. Unknown codes fall back to pending.
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            1 => Self::Running,
            2 => Self::Completed,
            _ => Self::Pending,
        }
    }

    /// Parse a filter token (`pending`/`running`/`completed`, case-insensitive).
    #[must_use]
    pub fn from_param(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Recipe lifecycle status.
///
/// The upstream column is free text; anything that is not exactly `Active`
/// (including NULL) is treated as inactive by the search filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipeStatus {
    Active,
    Inactive,
}

impl RecipeStatus {
    /// Parse a filter token (`active`/`inactive`, case-insensitive).
    #[must_use]
    pub fn from_param(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

/// Product master item status.
///
/// Stored uppercase; a NULL status counts as inactive when filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ItemStatus {
    Active,
    Inactive,
}

impl ItemStatus {
    /// Stored column value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
        }
    }

    /// Parse a filter token (case-insensitive).
    #[must_use]
    pub fn from_param(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Some(Self::Active),
            "INACTIVE" => Some(Self::Inactive),
            _ => None,
        }
    }
}

/// Outcome of a material-consumption event.
///
/// The upstream column is spelled `respone` (sic) and holds `Success`, an
/// arbitrary failure value, or NULL. Anything non-`Success` (NULL included)
/// counts as failed for filtering purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Success,
    Failed,
}

impl Outcome {
    /// Classify a raw `respone` value.
    #[must_use]
    pub fn classify(raw: Option<&str>) -> Self {
        match raw {
            Some("Success") => Self::Success,
            _ => Self::Failed,
        }
    }

    /// Wire value used in API responses and filters.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Failed => "Failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_status_codes_round_trip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Running,
            OrderStatus::Completed,
        ] {
            assert_eq!(OrderStatus::from_code(status.code()), status);
        }
        assert_eq!(OrderStatus::from_code(99), OrderStatus::Pending);
    }

    #[test]
    fn order_status_parses_filter_tokens() {
        assert_eq!(
            OrderStatus::from_param(" Running "),
            Some(OrderStatus::Running)
        );
        assert_eq!(
            OrderStatus::from_param("PENDING"),
            Some(OrderStatus::Pending)
        );
        assert_eq!(OrderStatus::from_param("cancelled"), None);
    }

    #[test]
    fn recipe_status_parses_filter_tokens() {
        assert_eq!(
            RecipeStatus::from_param(" Active "),
            Some(RecipeStatus::Active)
        );
        assert_eq!(
            RecipeStatus::from_param("INACTIVE"),
            Some(RecipeStatus::Inactive)
        );
        assert_eq!(RecipeStatus::from_param("draft"), None);
    }

    #[test]
    fn item_status_parses_and_prints_uppercase() {
        assert_eq!(ItemStatus::from_param("active"), Some(ItemStatus::Active));
        assert_eq!(ItemStatus::Inactive.as_str(), "INACTIVE");
    }

    #[test]
    fn null_outcome_counts_as_failed() {
        assert_eq!(Outcome::classify(None), Outcome::Failed);
        assert_eq!(Outcome::classify(Some("Timeout")), Outcome::Failed);
        assert_eq!(Outcome::classify(Some("Success")), Outcome::Success);
    }
}
