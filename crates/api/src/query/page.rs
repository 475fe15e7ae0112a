//! Page/limit parsing and clamping.

/// Default page size for search endpoints.
pub const DEFAULT_LIMIT: i64 = 20;

/// Default page size for list-all endpoints.
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// Hard upper bound on page size, guarding against unbounded result sets.
pub const MAX_LIMIT: i64 = 100;

/// Parsed pagination parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    /// Parse raw `page`/`limit` query values.
    ///
    /// Missing or non-numeric input falls back to page 1 and
    /// `default_limit`; the limit is always clamped to `[1, 100]`.
    #[must_use]
    pub fn from_params(page: Option<&str>, limit: Option<&str>, default_limit: i64) -> Self {
        let page = parse_positive(page).unwrap_or(1).max(1);
        let limit = parse_positive(limit)
            .unwrap_or(default_limit)
            .clamp(1, MAX_LIMIT);
        Self { page, limit }
    }

    /// Rows to skip: `(page - 1) * limit`.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    /// Total page count for a result set of `total` rows.
    #[must_use]
    pub const fn total_pages(&self, total: i64) -> i64 {
        if total > 0 {
            // limit is validated >= 1, so this rounds up without overflow
            // on any realistic row count.
            (total + self.limit - 1) / self.limit
        } else {
            0
        }
    }
}

fn parse_positive(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_uses_defaults() {
        let page = Pagination::from_params(None, None, DEFAULT_LIMIT);
        assert_eq!(page, Pagination { page: 1, limit: 20 });
        assert_eq!(page.offset(), 0);

        let list = Pagination::from_params(None, None, DEFAULT_LIST_LIMIT);
        assert_eq!(list.limit, 100);
    }

    #[test]
    fn non_numeric_input_uses_defaults() {
        let page = Pagination::from_params(Some("abc"), Some(""), DEFAULT_LIMIT);
        assert_eq!(page, Pagination { page: 1, limit: 20 });
    }

    #[test]
    fn limit_is_clamped_to_bounds() {
        assert_eq!(
            Pagination::from_params(Some("1"), Some("5000"), DEFAULT_LIMIT).limit,
            100
        );
        assert_eq!(
            Pagination::from_params(Some("1"), Some("0"), DEFAULT_LIMIT).limit,
            1
        );
        assert_eq!(
            Pagination::from_params(Some("1"), Some("-3"), DEFAULT_LIMIT).limit,
            1
        );
    }

    #[test]
    fn page_floors_at_one() {
        assert_eq!(
            Pagination::from_params(Some("0"), None, DEFAULT_LIMIT).page,
            1
        );
        assert_eq!(
            Pagination::from_params(Some("-2"), None, DEFAULT_LIMIT).page,
            1
        );
    }

    #[test]
    fn offset_is_page_minus_one_times_limit() {
        let page = Pagination::from_params(Some("3"), Some("25"), DEFAULT_LIMIT);
        assert_eq!(page.offset(), 50);
    }

    #[test]
    fn total_pages_rounds_up_and_zero_total_is_zero_pages() {
        let page = Pagination::from_params(Some("1"), Some("20"), DEFAULT_LIMIT);
        assert_eq!(page.total_pages(0), 0);
        assert_eq!(page.total_pages(20), 1);
        assert_eq!(page.total_pages(21), 2);
    }
}
