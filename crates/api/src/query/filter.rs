//! Dynamic WHERE-clause construction from query-string filters.
//!
//! Search endpoints accept CSV lists, date ranges, and status tokens and
//! turn them into SQL. [`WhereBuilder`] accumulates conditions with `$n`
//! placeholders and owns the values to bind, so user input is only ever
//! bound, never spliced into the SQL text. The builder is applied to a
//! runtime sqlx query with [`WhereBuilder::bind_all`] (runtime queries, not
//! macros, to avoid the offline cache requirement - same convention as the
//! rest of the repositories).
//!
//! The CSV lists carry a sentinel token `NULL` meaning "match rows where
//! this column has no value". Which SQL shape that takes depends on the
//! column: batch and ingredient codes are nullable (`IS NULL`), while
//! production order numbers are non-null with empty-string gaps (`= ''`).

use chrono::{Duration, NaiveDate, NaiveDateTime};
use sqlx::Postgres;
use sqlx::postgres::PgArguments;
use sqlx::query::{Query, QueryAs, QueryScalar};

/// A value waiting to be bound to a query.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Timestamp(NaiveDateTime),
}

/// How a column expresses "no value" for the `NULL` sentinel token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullMatch {
    /// Nullable column: `col IS NULL`.
    SqlNull,
    /// Non-null column with empty-string gaps: `col = ''`.
    EmptyString,
}

/// Accumulates SQL conditions and their bound parameters.
#[derive(Debug, Default)]
pub struct WhereBuilder {
    conditions: Vec<String>,
    binds: Vec<BindValue>,
}

impl WhereBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of parameters bound so far. Callers appending their own
    /// placeholders (LIMIT/OFFSET) continue numbering from here.
    #[must_use]
    pub fn bind_count(&self) -> usize {
        self.binds.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Render the WHERE clause, or an empty string when no filters were
    /// supplied.
    #[must_use]
    pub fn clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// Render the conditions joined with AND, without the WHERE keyword,
    /// for queries that splice them into an existing clause.
    #[must_use]
    pub fn conditions(&self) -> String {
        self.conditions.join(" AND ")
    }

    fn placeholder(&mut self, value: BindValue) -> String {
        self.binds.push(value);
        format!("${}", self.binds.len())
    }

    /// Add a raw condition that binds nothing (e.g. `batch_code IS NOT
    /// NULL`). Never pass user input here.
    pub fn push_raw(&mut self, condition: impl Into<String>) -> &mut Self {
        self.conditions.push(condition.into());
        self
    }

    /// Reserve a placeholder for a text value and return it (`"$n"`),
    /// for callers composing a condition the stock helpers do not
    /// cover. The condition itself still goes through [`push_raw`].
    ///
    /// [`push_raw`]: WhereBuilder::push_raw
    pub fn text_placeholder(&mut self, value: impl Into<String>) -> String {
        self.placeholder(BindValue::Text(value.into()))
    }

    /// `col = $n` for a trimmed, non-empty value.
    pub fn equals(&mut self, column: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            let value = value.trim();
            if !value.is_empty() {
                let ph = self.placeholder(BindValue::Text(value.to_string()));
                self.conditions.push(format!("{column} = {ph}"));
            }
        }
        self
    }

    /// CSV IN-list with the `NULL` sentinel token.
    ///
    /// Each concrete value binds one parameter; the sentinel adds an OR
    /// branch matching the column's no-value convention and binds nothing.
    pub fn csv_in(&mut self, column: &str, raw: Option<&str>, null_match: NullMatch) -> &mut Self {
        let Some(raw) = raw else { return self };
        if raw.trim().is_empty() {
            return self;
        }

        let values: Vec<&str> = raw.split(',').map(str::trim).collect();
        let has_null = values.contains(&"NULL");
        let concrete: Vec<&str> = values
            .into_iter()
            .filter(|v| !v.is_empty() && *v != "NULL")
            .collect();

        let mut parts = Vec::new();
        if !concrete.is_empty() {
            let placeholders: Vec<String> = concrete
                .into_iter()
                .map(|v| self.placeholder(BindValue::Text(v.to_string())))
                .collect();
            parts.push(format!("{column} IN ({})", placeholders.join(",")));
        }
        if has_null {
            parts.push(match null_match {
                NullMatch::SqlNull => format!("{column} IS NULL"),
                NullMatch::EmptyString => format!("{column} = ''"),
            });
        }

        if !parts.is_empty() {
            self.conditions.push(format!("({})", parts.join(" OR ")));
        }
        self
    }

    /// One search term matched with ILIKE across several columns.
    pub fn like_any(&mut self, columns: &[&str], term: Option<&str>) -> &mut Self {
        let Some(term) = term else { return self };
        let term = term.trim();
        if term.is_empty() {
            return self;
        }

        let pattern = format!("%{term}%");
        let parts: Vec<String> = columns
            .iter()
            .map(|col| {
                let ph = self.placeholder(BindValue::Text(pattern.clone()));
                format!("{col} ILIKE {ph}")
            })
            .collect();
        self.conditions.push(format!("({})", parts.join(" OR ")));
        self
    }

    /// Inclusive datetime range on `column` from `fromDate`/`toDate`
    /// query values.
    ///
    /// Date-only input (`YYYY-MM-DD`) expands to start-of-day for the lower
    /// bound and `23:59:59.999` for the upper. Malformed input drops that
    /// bound silently - partial search input should narrow results, not
    /// error out.
    pub fn date_range(&mut self, column: &str, from: Option<&str>, to: Option<&str>) -> &mut Self {
        let from = from.and_then(|s| parse_boundary(s, Boundary::Start));
        let to = to.and_then(|s| parse_boundary(s, Boundary::End));

        match (from, to) {
            (Some(from), Some(to)) => {
                let ph_from = self.placeholder(BindValue::Timestamp(from));
                let ph_to = self.placeholder(BindValue::Timestamp(to));
                self.conditions
                    .push(format!("{column} BETWEEN {ph_from} AND {ph_to}"));
            }
            (Some(from), None) => {
                let ph = self.placeholder(BindValue::Timestamp(from));
                self.conditions.push(format!("{column} >= {ph}"));
            }
            (None, Some(to)) => {
                let ph = self.placeholder(BindValue::Timestamp(to));
                self.conditions.push(format!("{column} <= {ph}"));
            }
            (None, None) => {}
        }
        self
    }

    /// Half-open planning window: `column >= from` and `column < to + 1
    /// day`, each bound independent. Used for the planned-start filters,
    /// which compare against day boundaries so the index stays usable.
    pub fn date_window(&mut self, column: &str, from: Option<&str>, to: Option<&str>) -> &mut Self {
        if let Some(from) = from.and_then(|s| parse_boundary(s, Boundary::Start)) {
            let ph = self.placeholder(BindValue::Timestamp(from));
            self.conditions.push(format!("{column} >= {ph}"));
        }
        if let Some(to) = to.and_then(|s| parse_boundary(s, Boundary::Start)) {
            let ph = self.placeholder(BindValue::Timestamp(to + Duration::days(1)));
            self.conditions.push(format!("{column} < {ph}"));
        }
        self
    }

    /// Two-valued outcome filter on the `respone` column.
    ///
    /// Deliberately asymmetric: `Success` means exactly the `Success`
    /// value, while `Failed` means anything else including NULL. Selecting
    /// both (or neither) filters nothing.
    pub fn outcome(&mut self, column: &str, raw: Option<&str>) -> &mut Self {
        let Some(raw) = raw else { return self };
        if raw.trim().is_empty() {
            return self;
        }

        let values: Vec<&str> = raw.split(',').map(str::trim).collect();
        let has_success = values.contains(&"Success");
        let has_failed = values.contains(&"Failed");

        if has_success && !has_failed {
            let ph = self.placeholder(BindValue::Text("Success".to_string()));
            self.conditions.push(format!("{column} = {ph}"));
        } else if has_failed && !has_success {
            self.conditions
                .push(format!("({column} <> 'Success' OR {column} IS NULL)"));
        }
        self
    }

    /// Bind the accumulated values, in placeholder order, onto a
    /// `query_as` query.
    #[must_use]
    pub fn bind_all<'q, O>(
        &self,
        mut query: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        for bind in &self.binds {
            query = match bind {
                BindValue::Text(s) => query.bind(s.clone()),
                BindValue::Timestamp(t) => query.bind(*t),
            };
        }
        query
    }

    /// Bind the accumulated values onto a `query_scalar` query.
    #[must_use]
    pub fn bind_scalar<'q, O>(
        &self,
        mut query: QueryScalar<'q, Postgres, O, PgArguments>,
    ) -> QueryScalar<'q, Postgres, O, PgArguments> {
        for bind in &self.binds {
            query = match bind {
                BindValue::Text(s) => query.bind(s.clone()),
                BindValue::Timestamp(t) => query.bind(*t),
            };
        }
        query
    }

    /// Bind the accumulated values onto a plain `query`.
    #[must_use]
    pub fn bind_query<'q>(
        &self,
        mut query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments> {
        for bind in &self.binds {
            query = match bind {
                BindValue::Text(s) => query.bind(s.clone()),
                BindValue::Timestamp(t) => query.bind(*t),
            };
        }
        query
    }

    #[cfg(test)]
    fn binds(&self) -> &[BindValue] {
        &self.binds
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Boundary {
    Start,
    End,
}

/// Parse a date or datetime boundary. Returns `None` for malformed input.
fn parse_boundary(raw: &str, boundary: Boundary) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return match boundary {
            Boundary::Start => date.and_hms_opt(0, 0, 0),
            Boundary::End => date.and_hms_milli_opt(23, 59, 59, 999),
        };
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    None
}
