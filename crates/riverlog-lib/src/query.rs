//! Parameterized filtered-query construction and pagination.
//!
//! Every list endpoint builds its SELECTs here: filters accumulate as an
//! ordered predicate list with placeholder-bound values, and the count and
//! page statements are rendered from the same list so pagination totals can
//! never drift from page contents.
use serde::Serialize;
use sqlx::query::{Query, QueryAs, QueryScalar};
use sqlx::sqlite::{Sqlite, SqliteArguments};

/// Page size applied when the caller omits a limit.
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// A value bound into a statement. Values only ever travel as placeholders;
/// the SQL text itself is assembled from code-supplied column names.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Int(i64),
    Real(f64),
    Null,
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        SqlParam::Text(value.to_owned())
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        SqlParam::Text(value)
    }
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        SqlParam::Int(value)
    }
}

impl From<f64> for SqlParam {
    fn from(value: f64) -> Self {
        SqlParam::Real(value)
    }
}

impl From<chrono::DateTime<chrono::Utc>> for SqlParam {
    fn from(value: chrono::DateTime<chrono::Utc>) -> Self {
        SqlParam::Text(value.to_rfc3339())
    }
}

impl From<chrono::NaiveDate> for SqlParam {
    fn from(value: chrono::NaiveDate) -> Self {
        SqlParam::Text(value.format("%Y-%m-%d").to_string())
    }
}

/// Ordered conjunction of filter predicates.
///
/// Column identifiers are code-supplied literals at every call site; only
/// values pass through parameters.
#[derive(Debug, Default, Clone)]
pub struct FilterSet {
    clauses: Vec<String>,
    params: Vec<SqlParam>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// `column = ?`
    pub fn eq(&mut self, column: &str, value: impl Into<SqlParam>) {
        self.clauses.push(format!("{column} = ?"));
        self.params.push(value.into());
    }

    /// Case-insensitive substring match: `LOWER(column) LIKE ?`
    pub fn contains_nocase(&mut self, column: &str, needle: &str) {
        self.clauses.push(format!("LOWER({column}) LIKE ?"));
        self.params.push(SqlParam::Text(like_pattern(needle)));
    }

    /// Case-insensitive substring match across several columns, OR-joined.
    pub fn any_contains_nocase(&mut self, columns: &[&str], needle: &str) {
        let parts: Vec<String> = columns
            .iter()
            .map(|column| format!("LOWER({column}) LIKE ?"))
            .collect();
        self.clauses.push(format!("({})", parts.join(" OR ")));
        for _ in columns {
            self.params.push(SqlParam::Text(like_pattern(needle)));
        }
    }

    fn where_clause(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }
}

fn like_pattern(needle: &str) -> String {
    format!("%{}%", needle.to_lowercase())
}

/// Allowlisted sort keys for one listing. Unknown or absent keys resolve to
/// the fixed default order rather than failing.
pub struct SortSpec {
    pub allowed: &'static [(&'static str, &'static str)],
    pub default_order: &'static str,
}

impl SortSpec {
    pub fn resolve(&self, requested: Option<&str>) -> &'static str {
        requested
            .and_then(|key| self.allowed.iter().find(|(name, _)| *name == key))
            .map(|(_, order)| *order)
            .unwrap_or(self.default_order)
    }
}

/// Limit/offset pair with defaults applied lazily.
#[derive(Debug, Clone, Copy, Default)]
pub struct Page {
    limit: Option<i64>,
    offset: Option<i64>,
}

impl Page {
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self { limit, offset }
    }

    pub fn limit(&self) -> i64 {
        match self.limit {
            Some(limit) if limit > 0 => limit,
            _ => DEFAULT_PAGE_SIZE,
        }
    }

    pub fn offset(&self) -> i64 {
        match self.offset {
            Some(offset) if offset >= 0 => offset,
            _ => 0,
        }
    }
}

/// A rendered listing: count and page statements sharing one WHERE clause and
/// parameter list. The page statement appends `ORDER BY … LIMIT ? OFFSET ?`;
/// limit and offset are bound after `params`.
#[derive(Debug)]
pub struct ListQuery {
    pub count_sql: String,
    pub page_sql: String,
    pub params: Vec<SqlParam>,
    pub limit: i64,
    pub offset: i64,
}

/// Render a filtered listing from a shared filter set.
///
/// `select_from` and `count_from` are the statement heads up to (but not
/// including) WHERE, e.g. `"SELECT … FROM rivers"` and
/// `"SELECT COUNT(*) FROM rivers"`.
pub fn build_list_query(
    select_from: &str,
    count_from: &str,
    filters: &FilterSet,
    order_by: &str,
    page: Page,
) -> ListQuery {
    let where_clause = filters.where_clause();
    ListQuery {
        count_sql: format!("{count_from}{where_clause}"),
        page_sql: format!("{select_from}{where_clause} ORDER BY {order_by} LIMIT ? OFFSET ?"),
        params: filters.params.clone(),
        limit: page.limit(),
        offset: page.offset(),
    }
}

macro_rules! bind_param {
    ($query:expr, $param:expr) => {
        match $param {
            SqlParam::Text(v) => $query.bind(v.clone()),
            SqlParam::Int(v) => $query.bind(*v),
            SqlParam::Real(v) => $query.bind(*v),
            SqlParam::Null => $query.bind(Option::<String>::None),
        }
    };
}

/// Bind an ordered parameter list onto a statement.
pub fn bind_params<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    params: &[SqlParam],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for param in params {
        query = bind_param!(query, param);
    }
    query
}

/// Bind an ordered parameter list onto a typed row query.
pub fn bind_params_as<'q, O>(
    mut query: QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
    params: &[SqlParam],
) -> QueryAs<'q, Sqlite, O, SqliteArguments<'q>> {
    for param in params {
        query = bind_param!(query, param);
    }
    query
}

/// Bind an ordered parameter list onto a scalar query.
pub fn bind_params_scalar<'q, O>(
    mut query: QueryScalar<'q, Sqlite, O, SqliteArguments<'q>>,
    params: &[SqlParam],
) -> QueryScalar<'q, Sqlite, O, SqliteArguments<'q>> {
    for param in params {
        query = bind_param!(query, param);
    }
    query
}

/// Standard list-response shape: the page plus pagination metadata, with
/// `total` counted over the unpaged filter predicate.
#[derive(Debug, Serialize)]
pub struct PageEnvelope<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SORT: SortSpec = SortSpec {
        allowed: &[("name", "name ASC"), ("state", "state ASC, name ASC")],
        default_order: "name ASC",
    };

    #[test]
    fn test_count_and_page_share_where_clause() {
        let mut filters = FilterSet::new();
        filters.eq("state", "CO");
        filters.contains_nocase("name", "Ark");

        let query = build_list_query(
            "SELECT id, name, state FROM rivers",
            "SELECT COUNT(*) FROM rivers",
            &filters,
            "name ASC",
            Page::default(),
        );

        let expected_where = " WHERE state = ? AND LOWER(name) LIKE ?";
        assert_eq!(
            query.count_sql,
            format!("SELECT COUNT(*) FROM rivers{expected_where}")
        );
        assert_eq!(
            query.page_sql,
            format!("SELECT id, name, state FROM rivers{expected_where} ORDER BY name ASC LIMIT ? OFFSET ?")
        );
        assert_eq!(
            query.params,
            vec![
                SqlParam::Text("CO".to_string()),
                SqlParam::Text("%ark%".to_string()),
            ]
        );
    }

    #[test]
    fn test_values_never_appear_in_sql_text() {
        let mut filters = FilterSet::new();
        filters.eq("state", "CO'; DROP TABLE rivers; --");

        let query = build_list_query(
            "SELECT id FROM rivers",
            "SELECT COUNT(*) FROM rivers",
            &filters,
            "name ASC",
            Page::default(),
        );

        assert!(!query.count_sql.contains("DROP TABLE"));
        assert!(!query.page_sql.contains("DROP TABLE"));
        assert_eq!(query.params.len(), 1);
    }

    #[test]
    fn test_empty_filters_render_no_where() {
        let query = build_list_query(
            "SELECT id FROM rivers",
            "SELECT COUNT(*) FROM rivers",
            &FilterSet::new(),
            "name ASC",
            Page::default(),
        );
        assert_eq!(query.count_sql, "SELECT COUNT(*) FROM rivers");
        assert_eq!(
            query.page_sql,
            "SELECT id FROM rivers ORDER BY name ASC LIMIT ? OFFSET ?"
        );
        assert!(query.params.is_empty());
    }

    #[test]
    fn test_any_contains_binds_needle_per_column() {
        let mut filters = FilterSet::new();
        filters.any_contains_nocase(&["s.name", "r.name"], "Gore");

        let query = build_list_query(
            "SELECT s.id FROM sections s",
            "SELECT COUNT(*) FROM sections s",
            &filters,
            "s.name ASC",
            Page::default(),
        );

        assert!(query
            .count_sql
            .contains("(LOWER(s.name) LIKE ? OR LOWER(r.name) LIKE ?)"));
        assert_eq!(
            query.params,
            vec![
                SqlParam::Text("%gore%".to_string()),
                SqlParam::Text("%gore%".to_string()),
            ]
        );
    }

    #[test]
    fn test_page_defaults() {
        assert_eq!(Page::default().limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(Page::default().offset(), 0);
        assert_eq!(Page::new(Some(0), None).limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(Page::new(Some(-5), Some(-1)).limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(Page::new(Some(-5), Some(-1)).offset(), 0);
        assert_eq!(Page::new(Some(10), Some(30)).limit(), 10);
        assert_eq!(Page::new(Some(10), Some(30)).offset(), 30);
    }

    #[test]
    fn test_unknown_sort_key_falls_back_to_default() {
        assert_eq!(SORT.resolve(Some("state")), "state ASC, name ASC");
        assert_eq!(SORT.resolve(Some("id; DROP TABLE rivers")), "name ASC");
        assert_eq!(SORT.resolve(Some("unknown")), "name ASC");
        assert_eq!(SORT.resolve(None), "name ASC");
    }
}
