//! Sparse UPDATE construction for partial-update requests.
//!
//! A request field that is absent leaves the column untouched; a field that is
//! explicitly `null` clears it. The two are kept distinguishable in DTOs with
//! `Option<Option<T>>` plus [`double_option`].
use serde::{Deserialize, Deserializer};

use crate::query::SqlParam;

/// Accumulates `column = ?` assignments for one UPDATE statement.
#[derive(Debug, Default)]
pub struct UpdateSet {
    assignments: Vec<String>,
    params: Vec<SqlParam>,
}

impl UpdateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Assign a column to a value.
    pub fn set(&mut self, column: &str, value: impl Into<SqlParam>) {
        self.assignments.push(format!("{column} = ?"));
        self.params.push(value.into());
    }

    /// Assign a nullable column; `None` binds SQL NULL.
    pub fn set_nullable(&mut self, column: &str, value: Option<SqlParam>) {
        self.assignments.push(format!("{column} = ?"));
        self.params.push(value.unwrap_or(SqlParam::Null));
    }

    /// Render the UPDATE statement.
    ///
    /// Every key predicate lands in the WHERE clause; for owned resources the
    /// caller passes both the row id and the owner id, so a row the caller
    /// does not own is unreachable by construction.
    pub fn build(self, table: &str, keys: &[(&str, i64)]) -> (String, Vec<SqlParam>) {
        let set_clause = self.assignments.join(", ");
        let where_clause = keys
            .iter()
            .map(|(column, _)| format!("{column} = ?"))
            .collect::<Vec<_>>()
            .join(" AND ");

        let mut params = self.params;
        params.extend(keys.iter().map(|(_, value)| SqlParam::Int(*value)));

        (
            format!("UPDATE {table} SET {set_clause} WHERE {where_clause}"),
            params,
        )
    }
}

/// Deserializer distinguishing an absent field from an explicit `null`.
///
/// Use with `#[serde(default, deserialize_with = "double_option")]`: the
/// outer `Option` is `None` when the field is missing, `Some(None)` when the
/// field is present as `null`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
