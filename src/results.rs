use std::sync::Arc;

use chrono::NaiveDateTime;
use postgres::Row;
use serde_json::Value as JsonValue;

use crate::error::LifelineDbError;
use crate::types::SqlValue;

/// What a statement produced: fetched rows or a server-reported affected
/// count.
///
/// Which side comes back is decided by the statement text alone: text that
/// starts with `SELECT` (case-insensitive) or mentions `RETURNING` anywhere is
/// fetched, everything else yields the affected count.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome<R> {
    Rows(Vec<R>),
    Affected(u64),
}

impl<R> QueryOutcome<R> {
    /// The fetched rows, if this outcome carries any.
    #[must_use]
    pub fn rows(self) -> Option<Vec<R>> {
        match self {
            QueryOutcome::Rows(rows) => Some(rows),
            QueryOutcome::Affected(_) => None,
        }
    }

    /// The affected-row count, if this outcome carries one.
    #[must_use]
    pub fn affected(&self) -> Option<u64> {
        match self {
            QueryOutcome::Rows(_) => None,
            QueryOutcome::Affected(count) => Some(*count),
        }
    }
}

/// Outcome of [`insert`](crate::LifelineClient::insert).
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    /// First row produced by the `RETURNING` clause.
    Returned(Vec<SqlValue>),
    /// Affected-row count, when no `RETURNING` list was given.
    Affected(u64),
}

/// A row addressed by column name.
///
/// Column names are shared across all rows of one result set.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedRow {
    column_names: Arc<Vec<String>>,
    values: Vec<SqlValue>,
}

impl NamedRow {
    /// Get a value by column name, or `None` if the column is absent.
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&SqlValue> {
        let idx = self.column_names.iter().position(|col| col == column_name)?;
        self.values.get(idx)
    }

    /// Get a value by position, or `None` if the index is out of bounds.
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    #[must_use]
    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }
}

/// Extract one row positionally.
pub(crate) fn positional_row(row: &Row) -> Result<Vec<SqlValue>, LifelineDbError> {
    let mut values = Vec::with_capacity(row.columns().len());
    for idx in 0..row.columns().len() {
        values.push(extract_value(row, idx)?);
    }
    Ok(values)
}

/// Shape driver rows as [`NamedRow`]s, sharing one column-name list.
pub(crate) fn named_rows(rows: &[Row]) -> Result<Vec<NamedRow>, LifelineDbError> {
    let Some(first) = rows.first() else {
        return Ok(Vec::new());
    };
    let column_names: Arc<Vec<String>> = Arc::new(
        first
            .columns()
            .iter()
            .map(|col| col.name().to_string())
            .collect(),
    );

    let mut shaped = Vec::with_capacity(rows.len());
    for row in rows {
        shaped.push(NamedRow {
            column_names: Arc::clone(&column_names),
            values: positional_row(row)?,
        });
    }
    Ok(shaped)
}

/// Extract a [`SqlValue`] from a driver row at the given index, based on the
/// column's declared type. Unrecognized types fall back to text.
pub(crate) fn extract_value(row: &Row, idx: usize) -> Result<SqlValue, LifelineDbError> {
    let value = match row.columns()[idx].type_().name() {
        "int2" => {
            let val: Option<i16> = row.try_get(idx)?;
            val.map_or(SqlValue::Null, |v| SqlValue::Int(i64::from(v)))
        }
        "int4" => {
            let val: Option<i32> = row.try_get(idx)?;
            val.map_or(SqlValue::Null, |v| SqlValue::Int(i64::from(v)))
        }
        "int8" => {
            let val: Option<i64> = row.try_get(idx)?;
            val.map_or(SqlValue::Null, SqlValue::Int)
        }
        "float4" => {
            let val: Option<f32> = row.try_get(idx)?;
            val.map_or(SqlValue::Null, |v| SqlValue::Float(f64::from(v)))
        }
        "float8" => {
            let val: Option<f64> = row.try_get(idx)?;
            val.map_or(SqlValue::Null, SqlValue::Float)
        }
        "bool" => {
            let val: Option<bool> = row.try_get(idx)?;
            val.map_or(SqlValue::Null, SqlValue::Bool)
        }
        "timestamp" | "timestamptz" => {
            let val: Option<NaiveDateTime> = row.try_get(idx)?;
            val.map_or(SqlValue::Null, SqlValue::Timestamp)
        }
        "json" | "jsonb" => {
            let val: Option<JsonValue> = row.try_get(idx)?;
            val.map_or(SqlValue::Null, SqlValue::Json)
        }
        "bytea" => {
            let val: Option<Vec<u8>> = row.try_get(idx)?;
            val.map_or(SqlValue::Null, SqlValue::Blob)
        }
        _ => {
            // text, varchar, char, and anything else readable as a string
            let val: Option<String> = row.try_get(idx)?;
            val.map_or(SqlValue::Null, SqlValue::Text)
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_accessors() {
        let rows: QueryOutcome<Vec<SqlValue>> = QueryOutcome::Rows(vec![vec![SqlValue::Int(1)]]);
        assert_eq!(rows.affected(), None);
        assert_eq!(rows.rows().map(|r| r.len()), Some(1));

        let affected: QueryOutcome<Vec<SqlValue>> = QueryOutcome::Affected(3);
        assert_eq!(affected.affected(), Some(3));
        assert_eq!(affected.rows(), None);
    }

    #[test]
    fn named_row_lookup_by_name_and_index() {
        let row = NamedRow {
            column_names: Arc::new(vec!["id".to_string(), "name".to_string()]),
            values: vec![SqlValue::Int(1), SqlValue::Text("Ann".into())],
        };
        assert_eq!(row.get("id"), Some(&SqlValue::Int(1)));
        assert_eq!(row.get("name").and_then(|v| v.as_text()), Some("Ann"));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.get_by_index(1), Some(&SqlValue::Text("Ann".into())));
        assert_eq!(row.get_by_index(2), None);
    }
}
