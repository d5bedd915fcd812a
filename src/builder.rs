use std::fmt::Write as _;

use crate::client::LifelineClient;
use crate::error::LifelineDbError;
use crate::results::{InsertOutcome, QueryOutcome};
use crate::types::SqlValue;

/// Fixed tag pair standing in for string-literal quoting in generated
/// INSERTs. Dollar-quoting, not standard single-quote escaping.
const INSERT_QUOTE_TAG: &str = "$quoted$";

impl LifelineClient {
    /// Build and run an `INSERT INTO <table> (<cols>) VALUES (<vals>)`
    /// statement from column/value pairs, in the given order.
    ///
    /// Values are serialized into the statement text: `Null` becomes the
    /// `Null` literal, booleans become `True`/`False`, and everything else is
    /// wrapped in a fixed dollar-quote tag pair.
    ///
    /// With a `returning` column list the statement gains a `RETURNING`
    /// clause and the first returned row comes back; otherwise the
    /// affected-row count does.
    ///
    /// Warning: this builder is not SQL-injection safe. Table names, column
    /// names, and values are interpolated into the text as-is. Use
    /// [`execute`](Self::execute) with bound parameters for untrusted input.
    ///
    /// # Errors
    /// `ExecutionError` when a `RETURNING` statement produces no rows, plus
    /// everything [`query_rows`](Self::query_rows) can return.
    pub fn insert(
        &mut self,
        table: &str,
        values: &[(&str, SqlValue)],
        returning: Option<&str>,
    ) -> Result<InsertOutcome, LifelineDbError> {
        let mut statement = render_insert(table, values);

        if let Some(columns) = returning {
            statement.push_str(" RETURNING ");
            statement.push_str(columns);
            match self.query_rows(&statement)? {
                QueryOutcome::Rows(mut rows) => {
                    if rows.is_empty() {
                        return Err(LifelineDbError::ExecutionError(
                            "RETURNING clause produced no rows".to_string(),
                        ));
                    }
                    Ok(InsertOutcome::Returned(rows.swap_remove(0)))
                }
                QueryOutcome::Affected(_) => Err(LifelineDbError::ExecutionError(
                    "expected rows from a RETURNING statement".to_string(),
                )),
            }
        } else {
            match self.query_rows(&statement)? {
                QueryOutcome::Affected(count) => Ok(InsertOutcome::Affected(count)),
                QueryOutcome::Rows(rows) => Ok(InsertOutcome::Affected(rows.len() as u64)),
            }
        }
    }

    /// Build and run an `UPDATE <table> SET <assignments> WHERE <condition>`
    /// statement from column/value pairs, in the given order.
    ///
    /// The serialization policy is stricter than [`insert`](Self::insert)'s
    /// and deliberately kept distinct from it: `Null` becomes the `Null`
    /// literal, text is single-quoted with no internal escaping, integers are
    /// emitted verbatim, and any other value is rejected before any SQL is
    /// built or sent.
    ///
    /// The condition string is trusted and interpolated unescaped.
    ///
    /// Warning: this builder is not SQL-injection safe. Use
    /// [`execute`](Self::execute) with bound parameters for untrusted input.
    ///
    /// # Errors
    /// `UnsupportedValue` for a value outside {null, text, int}, plus
    /// everything [`query_rows`](Self::query_rows) can return.
    pub fn update(
        &mut self,
        table: &str,
        values: &[(&str, SqlValue)],
        where_clause: &str,
    ) -> Result<u64, LifelineDbError> {
        let statement = render_update(table, values, where_clause)?;
        match self.query_rows(&statement)? {
            QueryOutcome::Affected(count) => Ok(count),
            QueryOutcome::Rows(rows) => Ok(rows.len() as u64),
        }
    }
}

pub(crate) fn render_insert(table: &str, values: &[(&str, SqlValue)]) -> String {
    let mut columns = String::new();
    let mut rendered = String::new();
    for (idx, (column, value)) in values.iter().enumerate() {
        if idx > 0 {
            columns.push(',');
            rendered.push(',');
        }
        columns.push_str(column);
        rendered.push_str(&insert_literal(value));
    }
    format!("INSERT INTO {table} ({columns}) VALUES ({rendered})")
}

fn insert_literal(value: &SqlValue) -> String {
    match value {
        SqlValue::Null => "Null".to_string(),
        // booleans first: they must not fall into the generic quoting
        SqlValue::Bool(true) => "True".to_string(),
        SqlValue::Bool(false) => "False".to_string(),
        other => format!("{INSERT_QUOTE_TAG}{other}{INSERT_QUOTE_TAG}"),
    }
}

pub(crate) fn render_update(
    table: &str,
    values: &[(&str, SqlValue)],
    where_clause: &str,
) -> Result<String, LifelineDbError> {
    let mut assignments = String::new();
    for (idx, (column, value)) in values.iter().enumerate() {
        if idx > 0 {
            assignments.push(',');
        }
        let rendered = update_literal(value)?;
        let _ = write!(assignments, "\"{column}\"={rendered}");
    }
    Ok(format!("UPDATE {table} SET {assignments} WHERE {where_clause}"))
}

fn update_literal(value: &SqlValue) -> Result<String, LifelineDbError> {
    match value {
        SqlValue::Null => Ok("Null".to_string()),
        SqlValue::Text(text) => Ok(format!("'{text}'")),
        SqlValue::Int(int) => Ok(int.to_string()),
        other => Err(LifelineDbError::UnsupportedValue(format!(
            "update cannot serialize a {} value",
            other.kind()
        ))),
    }
}
