use crate::client::LifelineClient;
use crate::error::{LifelineDbError, classify_statement_error};
use crate::params::as_driver_refs;
use crate::results::{NamedRow, QueryOutcome, named_rows, positional_row};
use crate::types::SqlValue;

/// Raw-text result shaping: fetch when the text starts with `SELECT`
/// (case-insensitive, no leading-whitespace allowance) or mentions
/// `RETURNING` anywhere; otherwise report the affected count.
pub(crate) fn is_fetch_query(query: &str) -> bool {
    let upper = query.to_uppercase();
    upper.starts_with("SELECT") || upper.contains("RETURNING")
}

/// Unshaped driver outcome, prior to row conversion.
enum RawOutcome {
    Rows(Vec<postgres::Row>),
    Affected(u64),
}

impl LifelineClient {
    /// Execute raw SQL text and shape fetched rows positionally.
    ///
    /// The text is sent verbatim. For caller-supplied values prefer
    /// [`execute`](Self::execute), which binds parameters safely.
    ///
    /// # Errors
    /// Classified statement failures (rolled back first), any other driver
    /// error, and liveness/reconnect failures.
    pub fn query_rows(
        &mut self,
        query: &str,
    ) -> Result<QueryOutcome<Vec<SqlValue>>, LifelineDbError> {
        match self.run_raw(query)? {
            RawOutcome::Rows(rows) => {
                let shaped = rows
                    .iter()
                    .map(positional_row)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(QueryOutcome::Rows(shaped))
            }
            RawOutcome::Affected(count) => Ok(QueryOutcome::Affected(count)),
        }
    }

    /// Execute raw SQL text and shape fetched rows by column name.
    ///
    /// Identical protocol to [`query_rows`](Self::query_rows); only the row
    /// shape differs.
    ///
    /// # Errors
    /// Same as [`query_rows`](Self::query_rows).
    pub fn query_mapped(&mut self, query: &str) -> Result<QueryOutcome<NamedRow>, LifelineDbError> {
        match self.run_raw(query)? {
            RawOutcome::Rows(rows) => Ok(QueryOutcome::Rows(named_rows(&rows)?)),
            RawOutcome::Affected(count) => Ok(QueryOutcome::Affected(count)),
        }
    }

    /// Execute SQL text with parameters bound through the driver.
    ///
    /// This is the injection-safe path: values never touch the statement
    /// text. The statement text is not logged. Results are shaped
    /// positionally, under the same protocol as the raw-text paths.
    ///
    /// # Errors
    /// Same as [`query_rows`](Self::query_rows).
    pub fn execute(
        &mut self,
        query: &str,
        params: &[SqlValue],
    ) -> Result<QueryOutcome<Vec<SqlValue>>, LifelineDbError> {
        self.ensure_live()?;
        match self.run_statement(query, params)? {
            RawOutcome::Rows(rows) => {
                let shaped = rows
                    .iter()
                    .map(positional_row)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(QueryOutcome::Rows(shaped))
            }
            RawOutcome::Affected(count) => Ok(QueryOutcome::Affected(count)),
        }
    }

    fn run_raw(&mut self, query: &str) -> Result<RawOutcome, LifelineDbError> {
        self.ensure_live()?;
        self.log(&format!("trying to execute: {query}"));
        self.run_statement(query, &[])
    }

    /// The execution protocol shared by every path: open a transaction if
    /// needed, execute, classify-and-rollback on failure, commit when
    /// autocommitting.
    fn run_statement(
        &mut self,
        query: &str,
        params: &[SqlValue],
    ) -> Result<RawOutcome, LifelineDbError> {
        self.ensure_transaction()
            .map_err(LifelineDbError::PostgresError)?;

        let refs = as_driver_refs(params);
        let outcome = if is_fetch_query(query) {
            match self.session.query(query, &refs) {
                Ok(rows) => RawOutcome::Rows(rows),
                Err(err) => return Err(self.fail_statement(err)),
            }
        } else {
            match self.session.execute(query, &refs) {
                Ok(count) => RawOutcome::Affected(count),
                Err(err) => return Err(self.fail_statement(err)),
            }
        };

        if self.autocommit {
            self.commit()?;
        }
        Ok(outcome)
    }

    /// Statement failure handling: classified errors are logged, the active
    /// transaction rolled back, and the error surfaced wrapped in its
    /// category. Anything else propagates untouched, without a rollback.
    fn fail_statement(&mut self, err: postgres::Error) -> LifelineDbError {
        match classify_statement_error(&err) {
            Some(class) => {
                self.log(&format!("{err}"));
                if let Err(rollback_err) = self.rollback() {
                    return rollback_err;
                }
                class.wrap(err)
            }
            None => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_prefix_is_fetch_shaped() {
        assert!(is_fetch_query("SELECT 1"));
        assert!(is_fetch_query("select name from users"));
        assert!(is_fetch_query("Select * From t Where a = 1"));
    }

    #[test]
    fn returning_anywhere_is_fetch_shaped() {
        assert!(is_fetch_query("INSERT INTO t (a) VALUES (1) RETURNING id"));
        assert!(is_fetch_query("delete from t where a = 1 returning *"));
    }

    #[test]
    fn everything_else_reports_affected_count() {
        assert!(!is_fetch_query("INSERT INTO t (a) VALUES (1)"));
        assert!(!is_fetch_query("UPDATE t SET a = 2 WHERE a = 1"));
        assert!(!is_fetch_query("CREATE TABLE t (a INT)"));
        // leading whitespace is not stripped before the prefix check
        assert!(!is_fetch_query("  SELECT 1"));
    }
}
