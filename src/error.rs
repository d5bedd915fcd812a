use std::error::Error as _;

use thiserror::Error;

/// The three statement-failure categories that trigger the
/// log / roll back / surface protocol. Anything else the server reports is
/// passed through untouched and without a rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementClass {
    /// SQLSTATE class 42: syntax errors and access-rule violations.
    MalformedStatement,
    /// SQLSTATE class 23: integrity constraint violations.
    ConstraintViolation,
    /// SQLSTATE class XX: internal server failures.
    ServerInternal,
}

impl StatementClass {
    pub(crate) fn wrap(self, err: postgres::Error) -> LifelineDbError {
        match self {
            StatementClass::MalformedStatement => LifelineDbError::MalformedStatement(err),
            StatementClass::ConstraintViolation => LifelineDbError::ConstraintViolation(err),
            StatementClass::ServerInternal => LifelineDbError::ServerInternal(err),
        }
    }
}

#[derive(Debug, Error)]
pub enum LifelineDbError {
    #[error(transparent)]
    PostgresError(#[from] postgres::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Malformed statement: {0}")]
    MalformedStatement(postgres::Error),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(postgres::Error),

    #[error("Server internal error: {0}")]
    ServerInternal(postgres::Error),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Unsupported value type: {0}")]
    UnsupportedValue(String),
}

impl LifelineDbError {
    /// The statement-failure category this error was classified into, if any.
    #[must_use]
    pub fn statement_class(&self) -> Option<StatementClass> {
        match self {
            LifelineDbError::MalformedStatement(_) => Some(StatementClass::MalformedStatement),
            LifelineDbError::ConstraintViolation(_) => Some(StatementClass::ConstraintViolation),
            LifelineDbError::ServerInternal(_) => Some(StatementClass::ServerInternal),
            _ => None,
        }
    }
}

/// Classify a driver error by SQLSTATE class.
pub(crate) fn classify_statement_error(err: &postgres::Error) -> Option<StatementClass> {
    classify_sqlstate(err.code()?.code())
}

fn classify_sqlstate(code: &str) -> Option<StatementClass> {
    match code.get(..2)? {
        "42" => Some(StatementClass::MalformedStatement),
        "23" => Some(StatementClass::ConstraintViolation),
        "XX" => Some(StatementClass::ServerInternal),
        _ => None,
    }
}

/// Connection-level failures the liveness probe repairs by reconnecting:
/// the driver reports the connection closed, the server reports a class 08
/// connection exception or an administrative shutdown, or the cause is a
/// socket error (which carries no SQLSTATE).
pub(crate) fn is_connection_lost(err: &postgres::Error) -> bool {
    if err.is_closed() {
        return true;
    }
    if let Some(code) = err.code() {
        return is_connection_lost_sqlstate(code.code());
    }
    err.source()
        .is_some_and(|cause| cause.is::<std::io::Error>())
}

fn is_connection_lost_sqlstate(code: &str) -> bool {
    code.starts_with("08") || matches!(code, "57P01" | "57P02" | "57P03")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_the_three_statement_categories() {
        // syntax error, undefined table
        assert_eq!(
            classify_sqlstate("42601"),
            Some(StatementClass::MalformedStatement)
        );
        assert_eq!(
            classify_sqlstate("42P01"),
            Some(StatementClass::MalformedStatement)
        );
        // unique and foreign key violations
        assert_eq!(
            classify_sqlstate("23505"),
            Some(StatementClass::ConstraintViolation)
        );
        assert_eq!(
            classify_sqlstate("23503"),
            Some(StatementClass::ConstraintViolation)
        );
        // internal error
        assert_eq!(
            classify_sqlstate("XX000"),
            Some(StatementClass::ServerInternal)
        );
    }

    #[test]
    fn leaves_other_sqlstates_unclassified() {
        // data error, failed transaction, serialization failure
        assert_eq!(classify_sqlstate("22012"), None);
        assert_eq!(classify_sqlstate("25P02"), None);
        assert_eq!(classify_sqlstate("40001"), None);
        assert_eq!(classify_sqlstate(""), None);
    }

    #[test]
    fn connection_lost_covers_class_08_and_admin_shutdown() {
        assert!(is_connection_lost_sqlstate("08006"));
        assert!(is_connection_lost_sqlstate("08003"));
        assert!(is_connection_lost_sqlstate("57P01"));
        assert!(!is_connection_lost_sqlstate("57014"));
        assert!(!is_connection_lost_sqlstate("42601"));
    }
}
