//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types to make it easier to
//! get started with the library.

pub use crate::{
    ConnectOptions, InsertOutcome, IsolationLevel, LifelineClient, LifelineDbError, Liveness,
    LogLevel, NamedRow, QueryOutcome, SessionOptions, SqlValue, StatementClass,
};
