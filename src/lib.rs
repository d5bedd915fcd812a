//! Resilient synchronous wrapper around a single PostgreSQL connection.
//!
//! One [`LifelineClient`] owns one session. Every execution first checks that
//! the session is alive, silently reconnecting once if it is not, then runs
//! under a commit/rollback protocol: classified server failures are rolled
//! back and surfaced, successful statements commit immediately unless
//! autocommit has been switched off. Statement text decides the result shape:
//! `SELECT`/`RETURNING` statements fetch rows, everything else reports the
//! affected count.
//!
//! ```no_run
//! use pg_lifeline::{ConnectOptions, LifelineClient, SqlValue};
//!
//! # fn main() -> Result<(), pg_lifeline::LifelineDbError> {
//! let mut options = ConnectOptions::new();
//! options.host = Some("localhost".into());
//! options.dbname = Some("app".into());
//! options.user = Some("app".into());
//! options.password = Some("secret".into());
//!
//! let mut db = LifelineClient::connect(&options)?;
//! db.execute(
//!     "INSERT INTO users (name, age) VALUES ($1, $2)",
//!     &[SqlValue::Text("Ann".into()), SqlValue::Int(30)],
//! )?;
//! # Ok(())
//! # }
//! ```

mod builder;
mod client;
mod config;
mod connection;
mod error;
mod executor;
mod params;
mod results;
mod types;

pub mod prelude;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use client::LifelineClient;
pub use config::ConnectOptions;
pub use connection::Liveness;
pub use error::{LifelineDbError, StatementClass};
pub use results::{InsertOutcome, NamedRow, QueryOutcome};
pub use types::{IsolationLevel, LogLevel, SessionOptions, SqlValue};
