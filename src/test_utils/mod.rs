//! Utilities for testing against an embedded PostgreSQL server.

pub mod embedded;

pub use embedded::{EmbeddedPostgres, setup_postgres_embedded, stop_postgres_embedded};
