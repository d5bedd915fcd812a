use tracing::{debug, error, info, warn};

use crate::config::{ConnectOptions, ResolvedOptions};
use crate::error::LifelineDbError;
use crate::types::{LogLevel, SessionOptions};

/// A resilient handle to one PostgreSQL session.
///
/// The handle owns exactly one session at a time. Every execution first checks
/// that the session is alive, silently reconnecting once if it is not, then
/// applies the commit/rollback protocol and shapes the result as rows or an
/// affected count.
///
/// All operations take `&mut self`; callers that need concurrency use one
/// handle per thread.
pub struct LifelineClient {
    pub(crate) opts: ResolvedOptions,
    pub(crate) session: postgres::Client,
    pub(crate) autocommit: bool,
    pub(crate) in_transaction: bool,
}

impl LifelineClient {
    /// Build a handle and open its first session.
    ///
    /// # Errors
    /// `ConfigError` when a required field is missing or the log level is
    /// unknown; `ConnectionError` when the first session cannot be opened.
    pub fn connect(options: &ConnectOptions) -> Result<Self, LifelineDbError> {
        let opts = options.resolve()?;
        let session = Self::open_session(&opts)?;
        let client = LifelineClient {
            opts,
            session,
            autocommit: true,
            in_transaction: false,
        };
        client.log(&format!(
            "connection established to host {}",
            client.opts.host
        ));
        Ok(client)
    }

    /// Emit a message at the severity fixed at construction.
    ///
    /// Logging can never fail the surrounding operation.
    pub(crate) fn log(&self, message: &str) {
        match self.opts.log_level {
            LogLevel::Disabled => {}
            LogLevel::Debug => debug!(target: "pg_lifeline", "{message}"),
            LogLevel::Info => info!(target: "pg_lifeline", "{message}"),
            LogLevel::Warn => warn!(target: "pg_lifeline", "{message}"),
            LogLevel::Error => error!(target: "pg_lifeline", "{message}"),
        }
    }

    /// Whether the underlying session reports itself closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.session.is_closed()
    }

    /// Whether each successful statement commits immediately.
    #[must_use]
    pub fn autocommit(&self) -> bool {
        self.autocommit
    }

    /// Apply session characteristics and the autocommit override.
    ///
    /// Updates the autocommit flag if an override is given, then forwards the
    /// isolation level, read-only, and deferrable settings to the session as
    /// one `SET SESSION CHARACTERISTICS` statement. Nothing is sent when none
    /// of the three server-side settings is present.
    ///
    /// # Errors
    /// Driver errors from applying the characteristics.
    pub fn configure_session(&mut self, options: SessionOptions) -> Result<(), LifelineDbError> {
        if let Some(autocommit) = options.autocommit {
            self.autocommit = autocommit;
        }
        if let Some(sql) = options.characteristics_sql() {
            self.session.batch_execute(&sql)?;
        }
        Ok(())
    }

    /// Open a transaction if none is open. Every statement executes inside
    /// one; autocommit just commits it right after the statement.
    pub(crate) fn ensure_transaction(&mut self) -> Result<(), postgres::Error> {
        if !self.in_transaction {
            self.session.batch_execute("BEGIN")?;
            self.in_transaction = true;
        }
        Ok(())
    }

    /// Commit the open transaction, if any.
    ///
    /// # Errors
    /// Driver errors from the commit.
    pub fn commit(&mut self) -> Result<(), LifelineDbError> {
        if self.in_transaction {
            self.session.batch_execute("COMMIT")?;
            self.in_transaction = false;
        }
        Ok(())
    }

    /// Roll back the open transaction, if any.
    ///
    /// # Errors
    /// Driver errors from the rollback.
    pub fn rollback(&mut self) -> Result<(), LifelineDbError> {
        if self.in_transaction {
            self.session.batch_execute("ROLLBACK")?;
            self.in_transaction = false;
        }
        Ok(())
    }

    /// Close the session and consume the handle.
    ///
    /// # Errors
    /// Driver errors from the close handshake.
    pub fn close(self) -> Result<(), LifelineDbError> {
        self.log("closing connection");
        self.session.close()?;
        Ok(())
    }
}
