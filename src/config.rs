use serde::{Deserialize, Serialize};

use crate::error::LifelineDbError;
use crate::types::LogLevel;

/// Connection parameters for a [`LifelineClient`](crate::LifelineClient).
///
/// Fields are optional at rest and validated when the handle is built; the
/// connection fields are retained for the lifetime of the handle so it can
/// re-establish a session without caller involvement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectOptions {
    pub host: Option<String>,
    pub dbname: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    /// Defaults to 5432 when unset.
    pub port: Option<u16>,
    /// One of `disabled`, `debug`, `info`, `warning`, `error`.
    /// Defaults to `debug` when unset.
    pub log_level: Option<String>,
}

impl ConnectOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate all required fields and fix the log level.
    pub(crate) fn resolve(&self) -> Result<ResolvedOptions, LifelineDbError> {
        let host = self
            .host
            .clone()
            .ok_or_else(|| LifelineDbError::ConfigError("host is required".to_string()))?;
        let dbname = self
            .dbname
            .clone()
            .ok_or_else(|| LifelineDbError::ConfigError("dbname is required".to_string()))?;
        let user = self
            .user
            .clone()
            .ok_or_else(|| LifelineDbError::ConfigError("user is required".to_string()))?;
        let password = self
            .password
            .clone()
            .ok_or_else(|| LifelineDbError::ConfigError("password is required".to_string()))?;

        let log_level = match &self.log_level {
            Some(level) => level.parse::<LogLevel>().map_err(LifelineDbError::ConfigError)?,
            None => LogLevel::Debug,
        };

        Ok(ResolvedOptions {
            host,
            dbname,
            user,
            password,
            port: self.port,
            log_level,
        })
    }
}

/// Validated connection parameters, immutable for the life of the handle.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedOptions {
    pub host: String,
    pub dbname: String,
    pub user: String,
    pub password: String,
    pub port: Option<u16>,
    pub log_level: LogLevel,
}

impl ResolvedOptions {
    pub(crate) fn pg_config(&self) -> postgres::Config {
        let mut config = postgres::Config::new();
        config
            .host(&self.host)
            .dbname(&self.dbname)
            .user(&self.user)
            .password(&self.password);
        if let Some(port) = self.port {
            config.port(port);
        }
        config
    }
}
