use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Values that cross the SQL boundary in either direction.
///
/// The same enum is used for query parameters and for values extracted from
/// result rows, so helper code never has to branch on driver types:
/// ```rust
/// use pg_lifeline::SqlValue;
///
/// let params = vec![
///     SqlValue::Int(1),
///     SqlValue::Text("alice".into()),
///     SqlValue::Bool(true),
/// ];
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    Json(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        if let SqlValue::Int(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let SqlValue::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        if let SqlValue::Bool(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let SqlValue::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        if let SqlValue::Timestamp(value) = self {
            return Some(*value);
        }
        if let Some(s) = self.as_text() {
            // Try "YYYY-MM-DD HH:MM:SS"
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(dt);
            }
            // Try "YYYY-MM-DD HH:MM:SS.SSS"
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S.%3f") {
                return Some(dt);
            }
        }
        None
    }

    #[must_use]
    pub fn as_json(&self) -> Option<&JsonValue> {
        if let SqlValue::Json(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let SqlValue::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }

    /// Short name of the variant, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            SqlValue::Int(_) => "int",
            SqlValue::Float(_) => "float",
            SqlValue::Text(_) => "text",
            SqlValue::Bool(_) => "bool",
            SqlValue::Timestamp(_) => "timestamp",
            SqlValue::Null => "null",
            SqlValue::Json(_) => "json",
            SqlValue::Blob(_) => "blob",
        }
    }
}

impl fmt::Display for SqlValue {
    /// Plain textual form, as used by the statement builders.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Int(value) => write!(f, "{value}"),
            SqlValue::Float(value) => write!(f, "{value}"),
            SqlValue::Text(value) => f.write_str(value),
            SqlValue::Bool(true) => f.write_str("True"),
            SqlValue::Bool(false) => f.write_str("False"),
            SqlValue::Timestamp(value) => write!(f, "{}", value.format("%Y-%m-%d %H:%M:%S%.f")),
            SqlValue::Null => f.write_str("Null"),
            SqlValue::Json(value) => write!(f, "{value}"),
            SqlValue::Blob(bytes) => {
                f.write_str("\\x")?;
                for byte in bytes {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}

/// Severity used for every message a handle emits.
///
/// The level is fixed when the handle is built; there is no per-message
/// severity selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Suppress all output from the handle.
    Disabled,
    Debug,
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "disabled" | "none" => Ok(LogLevel::Disabled),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

/// Transaction isolation levels accepted by
/// [`configure_session`](crate::LifelineClient::configure_session).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IsolationLevel {
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl IsolationLevel {
    pub(crate) fn as_sql(self) -> &'static str {
        match self {
            IsolationLevel::ReadUncommitted => "READ UNCOMMITTED",
            IsolationLevel::ReadCommitted => "READ COMMITTED",
            IsolationLevel::RepeatableRead => "REPEATABLE READ",
            IsolationLevel::Serializable => "SERIALIZABLE",
        }
    }
}

/// Session characteristics forwarded by
/// [`configure_session`](crate::LifelineClient::configure_session).
///
/// `None` fields are left untouched. `autocommit` is not a server setting: it
/// flips the handle's commit-after-every-statement behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionOptions {
    pub isolation_level: Option<IsolationLevel>,
    pub read_only: Option<bool>,
    pub deferrable: Option<bool>,
    pub autocommit: Option<bool>,
}

impl SessionOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_isolation_level(mut self, isolation_level: IsolationLevel) -> Self {
        self.isolation_level = Some(isolation_level);
        self
    }

    #[must_use]
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = Some(read_only);
        self
    }

    #[must_use]
    pub fn with_deferrable(mut self, deferrable: bool) -> Self {
        self.deferrable = Some(deferrable);
        self
    }

    #[must_use]
    pub fn with_autocommit(mut self, autocommit: bool) -> Self {
        self.autocommit = Some(autocommit);
        self
    }

    /// Render the server-side characteristics as one `SET SESSION
    /// CHARACTERISTICS` statement, or `None` when nothing was requested.
    pub(crate) fn characteristics_sql(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(isolation_level) = self.isolation_level {
            parts.push(format!("ISOLATION LEVEL {}", isolation_level.as_sql()));
        }
        if let Some(read_only) = self.read_only {
            parts.push(if read_only { "READ ONLY" } else { "READ WRITE" }.to_string());
        }
        if let Some(deferrable) = self.deferrable {
            parts.push(if deferrable { "DEFERRABLE" } else { "NOT DEFERRABLE" }.to_string());
        }
        if parts.is_empty() {
            return None;
        }
        Some(format!(
            "SET SESSION CHARACTERISTICS AS TRANSACTION {}",
            parts.join(" ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_parses_known_names() {
        assert_eq!("debug".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!("warning".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!("disabled".parse::<LogLevel>(), Ok(LogLevel::Disabled));
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn display_matches_builder_literals() {
        assert_eq!(SqlValue::Int(42).to_string(), "42");
        assert_eq!(SqlValue::Bool(true).to_string(), "True");
        assert_eq!(SqlValue::Bool(false).to_string(), "False");
        assert_eq!(SqlValue::Null.to_string(), "Null");
        assert_eq!(SqlValue::Text("Ann".into()).to_string(), "Ann");
        assert_eq!(SqlValue::Blob(vec![0xde, 0xad]).to_string(), "\\xdead");
    }

    #[test]
    fn session_options_render_requested_characteristics_only() {
        assert_eq!(SessionOptions::new().characteristics_sql(), None);
        assert_eq!(
            SessionOptions::new()
                .with_autocommit(false)
                .characteristics_sql(),
            None
        );

        let sql = SessionOptions::new()
            .with_isolation_level(IsolationLevel::Serializable)
            .with_read_only(true)
            .with_deferrable(false)
            .characteristics_sql()
            .unwrap();
        assert_eq!(
            sql,
            "SET SESSION CHARACTERISTICS AS TRANSACTION ISOLATION LEVEL SERIALIZABLE READ ONLY NOT DEFERRABLE"
        );
    }

    #[test]
    fn value_accessors_match_variants() {
        assert_eq!(SqlValue::Int(7).as_int(), Some(7));
        assert_eq!(SqlValue::Text("x".into()).as_int(), None);
        assert!(SqlValue::Null.is_null());
        assert_eq!(
            SqlValue::Text("2021-08-06 16:00:00".into())
                .as_timestamp()
                .map(|dt| dt.to_string()),
            Some("2021-08-06 16:00:00".to_string())
        );
        assert_eq!(SqlValue::Float(1.5).kind(), "float");
    }
}
