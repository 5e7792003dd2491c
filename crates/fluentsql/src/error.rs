//! Error types for fluentsql

use thiserror::Error;

/// Result type alias for fluentsql operations
pub type DbResult<T> = Result<T, DbError>;

/// Error types for database operations
#[derive(Debug, Error)]
pub enum DbError {
    /// Pool creation or connection lease failure
    #[error("Connection error: {0}")]
    Connection(String),

    /// Statement execution error
    #[error("Query error: {0}")]
    Query(#[from] mysql_async::Error),

    /// Unique constraint violation
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Check constraint violation: {0}")]
    CheckViolation(String),

    /// Payload serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

const ER_DUP_ENTRY: u16 = 1062;
const ER_ROW_IS_REFERENCED_2: u16 = 1451;
const ER_NO_REFERENCED_ROW_2: u16 = 1452;
const ER_CHECK_CONSTRAINT_VIOLATED: u16 = 3819;

impl DbError {
    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this is a unique violation error
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }

    /// Check if this is a connection error
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Parse a mysql_async error into a more specific DbError
    pub fn from_db_error(err: mysql_async::Error) -> Self {
        if let mysql_async::Error::Server(server) = &err {
            let message = format!("{} ({})", server.message, server.state);
            match server.code {
                ER_DUP_ENTRY => return Self::UniqueViolation(message),
                ER_ROW_IS_REFERENCED_2 | ER_NO_REFERENCED_ROW_2 => {
                    return Self::ForeignKeyViolation(message);
                }
                ER_CHECK_CONSTRAINT_VIOLATED => return Self::CheckViolation(message),
                _ => {}
            }
        }
        Self::Query(err)
    }
}

/// Whether the driver error means the connection itself went away.
///
/// Such errors during lease acquisition are absorbed by re-acquiring once.
pub(crate) fn is_connection_lost(err: &mysql_async::Error) -> bool {
    matches!(err, mysql_async::Error::Io(_))
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for DbError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<mysql_async::UrlError> for DbError {
    fn from(err: mysql_async::UrlError) -> Self {
        Self::Connection(err.to_string())
    }
}
