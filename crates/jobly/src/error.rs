//! Error types for jobly

use thiserror::Error;

/// Result type alias for jobly operations
pub type JoblyResult<T> = Result<T, JoblyError>;

/// Coarse classification of a [`JoblyError`] for a boundary layer.
///
/// An HTTP translator matches on this instead of on individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller-correctable input problem (400).
    BadRequest,
    /// The addressed row does not exist (404).
    NotFound,
    /// Credentials were rejected (401).
    Unauthorized,
    /// Anything the caller cannot fix (500).
    Internal,
}

impl ErrorKind {
    /// HTTP status code conventionally used for this kind.
    pub fn status_code(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::Unauthorized => 401,
            Self::Internal => 500,
        }
    }
}

/// Error types for data layer operations
#[derive(Debug, Error)]
pub enum JoblyError {
    /// Malformed or empty input, or contradictory filter bounds
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rejected credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Unique constraint violation
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Check constraint violation: {0}")]
    CheckViolation(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// Password hashing error
    #[error("Password hashing error: {0}")]
    Password(#[from] bcrypt::BcryptError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// A blocking background task failed to complete
    #[error("Background task failed: {0}")]
    Task(String),

    /// Migration error
    #[cfg(feature = "migrate")]
    #[error("Migration error: {0}")]
    Migration(String),
}

impl JoblyError {
    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create an unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Classify this error for the boundary layer.
    ///
    /// Constraint violations that reach the boundary unconverted are the
    /// caller's fault (duplicate keys, dangling references, out-of-range
    /// values), so they map to [`ErrorKind::BadRequest`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BadRequest(_)
            | Self::UniqueViolation(_)
            | Self::ForeignKeyViolation(_)
            | Self::CheckViolation(_) => ErrorKind::BadRequest,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Query(_)
            | Self::Decode { .. }
            | Self::Connection(_)
            | Self::Password(_)
            | Self::Config(_)
            | Self::Task(_) => ErrorKind::Internal,
            #[cfg(feature = "pool")]
            Self::Pool(_) => ErrorKind::Internal,
            #[cfg(feature = "migrate")]
            Self::Migration(_) => ErrorKind::Internal,
        }
    }

    /// Check if this is a bad request error
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Self::BadRequest(_))
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is an unauthorized error
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// Name of the violated constraint, for constraint violation errors.
    pub fn constraint(&self) -> Option<&str> {
        match self {
            Self::UniqueViolation(detail)
            | Self::ForeignKeyViolation(detail)
            | Self::CheckViolation(detail) => detail.split_once(": ").map(|(name, _)| name),
            _ => None,
        }
    }

    /// Turn a unique violation into a [`JoblyError::BadRequest`] carrying
    /// `message`. Other errors pass through unchanged.
    pub fn unique_as_bad_request(self, message: impl Into<String>) -> Self {
        match self {
            Self::UniqueViolation(_) => Self::BadRequest(message.into()),
            other => other,
        }
    }

    /// Turn a foreign key violation into a [`JoblyError::BadRequest`]
    /// carrying `message`. Other errors pass through unchanged.
    pub fn foreign_key_as_bad_request(self, message: impl Into<String>) -> Self {
        match self {
            Self::ForeignKeyViolation(_) => Self::BadRequest(message.into()),
            other => other,
        }
    }

    /// Parse a tokio_postgres error into a more specific JoblyError
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let constraint = db_err.constraint().unwrap_or("unknown");
            let message = db_err.message();

            match db_err.code().code() {
                "23505" => return Self::UniqueViolation(format!("{}: {}", constraint, message)),
                "23503" => {
                    return Self::ForeignKeyViolation(format!("{}: {}", constraint, message));
                }
                "23514" => return Self::CheckViolation(format!("{}: {}", constraint, message)),
                _ => {}
            }
        }
        Self::Query(err)
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for JoblyError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}

#[cfg(feature = "migrate")]
impl From<refinery::Error> for JoblyError {
    fn from(err: refinery::Error) -> Self {
        Self::Migration(err.to_string())
    }
}
