//! Store error types
//!
//! Every backend reports failures as a [`StoreError`] carrying the operation
//! that was running and a coarse classification of what went wrong.

use std::fmt;

/// Operation being performed when the store error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// Creating the backing table
    Initialize,
    /// Listing every item
    FindAll,
    /// Loading one page of items
    FindPage,
    /// Loading a single item by id
    FindById,
    /// Substring search on the item name
    FindByName,
    /// Inserting or overwriting an item
    Save,
    /// Removing an item
    Delete,
    /// Liveness probe
    HealthCheck,
    /// Unattributed query
    Query,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initialize => write!(f, "initialize"),
            Self::FindAll => write!(f, "find_all"),
            Self::FindPage => write!(f, "find_page"),
            Self::FindById => write!(f, "find_by_id"),
            Self::FindByName => write!(f, "find_by_name"),
            Self::Save => write!(f, "save"),
            Self::Delete => write!(f, "delete"),
            Self::HealthCheck => write!(f, "health_check"),
            Self::Query => write!(f, "query"),
        }
    }
}

/// Category of store error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreErrorKind {
    /// Row addressed by id does not exist
    NotFound,
    /// Check, unique or not-null constraint rejected the write
    ConstraintViolation,
    /// Could not reach the database
    ConnectionFailed,
    /// Pool acquire or statement timed out
    Timeout,
    /// Statement failed or result could not be decoded
    QueryFailed,
    /// Other/unknown error
    Other,
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::ConstraintViolation => write!(f, "constraint_violation"),
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::Timeout => write!(f, "timeout"),
            Self::QueryFailed => write!(f, "query_failed"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Structured store error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    /// The operation being performed when the error occurred
    pub operation: StoreOperation,
    /// The category of error
    pub kind: StoreErrorKind,
    /// Human-readable error message
    pub message: String,
}

impl StoreError {
    /// Create a new store error
    pub fn new(operation: StoreOperation, kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
        }
    }

    /// Row with the given id does not exist
    pub fn not_found(operation: StoreOperation, id: i64) -> Self {
        Self::new(
            operation,
            StoreErrorKind::NotFound,
            format!("No item row with id {}", id),
        )
    }

    /// Create a query failed error
    pub fn query_failed(operation: StoreOperation, message: impl Into<String>) -> Self {
        Self::new(operation, StoreErrorKind::QueryFailed, message)
    }

    /// Replace the operation, keeping kind and message
    pub fn during(mut self, operation: StoreOperation) -> Self {
        self.operation = operation;
        self
    }

    /// Check if this error is retriable (transient errors that may succeed on retry)
    pub fn is_retriable(&self) -> bool {
        matches!(
            self.kind,
            StoreErrorKind::ConnectionFailed | StoreErrorKind::Timeout
        )
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Store {} error during {}: {}",
            self.kind, self.operation, self.message
        )
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        use sqlx::Error as E;
        let op = StoreOperation::Query;
        match err {
            E::RowNotFound => Self::new(op, StoreErrorKind::NotFound, "Row not found"),
            E::PoolTimedOut => Self::new(op, StoreErrorKind::Timeout, "Connection pool timed out"),
            E::PoolClosed => Self::new(
                op,
                StoreErrorKind::ConnectionFailed,
                "Connection pool is closed",
            ),
            E::Io(e) => Self::new(op, StoreErrorKind::ConnectionFailed, e.to_string()),
            E::Tls(e) => Self::new(
                op,
                StoreErrorKind::ConnectionFailed,
                format!("TLS error: {}", e),
            ),
            E::Database(db_err) => {
                let kind = if db_err.is_check_violation()
                    || db_err.is_unique_violation()
                    || db_err.is_foreign_key_violation()
                    || db_err.code().as_deref() == Some("23502")
                {
                    StoreErrorKind::ConstraintViolation
                } else if db_err.code().as_deref() == Some("57014") {
                    // query_canceled, raised by statement_timeout
                    StoreErrorKind::Timeout
                } else {
                    StoreErrorKind::QueryFailed
                };
                Self::new(op, kind, db_err.message())
            }
            E::ColumnNotFound(col) => Self::query_failed(op, format!("Column not found: {}", col)),
            E::ColumnDecode { index, source } => Self::query_failed(
                op,
                format!("Failed to decode column {}: {}", index, source),
            ),
            E::Decode(e) => Self::query_failed(op, e.to_string()),
            E::Protocol(msg) => Self::query_failed(op, msg),
            other => Self::new(op, StoreErrorKind::Other, other.to_string()),
        }
    }
}
