//! Storage error types.
//!
//! Every storage failure carries a category [`ErrorCode`] and the message the
//! backend produced. Messages are operator-facing and may span several lines;
//! the HTTP layer decides what reaches the client.

use std::fmt;

/// Category tag of a storage failure.
///
/// Three categories are constraint violations the HTTP layer knows how to
/// report. Everything else is carried verbatim in [`ErrorCode::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// A value exceeds the column's maximum length.
    ValueTooLong,
    /// A uniqueness constraint was violated.
    UniqueViolation,
    /// A referenced or required record does not exist.
    RecordNotFound,
    /// Any other backend-specific code (SQLSTATE, driver error kind, ...).
    Other(String),
}

impl ErrorCode {
    /// Stable string form of the tag, used in logs.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::ValueTooLong => "value_too_long",
            Self::UniqueViolation => "unique_violation",
            Self::RecordNotFound => "record_not_found",
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised by a [`ProductStore`](crate::ProductStore) operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct StorageError {
    /// Category of the failure.
    pub code: ErrorCode,
    /// Backend-provided detail. May contain embedded newlines.
    pub message: String,
}

impl StorageError {
    /// Build an error from a code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// A value written to `column` is longer than the column allows.
    #[must_use]
    pub fn value_too_long(operation: &str, column: &str) -> Self {
        Self::new(
            ErrorCode::ValueTooLong,
            format!(
                "{}The provided value for the column is too long for the column's type. Column: {column}",
                invocation(operation)
            ),
        )
    }

    /// A write collided with an existing row on `fields`.
    #[must_use]
    pub fn unique_violation(operation: &str, fields: &str) -> Self {
        Self::new(
            ErrorCode::UniqueViolation,
            format!(
                "{}Unique constraint failed on the fields: (`{fields}`)",
                invocation(operation)
            ),
        )
    }

    /// A record the operation depends on was not found.
    #[must_use]
    pub fn record_not_found(operation: &str, cause: &str) -> Self {
        Self::new(
            ErrorCode::RecordNotFound,
            format!(
                "{}An operation failed because it depends on one or more records that were required but not found. {cause}",
                invocation(operation)
            ),
        )
    }

    /// Any failure outside the known constraint categories.
    pub fn other(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Other(code.into()), message)
    }
}

/// Header line every operation failure starts with.
pub(crate) fn invocation(operation: &str) -> String {
    format!("Invalid `product.{operation}()` invocation:\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_raw_message() {
        let err = StorageError::other("57014", "canceling statement\ndue to timeout");
        assert_eq!(err.to_string(), "canceling statement\ndue to timeout");
    }

    #[test]
    fn constructors_set_category() {
        assert_eq!(
            StorageError::value_too_long("create", "name").code,
            ErrorCode::ValueTooLong
        );
        assert_eq!(
            StorageError::unique_violation("create", "sku").code,
            ErrorCode::UniqueViolation
        );
        assert_eq!(
            StorageError::record_not_found("delete", "Record to delete does not exist.").code,
            ErrorCode::RecordNotFound
        );
    }

    #[test]
    fn constraint_messages_span_lines() {
        let err = StorageError::value_too_long("update", "short_description");
        assert!(err.message.contains('\n'));
        assert!(err.message.ends_with("Column: short_description"));
    }

    #[test]
    fn other_code_keeps_its_tag() {
        let err = StorageError::other("connection timeout", "pool timed out");
        assert_eq!(err.code.as_str(), "connection timeout");
    }
}
