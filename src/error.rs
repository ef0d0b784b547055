//! Error types for sheetboard.

use thiserror::Error;

/// Common error type for sheetboard.
#[derive(Error, Debug)]
pub enum BoardError {
    /// Caller passed an empty or otherwise unusable username.
    ///
    /// This is a contract violation on the caller's side; handlers are
    /// expected to reject such input before it reaches the registry.
    #[error("invalid username")]
    InvalidUsername,

    /// The content store could not be reached or returned garbage.
    ///
    /// Wraps transport failures, non-success statuses and undecodable
    /// responses from any store backend. Operations that hit this are
    /// not retried; the caller decides what to surface.
    #[error("content store unavailable: {0}")]
    StoreUnavailable(String),

    /// Two allocations produced the same identifier.
    ///
    /// Only possible when the allocator's serialization was bypassed or
    /// its id space ran out. Fatal for the affected scope: it is
    /// poisoned and every later allocation on it fails the same way.
    #[error("duplicate id allocation in scope {scope}")]
    DuplicateAllocation { scope: String },

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

// Conversion from reqwest errors: every transport failure is a store
// availability problem from the caller's point of view.
impl From<reqwest::Error> for BoardError {
    fn from(e: reqwest::Error) -> Self {
        BoardError::StoreUnavailable(e.to_string())
    }
}

/// Result type alias for sheetboard operations.
pub type Result<T> = std::result::Result<T, BoardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_username_display() {
        let err = BoardError::InvalidUsername;
        assert_eq!(err.to_string(), "invalid username");
    }

    #[test]
    fn test_store_unavailable_display() {
        let err = BoardError::StoreUnavailable("connection refused".to_string());
        assert_eq!(
            err.to_string(),
            "content store unavailable: connection refused"
        );
    }

    #[test]
    fn test_duplicate_allocation_display() {
        let err = BoardError::DuplicateAllocation {
            scope: "thread".to_string(),
        };
        assert_eq!(err.to_string(), "duplicate id allocation in scope thread");
    }

    #[test]
    fn test_validation_error_display() {
        let err = BoardError::Validation("title too long".to_string());
        assert_eq!(err.to_string(), "validation error: title too long");
    }

    #[test]
    fn test_not_found_error_display() {
        let err = BoardError::NotFound("thread".to_string());
        assert_eq!(err.to_string(), "thread not found");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BoardError = io_err.into();
        assert!(matches!(err, BoardError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        fn sample_err() -> Result<i32> {
            Err(BoardError::InvalidUsername)
        }

        assert_eq!(sample_ok().unwrap(), 42);
        assert!(sample_err().is_err());
    }
}
