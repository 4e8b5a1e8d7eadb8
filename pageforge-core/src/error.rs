use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the page engine and the batch orchestrator.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Bad page numbers/ranges, malformed parameters, length mismatches
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing input file or path
    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Underlying document-backend failure
    #[error("Backend error: {0}")]
    Backend(String),

    /// User-requested abort mid-operation
    #[error("Operation cancelled")]
    Cancelled,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, EngineError::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_error_display() {
        let error = EngineError::Validation("page order has 3 entries".to_string());
        assert_eq!(
            error.to_string(),
            "Validation error: page order has 3 entries"
        );

        let error = EngineError::NotFound(PathBuf::from("missing.pdf"));
        assert_eq!(error.to_string(), "Not found: missing.pdf");

        let error = EngineError::Cancelled;
        assert_eq!(error.to_string(), "Operation cancelled");
    }

    #[test]
    fn test_from_io_error() {
        let io_error = IoError::new(ErrorKind::NotFound, "file not found");
        let error = EngineError::from(io_error);

        match error {
            EngineError::Io(ref err) => assert_eq!(err.kind(), ErrorKind::NotFound),
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_is_cancelled() {
        assert!(EngineError::Cancelled.is_cancelled());
        assert!(!EngineError::Validation("x".to_string()).is_cancelled());
    }

    #[test]
    fn test_error_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EngineError>();
    }
}
