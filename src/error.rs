//! Error types for the submission store

use thiserror::Error;

/// Failures while reading or writing the storage file.
///
/// These never reach callers of `create`/`decide`: the store logs them and
/// keeps serving from memory.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Io(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        assert_eq!(format!("{}", err), "I/O error: read-only");

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = StoreError::Json(json_err);
        assert!(format!("{}", err).starts_with("JSON error: "));
    }

    #[test]
    fn test_store_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: StoreError = io_err.into();
        assert!(matches!(err, StoreError::Io(_)));
    }

    #[test]
    fn test_store_error_from_serde_json() {
        let json_err = serde_json::from_str::<Vec<u8>>("not json").unwrap_err();
        let err: StoreError = json_err.into();
        assert!(matches!(err, StoreError::Json(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn read_fails() -> Result<()> {
            std::fs::read("/definitely/not/here/submissions.json")?;
            Ok(())
        }
        assert!(matches!(read_fails(), Err(StoreError::Io(_))));
    }
}
