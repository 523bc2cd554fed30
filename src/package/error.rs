//! Packaging error types

use std::io;
use thiserror::Error;

/// Errors that can occur while building or saving an upload package
#[derive(Debug, Error)]
pub enum PackageError {
    /// Packaging was requested with no files added
    #[error("Please upload at least one file.")]
    EmptyInput,

    /// Two uploaded files share a name and would collide in the archive
    #[error("Duplicate file name: {0}. Each file in a package needs a distinct name.")]
    DuplicateFilename(String),

    /// An uploaded file would shadow one of the generated entries
    #[error("File name {0} is reserved for the generated package contents")]
    ReservedFilename(String),

    /// A processing parameter failed the form-level checks
    #[error("Invalid parameter '{field}': {reason}")]
    InvalidParameter {
        /// Parameter name as shown in the summary
        field: String,
        /// What is wrong with the value
        reason: String,
    },

    /// ZIP container error
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Manifest serialization error
    #[error("Manifest error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl PackageError {
    /// Create an invalid parameter error
    pub fn invalid_parameter(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error stems from user input rather than a system failure
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput
                | Self::DuplicateFilename(_)
                | Self::ReservedFilename(_)
                | Self::InvalidParameter { .. }
        )
    }
}

/// Result type for packaging operations
pub type PackageResult<T> = Result<T, PackageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PackageError::EmptyInput;
        assert_eq!(err.to_string(), "Please upload at least one file.");

        let err = PackageError::DuplicateFilename("QC_01.mzML".to_string());
        assert!(err.to_string().contains("QC_01.mzML"));

        let err = PackageError::invalid_parameter("minfrac", "must be between 0 and 1");
        assert!(err.to_string().contains("minfrac"));
        assert!(err.to_string().contains("between 0 and 1"));
    }

    #[test]
    fn test_user_errors() {
        assert!(PackageError::EmptyInput.is_user_error());
        assert!(PackageError::ReservedFilename("manifest.csv".into()).is_user_error());

        let io_err = io::Error::new(io::ErrorKind::Other, "disk full");
        let err: PackageError = io_err.into();
        assert!(matches!(err, PackageError::Io(_)));
        assert!(!err.is_user_error());
    }
}
