//! Error types for strict URL building.
//!
//! The default builder surface never fails: malformed values degrade to defaults or empty
//! fragments. These errors are produced only by the strict entry points, by `FromStr`
//! implementations, and by conversions from JSON or URL parsing.

use thiserror::Error;

/// Main error type for query URL operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Result format outside the accepted set
    #[error("Unknown result format: {0}")]
    UnknownResultFormat(String),

    /// Sort direction other than `asc` or `desc`
    #[error("Unknown sort direction: {0}")]
    UnknownSortDirection(String),

    /// Grouping requested without a field to group on
    #[error("Group specification is missing the `field` entry")]
    MissingGroupField,

    /// Root endpoint could not be parsed as an absolute URL
    #[error("Invalid root endpoint: {0}")]
    InvalidRoot(String),

    /// Update payload could not be decoded
    #[error("Invalid update: {0}")]
    InvalidUpdate(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Specialized result type for query URL operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownResultFormat(_) => "UNKNOWN_RESULT_FORMAT",
            Self::UnknownSortDirection(_) => "UNKNOWN_SORT_DIRECTION",
            Self::MissingGroupField => "MISSING_GROUP_FIELD",
            Self::InvalidRoot(_) => "INVALID_ROOT",
            Self::InvalidUpdate(_) => "INVALID_UPDATE",
            Self::ConfigError(_) => "CONFIG_ERROR",
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidRoot(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidUpdate(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::UnknownResultFormat("yaml".to_string()).error_code(),
            "UNKNOWN_RESULT_FORMAT"
        );
        assert_eq!(
            Error::UnknownSortDirection("up".to_string()).error_code(),
            "UNKNOWN_SORT_DIRECTION"
        );
        assert_eq!(Error::MissingGroupField.error_code(), "MISSING_GROUP_FIELD");
        assert_eq!(
            Error::InvalidRoot("test".to_string()).error_code(),
            "INVALID_ROOT"
        );
        assert_eq!(
            Error::InvalidUpdate("test".to_string()).error_code(),
            "INVALID_UPDATE"
        );
        assert_eq!(
            Error::ConfigError("test".to_string()).error_code(),
            "CONFIG_ERROR"
        );
    }

    #[test]
    fn test_error_display() {
        let err = Error::UnknownResultFormat("yaml".to_string());
        assert_eq!(err.to_string(), "Unknown result format: yaml");

        assert_eq!(
            Error::MissingGroupField.to_string(),
            "Group specification is missing the `field` entry"
        );
    }

    #[test]
    fn test_from_url_parse_error() {
        let err = url::Url::parse("not a url").unwrap_err();
        let converted: Error = err.into();
        assert!(matches!(converted, Error::InvalidRoot(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let converted: Error = err.into();
        assert!(matches!(converted, Error::InvalidUpdate(_)));
        assert_eq!(converted.error_code(), "INVALID_UPDATE");
    }

    #[test]
    fn test_error_partial_eq() {
        let err1 = Error::InvalidRoot("a".to_string());
        let err2 = Error::InvalidRoot("a".to_string());
        let err3 = Error::InvalidRoot("b".to_string());

        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }
}
