use std::error::Error;

/// Base trait for all application errors
pub trait PipewatchError: Error + Send + Sync + 'static {
    /// Error code for programmatic handling
    fn error_code(&self) -> &'static str;

    /// Whether this error should be logged as an error or warning
    fn is_user_error(&self) -> bool {
        false
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found at '{path}'")]
    ConfigNotFound { path: String },

    #[error("Failed to parse config file: {message}")]
    ConfigParseError { message: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("IO error reading config: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl PipewatchError for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            ConfigError::ConfigNotFound { .. } => "CONFIG_NOT_FOUND",
            ConfigError::ConfigParseError { .. } => "CONFIG_PARSE_ERROR",
            ConfigError::InvalidConfiguration { .. } => "INVALID_CONFIGURATION",
            ConfigError::IoError { .. } => "CONFIG_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            ConfigError::ConfigNotFound { .. }
                | ConfigError::ConfigParseError { .. }
                | ConfigError::InvalidConfiguration { .. }
        )
    }
}

/// Failure to parse a user-supplied value into one of the closed filter
/// or signal enumerations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Unknown branch '{value}'. Expected one of: main, develop, feature/*")]
    UnknownBranch { value: String },

    #[error("Unknown job type '{value}'. Expected one of: Build, Test, Package")]
    UnknownJobType { value: String },

    #[error("Unknown configuration '{value}'. Expected one of: Debug, Release")]
    UnknownConfiguration { value: String },

    #[error("Unknown signal '{value}'")]
    UnknownSignal { value: String },
}

impl PipewatchError for ParseError {
    fn error_code(&self) -> &'static str {
        match self {
            ParseError::UnknownBranch { .. } => "UNKNOWN_BRANCH",
            ParseError::UnknownJobType { .. } => "UNKNOWN_JOB_TYPE",
            ParseError::UnknownConfiguration { .. } => "UNKNOWN_CONFIGURATION",
            ParseError::UnknownSignal { .. } => "UNKNOWN_SIGNAL",
        }
    }

    fn is_user_error(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parse_error() {
        let error = ConfigError::ConfigParseError {
            message: "invalid TOML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse config file: invalid TOML syntax"
        );
        assert_eq!(error.error_code(), "CONFIG_PARSE_ERROR");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_config_io_error_is_not_user_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = ConfigError::from(io_err);
        assert_eq!(error.error_code(), "CONFIG_IO_ERROR");
        assert!(!error.is_user_error());
    }

    #[test]
    fn test_parse_error_display() {
        let error = ParseError::UnknownBranch {
            value: "trunk".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Unknown branch 'trunk'. Expected one of: main, develop, feature/*"
        );
        assert_eq!(error.error_code(), "UNKNOWN_BRANCH");
        assert!(error.is_user_error());
    }
}
