//! Configuration Errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading or validating configuration files
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read configuration file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration{}: {source}", describe_path(.path))]
    ParseError {
        path: Option<PathBuf>,
        #[source]
        source: toml::de::Error,
    },

    #[error("Missing required section or key: '{0}'")]
    MissingSection(String),

    #[error("Invalid value '{value}' for '{field}'. Expected {expected}")]
    InvalidFieldValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("Value {value} for '{field}' is out of range. Expected {expected}")]
    OutOfRange {
        field: String,
        value: i64,
        expected: String,
    },
}

/// Discriminant of a [`ConfigError`], handy for matching without payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    FileNotFound,
    Io,
    ParseError,
    MissingSection,
    InvalidFieldValue,
    OutOfRange,
}

impl ConfigError {
    pub fn kind(&self) -> ConfigErrorKind {
        match self {
            ConfigError::FileNotFound { .. } => ConfigErrorKind::FileNotFound,
            ConfigError::Io { .. } => ConfigErrorKind::Io,
            ConfigError::ParseError { .. } => ConfigErrorKind::ParseError,
            ConfigError::MissingSection(_) => ConfigErrorKind::MissingSection,
            ConfigError::InvalidFieldValue { .. } => ConfigErrorKind::InvalidFieldValue,
            ConfigError::OutOfRange { .. } => ConfigErrorKind::OutOfRange,
        }
    }

    pub(crate) fn invalid(field: &str, value: impl ToString, expected: &str) -> Self {
        ConfigError::InvalidFieldValue {
            field: field.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }

    pub(crate) fn out_of_range(field: &str, value: i64, expected: &str) -> Self {
        ConfigError::OutOfRange {
            field: field.to_string(),
            value,
            expected: expected.to_string(),
        }
    }

    pub(crate) fn missing(section: &str) -> Self {
        ConfigError::MissingSection(section.to_string())
    }
}

fn describe_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => format!(" file {}", path.display()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_matches_variant() {
        let err = ConfigError::missing("screen.gpio");
        assert_eq!(err.kind(), ConfigErrorKind::MissingSection);
        assert_eq!(err.to_string(), "Missing required section or key: 'screen.gpio'");

        let err = ConfigError::out_of_range("screen.width", 0, "a value greater than 0");
        assert_eq!(err.kind(), ConfigErrorKind::OutOfRange);
        assert!(err.to_string().contains("screen.width"));
    }

    #[test]
    fn test_not_found_message_contains_path() {
        let err = ConfigError::FileNotFound {
            path: PathBuf::from("/nope/screenconfig.toml"),
        };
        assert!(err.to_string().contains("/nope/screenconfig.toml"));
    }
}
