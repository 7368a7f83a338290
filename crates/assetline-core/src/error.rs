use crate::pipeline::codes;
use crate::pipeline::OutputCategory;
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for assetline operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("No config file found in {root} (looked for {looked_for})")]
    ConfigNotFound { root: PathBuf, looked_for: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Stable error code for machine-readable output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => codes::IO_ERROR,
            Self::ConfigRead { .. } => codes::CONFIG_READ_ERROR,
            Self::ConfigParse { .. } => codes::CONFIG_PARSE_ERROR,
            Self::ConfigNotFound { .. } => codes::CONFIG_NOT_FOUND,
            Self::Config(e) => e.code(),
        }
    }
}

/// A static defect in a pipeline configuration.
///
/// Raised by [`crate::pipeline::assemble`]. Assembly is atomic, so any of
/// these means no pipeline was produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("configuration declares no rules")]
    NoRules,

    #[error("rule `{rule}` has an empty transform chain")]
    EmptyTransformChain { rule: String },

    #[error("rule `{rule}` transform #{index} has no name")]
    InvalidTransform { rule: String, index: usize },

    #[error("rule `{rule}` has invalid pattern `{pattern}`: {reason}")]
    InvalidPattern {
        rule: String,
        pattern: String,
        reason: String,
    },

    #[error("output template `{pattern}` for {category} is invalid: {reason}")]
    InvalidOutputTemplate {
        category: OutputCategory,
        pattern: String,
        reason: String,
    },

    #[error("output category `{category}` needs exactly one template, found {count}")]
    AmbiguousOutputCategory {
        category: OutputCategory,
        count: usize,
    },
}

impl ConfigError {
    /// Stable error code for machine-readable output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoRules => codes::CONFIG_NO_RULES,
            Self::EmptyTransformChain { .. } => codes::CONFIG_EMPTY_TRANSFORM_CHAIN,
            Self::InvalidTransform { .. } => codes::CONFIG_INVALID_TRANSFORM,
            Self::InvalidPattern { .. } => codes::CONFIG_INVALID_PATTERN,
            Self::InvalidOutputTemplate { .. } => codes::CONFIG_INVALID_OUTPUT_TEMPLATE,
            Self::AmbiguousOutputCategory { .. } => codes::CONFIG_AMBIGUOUS_OUTPUT_CATEGORY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages_name_the_offender() {
        let err = ConfigError::EmptyTransformChain {
            rule: "styles".to_string(),
        };
        assert_eq!(err.to_string(), "rule `styles` has an empty transform chain");

        let err = ConfigError::AmbiguousOutputCategory {
            category: OutputCategory::Style,
            count: 2,
        };
        assert_eq!(
            err.to_string(),
            "output category `style` needs exactly one template, found 2"
        );
    }

    #[test]
    fn test_error_code_passes_through_config_error() {
        let err: Error = ConfigError::NoRules.into();
        assert_eq!(err.code(), codes::CONFIG_NO_RULES);
        assert_eq!(err.to_string(), "configuration declares no rules");
    }
}
