//! Error types for the sitemap builder.
//!
//! `SitemapError` carries the detailed context of a failure, while
//! [`ErrorKind`] groups the variants into the categories callers usually
//! branch on (configuration, parameter, capacity, validation, callback,
//! submission and output errors).

use thiserror::Error;

/// Main error type for the sitemap library.
#[derive(Debug, Error)]
pub enum SitemapError {
    /// Schema registered with an invalid shape.
    #[error("Invalid schema configuration: {0}")]
    Configuration(String),

    /// A caller-supplied argument was rejected.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A node marked as required is absent or empty in the entry.
    #[error("Required node \"{node}\" is missing")]
    MissingRequiredNode { node: String },

    /// The document already holds the maximum number of entries.
    #[error("Maximum number of entries reached ({maximum})")]
    MaximumEntries { maximum: usize },

    /// A value failed validation and its rule raises instead of falling back.
    #[error("Invalid value for node \"{node}\"")]
    Validation { node: String },

    /// A callback reference does not resolve to a registered function.
    #[error("Unresolved {kind} callback '{name}'")]
    UnresolvedCallback { name: String, kind: String },

    /// A callback name does not carry the prefix its policy requires.
    #[error("Callback '{name}' must start with '{prefix}'")]
    CallbackPrefix { name: String, prefix: String },

    /// An external callback would shadow a built-in one.
    #[error("Callback '{name}' shadows a built-in callback")]
    CallbackShadowsBuiltIn { name: String },

    /// A built-in callback received unusable bound arguments.
    #[error("Invalid arguments for callback '{name}': {reason}")]
    InvalidCallbackArguments { name: String, reason: String },

    /// Ping submission failed or returned a non-200 status.
    #[error("Ping submission to {url} failed: {reason}")]
    Submission { url: String, reason: String },

    /// HTTP client setup failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// XML serialization failed.
    #[error("XML serialization failed: {0}")]
    XmlWrite(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON entry data could not be parsed.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML entry data could not be parsed.
    #[error("YAML parsing failed: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

/// Category of a [`SitemapError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Fatal at setup time.
    Configuration,
    /// Rejects the single offending call.
    Parameter,
    /// Entry cap reached.
    Capacity,
    /// Entry rejected as a whole.
    Validation,
    /// Callback resolution or invocation.
    Callback,
    /// Ping endpoint failure, reported per submission.
    Submission,
    /// Serialization, IO or input decoding.
    Output,
}

impl SitemapError {
    /// Category this error belongs to.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::InvalidParameter(_) | Self::MissingRequiredNode { .. } => ErrorKind::Parameter,
            Self::MaximumEntries { .. } => ErrorKind::Capacity,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::UnresolvedCallback { .. }
            | Self::CallbackPrefix { .. }
            | Self::CallbackShadowsBuiltIn { .. }
            | Self::InvalidCallbackArguments { .. } => ErrorKind::Callback,
            Self::Submission { .. } | Self::Http(_) => ErrorKind::Submission,
            Self::XmlWrite(_) | Self::Io(_) | Self::Json(_) | Self::Yaml(_) => ErrorKind::Output,
        }
    }
}

/// Result type alias for sitemap operations.
pub type Result<T> = std::result::Result<T, SitemapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = SitemapError::Validation {
            node: "loc".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid value for node \"loc\"");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_missing_required_is_parameter_error() {
        let err = SitemapError::MissingRequiredNode {
            node: "image:loc".to_string(),
        };
        assert_eq!(err.to_string(), "Required node \"image:loc\" is missing");
        assert_eq!(err.kind(), ErrorKind::Parameter);
    }

    #[test]
    fn test_callback_errors_share_kind() {
        let unresolved = SitemapError::UnresolvedCallback {
            name: "validation_missing".to_string(),
            kind: "validation".to_string(),
        };
        let prefix = SitemapError::CallbackPrefix {
            name: "check".to_string(),
            prefix: "validation_".to_string(),
        };
        assert_eq!(unresolved.kind(), ErrorKind::Callback);
        assert_eq!(prefix.kind(), ErrorKind::Callback);
        assert!(prefix.to_string().contains("validation_"));
    }

    #[test]
    fn test_capacity_error_display() {
        let err = SitemapError::MaximumEntries { maximum: 50_000 };
        assert!(err.to_string().contains("50000"));
        assert_eq!(err.kind(), ErrorKind::Capacity);
    }
}
