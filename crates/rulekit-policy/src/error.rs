//! Error types for policy canonicalization.

use rulekit_doc::{DocPath, DocumentError, NodeKind};
use thiserror::Error;

/// Errors raised while canonicalizing or configuring policy handling.
///
/// Comparison never produces these: a shape mismatch between two parsed
/// documents is a difference, not a failure.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// A field holds the wrong kind of node.
    #[error("malformed document at {path}: expected {expected}, found {found}")]
    Malformed {
        path: DocPath,
        expected: NodeKind,
        found: NodeKind,
    },

    /// A required field is absent.
    #[error("malformed document at {path}: missing required field `{field}`")]
    MissingField { path: DocPath, field: &'static str },

    /// The policy has no rules and the caller did not permit that.
    #[error("malformed document at {path}: policy has no rules")]
    EmptyRules { path: DocPath },

    /// Matches nest deeper than the configured ceiling.
    #[error("malformed document at {path}: match nesting exceeds {limit} levels")]
    DepthExceeded { path: DocPath, limit: usize },

    /// A list that should collapse into a string holds a non-scalar element.
    #[error("unsupported field shape at {path}: expected a scalar list element, found {found}")]
    UnsupportedFieldShape { path: DocPath, found: NodeKind },

    /// Input text is not well-formed JSON.
    #[error(transparent)]
    Parse(#[from] DocumentError),

    #[error("failed to read config file: {path}: {source}")]
    ReadConfig {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config toml at {path}: {source}")]
    ParseConfig {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl PolicyError {
    /// Stable snake_case class for machine-readable output.
    pub fn failure_class(&self) -> &'static str {
        match self {
            Self::Malformed { .. }
            | Self::MissingField { .. }
            | Self::EmptyRules { .. }
            | Self::DepthExceeded { .. } => "malformed_document",
            Self::UnsupportedFieldShape { .. } => "unsupported_field_shape",
            Self::Parse(_) => "parse_error",
            Self::ReadConfig { .. } | Self::ParseConfig { .. } | Self::InvalidConfig(_) => {
                "config_error"
            }
        }
    }

    /// Location of the offending node, when the error points into a document.
    pub fn path(&self) -> Option<&DocPath> {
        match self {
            Self::Malformed { path, .. }
            | Self::MissingField { path, .. }
            | Self::EmptyRules { path }
            | Self::DepthExceeded { path, .. }
            | Self::UnsupportedFieldShape { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Shorthand for a wrong-kind error at `path`.
pub(crate) fn malformed(path: &DocPath, expected: NodeKind, found: NodeKind) -> PolicyError {
    PolicyError::Malformed {
        path: path.clone(),
        expected,
        found,
    }
}
