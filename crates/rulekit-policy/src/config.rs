//! Canonicalizer configuration.
//!
//! Configuration only covers what legitimately varies between deployments:
//! the nesting ceiling, whether an empty policy is acceptable, and the match
//! type compatibility table. The metadata denylists are fixed.

use crate::error::PolicyError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const DEFAULT_MAX_DEPTH: usize = 32;

/// The remote service reads back `match.select.first-match` but only accepts
/// `select.first-match` on write.
pub const DEFAULT_TYPE_ALIASES: &[(&str, &str)] =
    &[("match.select.first-match", "select.first-match")];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalizerConfig {
    /// Maximum match-within-match nesting; a rule's own matches are level 1.
    pub max_depth: usize,
    /// Accept a policy whose `rules` list is missing or empty.
    pub allow_empty_rules: bool,
    /// Match `type` rewrites, keyed by the type the service returns.
    pub type_aliases: BTreeMap<String, String>,
}

/// On-disk shape. Every field is optional; aliases merge over the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    max_depth: Option<usize>,
    allow_empty_rules: Option<bool>,
    type_aliases: BTreeMap<String, String>,
}

pub fn default_type_aliases() -> BTreeMap<String, String> {
    DEFAULT_TYPE_ALIASES
        .iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect()
}

impl Default for CanonicalizerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            allow_empty_rules: false,
            type_aliases: default_type_aliases(),
        }
    }
}

impl CanonicalizerConfig {
    /// Parse TOML text; `origin` names the source in error messages.
    pub fn from_toml_str(text: &str, origin: &str) -> Result<Self, PolicyError> {
        let file: ConfigFile = toml::from_str(text).map_err(|source| PolicyError::ParseConfig {
            path: origin.to_string(),
            source,
        })?;
        let mut config = Self::default();
        if let Some(max_depth) = file.max_depth {
            config.max_depth = max_depth;
        }
        if let Some(allow_empty_rules) = file.allow_empty_rules {
            config.allow_empty_rules = allow_empty_rules;
        }
        config.type_aliases.extend(file.type_aliases);
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, PolicyError> {
        let text = fs::read_to_string(path).map_err(|source| PolicyError::ReadConfig {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text, &path.display().to_string())
    }

    pub fn with_allow_empty_rules(mut self, allow: bool) -> Self {
        self.allow_empty_rules = allow;
        self
    }

    pub fn with_type_alias(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.type_aliases.insert(from.into(), to.into());
        self
    }

    /// Reject settings that would make canonicalization non-idempotent or
    /// unable to accept any rule with matches.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.max_depth == 0 {
            return Err(PolicyError::InvalidConfig(
                "max_depth must be at least 1".to_string(),
            ));
        }
        for (from, to) in &self.type_aliases {
            if from == to {
                return Err(PolicyError::InvalidConfig(format!(
                    "type alias `{from}` rewrites to itself"
                )));
            }
            if self.type_aliases.contains_key(to) {
                return Err(PolicyError::InvalidConfig(format!(
                    "type alias `{from}` -> `{to}` targets another aliased type"
                )));
            }
        }
        Ok(())
    }

    pub fn resolve_type_alias(&self, match_type: &str) -> Option<&str> {
        self.type_aliases.get(match_type).map(String::as_str)
    }
}
