//! Policy canonicalization and equivalence checks.
//!
//! This crate decides whether a declared rules-engine policy and the policy
//! the service hands back describe the same thing, and what a service
//! response looks like once its server-managed metadata is removed.
//!
//! ```text
//! fetch ──▶ canonicalize ──▶ tracked state
//!                                 │
//! declared ──▶ canonicalize ──▶ are_equivalent ──▶ suppress diff?
//!
//! delete ──▶ build_placeholder ──▶ sent in place of a delete call
//! ```
//!
//! Everything here is synchronous and pure: no I/O apart from loading a
//! configuration file, no shared state.

mod canonicalize;
mod compare;
mod config;
mod error;
mod placeholder;
mod stamp;
mod standardize;

pub use canonicalize::{
    Canonicalizer, FEATURE_METADATA_KEYS, MATCH_METADATA_KEYS, POLICY_METADATA_KEYS,
    RULE_METADATA_KEYS, canonicalize, canonicalize_json,
};
pub use compare::{
    Difference, DifferenceKind, are_equivalent, differences, equivalent_json, suppress_diff,
};
pub use config::{
    CanonicalizerConfig, DEFAULT_MAX_DEPTH, DEFAULT_TYPE_ALIASES, default_type_aliases,
};
pub use error::PolicyError;
pub use placeholder::build_placeholder;
pub use stamp::{PolicyStamp, stamp_policy_name};
pub use standardize::{
    STRUCTURAL_LIST_KEYS, is_structural_key, standardize, standardize_field,
    standardize_key,
};

pub use rulekit_doc::{DocPath, DocumentMap, DocumentNode};
