//! # Rulekit Document Model
//!
//! A schema-less tree for policy JSON: null, booleans, numbers, strings,
//! ordered lists, and insertion-ordered maps.
//!
//! This crate is **policy-agnostic**: it does not know what a rule, a match,
//! or a feature is. It only prescribes how documents are parsed, addressed,
//! compared, and rendered.
//!
//! ## Architecture
//!
//! ```text
//! DocumentNode          ← Tagged union over the JSON value kinds
//!     │
//! DocumentMap           ← Insertion-ordered keys, order-free equality
//!     │
//! DocPath               ← `rules[2].matches[0].features` diagnostics
//!     │
//! stable_digest         ← Key-order-independent SHA-256 fingerprint
//! ```

pub mod digest;
pub mod error;
pub mod map;
pub mod node;
pub mod path;

pub use digest::stable_digest;
pub use error::DocumentError;
pub use map::DocumentMap;
pub use node::{DocumentNode, NodeKind};
pub use path::{DocPath, Segment};
