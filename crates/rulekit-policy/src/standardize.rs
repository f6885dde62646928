//! Field standardization for match and feature maps.
//!
//! The service echoes list-valued settings back as space-separated strings
//! and writes hyphenated keys with underscores. Standardizing the declared
//! form the same way lets both sides compare equal.

use crate::error::PolicyError;
use rulekit_doc::{DocPath, DocumentMap, DocumentNode};

/// Child-list keys that carry nested matches and features. Never collapsed
/// or renamed.
pub const STRUCTURAL_LIST_KEYS: [&str; 2] = ["matches", "features"];

pub fn is_structural_key(key: &str) -> bool {
    STRUCTURAL_LIST_KEYS.contains(&key)
}

/// Every `-` becomes `_`.
pub fn standardize_key(key: &str) -> String {
    key.replace('-', "_")
}

/// Standardize one key/value pair living in the map at `parent`.
///
/// A list of scalars becomes a single space-joined string; every `-` in the
/// key becomes `_`. A list holding a map, list, or null element is rejected
/// rather than guessed at.
pub fn standardize_field(
    key: &str,
    value: &DocumentNode,
    parent: &DocPath,
) -> Result<(String, DocumentNode), PolicyError> {
    let value = match value {
        DocumentNode::List(items) => {
            let field_path = parent.key(key);
            let mut parts = Vec::with_capacity(items.len());
            for (idx, item) in items.iter().enumerate() {
                let text = item
                    .scalar_text()
                    .ok_or_else(|| PolicyError::UnsupportedFieldShape {
                        path: field_path.index(idx),
                        found: item.kind(),
                    })?;
                parts.push(text);
            }
            DocumentNode::String(parts.join(" "))
        }
        other => other.clone(),
    };
    Ok((standardize_key(key), value))
}

/// Standardize every field of a match or feature map, keeping key order.
///
/// `matches` and `features` pass through untouched whatever their shape.
pub fn standardize(fields: &DocumentMap, path: &DocPath) -> Result<DocumentMap, PolicyError> {
    let mut out = DocumentMap::with_capacity(fields.len());
    for (key, value) in fields.iter() {
        if is_structural_key(key) {
            out.insert(key, value.clone());
            continue;
        }
        let (key, value) = standardize_field(key, value, path)?;
        out.insert(key, value);
    }
    Ok(out)
}
