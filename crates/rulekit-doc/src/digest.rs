//! Key-order-independent document fingerprint.

use crate::error::DocumentError;
use crate::node::DocumentNode;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

fn sorted_json_value(node: &DocumentNode) -> Value {
    match node {
        DocumentNode::Map(map) => {
            let mut keys: Vec<&str> = map.keys().collect();
            keys.sort_unstable();
            let mut sorted = Map::new();
            for key in keys {
                if let Some(item) = map.get(key) {
                    sorted.insert(key.to_string(), sorted_json_value(item));
                }
            }
            Value::Object(sorted)
        }
        DocumentNode::List(items) => Value::Array(items.iter().map(sorted_json_value).collect()),
        other => Value::from(other.clone()),
    }
}

/// SHA-256 over the sorted-key rendering of `node`, as `sha256:<hex>`.
///
/// Trees that compare equal produce the same digest.
pub fn stable_digest(node: &DocumentNode) -> Result<String, DocumentError> {
    let canonical =
        serde_json::to_string(&sorted_json_value(node)).map_err(DocumentError::Render)?;
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    Ok(format!("sha256:{:x}", hasher.finalize()))
}
