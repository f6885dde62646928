//! Semantic equivalence between two policy documents.
//!
//! Both inputs are expected to be canonical already; this pass only removes
//! user-facing noise:
//!
//! - the top-level `name`, which embeds a generated timestamp and differs on
//!   every apply;
//! - a rule `name` holding the empty string, which means the same as no name.
//!
//! What remains is compared structurally: map key order is irrelevant, list
//! order is significant, and scalars must match exactly in kind and value.

use crate::error::PolicyError;
use rulekit_doc::{DocPath, DocumentMap, DocumentNode};
use serde::Serialize;
use std::fmt;

fn normalize_rule(rule: &DocumentNode) -> DocumentNode {
    let DocumentNode::Map(fields) = rule else {
        return rule.clone();
    };
    fields
        .iter()
        .filter(|(key, value)| !(*key == "name" && value.as_str() == Some("")))
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect::<DocumentMap>()
        .into()
}

/// Drop the policy name and empty rule names. Shapes the comparator does not
/// expect are left as they are and simply compare unequal.
fn normalize_for_comparison(doc: &DocumentNode) -> DocumentNode {
    let DocumentNode::Map(root) = doc else {
        return doc.clone();
    };
    let mut out = DocumentMap::with_capacity(root.len());
    for (key, value) in root.iter() {
        match (key, value) {
            ("name", _) => {}
            ("rules", DocumentNode::List(rules)) => {
                out.insert(key, rules.iter().map(normalize_rule).collect::<Vec<_>>().into());
            }
            _ => {
                out.insert(key, value.clone());
            }
        }
    }
    DocumentNode::Map(out)
}

/// True when the two documents differ only in non-semantic ways.
pub fn are_equivalent(old: &DocumentNode, new: &DocumentNode) -> bool {
    normalize_for_comparison(old) == normalize_for_comparison(new)
}

/// Parse both texts, then compare.
pub fn equivalent_json(old: &str, new: &str) -> Result<bool, PolicyError> {
    let old = DocumentNode::parse(old)?;
    let new = DocumentNode::parse(new)?;
    Ok(are_equivalent(&old, &new))
}

/// Diff-suppression hook: `true` hides the change from the plan.
///
/// Unparseable input on either side always shows the diff.
pub fn suppress_diff(old: &str, new: &str) -> bool {
    match equivalent_json(old, new) {
        Ok(equivalent) => equivalent,
        Err(err) => {
            tracing::warn!(error = %err, "cannot compare policy documents; showing diff");
            false
        }
    }
}

/// One place where two documents disagree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Difference {
    pub path: DocPath,
    #[serde(flatten)]
    pub kind: DifferenceKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DifferenceKind {
    /// Present only in the new document.
    Added { value: DocumentNode },
    /// Present only in the old document.
    Removed { value: DocumentNode },
    Changed {
        from: DocumentNode,
        to: DocumentNode,
    },
    /// Lists of different length. Common leading elements are still compared.
    LengthMismatch { old_len: usize, new_len: usize },
}

fn render(node: &DocumentNode) -> Result<String, fmt::Error> {
    node.to_json_string().map_err(|_| fmt::Error)
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DifferenceKind::Added { value } => write!(f, "+ {}: {}", self.path, render(value)?),
            DifferenceKind::Removed { value } => write!(f, "- {}: {}", self.path, render(value)?),
            DifferenceKind::Changed { from, to } => {
                write!(f, "~ {}: {} -> {}", self.path, render(from)?, render(to)?)
            }
            DifferenceKind::LengthMismatch { old_len, new_len } => {
                write!(f, "~ {}: length {old_len} -> {new_len}", self.path)
            }
        }
    }
}

fn collect_differences(
    old: &DocumentNode,
    new: &DocumentNode,
    path: &DocPath,
    out: &mut Vec<Difference>,
) {
    match (old, new) {
        (DocumentNode::Map(old_fields), DocumentNode::Map(new_fields)) => {
            for (key, old_value) in old_fields.iter() {
                match new_fields.get(key) {
                    Some(new_value) => {
                        collect_differences(old_value, new_value, &path.key(key), out);
                    }
                    None => out.push(Difference {
                        path: path.key(key),
                        kind: DifferenceKind::Removed {
                            value: old_value.clone(),
                        },
                    }),
                }
            }
            for (key, new_value) in new_fields.iter() {
                if !old_fields.contains_key(key) {
                    out.push(Difference {
                        path: path.key(key),
                        kind: DifferenceKind::Added {
                            value: new_value.clone(),
                        },
                    });
                }
            }
        }
        (DocumentNode::List(old_items), DocumentNode::List(new_items)) => {
            if old_items.len() != new_items.len() {
                out.push(Difference {
                    path: path.clone(),
                    kind: DifferenceKind::LengthMismatch {
                        old_len: old_items.len(),
                        new_len: new_items.len(),
                    },
                });
            }
            for (idx, (old_item, new_item)) in old_items.iter().zip(new_items).enumerate() {
                collect_differences(old_item, new_item, &path.index(idx), out);
            }
        }
        _ if old != new => out.push(Difference {
            path: path.clone(),
            kind: DifferenceKind::Changed {
                from: old.clone(),
                to: new.clone(),
            },
        }),
        _ => {}
    }
}

/// Every disagreement that would make `are_equivalent` return false, after
/// the same name normalization. Empty exactly when the documents are
/// equivalent.
pub fn differences(old: &DocumentNode, new: &DocumentNode) -> Vec<Difference> {
    let mut out = Vec::new();
    collect_differences(
        &normalize_for_comparison(old),
        &normalize_for_comparison(new),
        &DocPath::root(),
        &mut out,
    );
    out
}
