//! Placeholder documents.
//!
//! The service has no delete operation for policies. Deleting is modelled as
//! replacing the live policy with a minimal inert one: a single rule that
//! always matches and only carries a comment.

use rulekit_doc::{DocumentMap, DocumentNode};

fn map<const N: usize>(entries: [(&str, DocumentNode); N]) -> DocumentNode {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect::<DocumentMap>()
        .into()
}

/// Build the placeholder policy for `platform`, stamped with `timestamp`.
///
/// The caller supplies the timestamp; the same inputs always produce the
/// same document.
pub fn build_placeholder(platform: &str, timestamp: &str) -> DocumentNode {
    let feature = map([
        ("type", "feature.comment".into()),
        ("name", "placeholder".into()),
        ("value", format!("Empty policy created {timestamp}").into()),
    ]);
    let always = map([
        ("type", "match.always".into()),
        ("features", vec![feature].into()),
    ]);
    let rule = map([
        ("@type", "rule-create".into()),
        ("name", "Placeholder Rule".into()),
        ("description", format!("Placeholder rule created {timestamp}").into()),
        ("matches", vec![always].into()),
    ]);
    map([
        ("@type", "policy-create".into()),
        ("name", format!("Placeholder Policy {timestamp}").into()),
        ("description", format!("Placeholder policy created {timestamp}").into()),
        ("platform", platform.into()),
        ("state", "locked".into()),
        ("rules", vec![rule].into()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonicalize::canonicalize;
    use serde_json::json;

    #[test]
    fn placeholder_has_fixed_shape() {
        let placeholder = build_placeholder("http_large", "20240102030405");
        let rendered = placeholder.to_json_string().expect("placeholder should render");
        insta::assert_snapshot!(rendered, @r#"{"@type":"policy-create","name":"Placeholder Policy 20240102030405","description":"Placeholder policy created 20240102030405","platform":"http_large","state":"locked","rules":[{"@type":"rule-create","name":"Placeholder Rule","description":"Placeholder rule created 20240102030405","matches":[{"type":"match.always","features":[{"type":"feature.comment","name":"placeholder","value":"Empty policy created 20240102030405"}]}]}]}"#);
    }

    #[test]
    fn placeholder_is_deterministic() {
        assert_eq!(
            build_placeholder("adn", "t1"),
            build_placeholder("adn", "t1")
        );
        assert_ne!(
            build_placeholder("adn", "t1"),
            build_placeholder("adn", "t2")
        );
    }

    #[test]
    fn placeholder_canonicalizes_cleanly() {
        let canonical = canonicalize(&build_placeholder("wpc", "t")).expect("placeholder is valid");
        assert_eq!(
            canonical,
            DocumentNode::from(json!({
                "name": "Placeholder Policy t",
                "description": "Placeholder policy created t",
                "platform": "wpc",
                "rules": [{
                    "name": "Placeholder Rule",
                    "description": "Placeholder rule created t",
                    "matches": [{
                        "type": "match.always",
                        "features": [{
                            "type": "feature.comment",
                            "name": "placeholder",
                            "value": "Empty policy created t"
                        }]
                    }]
                }]
            }))
        );
    }
}
