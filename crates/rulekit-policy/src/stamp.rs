//! Write-path policy naming.
//!
//! Policies are written with a generated name that encodes where and when
//! they were applied. The name is ignored by equivalence checks.

use crate::error::{PolicyError, malformed};
use rulekit_doc::{DocPath, DocumentNode, NodeKind};
use serde::{Deserialize, Serialize};

/// Values stamped onto an outgoing policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyStamp {
    #[serde(default)]
    pub account: String,
    pub environment: String,
    pub platform: String,
    pub timestamp: String,
}

impl PolicyStamp {
    /// `tf-{account}-{environment}-{platform}-{timestamp}`.
    pub fn policy_name(&self) -> String {
        format!(
            "tf-{}-{}-{}-{}",
            self.account, self.environment, self.platform, self.timestamp
        )
    }
}

/// Return `doc` with `name` and `platform` set from `stamp`. Existing keys
/// keep their position; missing ones are appended.
pub fn stamp_policy_name(
    doc: &DocumentNode,
    stamp: &PolicyStamp,
) -> Result<DocumentNode, PolicyError> {
    let mut stamped = doc.clone();
    let fields = stamped
        .as_map_mut()
        .ok_or_else(|| malformed(&DocPath::root(), NodeKind::Map, doc.kind()))?;
    fields.insert("name", stamp.policy_name().into());
    fields.insert("platform", stamp.platform.as_str().into());
    Ok(stamped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::are_equivalent;
    use serde_json::json;

    fn stamp(timestamp: &str) -> PolicyStamp {
        PolicyStamp {
            account: String::new(),
            environment: "staging".to_string(),
            platform: "http_large".to_string(),
            timestamp: timestamp.to_string(),
        }
    }

    #[test]
    fn empty_account_yields_double_hyphen() {
        assert_eq!(stamp("X").policy_name(), "tf--staging-http_large-X");
    }

    #[test]
    fn stamping_keeps_key_positions() {
        let doc = DocumentNode::parse(r#"{"name":"mine","rules":[],"description":"d"}"#)
            .expect("fixture should parse");
        let stamped = stamp_policy_name(&doc, &stamp("X")).expect("stamp should succeed");
        assert_eq!(
            stamped.to_json_string().expect("render"),
            r#"{"name":"tf--staging-http_large-X","rules":[],"description":"d","platform":"http_large"}"#
        );
    }

    #[test]
    fn restamped_documents_stay_equivalent() {
        let doc = DocumentNode::from(json!({"rules": [{"name": "R"}]}));
        let first = stamp_policy_name(&doc, &stamp("1")).expect("stamp");
        let second = stamp_policy_name(&doc, &stamp("2")).expect("stamp");
        assert_ne!(first, second);
        assert!(are_equivalent(&first, &second));
    }

    #[test]
    fn rejects_non_map_documents() {
        let err = stamp_policy_name(&DocumentNode::from("x"), &stamp("1"))
            .expect_err("string document should be rejected");
        assert_eq!(err.failure_class(), "malformed_document");
    }
}
