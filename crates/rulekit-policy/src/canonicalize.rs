//! Policy canonicalization.
//!
//! The service decorates every policy it returns with identifiers, ordinals,
//! timestamps, and raw echoes of user values. Canonicalization rebuilds the
//! tree without that metadata so the result can be persisted as tracked state
//! and compared against a declared document.
//!
//! ```text
//! policy   ── drop POLICY_METADATA_KEYS
//!   rules[i]   ── drop RULE_METADATA_KEYS
//!     matches[j]   ── drop MATCH_METADATA_KEYS, standardize, alias `type`
//!       matches[k]   ── (recursive)
//!       features[m]  ── drop FEATURE_METADATA_KEYS, standardize
//! ```
//!
//! Denylists are checked against the standardized key, so `raw-value` is
//! dropped on the first pass just like `raw_value`.
//!
//! The output keeps every list in its original order and every surviving key
//! in its original position. Running it twice yields the same tree.

use crate::config::CanonicalizerConfig;
use crate::error::{PolicyError, malformed};
use crate::standardize::{standardize, standardize_key};
use rulekit_doc::{DocPath, DocumentMap, DocumentNode, NodeKind};

/// Server-managed keys on the policy itself. `name` and `platform` stay:
/// tracked state must show them.
pub const POLICY_METADATA_KEYS: &[&str] = &[
    "id",
    "@id",
    "@type",
    "policy_type",
    "state",
    "history",
    "created_at",
    "updated_at",
];

pub const RULE_METADATA_KEYS: &[&str] = &[
    "id",
    "@id",
    "@type",
    "ordinal",
    "created_at",
    "updated_at",
];

pub const MATCH_METADATA_KEYS: &[&str] = &["ordinal", "raw_value"];

pub const FEATURE_METADATA_KEYS: &[&str] =
    &["ordinal", "raw_source", "raw_destination", "raw_value"];

/// Strips server metadata from policy documents.
#[derive(Debug, Clone, Default)]
pub struct Canonicalizer {
    config: CanonicalizerConfig,
}

impl Canonicalizer {
    pub fn new(config: CanonicalizerConfig) -> Self {
        Self { config }
    }

    /// Rebuild `doc` without server metadata.
    pub fn canonicalize(&self, doc: &DocumentNode) -> Result<DocumentNode, PolicyError> {
        let root_path = DocPath::root();
        let root = expect_map(doc, &root_path)?;

        let mut out = DocumentMap::with_capacity(root.len());
        let mut rule_count = None;
        for (key, value) in root.iter() {
            if POLICY_METADATA_KEYS.contains(&key) {
                continue;
            }
            if key == "rules" {
                let rules = self.canonicalize_rules(value, &root_path.key("rules"))?;
                rule_count = Some(rules.len());
                out.insert(key, DocumentNode::List(rules));
                continue;
            }
            out.insert(key, value.clone());
        }

        if rule_count.is_none() && !self.config.allow_empty_rules {
            return Err(PolicyError::MissingField {
                path: root_path,
                field: "rules",
            });
        }
        tracing::debug!(
            rules = rule_count.unwrap_or(0),
            "canonicalized policy document"
        );
        Ok(DocumentNode::Map(out))
    }

    fn canonicalize_rules(
        &self,
        value: &DocumentNode,
        path: &DocPath,
    ) -> Result<Vec<DocumentNode>, PolicyError> {
        let rules = expect_list(value, path)?;
        if rules.is_empty() && !self.config.allow_empty_rules {
            return Err(PolicyError::EmptyRules { path: path.clone() });
        }

        let mut out = Vec::with_capacity(rules.len());
        for (idx, rule) in rules.iter().enumerate() {
            out.push(self.canonicalize_rule(rule, &path.index(idx))?);
        }
        Ok(out)
    }

    fn canonicalize_rule(
        &self,
        rule: &DocumentNode,
        path: &DocPath,
    ) -> Result<DocumentNode, PolicyError> {
        let fields = expect_map(rule, path)?;
        let mut out = DocumentMap::with_capacity(fields.len());
        for (key, value) in fields.iter() {
            if RULE_METADATA_KEYS.contains(&key) {
                continue;
            }
            if key == "matches" {
                let matches = self.canonicalize_matches(value, &path.key("matches"), 1)?;
                out.insert(key, matches);
                continue;
            }
            out.insert(key, value.clone());
        }
        Ok(DocumentNode::Map(out))
    }

    fn canonicalize_matches(
        &self,
        value: &DocumentNode,
        path: &DocPath,
        depth: usize,
    ) -> Result<DocumentNode, PolicyError> {
        if depth > self.config.max_depth {
            return Err(PolicyError::DepthExceeded {
                path: path.clone(),
                limit: self.config.max_depth,
            });
        }
        let matches = expect_list(value, path)?;
        let mut out = Vec::with_capacity(matches.len());
        for (idx, item) in matches.iter().enumerate() {
            out.push(self.canonicalize_match(item, &path.index(idx), depth)?);
        }
        Ok(DocumentNode::List(out))
    }

    fn canonicalize_match(
        &self,
        item: &DocumentNode,
        path: &DocPath,
        depth: usize,
    ) -> Result<DocumentNode, PolicyError> {
        let fields = expect_map(item, path)?;
        let mut kept = DocumentMap::with_capacity(fields.len());
        for (key, value) in strip_metadata(fields, MATCH_METADATA_KEYS) {
            let value = match key {
                "matches" => self.canonicalize_matches(value, &path.key(key), depth + 1)?,
                "features" => self.canonicalize_features(value, &path.key(key))?,
                _ => value.clone(),
            };
            kept.insert(key, value);
        }

        let mut out = standardize(&kept, path)?;
        if let Some(match_type) = out.get_mut("type") {
            *match_type = self.rewrite_match_type(match_type, path);
        }
        Ok(DocumentNode::Map(out))
    }

    fn rewrite_match_type(&self, value: &DocumentNode, path: &DocPath) -> DocumentNode {
        let Some(match_type) = value.as_str() else {
            return value.clone();
        };
        match self.config.resolve_type_alias(match_type) {
            Some(alias) => {
                tracing::debug!(%path, from = match_type, to = alias, "rewrote match type alias");
                DocumentNode::from(alias)
            }
            None => value.clone(),
        }
    }

    fn canonicalize_features(
        &self,
        value: &DocumentNode,
        path: &DocPath,
    ) -> Result<DocumentNode, PolicyError> {
        let features = expect_list(value, path)?;
        let mut out = Vec::with_capacity(features.len());
        for (idx, feature) in features.iter().enumerate() {
            let feature_path = path.index(idx);
            let fields = expect_map(feature, &feature_path)?;
            let kept: DocumentMap = strip_metadata(fields, FEATURE_METADATA_KEYS)
                .map(|(key, value)| (key.to_string(), value.clone()))
                .collect();
            out.push(DocumentNode::Map(standardize(&kept, &feature_path)?));
        }
        Ok(DocumentNode::List(out))
    }
}

/// Entries whose standardized key is not in `denylist`. Matching on the
/// standardized form keeps `raw-value` and `raw_value` in the same class.
fn strip_metadata<'a>(
    fields: &'a DocumentMap,
    denylist: &'static [&'static str],
) -> impl Iterator<Item = (&'a str, &'a DocumentNode)> {
    fields
        .iter()
        .filter(move |(key, _)| !denylist.contains(&standardize_key(key).as_str()))
}

fn expect_map<'a>(node: &'a DocumentNode, path: &DocPath) -> Result<&'a DocumentMap, PolicyError> {
    node.as_map()
        .ok_or_else(|| malformed(path, NodeKind::Map, node.kind()))
}

fn expect_list<'a>(
    node: &'a DocumentNode,
    path: &DocPath,
) -> Result<&'a [DocumentNode], PolicyError> {
    node.as_list()
        .ok_or_else(|| malformed(path, NodeKind::List, node.kind()))
}

/// Canonicalize with the default configuration.
pub fn canonicalize(doc: &DocumentNode) -> Result<DocumentNode, PolicyError> {
    Canonicalizer::default().canonicalize(doc)
}

/// Read-path helper: parse JSON text, canonicalize, render compact JSON in
/// the original key order.
pub fn canonicalize_json(text: &str) -> Result<String, PolicyError> {
    let doc = DocumentNode::parse(text)?;
    let canonical = canonicalize(&doc)?;
    Ok(canonical.to_json_string()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> DocumentNode {
        DocumentNode::from(value)
    }

    #[test]
    fn strips_metadata_at_every_level() {
        let input = doc(json!({
            "id": "9", "@id": "/p/9", "@type": "Policy", "policy_type": "customer",
            "state": "locked", "history": [], "created_at": "t", "updated_at": "t",
            "name": "n", "platform": "http_large", "description": "top",
            "rules": [{
                "id": "1", "@id": "/r/1", "@type": "Rule", "ordinal": 1,
                "created_at": "t", "updated_at": "t", "name": "R", "description": "d",
                "matches": [{
                    "type": "match.always", "ordinal": 1, "raw_value": "x",
                    "features": [{
                        "type": "feature.url.url-redirect", "ordinal": 1,
                        "raw_source": "/s/", "raw_destination": "/d/", "raw_value": "v",
                        "source": "/s/"
                    }]
                }]
            }]
        }));

        let out = canonicalize(&input).expect("canonicalize should succeed");
        assert_eq!(
            out,
            doc(json!({
                "name": "n", "platform": "http_large", "description": "top",
                "rules": [{
                    "name": "R", "description": "d",
                    "matches": [{
                        "type": "match.always",
                        "features": [{"type": "feature.url.url-redirect", "source": "/s/"}]
                    }]
                }]
            }))
        );
    }

    #[test]
    fn rewrites_first_match_type_alias() {
        let input = doc(json!({"rules": [{"matches": [
            {"type": "match.select.first-match", "ordinal": 3, "raw_value": "r"}
        ]}]}));
        let out = canonicalize(&input).expect("canonicalize should succeed");
        assert_eq!(
            out,
            doc(json!({"rules": [{"matches": [{"type": "select.first-match"}]}]}))
        );
    }

    #[test]
    fn custom_aliases_extend_the_rewrite_table() {
        let config = CanonicalizerConfig::default().with_type_alias("match.legacy", "legacy");
        let input = doc(json!({"rules": [{"matches": [{"type": "match.legacy"}]}]}));
        let out = Canonicalizer::new(config)
            .canonicalize(&input)
            .expect("canonicalize should succeed");
        assert_eq!(out, doc(json!({"rules": [{"matches": [{"type": "legacy"}]}]})));
    }

    #[test]
    fn recurses_into_nested_matches() {
        let input = doc(json!({"rules": [{"matches": [{
            "type": "select.first-match",
            "matches": [{
                "type": "match.request.request-header.literal",
                "ordinal": 1,
                "header-name": "X-Mode",
                "values": ["a", "b"],
                "features": [{"type": "feature.comment", "ordinal": 1, "value": "hi"}]
            }]
        }]}]}));

        let out = canonicalize(&input).expect("canonicalize should succeed");
        assert_eq!(
            out,
            doc(json!({"rules": [{"matches": [{
                "type": "select.first-match",
                "matches": [{
                    "type": "match.request.request-header.literal",
                    "header_name": "X-Mode",
                    "values": "a b",
                    "features": [{"type": "feature.comment", "value": "hi"}]
                }]
            }]}]}))
        );
    }

    #[test]
    fn rule_level_fields_are_not_standardized() {
        let input = doc(json!({"rules": [{"name": "R", "tag-list": ["a", "b"]}]}));
        let out = canonicalize(&input).expect("canonicalize should succeed");
        assert_eq!(out, doc(json!({"rules": [{"name": "R", "tag-list": ["a", "b"]}]})));
    }

    #[test]
    fn rules_must_be_a_list_of_maps() {
        let err = canonicalize(&doc(json!({"rules": {"name": "R"}})))
            .expect_err("map rules should be rejected");
        assert_eq!(err.to_string(), "malformed document at rules: expected list, found map");

        let err = canonicalize(&doc(json!({"rules": [{"name": "R"}, "oops"]})))
            .expect_err("scalar rule should be rejected");
        assert_eq!(err.path().map(ToString::to_string).as_deref(), Some("rules[1]"));
    }

    #[test]
    fn reports_path_of_misshapen_features() {
        let input = doc(json!({"rules": [
            {"matches": []},
            {"matches": [{"type": "match.always"}, {"type": "match.always", "features": "x"}]}
        ]}));
        let err = canonicalize(&input).expect_err("scalar features should be rejected");
        assert_eq!(err.failure_class(), "malformed_document");
        assert_eq!(
            err.path().map(ToString::to_string).as_deref(),
            Some("rules[1].matches[1].features")
        );
    }

    #[test]
    fn missing_or_empty_rules_need_permission() {
        let err = canonicalize(&doc(json!({"name": "n"}))).expect_err("missing rules");
        assert!(matches!(err, PolicyError::MissingField { field: "rules", .. }));

        let err = canonicalize(&doc(json!({"rules": []}))).expect_err("empty rules");
        assert!(matches!(err, PolicyError::EmptyRules { .. }));

        let lenient =
            Canonicalizer::new(CanonicalizerConfig::default().with_allow_empty_rules(true));
        assert_eq!(
            lenient
                .canonicalize(&doc(json!({"name": "n", "state": "locked"})))
                .expect("missing rules permitted"),
            doc(json!({"name": "n"}))
        );
        assert_eq!(
            lenient
                .canonicalize(&doc(json!({"rules": []})))
                .expect("empty rules permitted"),
            doc(json!({"rules": []}))
        );
    }

    #[test]
    fn non_map_document_is_malformed() {
        let err = canonicalize(&doc(json!([1, 2]))).expect_err("list root should be rejected");
        assert_eq!(err.to_string(), "malformed document at $: expected map, found list");
    }

    #[test]
    fn hyphenated_metadata_keys_are_dropped() {
        let input = doc(json!({"rules": [{"matches": [{
            "type": "match.always",
            "raw-value": [{"echo": true}],
            "features": [{
                "type": "feature.url.url-redirect",
                "raw-source": "/s/",
                "raw-destination": "/d/",
                "raw-value": "v",
                "source": "/s/"
            }]
        }]}]}));

        let out = canonicalize(&input).expect("canonicalize should succeed");
        assert_eq!(
            out,
            doc(json!({"rules": [{"matches": [{
                "type": "match.always",
                "features": [{"type": "feature.url.url-redirect", "source": "/s/"}]
            }]}]}))
        );
    }

    #[test]
    fn list_valued_type_is_joined_before_aliasing() {
        let input = doc(json!({"rules": [{"matches": [
            {"type": ["match.select.first-match"]}
        ]}]}));
        let out = canonicalize(&input).expect("canonicalize should succeed");
        assert_eq!(
            out,
            doc(json!({"rules": [{"matches": [{"type": "select.first-match"}]}]}))
        );
    }

    #[test]
    fn colliding_keys_keep_first_position_and_last_value() {
        let rendered = canonicalize_json(
            r#"{"rules":[{"matches":[{"a-b":"1","type":"t","a_b":"2"}]}]}"#,
        )
        .expect("canonicalize_json should succeed");
        insta::assert_snapshot!(rendered, @r#"{"rules":[{"matches":[{"a_b":"2","type":"t"}]}]}"#);

        let again = canonicalize_json(&rendered).expect("second pass should succeed");
        assert_eq!(again, rendered);
    }

    #[test]
    fn enforces_nesting_ceiling() {
        let config = CanonicalizerConfig {
            max_depth: 2,
            ..CanonicalizerConfig::default()
        };
        let canonicalizer = Canonicalizer::new(config);

        let two_levels = doc(json!({"rules": [{"matches": [{"matches": [{"type": "t"}]}]}]}));
        canonicalizer
            .canonicalize(&two_levels)
            .expect("two levels fit the ceiling");

        let three_levels = doc(json!({"rules": [{"matches": [{"matches": [{"matches": []}]}]}]}));
        let err = canonicalizer
            .canonicalize(&three_levels)
            .expect_err("three levels exceed the ceiling");
        assert!(matches!(err, PolicyError::DepthExceeded { limit: 2, .. }));
        assert_eq!(
            err.path().map(ToString::to_string).as_deref(),
            Some("rules[0].matches[0].matches[0].matches")
        );
    }

    #[test]
    fn canonicalize_json_keeps_key_order() {
        let rendered = canonicalize_json(
            r#"{"platform":"http_large","id":"1","rules":[{"ordinal":1,"name":"R"}],"name":"n"}"#,
        )
        .expect("canonicalize_json should succeed");
        insta::assert_snapshot!(rendered, @r#"{"platform":"http_large","rules":[{"name":"R"}],"name":"n"}"#);
    }

    #[test]
    fn canonicalize_json_reports_parse_errors() {
        let err = canonicalize_json("{not json").expect_err("bad text should fail");
        assert_eq!(err.failure_class(), "parse_error");
    }
}
