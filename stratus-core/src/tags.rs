//! Tag normalization
//!
//! Remote APIs return tag maps that include system-owned entries (the `aws:`
//! namespace) and entries the operator asked the provider to ignore. Every
//! adapter funnels tags through `KeyValueTags` before setting them back on a
//! record, and through the diff helpers before issuing tag-update calls.

use std::collections::{BTreeMap, HashMap};

use crate::resource::Value;

/// Prefix reserved for system-created tags
const AWS_TAG_KEY_PREFIX: &str = "aws:";

/// Provider-level tag ignore settings
#[derive(Debug, Clone, Default)]
pub struct IgnoreTagsConfig {
    /// Exact keys to drop
    pub keys: Vec<String>,
    /// Key prefixes to drop
    pub key_prefixes: Vec<String>,
}

impl IgnoreTagsConfig {
    fn matches(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
            || self.key_prefixes.iter().any(|p| key.starts_with(p.as_str()))
    }
}

/// Normalized tag set with deterministic ordering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyValueTags(BTreeMap<String, String>);

impl KeyValueTags {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn from_map(map: &HashMap<String, String>) -> Self {
        Self(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }

    /// Build from a `Value::Map` attribute; non-string values are skipped
    pub fn from_value(value: &Value) -> Self {
        let mut tags = BTreeMap::new();
        if let Value::Map(map) = value {
            for (k, v) in map {
                if let Value::String(s) = v {
                    tags.insert(k.clone(), s.clone());
                }
            }
        }
        Self(tags)
    }

    /// Drop system-owned `aws:` tags
    pub fn ignore_aws(self) -> Self {
        Self(
            self.0
                .into_iter()
                .filter(|(k, _)| !k.starts_with(AWS_TAG_KEY_PREFIX))
                .collect(),
        )
    }

    /// Drop tags the provider configuration asks to ignore
    pub fn ignore_config(self, config: &IgnoreTagsConfig) -> Self {
        Self(
            self.0
                .into_iter()
                .filter(|(k, _)| !config.matches(k))
                .collect(),
        )
    }

    pub fn map(&self) -> HashMap<String, String> {
        self.0.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Project to an attribute value for the host record
    pub fn to_value(&self) -> Value {
        Value::Map(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        )
    }

    /// Tags present in `desired` that are new or changed here
    pub fn updated(&self, desired: &KeyValueTags) -> HashMap<String, String> {
        desired
            .0
            .iter()
            .filter(|(k, v)| self.0.get(*k) != Some(*v))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Keys present here but absent from `desired`
    pub fn removed(&self, desired: &KeyValueTags) -> Vec<String> {
        self.0
            .keys()
            .filter(|k| !desired.0.contains_key(*k))
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(entries: &[(&str, &str)]) -> KeyValueTags {
        let map: HashMap<String, String> = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        KeyValueTags::from_map(&map)
    }

    #[test]
    fn ignore_aws_drops_system_tags() {
        let normalized = tags(&[
            ("Name", "queue"),
            ("aws:cloudformation:stack-name", "stack"),
            ("awsomeness", "kept"),
        ])
        .ignore_aws();

        let map = normalized.map();
        assert_eq!(map.len(), 2);
        assert!(map.contains_key("Name"));
        assert!(map.contains_key("awsomeness"));
    }

    #[test]
    fn ignore_config_drops_keys_and_prefixes() {
        let config = IgnoreTagsConfig {
            keys: vec!["CostCenter".to_string()],
            key_prefixes: vec!["internal:".to_string()],
        };
        let normalized = tags(&[
            ("Name", "queue"),
            ("CostCenter", "42"),
            ("internal:owner", "ops"),
        ])
        .ignore_config(&config);

        assert_eq!(normalized.map().len(), 1);
        assert!(normalized.map().contains_key("Name"));
    }

    #[test]
    fn diff_updated_and_removed() {
        let current = tags(&[("Name", "queue"), ("Env", "dev"), ("Stale", "x")]);
        let desired = tags(&[("Name", "queue"), ("Env", "prod"), ("Team", "core")]);

        let updated = current.updated(&desired);
        assert_eq!(updated.len(), 2);
        assert_eq!(updated.get("Env").map(String::as_str), Some("prod"));
        assert_eq!(updated.get("Team").map(String::as_str), Some("core"));

        let removed = current.removed(&desired);
        assert_eq!(removed, vec!["Stale".to_string()]);
    }

    #[test]
    fn value_round_trip() {
        let original = tags(&[("Name", "queue"), ("Env", "dev")]);
        let value = original.to_value();
        assert_eq!(KeyValueTags::from_value(&value), original);
    }

    #[test]
    fn from_value_skips_non_strings() {
        let mut map = HashMap::new();
        map.insert("Name".to_string(), Value::String("queue".to_string()));
        map.insert("Count".to_string(), Value::Int(3));
        let parsed = KeyValueTags::from_value(&Value::Map(map));
        assert_eq!(parsed.len(), 1);
    }
}
