//! A single content fragment.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One authored content record, later merged into the site bundle.
///
/// Only `name` is required (it drives sort order); every other key the
/// author wrote is preserved as-is through the flattened map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentFragment {
    /// Display name, also the sort key for the merged bundle
    pub name: String,

    /// All remaining fields, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ContentFragment {
    /// Sort key: lowercase so ordering is case-insensitive, approximating
    /// the locale-aware collation the merged bundle is presented with.
    pub fn sort_key(&self) -> String {
        self.name.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_fragment_with_extra_fields() {
        let json = r#"{"name": "Anchoring", "summary": "First impressions stick", "tags": ["bias"]}"#;

        let fragment: ContentFragment = serde_json::from_str(json).unwrap();

        assert_eq!(fragment.name, "Anchoring");
        assert_eq!(
            fragment.extra.get("summary").and_then(|v| v.as_str()),
            Some("First impressions stick")
        );
        assert!(fragment.extra.get("tags").unwrap().is_array());
    }

    #[test]
    fn rejects_fragment_without_name() {
        let json = r#"{"summary": "no name here"}"#;

        let result: Result<ContentFragment, _> = serde_json::from_str(json);

        assert!(result.is_err());
    }

    #[test]
    fn round_trips_extra_fields() {
        let json = r#"{"name": "Zeal", "weight": 3}"#;

        let fragment: ContentFragment = serde_json::from_str(json).unwrap();
        let out = serde_json::to_value(&fragment).unwrap();

        assert_eq!(out["name"], "Zeal");
        assert_eq!(out["weight"], 3);
    }

    #[test]
    fn sort_key_is_case_insensitive() {
        let a: ContentFragment = serde_json::from_str(r#"{"name": "apple"}"#).unwrap();
        let b: ContentFragment = serde_json::from_str(r#"{"name": "Apple"}"#).unwrap();

        assert_eq!(a.sort_key(), b.sort_key());
    }
}
