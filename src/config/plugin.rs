//! The `custom.kinesis-streams` section of a service document.

use serde::Deserialize;
use serde_json::Value;

use super::stream::{resolve, ResolvedStreamConfig, StreamOverrides, StreamSpec};
use super::ConfigError;

/// How redeclarations of the shared archival resources are handled when more
/// than one stream enables archiving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SharedResourcePolicy {
    /// Later streams merge over earlier declarations.
    #[default]
    LastWins,
    /// The first stream's values are kept; later streams only add fields
    /// the first declaration lacks.
    FirstWins,
    /// A differing redeclaration fails the run.
    Reject,
}

/// Plugin section as declared by the user.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PluginConfig {
    /// Values applied to every stream unless the stream overrides them.
    pub defaults: Option<StreamOverrides>,
    /// Declared streams, in processing order. `None` means nothing to do.
    pub streams: Option<Vec<StreamSpec>>,
    pub shared_resources: SharedResourcePolicy,
}

impl PluginConfig {
    /// Parse the section from the host's untyped configuration value.
    pub fn from_value(section: &Value) -> Result<Self, ConfigError> {
        Self::deserialize(section).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Resolve every declared stream, failing on the first invalid entry.
    pub fn resolve_streams(&self) -> Result<Vec<ResolvedStreamConfig>, ConfigError> {
        let defaults = self.defaults.clone().unwrap_or_default();
        self.streams
            .iter()
            .flatten()
            .enumerate()
            .map(|(index, stream)| resolve(index, stream, &defaults))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_section() {
        let section = json!({
            "defaults": { "retention": 48, "archive": true },
            "streams": [
                { "name": "clicks", "shardCount": 2 },
                { "name": "views", "archiveTransformNewlines": true }
            ],
            "sharedResources": "reject"
        });

        let config = PluginConfig::from_value(&section).expect("parses");
        assert_eq!(config.shared_resources, SharedResourcePolicy::Reject);
        assert_eq!(config.streams.as_ref().map(Vec::len), Some(2));
        assert_eq!(config.defaults.as_ref().and_then(|d| d.retention), Some(48));
    }

    #[test]
    fn test_missing_streams_is_none() {
        let config = PluginConfig::from_value(&json!({ "defaults": {} })).unwrap();
        assert!(config.streams.is_none());
        assert_eq!(config.shared_resources, SharedResourcePolicy::LastWins);
        assert!(config.resolve_streams().unwrap().is_empty());
    }

    #[test]
    fn test_wrong_shape_is_parse_error() {
        let err = PluginConfig::from_value(&json!({ "streams": { "name": "x" } })).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = PluginConfig::from_value(&json!({ "streams": [{ "retention": "long" }] }))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_resolve_streams_in_order() {
        let config = PluginConfig::from_value(&json!({
            "defaults": { "retention": 72, "shardCount": 4 },
            "streams": [
                { "name": "Foo", "retention": 12 },
                { "name": "Bar", "shardCount": 8 }
            ]
        }))
        .unwrap();

        let resolved = config.resolve_streams().unwrap();
        let summary: Vec<_> = resolved
            .iter()
            .map(|s| (s.clean_name.as_str(), s.retention, s.shard_count))
            .collect();
        assert_eq!(summary, vec![("Foo", 12, 4), ("Bar", 72, 8)]);
    }

    #[test]
    fn test_resolve_streams_fails_on_unnamed_entry() {
        let config = PluginConfig::from_value(&json!({
            "streams": [{ "name": "ok" }, { "shardCount": 2 }]
        }))
        .unwrap();

        let err = config.resolve_streams().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidStream { index: 1, .. }));
    }
}
