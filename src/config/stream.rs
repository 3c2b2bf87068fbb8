//! Per-stream configuration and its resolution.
//!
//! A stream's effective configuration is the built-in baseline, overlaid with
//! the section-wide defaults, overlaid with the stream's own fields. Later
//! layers win field by field; `tags` merge recursively.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::template::merge::merge_objects;
use crate::validation::validate_stream_name;

use super::ConfigError;

/// Default retention period in hours.
pub const DEFAULT_RETENTION_HOURS: u32 = 24;
/// Default number of shards.
pub const DEFAULT_SHARD_COUNT: u32 = 1;
/// KMS key used for stream encryption unless overridden.
pub const DEFAULT_KEY_ALIAS: &str = "alias/aws/kinesis";

/// Stream encryption setting as written by the user.
///
/// Accepts a key id or alias, a boolean, or an explicit `null`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum KeySetting {
    Enabled(bool),
    Key(String),
    Cleared,
}

impl KeySetting {
    /// The key to encrypt with, or `None` when encryption is disabled.
    pub fn key_id(&self) -> Option<String> {
        match self {
            KeySetting::Enabled(true) => Some(DEFAULT_KEY_ALIAS.to_string()),
            KeySetting::Key(key) if !key.is_empty() => Some(key.clone()),
            _ => None,
        }
    }
}

/// Absent means "inherit"; an explicit `null` is kept as [`KeySetting::Cleared`].
fn explicit_key_setting<'de, D>(deserializer: D) -> Result<Option<KeySetting>, D::Error>
where
    D: Deserializer<'de>,
{
    KeySetting::deserialize(deserializer).map(Some)
}

/// Optional stream fields shared by the defaults record and each stream.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StreamOverrides {
    /// Retention period in hours.
    pub retention: Option<u32>,
    pub shard_count: Option<u32>,
    /// KMS key id or alias; `false` disables encryption.
    #[serde(deserialize_with = "explicit_key_setting")]
    pub key_id: Option<KeySetting>,
    /// Drain the stream into the shared archive bucket.
    pub archive: Option<bool>,
    /// Requested archive bucket name.
    pub archive_bucket: Option<String>,
    /// Append a newline to every archived record.
    pub archive_transform_newlines: Option<bool>,
    pub tags: Option<Map<String, Value>>,
}

impl StreamOverrides {
    /// Built-in values every stream starts from.
    pub fn baseline() -> Self {
        Self {
            retention: Some(DEFAULT_RETENTION_HOURS),
            shard_count: Some(DEFAULT_SHARD_COUNT),
            key_id: Some(KeySetting::Key(DEFAULT_KEY_ALIAS.to_string())),
            archive: Some(false),
            archive_bucket: None,
            archive_transform_newlines: Some(false),
            tags: None,
        }
    }

    /// Overlay `other` onto `self`. Only fields set in `other` replace
    /// values in `self`; tag maps merge key by key.
    pub fn overlay(&mut self, other: &StreamOverrides) {
        macro_rules! overlay_field {
            ($field:ident) => {
                if other.$field.is_some() {
                    self.$field = other.$field.clone();
                }
            };
        }

        overlay_field!(retention);
        overlay_field!(shard_count);
        overlay_field!(key_id);
        overlay_field!(archive);
        overlay_field!(archive_bucket);
        overlay_field!(archive_transform_newlines);

        if let Some(overlay_tags) = &other.tags {
            let tags = self.tags.get_or_insert_with(Map::new);
            merge_objects(tags, overlay_tags.clone());
        }
    }
}

/// One entry of the `streams` list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StreamSpec {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub overrides: StreamOverrides,
}

impl StreamSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            overrides: StreamOverrides::default(),
        }
    }
}

/// Fully-resolved configuration for one stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStreamConfig {
    /// Display name of the stream.
    pub name: String,
    /// Identifier fragment derived from `name`.
    pub clean_name: String,
    pub retention: u32,
    pub shard_count: u32,
    /// `None` disables server-side encryption.
    pub key_id: Option<String>,
    pub archive: bool,
    pub archive_bucket: Option<String>,
    pub archive_transform_newlines: bool,
    /// Non-empty tag map, if any.
    pub tags: Option<Map<String, Value>>,
}

/// Resolve one stream against the section defaults.
///
/// `index` is the stream's position in the declared list and only feeds
/// error messages.
pub fn resolve(
    index: usize,
    stream: &StreamSpec,
    defaults: &StreamOverrides,
) -> Result<ResolvedStreamConfig, ConfigError> {
    let clean_name = validate_stream_name(stream.name.as_deref())
        .map_err(|source| ConfigError::InvalidStream { index, source })?;
    let name = stream.name.clone().unwrap_or_default();

    let mut merged = StreamOverrides::baseline();
    merged.overlay(defaults);
    merged.overlay(&stream.overrides);

    Ok(ResolvedStreamConfig {
        name,
        clean_name,
        retention: merged.retention.unwrap_or(DEFAULT_RETENTION_HOURS),
        shard_count: merged.shard_count.unwrap_or(DEFAULT_SHARD_COUNT),
        key_id: merged.key_id.as_ref().and_then(KeySetting::key_id),
        archive: merged.archive.unwrap_or(false),
        archive_bucket: merged.archive_bucket.filter(|b| !b.is_empty()),
        archive_transform_newlines: merged.archive_transform_newlines.unwrap_or(false),
        tags: merged.tags.filter(|t| !t.is_empty()),
    })
}
