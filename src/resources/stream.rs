//! The `AWS::Kinesis::Stream` declaration.

use serde_json::Value;

use crate::config::ResolvedStreamConfig;
use crate::template::{Expr, Resource};

pub const RESOURCE_TYPE: &str = "AWS::Kinesis::Stream";

/// Declare the stream itself.
///
/// Encryption is attached only when a key is configured; tags only when the
/// resolved tag map is non-empty, and then verbatim.
pub fn kinesis_stream(config: &ResolvedStreamConfig) -> Resource {
    let encryption = config.key_id.as_ref().map(|key| {
        Expr::map([
            ("EncryptionType", Expr::from("KMS")),
            ("KeyId", Expr::from(key.as_str())),
        ])
    });

    let tags = config
        .tags
        .as_ref()
        .map(|tags| Expr::Json(Value::Object(tags.clone())));

    Resource::new(RESOURCE_TYPE)
        .with("Name", config.name.as_str())
        .with("RetentionPeriodHours", config.retention)
        .with("ShardCount", config.shard_count)
        .with_opt("StreamEncryption", encryption)
        .with_opt("Tags", tags)
}
