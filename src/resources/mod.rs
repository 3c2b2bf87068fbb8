//! Resource graph construction for a single stream.
//!
//! [`build`] turns one [`ResolvedStreamConfig`] into a [`ResourceMap`]:
//!
//! ```text
//! <Clean>KinesisStream ─────────────┐
//!                                   v            (archive: true)
//! KinesisStreamsArchiveBucket <── <Clean>KinesisFirehose ──> KinesisStreamsDeliveryLogGroup
//!            ^                      │   │
//!            └── KinesisStreamsDeliveryRole
//!                                       └──> KinesisStreamsNewlineTransform  (archiveTransformNewlines)
//!                                                  └── KinesisStreamsNewlineTransformRole
//! ```
//!
//! The archival resources other than the delivery stream use fixed
//! identifiers and are shared by every archiving stream in a deployment.

pub mod archive;
pub mod stream;
pub mod transform;


use tracing::debug;

use crate::config::ResolvedStreamConfig;
use crate::template::ResourceMap;

/// Archive bucket identifier.
pub const ARCHIVE_BUCKET_ID: &str = "KinesisStreamsArchiveBucket";
/// Delivery role identifier.
pub const DELIVERY_ROLE_ID: &str = "KinesisStreamsDeliveryRole";
/// Delivery log group identifier.
pub const DELIVERY_LOG_GROUP_ID: &str = "KinesisStreamsDeliveryLogGroup";
/// Newline transform function identifier.
pub const TRANSFORM_FUNCTION_ID: &str = "KinesisStreamsNewlineTransform";
/// Newline transform execution role identifier.
pub const TRANSFORM_ROLE_ID: &str = "KinesisStreamsNewlineTransformRole";

/// Identifiers shared across streams rather than qualified by stream name.
pub const SHARED_RESOURCE_IDS: [&str; 5] = [
    ARCHIVE_BUCKET_ID,
    DELIVERY_ROLE_ID,
    DELIVERY_LOG_GROUP_ID,
    TRANSFORM_FUNCTION_ID,
    TRANSFORM_ROLE_ID,
];

/// Whether `id` names one of the shared archival resources.
pub fn is_shared(id: &str) -> bool {
    SHARED_RESOURCE_IDS.contains(&id)
}

/// Identifier of a stream's `AWS::Kinesis::Stream`.
pub fn stream_id(clean_name: &str) -> String {
    format!("{clean_name}KinesisStream")
}

/// Identifier of a stream's `AWS::KinesisFirehose::DeliveryStream`.
pub fn delivery_stream_id(clean_name: &str) -> String {
    format!("{clean_name}KinesisFirehose")
}

/// Build every resource declaration for one stream.
pub fn build(config: &ResolvedStreamConfig) -> ResourceMap {
    let mut resources = ResourceMap::new();
    resources.insert(stream_id(&config.clean_name), stream::kinesis_stream(config));

    if config.archive {
        resources.insert(ARCHIVE_BUCKET_ID, archive::bucket(config));
        resources.insert(DELIVERY_ROLE_ID, archive::delivery_role(config));
        resources.insert(DELIVERY_LOG_GROUP_ID, archive::log_group());

        if config.archive_transform_newlines {
            resources.insert(TRANSFORM_ROLE_ID, transform::execution_role());
            resources.insert(TRANSFORM_FUNCTION_ID, transform::function());
        }

        resources.insert(
            delivery_stream_id(&config.clean_name),
            archive::delivery_stream(config),
        );
    }

    debug!(
        stream = %config.name,
        archive = config.archive,
        resources = resources.len(),
        "built stream resources"
    );
    resources
}
