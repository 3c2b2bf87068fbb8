//! kinesis-streams - declarative Kinesis streams for serverless services
//!
//! Reads the `custom.kinesis-streams` section of a service document and
//! compiles each declared stream into CloudFormation resources: the stream
//! itself, and optionally a Firehose archive pipeline (bucket, delivery role,
//! log group, delivery stream) with a newline-appending record transform.
//! Resources are merged into the service's compiled template during the
//! `before:package:compileFunctions` lifecycle event.

pub mod config;
pub mod host;
pub mod interfaces;
pub mod plugin;
pub mod record_processor;
pub mod resources;
pub mod synthesis;
pub mod template;
pub mod utils;
pub mod validation;

pub use plugin::KinesisStreamsPlugin;
