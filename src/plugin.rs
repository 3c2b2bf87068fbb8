//! The kinesis-streams lifecycle hook.
//!
//! On `before:package:compileFunctions` the plugin reads
//! `custom.kinesis-streams`, resolves every declared stream, builds each
//! stream's resources and merges them into the compiled template. All streams
//! are resolved and built before anything is merged, and merges are staged
//! on a copy of the collection, so a failing run leaves the template as it
//! was.

use tracing::{debug, info};

use crate::config::{PluginConfig, SharedResourcePolicy, COMPILE_EVENT, NAMESPACE};
use crate::host::ServiceContext;
use crate::interfaces::hook::{LifecycleHook, Result};
use crate::resources;
use crate::synthesis::Synthesizer;

/// Hook that compiles declared streams into template resources.
#[derive(Debug, Clone, Default)]
pub struct KinesisStreamsPlugin {
    policy_override: Option<SharedResourcePolicy>,
}

impl KinesisStreamsPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `policy` regardless of what the service document declares.
    pub fn with_shared_resource_policy(mut self, policy: SharedResourcePolicy) -> Self {
        self.policy_override = Some(policy);
        self
    }

    /// Compile the plugin section of `ctx` into its resource collection.
    ///
    /// Returns the number of streams compiled; zero when the section or its
    /// stream list is absent.
    pub fn compile(&self, ctx: &mut ServiceContext) -> Result<usize> {
        let Some(section) = ctx.section(NAMESPACE).filter(|v| !v.is_null()) else {
            debug!(namespace = NAMESPACE, "no plugin section, nothing to compile");
            return Ok(0);
        };

        let config = PluginConfig::from_value(section)?;
        if config.streams.is_none() {
            debug!(namespace = NAMESPACE, "no streams declared, nothing to compile");
            return Ok(0);
        }

        let streams = config.resolve_streams()?;
        let built: Vec<_> = streams
            .iter()
            .map(|stream| (stream.name.as_str(), resources::build(stream)))
            .collect();

        let policy = self.policy_override.unwrap_or(config.shared_resources);
        let mut synth = Synthesizer::new(policy);
        let mut staged = ctx.resources().clone();
        let mut merged = 0;
        for (name, stream_resources) in &built {
            merged += synth.merge(&mut staged, name, stream_resources)?;
        }
        *ctx.resources_mut() = staged;

        info!(
            streams = built.len(),
            resources = merged,
            policy = ?policy,
            "compiled kinesis stream resources"
        );
        Ok(built.len())
    }
}

impl LifecycleHook for KinesisStreamsPlugin {
    fn name(&self) -> &str {
        NAMESPACE
    }

    fn event(&self) -> &str {
        COMPILE_EVENT
    }

    fn run(&self, ctx: &mut ServiceContext) -> Result<()> {
        self.compile(ctx).map(|_| ())
    }
}
