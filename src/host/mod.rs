//! Host-side model: the service document and its lifecycle.
//!
//! The [`ServiceContext`] is the part of a service document the synthesis
//! engine reads (`custom`) and writes (`provider.compiledCloudFormationTemplate.Resources`).
//! Everything else in the document is carried through untouched.
//! [`Lifecycle`] dispatches named events to registered hooks.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::interfaces::{HookError, LifecycleHook};

/// Errors from loading or writing service documents.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("Failed to read service document '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse service document as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to parse or render JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// `provider.compiledCloudFormationTemplate`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CompiledTemplate {
    #[serde(rename = "Resources", default)]
    pub resources: Map<String, Value>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// `provider`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Provider {
    #[serde(rename = "compiledCloudFormationTemplate", default)]
    pub compiled_template: CompiledTemplate,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// The host context handed to lifecycle hooks.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ServiceContext {
    /// User-defined sections, keyed by plugin namespace.
    #[serde(default)]
    pub custom: Map<String, Value>,
    #[serde(default)]
    pub provider: Provider,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl ServiceContext {
    pub fn from_yaml_str(content: &str) -> Result<Self, HostError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, HostError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a service document; `.json` files are parsed as JSON, anything
    /// else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, HostError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| HostError::Read {
            path: path.display().to_string(),
            source,
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }

    /// The `custom.<namespace>` section, if declared.
    pub fn section(&self, namespace: &str) -> Option<&Value> {
        self.custom.get(namespace)
    }

    /// The compiled template's resource collection.
    pub fn resources(&self) -> &Map<String, Value> {
        &self.provider.compiled_template.resources
    }

    pub fn resources_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.provider.compiled_template.resources
    }

    /// The compiled template as a JSON value.
    pub fn template(&self) -> Result<Value, HostError> {
        Ok(serde_json::to_value(&self.provider.compiled_template)?)
    }

    /// The compiled template rendered as JSON text.
    pub fn template_json(&self, pretty: bool) -> Result<String, HostError> {
        let template = &self.provider.compiled_template;
        let rendered = if pretty {
            serde_json::to_string_pretty(template)?
        } else {
            serde_json::to_string(template)?
        };
        Ok(rendered)
    }
}

/// Registered hooks, dispatched by event name in registration order.
#[derive(Default)]
pub struct Lifecycle {
    hooks: Vec<Box<dyn LifecycleHook>>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook.
    pub fn register(&mut self, hook: impl LifecycleHook + 'static) -> &mut Self {
        debug!(hook = hook.name(), event = hook.event(), "registered lifecycle hook");
        self.hooks.push(Box::new(hook));
        self
    }

    /// Run every hook bound to `event`, stopping at the first failure.
    ///
    /// Returns the number of hooks run.
    pub fn run(&self, event: &str, ctx: &mut ServiceContext) -> Result<usize, HookError> {
        let mut ran = 0;
        for hook in self.hooks.iter().filter(|h| h.event() == event) {
            hook.run(ctx).map_err(|source| HookError::Failed {
                hook: hook.name().to_string(),
                event: event.to_string(),
                source: Box::new(source),
            })?;
            ran += 1;
        }
        info!(event, hooks = ran, "lifecycle event complete");
        Ok(ran)
    }
}
