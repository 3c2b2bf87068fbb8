//! Configuration.
//!
//! Two layers live here:
//! - the plugin section of a service document (`custom.kinesis-streams`),
//!   parsed and resolved per stream by [`plugin`] and [`stream`]
//! - the synthesis tool's own settings ([`Config`]), loaded from YAML files
//!   and environment variables

pub mod plugin;
pub mod stream;

pub use plugin::{PluginConfig, SharedResourcePolicy};
pub use stream::{
    resolve, KeySetting, ResolvedStreamConfig, StreamOverrides, StreamSpec, DEFAULT_KEY_ALIAS,
    DEFAULT_RETENTION_HOURS, DEFAULT_SHARD_COUNT,
};

use serde::Deserialize;

use crate::validation::ValidationError;

/// Key of the plugin section under the service document's `custom` map.
pub const NAMESPACE: &str = "kinesis-streams";
/// Lifecycle event the plugin hooks into.
pub const COMPILE_EVENT: &str = "before:package:compileFunctions";

/// Default tool configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "kinesis-streams.yaml";
/// Environment variable for tool configuration file path.
pub const CONFIG_ENV_VAR: &str = "KINESIS_STREAMS_CONFIG";
/// Prefix for tool configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "KINESIS_STREAMS";
/// Environment variable for logging configuration.
pub const LOG_ENV_VAR: &str = "KINESIS_STREAMS_LOG";

/// Default service document path.
pub const DEFAULT_SERVICE_FILE: &str = "serverless.yml";

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid stream #{index}: {source}")]
    InvalidStream {
        index: usize,
        #[source]
        source: ValidationError,
    },

    #[error("Failed to load tool configuration: {0}")]
    Load(#[from] ::config::ConfigError),
}

/// Settings of the synthesis tool.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service document to read (YAML or JSON).
    pub service_file: String,
    /// Where to write the compiled template. `None` writes to stdout.
    pub output: Option<String>,
    /// Pretty-print the template JSON.
    pub pretty: bool,
    /// Lifecycle event to dispatch.
    pub event: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_file: DEFAULT_SERVICE_FILE.to_string(),
            output: None,
            pretty: true,
            event: COMPILE_EVENT.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Configuration sources (in order of priority, later overrides earlier):
    /// 1. `kinesis-streams.yaml` in current directory (if exists)
    /// 2. File specified by `path` argument (if provided)
    /// 3. File specified by `CONFIG_ENV_VAR` environment variable (if set)
    /// 4. Environment variables with `CONFIG_ENV_PREFIX` prefix
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        use ::config::{Config as ConfigLib, Environment, File, FileFormat};

        let mut builder = ConfigLib::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::new(config_path, FileFormat::Yaml).required(true));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&config_path, FileFormat::Yaml).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
