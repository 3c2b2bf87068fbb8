//! kinesis-streams-synth: compile a service document's streams into a template
//!
//! Reads a service document, dispatches the configured lifecycle event to the
//! kinesis-streams plugin, and writes the compiled template as JSON.
//!
//! ## Architecture
//! ```text
//! serverless.yml ──> [ServiceContext] ──(before:package:compileFunctions)──> [KinesisStreamsPlugin]
//!                                                                                   |
//!                                                                                   v
//!                                                            compiledCloudFormationTemplate (JSON)
//! ```
//!
//! ## Configuration
//! - `--config <file>` / KINESIS_STREAMS_CONFIG: tool configuration file
//! - KINESIS_STREAMS__SERVICE_FILE: service document (default: serverless.yml)
//! - KINESIS_STREAMS__OUTPUT: output file (default: stdout)
//! - KINESIS_STREAMS__PRETTY: pretty-print JSON (default: true)
//! - KINESIS_STREAMS_LOG: log filter (default: info)

use std::io::Write;

use tracing::{error, info};

use kinesis_streams::config::Config;
use kinesis_streams::host::{Lifecycle, ServiceContext};
use kinesis_streams::plugin::KinesisStreamsPlugin;
use kinesis_streams::utils::bootstrap::{init_tracing, parse_config_path};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config_path = parse_config_path();
    let config = Config::load(config_path.as_deref()).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    let mut ctx = ServiceContext::from_file(&config.service_file).map_err(|e| {
        error!(path = %config.service_file, "Failed to load service document: {}", e);
        e
    })?;

    let mut lifecycle = Lifecycle::new();
    lifecycle.register(KinesisStreamsPlugin::new());
    lifecycle.run(&config.event, &mut ctx).map_err(|e| {
        error!(event = %config.event, "Lifecycle event failed: {}", e);
        e
    })?;

    let rendered = ctx.template_json(config.pretty)?;
    match &config.output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            info!(path = %path, resources = ctx.resources().len(), "template written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{rendered}")?;
        }
    }

    Ok(())
}
