//! Bootstrap utilities for the kinesis-streams binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LOG_ENV_VAR;

/// Initialize tracing with the KINESIS_STREAMS_LOG environment variable.
///
/// Defaults to "info" level if KINESIS_STREAMS_LOG is not set. Logs go to
/// stderr so stdout stays free for rendered templates.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV_VAR)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Parse `--config <path>` / `--config=<path>` (or `-c <path>`) from the
/// process arguments.
pub fn parse_config_path() -> Option<String> {
    config_path_from_args(std::env::args().skip(1))
}

fn config_path_from_args(args: impl IntoIterator<Item = String>) -> Option<String> {
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--config" || arg == "-c" {
            return args.next();
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return Some(path.to_string());
        }
    }
    None
}
