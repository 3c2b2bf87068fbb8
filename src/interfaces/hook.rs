//! Lifecycle hook interface.
//!
//! A hook is bound to one named lifecycle event of the host and mutates the
//! host's [`ServiceContext`] when that event fires.

use crate::config::ConfigError;
use crate::host::ServiceContext;
use crate::synthesis::SynthesisError;

/// Result type for hook operations.
pub type Result<T> = std::result::Result<T, HookError>;

/// Errors from hook execution.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    #[error("hook '{hook}' failed during '{event}': {source}")]
    Failed {
        hook: String,
        event: String,
        #[source]
        source: Box<HookError>,
    },
}

/// A unit of work the host runs at a named point of its lifecycle.
///
/// # Example
///
/// ```ignore
/// struct Banner;
///
/// impl LifecycleHook for Banner {
///     fn name(&self) -> &str { "banner" }
///     fn event(&self) -> &str { "before:package:compileFunctions" }
///     fn run(&self, ctx: &mut ServiceContext) -> Result<()> {
///         tracing::info!(resources = ctx.resources().len(), "compiling");
///         Ok(())
///     }
/// }
/// ```
pub trait LifecycleHook {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Lifecycle event this hook is bound to.
    fn event(&self) -> &str;

    /// Run the hook against the host context.
    fn run(&self, ctx: &mut ServiceContext) -> Result<()>;
}
