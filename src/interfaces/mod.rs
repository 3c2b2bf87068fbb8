//! Abstract interfaces between the synthesis engine and its host.
//!
//! These traits define the contracts for:
//! - Lifecycle hooks (work the host runs at named lifecycle events)

pub mod hook;

pub use hook::{HookError, LifecycleHook};
