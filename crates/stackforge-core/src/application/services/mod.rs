//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "load a configuration" or "build a manifest".

pub mod generation_run;
pub mod loader;

pub use generation_run::{GenerationRun, RunState};
pub use loader::{ConfigurationLoader, ResolvedConfiguration};
