//! Infrastructure adapters for Stackforge.
//!
//! This crate implements the ports defined in `stackforge-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod environment;
pub mod source;

// Re-export commonly used adapters
pub use environment::{MapEnvironment, ProcessEnvironment};
pub use source::{DirectorySource, MemorySource};
