//! Stackforge Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Stackforge
//! generator, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          stackforge-cli (CLI)           │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (ConfigurationLoader, GenerationRun)    │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │  (Driven: DocumentSource, Environment)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   stackforge-adapters (Infrastructure)  │
//! │ (DirectorySource, ProcessEnvironment)   │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (deep merge, strategies, manifest)      │
//! │         No External Dependencies        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stackforge_core::prelude::*;
//!
//! // 1. Load and merge the documents (adapters injected)
//! let loader = ConfigurationLoader::new(source, environment);
//! let resolved = loader.load("app")?;
//!
//! // 2. Drive a run to a manifest
//! let mut run = GenerationRun::from_resolved(resolved)?;
//! let manifest = run.execute()?;
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ConfigurationLoader, GenerationRun, ResolvedConfiguration, RunState,
        ports::{DocumentSource, Environment},
    };
    pub use crate::domain::{
        ApplicationConfiguration, DeploymentTarget, DocumentFormat, EntityDescriptor,
        GenerationWarning, GeneratorKind, Manifest, ManifestSection, RawDocument, StrategySet,
        deep_merge,
    };
    pub use crate::error::{ForgeError, ForgeResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
