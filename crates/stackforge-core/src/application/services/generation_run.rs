//! Generation Run - one configuration in, one manifest out.
//!
//! A run moves through its states in one direction only:
//!
//! ```text
//! Unconfigured ──apply_configuration──▶ Loaded ──resolve──▶ Resolved ──build_manifest──▶ Manifested
//! ```
//!
//! `models` may be called while `Loaded`. `execute` drives a `Loaded` or
//! `Resolved` run to the end. Any other call order fails with
//! `OutOfSequence`, and a finished run cannot be reused.

use serde::Serialize;
use std::fmt;
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use crate::{
    application::{ApplicationError, services::ResolvedConfiguration},
    domain::{
        ApplicationConfiguration, DomainValidator, EntityDescriptor, GenerationWarning,
        GeneratorKind, Manifest, StrategySet, build_manifest,
    },
    error::ForgeResult,
};

/// Lifecycle state of a [`GenerationRun`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Unconfigured,
    Loaded,
    Resolved,
    Manifested,
}

impl RunState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unconfigured => "unconfigured",
            Self::Loaded => "loaded",
            Self::Resolved => "resolved",
            Self::Manifested => "manifested",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single generation run.
///
/// Owns its configuration; nothing is shared between runs.
#[derive(Debug)]
pub struct GenerationRun {
    id: Uuid,
    state: RunState,
    generator: Option<GeneratorKind>,
    config: Option<ApplicationConfiguration>,
    entities: Vec<EntityDescriptor>,
    strategies: Option<StrategySet>,
    warnings: Vec<GenerationWarning>,
    manifest: Option<Manifest>,
}

impl Default for GenerationRun {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationRun {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: RunState::Unconfigured,
            generator: None,
            config: None,
            entities: Vec::new(),
            strategies: None,
            warnings: Vec::new(),
            manifest: None,
        }
    }

    /// Select the generator. Without one the default generator is used.
    pub fn with_generator(mut self, generator: GeneratorKind) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Start a run from a loaded configuration: generator, settings and
    /// models applied, load warnings carried over.
    pub fn from_resolved(resolved: ResolvedConfiguration) -> ForgeResult<Self> {
        let mut run = Self::new().with_generator(resolved.generator);
        run.warnings = resolved.warnings;
        run.apply_configuration(resolved.application)?;
        run.models(resolved.entities)?;
        Ok(run)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn configuration(&self) -> Option<&ApplicationConfiguration> {
        self.config.as_ref()
    }

    pub fn entities(&self) -> &[EntityDescriptor] {
        &self.entities
    }

    pub fn strategies(&self) -> Option<&StrategySet> {
        self.strategies.as_ref()
    }

    /// Every warning recorded so far, loading included.
    pub fn warnings(&self) -> &[GenerationWarning] {
        &self.warnings
    }

    pub fn manifest(&self) -> Option<&Manifest> {
        self.manifest.as_ref()
    }

    pub fn into_manifest(self) -> Option<Manifest> {
        self.manifest
    }

    /// `Unconfigured → Loaded`.
    pub fn apply_configuration(&mut self, config: ApplicationConfiguration) -> ForgeResult<()> {
        self.expect("apply configuration", RunState::Unconfigured)?;
        self.config = Some(config);
        self.state = RunState::Loaded;
        debug!(run_id = %self.id, "Configuration applied");
        Ok(())
    }

    /// Replace the run's models. Only valid while `Loaded`.
    pub fn models(&mut self, entities: Vec<EntityDescriptor>) -> ForgeResult<()> {
        self.expect("set models", RunState::Loaded)?;
        DomainValidator::validate_entities(&entities)?;
        debug!(run_id = %self.id, count = entities.len(), "Models set");
        self.entities = entities;
        Ok(())
    }

    /// `Loaded → Resolved`: pick a strategy for every concern.
    pub fn resolve(&mut self) -> ForgeResult<&StrategySet> {
        self.expect("resolve strategies", RunState::Loaded)?;
        let _span = info_span!("resolve", run_id = %self.id).entered();

        let config = self.loaded_config()?;
        let (strategies, warnings) = StrategySet::resolve(self.generator.as_ref(), config);
        for warning in &warnings {
            warn!(%warning, "Strategy fallback");
        }
        debug!(generator = %strategies.generator.id(), "Strategies resolved");

        self.warnings.extend(warnings);
        self.state = RunState::Resolved;
        Ok(&*self.strategies.insert(strategies))
    }

    /// `Resolved → Manifested`. On error the run stays `Resolved` and no
    /// manifest is kept.
    pub fn build_manifest(&mut self) -> ForgeResult<&Manifest> {
        self.expect("build the manifest", RunState::Resolved)?;
        let _span = info_span!("build_manifest", run_id = %self.id).entered();

        let config = self.loaded_config()?;
        let strategies = self.strategies.as_ref().ok_or(ApplicationError::OutOfSequence {
            operation: "build the manifest",
            expected: RunState::Resolved,
            actual: self.state,
        })?;
        let manifest = build_manifest(config, strategies, &self.entities)?;
        info!(
            files = manifest.files().len(),
            dependencies = manifest.dependencies().len(),
            notes = manifest.notes().len(),
            "Manifest built"
        );

        self.state = RunState::Manifested;
        Ok(&*self.manifest.insert(manifest))
    }

    /// Run every remaining step and return the manifest.
    pub fn execute(&mut self) -> ForgeResult<&Manifest> {
        match self.state {
            RunState::Loaded => {
                self.resolve()?;
            }
            RunState::Resolved => {}
            actual => {
                return Err(ApplicationError::OutOfSequence {
                    operation: "execute",
                    expected: RunState::Loaded,
                    actual,
                }
                .into());
            }
        }
        self.build_manifest()
    }

    fn expect(&self, operation: &'static str, expected: RunState) -> ForgeResult<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ApplicationError::OutOfSequence {
                operation,
                expected,
                actual: self.state,
            }
            .into())
        }
    }

    fn loaded_config(&self) -> ForgeResult<&ApplicationConfiguration> {
        self.config.as_ref().ok_or_else(|| {
            ApplicationError::OutOfSequence {
                operation: "read the configuration",
                expected: RunState::Loaded,
                actual: self.state,
            }
            .into()
        })
    }
}
