use serde::Serialize;

use crate::domain::value_objects::{GeneratorKind, Symbol};

/// Where and for what a project is generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentTarget {
    pub provider: Symbol,
    pub framework: Symbol,
    pub environment: Symbol,
    pub region: Option<String>,
    /// Explicit `generator` key. Takes precedence over `framework` for
    /// generator dispatch.
    pub generator: Option<Symbol>,
}

impl DeploymentTarget {
    /// Id of the override document: `{provider}-{framework}-{environment}`.
    pub fn override_id(&self) -> String {
        format!("{}-{}-{}", self.provider, self.framework, self.environment)
    }

    /// Generator requested by the documents.
    pub fn generator_kind(&self) -> GeneratorKind {
        GeneratorKind::parse(self.generator.as_ref().unwrap_or(&self.framework).as_str())
    }
}
