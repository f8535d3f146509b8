// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Stackforge.
//!
//! Pure business logic: documents and deep merge, the configuration
//! aggregate, entity descriptors, strategy resolution and manifest
//! construction. All I/O is handled via ports defined in the application
//! layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or environment access
//! - **No logging**: Non-fatal conditions are returned as [`GenerationWarning`]s
//! - **No global state**: Every run builds its own configuration
//!
// Public API - what the world sees
pub mod common;
pub mod document;
pub mod entities;
pub mod error;
pub mod generators;
pub mod manifest_builder;
pub mod reader;
pub mod strategies;
pub mod value_objects;
pub mod warning;

// Private implementation details - not visible outside domain
mod validation;

// Re-exports for convenience
pub use document::{DocumentFormat, Options, RawDocument, Value, deep_merge};
pub use entities::{
    ApplicationConfiguration, AssociationDescriptor, AssociationOptions,
    AuthenticationConfiguration, DependencySpec, DeploymentTarget, EntityDescriptor,
    FeatureConfiguration, FileSpec, GemConfiguration, Manifest, ManifestSection,
};
pub use error::{DomainError, ErrorCategory};
pub use generators::{GeneratorDef, resolve_generator};
pub use manifest_builder::build_manifest;
pub use strategies::{DatabaseFamily, StrategySet};
pub use value_objects::{
    AssociationKind, AttributeType, CssFramework, DatabaseKind, EmbeddingProvider, FeatureName,
    FormBuilder, Frontend, GeneratorKind, MonitoringTool, SearchEngine, Symbol, TemplateEngine,
    VectorStore,
};
pub use warning::{Concern, GenerationWarning, Resolution};

pub use validation::DomainValidator;

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Value {
        RawDocument::yaml("test", text).parse().unwrap()
    }

    fn manifest_for(text: &str) -> (Manifest, Vec<GenerationWarning>) {
        let doc = doc(text);
        let target = reader::read_deployment(&doc).unwrap();
        let config = reader::read_application(&doc).unwrap();
        let entities = reader::read_entities(&doc).unwrap();
        DomainValidator::validate_entities(&entities).unwrap();
        let (strategies, warnings) = StrategySet::resolve(Some(&target.generator_kind()), &config);
        (
            build_manifest(&config, &strategies, &entities).unwrap(),
            warnings,
        )
    }

    // ========================================================================
    // Document → manifest
    // ========================================================================

    #[test]
    fn cdktf_framework_falls_back_to_default_generator() {
        let (manifest, warnings) =
            manifest_for("provider: aws\nframework: cdktf\nenvironment: dev");

        assert!(manifest.file("Gemfile").is_some());
        assert_eq!(
            warnings,
            [GenerationWarning::unsupported(
                Concern::Generator,
                "cdktf",
                "mvc"
            )]
        );
    }

    #[test]
    fn express_generator_with_unknown_database_uses_document_store() {
        let (manifest, warnings) = manifest_for(
            "provider: heroku\nframework: express\nenvironment: prod\ndatabase: cockroachdb",
        );

        assert!(manifest.file("src/config/database.js").is_some());
        assert_eq!(
            manifest.file("src/config/database.js").unwrap().generator_id,
            "database/mongodb"
        );
        assert!(manifest.dependencies().iter().any(|d| d.name == "mongoose"));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn user_entity_block_is_emitted_once() {
        let (manifest, _) = manifest_for(
            r#"
provider: aws
framework: rails
environment: dev
models:
  User:
    attributes: { email: string, name: string }
    associations:
      - { kind: has_many, name: posts, attrs: { dependent: "destroy" } }
"#,
        );

        let models: Vec<_> = manifest
            .files()
            .iter()
            .filter(|f| f.generator_id == "mvc/model")
            .collect();
        assert_eq!(models.len(), 1);
        assert_eq!(
            models[0].parameters["associations"][0]["attrs"]["dependent"],
            serde_json::json!("destroy")
        );
    }

    #[test]
    fn qdrant_is_recognized_and_emits_nothing() {
        let (manifest, warnings) = manifest_for(
            "provider: aws\nframework: rails\nenvironment: dev\nvector_db: qdrant",
        );

        assert_eq!(manifest.files_in(&ManifestSection::VectorStore).count(), 0);
        assert_eq!(
            warnings,
            [GenerationWarning::stub(Concern::VectorStore, "qdrant")]
        );
    }
}
