//! Configuration Loader - documents in, domain values out.
//!
//! Loading a run's configuration takes these steps:
//! 1. Fetch and parse the base document
//! 2. Fetch the optional override document `{provider}-{framework}-{environment}`
//! 3. Deep-merge the override over the base
//! 4. Apply the region environment variable
//! 5. Read deployment, application settings and models from the result,
//!    falling back to the base alone when the override broke them

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{DocumentSource, Environment},
    },
    domain::{
        ApplicationConfiguration, DeploymentTarget, DomainError, EntityDescriptor, GenerationWarning,
        GeneratorKind, RawDocument, Value, deep_merge,
        document::scalar_string,
        reader::{read_application, read_deployment, read_entities},
    },
    error::ForgeResult,
};

/// Everything a generation run needs, read from the merged documents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConfiguration {
    pub deployment: DeploymentTarget,
    pub generator: GeneratorKind,
    pub application: ApplicationConfiguration,
    pub entities: Vec<EntityDescriptor>,
    /// Non-fatal problems met while loading.
    pub warnings: Vec<GenerationWarning>,
    /// The merged document the values above were read from.
    #[serde(skip)]
    pub document: Value,
}

/// Loads and merges declarative documents.
pub struct ConfigurationLoader {
    source: Box<dyn DocumentSource>,
    environment: Box<dyn Environment>,
    region_var: String,
}

impl ConfigurationLoader {
    /// Environment variable that overrides the merged `region`.
    pub const DEFAULT_REGION_VAR: &'static str = "STACKFORGE_REGION";

    pub fn new(source: Box<dyn DocumentSource>, environment: Box<dyn Environment>) -> Self {
        Self {
            source,
            environment,
            region_var: Self::DEFAULT_REGION_VAR.to_string(),
        }
    }

    pub fn with_region_var(mut self, name: impl Into<String>) -> Self {
        self.region_var = name.into();
        self
    }

    pub fn region_var(&self) -> &str {
        &self.region_var
    }

    /// Load the base document `base_id` and everything it pulls in.
    ///
    /// # Errors
    ///
    /// - `ConfigurationNotFound` when the base (or an explicit
    ///   `models_source`) is missing or unreadable
    /// - `ConfigurationParse` when one of them is malformed
    /// - `MissingRequiredField` when a deployment key is absent
    ///
    /// A broken override document is not an error: it is skipped with an
    /// `OverrideIgnored` warning. That covers overrides that fail to parse
    /// and overrides whose values have the wrong shape once merged.
    #[instrument(skip(self), fields(region_var = %self.region_var))]
    pub fn load(&self, base_id: &str) -> ForgeResult<ResolvedConfiguration> {
        let mut warnings = Vec::new();

        let base = self.required(base_id)?;
        let target = read_deployment(&base)?;
        let override_id = target.override_id();

        let overrides = self.overrides(base_id, &override_id, &mut warnings);
        let (merged, (deployment, application, mut entities)) = match overrides {
            Some(overrides) => {
                let merged = self.with_region(deep_merge(&base, &overrides));
                match read_settings(&merged) {
                    Ok(settings) => (merged, settings),
                    Err(e) => {
                        warnings.push(GenerationWarning::OverrideIgnored {
                            id: override_id.clone(),
                            reason: e.to_string(),
                        });
                        let base = self.with_region(base);
                        let settings = read_settings(&base)?;
                        (base, settings)
                    }
                }
            }
            None => {
                let base = self.with_region(base);
                let settings = read_settings(&base)?;
                (base, settings)
            }
        };

        if let Some(models_id) = scalar_string(&merged, "models_source") {
            let models = self.required(&models_id)?;
            let extra = read_entities(&models)?;
            debug!(source = %models_id, count = extra.len(), "Models loaded from co-located document");
            entities.extend(extra);
        }

        for warning in &warnings {
            warn!(%warning, "Configuration warning");
        }
        info!(
            deployment = %override_id,
            entities = entities.len(),
            gems = application.gems().len(),
            "Configuration loaded"
        );

        Ok(ResolvedConfiguration {
            generator: deployment.generator_kind(),
            deployment,
            application,
            entities,
            warnings,
            document: merged,
        })
    }

    /// Apply the region environment variable, if set.
    fn with_region(&self, mut doc: Value) -> Value {
        let region = self
            .environment
            .var(&self.region_var)
            .filter(|region| !region.trim().is_empty());
        if let (Some(region), Some(map)) = (region, doc.as_mapping_mut()) {
            debug!(%region, "Region taken from environment");
            map.insert(Value::from("region"), Value::from(region));
        }
        doc
    }

    /// Fetch and parse a document that must exist.
    fn required(&self, id: &str) -> ForgeResult<Value> {
        let raw = self
            .source
            .fetch(id)?
            .ok_or_else(|| ApplicationError::not_found(id))?;
        parse(&raw).map_err(Into::into)
    }

    /// Fetch and parse the override document, if there is a usable one.
    fn overrides(
        &self,
        base_id: &str,
        override_id: &str,
        warnings: &mut Vec<GenerationWarning>,
    ) -> Option<Value> {
        if override_id == base_id {
            return None;
        }

        let ignored = |reason: String| GenerationWarning::OverrideIgnored {
            id: override_id.to_string(),
            reason,
        };

        match self.source.fetch(override_id) {
            Ok(None) => {
                debug!(id = %override_id, "No override document");
                None
            }
            Ok(Some(raw)) => match raw.parse() {
                Ok(doc) => {
                    debug!(id = %override_id, format = %raw.format, "Override document applied");
                    Some(doc)
                }
                Err(reason) => {
                    warnings.push(ignored(reason));
                    None
                }
            },
            Err(e) => {
                warnings.push(ignored(e.to_string()));
                None
            }
        }
    }
}

type Settings = (DeploymentTarget, ApplicationConfiguration, Vec<EntityDescriptor>);

fn read_settings(doc: &Value) -> Result<Settings, DomainError> {
    Ok((read_deployment(doc)?, read_application(doc)?, read_entities(doc)?))
}

fn parse(raw: &RawDocument) -> Result<Value, ApplicationError> {
    raw.parse()
        .map_err(|reason| ApplicationError::ConfigurationParse {
            id: raw.id.clone(),
            reason,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockDocumentSource, MockEnvironment};
    use crate::domain::DatabaseKind;
    use crate::error::ForgeError;
    use serde_json::json;
    use std::collections::HashMap;

    const BASE: &str = "provider: aws\nframework: rails\nenvironment: dev\nregion: eu-west-1\n";

    fn source(docs: &[(&str, &str)]) -> Box<MockDocumentSource> {
        let docs: HashMap<String, String> = docs
            .iter()
            .map(|(id, text)| (id.to_string(), text.to_string()))
            .collect();
        let mut source = MockDocumentSource::new();
        source
            .expect_fetch()
            .returning(move |id| Ok(docs.get(id).map(|text| RawDocument::yaml(id, text.as_str()))));
        Box::new(source)
    }

    fn no_env() -> Box<MockEnvironment> {
        let mut env = MockEnvironment::new();
        env.expect_var().returning(|_| None);
        Box::new(env)
    }

    fn loader(docs: &[(&str, &str)]) -> ConfigurationLoader {
        ConfigurationLoader::new(source(docs), no_env())
    }

    #[test]
    fn base_only_loads_without_warnings() {
        let resolved = loader(&[("app", BASE)]).load("app").unwrap();

        assert_eq!(resolved.deployment.override_id(), "aws-rails-dev");
        assert_eq!(resolved.generator, GeneratorKind::Mvc);
        assert_eq!(resolved.deployment.region.as_deref(), Some("eu-west-1"));
        assert!(resolved.warnings.is_empty());
    }

    #[test]
    fn absent_override_returns_base_unchanged() {
        let text = "provider: aws\nframework: cdktf\nenvironment: dev";
        let resolved = loader(&[("app", text)]).load("app").unwrap();

        assert_eq!(resolved.document, RawDocument::yaml("app", text).parse().unwrap());
        assert!(resolved.warnings.is_empty());
    }

    #[test]
    fn override_database_options_are_taken_as_given() {
        let base = format!("{BASE}database: sqlite\n");
        let resolved = loader(&[
            ("app", base.as_str()),
            (
                "aws-rails-dev",
                "database: postgresql\ndatabase_options: { username: postgres }",
            ),
        ])
        .load("app")
        .unwrap();

        assert_eq!(resolved.application.database(), &DatabaseKind::Postgresql);
        assert_eq!(
            serde_json::Value::Object(resolved.application.database_options().clone()),
            json!({ "username": "postgres" })
        );
    }

    #[test]
    fn override_merges_nested_database_options() {
        let base = format!(
            "{BASE}database: postgresql\ndatabase_options: {{ host: db.local, pool: 5 }}\n"
        );
        let resolved = loader(&[
            ("app", base.as_str()),
            ("aws-rails-dev", "database: mysql\ndatabase_options: { host: mysql.local }"),
        ])
        .load("app")
        .unwrap();

        assert_eq!(resolved.application.database(), &DatabaseKind::Mysql);
        assert_eq!(
            serde_json::Value::Object(resolved.application.database_options().clone()),
            json!({ "host": "mysql.local", "pool": 5 })
        );
    }

    #[test]
    fn override_sequences_replace_base_sequences() {
        let base = format!("{BASE}monitoring: [sentry, datadog]\n");
        let resolved = loader(&[("app", base.as_str()), ("aws-rails-dev", "monitoring: [newrelic]")])
            .load("app")
            .unwrap();

        let tools: Vec<_> = resolved
            .application
            .monitoring()
            .iter()
            .map(|t| t.as_str().to_string())
            .collect();
        assert_eq!(tools, ["new_relic"]);
    }

    #[test]
    fn malformed_override_is_a_warning() {
        let resolved = loader(&[("app", BASE), ("aws-rails-dev", "- just\n- a list")])
            .load("app")
            .unwrap();

        assert!(matches!(
            resolved.warnings.as_slice(),
            [GenerationWarning::OverrideIgnored { id, .. }] if id == "aws-rails-dev"
        ));
    }

    #[test]
    fn override_with_wrong_shape_falls_back_to_base() {
        let base = format!("{BASE}gems: [rails]\ndatabase: sqlite\n");
        let resolved = loader(&[
            ("app", base.as_str()),
            ("aws-rails-dev", "gems: rails\ndatabase: postgresql"),
        ])
        .load("app")
        .unwrap();

        assert!(matches!(
            resolved.warnings.as_slice(),
            [GenerationWarning::OverrideIgnored { id, reason }]
                if id == "aws-rails-dev" && reason.contains("gems")
        ));
        assert_eq!(resolved.application.database(), &DatabaseKind::Sqlite);
        assert_eq!(resolved.application.gems().len(), 1);
        assert_eq!(resolved.document, RawDocument::yaml("app", base.as_str()).parse().unwrap());
    }

    #[test]
    fn override_with_wrong_option_shape_keeps_region_variable() {
        let mut env = MockEnvironment::new();
        env.expect_var().returning(|_| Some("ap-south-1".into()));

        let resolved = ConfigurationLoader::new(
            source(&[("app", BASE), ("aws-rails-dev", "database: postgres\ndatabase_options: nope")]),
            Box::new(env),
        )
        .load("app")
        .unwrap();

        assert_eq!(resolved.warnings.len(), 1);
        assert_eq!(resolved.deployment.region.as_deref(), Some("ap-south-1"));
    }

    #[test]
    fn wrong_shape_in_base_is_still_an_error() {
        let base = format!("{BASE}gems: rails\n");
        let err = loader(&[("app", base.as_str())]).load("app").unwrap_err();
        assert!(matches!(
            err,
            ForgeError::Domain(DomainError::InvalidField { ref field, .. }) if field == "gems"
        ));
    }

    #[test]
    fn unreadable_override_is_a_warning() {
        let mut source = MockDocumentSource::new();
        source
            .expect_fetch()
            .withf(|id| id == "app")
            .returning(|id| Ok(Some(RawDocument::yaml(id, BASE))));
        source
            .expect_fetch()
            .withf(|id| id == "aws-rails-dev")
            .returning(|id| {
                Err(ApplicationError::ConfigurationNotFound {
                    id: id.into(),
                    reason: "permission denied".into(),
                }
                .into())
            });

        let resolved = ConfigurationLoader::new(Box::new(source), no_env())
            .load("app")
            .unwrap();
        assert_eq!(resolved.warnings.len(), 1);
    }

    #[test]
    fn missing_base_is_not_found() {
        let err = loader(&[]).load("app").unwrap_err();
        assert!(matches!(
            err,
            ForgeError::Application(ApplicationError::ConfigurationNotFound { ref id, .. }) if id == "app"
        ));
    }

    #[test]
    fn malformed_base_is_a_parse_error() {
        let err = loader(&[("app", "provider: [unclosed")]).load("app").unwrap_err();
        assert!(matches!(
            err,
            ForgeError::Application(ApplicationError::ConfigurationParse { .. })
        ));
    }

    #[test]
    fn missing_required_field_is_named() {
        let err = loader(&[("app", "provider: aws\nenvironment: dev")])
            .load("app")
            .unwrap_err();
        assert_eq!(
            err,
            ForgeError::Domain(DomainError::MissingRequiredField {
                field: "framework".into()
            })
        );
    }

    #[test]
    fn region_variable_wins_over_documents() {
        let mut env = MockEnvironment::new();
        env.expect_var()
            .withf(|key| key == "DEPLOY_REGION")
            .returning(|_| Some("ap-south-1".into()));

        let resolved = ConfigurationLoader::new(
            source(&[("app", BASE), ("aws-rails-dev", "region: us-east-2")]),
            Box::new(env),
        )
        .with_region_var("DEPLOY_REGION")
        .load("app")
        .unwrap();

        assert_eq!(resolved.deployment.region.as_deref(), Some("ap-south-1"));
    }

    #[test]
    fn models_source_is_appended_after_inline_models() {
        let base = format!("{BASE}models_source: models\nmodels:\n  User: {{}}\n");
        let resolved = loader(&[
            ("app", base.as_str()),
            ("models", "models:\n  Post: { attributes: { title: string } }"),
        ])
        .load("app")
        .unwrap();

        let names: Vec<_> = resolved.entities.iter().map(|e| e.name()).collect();
        assert_eq!(names, ["User", "Post"]);
    }

    #[test]
    fn missing_models_source_is_not_found() {
        let base = format!("{BASE}models_source: models\n");
        let err = loader(&[("app", base.as_str())]).load("app").unwrap_err();
        assert!(matches!(
            err,
            ForgeError::Application(ApplicationError::ConfigurationNotFound { ref id, .. }) if id == "models"
        ));
    }

    #[test]
    fn base_named_like_its_override_is_read_once() {
        let mut source = MockDocumentSource::new();
        source
            .expect_fetch()
            .times(1)
            .returning(|id| Ok(Some(RawDocument::yaml(id, BASE))));

        let resolved = ConfigurationLoader::new(Box::new(source), no_env())
            .load("aws-rails-dev")
            .unwrap();
        assert!(resolved.warnings.is_empty());
    }
}
