//! The root configuration aggregate.
//!
//! One `ApplicationConfiguration` is built per generation run. It is mutated
//! while the declarative documents are read and treated as read-only after
//! that; nothing holds it beyond the run that created it.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::json;
use std::collections::BTreeMap;

use super::{
    feature::{AuthenticationConfiguration, FeatureConfiguration, FeatureSettings},
    gem::GemConfiguration,
};
use crate::domain::{
    document::Options,
    error::DomainError,
    value_objects::{
        CssFramework, DatabaseKind, EmbeddingProvider, FeatureName, FormBuilder, Frontend,
        MonitoringTool, SearchEngine, TemplateEngine, VectorStore,
    },
};

fn default_true() -> bool {
    true
}

/// Application-level choices for the generated project.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApplicationConfiguration {
    frontend: Frontend,
    css_framework: CssFramework,
    #[serde(default = "default_true")]
    controller_inheritance: bool,
    form_builder: FormBuilder,
    template_engine: TemplateEngine,

    database: DatabaseKind,
    database_options: Options,

    search_engine: Option<SearchEngine>,
    search_engine_options: Options,

    vector_db: Option<VectorStore>,
    vector_db_options: Options,

    embedding_provider: Option<EmbeddingProvider>,
    embedding_provider_options: Options,

    gems: Vec<GemConfiguration>,
    features: BTreeMap<FeatureName, FeatureConfiguration>,
    monitoring: Vec<MonitoringTool>,
}

impl Default for ApplicationConfiguration {
    fn default() -> Self {
        Self {
            frontend: Frontend::default(),
            css_framework: CssFramework::default(),
            controller_inheritance: true,
            form_builder: FormBuilder::default(),
            template_engine: TemplateEngine::default(),
            database: DatabaseKind::default(),
            database_options: Options::new(),
            search_engine: None,
            search_engine_options: Options::new(),
            vector_db: None,
            vector_db_options: Options::new(),
            embedding_provider: None,
            embedding_provider_options: Options::new(),
            gems: Vec::new(),
            features: BTreeMap::new(),
            monitoring: Vec::new(),
        }
    }
}

impl ApplicationConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Presentation ────────────────────────────────────────────────────────

    pub fn set_frontend(&mut self, frontend: impl Into<Frontend>) {
        self.frontend = frontend.into();
    }

    pub fn set_css_framework(&mut self, css: impl Into<CssFramework>) {
        self.css_framework = css.into();
    }

    pub fn set_controller_inheritance(&mut self, enabled: bool) {
        self.controller_inheritance = enabled;
    }

    pub fn set_form_builder(&mut self, builder: impl Into<FormBuilder>) {
        self.form_builder = builder.into();
    }

    pub fn set_template_engine(&mut self, engine: impl Into<TemplateEngine>) {
        self.template_engine = engine.into();
    }

    // ── Dependencies ────────────────────────────────────────────────────────

    /// Append a dependency. Never deduplicates; see [`Self::gem`].
    pub fn add_gem(
        &mut self,
        name: &str,
        version: Option<&str>,
        options: Options,
    ) -> Result<(), DomainError> {
        let gem = GemConfiguration::new(name)?
            .with_version(version.map(str::to_owned))
            .with_options(options);
        self.gems.push(gem);
        Ok(())
    }

    pub fn push_gem(&mut self, gem: GemConfiguration) {
        self.gems.push(gem);
    }

    /// The most recently added gem with this name.
    pub fn gem(&self, name: &str) -> Option<&GemConfiguration> {
        self.gems.iter().rev().find(|g| g.name() == name)
    }

    // ── Features ────────────────────────────────────────────────────────────

    /// Store an authentication feature, replacing any earlier one.
    ///
    /// `passkeys`, `passkey_options` and `generate_user` are taken out of
    /// `options` and become fields of the feature.
    pub fn enable_authentication(&mut self, provider: Option<&str>, options: Options) {
        let provider = provider
            .filter(|p| !p.trim().is_empty())
            .or(FeatureName::Authentication.default_provider())
            .unwrap_or("devise");
        self.features.insert(
            FeatureName::Authentication,
            FeatureConfiguration::Authentication(AuthenticationConfiguration::from_options(
                provider, options,
            )),
        );
    }

    pub fn enable_file_upload(&mut self, provider: Option<&str>, options: Options) {
        let provider = provider
            .filter(|p| !p.trim().is_empty())
            .or(FeatureName::FileUpload.default_provider())
            .unwrap_or("active_storage");
        self.features.insert(
            FeatureName::FileUpload,
            FeatureConfiguration::FileUpload(FeatureSettings::new(provider, options)),
        );
    }

    pub fn enable_background_jobs(&mut self, provider: Option<&str>, options: Options) {
        let provider = provider
            .filter(|p| !p.trim().is_empty())
            .or(FeatureName::BackgroundJobs.default_provider())
            .unwrap_or("sidekiq");
        self.features.insert(
            FeatureName::BackgroundJobs,
            FeatureConfiguration::BackgroundJobs(FeatureSettings::new(provider, options)),
        );
    }

    /// Enable any feature by name. Known names dispatch to their variant;
    /// anything else becomes a generic feature, which needs a provider.
    pub fn enable_feature(
        &mut self,
        name: &str,
        provider: Option<&str>,
        options: Options,
    ) -> Result<(), DomainError> {
        let name = FeatureName::parse(name);
        let feature = FeatureConfiguration::build(&name, provider, options)?;
        self.features.insert(name, feature);
        Ok(())
    }

    pub fn feature(&self, name: &FeatureName) -> Option<&FeatureConfiguration> {
        self.features.get(name)
    }

    // ── Monitoring ──────────────────────────────────────────────────────────

    /// Add a monitoring tool with set semantics. Returns `false` when the
    /// tool was already present.
    pub fn add_monitoring_tool(&mut self, tool: impl Into<MonitoringTool>) -> bool {
        let tool = tool.into();
        if self.monitoring.contains(&tool) {
            return false;
        }
        self.monitoring.push(tool);
        true
    }

    // ── Data services ───────────────────────────────────────────────────────

    pub fn set_database(&mut self, kind: impl Into<DatabaseKind>, options: Options) {
        self.database = kind.into();
        self.database_options = options;
    }

    pub fn enable_search_engine(&mut self, engine: impl Into<SearchEngine>, options: Options) {
        self.search_engine = Some(engine.into());
        self.search_engine_options = options;
    }

    pub fn enable_vector_db(&mut self, store: impl Into<VectorStore>, options: Options) {
        self.vector_db = Some(store.into());
        self.vector_db_options = options;
    }

    pub fn set_embedding_provider(
        &mut self,
        provider: impl Into<EmbeddingProvider>,
        options: Options,
    ) {
        self.embedding_provider = Some(provider.into());
        self.embedding_provider_options = options;
    }

    // ── Accessors ───────────────────────────────────────────────────────────

    pub fn frontend(&self) -> &Frontend {
        &self.frontend
    }

    pub fn css_framework(&self) -> &CssFramework {
        &self.css_framework
    }

    pub fn controller_inheritance(&self) -> bool {
        self.controller_inheritance
    }

    pub fn form_builder(&self) -> &FormBuilder {
        &self.form_builder
    }

    pub fn template_engine(&self) -> &TemplateEngine {
        &self.template_engine
    }

    pub fn database(&self) -> &DatabaseKind {
        &self.database
    }

    pub fn database_options(&self) -> &Options {
        &self.database_options
    }

    pub fn search_engine(&self) -> Option<&SearchEngine> {
        self.search_engine.as_ref()
    }

    pub fn search_engine_options(&self) -> &Options {
        &self.search_engine_options
    }

    pub fn vector_db(&self) -> Option<&VectorStore> {
        self.vector_db.as_ref()
    }

    pub fn vector_db_options(&self) -> &Options {
        &self.vector_db_options
    }

    pub fn embedding_provider(&self) -> Option<&EmbeddingProvider> {
        self.embedding_provider.as_ref()
    }

    pub fn embedding_provider_options(&self) -> &Options {
        &self.embedding_provider_options
    }

    pub fn gems(&self) -> &[GemConfiguration] {
        &self.gems
    }

    pub fn features(&self) -> &BTreeMap<FeatureName, FeatureConfiguration> {
        &self.features
    }

    pub fn monitoring(&self) -> &[MonitoringTool] {
        &self.monitoring
    }

    // ── Representation ──────────────────────────────────────────────────────

    /// Plain nested snapshot of every field.
    ///
    /// The result owns all of its data; mutating it never touches `self`.
    pub fn to_representation(&self) -> serde_json::Value {
        let gems: Vec<_> = self.gems.iter().map(|g| g.to_representation()).collect();
        let features: serde_json::Map<_, _> = self
            .features
            .iter()
            .map(|(name, feature)| (name.to_string(), feature.to_representation()))
            .collect();
        let monitoring: Vec<_> = self.monitoring.iter().map(|t| t.as_str()).collect();

        json!({
            "frontend": self.frontend.as_str(),
            "css_framework": self.css_framework.as_str(),
            "controller_inheritance": self.controller_inheritance,
            "form_builder": self.form_builder.as_str(),
            "template_engine": self.template_engine.as_str(),
            "database": self.database.as_str(),
            "database_options": self.database_options,
            "search_engine": self.search_engine.as_ref().map(|e| e.as_str()),
            "search_engine_options": self.search_engine_options,
            "vector_db": self.vector_db.as_ref().map(|v| v.as_str()),
            "vector_db_options": self.vector_db_options,
            "embedding_provider": self.embedding_provider.as_ref().map(|p| p.as_str()),
            "embedding_provider_options": self.embedding_provider_options,
            "gems": gems,
            "features": features,
            "monitoring": monitoring,
        })
    }

    /// Rebuild a configuration from [`Self::to_representation`] output.
    pub fn from_representation(value: serde_json::Value) -> Result<Self, DomainError> {
        let mut config: Self = serde_json::from_value(value)
            .map_err(|e| DomainError::InvalidRepresentation(e.to_string()))?;

        let mut seen = Vec::with_capacity(config.monitoring.len());
        config.monitoring.retain(|tool| {
            if seen.contains(tool) {
                false
            } else {
                seen.push(tool.clone());
                true
            }
        });

        if let Some((key, feature)) = config
            .features
            .iter()
            .find(|(key, feature)| **key != feature.name())
        {
            return Err(DomainError::InvalidRepresentation(format!(
                "feature stored under '{key}' is a '{}' feature",
                feature.name()
            )));
        }

        Ok(config)
    }
}

impl Serialize for ApplicationConfiguration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_representation().serialize(serializer)
    }
}
