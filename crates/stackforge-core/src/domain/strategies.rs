//! Strategy resolution.
//!
//! Every concern is resolved by a total function: any input, recognized or
//! not, maps to a defined strategy. When the input could not be used as
//! given, the function also returns the warning to record. Nothing here
//! fails.

use serde::Serialize;

use crate::domain::{
    entities::ApplicationConfiguration,
    generators::{GeneratorDef, Packages, resolve_generator},
    value_objects::{
        CssFramework, DatabaseKind, EmbeddingProvider, FormBuilder, Frontend, GeneratorKind,
        MonitoringTool, SearchEngine, TemplateEngine, VectorStore,
    },
    warning::{Concern, GenerationWarning, Resolution},
};

// ── Database ─────────────────────────────────────────────────────────────────

/// Database family handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseFamily {
    Sqlite,
    Postgresql,
    Mysql,
    Mongodb,
    Sequelize,
    Prisma,
}

impl DatabaseFamily {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Postgresql => "postgresql",
            Self::Mysql => "mysql",
            Self::Mongodb => "mongodb",
            Self::Sequelize => "sequelize",
            Self::Prisma => "prisma",
        }
    }

    pub const fn packages(&self) -> Packages {
        match self {
            Self::Sqlite => Packages::all("sqlite3", "sqlite3", "aiosqlite"),
            Self::Postgresql => Packages::all("pg", "pg", "psycopg"),
            Self::Mysql => Packages::all("mysql2", "mysql2", "pymysql"),
            Self::Mongodb => Packages::all("mongoid", "mongoose", "motor"),
            Self::Sequelize => Packages {
                ruby: None,
                npm: Some("sequelize"),
                pypi: None,
            },
            Self::Prisma => Packages {
                ruby: None,
                npm: Some("@prisma/client"),
                pypi: Some("prisma"),
            },
        }
    }

    /// Configuration file for this family on `generator`.
    pub fn config_path(&self, generator: &GeneratorDef) -> String {
        match (self, &generator.kind) {
            (Self::Mongodb, GeneratorKind::Mvc) => "config/mongoid.yml".into(),
            (_, GeneratorKind::Mvc) => "config/database.yml".into(),
            (Self::Prisma, _) => "prisma/schema.prisma".into(),
            _ => generator.config_file("database"),
        }
    }
}

/// Pick the database family.
///
/// An unrecognized database falls back to the target's own default: the
/// document store for the Node target, the embedded database elsewhere.
pub fn resolve_database(
    kind: &DatabaseKind,
    generator: &GeneratorDef,
) -> Resolution<DatabaseFamily> {
    let family = match kind {
        DatabaseKind::Sqlite => DatabaseFamily::Sqlite,
        DatabaseKind::Postgresql => DatabaseFamily::Postgresql,
        DatabaseKind::Mysql => DatabaseFamily::Mysql,
        DatabaseKind::Mongodb => DatabaseFamily::Mongodb,
        DatabaseKind::Sequelize => DatabaseFamily::Sequelize,
        DatabaseKind::Prisma => DatabaseFamily::Prisma,
        DatabaseKind::Other(value) => {
            let fallback = generator.fallback_database;
            return Resolution::with_warning(
                fallback,
                GenerationWarning::unsupported(Concern::Database, value.as_str(), fallback.as_str()),
            );
        }
    };
    Resolution::exact(family)
}

// ── CSS framework ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "strategy", content = "framework", rename_all = "snake_case")]
pub enum CssStrategy {
    Installer(CssInstaller),
    NoOp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CssInstaller {
    Bootstrap,
    Tailwind,
}

impl CssInstaller {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bootstrap => "bootstrap",
            Self::Tailwind => "tailwind",
        }
    }

    pub const fn packages(&self) -> Packages {
        match self {
            Self::Bootstrap => Packages {
                ruby: Some("bootstrap"),
                npm: Some("bootstrap"),
                pypi: None,
            },
            Self::Tailwind => Packages {
                ruby: Some("tailwindcss-rails"),
                npm: Some("tailwindcss"),
                pypi: None,
            },
        }
    }
}

/// `bootstrap` and `tailwind` get an installer; anything else is a no-op.
pub fn resolve_css(css: &CssFramework) -> Resolution<CssStrategy> {
    match css {
        CssFramework::Bootstrap => Resolution::exact(CssStrategy::Installer(CssInstaller::Bootstrap)),
        CssFramework::Tailwind => Resolution::exact(CssStrategy::Installer(CssInstaller::Tailwind)),
        CssFramework::NoFramework => Resolution::exact(CssStrategy::NoOp),
        CssFramework::Other(value) => Resolution::with_warning(
            CssStrategy::NoOp,
            GenerationWarning::unsupported(Concern::CssFramework, value.as_str(), "none"),
        ),
    }
}

// ── Template engine ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateEngineStrategy {
    Slim,
    Haml,
    /// The target's built-in engine. Adds nothing to the manifest except an
    /// informational note.
    Default,
}

impl TemplateEngineStrategy {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Slim => "slim",
            Self::Haml => "haml",
            Self::Default => "erb",
        }
    }

    pub const fn package(&self) -> Option<&'static str> {
        match self {
            Self::Slim => Some("slim-rails"),
            Self::Haml => Some("haml-rails"),
            Self::Default => None,
        }
    }

    /// Extension of server-rendered view files.
    pub const fn view_extension(&self) -> &'static str {
        self.as_str()
    }
}

pub fn resolve_template_engine(engine: &TemplateEngine) -> Resolution<TemplateEngineStrategy> {
    match engine {
        TemplateEngine::Slim => Resolution::exact(TemplateEngineStrategy::Slim),
        TemplateEngine::Haml => Resolution::exact(TemplateEngineStrategy::Haml),
        TemplateEngine::Erb => Resolution::exact(TemplateEngineStrategy::Default),
        TemplateEngine::Other(value) => Resolution::with_warning(
            TemplateEngineStrategy::Default,
            GenerationWarning::unsupported(Concern::TemplateEngine, value.as_str(), "erb"),
        ),
    }
}

// ── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    Elasticsearch,
    Meilisearch,
}

impl SearchStrategy {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Elasticsearch => "elasticsearch",
            Self::Meilisearch => "meilisearch",
        }
    }

    pub const fn packages(&self) -> Packages {
        match self {
            Self::Elasticsearch => {
                Packages::all("elasticsearch-model", "@elastic/elasticsearch", "elasticsearch")
            }
            Self::Meilisearch => Packages::all("meilisearch-rails", "meilisearch", "meilisearch"),
        }
    }
}

/// `None` when no search engine is configured or it is not recognized.
pub fn resolve_search(engine: Option<&SearchEngine>) -> Resolution<Option<SearchStrategy>> {
    match engine {
        None => Resolution::exact(None),
        Some(SearchEngine::Elasticsearch) => Resolution::exact(Some(SearchStrategy::Elasticsearch)),
        Some(SearchEngine::Meilisearch) => Resolution::exact(Some(SearchStrategy::Meilisearch)),
        Some(SearchEngine::Other(value)) => Resolution::with_warning(
            None,
            GenerationWarning::unsupported(Concern::SearchEngine, value.as_str(), "none"),
        ),
    }
}

// ── Vector store ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "strategy", content = "store", rename_all = "snake_case")]
pub enum VectorStoreStrategy {
    Pgvector,
    /// Recognized store without a generation path yet.
    Stub(VectorStore),
}

pub fn resolve_vector_store(store: Option<&VectorStore>) -> Resolution<Option<VectorStoreStrategy>> {
    match store {
        None => Resolution::exact(None),
        Some(VectorStore::Pgvector) => Resolution::exact(Some(VectorStoreStrategy::Pgvector)),
        Some(VectorStore::Other(value)) => Resolution::with_warning(
            None,
            GenerationWarning::unsupported(Concern::VectorStore, value.as_str(), "none"),
        ),
        Some(stub) => Resolution::with_warning(
            Some(VectorStoreStrategy::Stub(stub.clone())),
            GenerationWarning::stub(Concern::VectorStore, stub.as_str()),
        ),
    }
}

// ── Embedding provider ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "strategy", content = "provider", rename_all = "snake_case")]
pub enum EmbeddingStrategy {
    OpenAi,
    Stub(EmbeddingProvider),
}

pub fn resolve_embedding(
    provider: Option<&EmbeddingProvider>,
) -> Resolution<Option<EmbeddingStrategy>> {
    match provider {
        None => Resolution::exact(None),
        Some(EmbeddingProvider::OpenAi) => Resolution::exact(Some(EmbeddingStrategy::OpenAi)),
        Some(EmbeddingProvider::Other(value)) => Resolution::with_warning(
            None,
            GenerationWarning::unsupported(Concern::EmbeddingProvider, value.as_str(), "none"),
        ),
        Some(stub) => Resolution::with_warning(
            Some(EmbeddingStrategy::Stub(stub.clone())),
            GenerationWarning::stub(Concern::EmbeddingProvider, stub.as_str()),
        ),
    }
}

// ── Presentation ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewStrategy {
    /// Server-rendered templates.
    Templates,
    React,
    Vue,
}

impl ViewStrategy {
    pub const fn component_extension(&self) -> &'static str {
        match self {
            Self::Vue => "vue",
            _ => "jsx",
        }
    }
}

pub fn resolve_frontend(frontend: &Frontend) -> Resolution<ViewStrategy> {
    match frontend {
        Frontend::Mvc => Resolution::exact(ViewStrategy::Templates),
        Frontend::React => Resolution::exact(ViewStrategy::React),
        Frontend::Vue => Resolution::exact(ViewStrategy::Vue),
        Frontend::Other(value) => Resolution::with_warning(
            ViewStrategy::Templates,
            GenerationWarning::unsupported(Concern::Frontend, value.as_str(), "mvc"),
        ),
    }
}

pub fn resolve_form_builder(builder: &FormBuilder) -> Resolution<FormBuilder> {
    match builder {
        FormBuilder::Other(value) => Resolution::with_warning(
            FormBuilder::Default,
            GenerationWarning::unsupported(Concern::FormBuilder, value.as_str(), "default"),
        ),
        known => Resolution::exact(known.clone()),
    }
}

impl FormBuilder {
    pub const fn package(&self) -> Option<&'static str> {
        match self {
            Self::SimpleForm => Some("simple_form"),
            Self::Formtastic => Some("formtastic"),
            _ => None,
        }
    }
}

// ── Monitoring ───────────────────────────────────────────────────────────────

impl MonitoringTool {
    pub const fn packages(&self) -> Option<Packages> {
        match self {
            Self::Sentry => Some(Packages::all("sentry-rails", "@sentry/node", "sentry-sdk")),
            Self::NewRelic => Some(Packages::all("newrelic_rpm", "newrelic", "newrelic")),
            Self::Datadog => Some(Packages::all("ddtrace", "dd-trace", "ddtrace")),
            Self::Prometheus => Some(Packages::all(
                "prometheus-client",
                "prom-client",
                "prometheus-client",
            )),
            Self::Honeybadger => {
                Some(Packages::all("honeybadger", "@honeybadger-io/js", "honeybadger"))
            }
            Self::Other(_) => None,
        }
    }
}

/// Recognized tools in configuration order; unrecognized ones are skipped
/// with a warning.
pub fn resolve_monitoring(tools: &[MonitoringTool]) -> Resolution<Vec<MonitoringTool>> {
    let mut kept = Vec::with_capacity(tools.len());
    let mut warnings = Vec::new();
    for tool in tools {
        if tool.is_recognized() {
            kept.push(tool.clone());
        } else {
            warnings.push(GenerationWarning::unsupported(
                Concern::Monitoring,
                tool.as_str(),
                "none",
            ));
        }
    }
    Resolution::with_warnings(kept, warnings)
}

// ── Strategy set ─────────────────────────────────────────────────────────────

/// One strategy per concern, chosen for a single run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategySet {
    #[serde(serialize_with = "serialize_generator")]
    pub generator: &'static GeneratorDef,
    pub views: ViewStrategy,
    pub form_builder: FormBuilder,
    pub database: DatabaseFamily,
    pub search: Option<SearchStrategy>,
    pub vector_store: Option<VectorStoreStrategy>,
    pub embedding: Option<EmbeddingStrategy>,
    pub template_engine: TemplateEngineStrategy,
    pub css: CssStrategy,
    pub monitoring: Vec<MonitoringTool>,
}

fn serialize_generator<S: serde::Serializer>(
    generator: &&'static GeneratorDef,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(generator.id())
}

impl StrategySet {
    /// Resolve every concern of `config` for `generator`.
    ///
    /// Warnings for every fallback are returned in concern order.
    pub fn resolve(
        generator: Option<&GeneratorKind>,
        config: &ApplicationConfiguration,
    ) -> (Self, Vec<GenerationWarning>) {
        let mut warnings = Vec::new();
        let generator = resolve_generator(generator).record(&mut warnings);

        let set = Self {
            generator,
            views: resolve_frontend(config.frontend()).record(&mut warnings),
            form_builder: resolve_form_builder(config.form_builder()).record(&mut warnings),
            database: resolve_database(config.database(), generator).record(&mut warnings),
            search: resolve_search(config.search_engine()).record(&mut warnings),
            vector_store: resolve_vector_store(config.vector_db()).record(&mut warnings),
            embedding: resolve_embedding(config.embedding_provider()).record(&mut warnings),
            template_engine: resolve_template_engine(config.template_engine())
                .record(&mut warnings),
            css: resolve_css(config.css_framework()).record(&mut warnings),
            monitoring: resolve_monitoring(config.monitoring()).record(&mut warnings),
        };

        (set, warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::generators::{EXPRESS, MVC, PYTHON};

    #[test]
    fn database_aliases_resolve_exactly() {
        let resolved = resolve_database(&DatabaseKind::parse("pg"), &MVC);
        assert_eq!(resolved.value, DatabaseFamily::Postgresql);
        assert!(resolved.warnings.is_empty());
    }

    #[test]
    fn unknown_database_fallback_is_per_target() {
        let cockroach = DatabaseKind::parse("cockroachdb");
        assert_eq!(resolve_database(&cockroach, &EXPRESS).value, DatabaseFamily::Mongodb);
        assert_eq!(resolve_database(&cockroach, &MVC).value, DatabaseFamily::Sqlite);
        assert_eq!(resolve_database(&cockroach, &PYTHON).value, DatabaseFamily::Sqlite);

        assert_eq!(
            resolve_database(&cockroach, &EXPRESS).warnings,
            [GenerationWarning::unsupported(Concern::Database, "cockroachdb", "mongodb")]
        );
    }

    #[test]
    fn css_installer_or_noop() {
        assert_eq!(
            resolve_css(&CssFramework::Tailwind).value,
            CssStrategy::Installer(CssInstaller::Tailwind)
        );
        let none = resolve_css(&CssFramework::NoFramework);
        assert_eq!(none.value, CssStrategy::NoOp);
        assert!(none.warnings.is_empty());

        let bulma = resolve_css(&CssFramework::parse("bulma"));
        assert_eq!(bulma.value, CssStrategy::NoOp);
        assert!(bulma.warnings.len() == 1);
    }

    #[test]
    fn template_engine_defaults_for_unknown() {
        let resolved = resolve_template_engine(&TemplateEngine::parse("liquid"));
        assert_eq!(resolved.value, TemplateEngineStrategy::Default);
        assert_eq!(resolved.warnings.len(), 1);
        assert_eq!(TemplateEngineStrategy::Default.package(), None);
        assert_eq!(TemplateEngineStrategy::Haml.package(), Some("haml-rails"));
    }

    #[test]
    fn qdrant_is_a_stub_not_an_error() {
        let resolved = resolve_vector_store(Some(&VectorStore::Qdrant));
        assert_eq!(
            resolved.value,
            Some(VectorStoreStrategy::Stub(VectorStore::Qdrant))
        );
        assert_eq!(
            resolved.warnings,
            [GenerationWarning::stub(Concern::VectorStore, "qdrant")]
        );
    }

    #[test]
    fn embedding_stubs_and_openai() {
        assert_eq!(
            resolve_embedding(Some(&EmbeddingProvider::OpenAi)).value,
            Some(EmbeddingStrategy::OpenAi)
        );
        assert_eq!(
            resolve_embedding(Some(&EmbeddingProvider::Cohere)).value,
            Some(EmbeddingStrategy::Stub(EmbeddingProvider::Cohere))
        );
        assert_eq!(resolve_embedding(None).value, None);
    }

    #[test]
    fn unrecognized_optional_concerns_never_fail() {
        for raw in ["", "???", "Totally Unknown"] {
            let _ = resolve_search(Some(&SearchEngine::parse(raw)));
            let _ = resolve_vector_store(Some(&VectorStore::parse(raw)));
            let _ = resolve_embedding(Some(&EmbeddingProvider::parse(raw)));
            let _ = resolve_frontend(&Frontend::parse(raw));
            let _ = resolve_form_builder(&FormBuilder::parse(raw));
        }
    }

    #[test]
    fn monitoring_skips_unknown_tools() {
        let tools = [
            MonitoringTool::Sentry,
            MonitoringTool::parse("nagios"),
            MonitoringTool::Datadog,
            MonitoringTool::parse("zabbix"),
        ];
        let resolved = resolve_monitoring(&tools);
        assert_eq!(resolved.value, [MonitoringTool::Sentry, MonitoringTool::Datadog]);
        assert_eq!(
            resolved.warnings,
            [
                GenerationWarning::unsupported(Concern::Monitoring, "nagios", "none"),
                GenerationWarning::unsupported(Concern::Monitoring, "zabbix", "none"),
            ]
        );
    }

    #[test]
    fn strategy_set_collects_warnings_in_order() {
        let mut config = ApplicationConfiguration::new();
        config.set_css_framework("bulma");
        config.set_database("cockroachdb", Default::default());

        let cdktf = GeneratorKind::parse("cdktf");
        let (set, warnings) = StrategySet::resolve(Some(&cdktf), &config);

        assert_eq!(set.generator.kind, GeneratorKind::Mvc);
        assert_eq!(set.database, DatabaseFamily::Sqlite);
        assert_eq!(set.css, CssStrategy::NoOp);
        let concerns: Vec<_> = warnings
            .iter()
            .map(|w| match w {
                GenerationWarning::UnsupportedStrategy { concern, .. } => *concern,
                other => panic!("unexpected warning {other:?}"),
            })
            .collect();
        assert_eq!(
            concerns,
            [Concern::Generator, Concern::Database, Concern::CssFramework]
        );
    }
}
