//! Manifest construction.
//!
//! [`build_manifest`] is a pure function of the resolved configuration, the
//! chosen strategies and the entity list. Blocks are emitted in a fixed
//! order:
//!
//! 1. structural files
//! 2. one block per entity, in declaration order
//! 3. database, search, vector store, embedding provider, template engine,
//!    CSS framework
//! 4. application features (authentication, file upload, background jobs,
//!    then the rest by name)
//! 5. monitoring tools

use serde_json::json;
use std::collections::HashSet;

use crate::domain::{
    common::table_name,
    document::Options,
    entities::{
        ApplicationConfiguration, EntityDescriptor, FeatureConfiguration, FileSpec, Manifest,
        ManifestSection,
    },
    error::DomainError,
    generators::{EntityNames, EntityRole, GeneratorDef, Packages},
    strategies::{
        CssInstaller, CssStrategy, DatabaseFamily, EmbeddingStrategy, StrategySet,
        VectorStoreStrategy, ViewStrategy,
    },
    validation::DomainValidator,
    value_objects::AssociationKind,
};

/// Origin recorded for dependencies the user declared.
pub const CONFIGURED: &str = "configured";

const OPENAI_MODEL: &str = "text-embedding-3-small";
const OPENAI_MAX_INPUT_CHARS: u64 = 8_000;
const DEFAULT_DIMENSIONS: u64 = 1_536;

/// Providers shipped with the target framework; they add no dependency.
const BUILTIN_PROVIDERS: &[&str] = &["active_storage", "active_job"];

const PGVECTOR_PACKAGES: Packages = Packages::all("neighbor", "pgvector", "pgvector");
const OPENAI_PACKAGES: Packages = Packages::all("ruby-openai", "openai", "openai");

/// Build the manifest for one run.
///
/// Fails only if two blocks claim the same path.
pub fn build_manifest(
    config: &ApplicationConfiguration,
    strategies: &StrategySet,
    entities: &[EntityDescriptor],
) -> Result<Manifest, DomainError> {
    let mut builder = Builder {
        config,
        strategies,
        generator: strategies.generator,
        manifest: Manifest::new(),
        migrations: 0,
    };

    builder.structure(entities);
    let mut join_tables = HashSet::new();
    for entity in entities {
        builder.entity(entity, &mut join_tables);
    }
    builder.database();
    builder.search();
    builder.vector_store();
    builder.embedding();
    builder.template_engine();
    builder.css();
    for feature in config.features().values() {
        builder.feature(feature);
    }
    builder.monitoring();

    DomainValidator::validate_manifest(&builder.manifest)?;
    Ok(builder.manifest)
}

struct Builder<'a> {
    config: &'a ApplicationConfiguration,
    strategies: &'a StrategySet,
    generator: &'static GeneratorDef,
    manifest: Manifest,
    migrations: usize,
}

impl Builder<'_> {
    fn file(&mut self, section: ManifestSection, path: String, id: &str, parameters: Options) {
        self.manifest
            .add_file(FileSpec::new(section, path, id, parameters));
    }

    fn dependency(&mut self, packages: Packages, origin: &str) {
        if let Some(name) = packages.for_ecosystem(self.generator.ecosystem) {
            self.manifest.add_dependency(name, None, origin);
        }
    }

    /// Next migration path, or `None` when the target has no migrations.
    fn next_migration(&mut self, name: &str) -> Option<(String, &'static str)> {
        let migration = self.generator.migration?;
        self.migrations += 1;
        Some((
            GeneratorDef::migration_file(&migration, self.migrations, name),
            migration.generator_id,
        ))
    }

    fn structure(&mut self, entities: &[EntityDescriptor]) {
        let resources: Vec<_> = entities
            .iter()
            .map(|e| {
                let names = EntityNames::of(e.name());
                json!({"name": e.name(), "class_name": names.pascal, "plural": names.plural})
            })
            .collect();

        let parameters = to_options(json!({
            "generator": self.generator.id(),
            "frontend": self.config.frontend().as_str(),
            "css_framework": self.config.css_framework().as_str(),
            "form_builder": self.strategies.form_builder.as_str(),
            "template_engine": self.strategies.template_engine.as_str(),
            "database": self.strategies.database.as_str(),
            "controller_inheritance": self.config.controller_inheritance(),
            "resources": resources,
        }));

        for def in self.generator.structure {
            self.file(
                ManifestSection::Structure,
                def.path.to_string(),
                def.generator_id,
                parameters.clone(),
            );
        }

        for gem in self.config.gems() {
            self.manifest
                .add_dependency(gem.name(), gem.version().map(str::to_owned), CONFIGURED);
        }
        if let Some(package) = self.strategies.form_builder.package() {
            self.dependency(
                Packages {
                    ruby: Some(package),
                    npm: None,
                    pypi: None,
                },
                "form_builder",
            );
        }
    }

    fn entity(&mut self, entity: &EntityDescriptor, join_tables: &mut HashSet<String>) {
        let (config, strategies) = (self.config, self.strategies);
        let section = ManifestSection::Entity(entity.name().to_string());
        let names = EntityNames::of(entity.name());

        let associations: Vec<_> = entity
            .associations()
            .iter()
            .map(|a| {
                json!({
                    "kind": a.kind.as_str(),
                    "name": a.name,
                    "attrs": a.options.attrs(),
                    "foreign_key": a.kind.owns_foreign_key().then(|| format!("{}_id", a.name)),
                })
            })
            .collect();
        let parameters = to_options(json!({
            "name": entity.name(),
            "class_name": names.pascal,
            "singular": names.singular,
            "table_name": names.plural,
            "attributes": entity.attributes(),
            "associations": associations,
            "database": strategies.database.as_str(),
        }));

        for def in self.generator.entity_files {
            let mut params = parameters.clone();
            params.insert("role".into(), json!(def.role.as_str()));
            if def.role == EntityRole::Controller {
                params.insert(
                    "parent_controller".into(),
                    json!(if config.controller_inheritance() {
                        "ApplicationController"
                    } else {
                        "ActionController::Base"
                    }),
                );
            }
            self.file(section.clone(), names.expand(def.path), def.generator_id, params);
        }

        let migrates = self
            .generator
            .migration
            .is_some_and(|m| (m.applies_to)(strategies.database));
        if migrates {
            if let Some((path, id)) = self.next_migration(&format!("create_{}", names.plural)) {
                self.file(section.clone(), path, id, parameters.clone());
            }
            for association in entity.associations() {
                if association.kind != AssociationKind::HasAndBelongsToMany {
                    continue;
                }
                let mut tables = [names.plural.clone(), table_name(&association.name)];
                tables.sort();
                let join = tables.join("_");
                if !join_tables.insert(join.clone()) {
                    continue;
                }
                if let Some((path, id)) = self.next_migration(&format!("create_{join}")) {
                    let params = to_options(json!({"table_name": join, "tables": tables}));
                    self.file(section.clone(), path, id, params);
                }
            }
        }

        if let Some(views) = self.generator.views {
            let form_builder = strategies.form_builder.as_str();
            let view_params = |action: &str| {
                let mut params = parameters.clone();
                params.insert("action".into(), json!(action));
                params.insert("form_builder".into(), json!(form_builder));
                params
            };
            match strategies.views {
                ViewStrategy::Templates => {
                    let ext = strategies.template_engine.view_extension();
                    let dir = names.expand(views.template_dir);
                    for &action in views.actions {
                        let params = view_params(action);
                        self.file(
                            section.clone(),
                            format!("{dir}/{action}.html.{ext}"),
                            "mvc/view",
                            params,
                        );
                    }
                }
                strategy @ (ViewStrategy::React | ViewStrategy::Vue) => {
                    let ext = strategy.component_extension();
                    let dir = names.expand(views.component_dir);
                    for component in ["List", "Form"] {
                        let params = view_params(component.to_lowercase().as_str());
                        self.file(
                            section.clone(),
                            format!("{dir}/{}{component}.{ext}", names.pascal),
                            "shared/component",
                            params,
                        );
                    }
                }
            }
        }
    }

    fn database(&mut self) {
        let family = self.strategies.database;
        self.dependency(family.packages(), "database");
        let params = to_options(json!({
            "adapter": family.as_str(),
            "options": self.config.database_options(),
        }));
        let path = family.config_path(self.generator);
        self.file(
            ManifestSection::Database,
            path,
            &format!("database/{}", family.as_str()),
            params,
        );
    }

    fn search(&mut self) {
        let Some(engine) = self.strategies.search else {
            return;
        };
        self.dependency(engine.packages(), "search_engine");
        let params = to_options(json!({
            "engine": engine.as_str(),
            "options": self.config.search_engine_options(),
        }));
        let path = self.generator.config_file(engine.as_str());
        self.file(
            ManifestSection::Search,
            path,
            &format!("search/{}", engine.as_str()),
            params,
        );
    }

    fn vector_store(&mut self) {
        let (config, strategies) = (self.config, self.strategies);
        match &strategies.vector_store {
            None | Some(VectorStoreStrategy::Stub(_)) => {}
            Some(VectorStoreStrategy::Pgvector) => {
                let params = to_options(json!({
                    "store": "pgvector",
                    "dimensions": dimensions(config),
                    "options": config.vector_db_options(),
                }));

                self.dependency(PGVECTOR_PACKAGES, "vector_store");
                let initializer = self.generator.config_file("pgvector");
                self.file(
                    ManifestSection::VectorStore,
                    initializer,
                    "vector_store/pgvector/initializer",
                    params.clone(),
                );
                let module = self.generator.service_file("vector_search");
                self.file(
                    ManifestSection::VectorStore,
                    module,
                    "vector_store/pgvector/capability",
                    params.clone(),
                );
                if let Some((path, _)) = self.next_migration("enable_pgvector") {
                    self.file(
                        ManifestSection::VectorStore,
                        path,
                        "vector_store/pgvector/migration",
                        to_options(json!({"extension": "vector"})),
                    );
                }

                self.manifest.add_note(
                    "pgvector: DATABASE_URL must point to a PostgreSQL server with the \
                     `vector` extension available",
                );
                let database = strategies.database;
                if database != DatabaseFamily::Postgresql {
                    self.manifest.add_note(format!(
                        "pgvector requires PostgreSQL but the configured database is {}",
                        database.as_str()
                    ));
                }
            }
        }
    }

    fn embedding(&mut self) {
        let (config, strategies) = (self.config, self.strategies);
        match &strategies.embedding {
            None | Some(EmbeddingStrategy::Stub(_)) => {}
            Some(EmbeddingStrategy::OpenAi) => {
                let options = config.embedding_provider_options();
                self.dependency(OPENAI_PACKAGES, "embedding_provider");

                let selection = to_options(json!({
                    "provider": "openai",
                    "providers": ["openai"],
                }));
                let path = self.generator.service_file("embeddings");
                self.file(
                    ManifestSection::Embedding,
                    path,
                    "embedding/provider_selection",
                    selection,
                );

                let provider = to_options(json!({
                    "provider": "openai",
                    "model": options.get("model").cloned().unwrap_or(json!(OPENAI_MODEL)),
                    "max_input_chars": options
                        .get("max_input_chars")
                        .and_then(serde_json::Value::as_u64)
                        .unwrap_or(OPENAI_MAX_INPUT_CHARS),
                    "dimensions": dimensions(config),
                    "empty_result_on_failure": true,
                    "api_key_env": "OPENAI_API_KEY",
                }));
                let path = self.generator.service_file("embeddings/openai_provider");
                self.file(
                    ManifestSection::Embedding,
                    path,
                    "embedding/openai",
                    provider,
                );

                self.manifest
                    .add_note("openai: OPENAI_API_KEY must be set for embedding generation");
            }
        }
    }

    fn template_engine(&mut self) {
        let engine = self.strategies.template_engine;
        match engine.package() {
            None if self.generator.views.is_some() => {
                self.manifest.add_note(format!(
                    "template engine: using the default {} engine, no dependency added",
                    engine.as_str()
                ));
            }
            None => {}
            Some(_) if self.generator.views.is_none() => {
                self.manifest.add_note(format!(
                    "template engine: {} ignored, the {} target renders no server-side views",
                    engine.as_str(),
                    self.generator.id()
                ));
            }
            Some(package) => {
                self.manifest
                    .add_dependency(package, None, "template_engine");
                let path = self.generator.config_file(engine.as_str());
                self.file(
                    ManifestSection::TemplateEngine,
                    path,
                    &format!("template_engine/{}", engine.as_str()),
                    to_options(json!({"engine": engine.as_str()})),
                );
            }
        }
    }

    fn css(&mut self) {
        let CssStrategy::Installer(installer) = self.strategies.css else {
            return;
        };
        self.dependency(installer.packages(), "css_framework");
        let params = to_options(json!({"framework": installer.as_str()}));
        let assets = self.generator.assets_dir;
        match installer {
            CssInstaller::Bootstrap => {
                self.file(
                    ManifestSection::CssFramework,
                    format!("{assets}/application.bootstrap.scss"),
                    "css/bootstrap/stylesheet",
                    params,
                );
            }
            CssInstaller::Tailwind => {
                self.file(
                    ManifestSection::CssFramework,
                    format!("{assets}/application.tailwind.css"),
                    "css/tailwind/stylesheet",
                    params.clone(),
                );
                self.file(
                    ManifestSection::CssFramework,
                    "tailwind.config.js".to_string(),
                    "css/tailwind/config",
                    params,
                );
            }
        }
    }

    fn feature(&mut self, feature: &FeatureConfiguration) {
        let name = feature.name().to_string();
        let section = ManifestSection::Feature(name.clone());
        let provider = feature.provider().as_str();

        if !BUILTIN_PROVIDERS.contains(&provider) {
            self.manifest.add_dependency(provider, None, &name);
        }

        let mut params = to_options(json!({
            "feature": name,
            "provider": provider,
            "options": feature.options(),
        }));
        if let Some(auth) = feature.as_authentication() {
            params.insert("generate_user".into(), json!(auth.generate_user()));
            params.insert("passkeys".into(), json!(auth.passkeys()));
        }
        let path = self.generator.config_file(&format!("features/{name}"));
        self.file(section.clone(), path, &format!("feature/{name}"), params);

        if let Some(auth) = feature.as_authentication().filter(|a| a.passkeys()) {
            self.manifest.add_dependency("webauthn", None, &name);
            let path = self.generator.config_file("features/passkeys");
            self.file(
                section,
                path,
                "feature/authentication/passkeys",
                to_options(json!({"options": auth.passkey_options()})),
            );
        }
    }

    fn monitoring(&mut self) {
        for tool in self.strategies.monitoring.clone() {
            if let Some(packages) = tool.packages() {
                self.dependency(packages, "monitoring");
            }
            let path = self.generator.config_file(tool.as_str());
            self.file(
                ManifestSection::Monitoring,
                path,
                &format!("monitoring/{}", tool.as_str()),
                to_options(json!({"tool": tool.as_str()})),
            );
        }
    }
}

/// Vector dimensions: `vector_db_options.dimensions`, then the embedding
/// provider's, then the default.
fn dimensions(config: &ApplicationConfiguration) -> u64 {
    [config.vector_db_options(), config.embedding_provider_options()]
        .into_iter()
        .find_map(|options| options.get("dimensions").and_then(serde_json::Value::as_u64))
        .unwrap_or(DEFAULT_DIMENSIONS)
}

fn to_options(value: serde_json::Value) -> Options {
    match value {
        serde_json::Value::Object(map) => map,
        _ => Options::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::{AssociationDescriptor, AssociationOptions},
        value_objects::{AttributeType, GeneratorKind},
    };

    fn user() -> EntityDescriptor {
        let mut attrs = Options::new();
        attrs.insert("dependent".into(), json!("destroy"));
        EntityDescriptor::new("User")
            .unwrap()
            .with_attribute("email", AttributeType::String)
            .with_attribute("name", AttributeType::String)
            .with_association(AssociationDescriptor::new(
                AssociationKind::HasMany,
                "posts",
                AssociationOptions::from_options(attrs),
            ))
    }

    fn build(
        generator: Option<&str>,
        config: &ApplicationConfiguration,
        entities: &[EntityDescriptor],
    ) -> Manifest {
        let kind = generator.map(GeneratorKind::parse);
        let (strategies, _) = StrategySet::resolve(kind.as_ref(), config);
        build_manifest(config, &strategies, entities).unwrap()
    }

    fn sections(manifest: &Manifest) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for file in manifest.files() {
            let section = file.section.to_string();
            if out.last() != Some(&section) {
                out.push(section);
            }
        }
        out
    }

    #[test]
    fn same_input_same_manifest() {
        let mut config = ApplicationConfiguration::new();
        config.enable_vector_db("pgvector", Options::new());
        config.set_embedding_provider("openai", Options::new());
        let entities = [user()];

        let first = build(None, &config, &entities);
        let second = build(None, &config, &entities);
        assert_eq!(first, second);
    }

    #[test]
    fn blocks_follow_fixed_order() {
        let mut config = ApplicationConfiguration::new();
        config.set_database("postgresql", Options::new());
        config.enable_search_engine("elasticsearch", Options::new());
        config.enable_vector_db("pgvector", Options::new());
        config.set_embedding_provider("openai", Options::new());
        config.set_template_engine("slim");
        config.set_css_framework("tailwind");
        config.enable_background_jobs(None, Options::new());
        config.enable_authentication(None, Options::new());
        config.add_monitoring_tool("sentry");

        let post = EntityDescriptor::new("Post").unwrap();
        let manifest = build(None, &config, &[user(), post]);

        assert_eq!(
            sections(&manifest),
            [
                "structure",
                "entity:User",
                "entity:Post",
                "database",
                "search",
                "vector_store",
                "embedding",
                "template_engine",
                "css_framework",
                "feature:authentication",
                "feature:background_jobs",
                "monitoring",
            ]
        );
    }

    #[test]
    fn user_block_carries_canonical_dependent() {
        let manifest = build(None, &ApplicationConfiguration::new(), &[user()]);
        let model = manifest.file("app/models/user.rb").unwrap();
        assert_eq!(model.generator_id, "mvc/model");
        assert_eq!(
            model.parameters["associations"][0]["attrs"]["dependent"],
            json!("destroy")
        );

        let user_blocks = manifest
            .files()
            .iter()
            .filter(|f| f.section == ManifestSection::Entity("User".into()))
            .count();
        // model, controller, test, migration, five views
        assert_eq!(user_blocks, 9);
    }

    #[test]
    fn empty_entity_still_gets_a_skeleton() {
        let tag = EntityDescriptor::new("Tag").unwrap();
        let manifest = build(Some("python"), &ApplicationConfiguration::new(), &[tag]);
        assert!(manifest.file("app/models/tag.py").is_some());
        assert!(manifest.file("app/routers/tags.py").is_some());
    }

    #[test]
    fn empty_entity_list_is_a_minimal_skeleton() {
        let manifest = build(None, &ApplicationConfiguration::new(), &[]);
        assert!(manifest.file("Gemfile").is_some());
        assert!(manifest.file("config/database.yml").is_some());
    }

    #[test]
    fn qdrant_produces_no_vector_files() {
        let mut config = ApplicationConfiguration::new();
        config.enable_vector_db("qdrant", Options::new());
        let manifest = build(None, &config, &[user()]);
        assert_eq!(manifest.files_in(&ManifestSection::VectorStore).count(), 0);
    }

    #[test]
    fn pgvector_emits_initializer_module_and_migration() {
        let mut config = ApplicationConfiguration::new();
        config.set_database("postgresql", Options::new());
        let mut options = Options::new();
        options.insert("dimensions".into(), json!(768));
        config.enable_vector_db("pgvector", options);

        let manifest = build(None, &config, &[]);
        let files: Vec<_> = manifest
            .files_in(&ManifestSection::VectorStore)
            .map(|f| f.generator_id.as_str())
            .collect();
        assert_eq!(
            files,
            [
                "vector_store/pgvector/initializer",
                "vector_store/pgvector/capability",
                "vector_store/pgvector/migration",
            ]
        );
        let initializer = manifest.file("config/initializers/pgvector.rb").unwrap();
        assert_eq!(initializer.parameters["dimensions"], json!(768));
        assert!(manifest.dependencies().iter().any(|d| d.name == "neighbor"));
        assert!(manifest.notes().iter().any(|n| n.contains("DATABASE_URL")));
    }

    #[test]
    fn openai_provider_is_bounded_and_degrades() {
        let mut config = ApplicationConfiguration::new();
        config.set_embedding_provider("openai", Options::new());
        let manifest = build(None, &config, &[]);

        let provider = manifest
            .file("app/services/embeddings/openai_provider.rb")
            .unwrap();
        assert_eq!(provider.parameters["max_input_chars"], json!(8000));
        assert_eq!(provider.parameters["empty_result_on_failure"], json!(true));
        assert_eq!(provider.parameters["dimensions"], json!(1536));
        assert!(manifest.file("app/services/embeddings.rb").is_some());
    }

    #[test]
    fn default_template_engine_adds_note_only() {
        let manifest = build(None, &ApplicationConfiguration::new(), &[]);
        assert_eq!(
            manifest.files_in(&ManifestSection::TemplateEngine).count(),
            0
        );
        assert!(manifest.notes().iter().any(|n| n.contains("default erb")));
        assert!(
            !manifest
                .dependencies()
                .iter()
                .any(|d| d.origin == "template_engine")
        );
    }

    #[test]
    fn targets_without_views_get_no_engine_note() {
        for target in ["express", "python"] {
            let manifest = build(Some(target), &ApplicationConfiguration::new(), &[]);
            assert!(
                !manifest.notes().iter().any(|n| n.starts_with("template engine")),
                "{target} should not mention a template engine"
            );
        }
    }

    #[test]
    fn haml_adds_dependency_and_config() {
        let mut config = ApplicationConfiguration::new();
        config.set_template_engine("haml");
        let manifest = build(None, &config, &[user()]);

        assert!(manifest.file("config/initializers/haml.rb").is_some());
        assert!(manifest.file("app/views/users/index.html.haml").is_some());
        assert!(manifest.dependencies().iter().any(|d| d.name == "haml-rails"));
    }

    #[test]
    fn configured_gems_come_first() {
        let mut config = ApplicationConfiguration::new();
        config.add_gem("rails", Some("~> 7.1"), Options::new()).unwrap();
        config.set_database("postgresql", Options::new());
        let manifest = build(None, &config, &[]);

        let first = &manifest.dependencies()[0];
        assert_eq!(first.name, "rails");
        assert_eq!(first.version.as_deref(), Some("~> 7.1"));
        assert_eq!(first.origin, CONFIGURED);
    }

    #[test]
    fn node_target_uses_its_own_paths() {
        let mut config = ApplicationConfiguration::new();
        config.set_database("sequelize", Options::new());
        let manifest = build(Some("express"), &config, &[user()]);

        assert!(manifest.file("src/models/user.model.js").is_some());
        assert!(manifest.file("src/routes/users.routes.js").is_some());
        assert!(
            manifest
                .files()
                .iter()
                .any(|f| f.generator_id == "express/migration")
        );
        assert!(manifest.dependencies().iter().any(|d| d.name == "sequelize"));
    }

    #[test]
    fn habtm_join_table_is_emitted_once() {
        let tag = EntityDescriptor::new("Tag").unwrap().with_association(
            AssociationDescriptor::new(
                AssociationKind::HasAndBelongsToMany,
                "posts",
                AssociationOptions::default(),
            ),
        );
        let post = EntityDescriptor::new("Post").unwrap().with_association(
            AssociationDescriptor::new(
                AssociationKind::HasAndBelongsToMany,
                "tags",
                AssociationOptions::default(),
            ),
        );
        let manifest = build(None, &ApplicationConfiguration::new(), &[tag, post]);
        let joins = manifest
            .files()
            .iter()
            .filter(|f| f.target_path.ends_with("_create_posts_tags.rb"))
            .count();
        assert_eq!(joins, 1);
    }

    #[test]
    fn passkeys_add_their_own_file() {
        let mut config = ApplicationConfiguration::new();
        let mut options = Options::new();
        options.insert("passkeys".into(), json!(true));
        config.enable_authentication(Some("devise"), options);
        let manifest = build(None, &config, &[]);

        assert!(manifest.file("config/initializers/features/authentication.rb").is_some());
        assert!(manifest.file("config/initializers/features/passkeys.rb").is_some());
        assert!(manifest.dependencies().iter().any(|d| d.name == "webauthn"));
    }

    #[test]
    fn feature_and_monitoring_tool_may_share_a_name() {
        let mut config = ApplicationConfiguration::new();
        config
            .enable_feature("sentry", Some("sentry"), Options::new())
            .unwrap();
        config.add_monitoring_tool("sentry");
        let manifest = build(None, &config, &[]);

        assert!(manifest.file("config/initializers/features/sentry.rb").is_some());
        assert!(manifest.file("config/initializers/sentry.rb").is_some());
    }

    #[test]
    fn builtin_providers_add_no_dependency() {
        let mut config = ApplicationConfiguration::new();
        config.enable_file_upload(None, Options::new());
        let manifest = build(None, &config, &[]);
        assert!(
            !manifest
                .dependencies()
                .iter()
                .any(|d| d.name == "active_storage")
        );
        assert!(manifest.file("config/initializers/features/file_upload.rb").is_some());
    }

    #[test]
    fn conflicting_entity_paths_are_rejected() {
        let config = ApplicationConfiguration::new();
        let (strategies, _) = StrategySet::resolve(None, &config);
        let entities = [
            EntityDescriptor::new("BlogPost").unwrap(),
            EntityDescriptor::new("blog_post").unwrap(),
        ];
        let err = build_manifest(&config, &strategies, &entities).unwrap_err();
        assert!(matches!(err, DomainError::DuplicatePath { .. }));
    }
}
