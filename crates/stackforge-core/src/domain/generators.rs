//! Generator registry.
//!
//! Each target framework is described exactly once by a [`GeneratorDef`]:
//! where its files live, which templates render them and which database it
//! falls back to. The manifest builder reads these tables; it never matches
//! on the generator kind itself.
//!
//! # Adding a New Generator
//!
//! 1. Add a variant to `GeneratorKind` in `value_objects.rs`
//! 2. Add one `static` [`GeneratorDef`] here and list it in
//!    [`GENERATOR_REGISTRY`]

use serde::Serialize;

use crate::domain::{
    common::{table_name, to_pascal_case, to_snake_case},
    strategies::DatabaseFamily,
    value_objects::GeneratorKind,
    warning::{Concern, GenerationWarning, Resolution},
};

/// Package registry the generated project installs from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ecosystem {
    RubyGems,
    Npm,
    PyPi,
}

/// Per-ecosystem package names for one dependency. `None` means the concern
/// needs no package on that ecosystem.
#[derive(Debug, Clone, Copy)]
pub struct Packages {
    pub ruby: Option<&'static str>,
    pub npm: Option<&'static str>,
    pub pypi: Option<&'static str>,
}

impl Packages {
    pub const fn all(ruby: &'static str, npm: &'static str, pypi: &'static str) -> Self {
        Self {
            ruby: Some(ruby),
            npm: Some(npm),
            pypi: Some(pypi),
        }
    }

    pub const fn for_ecosystem(&self, ecosystem: Ecosystem) -> Option<&'static str> {
        match ecosystem {
            Ecosystem::RubyGems => self.ruby,
            Ecosystem::Npm => self.npm,
            Ecosystem::PyPi => self.pypi,
        }
    }
}

/// Role a per-entity file plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityRole {
    Model,
    Controller,
    Routes,
    Schema,
    Test,
}

impl EntityRole {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Controller => "controller",
            Self::Routes => "routes",
            Self::Schema => "schema",
            Self::Test => "test",
        }
    }
}

/// A file emitted once per project.
#[derive(Debug, Clone, Copy)]
pub struct StructuralFileDef {
    pub path: &'static str,
    pub generator_id: &'static str,
}

/// A file emitted once per entity. `path` may use `{singular}`, `{plural}`
/// and `{pascal}`.
#[derive(Debug, Clone, Copy)]
pub struct EntityFileDef {
    pub role: EntityRole,
    pub path: &'static str,
    pub generator_id: &'static str,
}

/// Schema migrations, when the target uses them. `path` uses `{seq}` and
/// `{name}`.
#[derive(Debug, Clone, Copy)]
pub struct MigrationDef {
    pub path: &'static str,
    pub generator_id: &'static str,
    pub applies_to: fn(DatabaseFamily) -> bool,
    pub sequence: fn(usize) -> String,
}

/// Server-rendered or component views.
#[derive(Debug, Clone, Copy)]
pub struct ViewDef {
    /// Directory for server-rendered templates.
    pub template_dir: &'static str,
    pub actions: &'static [&'static str],
    /// Directory for client-side components when the frontend is a SPA.
    pub component_dir: &'static str,
}

/// Everything the manifest builder needs to know about one target.
#[derive(Debug, Clone)]
pub struct GeneratorDef {
    pub kind: GeneratorKind,
    pub ecosystem: Ecosystem,
    pub source_ext: &'static str,
    /// Database used when the configured one is not recognized.
    pub fallback_database: DatabaseFamily,
    pub structure: &'static [StructuralFileDef],
    pub entity_files: &'static [EntityFileDef],
    pub migration: Option<MigrationDef>,
    pub views: Option<ViewDef>,
    /// Initializers and per-service configuration.
    pub config_dir: &'static str,
    /// Application-level service modules.
    pub services_dir: &'static str,
    pub assets_dir: &'static str,
}

impl GeneratorDef {
    pub fn id(&self) -> &str {
        self.kind.as_str()
    }

    /// `{config_dir}/{name}.{ext}`
    pub fn config_file(&self, name: &str) -> String {
        format!("{}/{}.{}", self.config_dir, name, self.source_ext)
    }

    /// `{services_dir}/{name}.{ext}`
    pub fn service_file(&self, name: &str) -> String {
        format!("{}/{}.{}", self.services_dir, name, self.source_ext)
    }

    /// Path of migration `name`, numbered `index` (1-based) within the run.
    pub fn migration_file(migration: &MigrationDef, index: usize, name: &str) -> String {
        migration
            .path
            .replace("{seq}", &(migration.sequence)(index))
            .replace("{name}", name)
    }
}

impl PartialEq for GeneratorDef {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

fn relational(family: DatabaseFamily) -> bool {
    matches!(
        family,
        DatabaseFamily::Sqlite | DatabaseFamily::Postgresql | DatabaseFamily::Mysql
    )
}

fn sequelize_only(family: DatabaseFamily) -> bool {
    family == DatabaseFamily::Sequelize
}

fn timestamp_sequence(index: usize) -> String {
    (20_240_101_000_000_u64 + index as u64).to_string()
}

fn revision_sequence(index: usize) -> String {
    format!("{index:04}")
}

pub static MVC: GeneratorDef = GeneratorDef {
    kind: GeneratorKind::Mvc,
    ecosystem: Ecosystem::RubyGems,
    source_ext: "rb",
    fallback_database: DatabaseFamily::Sqlite,
    structure: &[
        StructuralFileDef {
            path: "Gemfile",
            generator_id: "mvc/gemfile",
        },
        StructuralFileDef {
            path: "config/application.rb",
            generator_id: "mvc/application",
        },
        StructuralFileDef {
            path: "config/routes.rb",
            generator_id: "mvc/routes",
        },
        StructuralFileDef {
            path: "app/controllers/application_controller.rb",
            generator_id: "mvc/application_controller",
        },
        StructuralFileDef {
            path: "README.md",
            generator_id: "shared/readme",
        },
    ],
    entity_files: &[
        EntityFileDef {
            role: EntityRole::Model,
            path: "app/models/{singular}.rb",
            generator_id: "mvc/model",
        },
        EntityFileDef {
            role: EntityRole::Controller,
            path: "app/controllers/{plural}_controller.rb",
            generator_id: "mvc/controller",
        },
        EntityFileDef {
            role: EntityRole::Test,
            path: "test/models/{singular}_test.rb",
            generator_id: "mvc/model_test",
        },
    ],
    migration: Some(MigrationDef {
        path: "db/migrate/{seq}_{name}.rb",
        generator_id: "mvc/migration",
        applies_to: relational,
        sequence: timestamp_sequence,
    }),
    views: Some(ViewDef {
        template_dir: "app/views/{plural}",
        actions: &["index", "show", "new", "edit", "_form"],
        component_dir: "app/javascript/components/{plural}",
    }),
    config_dir: "config/initializers",
    services_dir: "app/services",
    assets_dir: "app/assets/stylesheets",
};

pub static EXPRESS: GeneratorDef = GeneratorDef {
    kind: GeneratorKind::Express,
    ecosystem: Ecosystem::Npm,
    source_ext: "js",
    fallback_database: DatabaseFamily::Mongodb,
    structure: &[
        StructuralFileDef {
            path: "package.json",
            generator_id: "express/package",
        },
        StructuralFileDef {
            path: "src/app.js",
            generator_id: "express/app",
        },
        StructuralFileDef {
            path: "src/server.js",
            generator_id: "express/server",
        },
        StructuralFileDef {
            path: "src/routes/index.js",
            generator_id: "express/routes",
        },
        StructuralFileDef {
            path: "README.md",
            generator_id: "shared/readme",
        },
    ],
    entity_files: &[
        EntityFileDef {
            role: EntityRole::Model,
            path: "src/models/{singular}.model.js",
            generator_id: "express/model",
        },
        EntityFileDef {
            role: EntityRole::Controller,
            path: "src/controllers/{plural}.controller.js",
            generator_id: "express/controller",
        },
        EntityFileDef {
            role: EntityRole::Routes,
            path: "src/routes/{plural}.routes.js",
            generator_id: "express/routes_resource",
        },
        EntityFileDef {
            role: EntityRole::Test,
            path: "test/{plural}.test.js",
            generator_id: "express/test",
        },
    ],
    migration: Some(MigrationDef {
        path: "src/migrations/{seq}_{name}.js",
        generator_id: "express/migration",
        applies_to: sequelize_only,
        sequence: timestamp_sequence,
    }),
    views: None,
    config_dir: "src/config",
    services_dir: "src/services",
    assets_dir: "public/stylesheets",
};

pub static PYTHON: GeneratorDef = GeneratorDef {
    kind: GeneratorKind::Python,
    ecosystem: Ecosystem::PyPi,
    source_ext: "py",
    fallback_database: DatabaseFamily::Sqlite,
    structure: &[
        StructuralFileDef {
            path: "pyproject.toml",
            generator_id: "python/pyproject",
        },
        StructuralFileDef {
            path: "app/main.py",
            generator_id: "python/main",
        },
        StructuralFileDef {
            path: "app/routers/__init__.py",
            generator_id: "python/routers",
        },
        StructuralFileDef {
            path: "README.md",
            generator_id: "shared/readme",
        },
    ],
    entity_files: &[
        EntityFileDef {
            role: EntityRole::Model,
            path: "app/models/{singular}.py",
            generator_id: "python/model",
        },
        EntityFileDef {
            role: EntityRole::Schema,
            path: "app/schemas/{singular}.py",
            generator_id: "python/schema",
        },
        EntityFileDef {
            role: EntityRole::Routes,
            path: "app/routers/{plural}.py",
            generator_id: "python/router",
        },
        EntityFileDef {
            role: EntityRole::Test,
            path: "tests/test_{plural}.py",
            generator_id: "python/test",
        },
    ],
    migration: Some(MigrationDef {
        path: "alembic/versions/{seq}_{name}.py",
        generator_id: "python/migration",
        applies_to: relational,
        sequence: revision_sequence,
    }),
    views: None,
    config_dir: "app/config",
    services_dir: "app/services",
    assets_dir: "app/static",
};

/// All generators. The first entry is the default.
pub static GENERATOR_REGISTRY: &[&GeneratorDef] = &[&MVC, &EXPRESS, &PYTHON];

pub fn find_generator(kind: &GeneratorKind) -> Option<&'static GeneratorDef> {
    GENERATOR_REGISTRY.iter().copied().find(|def| &def.kind == kind)
}

/// Pick the generator for `kind`.
///
/// Total: an omitted kind silently selects the default (MVC) generator, an
/// unrecognized one selects it with a warning.
pub fn resolve_generator(kind: Option<&GeneratorKind>) -> Resolution<&'static GeneratorDef> {
    match kind {
        None => Resolution::exact(&MVC),
        Some(kind) => match find_generator(kind) {
            Some(def) => Resolution::exact(def),
            None => Resolution::with_warning(
                &MVC,
                GenerationWarning::unsupported(Concern::Generator, kind.as_str(), MVC.id()),
            ),
        },
    }
}

/// Derived names used to fill path templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityNames {
    pub singular: String,
    pub plural: String,
    pub pascal: String,
}

impl EntityNames {
    pub fn of(entity: &str) -> Self {
        Self {
            singular: to_snake_case(entity),
            plural: table_name(entity),
            pascal: to_pascal_case(entity),
        }
    }

    pub fn expand(&self, template: &str) -> String {
        template
            .replace("{singular}", &self.singular)
            .replace("{plural}", &self.plural)
            .replace("{pascal}", &self.pascal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_covers_every_recognized_kind() {
        for name in GeneratorKind::RECOGNIZED {
            let kind = GeneratorKind::parse(name);
            assert!(find_generator(&kind).is_some(), "no generator for {name}");
        }
        assert_eq!(GENERATOR_REGISTRY[0].kind, GeneratorKind::Mvc);
    }

    #[test]
    fn aliases_resolve_to_their_generator() {
        let node = GeneratorKind::parse("node");
        assert_eq!(resolve_generator(Some(&node)).value.kind, GeneratorKind::Express);
        let rails = GeneratorKind::parse("rails");
        assert_eq!(resolve_generator(Some(&rails)).value.kind, GeneratorKind::Mvc);
    }

    #[test]
    fn omitted_kind_defaults_without_warning() {
        let resolved = resolve_generator(None);
        assert_eq!(resolved.value.kind, GeneratorKind::Mvc);
        assert!(resolved.warnings.is_empty());
    }

    #[test]
    fn unrecognized_kind_falls_back_with_warning() {
        let cdktf = GeneratorKind::parse("cdktf");
        let resolved = resolve_generator(Some(&cdktf));
        assert_eq!(resolved.value.kind, GeneratorKind::Mvc);
        assert_eq!(
            resolved.warnings,
            [GenerationWarning::unsupported(
                Concern::Generator,
                "cdktf",
                "mvc"
            )]
        );
    }

    #[test]
    fn fallback_database_differs_per_target() {
        assert_eq!(MVC.fallback_database, DatabaseFamily::Sqlite);
        assert_eq!(EXPRESS.fallback_database, DatabaseFamily::Mongodb);
        assert_eq!(PYTHON.fallback_database, DatabaseFamily::Sqlite);
    }

    #[test]
    fn entity_names_expand_templates() {
        let names = EntityNames::of("BlogPost");
        assert_eq!(names.expand("app/models/{singular}.rb"), "app/models/blog_post.rb");
        assert_eq!(names.expand("{plural}/{pascal}"), "blog_posts/BlogPost");
    }

    #[test]
    fn migration_paths_are_numbered() {
        let migration = MVC.migration.unwrap();
        assert_eq!(
            GeneratorDef::migration_file(&migration, 1, "create_users"),
            "db/migrate/20240101000001_create_users.rb"
        );
        let migration = PYTHON.migration.unwrap();
        assert_eq!(
            GeneratorDef::migration_file(&migration, 2, "create_posts"),
            "alembic/versions/0002_create_posts.py"
        );
    }
}
