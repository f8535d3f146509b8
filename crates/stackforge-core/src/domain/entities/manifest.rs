use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use crate::domain::{document::Options, error::DomainError};

/// Which part of the manifest a file belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum ManifestSection {
    Structure,
    Entity(String),
    Database,
    Search,
    VectorStore,
    Embedding,
    TemplateEngine,
    CssFramework,
    Feature(String),
    Monitoring,
}

impl fmt::Display for ManifestSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structure => f.write_str("structure"),
            Self::Entity(name) => write!(f, "entity:{name}"),
            Self::Database => f.write_str("database"),
            Self::Search => f.write_str("search"),
            Self::VectorStore => f.write_str("vector_store"),
            Self::Embedding => f.write_str("embedding"),
            Self::TemplateEngine => f.write_str("template_engine"),
            Self::CssFramework => f.write_str("css_framework"),
            Self::Feature(name) => write!(f, "feature:{name}"),
            Self::Monitoring => f.write_str("monitoring"),
        }
    }
}

/// One file the renderer should produce.
///
/// `generator_id` names the template the renderer applies; `parameters` is
/// everything that template needs. No content is produced here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileSpec {
    pub target_path: String,
    pub generator_id: String,
    pub parameters: Options,
    pub section: ManifestSection,
}

impl FileSpec {
    pub fn new(
        section: ManifestSection,
        target_path: impl Into<String>,
        generator_id: impl Into<String>,
        parameters: Options,
    ) -> Self {
        Self {
            target_path: target_path.into(),
            generator_id: generator_id.into(),
            parameters,
            section,
        }
    }
}

/// A package the generated application depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencySpec {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// `configured` for user-declared gems, otherwise the strategy that
    /// added it.
    pub origin: String,
}

/// Ordered, pure-data description of everything a run generates.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Manifest {
    files: Vec<FileSpec>,
    dependencies: Vec<DependencySpec>,
    notes: Vec<String>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, file: FileSpec) {
        self.files.push(file);
    }

    pub fn add_dependency(
        &mut self,
        name: impl Into<String>,
        version: Option<String>,
        origin: impl Into<String>,
    ) {
        self.dependencies.push(DependencySpec {
            name: name.into(),
            version,
            origin: origin.into(),
        });
    }

    pub fn add_note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    pub fn files(&self) -> &[FileSpec] {
        &self.files
    }

    pub fn dependencies(&self) -> &[DependencySpec] {
        &self.dependencies
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn files_in<'a>(
        &'a self,
        section: &'a ManifestSection,
    ) -> impl Iterator<Item = &'a FileSpec> + 'a {
        self.files.iter().filter(move |f| &f.section == section)
    }

    pub fn file(&self, target_path: &str) -> Option<&FileSpec> {
        self.files.iter().find(|f| f.target_path == target_path)
    }

    /// Every path relative and unique.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        for file in &self.files {
            if Path::new(&file.target_path).is_absolute() || !seen.insert(&file.target_path) {
                return Err(DomainError::DuplicatePath {
                    path: file.target_path.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str) -> FileSpec {
        FileSpec::new(ManifestSection::Structure, path, "structure/readme", Options::new())
    }

    #[test]
    fn validate_rejects_duplicate_paths() {
        let mut manifest = Manifest::new();
        manifest.add_file(file("README.md"));
        manifest.add_file(file("README.md"));
        assert_eq!(
            manifest.validate(),
            Err(DomainError::DuplicatePath {
                path: "README.md".into()
            })
        );
    }

    #[test]
    fn validate_rejects_absolute_paths() {
        let mut manifest = Manifest::new();
        manifest.add_file(file("/etc/passwd"));
        assert!(manifest.validate().is_err());
    }

    #[test]
    fn section_serializes_with_name() {
        let json = serde_json::to_value(ManifestSection::Entity("User".into())).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "entity", "name": "User"}));
        assert_eq!(ManifestSection::Entity("User".into()).to_string(), "entity:User");
    }
}
