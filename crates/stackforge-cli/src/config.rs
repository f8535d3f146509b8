//! CLI settings.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns its settings; the core crate never sees them.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `STACKFORGE_CLI__*` environment variables (`__` separates sections)
//! 3. Settings file (`--config`, or the platform config directory)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use stackforge_core::application::ConfigurationLoader;

/// Environment prefix for settings overrides.
pub const ENV_PREFIX: &str = "STACKFORGE_CLI";

/// CLI settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where declarative documents are looked up.
    pub documents: DocumentsConfig,
    /// Loader behaviour.
    pub loader: LoaderConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentsConfig {
    pub dir: PathBuf,
    /// Base document id used when a command is given none.
    pub base: String,
    /// How deep below `dir` documents are searched for.
    pub max_depth: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Variable whose value overrides the merged `region`.
    pub region_var: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("config/stackforge"),
            base: "app".into(),
            max_depth: 3,
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            region_var: ConfigurationLoader::DEFAULT_REGION_VAR.into(),
        }
    }
}

impl AppConfig {
    /// Load settings, layering file and environment over the defaults.
    ///
    /// An explicit `config_file` must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };
        Self::load_from(&path, required, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_from(path: &Path, required: bool, env: Environment) -> anyhow::Result<Self> {
        let defaults = Config::try_from(&Self::default()).context("serialising defaults")?;

        Config::builder()
            .add_source(defaults)
            .add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .add_source(env.separator("__").try_parsing(true))
            .build()
            .with_context(|| format!("reading settings from {}", path.display()))?
            .try_deserialize()
            .context("invalid settings")
    }

    /// Path to the default settings file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.stackforge.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "stackforge", "stackforge")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".stackforge.toml"))
    }

    /// Look up a dotted key, e.g. `documents.base`.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = serde_json::to_value(self).ok()?;
        let found = key
            .split('.')
            .try_fold(&value, |node, part| node.get(part))?;
        Some(match found {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}
