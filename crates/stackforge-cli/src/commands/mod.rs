//! Command handlers.
//!
//! Each handler turns parsed arguments into calls on `stackforge-core` and
//! renders the result. No business logic lives here.

pub mod completions;
pub mod config;
pub mod generate;
pub mod init;
pub mod resolve;
pub mod strategies;

use std::path::PathBuf;

use tracing::debug;

use stackforge_adapters::{DirectorySource, ProcessEnvironment};
use stackforge_core::application::{ConfigurationLoader, ResolvedConfiguration};

use crate::{
    cli::{DocumentArgs, GlobalArgs},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// Directory holding the documents: `--dir` wins over the settings file.
pub(crate) fn documents_dir(global: &GlobalArgs, config: &AppConfig) -> PathBuf {
    global
        .dir
        .clone()
        .unwrap_or_else(|| config.documents.dir.clone())
}

/// Base document id: the positional argument wins over the settings file.
pub(crate) fn base_id<'a>(args: &'a DocumentArgs, config: &'a AppConfig) -> &'a str {
    args.base.as_deref().unwrap_or(&config.documents.base)
}

/// Wire the filesystem and process adapters into a loader.
pub(crate) fn build_loader(global: &GlobalArgs, config: &AppConfig) -> ConfigurationLoader {
    let root = documents_dir(global, config);
    debug!(root = %root.display(), region_var = %config.loader.region_var, "Building loader");

    let source = DirectorySource::new(root).with_max_depth(config.documents.max_depth);
    ConfigurationLoader::new(Box::new(source), Box::new(ProcessEnvironment))
        .with_region_var(config.loader.region_var.clone())
}

/// Load and merge the documents named by `args`.
pub(crate) fn load(
    args: &DocumentArgs,
    global: &GlobalArgs,
    config: &AppConfig,
) -> CliResult<ResolvedConfiguration> {
    let loader = build_loader(global, config);
    Ok(loader.load(base_id(args, config))?)
}

/// Print warnings collected during a run, one per line.
pub(crate) fn print_warnings<W: std::fmt::Display>(
    warnings: &[W],
    output: &OutputManager,
) -> CliResult<()> {
    for warning in warnings {
        output.warning(&warning.to_string())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    fn global(dir: Option<&str>) -> GlobalArgs {
        GlobalArgs {
            verbose: 0,
            quiet: false,
            no_color: true,
            config: None,
            dir: dir.map(PathBuf::from),
            output_format: OutputFormat::Plain,
        }
    }

    #[test]
    fn dir_flag_overrides_settings() {
        let config = AppConfig::default();
        assert_eq!(
            documents_dir(&global(Some("conf")), &config),
            PathBuf::from("conf")
        );
        assert_eq!(
            documents_dir(&global(None), &config),
            PathBuf::from("config/stackforge")
        );
    }

    #[test]
    fn base_id_defaults_to_settings() {
        let config = AppConfig::default();
        assert_eq!(base_id(&DocumentArgs { base: None }, &config), "app");
        assert_eq!(
            base_id(
                &DocumentArgs {
                    base: Some("staging".into())
                },
                &config
            ),
            "staging"
        );
    }

    #[test]
    fn loader_uses_configured_region_var() {
        let mut config = AppConfig::default();
        config.loader.region_var = "DEPLOY_REGION".into();
        let loader = build_loader(&global(None), &config);
        assert_eq!(loader.region_var(), "DEPLOY_REGION");
    }
}
