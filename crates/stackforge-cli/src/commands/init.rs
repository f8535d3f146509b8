//! `stackforge init`: write a starter configuration document.

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use stackforge_core::domain::{GeneratorDef, GeneratorKind, resolve_generator};

use crate::{
    cli::{GlobalArgs, InitArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Create `<dir>/<id>.yml`.
///
/// 1. Pick the generator the framework maps to (warn on fallback)
/// 2. Refuse to overwrite unless `--force` or the user confirms
/// 3. Write the document and point at the next command
#[instrument(skip_all, fields(framework = %args.framework))]
pub fn execute(
    args: InitArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let id = args
        .id
        .clone()
        .unwrap_or_else(|| config.documents.base.clone());
    validate_id(&id)?;

    let dir = super::documents_dir(&global, &config);
    let path = dir.join(format!("{id}.yml"));

    let resolution = resolve_generator(Some(&GeneratorKind::parse(&args.framework)));
    for warning in &resolution.warnings {
        output.warning(&warning.to_string())?;
    }
    let generator = resolution.value;
    debug!(generator = generator.id(), path = %path.display(), "Writing starter document");

    if path.exists() && !args.force && !confirm_overwrite(&path)? {
        return Err(CliError::FileExists { path });
    }

    std::fs::create_dir_all(&dir)
        .with_cli_context(|| format!("Failed to create '{}'", dir.display()))?;
    std::fs::write(&path, starter_document(&args, generator, Utc::now()))
        .with_cli_context(|| format!("Failed to write '{}'", path.display()))?;

    output.success(&format!("Created {}", path.display()))?;
    if !output.is_quiet() {
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!("  stackforge generate {id}"))?;
    }
    Ok(())
}

fn validate_id(id: &str) -> CliResult<()> {
    let reason = if id.is_empty() {
        Some("id cannot be empty")
    } else if id.starts_with('.') {
        Some("id cannot start with '.'")
    } else if id.contains(['/', '\\']) {
        Some("id cannot contain path separators")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(CliError::InvalidInput {
            message: format!("'{id}': {reason}"),
            source: None,
        }),
        None => Ok(()),
    }
}

/// Ask before overwriting. `Ok(false)` means "refuse": no TTY, or the
/// `interactive` feature is off.
#[cfg(feature = "interactive")]
fn confirm_overwrite(path: &Path) -> CliResult<bool> {
    use std::io::IsTerminal as _;

    if !std::io::stdin().is_terminal() {
        return Ok(false);
    }

    let overwrite = dialoguer::Confirm::new()
        .with_prompt(format!("{} already exists. Overwrite?", path.display()))
        .default(false)
        .interact()
        .map_err(|e| CliError::InvalidInput {
            message: "failed to read confirmation".into(),
            source: Some(Box::new(e)),
        })?;

    if overwrite {
        Ok(true)
    } else {
        Err(CliError::Cancelled)
    }
}

#[cfg(not(feature = "interactive"))]
fn confirm_overwrite(_path: &Path) -> CliResult<bool> {
    Ok(false)
}

fn starter_document(args: &InitArgs, generator: &GeneratorDef, now: DateTime<Utc>) -> String {
    format!(
        "# Generated by stackforge {version} on {date}\n\
         # Overrides are read from {provider}-{framework}-{environment}.yml next to this file.\n\
         provider: {provider}\n\
         framework: {framework}\n\
         environment: {environment}\n\
         database: {database}\n\
         models:\n\
         \x20 User:\n\
         \x20   attributes:\n\
         \x20     email: string\n\
         \x20     name: string\n",
        version = env!("CARGO_PKG_VERSION"),
        date = now.format("%Y-%m-%d %H:%M:%S UTC"),
        provider = args.provider,
        framework = args.framework,
        environment = args.environment,
        database = generator.fallback_database.as_str(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use stackforge_core::domain::Value;

    fn init_args(framework: &str) -> InitArgs {
        InitArgs {
            id: None,
            provider: "aws".into(),
            framework: framework.into(),
            environment: "dev".into(),
            force: false,
        }
    }

    fn generator_for(framework: &str) -> &'static GeneratorDef {
        resolve_generator(Some(&GeneratorKind::parse(framework))).value
    }

    #[test]
    fn starter_is_valid_yaml_with_required_keys() {
        let now = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let text = starter_document(&init_args("rails"), generator_for("rails"), now);

        assert!(text.starts_with("# Generated by stackforge"));
        assert!(text.contains("2026-01-02 03:04:05 UTC"));

        let doc: Value = serde_yaml::from_str(&text).unwrap();
        assert_eq!(doc["provider"].as_str(), Some("aws"));
        assert_eq!(doc["framework"].as_str(), Some("rails"));
        assert_eq!(doc["environment"].as_str(), Some("dev"));
        assert_eq!(doc["database"].as_str(), Some("sqlite"));
        assert_eq!(doc["models"]["User"]["attributes"]["email"].as_str(), Some("string"));
    }

    #[test]
    fn starter_database_follows_generator() {
        let now = Utc::now();
        let text = starter_document(&init_args("express"), generator_for("express"), now);
        let doc: Value = serde_yaml::from_str(&text).unwrap();
        assert_eq!(doc["database"].as_str(), Some("mongodb"));
    }

    #[test]
    fn id_validation() {
        assert!(validate_id("app").is_ok());
        assert!(validate_id("aws-rails-prod").is_ok());
        assert!(matches!(validate_id(""), Err(CliError::InvalidInput { .. })));
        assert!(validate_id(".hidden").is_err());
        assert!(validate_id("nested/app").is_err());
    }
}
