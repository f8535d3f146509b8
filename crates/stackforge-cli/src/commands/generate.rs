//! `stackforge generate`: load, resolve and print the manifest.

use std::path::Path;

use serde::Serialize;
use tracing::{info, instrument};

use stackforge_core::{
    application::GenerationRun,
    domain::{DeploymentTarget, GenerationWarning, Manifest, ManifestSection},
};

use crate::{
    cli::{GenerateArgs, GlobalArgs, OutputFormat},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::{OutputManager, render_structured},
};

/// Everything `generate` reports for one run.
#[derive(Debug, Serialize)]
struct GenerateReport<'a> {
    run_id: String,
    base: &'a str,
    generator: &'a str,
    deployment: &'a DeploymentTarget,
    manifest: &'a Manifest,
    warnings: &'a [GenerationWarning],
}

/// Execute the `stackforge generate` command.
#[instrument(skip_all, fields(base = args.document.base.as_deref().unwrap_or("(default)")))]
pub fn execute(
    args: GenerateArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let base = super::base_id(&args.document, &config).to_owned();

    // Refuse before doing any work.
    if let Some(path) = args.out.as_ref().filter(|p| p.exists() && !args.force) {
        return Err(CliError::FileExists { path: path.clone() });
    }

    let resolved = super::load(&args.document, &global, &config)?;
    let deployment = resolved.deployment.clone();

    let mut run = GenerationRun::from_resolved(resolved)?;
    let manifest = run.execute()?.clone();
    let generator = run
        .strategies()
        .map(|s| s.generator.id().to_owned())
        .unwrap_or_default();

    info!(
        run_id = %run.id(),
        files = manifest.files().len(),
        dependencies = manifest.dependencies().len(),
        "Manifest ready"
    );

    let report = GenerateReport {
        run_id: run.id().to_string(),
        base: &base,
        generator: &generator,
        deployment: &deployment,
        manifest: &manifest,
        warnings: run.warnings(),
    };

    if let Some(path) = &args.out {
        write_report(path, out_format(path, output.format()), &report)?;
        super::print_warnings(run.warnings(), &output)?;
        output.success(&format!(
            "Wrote manifest ({} files) to {}",
            manifest.files().len(),
            path.display()
        ))?;
        return Ok(());
    }

    if output.format().is_structured() {
        return output.emit(&report);
    }

    print_human(&report, &output)
}

/// Format for `--out`: the extension decides, else the structured
/// `--output-format`, else JSON.
fn out_format(path: &Path, selected: OutputFormat) -> OutputFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => OutputFormat::Json,
        Some("yml" | "yaml") => OutputFormat::Yaml,
        _ if selected.is_structured() => selected,
        _ => OutputFormat::Json,
    }
}

fn write_report(path: &Path, format: OutputFormat, report: &GenerateReport<'_>) -> CliResult<()> {
    let rendered = render_structured(format, report)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_cli_context(|| format!("Failed to create '{}'", parent.display()))?;
    }
    std::fs::write(path, rendered)
        .with_cli_context(|| format!("Failed to write manifest to '{}'", path.display()))
}

fn print_human(report: &GenerateReport<'_>, output: &OutputManager) -> CliResult<()> {
    let d = report.deployment;
    output.header(&format!(
        "Manifest for '{}' ({} on {}, {})",
        report.base, report.generator, d.provider, d.environment
    ))?;

    let mut current: Option<&ManifestSection> = None;
    for file in report.manifest.files() {
        if current != Some(&file.section) {
            output.print("")?;
            output.print(&format!("[{}]", file.section))?;
            current = Some(&file.section);
        }
        output.print(&format!(
            "  {}  {}",
            file.target_path,
            output.dim(&file.generator_id)
        ))?;
    }

    let dependencies = report.manifest.dependencies();
    if !dependencies.is_empty() {
        output.print("")?;
        output.print("Dependencies:")?;
        for dep in dependencies {
            let version = dep
                .version
                .as_deref()
                .map(|v| format!(" {v}"))
                .unwrap_or_default();
            output.print(&format!(
                "  {}{}  {}",
                dep.name,
                version,
                output.dim(&format!("({})", dep.origin))
            ))?;
        }
    }

    let notes = report.manifest.notes();
    if !notes.is_empty() {
        output.print("")?;
        for note in notes {
            output.info(note)?;
        }
    }

    if !report.warnings.is_empty() {
        output.print("")?;
        super::print_warnings(report.warnings, output)?;
    }

    output.print("")?;
    output.success(&format!(
        "{} files, {} dependencies",
        report.manifest.files().len(),
        dependencies.len()
    ))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_decides_out_format() {
        assert_eq!(
            out_format(Path::new("m.json"), OutputFormat::Yaml),
            OutputFormat::Json
        );
        assert_eq!(
            out_format(Path::new("m.yaml"), OutputFormat::Plain),
            OutputFormat::Yaml
        );
        assert_eq!(
            out_format(Path::new("m.yml"), OutputFormat::Human),
            OutputFormat::Yaml
        );
    }

    #[test]
    fn unknown_extension_uses_selected_or_json() {
        assert_eq!(
            out_format(Path::new("manifest"), OutputFormat::Yaml),
            OutputFormat::Yaml
        );
        assert_eq!(
            out_format(Path::new("manifest.txt"), OutputFormat::Human),
            OutputFormat::Json
        );
    }
}
