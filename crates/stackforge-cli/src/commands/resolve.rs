//! `stackforge resolve`: print the merged configuration.

use tracing::instrument;

use stackforge_core::application::ResolvedConfiguration;

use crate::{
    cli::{DocumentArgs, GlobalArgs},
    config::AppConfig,
    error::CliResult,
    output::{OutputManager, render_structured},
};

#[instrument(skip_all)]
pub fn execute(
    args: DocumentArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let resolved = super::load(&args, &global, &config)?;

    if output.format().is_structured() {
        return output.emit(&resolved);
    }

    print_human(&resolved, &output)
}

fn print_human(resolved: &ResolvedConfiguration, output: &OutputManager) -> CliResult<()> {
    let d = &resolved.deployment;
    output.header("Deployment")?;
    output.print(&format!("  provider     {}", d.provider))?;
    output.print(&format!("  framework    {}", d.framework))?;
    output.print(&format!("  environment  {}", d.environment))?;
    output.print(&format!(
        "  region       {}",
        d.region.as_deref().unwrap_or("-")
    ))?;
    output.print(&format!("  generator    {}", resolved.generator))?;

    output.print("")?;
    output.header("Application")?;
    let application = render_structured(crate::cli::OutputFormat::Yaml, &resolved.application)?;
    for line in application.lines() {
        output.print(&format!("  {line}"))?;
    }

    if !resolved.entities.is_empty() {
        output.print("")?;
        output.header("Models")?;
        for entity in &resolved.entities {
            let attributes = entity
                .attributes()
                .iter()
                .map(|a| format!("{}:{}", a.name, a.ty))
                .collect::<Vec<_>>()
                .join(" ");
            output.print(&format!("  {}  {}", entity.name(), output.dim(&attributes)))?;
            for assoc in entity.associations() {
                output.print(&format!("    {} {}", assoc.kind, assoc.name))?;
            }
        }
    }

    if !resolved.warnings.is_empty() {
        output.print("")?;
        super::print_warnings(&resolved.warnings, output)?;
    }

    Ok(())
}
