//! `stackforge strategies`: show the strategy chosen per concern.

use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use stackforge_core::{
    application::GenerationRun,
    domain::{GenerationWarning, StrategySet},
};

use crate::{
    cli::{DocumentArgs, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[derive(Debug, Serialize)]
struct StrategiesReport<'a> {
    strategies: &'a StrategySet,
    warnings: &'a [GenerationWarning],
}

#[instrument(skip_all)]
pub fn execute(
    args: DocumentArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let resolved = super::load(&args, &global, &config)?;
    let mut run = GenerationRun::from_resolved(resolved)?;
    let strategies = run.resolve()?.clone();

    let report = StrategiesReport {
        strategies: &strategies,
        warnings: run.warnings(),
    };

    if output.format().is_structured() {
        return output.emit(&report);
    }

    output.header("Strategies")?;
    for (concern, choice) in rows(&strategies)? {
        output.print(&format!("  {concern:<16} {choice}"))?;
    }

    if !report.warnings.is_empty() {
        output.print("")?;
        super::print_warnings(report.warnings, &output)?;
    }
    Ok(())
}

/// One `(concern, choice)` row per field, sorted by concern.
fn rows(strategies: &StrategySet) -> CliResult<Vec<(String, String)>> {
    let value = serde_json::to_value(strategies).map_err(|e| CliError::Render {
        format: "table",
        source: Box::new(e),
    })?;

    let Value::Object(fields) = value else {
        return Ok(Vec::new());
    };

    Ok(fields
        .into_iter()
        .map(|(concern, choice)| (concern, cell(&choice)))
        .collect())
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => "none".into(),
        Value::String(s) => s.clone(),
        Value::Array(items) if items.is_empty() => "none".into(),
        Value::Array(items) => items.iter().map(cell).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}
