//! Status command implementation

use anyhow::{Context, Result};
use ld_migrate::{MigrationStatus, StatusReport};

use crate::cli::{GlobalArgs, OutputFormat, StatusArgs};
use crate::commands::common::{create_engine, ExitCode};

/// Execute the status command
pub async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let engine = create_engine(global).await?;
    let report = engine
        .status()
        .await
        .context("Failed to read migration status")?;

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => println!("{}", format_report(&report)),
    }

    if args.check && report.status != MigrationStatus::UpToDate {
        return Err(ExitCode(1).into());
    }
    Ok(())
}

fn format_report(report: &StatusReport) -> String {
    let last = report
        .last_applied
        .map_or_else(|| "none".to_string(), |id| id.to_string());
    let mut out = format!(
        "Status: {}\nLast applied step: {last}\nLatest step: {}",
        report.status, report.latest
    );
    if report.pending() > 0 {
        out.push_str(&format!("\nPending steps: {}", report.pending()));
    }
    out
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
