//! History command implementation

use anyhow::{Context, Result};
use ld_migrate::MigrationHistoryRecord;

use crate::cli::{GlobalArgs, HistoryArgs, OutputFormat};
use crate::commands::common::create_engine;

/// Execute the history command
pub async fn execute(args: &HistoryArgs, global: &GlobalArgs) -> Result<()> {
    let engine = create_engine(global).await?;
    let records = engine
        .records()
        .await
        .context("Failed to read migration history")?;

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
        OutputFormat::Text => {
            if records.is_empty() {
                println!("No migration step applied yet");
            }
            for record in &records {
                let description = engine
                    .steps()
                    .all()
                    .iter()
                    .find(|s| s.id() == record.step_id)
                    .map_or("<unknown step>", |s| s.description());
                println!("{}", format_record(record, description));
            }
        }
    }
    Ok(())
}

fn format_record(record: &MigrationHistoryRecord, description: &str) -> String {
    let applied_at = record
        .applied_at_utc()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| record.applied_at.to_string());
    format!("{:>5}  {applied_at}  {description}", record.step_id.get())
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;
