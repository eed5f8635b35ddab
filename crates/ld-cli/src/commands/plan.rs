//! Plan command implementation

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::{GlobalArgs, OutputFormat, PlanArgs};
use crate::commands::common::create_engine;

#[derive(Debug, Serialize)]
struct PlannedStep<'a> {
    id: u32,
    kind: &'static str,
    description: &'a str,
}

/// Execute the plan command
pub async fn execute(args: &PlanArgs, global: &GlobalArgs) -> Result<()> {
    let engine = create_engine(global).await?;
    let pending = engine
        .pending()
        .await
        .context("Failed to compute migration plan")?;
    let planned: Vec<PlannedStep<'_>> = pending
        .iter()
        .map(|step| PlannedStep {
            id: step.id().get(),
            kind: step.change().kind(),
            description: step.description(),
        })
        .collect();

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&planned)?),
        OutputFormat::Text if planned.is_empty() => println!("Nothing to migrate"),
        OutputFormat::Text => {
            for step in &planned {
                println!("{:>5}  {:<4}  {}", step.id, step.kind, step.description);
            }
        }
    }
    Ok(())
}
