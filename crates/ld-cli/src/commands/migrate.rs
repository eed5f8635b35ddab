//! Migrate command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, MigrateArgs, OutputFormat};
use crate::commands::common::create_engine;

/// Execute the migrate command
pub async fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    let engine = create_engine(global).await?;
    let summary = engine.run().await.context("Migration failed")?;

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text if summary.is_noop() => println!("Database is up to date"),
        OutputFormat::Text => println!(
            "Applied {} migration steps in {} ms",
            summary.applied.len(),
            summary.elapsed_ms
        ),
    }
    Ok(())
}
