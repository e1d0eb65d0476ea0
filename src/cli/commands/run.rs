use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use colored::*;

use crate::tools::{RunOptions, ToolFacade};

#[derive(Args)]
pub struct RunArgs {
    /// Tool to run
    pub tool: String,

    /// Input file path, or a bare name to search for
    pub input: String,

    /// Write the report here instead of alongside the input
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Worker threads for tools that accept a thread count
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Kill the tool after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Emit machine-readable JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: RunArgs) -> Result<()> {
    let spec = super::lookup_tool(&args.tool)?;
    let options = RunOptions {
        output_dir: args.output_dir.clone(),
        threads: args.threads,
        timeout: args.timeout.map(Duration::from_secs),
    };

    let result = ToolFacade::new(spec).run(&args.input, &options)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if result.candidates.len() > 1 {
        println!(
            "{} {} input matches, used {}",
            "Note:".yellow(),
            result.candidates.len(),
            result.input.display()
        );
    }
    println!(
        "{} {} report: {}",
        "✓".green().bold(),
        result.tool,
        result.artifact.display()
    );
    Ok(())
}
