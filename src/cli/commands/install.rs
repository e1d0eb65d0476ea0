use anyhow::Result;
use clap::Args;
use colored::*;

use crate::tools::{AttemptOutcome, ToolFacade};

#[derive(Args)]
pub struct InstallArgs {
    /// Tool to install
    pub tool: String,

    /// Emit machine-readable JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: InstallArgs) -> Result<()> {
    let spec = super::lookup_tool(&args.tool)?;
    let display_name = spec.display_name.clone();
    let result = ToolFacade::new(spec).install()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        if !result.installed {
            std::process::exit(1);
        }
        return Ok(());
    }

    for attempt in &result.attempts {
        let tag = match attempt.outcome {
            AttemptOutcome::Succeeded => "ok".green(),
            AttemptOutcome::Restricted => "restricted".yellow(),
            AttemptOutcome::Skipped => "skipped".dimmed(),
            AttemptOutcome::Failed => "failed".red(),
        };
        println!("  {} [{}]", attempt.method, tag);
    }

    if result.installed {
        match (&result.method, &result.path) {
            (Some(method), Some(path)) => println!(
                "{} Installed {} via {} at {}",
                "✓".green().bold(),
                display_name,
                method,
                path.display()
            ),
            _ => println!("{} {} is already installed", "✓".green().bold(), display_name),
        }
        if let Some(version) = &result.version {
            println!("  {}", version.dimmed());
        }
        return Ok(());
    }

    eprintln!("{} Could not install {}", "✗".red().bold(), display_name);
    if !result.suggestions.is_empty() {
        eprintln!("Suggestions:");
        for suggestion in &result.suggestions {
            eprintln!("  - {}", suggestion);
        }
    }
    anyhow::bail!(
        "{}",
        result
            .error
            .unwrap_or_else(|| "installation failed".to_string())
    );
}
