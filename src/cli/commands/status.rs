use anyhow::Result;
use clap::Args;
use colored::*;

use crate::tools::{catalog, ToolFacade, ToolStatus};

#[derive(Args)]
pub struct StatusArgs {
    /// Tool to check; all wrapped tools when omitted
    pub tool: Option<String>,

    /// Emit machine-readable JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: StatusArgs) -> Result<()> {
    let specs = match &args.tool {
        Some(name) => vec![super::lookup_tool(name)?],
        None => catalog::all(),
    };

    let statuses: Vec<ToolStatus> = specs
        .into_iter()
        .map(|spec| ToolFacade::new(spec).status())
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }

    for status in &statuses {
        print_status(status);
    }
    Ok(())
}

fn print_status(status: &ToolStatus) {
    if status.installed {
        println!(
            "{} {} {}",
            "✓".green().bold(),
            status.tool.bold(),
            status.version.as_deref().unwrap_or("(version unknown)").dimmed()
        );
        if let Some(path) = &status.path {
            println!("    {}", path.display().to_string().dimmed());
        }
    } else {
        println!("{} {} not installed", "✗".red().bold(), status.tool.bold());
    }

    if let Some(rt) = &status.runtime {
        if rt.installed {
            println!(
                "    runtime {}: {}",
                rt.runtime,
                rt.version.as_deref().unwrap_or("(version unknown)")
            );
        } else {
            println!(
                "    runtime {}: {}",
                rt.runtime,
                "not found".red()
            );
        }
    }
}
