use anyhow::Result;
use clap::Args;

use crate::tools::ToolFacade;

#[derive(Args)]
pub struct FindArgs {
    /// Name or substring to search for; lists all matching inputs when omitted
    pub name: Option<String>,

    /// Tool whose input extensions drive the search
    #[arg(long, default_value = "fastqc")]
    pub tool: String,

    /// Emit machine-readable JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: FindArgs) -> Result<()> {
    let spec = super::lookup_tool(&args.tool)?;
    let facade = ToolFacade::new(spec);
    let matches = facade.find_inputs(args.name.as_deref());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
        return Ok(());
    }

    if matches.is_empty() {
        println!("No matching input files found");
        return Ok(());
    }
    for path in matches {
        println!("{}", path.display());
    }
    Ok(())
}
