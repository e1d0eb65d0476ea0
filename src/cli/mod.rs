pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "caduceus",
    version,
    about = "Locate, install, and run external bioinformatics tools",
    propagate_version = true
)]
pub struct Cli {
    /// Increase output verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report installation status of wrapped tools
    Status(commands::status::StatusArgs),
    /// Install a tool via its strategy chain
    Install(commands::install::InstallArgs),
    /// Run a tool on an input file and verify its report
    Run(commands::run::RunArgs),
    /// Search the usual directories for input files
    Find(commands::find::FindArgs),
}
