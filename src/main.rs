use caduceus::cli::{Cli, Commands};
use caduceus::CaduceusError;
use clap::Parser;
use colored::*;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // Repeated -v flags raise the level; otherwise CADUCEUS_LOG decides.
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);

        // Use appropriate exit codes based on error type
        let exit_code = match e.downcast_ref::<CaduceusError>() {
            Some(CaduceusError::NotFound(_)) => 2,
            Some(CaduceusError::ToolUnavailable { .. }) => 3,
            Some(CaduceusError::RuntimeMissing { .. }) => 4,
            Some(CaduceusError::UnsupportedPlatform(_)) => 5,
            Some(CaduceusError::ExecutionFailed { .. }) => 6,
            Some(CaduceusError::Timeout { .. }) => 7,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn log_filter(verbose: u8) -> EnvFilter {
    match verbosity_level(verbose) {
        Some(level) => EnvFilter::new(level),
        None => {
            let default = std::env::var("CADUCEUS_LOG").unwrap_or_else(|_| "warn".to_string());
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default))
        }
    }
}

fn verbosity_level(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Status(args) => caduceus::cli::commands::status::run(args),
        Commands::Install(args) => caduceus::cli::commands::install::run(args),
        Commands::Run(args) => caduceus::cli::commands::run::run(args),
        Commands::Find(args) => caduceus::cli::commands::find::run(args),
    }
}

#[cfg(test)]
mod tests {
    use super::verbosity_level;

    #[test]
    fn test_verbose_flag_raises_the_level() {
        assert_eq!(verbosity_level(0), None);
        assert_eq!(verbosity_level(1), Some("info"));
        assert_eq!(verbosity_level(2), Some("debug"));
        assert_eq!(verbosity_level(3), Some("trace"));
        assert_eq!(verbosity_level(9), Some("trace"));
    }
}
