pub mod cli;
pub mod core;
pub mod tools;

pub use crate::tools::facade::ToolFacade;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaduceusError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input file not found: {0}")]
    NotFound(String),

    #[error("{tool} is not installed and automatic installation failed. {}", suggestions.join("; "))]
    ToolUnavailable {
        tool: String,
        suggestions: Vec<String>,
    },

    #[error("{runtime} runtime not found; {tool} cannot run without it. Please install {runtime}.")]
    RuntimeMissing { runtime: String, tool: String },

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("{tool} failed to produce its report: {diagnostic}")]
    ExecutionFailed { tool: String, diagnostic: String },

    #[error("{tool} timed out after {seconds}s")]
    Timeout { tool: String, seconds: u64 },
}

pub type Result<T> = std::result::Result<T, CaduceusError>;
