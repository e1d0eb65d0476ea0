pub mod find;
pub mod install;
pub mod run;
pub mod status;

use anyhow::Result;
use crate::tools::{catalog, ToolSpec};

/// Resolve a tool name argument against the catalog.
pub fn lookup_tool(name: &str) -> Result<ToolSpec> {
    catalog::by_name(name).ok_or_else(|| {
        let known: Vec<String> = catalog::all().into_iter().map(|s| s.name).collect();
        anyhow::anyhow!("unknown tool '{}' (known tools: {})", name, known.join(", "))
    })
}
