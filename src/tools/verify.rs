//! Post-execution artifact verification.
//!
//! The wrapped tools can exit non-zero on benign warnings and still write a
//! usable report, so the artifact on disk is the authoritative success
//! signal, not the exit status.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::tools::executor::ExecutionOutput;
use crate::{CaduceusError, Result};

/// Confirm the expected artifact exists after an invocation.
///
/// When it is absent the captured stderr becomes the diagnostic, or
/// "unknown error" when the tool said nothing.
pub fn verify_artifact(tool: &str, expected: &Path, output: &ExecutionOutput) -> Result<PathBuf> {
    if expected.exists() {
        debug!(tool, artifact = %expected.display(), "artifact verified");
        return Ok(expected.to_path_buf());
    }

    let diagnostic = if output.stderr.trim().is_empty() {
        "unknown error".to_string()
    } else {
        output.stderr.trim().to_string()
    };

    Err(CaduceusError::ExecutionFailed {
        tool: tool.to_string(),
        diagnostic,
    })
}
