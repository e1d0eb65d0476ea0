//! Per-invocation execution environments and auxiliary runtime resolution.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::tools::locator;
use crate::tools::spec::RuntimeSpec;
use crate::{CaduceusError, Result};

/// Immutable overlay over the ambient process environment: search-path
/// prefix entries plus named variable overrides. Applied to a child
/// `Command`; the calling process's environment is never mutated.
#[derive(Debug, Clone, Default)]
pub struct ExecutionEnvironment {
    path_prepend: Vec<PathBuf>,
    vars: Vec<(String, OsString)>,
}

impl ExecutionEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a directory to the child's search path.
    pub fn prepend_path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.path_prepend.push(dir.into());
        self
    }

    /// Override a named variable for the child.
    pub fn set_var(mut self, name: &str, value: impl Into<OsString>) -> Self {
        self.vars.push((name.to_string(), value.into()));
        self
    }

    /// The PATH value the child will see: prefix entries first, then the
    /// ambient PATH.
    pub fn path_value(&self) -> OsString {
        let ambient = std::env::var_os("PATH").unwrap_or_default();
        let entries = self
            .path_prepend
            .iter()
            .cloned()
            .chain(std::env::split_paths(&ambient));
        std::env::join_paths(entries).unwrap_or(ambient)
    }

    /// Apply the overlay to a child command.
    pub fn apply(&self, cmd: &mut Command) {
        if !self.path_prepend.is_empty() {
            cmd.env("PATH", self.path_value());
        }
        for (name, value) in &self.vars {
            cmd.env(name, value);
        }
    }

    /// Look up an override by name (used by status reporting and tests).
    pub fn var(&self, name: &str) -> Option<&OsString> {
        self.vars
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

/// Resolve the runtime executable, preferring the bundled/managed locations
/// over whatever the ambient PATH exposes. Tool distributions pin compatible
/// runtime versions; the ambient one may be a mismatch.
pub fn resolve_runtime(runtime: &RuntimeSpec) -> Option<PathBuf> {
    for candidate in &runtime.bundled_paths {
        if locator::is_executable(candidate) {
            return Some(candidate.clone());
        }
    }
    locator::find_executable(&runtime.name, &crate::core::paths::fallback_bin_dirs())
}

/// Build the environment overlay for a tool that needs `runtime`:
/// the runtime's directory is prepended to the search path and its
/// installation root is exported through the home-style variable.
///
/// Fatal for the invocation when no runtime is resolvable anywhere.
pub fn environment_for(runtime: &RuntimeSpec, tool: &str) -> Result<(PathBuf, ExecutionEnvironment)> {
    let exe = resolve_runtime(runtime).ok_or_else(|| CaduceusError::RuntimeMissing {
        runtime: runtime.name.clone(),
        tool: tool.to_string(),
    })?;

    let bin_dir = exe.parent().unwrap_or(Path::new("/")).to_path_buf();
    let home = runtime_home(&bin_dir);
    debug!(runtime = %runtime.name, exe = %exe.display(), home = %home.display(), "resolved auxiliary runtime");

    let env = ExecutionEnvironment::new()
        .prepend_path(bin_dir)
        .set_var(&runtime.home_var, home.as_os_str().to_os_string());
    Ok((exe, env))
}

/// Installation root for a runtime whose executable lives in `bin_dir`:
/// the parent of a `bin` directory, otherwise the directory itself.
fn runtime_home(bin_dir: &Path) -> PathBuf {
    if bin_dir.file_name().map(|n| n == "bin").unwrap_or(false) {
        bin_dir.parent().unwrap_or(bin_dir).to_path_buf()
    } else {
        bin_dir.to_path_buf()
    }
}
