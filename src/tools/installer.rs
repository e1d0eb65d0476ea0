//! Ordered-chain installation resolver.
//!
//! Strategies run strictly in declared order. A strategy whose front-end is
//! absent is recorded as skipped, and an environment-restriction refusal
//! (PEP 668 "externally-managed-environment" and friends) moves on to the
//! next strategy instead of ending the chain: a restriction from one
//! installer says nothing about whether a different installer is restricted.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::paths;
use crate::tools::executor;
use crate::tools::locator;
use crate::tools::runtime::ExecutionEnvironment;
use crate::tools::spec::{InstallMethod, Platform, ToolSpec};
use crate::{CaduceusError, Result};

/// Output markers that identify an environment-restriction refusal.
/// Installer-specific free text, kept as configuration so new installers
/// can be added without touching the chain logic.
const DEFAULT_RESTRICTION_MARKERS: &[&str] = &[
    "externally-managed-environment",
    "EXTERNALLY-MANAGED",
    "This environment is externally managed",
];

/// Per-attempt time limit; package managers can hang on network prompts.
const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(600);

/// How one strategy in the chain ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttemptOutcome {
    /// Front-end tool absent; the strategy was never run.
    Skipped,
    /// The command ran but the tool still is not resolvable.
    Failed,
    /// The environment refused unmanaged package installation.
    Restricted,
    Succeeded,
}

/// Record of one strategy attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallationAttempt {
    pub method: String,
    pub outcome: AttemptOutcome,
    /// Combined stdout/stderr of the install command.
    pub output: String,
}

/// Final outcome of an installation chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallationResult {
    pub installed: bool,
    /// Strategy that succeeded, if any. `None` with `installed=true` means
    /// the tool was already present and no strategy was attempted.
    pub method: Option<String>,
    pub path: Option<PathBuf>,
    /// Self-reported version of the installed tool.
    pub version: Option<String>,
    pub attempts: Vec<InstallationAttempt>,
    /// Ranked manual remediation suggestions when every strategy failed.
    pub suggestions: Vec<String>,
    pub error: Option<String>,
}

/// Resolver for tool executables and installation chains.
///
/// Holds the probing configuration (extra bin directories, restriction
/// markers, per-attempt timeout) so callers and tests can scope resolution
/// without touching ambient state.
#[derive(Debug, Clone)]
pub struct Installer {
    restriction_markers: Vec<String>,
    extra_bin_dirs: Vec<PathBuf>,
    attempt_timeout: Duration,
    platform: Option<Platform>,
}

impl Default for Installer {
    fn default() -> Self {
        Self {
            restriction_markers: DEFAULT_RESTRICTION_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
            extra_bin_dirs: Vec::new(),
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            platform: Platform::current(),
        }
    }
}

impl Installer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Probe these directories before the well-known fallback locations.
    pub fn with_bin_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.extra_bin_dirs = dirs;
        self
    }

    /// Replace the environment-restriction marker list.
    pub fn with_restriction_markers(mut self, markers: Vec<String>) -> Self {
        self.restriction_markers = markers;
        self
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// Override the detected platform (tests exercise foreign chains).
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Locate a tool's executable: ambient PATH, then the configured extra
    /// directories, then the spec's fallback locations, then the well-known
    /// install directories.
    pub fn locate(&self, spec: &ToolSpec) -> Option<PathBuf> {
        let mut fallbacks = self.extra_bin_dirs.clone();
        fallbacks.extend(spec.fallback_paths.iter().cloned());
        fallbacks.extend(paths::fallback_bin_dirs());
        locator::find_executable(&spec.name, &fallbacks)
    }

    /// Locate a package-manager front-end.
    fn locate_prerequisite(&self, name: &str) -> Option<PathBuf> {
        let mut fallbacks = self.extra_bin_dirs.clone();
        fallbacks.extend(paths::fallback_bin_dirs());
        locator::find_executable(name, &fallbacks)
    }

    /// Attempt the spec's installation chain until one strategy succeeds or
    /// all are exhausted. Already-installed tools short-circuit without
    /// attempting anything.
    pub fn install(&self, spec: &ToolSpec) -> Result<InstallationResult> {
        if let Some(path) = self.locate(spec) {
            debug!(tool = %spec.name, path = %path.display(), "already installed");
            let version = executor::probe_version(&spec.name, &path, &spec.version_arg);
            return Ok(InstallationResult {
                installed: true,
                method: None,
                path: Some(path),
                version,
                attempts: Vec::new(),
                suggestions: Vec::new(),
                error: None,
            });
        }

        let methods = self.applicable_methods(spec)?;
        let mut attempts = Vec::new();

        for method in &methods {
            let Some(front_end) = self.locate_prerequisite(&method.prerequisite) else {
                debug!(tool = %spec.name, method = %method.name, "prerequisite absent, skipping");
                attempts.push(InstallationAttempt {
                    method: method.name.clone(),
                    outcome: AttemptOutcome::Skipped,
                    output: format!("{} not found", method.prerequisite),
                });
                continue;
            };

            info!(tool = %spec.name, method = %method.name, "attempting installation");
            let args: Vec<OsString> = method.args.iter().map(OsString::from).collect();
            let output = match executor::run_command(
                &spec.name,
                &front_end,
                &args,
                &ExecutionEnvironment::new(),
                None,
                Some(self.attempt_timeout),
            ) {
                Ok(output) => output,
                Err(CaduceusError::Timeout { seconds, .. }) => {
                    warn!(tool = %spec.name, method = %method.name, "install attempt timed out");
                    attempts.push(InstallationAttempt {
                        method: method.name.clone(),
                        outcome: AttemptOutcome::Failed,
                        output: format!("timed out after {}s", seconds),
                    });
                    continue;
                }
                Err(e) => return Err(e),
            };

            let combined = output.combined();

            if self.is_restricted(&combined) {
                warn!(tool = %spec.name, method = %method.name, "environment refused installation");
                attempts.push(InstallationAttempt {
                    method: method.name.clone(),
                    outcome: AttemptOutcome::Restricted,
                    output: combined,
                });
                continue;
            }

            // The command's exit status is advisory; what matters is whether
            // the tool is now resolvable.
            if let Some(path) = self.locate(spec) {
                info!(tool = %spec.name, method = %method.name, path = %path.display(), "installed");
                attempts.push(InstallationAttempt {
                    method: method.name.clone(),
                    outcome: AttemptOutcome::Succeeded,
                    output: combined,
                });
                let version = executor::probe_version(&spec.name, &path, &spec.version_arg);
                return Ok(InstallationResult {
                    installed: true,
                    method: Some(method.name.clone()),
                    path: Some(path),
                    version,
                    attempts,
                    suggestions: Vec::new(),
                    error: None,
                });
            }

            attempts.push(InstallationAttempt {
                method: method.name.clone(),
                outcome: AttemptOutcome::Failed,
                output: combined,
            });
        }

        let suggestions = self.suggestions(spec, &methods);
        Ok(InstallationResult {
            installed: false,
            method: None,
            path: None,
            version: None,
            attempts,
            suggestions,
            error: Some(format!(
                "all {} installation methods for {} were exhausted",
                methods.len(),
                spec.display_name
            )),
        })
    }

    /// The spec's methods filtered to the current platform, preserving
    /// declared order. An empty survivor list on a chain that does declare
    /// methods means this platform is unsupported.
    fn applicable_methods(&self, spec: &ToolSpec) -> Result<Vec<InstallMethod>> {
        let platform = self.platform.ok_or_else(|| {
            CaduceusError::UnsupportedPlatform(format!(
                "automatic installation of {} is not supported on this operating system; \
                 please install it manually",
                spec.display_name
            ))
        })?;

        let methods: Vec<InstallMethod> = spec
            .install_methods
            .iter()
            .filter(|m| m.supports(platform))
            .cloned()
            .collect();

        if methods.is_empty() && !spec.install_methods.is_empty() {
            let supported: Vec<&str> = spec
                .install_methods
                .iter()
                .flat_map(|m| m.platforms.iter().map(Platform::name))
                .collect();
            return Err(CaduceusError::UnsupportedPlatform(format!(
                "automatic installation of {} is only supported on {}; \
                 please install it manually",
                spec.display_name,
                supported.join(", ")
            )));
        }

        Ok(methods)
    }

    fn is_restricted(&self, output: &str) -> bool {
        self.restriction_markers.iter().any(|m| output.contains(m))
    }

    /// Manual remediation suggestions, least-restrictive available installer
    /// first. `$SHELL` is read only to phrase the PATH hint.
    fn suggestions(&self, spec: &ToolSpec, methods: &[InstallMethod]) -> Vec<String> {
        let mut suggestions = Vec::new();
        let mut any_available = false;

        for method in methods {
            if self.locate_prerequisite(&method.prerequisite).is_none() {
                continue;
            }
            any_available = true;
            suggestions.push(format!(
                "Try manually: {} {}",
                method.prerequisite,
                method.args.join(" ")
            ));
            if method.prerequisite == "pipx" {
                suggestions.push(format!(
                    "If pipx installed {} but it is not found, run 'pipx ensurepath' \
                     and add ~/.local/bin to PATH in {}",
                    spec.name,
                    shell_rc_file()
                ));
            }
        }

        if !any_available {
            suggestions.push(format!(
                "No supported package manager found; install pipx or Homebrew, \
                 then install {} with it",
                spec.name
            ));
        }

        suggestions
    }
}

/// Shell rc file named in PATH suggestions, guessed from `$SHELL`.
fn shell_rc_file() -> &'static str {
    match std::env::var("SHELL") {
        Ok(shell) if shell.ends_with("zsh") => "~/.zshrc",
        _ => "~/.bashrc",
    }
}
