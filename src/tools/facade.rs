//! Per-tool invocation facade.
//!
//! A [`ToolFacade`] composes the locator, installer, runtime builder,
//! executor, and verifier into three operations: find input files, report
//! installation status, and ensure-installed-and-run. Result records are
//! serializable with stable field names for the calling protocol layer.

use std::ffi::OsString;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::paths;
use crate::tools::executor;
use crate::tools::installer::{InstallationResult, Installer};
use crate::tools::runtime::{self, ExecutionEnvironment};
use crate::tools::search;
use crate::tools::spec::{RunOptions, ToolSpec};
use crate::tools::verify;
use crate::{CaduceusError, Result};

/// Presence report for a tool's auxiliary runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeStatus {
    pub runtime: String,
    pub installed: bool,
    pub path: Option<PathBuf>,
    pub version: Option<String>,
}

/// Installation status of a wrapped tool. Produced by [`ToolFacade::status`],
/// which never fails: absence is a field, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolStatus {
    pub tool: String,
    pub installed: bool,
    pub path: Option<PathBuf>,
    pub version: Option<String>,
    pub runtime: Option<RuntimeStatus>,
    pub checked_at: DateTime<Utc>,
}

/// Successful outcome of one tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationResult {
    pub tool: String,
    /// Executable the invocation actually ran.
    pub executable: PathBuf,
    /// Input file the invocation ran on.
    pub input: PathBuf,
    /// Every input candidate the search produced, lexically sorted. When
    /// there was more than one, `input` is the first; callers that want a
    /// different one can pre-select via [`ToolFacade::find_inputs`].
    pub candidates: Vec<PathBuf>,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    /// Verified output artifact.
    pub artifact: PathBuf,
}

/// One wrapped tool's operations.
pub struct ToolFacade {
    spec: ToolSpec,
    installer: Installer,
    search_dirs: Option<Vec<PathBuf>>,
}

impl ToolFacade {
    pub fn new(spec: ToolSpec) -> Self {
        Self {
            spec,
            installer: Installer::new(),
            search_dirs: None,
        }
    }

    /// Use a preconfigured resolver (custom bin dirs, markers, timeouts).
    pub fn with_installer(mut self, installer: Installer) -> Self {
        self.installer = installer;
        self
    }

    /// Search these directories for inputs instead of the defaults.
    pub fn with_search_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.search_dirs = Some(dirs);
        self
    }

    pub fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    fn search_dirs(&self) -> Vec<PathBuf> {
        self.search_dirs
            .clone()
            .unwrap_or_else(paths::input_search_dirs)
    }

    /// Find input files for this tool by exact name, substring, or
    /// extension match. Deduplicated, lexically sorted.
    pub fn find_inputs(&self, query: Option<&str>) -> Vec<PathBuf> {
        search::find_input_files(query, &self.spec.extensions, &self.search_dirs())
    }

    /// Resolve a caller-supplied name-or-path to a concrete input file plus
    /// the full candidate list. A literal existing path wins outright;
    /// otherwise the first sorted search match is chosen.
    pub fn resolve_input(&self, name_or_path: &str) -> Result<(PathBuf, Vec<PathBuf>)> {
        let literal = PathBuf::from(name_or_path);
        if literal.exists() {
            return Ok((literal.clone(), vec![literal]));
        }

        let candidates = self.find_inputs(Some(name_or_path));
        match candidates.first() {
            Some(first) => Ok((first.clone(), candidates)),
            None => Err(CaduceusError::NotFound(name_or_path.to_string())),
        }
    }

    /// Installation status of the tool and, when applicable, its auxiliary
    /// runtime. Never fails.
    pub fn status(&self) -> ToolStatus {
        let path = self.installer.locate(&self.spec);
        let version = path
            .as_deref()
            .and_then(|exe| executor::probe_version(&self.spec.name, exe, &self.spec.version_arg));

        let runtime = self.spec.runtime.as_ref().map(|rt| {
            let rt_path = runtime::resolve_runtime(rt);
            let rt_version = rt_path
                .as_deref()
                .and_then(|exe| executor::probe_version(&rt.name, exe, &rt.version_arg));
            RuntimeStatus {
                runtime: rt.name.clone(),
                installed: rt_path.is_some(),
                path: rt_path,
                version: rt_version,
            }
        });

        ToolStatus {
            tool: self.spec.name.clone(),
            installed: path.is_some(),
            path,
            version,
            runtime,
            checked_at: Utc::now(),
        }
    }

    /// Install the tool via its strategy chain. Already-installed tools
    /// short-circuit with an empty attempt log.
    pub fn install(&self) -> Result<InstallationResult> {
        self.installer.install(&self.spec)
    }

    /// Ensure the tool is installed, then run it on `input` and verify the
    /// expected artifact. `input` may be a full path or a bare name to
    /// search for.
    pub fn run(&self, input: &str, options: &RunOptions) -> Result<InvocationResult> {
        let (input, candidates) = self.resolve_input(input)?;
        if candidates.len() > 1 {
            debug!(tool = %self.spec.name, chosen = %input.display(), n = candidates.len(),
                "multiple input matches, using first sorted match");
        }

        let executable = match self.installer.locate(&self.spec) {
            Some(path) => path,
            None => {
                info!(tool = %self.spec.name, "not installed, attempting installation");
                let result = self.installer.install(&self.spec)?;
                match result.path {
                    Some(path) => path,
                    None => {
                        return Err(CaduceusError::ToolUnavailable {
                            tool: self.spec.display_name.clone(),
                            suggestions: result.suggestions,
                        })
                    }
                }
            }
        };

        // Runtime resolution is fatal before anything is spawned: the tool
        // cannot produce its artifact without it.
        let env = match &self.spec.runtime {
            Some(rt) => runtime::environment_for(rt, &self.spec.name)?.1,
            None => ExecutionEnvironment::new(),
        };

        let out_dir = self.spec.output_dir(&input, options);
        if options.output_dir.is_some() {
            std::fs::create_dir_all(&out_dir)?;
        }

        let args: Vec<OsString> = (self.spec.build_args)(&input, &out_dir, options);
        info!(tool = %self.spec.name, input = %input.display(), "running");
        let output = executor::run_command(
            &self.spec.name,
            &executable,
            &args,
            &env,
            None,
            options.timeout,
        )?;

        let expected = self.spec.expected_artifact(&input, options);
        let artifact = verify::verify_artifact(&self.spec.name, &expected, &output)?;

        Ok(InvocationResult {
            tool: self.spec.name.clone(),
            executable,
            input,
            candidates,
            exit_code: output.exit_code,
            stdout: output.stdout,
            stderr: output.stderr,
            artifact,
        })
    }
}

#[cfg(unix)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::spec::ArtifactRule;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn report_args(input: &Path, out_dir: &Path, _: &RunOptions) -> Vec<OsString> {
        vec![input.as_os_str().to_os_string(), out_dir.as_os_str().to_os_string()]
    }

    fn qc_spec(bin_dir: &Path) -> ToolSpec {
        ToolSpec {
            name: "seqqc".to_string(),
            display_name: "SeqQC".to_string(),
            fallback_paths: vec![bin_dir.to_path_buf()],
            install_methods: Vec::new(),
            runtime: None,
            artifact: ArtifactRule::InputStem {
                suffix: "_seqqc.html".to_string(),
            },
            extensions: vec!["fastq".to_string(), "fastq.gz".to_string()],
            version_arg: "--version".to_string(),
            build_args: report_args,
        }
    }

    fn facade(spec: ToolSpec, bin_dir: &Path) -> ToolFacade {
        ToolFacade::new(spec)
            .with_installer(Installer::new().with_bin_dirs(vec![bin_dir.to_path_buf()]))
    }

    #[test]
    fn test_status_reports_version() {
        let tmp = TempDir::new().unwrap();
        write_script(tmp.path(), "seqqc", "echo 'SeqQC v0.12.1'");

        let status = facade(qc_spec(tmp.path()), tmp.path()).status();
        assert!(status.installed);
        assert_eq!(status.version.as_deref(), Some("SeqQC v0.12.1"));
        assert!(status.runtime.is_none());
    }

    #[test]
    fn test_status_of_absent_tool_never_fails() {
        let tmp = TempDir::new().unwrap();
        let status = facade(qc_spec(tmp.path()), tmp.path()).status();
        assert!(!status.installed);
        assert_eq!(status.path, None);
        assert_eq!(status.version, None);
    }

    #[test]
    fn test_resolve_input_prefers_literal_path() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("sample.fastq");
        fs::write(&input, "@r1\nACGT\n+\nFFFF\n").unwrap();

        let facade = facade(qc_spec(tmp.path()), tmp.path());
        let (resolved, candidates) = facade.resolve_input(input.to_str().unwrap()).unwrap();
        assert_eq!(resolved, input);
        assert_eq!(candidates, vec![input]);
    }

    #[test]
    fn test_resolve_input_searches_and_exposes_candidates() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("reads_R1.fastq.gz"), "").unwrap();
        fs::write(tmp.path().join("reads_R2.fastq.gz"), "").unwrap();

        let facade = facade(qc_spec(tmp.path()), tmp.path())
            .with_search_dirs(vec![tmp.path().to_path_buf()]);
        let (resolved, candidates) = facade.resolve_input("reads").unwrap();
        assert_eq!(resolved, tmp.path().join("reads_R1.fastq.gz"));
        assert_eq!(candidates.len(), 2);
    }
}
