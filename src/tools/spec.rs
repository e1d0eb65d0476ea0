//! Declarative descriptions of wrapped tools.
//!
//! A [`ToolSpec`] carries everything the engine needs to locate, install, and
//! run one external tool: fallback executable locations, the ordered
//! installation chain, an optional auxiliary runtime, and the naming rule for
//! the output artifact that proves an invocation worked.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Operating systems an installation method can be gated to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOs,
}

impl Platform {
    /// The platform this binary was compiled for, if it is one the
    /// installation chains know about.
    pub fn current() -> Option<Platform> {
        if cfg!(target_os = "linux") {
            Some(Platform::Linux)
        } else if cfg!(target_os = "macos") {
            Some(Platform::MacOs)
        } else {
            None
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::MacOs => "macos",
        }
    }
}

/// One way of installing a tool: a package-manager front-end plus the
/// arguments to hand it. The front-end must itself be resolvable before the
/// method is attempted.
#[derive(Debug, Clone)]
pub struct InstallMethod {
    /// Short name used in attempt records, e.g. "user-pip".
    pub name: String,
    /// Front-end executable, e.g. "pipx" or "brew".
    pub prerequisite: String,
    /// Arguments passed to the front-end.
    pub args: Vec<String>,
    /// Platforms this method applies to; empty means all.
    pub platforms: Vec<Platform>,
}

impl InstallMethod {
    pub fn new(name: &str, prerequisite: &str, args: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            prerequisite: prerequisite.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            platforms: Vec::new(),
        }
    }

    /// Restrict this method to the given platforms.
    pub fn only_on(mut self, platforms: &[Platform]) -> Self {
        self.platforms = platforms.to_vec();
        self
    }

    pub fn supports(&self, platform: Platform) -> bool {
        self.platforms.is_empty() || self.platforms.contains(&platform)
    }
}

/// Auxiliary runtime some tools need to execute (e.g. a JVM for FastQC).
#[derive(Debug, Clone)]
pub struct RuntimeSpec {
    /// Runtime executable name, e.g. "java".
    pub name: String,
    /// Home-style variable set for the child process, e.g. "JAVA_HOME".
    pub home_var: String,
    /// Flag that makes the runtime print its version ("-version" for Java).
    pub version_arg: String,
    /// Bundled/managed runtime locations, probed before the ambient PATH.
    /// Tool distributions often pin a compatible runtime that must win over
    /// whatever version the system happens to expose.
    pub bundled_paths: Vec<PathBuf>,
}

/// Naming rule for the output artifact a tool is expected to produce.
/// Artifact existence, not exit status, is the success signal.
#[derive(Debug, Clone)]
pub enum ArtifactRule {
    /// `<input stem><suffix>` in the output directory, e.g. `_fastqc.html`.
    InputStem { suffix: String },
    /// A fixed filename in the output directory, e.g. `multiqc_report.html`.
    Fixed { name: String },
}

impl ArtifactRule {
    /// Expected artifact path for `input` written into `out_dir`.
    pub fn expected(&self, input: &Path, out_dir: &Path) -> PathBuf {
        match self {
            ArtifactRule::InputStem { suffix } => {
                out_dir.join(format!("{}{}", input_stem(input), suffix))
            }
            ArtifactRule::Fixed { name } => out_dir.join(name),
        }
    }
}

/// Basename of `input` with its extension removed, `.gz`-aware so that
/// `sample.fastq.gz` becomes `sample` the way FastQC names its reports.
pub fn input_stem(input: &Path) -> String {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = name.strip_suffix(".gz").unwrap_or(&name);
    match name.rfind('.') {
        Some(idx) if idx > 0 => name[..idx].to_string(),
        _ => name.to_string(),
    }
}

/// Caller-supplied options for one tool invocation.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Write the artifact here instead of alongside the input.
    pub output_dir: Option<PathBuf>,
    /// Worker threads, for tools that accept a thread count.
    pub threads: Option<usize>,
    /// Kill the child process after this long.
    pub timeout: Option<Duration>,
}

/// Builds the argument list for one invocation: (input, output dir, options).
pub type ArgBuilder = fn(&Path, &Path, &RunOptions) -> Vec<OsString>;

/// Everything the engine knows about one wrapped tool.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    /// Canonical executable name, e.g. "fastqc".
    pub name: String,
    /// Human-facing name, e.g. "FastQC".
    pub display_name: String,
    /// Known install locations (full executable paths) probed after PATH.
    pub fallback_paths: Vec<PathBuf>,
    /// Ordered installation chain, first strategy tried first.
    pub install_methods: Vec<InstallMethod>,
    /// Auxiliary runtime requirement, if any.
    pub runtime: Option<RuntimeSpec>,
    /// Output artifact naming rule.
    pub artifact: ArtifactRule,
    /// Input filename extensions used by locate-or-search.
    pub extensions: Vec<String>,
    /// Flag that makes the tool print its version.
    pub version_arg: String,
    /// Argument-list builder for invocations.
    pub build_args: ArgBuilder,
}

impl ToolSpec {
    /// Expected artifact for `input`, honoring the output-dir override.
    /// Defaults to the input's own directory, matching how the wrapped
    /// tools behave when no `--outdir` is given.
    pub fn expected_artifact(&self, input: &Path, options: &RunOptions) -> PathBuf {
        let out_dir = self.output_dir(input, options);
        self.artifact.expected(input, &out_dir)
    }

    /// Output directory for an invocation on `input`.
    pub fn output_dir(&self, input: &Path, options: &RunOptions) -> PathBuf {
        options
            .output_dir
            .clone()
            .unwrap_or_else(|| input.parent().unwrap_or(Path::new(".")).to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_input_stem_strips_gz_and_extension() {
        assert_eq!(input_stem(Path::new("/data/sample.fastq.gz")), "sample");
        assert_eq!(input_stem(Path::new("sample.fastq")), "sample");
        assert_eq!(input_stem(Path::new("reads_R1.fq.gz")), "reads_R1");
        assert_eq!(input_stem(Path::new("noext")), "noext");
    }

    #[test]
    fn test_artifact_rule_input_stem() {
        let rule = ArtifactRule::InputStem {
            suffix: "_fastqc.html".to_string(),
        };
        assert_eq!(
            rule.expected(Path::new("/data/sample.fastq"), Path::new("/data")),
            PathBuf::from("/data/sample_fastqc.html")
        );
    }

    #[test]
    fn test_artifact_rule_fixed() {
        let rule = ArtifactRule::Fixed {
            name: "multiqc_report.html".to_string(),
        };
        assert_eq!(
            rule.expected(Path::new("/data/runs"), Path::new("/out")),
            PathBuf::from("/out/multiqc_report.html")
        );
    }

    #[test]
    fn test_install_method_platform_gating() {
        let any = InstallMethod::new("pipx", "pipx", &["install", "multiqc"]);
        assert!(any.supports(Platform::Linux));
        assert!(any.supports(Platform::MacOs));

        let mac_only = InstallMethod::new("brew", "brew", &["install", "multiqc"])
            .only_on(&[Platform::MacOs]);
        assert!(mac_only.supports(Platform::MacOs));
        assert!(!mac_only.supports(Platform::Linux));
    }

    #[test]
    fn test_expected_artifact_defaults_to_input_directory() {
        let spec = crate::tools::catalog::fastqc();
        let artifact = spec.expected_artifact(Path::new("/data/sample.fastq"), &RunOptions::default());
        assert_eq!(artifact, PathBuf::from("/data/sample_fastqc.html"));

        let opts = RunOptions {
            output_dir: Some(PathBuf::from("/reports")),
            ..Default::default()
        };
        let artifact = spec.expected_artifact(Path::new("/data/sample.fastq"), &opts);
        assert_eq!(artifact, PathBuf::from("/reports/sample_fastqc.html"));
    }
}
