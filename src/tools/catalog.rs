//! Specs for the tools this crate wraps.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::core::paths;
use crate::tools::spec::{
    ArtifactRule, InstallMethod, Platform, RunOptions, RuntimeSpec, ToolSpec,
};

fn fastq_extensions() -> Vec<String> {
    ["fastq", "fq", "fastq.gz", "fq.gz"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn pip_family_chain(package: &str) -> Vec<InstallMethod> {
    vec![
        InstallMethod::new("pipx", "pipx", &["install", package]),
        InstallMethod::new("brew", "brew", &["install", package]).only_on(&[Platform::MacOs]),
        InstallMethod::new("user-pip", "pip3", &["install", "--user", package]),
        InstallMethod::new("pip", "pip3", &["install", package]),
    ]
}

/// FastQC: per-file quality-control reports. Needs a JVM; a conda-bundled
/// one is preferred over the system Java to avoid version mismatches.
pub fn fastqc() -> ToolSpec {
    fn args(input: &Path, out_dir: &Path, options: &RunOptions) -> Vec<OsString> {
        let mut args = vec![
            input.as_os_str().to_os_string(),
            OsString::from("--outdir"),
            out_dir.as_os_str().to_os_string(),
        ];
        if let Some(threads) = options.threads {
            args.push(OsString::from("--threads"));
            args.push(OsString::from(threads.to_string()));
        }
        args
    }

    ToolSpec {
        name: "fastqc".to_string(),
        display_name: "FastQC".to_string(),
        fallback_paths: vec![PathBuf::from("/opt/anaconda3/bin/fastqc")],
        install_methods: vec![
            InstallMethod::new("brew", "brew", &["install", "fastqc"]).only_on(&[Platform::MacOs]),
        ],
        runtime: Some(RuntimeSpec {
            name: "java".to_string(),
            home_var: "JAVA_HOME".to_string(),
            version_arg: "-version".to_string(),
            bundled_paths: vec![PathBuf::from("/opt/anaconda3/lib/jvm/bin/java")],
        }),
        artifact: ArtifactRule::InputStem {
            suffix: "_fastqc.html".to_string(),
        },
        extensions: fastq_extensions(),
        version_arg: "--version".to_string(),
        build_args: args,
    }
}

/// MultiQC: aggregates per-tool reports from an analysis directory.
pub fn multiqc() -> ToolSpec {
    fn args(input: &Path, out_dir: &Path, _options: &RunOptions) -> Vec<OsString> {
        vec![
            input.as_os_str().to_os_string(),
            OsString::from("--outdir"),
            out_dir.as_os_str().to_os_string(),
            OsString::from("--force"),
        ]
    }

    ToolSpec {
        name: "multiqc".to_string(),
        display_name: "MultiQC".to_string(),
        fallback_paths: vec![paths::home_dir().join(".local/bin/multiqc")],
        install_methods: pip_family_chain("multiqc"),
        runtime: None,
        artifact: ArtifactRule::Fixed {
            name: "multiqc_report.html".to_string(),
        },
        extensions: vec!["html".to_string(), "json".to_string(), "txt".to_string()],
        version_arg: "--version".to_string(),
        build_args: args,
    }
}

/// cutadapt: adapter and quality trimming for reads.
pub fn cutadapt() -> ToolSpec {
    fn args(input: &Path, out_dir: &Path, options: &RunOptions) -> Vec<OsString> {
        let trimmed = out_dir.join(format!(
            "{}_trimmed.fastq.gz",
            crate::tools::spec::input_stem(input)
        ));
        let mut args = vec![OsString::from("-o"), trimmed.into_os_string()];
        if let Some(threads) = options.threads {
            args.push(OsString::from("-j"));
            args.push(OsString::from(threads.to_string()));
        }
        args.push(input.as_os_str().to_os_string());
        args
    }

    ToolSpec {
        name: "cutadapt".to_string(),
        display_name: "cutadapt".to_string(),
        fallback_paths: vec![paths::home_dir().join(".local/bin/cutadapt")],
        install_methods: pip_family_chain("cutadapt"),
        runtime: None,
        artifact: ArtifactRule::InputStem {
            suffix: "_trimmed.fastq.gz".to_string(),
        },
        extensions: fastq_extensions(),
        version_arg: "--version".to_string(),
        build_args: args,
    }
}

/// Every wrapped tool, in display order.
pub fn all() -> Vec<ToolSpec> {
    vec![fastqc(), multiqc(), cutadapt()]
}

/// Look a wrapped tool up by canonical name.
pub fn by_name(name: &str) -> Option<ToolSpec> {
    all().into_iter().find(|spec| spec.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_by_name() {
        assert_eq!(by_name("fastqc").unwrap().display_name, "FastQC");
        assert!(by_name("unknown-tool").is_none());
    }

    #[test]
    fn test_multiqc_chain_order() {
        let spec = multiqc();
        let names: Vec<&str> = spec.install_methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["pipx", "brew", "user-pip", "pip"]);
    }

    #[test]
    fn test_fastqc_args_include_outdir_and_threads() {
        let spec = fastqc();
        let opts = RunOptions {
            threads: Some(4),
            ..Default::default()
        };
        let args = (spec.build_args)(Path::new("/data/sample.fastq"), Path::new("/out"), &opts);
        let args: Vec<String> = args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec!["/data/sample.fastq", "--outdir", "/out", "--threads", "4"]
        );
    }

    #[test]
    fn test_cutadapt_artifact_matches_output_argument() {
        let spec = cutadapt();
        let opts = RunOptions::default();
        let args = (spec.build_args)(Path::new("/data/reads.fastq.gz"), Path::new("/data"), &opts);
        let expected = spec.expected_artifact(Path::new("/data/reads.fastq.gz"), &opts);
        assert!(args
            .iter()
            .any(|a| a.to_string_lossy() == expected.to_string_lossy()));
    }
}
