//! Tool resolution and execution engine.
//!
//! Locates externally-installed bioinformatics tools, installs absent ones
//! through an ordered chain of package-manager strategies, builds the child
//! environment their auxiliary runtimes need, runs them with captured
//! output, and judges success by the artifact they were expected to write.

pub mod catalog;
pub mod executor;
pub mod facade;
pub mod installer;
pub mod locator;
pub mod runtime;
pub mod search;
pub mod spec;
pub mod verify;

pub use facade::{InvocationResult, RuntimeStatus, ToolFacade, ToolStatus};
pub use installer::{AttemptOutcome, InstallationAttempt, InstallationResult, Installer};
pub use runtime::ExecutionEnvironment;
pub use spec::{ArtifactRule, InstallMethod, Platform, RunOptions, RuntimeSpec, ToolSpec};
