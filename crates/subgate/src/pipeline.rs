//! Review pipeline: extract and validate, resolve the project root, hand off
//! to the dynamic test layer.

use std::path::{Path, PathBuf};

use subgate_archive::{ExtractionReport, Outcome, Policy, Rejection, extract_archive};
use subgate_fs::{MarkerResolver, RootResolver, Workspace};

use crate::error::Result;
use crate::runner::{RunOutcome, TestRunner};

pub const DEFAULT_WORKSPACE_PREFIX: &str = "subgate-review-";

/// Result of the dynamic test layer. Never fatal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Advisory {
    Passed,
    /// The runner finished but reported problems, or could not be started.
    NeedsReview { reason: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReviewOutcome {
    Rejected {
        rejection: Rejection,
        report: ExtractionReport,
    },
    Accepted {
        /// Project root relative to the extraction root; empty when the
        /// archive was not wrapped.
        project_root: PathBuf,
        report: ExtractionReport,
        advisory: Advisory,
    },
}

impl ReviewOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

pub struct ReviewPipeline<T, V = MarkerResolver> {
    policy: Policy,
    resolver: V,
    runner: T,
    workspace_prefix: String,
}

impl<T: TestRunner> ReviewPipeline<T> {
    pub fn new(runner: T) -> Self {
        Self {
            policy: Policy::default(),
            resolver: MarkerResolver::default(),
            runner,
            workspace_prefix: DEFAULT_WORKSPACE_PREFIX.to_string(),
        }
    }
}

impl<T: TestRunner, V: RootResolver> ReviewPipeline<T, V> {
    pub fn policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    pub fn resolver<W: RootResolver>(self, resolver: W) -> ReviewPipeline<T, W> {
        ReviewPipeline {
            policy: self.policy,
            resolver,
            runner: self.runner,
            workspace_prefix: self.workspace_prefix,
        }
    }

    pub fn workspace_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.workspace_prefix = prefix.into();
        self
    }

    /// Review one archive. The workspace is released on every return path.
    pub fn review(&self, submission: &str, archive: &Path) -> Result<ReviewOutcome> {
        let workspace = Workspace::acquire(&self.workspace_prefix)?;
        let outcome = self.review_in(&workspace, submission, archive);

        if let Err(e) = workspace.release() {
            tracing::warn!(error = %e, "workspace cleanup failed");
        }
        outcome
    }

    fn review_in(&self, workspace: &Workspace, submission: &str, archive: &Path) -> Result<ReviewOutcome> {
        let root = workspace.path();

        tracing::info!(submission, archive = %archive.display(), "layer 1: static analysis");
        let verdict = extract_archive(archive, root, &self.policy)?;

        for entry in &verdict.report.escaped {
            tracing::warn!(entry = %entry, "entry escaped the extraction root and was skipped");
        }

        let report = verdict.report;
        if let Outcome::Rejected(rejection) = verdict.outcome {
            tracing::info!(%rejection, "submission rejected");
            return Ok(ReviewOutcome::Rejected { rejection, report });
        }

        let project_dir = self.resolver.resolve(root);
        let project_root = project_dir
            .strip_prefix(root)
            .map(Path::to_path_buf)
            .unwrap_or_default();
        if !project_root.as_os_str().is_empty() {
            tracing::info!(root = %project_root.display(), "nested structure detected, adjusting project root");
        }

        tracing::info!("layer 2: handing over to dynamic test runner");
        let advisory = match self.runner.run(submission, &project_dir) {
            Ok(RunOutcome::Passed) => Advisory::Passed,
            Ok(RunOutcome::Findings { code }) => {
                let reason = match code {
                    Some(code) => format!("runner finished with exit code {code}"),
                    None => "runner was terminated by a signal".to_string(),
                };
                tracing::warn!(%reason, "manual review required");
                Advisory::NeedsReview { reason }
            }
            Err(e) => {
                tracing::warn!(error = %e, "manual review required");
                Advisory::NeedsReview {
                    reason: e.to_string(),
                }
            }
        };

        Ok(ReviewOutcome::Accepted {
            project_root,
            report,
            advisory,
        })
    }
}
