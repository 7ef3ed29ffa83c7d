//! Hand-off to the dynamic end-to-end test layer.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("failed to launch '{program}': {source}")]
    Spawn { program: String, source: io::Error },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Passed,
    /// Non-zero exit. `code` is `None` when the process was killed by a signal.
    Findings { code: Option<i32> },
}

/// Runs the dynamic tests against a resolved project directory.
pub trait TestRunner {
    fn run(&self, submission: &str, project_dir: &Path) -> Result<RunOutcome, RunnerError>;
}

/// Spawns `<program> [<script>] <submission> <project_dir>` with inherited
/// stdio and blocks until it exits.
#[derive(Clone, Debug)]
pub struct CommandRunner {
    program: String,
    script: Option<PathBuf>,
}

impl CommandRunner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            script: None,
        }
    }

    pub fn script(mut self, script: impl Into<PathBuf>) -> Self {
        self.script = Some(script.into());
        self
    }

    fn command(&self, submission: &str, project_dir: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        if let Some(script) = &self.script {
            cmd.arg(script);
        }
        cmd.arg(submission)
            .arg(project_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        cmd
    }
}

impl TestRunner for CommandRunner {
    fn run(&self, submission: &str, project_dir: &Path) -> Result<RunOutcome, RunnerError> {
        tracing::debug!(program = %self.program, dir = %project_dir.display(), "starting runner");
        let status = self
            .command(submission, project_dir)
            .status()
            .map_err(|e| RunnerError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        if status.success() {
            Ok(RunOutcome::Passed)
        } else {
            Ok(RunOutcome::Findings {
                code: status.code(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_layout() {
        let runner = CommandRunner::new("node").script("/opt/runner.js");
        let cmd = runner.command("sub1", Path::new("/tmp/review/app"));

        assert_eq!(cmd.get_program(), "node");
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, ["/opt/runner.js", "sub1", "/tmp/review/app"]);
    }

    #[test]
    fn command_without_script() {
        let runner = CommandRunner::new("e2e-runner");
        let cmd = runner.command("sub2", Path::new("/w"));
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, ["sub2", "/w"]);
    }

    #[cfg(unix)]
    #[test]
    fn exit_status_maps_to_outcome() {
        let ok = CommandRunner::new("true").run("sub1", Path::new("/")).unwrap();
        assert_eq!(ok, RunOutcome::Passed);

        let findings = CommandRunner::new("false").run("sub1", Path::new("/")).unwrap();
        assert_eq!(findings, RunOutcome::Findings { code: Some(1) });
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let err = CommandRunner::new("subgate-no-such-program-xyz")
            .run("sub1", Path::new("/"))
            .unwrap_err();
        assert!(matches!(err, RunnerError::Spawn { .. }));
    }
}
