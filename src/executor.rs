use crate::error::{MutationError, Result};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

/// Outcome reported by the test execution service for one candidate.
/// `passed == true` means the suite did not detect the change.
#[derive(Debug, Clone, Default)]
pub struct TestOutcome {
    pub passed: bool,
    /// Identifiers of the tests that failed, when the service discriminates
    /// them. Empty means the service only reports an aggregate verdict.
    pub failed_tests: Vec<String>,
}

/// Contract of the external test execution service: given a complete
/// candidate source text and a fixed test artifact, report pass/fail within
/// the time budget. Errors (crash, I/O, exceeded budget) are raised to the
/// runner, which classifies them.
#[allow(async_fn_in_trait)]
pub trait TestExecutor {
    async fn run(
        &self,
        candidate_source: &str,
        test_artifact: &Path,
        time_budget: Duration,
    ) -> Result<TestOutcome>;
}

/// Runs a user-supplied shell command against each candidate. The command
/// may reference `{mutant}` (path of the materialized candidate source) and
/// `{tests}` (path of the test artifact). Exit status zero means the suite
/// passed.
pub struct CommandTestExecutor {
    command: String,
}

impl CommandTestExecutor {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl TestExecutor for CommandTestExecutor {
    async fn run(
        &self,
        candidate_source: &str,
        test_artifact: &Path,
        time_budget: Duration,
    ) -> Result<TestOutcome> {
        // Unique directory per call, so concurrent batch members never share
        // a candidate file.
        let workdir = tempfile::tempdir()?;
        let candidate_path = workdir.path().join("candidate.al");
        tokio::fs::write(&candidate_path, candidate_source).await?;

        let command = self
            .command
            .replace("{mutant}", &candidate_path.display().to_string())
            .replace("{tests}", &test_artifact.display().to_string());

        let (shell, shell_arg) = if cfg!(target_os = "windows") {
            ("cmd", "/C")
        } else {
            ("sh", "-c")
        };

        let mut cmd = TokioCommand::new(shell);
        cmd.arg(shell_arg)
            .arg(&command)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        match timeout(time_budget, cmd.output()).await {
            Ok(Ok(output)) => Ok(TestOutcome {
                passed: output.status.success(),
                failed_tests: Vec::new(),
            }),
            Ok(Err(e)) => Err(MutationError::Command(format!(
                "failed to run test command: {e}"
            ))),
            Err(_) => Err(MutationError::Command(format!(
                "test command exceeded {}ms budget",
                time_budget.as_millis()
            ))),
        }
    }
}
