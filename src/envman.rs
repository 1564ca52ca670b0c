//! Environment export through `envman`
//!
//! Later CI steps read values this step exports with `envman add`.

use crate::error::{StepError, StepResult};
use std::fmt;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

/// Key holding the unit test outcome
pub const TEST_RESULT_KEY: &str = "BITRISE_GRADLE_TEST_RESULT";

/// Outcome of the Gradle unit test task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestOutcome {
    Succeeded,
    Failed,
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Store `value` under `key` with `envman add`, value passed on stdin
pub async fn export(key: &str, value: &str) -> StepResult<()> {
    export_with("envman", key, value).await
}

/// Same as [`export`] but with an explicit envman binary
pub async fn export_with(program: &str, key: &str, value: &str) -> StepResult<()> {
    let command = format!("{} add --key {}", program, key);
    debug!("Executing: {}", command);

    let mut child = Command::new(program)
        .args(["add", "--key", key])
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| StepError::command_failed(command.clone(), e))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(value.as_bytes())
            .await
            .map_err(|e| StepError::io(format!("writing value for {}", key), e))?;
    }

    let output = child
        .wait_with_output()
        .await
        .map_err(|e| StepError::command_failed(command.clone(), e))?;

    if output.status.success() {
        Ok(())
    } else {
        Err(StepError::command_exec(
            command,
            String::from_utf8_lossy(&output.stderr),
        ))
    }
}

/// Export the test outcome; failures only warn
pub async fn export_test_result(outcome: TestOutcome) {
    if let Err(e) = export(TEST_RESULT_KEY, &outcome.to_string()).await {
        warn!("Failed to export environment: {}, error: {}", TEST_RESULT_KEY, e);
    }
}
