//! Gradle wrapper invocation

use crate::error::{StepError, StepResult};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// A unit test run through the Gradle wrapper
#[derive(Debug, Clone)]
pub struct GradleTask {
    gradlew: PathBuf,
    build_file: Option<PathBuf>,
    tasks: Vec<String>,
    flags: Vec<String>,
}

impl GradleTask {
    /// Split shell-quoted tasks and flags into a task invocation
    pub fn new(
        gradlew: &Path,
        build_file: Option<&Path>,
        tasks: &str,
        flags: &str,
    ) -> StepResult<Self> {
        let tasks = shell_words::split(tasks).map_err(|e| StepError::ArgumentSplit {
            name: "unit_test_task",
            reason: e.to_string(),
        })?;
        let flags = shell_words::split(flags).map_err(|e| StepError::ArgumentSplit {
            name: "unit_test_flags",
            reason: e.to_string(),
        })?;

        Ok(Self {
            gradlew: gradlew.to_path_buf(),
            build_file: build_file.map(Path::to_path_buf),
            tasks,
            flags,
        })
    }

    /// Arguments after the wrapper path
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(ref file) = self.build_file {
            args.push("--build-file".to_string());
            args.push(file.display().to_string());
        }
        args.extend(self.tasks.iter().cloned());
        args.extend(self.flags.iter().cloned());
        args
    }

    /// Command line as it would be typed in a shell
    pub fn printable(&self) -> String {
        let mut words = vec![self.gradlew.display().to_string()];
        words.extend(self.args());
        shell_words::join(words)
    }

    /// Run the task with inherited stdio
    pub async fn run(&self) -> StepResult<()> {
        let printable = self.printable();
        info!("$ {}", printable);

        let status = Command::new(&self.gradlew)
            .args(self.args())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| StepError::command_failed(printable.clone(), e))?;

        if status.success() {
            Ok(())
        } else {
            Err(StepError::GradleFailed {
                command: printable,
                code: status.code().unwrap_or(-1),
            })
        }
    }
}

/// Make the wrapper executable for the owner and group
pub fn make_executable(gradlew: &Path) -> StepResult<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o770);
        std::fs::set_permissions(gradlew, perms).map_err(|e| {
            StepError::io(
                format!("adding executable permission on {}", gradlew.display()),
                e,
            )
        })?;
        debug!("Made {} executable", gradlew.display());
    }
    #[cfg(not(unix))]
    debug!("Skipping chmod of {} on this platform", gradlew.display());

    Ok(())
}
