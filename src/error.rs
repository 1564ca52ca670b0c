//! Error types for the step
//!
//! All modules use `StepResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for step operations
pub type StepResult<T> = Result<T, StepError>;

/// All errors that can occur while running the step
#[derive(Error, Debug)]
pub enum StepError {
    // Input errors
    #[error("Issue with input: {name}: {reason}")]
    InputInvalid { name: &'static str, reason: String },

    #[error("Issue with input: no GradlewPath parameter specified")]
    GradlewMissing,

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    // Gradle errors
    #[error("Failed to parse {name}: {reason}")]
    ArgumentSplit { name: &'static str, reason: String },

    #[error("Gradle task failed: {command}, exit code: {code}")]
    GradleFailed { command: String, code: i32 },

    // Cache errors
    #[error("Failed to walk {root} for dependency files: {reason}")]
    DependencyWalk { root: PathBuf, reason: String },

    #[error("Failed to scan {root} for cache paths: {reason}")]
    OutputScan { root: PathBuf, reason: String },

    #[error("Failed to fingerprint {path}: {source}")]
    Fingerprint {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write lockfile {path}: {source}")]
    LockfileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not determine the home directory")]
    HomeDirUnknown,

    #[error("Failed to commit cache paths: {0}")]
    CacheCommit(String),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command execution error: {command}, stderr: {stderr}")]
    CommandExecution { command: String, stderr: String },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StepError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a command execution error
    pub fn command_exec(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::CommandExecution {
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    /// Create an invalid input error
    pub fn input(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InputInvalid {
            name,
            reason: reason.into(),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::GradlewMissing => Some(
                "Using a Gradle Wrapper (gradlew) is required, as the wrapper is what makes sure\n\
                 that the right Gradle version is installed and used for the build.\n\n\
                 You can find more information about the Gradle Wrapper (gradlew),\n\
                 and about how you can generate one (if you would not have one already)\n\
                 in the official guide at: https://docs.gradle.org/current/userguide/gradle_wrapper.html",
            ),
            Self::InputInvalid {
                name: "cache_level",
                ..
            } => Some("Available options: all, only deps, none"),
            _ => None,
        }
    }
}
