//! Step configuration
//!
//! Inputs arrive as environment variables set by the CI runner (or as flags
//! when run by hand) and are validated once, before anything runs.

use crate::error::{StepError, StepResult};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Which build-tool caches get collected after the tests ran
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheLevel {
    /// Dependency stores, build cache and project build outputs
    All,
    /// Dependency stores only
    OnlyDeps,
    /// Collect nothing
    None,
}

impl CacheLevel {
    /// Accepted input spellings
    pub const OPTIONS: &'static [&'static str] = &["all", "only deps", "only-deps", "none"];
}

impl FromStr for CacheLevel {
    type Err = StepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "only deps" | "only-deps" => Ok(Self::OnlyDeps),
            "none" => Ok(Self::None),
            "" => Err(StepError::input("cache_level", "no value specified")),
            other => Err(StepError::input(
                "cache_level",
                format!("invalid value: {other}, available: {:?}", Self::OPTIONS),
            )),
        }
    }
}

impl fmt::Display for CacheLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::All => "all",
            Self::OnlyDeps => "only deps",
            Self::None => "none",
        };
        write!(f, "{}", name)
    }
}

/// Raw step inputs
#[derive(Debug, Clone, Default)]
pub struct StepConfig {
    /// Optional build file passed to `--build-file`
    pub gradle_file: Option<PathBuf>,
    /// Gradle tasks to run, shell-quoted
    pub unit_test_tasks: String,
    /// Path of the Gradle wrapper
    pub gradlew_path: Option<PathBuf>,
    /// Extra Gradle flags, shell-quoted
    pub unit_test_flags: String,
    /// CI deploy directory
    pub deploy_dir: Option<PathBuf>,
    /// Cache level, unparsed
    pub cache_level: String,
}

/// Step inputs after validation
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub gradle_file: Option<PathBuf>,
    pub unit_test_tasks: String,
    pub gradlew_path: PathBuf,
    pub unit_test_flags: String,
    pub cache_level: CacheLevel,
}

impl StepConfig {
    /// Check the inputs and resolve the cache level
    pub fn validate(self) -> StepResult<ValidatedConfig> {
        if let Some(ref file) = self.gradle_file {
            ensure_exists(file)?;
        }

        if self.unit_test_tasks.trim().is_empty() {
            return Err(StepError::input("unit_test_task", "no value specified"));
        }

        let gradlew_path = self.gradlew_path.ok_or(StepError::GradlewMissing)?;
        ensure_exists(&gradlew_path)?;

        let cache_level = self.cache_level.parse()?;

        Ok(ValidatedConfig {
            gradle_file: self.gradle_file,
            unit_test_tasks: self.unit_test_tasks,
            gradlew_path,
            unit_test_flags: self.unit_test_flags,
            cache_level,
        })
    }
}

fn ensure_exists(path: &Path) -> StepResult<()> {
    match path.try_exists() {
        Ok(true) => Ok(()),
        Ok(false) => Err(StepError::PathNotFound(path.to_path_buf())),
        Err(e) => Err(StepError::io(
            format!("checking if {} exists", path.display()),
            e,
        )),
    }
}
