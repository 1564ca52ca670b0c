//! CLI argument definitions using clap derive

use crate::config::StepConfig;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Gradle Unit Test - run unit tests and collect Gradle caches
///
/// Step inputs are read from the environment variables the CI runner sets,
/// or from the matching flags.
#[derive(Parser, Debug)]
#[command(name = "gradle-unit-test")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute (defaults to run)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Step inputs
    #[command(flatten)]
    pub inputs: StepArgs,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the unit tests, then collect caches
    Run,

    /// Show which paths would be cached, without running Gradle
    Plan(PlanArgs),
}

/// Step inputs, one per CI input variable
#[derive(Args, Debug, Clone, Default)]
pub struct StepArgs {
    /// Optional build file passed to gradle as --build-file
    #[arg(long, global = true, env = "gradle_file")]
    pub gradle_file: Option<PathBuf>,

    /// Gradle tasks running the unit tests
    #[arg(long, global = true, env = "unit_test_task", default_value = "")]
    pub unit_test_task: String,

    /// Path of the Gradle wrapper
    #[arg(long, global = true, env = "gradlew_file_path")]
    pub gradlew_path: Option<PathBuf>,

    /// Additional flags for the gradle command
    #[arg(long, global = true, env = "unit_test_flags", default_value = "", allow_hyphen_values = true)]
    pub unit_test_flags: String,

    /// CI deploy directory
    #[arg(long, global = true, env = "BITRISE_DEPLOY_DIR")]
    pub deploy_dir: Option<PathBuf>,

    /// Cache level: all, only deps, none
    #[arg(long, global = true, env = "cache_level", default_value = "")]
    pub cache_level: String,
}

impl StepArgs {
    /// Convert into step configuration
    pub fn into_config(self) -> StepConfig {
        StepConfig {
            gradle_file: self.gradle_file.filter(|p| !p.as_os_str().is_empty()),
            unit_test_tasks: self.unit_test_task,
            gradlew_path: self.gradlew_path.filter(|p| !p.as_os_str().is_empty()),
            unit_test_flags: self.unit_test_flags,
            deploy_dir: self.deploy_dir.filter(|p| !p.as_os_str().is_empty()),
            cache_level: self.cache_level,
        }
    }
}

/// Output format for plan output
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum OutputFormat {
    /// Human-readable listing
    #[default]
    Table,
    /// JSON output
    Json,
    /// Collector input lines
    Plain,
}

/// Arguments for the plan command
#[derive(Parser, Debug)]
pub struct PlanArgs {
    /// Project root (defaults to current directory)
    #[arg(short, long)]
    pub project: Option<PathBuf>,

    /// Home directory holding the dependency stores (defaults to $HOME)
    #[arg(long)]
    pub home: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}
