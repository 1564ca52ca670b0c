//! Run command - run the unit tests, then collect caches

use crate::cache::{self, CachePathPlanner, EnvmanCollector, PlannerConfig};
use crate::cli::args::StepArgs;
use crate::config::{CacheLevel, ValidatedConfig};
use crate::envman::{self, TestOutcome};
use crate::error::{StepError, StepResult};
use crate::gradle::{self, GradleTask};
use crate::ui;
use std::env;
use tracing::{debug, error, warn};

/// Execute the run command
///
/// Only input validation and the wrapper chmod are fatal. Everything after
/// the tests ran is best-effort and reported through the returned outcome.
pub async fn execute(inputs: StepArgs) -> StepResult<TestOutcome> {
    let config = inputs.into_config();

    ui::section("Configs:");
    ui::key_value("GradleFile", &display(config.gradle_file.as_deref()));
    ui::key_value("UnitTestTasks", &config.unit_test_tasks);
    ui::key_value("GradlewPath", &display(config.gradlew_path.as_deref()));
    ui::key_value("UnitTestFlags", &config.unit_test_flags);
    ui::key_value("DeployDir", &display(config.deploy_dir.as_deref()));
    ui::key_value("CacheLevel", &config.cache_level);

    let config = config.validate()?;
    gradle::make_executable(&config.gradlew_path)?;

    ui::section("Running gradle task...");
    let outcome = match run_tests(&config).await {
        Ok(()) => TestOutcome::Succeeded,
        Err(e) => {
            error!("Gradle task failed, error: {}", e);
            TestOutcome::Failed
        }
    };

    if config.cache_level != CacheLevel::None {
        collect_caches(config.cache_level).await;
    }

    envman::export_test_result(outcome).await;
    Ok(outcome)
}

async fn run_tests(config: &ValidatedConfig) -> StepResult<()> {
    GradleTask::new(
        &config.gradlew_path,
        config.gradle_file.as_deref(),
        &config.unit_test_tasks,
        &config.unit_test_flags,
    )?
    .run()
    .await
}

async fn collect_caches(level: CacheLevel) {
    ui::section("Collecting gradle caches...");

    let planner_config = match resolve_planner_config(level) {
        Ok(c) => c,
        Err(e) => {
            warn!("Cache collection skipped: {}", e);
            ui::step_warn("Cache collection skipped");
            return;
        }
    };
    debug!("Project root: {}", planner_config.project_root.display());

    let plan = CachePathPlanner::new(planner_config).plan();
    let mut collector = EnvmanCollector::new();

    if cache::collect(plan, &mut collector).await {
        ui::step_ok("Cache paths committed");
    } else {
        ui::step_warn("Cache collection skipped");
    }
    ui::done("");
}

fn resolve_planner_config(level: CacheLevel) -> StepResult<PlannerConfig> {
    let project_root =
        env::current_dir().map_err(|e| StepError::io("determining project root path", e))?;
    let home_dir = dirs::home_dir().ok_or(StepError::HomeDirUnknown)?;

    Ok(PlannerConfig {
        level,
        project_root,
        home_dir,
    })
}

fn display(path: Option<&std::path::Path>) -> String {
    path.map(|p| p.display().to_string()).unwrap_or_default()
}
