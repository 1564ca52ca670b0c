//! Plan command - show which paths would be cached

use crate::cache::{CachePathPlanner, CachePlan, PlannerConfig};
use crate::cli::args::{OutputFormat, PlanArgs, StepArgs};
use crate::config::CacheLevel;
use crate::error::{StepError, StepResult};
use crate::ui;
use console::style;
use std::env;
use std::path::Path;

/// Execute the plan command
///
/// Writes the lockfile like a real run would, but commits nothing.
pub async fn execute(args: PlanArgs, inputs: StepArgs) -> StepResult<()> {
    let level: CacheLevel = inputs.cache_level.parse()?;

    let project_root = match args.project {
        Some(p) => std::path::absolute(&p)
            .map_err(|e| StepError::io(format!("resolving {}", p.display()), e))?,
        None => env::current_dir().map_err(|e| StepError::io("getting current directory", e))?,
    };
    let home_dir = args
        .home
        .or_else(dirs::home_dir)
        .ok_or(StepError::HomeDirUnknown)?;

    let plan = CachePathPlanner::new(PlannerConfig {
        level,
        project_root: project_root.clone(),
        home_dir,
    })
    .plan();

    match args.format {
        OutputFormat::Table => print_plan_table(level, &project_root, &plan),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
        OutputFormat::Plain => print_plan_plain(&plan),
    }

    Ok(())
}

fn print_plan_table(level: CacheLevel, project_root: &Path, plan: &CachePlan) {
    println!("Project: {}", project_root.display());
    println!("Cache level: {}", level);

    match plan {
        CachePlan::Skipped => {
            println!();
            println!("Cache collection disabled by cache level.");
        }
        CachePlan::Disabled { reason } => {
            println!();
            ui::step_warn(&format!("Cache collection skipped: {}", reason));
        }
        CachePlan::Ready { lockfile, paths } => {
            println!("Lockfile: {}", lockfile.display());

            ui::section("Include:");
            for include in &paths.includes {
                match include.key() {
                    Some(_) => println!("  {} {}", style("•").cyan(), include),
                    None => println!("  {} {}", style("•").dim(), include),
                }
            }

            ui::section("Exclude:");
            for pattern in &paths.excludes {
                println!("  {} {}", style("•").dim(), pattern);
            }

            println!();
            println!("Total: {} include path(s)", paths.includes.len());
        }
    }
}

fn print_plan_plain(plan: &CachePlan) {
    if let Some(paths) = plan.path_set() {
        println!("{}", paths.render_includes());
        println!();
        println!("{}", paths.render_excludes());
    }
}
