//! Gradle Unit Test - CI step entry point
//!
//! Dispatches to subcommands; `run` is the default.

use clap::Parser;
use console::style;
use gradle_unit_test::cli::{Cli, Commands};
use gradle_unit_test::envman::TestOutcome;
use gradle_unit_test::error::StepResult;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(TestOutcome::Succeeded) => ExitCode::SUCCESS,
        Ok(TestOutcome::Failed) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!();
                eprintln!("{}", hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> StepResult<TestOutcome> {
    let cli = Cli::parse();

    // Initialize logging: 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("gradle_unit_test=warn"),
        1 => EnvFilter::new("gradle_unit_test=info"),
        _ => EnvFilter::new("gradle_unit_test=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        None | Some(Commands::Run) => gradle_unit_test::cli::commands::run(cli.inputs).await,
        Some(Commands::Plan(args)) => {
            gradle_unit_test::cli::commands::plan(args, cli.inputs).await?;
            Ok(TestOutcome::Succeeded)
        }
    }
}
