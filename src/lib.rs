//! Gradle Unit Test - CI step
//!
//! Runs the project's unit tests through the Gradle wrapper, then plans and
//! commits the Gradle caches worth keeping for the next build.

pub mod cache;
pub mod cli;
pub mod config;
pub mod envman;
pub mod error;
pub mod gradle;
pub mod ui;

pub use error::{StepError, StepResult};
