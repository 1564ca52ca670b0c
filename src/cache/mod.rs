//! Gradle cache planning and collection
//!
//! Decides which directories are worth caching after the tests ran and keys
//! the dependency stores on a fingerprint of the project's build scripts.
//!
//! # Cache Levels
//!
//! | Level | Includes |
//! |-------|----------|
//! | none | nothing, planning is skipped |
//! | only deps | `~/.gradle`, `~/.kotlin`, `~/.m2` keyed to `gradle.deps` |
//! | all | the above, `~/.android/build-cache`, every `build` and `.gradle` dir |
//!
//! Every failure inside planning degrades to "collect nothing".

pub mod collector;
pub mod fingerprint;
pub mod lockfile;
pub mod planner;

pub use collector::{collect, CacheCollector, EnvmanCollector};
pub use fingerprint::fingerprint_file;
pub use lockfile::{Lockfile, LockfileBuilder, LockfileEntry};
pub use planner::{CachePathPlanner, CachePlan, IncludePath, PathSet, PlannerConfig};
