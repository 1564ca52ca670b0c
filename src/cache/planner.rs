//! Cache path planning
//!
//! Turns a cache level and a project root into the include/exclude path
//! lists handed to a cache collector.
//!
//! Planning is all-or-nothing: if any tree walk fails the plan is
//! `Disabled` and no path set exists to commit.

use crate::cache::lockfile::{Lockfile, LockfileBuilder};
use crate::config::CacheLevel;
use crate::error::{StepError, StepResult};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Dependency stores under the home directory, keyed to the lockfile
pub const DEPENDENCY_STORES: &[&str] = &[".gradle", ".kotlin", ".m2"];

/// Android build cache under the home directory, cached at level `all` only
pub const BUILD_CACHE_STORE: &[&str] = &[".android", "build-cache"];

/// Project directory names cached unconditionally at level `all`
pub const OUTPUT_DIR_NAMES: &[&str] = &["build", ".gradle"];

/// Globs never committed, regardless of cache level
pub const EXCLUDE_PATTERNS: &[&str] = &[
    "~/.gradle/**",
    "~/.android/build-cache/**",
    "*.lock",
    "*.bin",
    "/**/build/**.json",
    "/**/build/**.html",
    "/**/build/**.xml",
    "/**/build/**.properties",
    "/**/build/**/zip-cache/**",
    "*.log",
    "*.txt",
    "*.rawproto",
    "!*.ap_",
    "!*.apk",
];

/// One line of the include list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum IncludePath {
    /// Cache `source`, invalidated when `key` changes
    Mapped { source: PathBuf, key: PathBuf },
    /// Cache the path unconditionally
    Plain(PathBuf),
}

impl IncludePath {
    /// Invalidation key, if any
    pub fn key(&self) -> Option<&Path> {
        match self {
            Self::Mapped { key, .. } => Some(key),
            Self::Plain(_) => None,
        }
    }
}

impl fmt::Display for IncludePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mapped { source, key } => write!(f, "{} -> {}", source.display(), key.display()),
            Self::Plain(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Include and exclude lists for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PathSet {
    pub includes: Vec<IncludePath>,
    pub excludes: Vec<String>,
}

impl PathSet {
    /// Includes joined one per line, as the collector expects
    pub fn render_includes(&self) -> String {
        self.includes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Excludes joined one per line, as the collector expects
    pub fn render_excludes(&self) -> String {
        self.excludes.join("\n")
    }
}

/// Result of planning
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CachePlan {
    /// Cache level is `none`
    Skipped,
    /// A walk or write failed; nothing may be committed
    Disabled { reason: String },
    /// Complete path set ready to commit
    Ready { lockfile: PathBuf, paths: PathSet },
}

impl CachePlan {
    /// The path set, only when planning completed
    pub fn path_set(&self) -> Option<&PathSet> {
        match self {
            Self::Ready { paths, .. } => Some(paths),
            _ => None,
        }
    }

    /// Consume the plan, returning the path set if planning completed
    pub fn into_path_set(self) -> Option<PathSet> {
        match self {
            Self::Ready { paths, .. } => Some(paths),
            _ => None,
        }
    }

    fn disabled(err: &StepError) -> Self {
        Self::Disabled {
            reason: err.to_string(),
        }
    }
}

/// Inputs for planning, resolved once by the caller
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Which categories of paths to cache
    pub level: CacheLevel,
    /// Absolute project root, searched and used for the lockfile
    pub project_root: PathBuf,
    /// Home directory holding the dependency stores
    pub home_dir: PathBuf,
}

/// Plans which paths to cache for a project
#[derive(Debug)]
pub struct CachePathPlanner {
    config: PlannerConfig,
    lockfiles: LockfileBuilder,
}

impl CachePathPlanner {
    /// Create a planner using the Gradle lockfile builder
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            config,
            lockfiles: LockfileBuilder::new(),
        }
    }

    /// Build the cache plan
    pub fn plan(self) -> CachePlan {
        if self.config.level == CacheLevel::None {
            debug!("Cache level is none, skipping cache planning");
            return CachePlan::Skipped;
        }

        match self.build() {
            Ok((lockfile, paths)) => {
                info!(
                    "Planned {} include paths from {} dependency files",
                    paths.includes.len(),
                    lockfile.entries.len()
                );
                CachePlan::Ready {
                    lockfile: lockfile.path,
                    paths,
                }
            }
            Err(e) => {
                warn!("Cache collection skipped: {}", e);
                CachePlan::disabled(&e)
            }
        }
    }

    fn build(&self) -> StepResult<(Lockfile, PathSet)> {
        let PlannerConfig {
            level,
            project_root,
            home_dir,
        } = &self.config;

        info!("Generating dependency map for {}", project_root.display());
        let lockfile = self.lockfiles.build(project_root)?;

        let mut paths = PathSet {
            includes: Vec::new(),
            excludes: EXCLUDE_PATTERNS.iter().map(|p| p.to_string()).collect(),
        };

        for store in DEPENDENCY_STORES {
            paths.includes.push(IncludePath::Mapped {
                source: home_dir.join(store),
                key: lockfile.path.clone(),
            });
        }

        if *level == CacheLevel::All {
            paths.includes.push(IncludePath::Mapped {
                source: BUILD_CACHE_STORE
                    .iter()
                    .fold(home_dir.clone(), |acc, part| acc.join(part)),
                key: lockfile.path.clone(),
            });

            for dir in scan_output_dirs(project_root)? {
                paths.includes.push(IncludePath::Plain(dir));
            }
        }

        Ok((lockfile, paths))
    }
}

/// Find every build output and Gradle metadata directory under `root`
pub fn scan_output_dirs(root: &Path) -> StepResult<Vec<PathBuf>> {
    let mut dirs = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| StepError::OutputScan {
            root: root.to_path_buf(),
            reason: e.to_string(),
        })?;

        if !entry.file_type().is_dir() {
            continue;
        }

        if OUTPUT_DIR_NAMES.iter().any(|name| entry.file_name() == *name) {
            debug!("Found cacheable directory {}", entry.path().display());
            dirs.push(entry.into_path());
        }
    }

    Ok(dirs)
}
