//! Cache collector boundary
//!
//! A collector receives newline-joined include and exclude lists and commits
//! them for a later cache-push step. Include lines are either a plain path
//! or `source -> key`; exclude lines are globs, `!` negates.

use crate::cache::planner::CachePlan;
use crate::envman;
use crate::error::{StepError, StepResult};
use async_trait::async_trait;
use tracing::{info, warn};

/// Environment key the cache-push step reads include paths from
pub const INCLUDE_PATHS_KEY: &str = "BITRISE_CACHE_INCLUDE_PATHS";

/// Environment key the cache-push step reads exclude paths from
pub const EXCLUDE_PATHS_KEY: &str = "BITRISE_CACHE_EXCLUDE_PATHS";

/// Sink for planned cache paths
#[async_trait]
pub trait CacheCollector: Send {
    /// Queue newline-joined include lines
    fn include_path(&mut self, paths: String);

    /// Queue newline-joined exclude globs
    fn exclude_path(&mut self, patterns: String);

    /// Persist everything queued so far
    async fn commit(&mut self) -> StepResult<()>;
}

/// Collector that appends to the cache path lists kept in envman
#[derive(Debug)]
pub struct EnvmanCollector {
    program: String,
    includes: Vec<String>,
    excludes: Vec<String>,
}

impl EnvmanCollector {
    pub fn new() -> Self {
        Self {
            program: "envman".to_string(),
            includes: Vec::new(),
            excludes: Vec::new(),
        }
    }

    async fn commit_key(&self, key: &str, values: &[String]) -> StepResult<()> {
        if values.is_empty() {
            return Ok(());
        }
        let merged = merge_values(std::env::var(key).ok().as_deref(), values);
        envman::export_with(&self.program, key, &merged)
            .await
            .map_err(|e| StepError::CacheCommit(format!("exporting {}: {}", key, e)))
    }
}

impl Default for EnvmanCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheCollector for EnvmanCollector {
    fn include_path(&mut self, paths: String) {
        self.includes.push(paths);
    }

    fn exclude_path(&mut self, patterns: String) {
        self.excludes.push(patterns);
    }

    async fn commit(&mut self) -> StepResult<()> {
        self.commit_key(INCLUDE_PATHS_KEY, &self.includes).await?;
        self.commit_key(EXCLUDE_PATHS_KEY, &self.excludes).await?;
        Ok(())
    }
}

/// Append `values` to whatever earlier steps already exported under a key
pub fn merge_values(existing: Option<&str>, values: &[String]) -> String {
    let mut content = existing.unwrap_or_default().to_string();
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content.push_str(&values.join("\n"));
    content.push('\n');
    content
}

/// Hand a ready plan to `collector` and commit it
///
/// Returns whether anything was committed. Commit failures only warn: cache
/// collection never fails the run.
pub async fn collect(plan: CachePlan, collector: &mut dyn CacheCollector) -> bool {
    let paths = match plan {
        CachePlan::Ready { paths, .. } => paths,
        CachePlan::Skipped => return false,
        CachePlan::Disabled { reason } => {
            warn!("Cache collection skipped: {}", reason);
            return false;
        }
    };

    collector.include_path(paths.render_includes());
    collector.exclude_path(paths.render_excludes());

    match collector.commit().await {
        Ok(()) => {
            info!("Committed {} cache include paths", paths.includes.len());
            true
        }
        Err(e) => {
            warn!("Cache collection skipped: failed to commit cache paths: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::planner::{IncludePath, PathSet};
    use std::path::PathBuf;

    #[derive(Default)]
    struct Recording {
        includes: Vec<String>,
        excludes: Vec<String>,
        commits: usize,
        fail: bool,
    }

    #[async_trait]
    impl CacheCollector for Recording {
        fn include_path(&mut self, paths: String) {
            self.includes.push(paths);
        }

        fn exclude_path(&mut self, patterns: String) {
            self.excludes.push(patterns);
        }

        async fn commit(&mut self) -> StepResult<()> {
            self.commits += 1;
            if self.fail {
                Err(StepError::CacheCommit("storage unavailable".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn ready_plan() -> CachePlan {
        CachePlan::Ready {
            lockfile: PathBuf::from("/src/gradle.deps"),
            paths: PathSet {
                includes: vec![
                    IncludePath::Mapped {
                        source: PathBuf::from("/home/ci/.m2"),
                        key: PathBuf::from("/src/gradle.deps"),
                    },
                    IncludePath::Plain(PathBuf::from("/src/build")),
                ],
                excludes: vec!["*.log".to_string(), "!*.apk".to_string()],
            },
        }
    }

    #[test]
    fn merge_without_existing() {
        let merged = merge_values(None, &["a\nb".to_string()]);
        assert_eq!(merged, "a\nb\n");
    }

    #[test]
    fn merge_appends_to_existing() {
        assert_eq!(merge_values(Some("old"), &["new".to_string()]), "old\nnew\n");
        assert_eq!(merge_values(Some("old\n"), &["new".to_string()]), "old\nnew\n");
    }

    #[tokio::test]
    async fn collect_ready_plan() {
        let mut recording = Recording::default();

        assert!(collect(ready_plan(), &mut recording).await);

        assert_eq!(recording.commits, 1);
        assert_eq!(
            recording.includes,
            vec!["/home/ci/.m2 -> /src/gradle.deps\n/src/build".to_string()]
        );
        assert_eq!(recording.excludes, vec!["*.log\n!*.apk".to_string()]);
    }

    #[tokio::test]
    async fn collect_disabled_commits_nothing() {
        let mut recording = Recording::default();
        let plan = CachePlan::Disabled {
            reason: "walk failed".to_string(),
        };

        assert!(!collect(plan, &mut recording).await);
        assert!(!collect(CachePlan::Skipped, &mut recording).await);

        assert_eq!(recording.commits, 0);
        assert!(recording.includes.is_empty());
    }

    #[tokio::test]
    async fn commit_failure_is_not_fatal() {
        let mut recording = Recording {
            fail: true,
            ..Default::default()
        };

        assert!(!collect(ready_plan(), &mut recording).await);
        assert_eq!(recording.commits, 1);
    }

    #[tokio::test]
    async fn envman_failure_maps_to_commit_error() {
        let mut collector = EnvmanCollector {
            program: "definitely-not-envman-xyz".to_string(),
            ..EnvmanCollector::new()
        };
        collector.include_path("/home/ci/.m2 -> /src/gradle.deps".to_string());

        let err = collector.commit().await.unwrap_err();

        assert!(matches!(err, StepError::CacheCommit(_)));
        assert!(err.to_string().contains(INCLUDE_PATHS_KEY));
    }

    #[tokio::test]
    async fn envman_nothing_queued_commits_nothing() {
        let mut collector = EnvmanCollector {
            program: "definitely-not-envman-xyz".to_string(),
            ..EnvmanCollector::new()
        };

        assert!(collector.commit().await.is_ok());
    }

    #[tokio::test]
    async fn collect_with_unavailable_envman_is_not_fatal() {
        let mut collector = EnvmanCollector {
            program: "definitely-not-envman-xyz".to_string(),
            ..EnvmanCollector::new()
        };

        assert!(!collect(ready_plan(), &mut collector).await);
    }
}
