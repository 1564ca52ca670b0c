//! Dependency lockfile generation
//!
//! Walks a project tree for Gradle build scripts and writes the concatenation
//! of their fingerprints to `gradle.deps`. The cache collector keys the
//! dependency stores on that file: same build scripts = same cache.

use crate::cache::fingerprint::fingerprint_file;
use crate::error::{StepError, StepResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Suffix identifying dependency-declaration files
pub const DEPENDENCY_FILE_SUFFIX: &str = ".gradle";

/// Directory never searched for dependency files
pub const EXCLUDED_DIR: &str = "node_modules";

/// Lockfile name, relative to the project root
pub const LOCKFILE_NAME: &str = "gradle.deps";

/// A dependency file that made it into the lockfile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockfileEntry {
    /// Path of the dependency-declaration file
    pub path: PathBuf,
    /// Fingerprint of its contents
    pub digest: String,
}

/// A lockfile written to disk
#[derive(Debug, Clone)]
pub struct Lockfile {
    /// Where the lockfile was written
    pub path: PathBuf,
    /// Fingerprinted files, in traversal order
    pub entries: Vec<LockfileEntry>,
    /// Matched files that could not be fingerprinted
    pub skipped: Vec<PathBuf>,
}

impl Lockfile {
    /// Concatenated digests, exactly as written to disk
    pub fn content(&self) -> String {
        self.entries.iter().map(|e| e.digest.as_str()).collect()
    }
}

/// Builds the dependency lockfile for a project tree
#[derive(Debug, Clone)]
pub struct LockfileBuilder {
    suffix: String,
    excluded_dir: String,
    file_name: String,
}

impl LockfileBuilder {
    /// Builder for Gradle projects
    pub fn new() -> Self {
        Self {
            suffix: DEPENDENCY_FILE_SUFFIX.to_string(),
            excluded_dir: EXCLUDED_DIR.to_string(),
            file_name: LOCKFILE_NAME.to_string(),
        }
    }

    /// Match dependency files by a different name suffix
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Write the lockfile under a different name
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Path the lockfile is written to for `root`
    pub fn lockfile_path(&self, root: &Path) -> PathBuf {
        root.join(&self.file_name)
    }

    /// Fingerprint every dependency file under `root`
    ///
    /// Files that cannot be read are logged and returned in the second list.
    /// Fails only if the tree walk itself fails.
    pub fn collect(&self, root: &Path) -> StepResult<(Vec<LockfileEntry>, Vec<PathBuf>)> {
        let mut entries = Vec::new();
        let mut skipped = Vec::new();

        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || e.file_name() != self.excluded_dir.as_str());

        for entry in walker {
            let entry = entry.map_err(|e| StepError::DependencyWalk {
                root: root.to_path_buf(),
                reason: e.to_string(),
            })?;

            if entry.file_type().is_dir() || !self.is_dependency_file(entry.file_name()) {
                continue;
            }

            match fingerprint_file(entry.path()) {
                Ok(digest) => {
                    debug!("Fingerprinted {}: {}", entry.path().display(), digest);
                    entries.push(LockfileEntry {
                        path: entry.path().to_path_buf(),
                        digest,
                    });
                }
                Err(e) => {
                    warn!("Failed to compute hash of {}, skipping: {}", entry.path().display(), e);
                    skipped.push(entry.path().to_path_buf());
                }
            }
        }

        debug!(
            "Collected {} dependency files ({} skipped)",
            entries.len(),
            skipped.len()
        );
        Ok((entries, skipped))
    }

    /// Generate and write the lockfile for `root`, overwriting any previous one
    pub fn build(&self, root: &Path) -> StepResult<Lockfile> {
        let (entries, skipped) = self.collect(root)?;

        let lockfile = Lockfile {
            path: self.lockfile_path(root),
            entries,
            skipped,
        };

        fs::write(&lockfile.path, lockfile.content()).map_err(|e| StepError::LockfileWrite {
            path: lockfile.path.clone(),
            source: e,
        })?;

        debug!("Wrote lockfile {}", lockfile.path.display());
        Ok(lockfile)
    }

    fn is_dependency_file(&self, name: &std::ffi::OsStr) -> bool {
        name.to_string_lossy().ends_with(self.suffix.as_str())
    }
}

impl Default for LockfileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
