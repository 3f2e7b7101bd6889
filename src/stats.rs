//! Per-run counters for the end-of-run report.

use std::path::{Path, PathBuf};

/// What happened to each file touched during a run.
#[derive(Default)]
pub struct Stats {
    skipped: Vec<PathBuf>,
    created: Vec<PathBuf>,
    deleted: Vec<PathBuf>,
    failed: Vec<PathBuf>,
}

impl Stats {
    /// Creates empty counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a file that was looked at but left alone.
    pub fn add_skipped(&mut self, path: &Path) {
        self.skipped.push(path.to_path_buf());
    }

    /// Records a newly created output file.
    pub fn add_created(&mut self, path: &Path) {
        self.created.push(path.to_path_buf());
    }

    /// Records a deleted source file.
    pub fn add_deleted(&mut self, path: &Path) {
        self.deleted.push(path.to_path_buf());
    }

    /// Records a file that errored.
    pub fn add_failed(&mut self, path: &Path) {
        self.failed.push(path.to_path_buf());
    }

    /// Number of files looked at overall.
    #[must_use]
    pub fn total(&self) -> usize {
        self.skipped.len() + self.created.len() + self.failed.len()
    }

    #[must_use]
    pub fn skipped(&self) -> &[PathBuf] {
        &self.skipped
    }

    #[must_use]
    pub fn created(&self) -> &[PathBuf] {
        &self.created
    }

    #[must_use]
    pub fn deleted(&self) -> &[PathBuf] {
        &self.deleted
    }

    #[must_use]
    pub fn failed(&self) -> &[PathBuf] {
        &self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let mut stats = Stats::new();
        stats.add_created(Path::new("a.lky"));
        stats.add_deleted(Path::new("a"));
        stats.add_skipped(Path::new("b"));
        stats.add_failed(Path::new("c"));

        assert_eq!(stats.created().len(), 1);
        assert_eq!(stats.deleted().len(), 1);
        assert_eq!(stats.skipped().len(), 1);
        assert_eq!(stats.failed().len(), 1);
        assert_eq!(stats.total(), 3);
    }
}
