// src/watch/index.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::tasks::TaskName;

/// Mapping from watched paths (directories, plus exact files for
/// single-file tasks) to the task that owns them.
///
/// Entries are never removed: a binding for a deleted path is simply stale,
/// and a lookup miss on it is not an error.
#[derive(Debug, Default)]
pub struct TaskPathIndex {
    owners: HashMap<PathBuf, TaskName>,
}

impl TaskPathIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a path to its owning task.
    ///
    /// Last write wins: when two tasks declare overlapping roots, the later
    /// registration silently owns the overlap. This is documented behaviour,
    /// not a conflict-resolution guarantee.
    pub fn bind(&mut self, path: PathBuf, task: TaskName) {
        self.owners.insert(path, task);
    }

    /// Exact-match lookup.
    pub fn owner_of(&self, path: &Path) -> Option<&TaskName> {
        self.owners.get(path)
    }

    /// Resolve a changed path to its owning task: exact match first, then
    /// the immediate parent directory, and no further. Every intermediate
    /// directory is expected to have been registered by the tree walk, so a
    /// deeper miss means an unregistered or stale path and resolves to
    /// `None` rather than guessing.
    pub fn resolve(&self, path: &Path) -> Option<&TaskName> {
        self.owners
            .get(path)
            .or_else(|| path.parent().and_then(|p| self.owners.get(p)))
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}
