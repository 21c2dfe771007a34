// src/watch/tree.rs

//! Watch tree maintenance: the initial recursive walk over task roots, and
//! dynamic extension when new directories appear under a watched tree.

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::tasks::{TaskName, TaskSpec};
use crate::watch::index::TaskPathIndex;
use crate::watch::primitive::WatchPrimitive;

/// Register every declared root of a task.
///
/// Directories are walked recursively; single-file roots additionally get an
/// exact-path binding so lookups on the file itself succeed. Roots that do
/// not exist, or subtrees that cannot be registered, are warned about and
/// skipped; neither is fatal.
pub fn register_task_roots<P: WatchPrimitive>(
    primitive: &mut P,
    index: &mut TaskPathIndex,
    task: &TaskSpec,
) {
    for root in task.watch_roots() {
        let dir = root.dir.canonicalize().unwrap_or(root.dir.clone());
        if !dir.is_dir() {
            warn!(task = %task.name, path = ?root.dir, "watch root is not a directory, skipping");
            continue;
        }

        walk_and_register(primitive, index, &dir, &task.name);

        if let Some(file) = root.file {
            let file = file.canonicalize().unwrap_or(file);
            index.bind(file, task.name.clone());
        }
    }
}

/// Recursive descent from `root`: register a watch on every directory and
/// bind each to `task` in the index.
pub fn walk_and_register<P: WatchPrimitive>(
    primitive: &mut P,
    index: &mut TaskPathIndex,
    root: &Path,
    task: &TaskName,
) {
    match primitive.register(root) {
        Ok(_) => {
            debug!(task = %task, dir = ?root, "watching directory");
            index.bind(root.to_path_buf(), task.clone());
        }
        Err(err) => {
            // Non-fatal: this subtree simply stays unwatched.
            warn!(error = %err, dir = ?root, "could not watch directory, subtree unmonitored");
            return;
        }
    }

    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(error = %err, dir = ?root, "could not list directory, subtree unmonitored");
            return;
        }
    };

    for entry in entries.flatten() {
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if is_dir {
            walk_and_register(primitive, index, &entry.path(), task);
        }
    }
}

/// Attach a newly created directory to the task owning its parent.
///
/// The descent covers the case where the directory already has contents
/// (bulk copies and moves create a populated tree in one event).
pub fn extend<P: WatchPrimitive>(
    primitive: &mut P,
    index: &mut TaskPathIndex,
    new_dir: &Path,
    owner: &TaskName,
) {
    info!(task = %owner, dir = ?new_dir, "added watch for new directory");
    walk_and_register(primitive, index, new_dir, owner);
}
