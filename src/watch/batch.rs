// src/watch/batch.rs

//! Per-wakeup event processing: drain one signaled key, classify and
//! de-duplicate its events, resolve owners, and collect the rerun set.

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::errors::WatchError;
use crate::tasks::{TaskName, TaskRegistry};
use crate::watch::classify::{Classification, PathClassifier};
use crate::watch::index::TaskPathIndex;
use crate::watch::primitive::{SignaledKey, WatchPrimitive};
use crate::watch::tree;

/// Transient per-wake-cycle state: the distinct changed paths seen so far
/// and the tasks to rerun, in discovery order.
///
/// A path that produces several raw events (a write often reports both
/// modify and create) contributes at most one rerun of its owning task.
#[derive(Debug, Default)]
pub struct BatchState {
    updated: HashSet<PathBuf>,
    rerun_order: Vec<TaskName>,
    rerun_seen: HashSet<TaskName>,
}

impl BatchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rerun_order.is_empty()
    }

    /// The rerun set, in the order tasks were first discovered.
    pub fn into_reruns(self) -> Vec<TaskName> {
        self.rerun_order
    }

    fn note_rerun(&mut self, task: &TaskName) {
        if self.rerun_seen.insert(task.clone()) {
            self.rerun_order.push(task.clone());
        }
    }
}

/// Process the drained events of one signaled key, then re-arm it.
///
/// Directory creations extend the watch tree (owner taken from the parent
/// directory's binding) and never rerun anything by themselves. File changes
/// resolve through the index, pass the owning task's kind filter, and land
/// in the batch's rerun set. A failed re-arm would permanently silence the
/// directory, so it is surfaced as a fatal error.
pub fn process_key<P: WatchPrimitive>(
    primitive: &mut P,
    index: &mut TaskPathIndex,
    registry: &TaskRegistry,
    classifier: &PathClassifier,
    signaled: SignaledKey,
    batch: &mut BatchState,
) -> Result<(), WatchError> {
    for event in &signaled.events {
        debug!(kind = ?event.kind, path = ?event.path, "watched event");

        match classifier.classify(&event.path, event.kind) {
            Classification::Ignore => {}
            Classification::DirectoryCreated => {
                let owner = event
                    .path
                    .parent()
                    .and_then(|p| index.owner_of(p))
                    .cloned();
                if let Some(owner) = owner {
                    tree::extend(primitive, index, &event.path, &owner);
                }
            }
            Classification::FileChanged => {
                if !batch.updated.insert(event.path.clone()) {
                    continue;
                }
                let Some(owner) = index.resolve(&event.path).cloned() else {
                    continue;
                };
                let Some(task) = registry.get(&owner) else {
                    continue;
                };
                if !task.wants_rerun_for(&event.path) {
                    debug!(task = %owner, path = ?event.path, "change outside task's file filter");
                    continue;
                }
                info!(path = ?event.path, task = %owner, "change detected, task will rerun");
                batch.note_rerun(&owner);
            }
        }
    }

    primitive.rearm(signaled.key)
}
