// src/watch/dispatch.rs

use anyhow::Result;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::errors::WatchError;
use crate::exec::{ExecOutcome, TaskExecutor};
use crate::tasks::{TaskName, TaskRegistry};
use crate::watch::batch::{self, BatchState};
use crate::watch::classify::PathClassifier;
use crate::watch::index::TaskPathIndex;
use crate::watch::primitive::{SignaledKey, WatchPrimitive};
use crate::watch::tree;

/// The outer control loop: Idle (blocked on the watch primitive) →
/// Draining (batch processing) → Dispatching (serial task execution) →
/// back to Idle.
///
/// One dispatcher owns the watch primitive, the path index and the executor
/// outright; all registration and lookup happen between waits on the same
/// logical loop, so no locking is needed around the index.
pub struct Dispatcher<P, E> {
    primitive: P,
    executor: E,
    registry: TaskRegistry,
    index: TaskPathIndex,
    classifier: PathClassifier,
}

impl<P: WatchPrimitive, E: TaskExecutor> Dispatcher<P, E> {
    pub fn new(
        primitive: P,
        executor: E,
        registry: TaskRegistry,
        classifier: PathClassifier,
    ) -> Self {
        Self {
            primitive,
            executor,
            registry,
            index: TaskPathIndex::new(),
            classifier,
        }
    }

    /// Initial watch-tree registration for every watch-enabled task, in
    /// declaration order. Must complete before [`run`](Self::run) so that no
    /// change is missed once the loop reports it is waiting.
    pub fn register_all(&mut self) {
        for task in self.registry.watch_tasks() {
            tree::register_task_roots(&mut self.primitive, &mut self.index, task);
        }
        info!(watched = self.index.len(), "initial watch registration complete");
    }

    /// Run until `shutdown` fires or the watch primitive fails.
    ///
    /// Task failures are logged and do not stop the loop; the failing task
    /// is simply retried on its next relevant file event.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        info!("Starting watch vigil");
        info!("Waiting for changes...");

        loop {
            let signaled = tokio::select! {
                _ = shutdown.changed() => {
                    info!("shutdown requested, stopping dispatcher");
                    return Ok(());
                }
                res = self.primitive.take() => res?,
            };

            let reruns = self.process_wake(signaled)?;
            if reruns.is_empty() {
                continue;
            }

            for name in reruns {
                self.execute_one(&name).await;
            }

            info!("Waiting for changes...");
        }
    }

    /// Drain one wake cycle: the signaled key plus any other keys that are
    /// already ready, folded into a single batch. Returns the rerun set in
    /// discovery order.
    pub fn process_wake(
        &mut self,
        first: SignaledKey,
    ) -> Result<Vec<TaskName>, WatchError> {
        let mut batch = BatchState::new();
        self.process_key(first, &mut batch)?;
        while let Some(next) = self.primitive.try_take()? {
            self.process_key(next, &mut batch)?;
        }
        Ok(batch.into_reruns())
    }

    fn process_key(
        &mut self,
        signaled: SignaledKey,
        batch: &mut BatchState,
    ) -> Result<(), WatchError> {
        batch::process_key(
            &mut self.primitive,
            &mut self.index,
            &self.registry,
            &self.classifier,
            signaled,
            batch,
        )
    }

    async fn execute_one(&mut self, name: &TaskName) {
        let Some(task) = self.registry.get(name) else {
            return;
        };
        info!(task = %name, "rerunning task");
        match self.executor.execute(task).await {
            ExecOutcome::Success => info!(task = %name, "task completed"),
            ExecOutcome::Failed(reason) => {
                warn!(task = %name, reason = %reason, "task rerun failed, watching for further changes");
            }
        }
    }
}
