// src/exec/executor.rs

use crate::tasks::TaskSpec;

/// Result of one task execution.
///
/// Failure carries a human-readable reason (exit code, spawn error); it is
/// a normal outcome, not an error type, because a failed task never stops
/// the dispatch loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecOutcome {
    Success,
    Failed(String),
}

/// The executor seam between the dispatcher and however tasks actually run.
///
/// Executions for one dispatcher are serialized: the dispatch loop awaits
/// each call before starting the next, so implementations never see two
/// concurrent executions of the same task.
#[allow(async_fn_in_trait)]
pub trait TaskExecutor {
    async fn execute(&mut self, task: &TaskSpec) -> ExecOutcome;
}
