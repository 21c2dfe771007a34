// tests/common/mod.rs

//! Shared test doubles: a scripted watch primitive and a recording executor.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use vigil::errors::WatchError;
use vigil::exec::{ExecOutcome, TaskExecutor};
use vigil::tasks::{CompilationLevel, TaskKind, TaskSpec};
use vigil::watch::{RawEvent, RawEventKind, SignaledKey, WatchKeyId, WatchPrimitive};

/// One wake cycle: the first entry is handed out by `take()`, the rest by
/// `try_take()`.
type Wake = VecDeque<(PathBuf, Vec<RawEvent>)>;

#[derive(Default)]
struct ScriptedState {
    registered: Vec<PathBuf>,
    keys: HashMap<PathBuf, WatchKeyId>,
    wakes: VecDeque<Wake>,
    current: Wake,
    rearmed: Vec<WatchKeyId>,
    block_when_exhausted: bool,
    fail_rearm: bool,
}

enum TakeStep {
    Ready(SignaledKey),
    Exhausted,
    Block,
}

/// In-memory [`WatchPrimitive`] driven by a script of wake cycles.
///
/// Clones share state, so a test can keep a handle for scripting and
/// inspection while the dispatcher owns another.
#[derive(Clone)]
pub struct ScriptedPrimitive {
    state: Arc<Mutex<ScriptedState>>,
}

impl ScriptedPrimitive {
    /// When the script runs out, `take()` fails with a primitive error so
    /// `Dispatcher::run` terminates and the test can inspect recordings.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ScriptedState::default())),
        }
    }

    /// When the script runs out, `take()` blocks forever; used to exercise
    /// shutdown while idle.
    pub fn blocking_when_exhausted() -> Self {
        let this = Self::new();
        this.state.lock().unwrap().block_when_exhausted = true;
        this
    }

    /// Every `rearm()` fails, simulating a watch handle gone bad.
    pub fn failing_rearm() -> Self {
        let this = Self::new();
        this.state.lock().unwrap().fail_rearm = true;
        this
    }

    /// Queue one wake cycle. Each entry names a previously registered
    /// directory and the raw events drained from its key.
    pub fn push_wake(&self, entries: Vec<(PathBuf, Vec<RawEvent>)>) {
        self.state
            .lock()
            .unwrap()
            .wakes
            .push_back(entries.into_iter().collect());
    }

    pub fn registered(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().registered.clone()
    }

    pub fn is_registered(&self, dir: &Path) -> bool {
        self.state.lock().unwrap().keys.contains_key(dir)
    }

    pub fn rearm_count(&self) -> usize {
        self.state.lock().unwrap().rearmed.len()
    }

    fn signaled_for(state: &ScriptedState, dir: PathBuf, events: Vec<RawEvent>) -> SignaledKey {
        let key = *state
            .keys
            .get(&dir)
            .unwrap_or_else(|| panic!("scripted wake for unregistered dir {dir:?}"));
        SignaledKey { key, dir, events }
    }
}

impl WatchPrimitive for ScriptedPrimitive {
    fn register(&mut self, dir: &Path) -> Result<WatchKeyId, WatchError> {
        let mut state = self.state.lock().unwrap();
        if let Some(&key) = state.keys.get(dir) {
            return Ok(key);
        }
        let key = state.keys.len();
        state.keys.insert(dir.to_path_buf(), key);
        state.registered.push(dir.to_path_buf());
        Ok(key)
    }

    async fn take(&mut self) -> Result<SignaledKey, WatchError> {
        let step = {
            let mut state = self.state.lock().unwrap();
            match state.wakes.pop_front() {
                Some(mut wake) => match wake.pop_front() {
                    Some((dir, events)) => {
                        let signaled = Self::signaled_for(&state, dir, events);
                        state.current = wake;
                        TakeStep::Ready(signaled)
                    }
                    None => TakeStep::Exhausted,
                },
                None if state.block_when_exhausted => TakeStep::Block,
                None => TakeStep::Exhausted,
            }
        };

        match step {
            TakeStep::Ready(signaled) => Ok(signaled),
            TakeStep::Exhausted => {
                Err(WatchError::Primitive("script exhausted".to_string()))
            }
            TakeStep::Block => std::future::pending().await,
        }
    }

    fn try_take(&mut self) -> Result<Option<SignaledKey>, WatchError> {
        let mut state = self.state.lock().unwrap();
        match state.current.pop_front() {
            Some((dir, events)) => {
                let signaled = Self::signaled_for(&state, dir, events);
                Ok(Some(signaled))
            }
            None => Ok(None),
        }
    }

    fn rearm(&mut self, key: WatchKeyId) -> Result<(), WatchError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_rearm {
            return Err(WatchError::Primitive(format!(
                "re-arm failed for watch key {key}"
            )));
        }
        state.rearmed.push(key);
        Ok(())
    }
}

/// [`TaskExecutor`] double that records execution order and replays scripted
/// outcomes (defaulting to success once the script is spent).
#[derive(Clone, Default)]
pub struct RecordingExecutor {
    executed: Arc<Mutex<Vec<String>>>,
    outcomes: Arc<Mutex<VecDeque<ExecOutcome>>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outcomes(outcomes: Vec<ExecOutcome>) -> Self {
        Self {
            executed: Arc::default(),
            outcomes: Arc::new(Mutex::new(outcomes.into_iter().collect())),
        }
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }
}

impl TaskExecutor for RecordingExecutor {
    async fn execute(&mut self, task: &TaskSpec) -> ExecOutcome {
        self.executed.lock().unwrap().push(task.name.clone());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ExecOutcome::Success)
    }
}

pub fn ev(path: impl Into<PathBuf>, kind: RawEventKind) -> RawEvent {
    RawEvent {
        path: path.into(),
        kind,
    }
}

pub fn node_task(name: &str, working_dir: impl Into<PathBuf>) -> TaskSpec {
    TaskSpec {
        name: name.to_string(),
        watch: true,
        kind: TaskKind::Node {
            working_dir: working_dir.into(),
            script: "build.js".to_string(),
            arguments: Vec::new(),
        },
    }
}

pub fn closure_task(name: &str, sources: Vec<PathBuf>, output_file: impl Into<PathBuf>) -> TaskSpec {
    TaskSpec {
        name: name.to_string(),
        watch: true,
        kind: TaskKind::Closure {
            sources,
            externs: Vec::new(),
            output_file: output_file.into(),
            compilation_level: CompilationLevel::SimpleOptimizations,
        },
    }
}
