// src/watch/backend.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::warn;

use crate::errors::WatchError;
use crate::watch::primitive::{
    RawEvent, RawEventKind, SignaledKey, WatchKeyId, WatchPrimitive,
};

/// Per-key pending-event queue.
///
/// `armed` is cleared when the key is taken and restored by `rearm`;
/// `signaled` tracks whether the key id is currently sitting in the ready
/// channel, so a burst of events signals at most once.
#[derive(Debug)]
struct KeyState {
    dir: PathBuf,
    queue: Vec<RawEvent>,
    armed: bool,
    signaled: bool,
}

#[derive(Debug, Default)]
struct Shared {
    by_dir: HashMap<PathBuf, WatchKeyId>,
    keys: Vec<KeyState>,
}

/// `notify`-backed implementation of [`WatchPrimitive`].
///
/// Every directory is registered with `RecursiveMode::NonRecursive`; the
/// recursive behaviour lives in the watch tree walk, not here. The notify
/// callback runs on notify's own thread and attributes each event to the
/// key of the path's parent directory, then signals readiness over an
/// unbounded channel into the dispatch loop.
pub struct NotifyPrimitive {
    watcher: RecommendedWatcher,
    shared: Arc<Mutex<Shared>>,
    ready_tx: mpsc::UnboundedSender<WatchKeyId>,
    ready_rx: mpsc::UnboundedReceiver<WatchKeyId>,
}

impl NotifyPrimitive {
    pub fn new() -> Result<Self, WatchError> {
        let (ready_tx, ready_rx) = mpsc::unbounded_channel();
        let shared: Arc<Mutex<Shared>> = Arc::default();

        let cb_shared = Arc::clone(&shared);
        let cb_tx = ready_tx.clone();
        let watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => handle_event(&cb_shared, &cb_tx, event),
                Err(err) => warn!(error = %err, "file watch error"),
            },
            Config::default(),
        )
        .map_err(|e| WatchError::Primitive(e.to_string()))?;

        Ok(Self {
            watcher,
            shared,
            ready_tx,
            ready_rx,
        })
    }

    fn drain(&mut self, key: WatchKeyId) -> Option<SignaledKey> {
        let mut shared = self.shared.lock().unwrap();
        let state = shared.keys.get_mut(key)?;
        state.signaled = false;
        if state.queue.is_empty() {
            // Spurious wakeup; the key stays armed.
            return None;
        }
        state.armed = false;
        let events = std::mem::take(&mut state.queue);
        Some(SignaledKey {
            key,
            dir: state.dir.clone(),
            events,
        })
    }
}

impl WatchPrimitive for NotifyPrimitive {
    fn register(&mut self, dir: &Path) -> Result<WatchKeyId, WatchError> {
        {
            let shared = self.shared.lock().unwrap();
            if let Some(&key) = shared.by_dir.get(dir) {
                return Ok(key);
            }
        }

        self.watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .map_err(|source| WatchError::Registration {
                path: dir.to_path_buf(),
                source,
            })?;

        let mut shared = self.shared.lock().unwrap();
        let key = shared.keys.len();
        shared.keys.push(KeyState {
            dir: dir.to_path_buf(),
            queue: Vec::new(),
            armed: true,
            signaled: false,
        });
        shared.by_dir.insert(dir.to_path_buf(), key);
        Ok(key)
    }

    async fn take(&mut self) -> Result<SignaledKey, WatchError> {
        loop {
            let key = self.ready_rx.recv().await.ok_or_else(|| {
                WatchError::Primitive("watch event channel closed".to_string())
            })?;
            if let Some(signaled) = self.drain(key) {
                return Ok(signaled);
            }
        }
    }

    fn try_take(&mut self) -> Result<Option<SignaledKey>, WatchError> {
        loop {
            match self.ready_rx.try_recv() {
                Ok(key) => {
                    if let Some(signaled) = self.drain(key) {
                        return Ok(Some(signaled));
                    }
                }
                Err(mpsc::error::TryRecvError::Empty) => return Ok(None),
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    return Err(WatchError::Primitive(
                        "watch event channel closed".to_string(),
                    ));
                }
            }
        }
    }

    fn rearm(&mut self, key: WatchKeyId) -> Result<(), WatchError> {
        let mut shared = self.shared.lock().unwrap();
        let state = shared.keys.get_mut(key).ok_or_else(|| {
            WatchError::Primitive(format!("rearm of unknown watch key {key}"))
        })?;
        state.armed = true;
        // Events that arrived while the key was being processed re-signal now.
        if !state.queue.is_empty() && !state.signaled {
            state.signaled = true;
            self.ready_tx.send(key).map_err(|_| {
                WatchError::Primitive("watch ready channel closed".to_string())
            })?;
        }
        Ok(())
    }
}

fn handle_event(
    shared: &Arc<Mutex<Shared>>,
    ready_tx: &mpsc::UnboundedSender<WatchKeyId>,
    event: Event,
) {
    let kind = map_kind(&event.kind);
    let mut shared = shared.lock().unwrap();
    for path in event.paths {
        // The owning key is the registered parent directory; events on
        // unregistered paths are dropped.
        let Some(&key) = path.parent().and_then(|p| shared.by_dir.get(p)) else {
            continue;
        };
        let state = &mut shared.keys[key];
        state.queue.push(RawEvent { path, kind });
        if state.armed && !state.signaled {
            state.signaled = true;
            let _ = ready_tx.send(key);
        }
    }
}

fn map_kind(kind: &EventKind) -> RawEventKind {
    match kind {
        EventKind::Create(_) => RawEventKind::Created,
        EventKind::Modify(_) => RawEventKind::Modified,
        EventKind::Remove(_) => RawEventKind::Removed,
        _ => RawEventKind::Other,
    }
}
