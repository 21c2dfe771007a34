// src/watch/primitive.rs

use std::path::{Path, PathBuf};

use crate::errors::WatchError;

/// Opaque handle for one registered directory.
pub type WatchKeyId = usize;

/// Event kind as reported by the OS, reduced to what the dispatcher cares
/// about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawEventKind {
    Created,
    Modified,
    Removed,
    Other,
}

/// One raw filesystem event, with the absolute path it refers to.
#[derive(Debug, Clone)]
pub struct RawEvent {
    pub path: PathBuf,
    pub kind: RawEventKind,
}

/// A watch key that became ready, with its pending events drained in
/// delivery order.
#[derive(Debug)]
pub struct SignaledKey {
    pub key: WatchKeyId,
    /// The registered directory the key belongs to.
    pub dir: PathBuf,
    pub events: Vec<RawEvent>,
}

/// The OS watch boundary.
///
/// Semantics mirror a per-directory watch-key model:
/// - `register` adds a single directory (never recursive; the caller owns
///   the tree walk).
/// - `take` blocks until some key has pending events and drains that key's
///   queue. The key stops signaling until `rearm` is called for it.
/// - Events arriving between `take` and `rearm` are retained and re-signal
///   on `rearm`, so at most one extra poll is needed to catch them.
///
/// Registration failure is non-fatal to the caller; a `rearm` failure means
/// the directory would be permanently silenced and is therefore fatal.
#[allow(async_fn_in_trait)]
pub trait WatchPrimitive {
    fn register(&mut self, dir: &Path) -> Result<WatchKeyId, WatchError>;

    /// Block until a key is signaled; drains and returns its pending events.
    async fn take(&mut self) -> Result<SignaledKey, WatchError>;

    /// Non-blocking variant of [`take`](Self::take), used to fold several
    /// already-ready keys into one wake cycle.
    fn try_take(&mut self) -> Result<Option<SignaledKey>, WatchError>;

    /// Re-arm a key after its events have been processed.
    fn rearm(&mut self, key: WatchKeyId) -> Result<(), WatchError>;
}
