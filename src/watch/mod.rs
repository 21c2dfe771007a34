// src/watch/mod.rs

//! The filesystem change-driven dispatcher core.
//!
//! This module turns a stream of low-level filesystem events into task
//! reruns:
//! - `classify` decides whether a changed path is noise, a new directory,
//!   or a real file change.
//! - `index` maps watched paths to their owning task.
//! - `primitive` defines the watch-key model (register / take / re-arm);
//!   `backend` implements it on top of `notify` with one non-recursive
//!   registration per directory.
//! - `tree` walks task roots and keeps the watch set consistent as new
//!   directories appear.
//! - `batch` drains and de-duplicates one wake cycle's events.
//! - `dispatch` is the outer Idle → Draining → Dispatching loop.
//!
//! It does **not** know how tasks are executed; it only resolves changes to
//! tasks and hands them to a [`TaskExecutor`](crate::exec::TaskExecutor).

pub mod backend;
pub mod batch;
pub mod classify;
pub mod dispatch;
pub mod index;
pub mod primitive;
pub mod tree;

pub use backend::NotifyPrimitive;
pub use batch::BatchState;
pub use classify::{Classification, PathClassifier};
pub use dispatch::Dispatcher;
pub use index::TaskPathIndex;
pub use primitive::{RawEvent, RawEventKind, SignaledKey, WatchKeyId, WatchPrimitive};
