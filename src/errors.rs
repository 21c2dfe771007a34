// src/errors.rs

//! Crate-wide error types.
//!
//! Configuration problems are reported through `anyhow` with context before
//! the dispatch loop starts. Once the loop is running, watch-side failures
//! fall into the two classes below: registration failures are non-fatal (the
//! affected subtree simply stays unwatched), while a primitive failure tears
//! the loop down. Task failures are not errors at all; they are ordinary
//! [`ExecOutcome`](crate::exec::ExecOutcome) values.

use std::path::PathBuf;

use thiserror::Error;

pub use anyhow::{Error, Result};

/// Errors produced by the watch primitive and the code that drives it.
#[derive(Debug, Error)]
pub enum WatchError {
    /// A directory could not be registered with the watch primitive, e.g.
    /// because of missing permissions. The caller logs this and continues;
    /// the subtree is left unwatched.
    #[error("failed to register watch on {path:?}")]
    Registration {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    /// The underlying watch primitive became unusable, for example a key
    /// could not be re-armed or the event channel closed. Fatal to the
    /// dispatch loop.
    #[error("watch primitive failure: {0}")]
    Primitive(String),
}
