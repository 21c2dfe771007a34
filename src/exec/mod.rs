// src/exec/mod.rs

//! Task execution layer.
//!
//! The dispatcher only knows the [`TaskExecutor`] seam; the real
//! implementation ([`ProcessExecutor`]) spawns the configured Node.js or
//! Closure Compiler executables with `tokio::process::Command`. Executors
//! must be safe to call repeatedly for the same task and must not touch the
//! watch tree.

pub mod executor;
pub mod process;

pub use executor::{ExecOutcome, TaskExecutor};
pub use process::ProcessExecutor;
