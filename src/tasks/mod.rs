// src/tasks/mod.rs

//! Task model and registry.
//!
//! Tasks come in explicit kinds (`Node`, `Closure`) rather than behind a
//! trait object: the batch processor and executor both match on the kind,
//! so the variants carry all kind-specific data (scripts, sources, filters).

pub mod registry;
pub mod spec;

pub use registry::TaskRegistry;
pub use spec::{CompilationLevel, TaskKind, TaskName, TaskSpec, WatchRoot};
