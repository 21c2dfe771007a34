// src/tasks/spec.rs

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

use crate::config::model::{TaskConfig, TaskKindConfig};

/// Public type alias for task names throughout the crate.
pub type TaskName = String;

/// A configured unit of work.
///
/// Immutable once configuration loading completes; owned by the
/// [`TaskRegistry`](crate::tasks::TaskRegistry) and only borrowed elsewhere.
#[derive(Debug, Clone)]
pub struct TaskSpec {
    pub name: TaskName,
    /// Whether this task participates in watch mode.
    pub watch: bool,
    pub kind: TaskKind,
}

/// Kind-specific task data.
#[derive(Debug, Clone)]
pub enum TaskKind {
    /// Run a Node.js script in `working_dir`.
    Node {
        working_dir: PathBuf,
        script: String,
        arguments: Vec<String>,
    },
    /// Minify `sources` into `output_file` with the Closure Compiler.
    Closure {
        sources: Vec<PathBuf>,
        externs: Vec<PathBuf>,
        output_file: PathBuf,
        compilation_level: CompilationLevel,
    },
}

/// Closure Compiler optimisation level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilationLevel {
    WhitespaceOnly,
    SimpleOptimizations,
    AdvancedOptimizations,
}

impl CompilationLevel {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "WHITESPACE_ONLY" => Some(Self::WhitespaceOnly),
            "SIMPLE_OPTIMIZATIONS" => Some(Self::SimpleOptimizations),
            "ADVANCED_OPTIMIZATIONS" => Some(Self::AdvancedOptimizations),
            _ => None,
        }
    }

    /// Spelling expected by the compiler's `--compilation_level` flag.
    pub fn as_arg(&self) -> &'static str {
        match self {
            Self::WhitespaceOnly => "WHITESPACE_ONLY",
            Self::SimpleOptimizations => "SIMPLE_OPTIMIZATIONS",
            Self::AdvancedOptimizations => "ADVANCED_OPTIMIZATIONS",
        }
    }
}

/// One declared watch boundary of a task.
///
/// `dir` is always a directory to walk and register. For single-file
/// sources, `file` carries the exact path so it can be indexed directly in
/// addition to its parent directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchRoot {
    pub dir: PathBuf,
    pub file: Option<PathBuf>,
}

impl TaskSpec {
    /// Build a `TaskSpec` from its raw config entry.
    pub fn from_config(cfg: &TaskConfig) -> Result<Self> {
        let kind = match &cfg.kind {
            TaskKindConfig::Node {
                working_dir,
                script,
                arguments,
            } => TaskKind::Node {
                working_dir: working_dir.clone(),
                script: script.clone(),
                arguments: arguments.clone(),
            },
            TaskKindConfig::Closure {
                sources,
                externs,
                output_file,
                compilation_level,
            } => TaskKind::Closure {
                sources: sources.clone(),
                externs: externs.clone(),
                output_file: output_file.clone(),
                compilation_level: CompilationLevel::parse(compilation_level)
                    .ok_or_else(|| {
                        anyhow!(
                            "task '{}': unknown compilation_level '{}'",
                            cfg.name,
                            compilation_level
                        )
                    })?,
            },
        };

        Ok(Self {
            name: cfg.name.clone(),
            watch: cfg.watch,
            kind,
        })
    }

    /// The watch boundaries declared by this task.
    ///
    /// Node tasks watch their working directory. Closure tasks watch each
    /// source: directories directly, files via their parent directory plus
    /// an exact-path binding.
    pub fn watch_roots(&self) -> Vec<WatchRoot> {
        match &self.kind {
            TaskKind::Node { working_dir, .. } => vec![WatchRoot {
                dir: working_dir.clone(),
                file: None,
            }],
            TaskKind::Closure { sources, .. } => sources
                .iter()
                .map(|src| {
                    if src.is_dir() {
                        WatchRoot {
                            dir: src.clone(),
                            file: None,
                        }
                    } else {
                        WatchRoot {
                            dir: parent_or_cwd(src),
                            file: Some(src.clone()),
                        }
                    }
                })
                .collect(),
        }
    }

    /// Kind-specific rerun filter, applied after path ownership has been
    /// resolved: a changed file the task cannot consume does not rerun it.
    /// Closure tasks only compile `.js`; node tasks take any change.
    pub fn wants_rerun_for(&self, path: &Path) -> bool {
        match &self.kind {
            TaskKind::Node { .. } => true,
            TaskKind::Closure { .. } => {
                path.extension().and_then(|e| e.to_str()) == Some("js")
            }
        }
    }
}

fn parent_or_cwd(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
