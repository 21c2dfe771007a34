// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [watch]
/// ignore_hidden = true
/// ignore = ["*.tmp"]
///
/// [runtime]
/// node = "node"
///
/// [[task]]
/// name = "bundle"
/// kind = "node"
/// working_dir = "web"
/// script = "build.js"
/// ```
///
/// All sections except `[[task]]` are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConfigFile {
    /// Noise filtering knobs from `[watch]`.
    #[serde(default)]
    pub watch: WatchSection,

    /// Executable locations from `[runtime]`.
    #[serde(default)]
    pub runtime: RuntimeSection,

    /// All tasks from `[[task]]`, in declaration order.
    ///
    /// Order matters: tasks run in this order in `--once` mode, and when two
    /// tasks declare overlapping watch roots the later one owns the overlap.
    #[serde(default)]
    pub task: Vec<TaskConfig>,
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Ignore files whose name starts with a dot. Defaults to true.
    #[serde(default = "default_ignore_hidden")]
    pub ignore_hidden: bool,

    /// Extra glob patterns matched against file *names* (not full paths);
    /// a match means the change is ignored.
    #[serde(default)]
    pub ignore: Vec<String>,
}

fn default_ignore_hidden() -> bool {
    true
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            ignore_hidden: default_ignore_hidden(),
            ignore: Vec::new(),
        }
    }
}

/// `[runtime]` section.
///
/// Provisioning these executables (downloading a Node.js distribution, etc.)
/// is outside vigil's scope; it only needs to know what to invoke.
#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeSection {
    /// Node.js executable used for `kind = "node"` tasks.
    #[serde(default = "default_node")]
    pub node: String,

    /// Closure Compiler command used for `kind = "closure"` tasks.
    #[serde(default = "default_closure")]
    pub closure: String,
}

fn default_node() -> String {
    "node".to_string()
}

fn default_closure() -> String {
    "closure-compiler".to_string()
}

impl Default for RuntimeSection {
    fn default() -> Self {
        Self {
            node: default_node(),
            closure: default_closure(),
        }
    }
}

/// One `[[task]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    /// Task name; must be unique across the file.
    pub name: String,

    /// Whether this task participates in watch mode. Defaults to true.
    /// `--once` mode runs every task regardless of this flag.
    #[serde(default = "default_watch_flag")]
    pub watch: bool,

    /// Kind-specific fields, discriminated by the `kind` key.
    #[serde(flatten)]
    pub kind: TaskKindConfig,
}

fn default_watch_flag() -> bool {
    true
}

/// Kind-specific task configuration.
///
/// ```toml
/// [[task]]
/// name = "minify"
/// kind = "closure"
/// sources = ["web/dist/app.js"]
/// output_file = "web/dist/app.min.js"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskKindConfig {
    /// Run a Node.js script; the working directory is also the watch root.
    Node {
        working_dir: PathBuf,
        script: String,
        #[serde(default)]
        arguments: Vec<String>,
    },

    /// Minify JavaScript sources with the Closure Compiler.
    ///
    /// `sources` entries may be files or directories; both become watch
    /// roots. Only `.js` changes rerun this task.
    Closure {
        sources: Vec<PathBuf>,
        #[serde(default)]
        externs: Vec<PathBuf>,
        output_file: PathBuf,
        #[serde(default = "default_compilation_level")]
        compilation_level: String,
    },
}

fn default_compilation_level() -> String {
    "SIMPLE_OPTIMIZATIONS".to_string()
}
