// src/exec/process.rs

use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::model::RuntimeSection;
use crate::exec::executor::{ExecOutcome, TaskExecutor};
use crate::tasks::{TaskKind, TaskSpec};

/// Executes tasks as subprocesses of the configured executables.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    node: String,
    closure: String,
}

impl ProcessExecutor {
    pub fn from_config(runtime: &RuntimeSection) -> Self {
        Self {
            node: runtime.node.clone(),
            closure: runtime.closure.clone(),
        }
    }

    fn command_for(&self, task: &TaskSpec) -> Command {
        match &task.kind {
            TaskKind::Node {
                working_dir,
                script,
                arguments,
            } => {
                let mut cmd = Command::new(&self.node);
                cmd.arg(script).args(arguments).current_dir(working_dir);
                cmd
            }
            TaskKind::Closure {
                sources,
                externs,
                output_file,
                compilation_level,
            } => {
                let mut cmd = Command::new(&self.closure);
                cmd.arg("--compilation_level").arg(compilation_level.as_arg());
                for src in sources {
                    cmd.arg("--js").arg(src);
                }
                for extern_file in externs {
                    cmd.arg("--externs").arg(extern_file);
                }
                cmd.arg("--js_output_file").arg(output_file);
                cmd
            }
        }
    }
}

impl TaskExecutor for ProcessExecutor {
    async fn execute(&mut self, task: &TaskSpec) -> ExecOutcome {
        match run_process(self.command_for(task), &task.name).await {
            Ok(outcome) => outcome,
            Err(err) => ExecOutcome::Failed(format!("{err:#}")),
        }
    }
}

/// Spawn the command, stream its output through tracing, and map the exit
/// status to an outcome. Spawn/wait errors become `Err` and are folded into
/// `ExecOutcome::Failed` by the caller.
async fn run_process(mut cmd: Command, name: &str) -> Result<ExecOutcome> {
    info!(task = %name, "starting task process");

    cmd.stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning process for task '{name}'"))?;

    if let Some(stdout) = child.stdout.take() {
        let task_name = name.to_string();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                info!(task = %task_name, "{}", line);
            }
        });
    }

    // Always consume stderr so buffers don't fill; log at debug.
    if let Some(stderr) = child.stderr.take() {
        let task_name = name.to_string();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(task = %task_name, "stderr: {}", line);
            }
        });
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for process of task '{name}'"))?;

    let code = status.code().unwrap_or(-1);
    info!(
        task = %name,
        exit_code = code,
        success = status.success(),
        "task process exited"
    );

    if status.success() {
        Ok(ExecOutcome::Success)
    } else {
        Ok(ExecOutcome::Failed(format!("exit code {code}")))
    }
}
