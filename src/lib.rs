// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod tasks;
pub mod watch;

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use tracing::{error, info, warn};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::exec::{ExecOutcome, ProcessExecutor, TaskExecutor};
use crate::tasks::{TaskKind, TaskRegistry};
use crate::watch::{Dispatcher, NotifyPrimitive, PathClassifier};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the task registry
/// - the process executor
/// - (in watch mode) the notify-backed dispatcher
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;
    let registry = TaskRegistry::from_config(&cfg)?;

    if args.dry_run {
        print_dry_run(&registry);
        return Ok(());
    }

    let mut executor = ProcessExecutor::from_config(&cfg.runtime);

    if args.once {
        return run_once(&registry, &mut executor).await;
    }

    // Watch-enabled tasks run once up front, so the first "Waiting for
    // changes" already reflects a built tree.
    for task in registry.watch_tasks() {
        info!(task = %task.name, "initial run");
        if let ExecOutcome::Failed(reason) = executor.execute(task).await {
            warn!(task = %task.name, reason = %reason, "initial run failed");
        }
    }

    let classifier = PathClassifier::from_config(&cfg.watch)?;
    let primitive = NotifyPrimitive::new()?;
    let mut dispatcher = Dispatcher::new(primitive, executor, registry, classifier);
    dispatcher.register_all();

    // Ctrl-C → graceful shutdown.
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {err}");
            return;
        }
        let _ = shutdown_tx.send(true);
    });

    dispatcher.run(shutdown_rx).await
}

/// `--once` mode: execute every configured task once, in declaration order,
/// regardless of its watch flag. Failures don't stop the sequence but the
/// process exits non-zero if any task failed.
async fn run_once(registry: &TaskRegistry, executor: &mut ProcessExecutor) -> Result<()> {
    let mut failed = 0usize;
    for task in registry.iter() {
        info!(task = %task.name, "running task");
        if let ExecOutcome::Failed(reason) = executor.execute(task).await {
            error!(task = %task.name, reason = %reason, "task failed");
            failed += 1;
        }
    }

    if failed > 0 {
        Err(anyhow!("{failed} task(s) failed"))
    } else {
        Ok(())
    }
}

/// Simple dry-run output: print tasks, kinds and watch roots.
fn print_dry_run(registry: &TaskRegistry) {
    println!("vigil dry-run");
    println!();
    println!("tasks ({}):", registry.len());
    for task in registry.iter() {
        println!("  - {} (watch: {})", task.name, task.watch);
        match &task.kind {
            TaskKind::Node {
                working_dir,
                script,
                arguments,
            } => {
                println!("      kind: node");
                println!("      working_dir: {}", working_dir.display());
                println!("      script: {script}");
                if !arguments.is_empty() {
                    println!("      arguments: {arguments:?}");
                }
            }
            TaskKind::Closure {
                sources,
                output_file,
                compilation_level,
                ..
            } => {
                println!("      kind: closure");
                println!("      sources: {sources:?}");
                println!("      output_file: {}", output_file.display());
                println!("      compilation_level: {}", compilation_level.as_arg());
            }
        }
        for root in task.watch_roots() {
            match &root.file {
                Some(file) => println!("      watch root: {} (file {})", root.dir.display(), file.display()),
                None => println!("      watch root: {}", root.dir.display()),
            }
        }
    }
}
