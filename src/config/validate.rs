// src/config/validate.rs

use std::collections::HashSet;

use anyhow::{anyhow, Context, Result};
use globset::Glob;

use crate::config::model::{ConfigFile, TaskKindConfig};
use crate::tasks::CompilationLevel;

/// Run semantic validation against a loaded configuration.
///
/// Everything rejected here is fatal and reported before the dispatch loop
/// starts. This checks:
/// - there is at least one task
/// - task names are non-empty and unique
/// - node tasks have a non-empty script
/// - closure tasks have at least one source, an output file, and a known
///   compilation level
/// - `[watch].ignore` globs compile
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    ensure_has_tasks(cfg)?;
    validate_task_names(cfg)?;
    validate_task_kinds(cfg)?;
    validate_ignore_globs(cfg)?;
    Ok(())
}

fn ensure_has_tasks(cfg: &ConfigFile) -> Result<()> {
    if cfg.task.is_empty() {
        return Err(anyhow!("config must contain at least one [[task]] entry"));
    }
    Ok(())
}

fn validate_task_names(cfg: &ConfigFile) -> Result<()> {
    let mut seen = HashSet::new();
    for task in cfg.task.iter() {
        if task.name.trim().is_empty() {
            return Err(anyhow!("task with empty name in config"));
        }
        if !seen.insert(task.name.as_str()) {
            return Err(anyhow!("duplicate task name '{}'", task.name));
        }
    }
    Ok(())
}

fn validate_task_kinds(cfg: &ConfigFile) -> Result<()> {
    for task in cfg.task.iter() {
        match &task.kind {
            TaskKindConfig::Node { script, .. } => {
                if script.trim().is_empty() {
                    return Err(anyhow!(
                        "node task '{}' must set a non-empty `script`",
                        task.name
                    ));
                }
            }
            TaskKindConfig::Closure {
                sources,
                output_file,
                compilation_level,
                ..
            } => {
                if sources.is_empty() {
                    return Err(anyhow!(
                        "closure task '{}' must list at least one entry in `sources`",
                        task.name
                    ));
                }
                if output_file.as_os_str().is_empty() {
                    return Err(anyhow!(
                        "closure task '{}' must set `output_file`",
                        task.name
                    ));
                }
                if CompilationLevel::parse(compilation_level).is_none() {
                    return Err(anyhow!(
                        "closure task '{}' has unknown compilation_level '{}' \
                         (expected WHITESPACE_ONLY, SIMPLE_OPTIMIZATIONS or \
                         ADVANCED_OPTIMIZATIONS)",
                        task.name,
                        compilation_level
                    ));
                }
            }
        }
    }
    Ok(())
}

fn validate_ignore_globs(cfg: &ConfigFile) -> Result<()> {
    for pat in cfg.watch.ignore.iter() {
        Glob::new(pat)
            .with_context(|| format!("invalid [watch].ignore glob: {pat}"))?;
    }
    Ok(())
}
