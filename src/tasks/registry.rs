// src/tasks/registry.rs

use std::collections::HashMap;

use anyhow::Result;

use crate::config::model::ConfigFile;
use crate::tasks::spec::TaskSpec;

/// Ordered, immutable list of task descriptors.
///
/// Built once from config before the dispatcher starts; never mutated during
/// a run. Order is the declaration order in the config file.
#[derive(Debug)]
pub struct TaskRegistry {
    tasks: Vec<TaskSpec>,
    by_name: HashMap<String, usize>,
}

impl TaskRegistry {
    pub fn from_config(cfg: &ConfigFile) -> Result<Self> {
        let tasks = cfg
            .task
            .iter()
            .map(TaskSpec::from_config)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(tasks))
    }

    pub fn new(tasks: Vec<TaskSpec>) -> Self {
        let by_name = tasks
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name.clone(), i))
            .collect();
        Self { tasks, by_name }
    }

    pub fn get(&self, name: &str) -> Option<&TaskSpec> {
        self.by_name.get(name).map(|&i| &self.tasks[i])
    }

    /// All tasks in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &TaskSpec> {
        self.tasks.iter()
    }

    /// Tasks participating in watch mode, in declaration order.
    pub fn watch_tasks(&self) -> impl Iterator<Item = &TaskSpec> {
        self.tasks.iter().filter(|t| t.watch)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
