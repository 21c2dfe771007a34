// src/watch/classify.rs

use std::path::Path;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::config::model::WatchSection;
use crate::watch::primitive::RawEventKind;

/// What the dispatcher should do with one raw event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Noise, or something the dispatcher does not react to (deletions).
    Ignore,
    /// A new directory under a watched tree; extend the watch set, no rerun.
    DirectoryCreated,
    /// A regular file was created or modified; a rerun candidate.
    FileChanged,
}

/// Temp-file markers left behind by JetBrains editors during safe writes.
const EDITOR_ARTIFACT_SUFFIXES: &[&str] = &["___jb_bak___", "___jb_old___"];

/// Pure noise filter over changed paths.
///
/// Deterministic and side-effect free; safe to call with paths that no
/// longer exist (a failed stat classifies as `Ignore`, never an error).
#[derive(Debug)]
pub struct PathClassifier {
    ignore_hidden: bool,
    ignore_globs: Option<GlobSet>,
}

impl PathClassifier {
    pub fn from_config(watch: &WatchSection) -> Result<Self> {
        let ignore_globs = if watch.ignore.is_empty() {
            None
        } else {
            let mut builder = GlobSetBuilder::new();
            for pat in watch.ignore.iter() {
                let glob = Glob::new(pat)
                    .with_context(|| format!("invalid ignore glob: {pat}"))?;
                builder.add(glob);
            }
            Some(builder.build()?)
        };

        Ok(Self {
            ignore_hidden: watch.ignore_hidden,
            ignore_globs,
        })
    }

    /// Classify one event. Rules are applied in order:
    ///
    /// 1. editor temp-file markers → `Ignore`
    /// 2. dotfiles (when `ignore_hidden`) → `Ignore`
    /// 3. trailing `~` backups → `Ignore`
    /// 4. configured ignore globs (matched against the file name) → `Ignore`
    /// 5. existing directory + created → `DirectoryCreated`
    /// 6. regular file + created/modified → `FileChanged`
    /// 7. anything else (deletions included) → `Ignore`
    pub fn classify(&self, path: &Path, kind: RawEventKind) -> Classification {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return Classification::Ignore;
        };

        if EDITOR_ARTIFACT_SUFFIXES.iter().any(|s| name.ends_with(s)) {
            return Classification::Ignore;
        }
        if self.ignore_hidden && name.starts_with('.') {
            return Classification::Ignore;
        }
        if name.ends_with('~') {
            return Classification::Ignore;
        }
        if let Some(globs) = &self.ignore_globs {
            if globs.is_match(name) {
                return Classification::Ignore;
            }
        }

        // `is_dir`/`is_file` treat a failed stat as false, which is exactly
        // the tolerance we need for paths deleted before we got here.
        if path.is_dir() {
            return if kind == RawEventKind::Created {
                Classification::DirectoryCreated
            } else {
                Classification::Ignore
            };
        }

        if matches!(kind, RawEventKind::Created | RawEventKind::Modified)
            && path.is_file()
        {
            return Classification::FileChanged;
        }

        Classification::Ignore
    }
}

impl Default for PathClassifier {
    fn default() -> Self {
        Self {
            ignore_hidden: true,
            ignore_globs: None,
        }
    }
}
