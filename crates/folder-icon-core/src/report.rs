use crate::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::error;

/// Pipeline step an item failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Convert,
    Purge,
    Fold,
    Marker,
    Attribute,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Convert => "convert",
            Stage::Purge => "purge",
            Stage::Fold => "fold",
            Stage::Marker => "marker",
            Stage::Attribute => "attribute",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub struct ItemFailure {
    pub path: PathBuf,
    pub stage: Stage,
    pub error: Error,
}

/// Summary of one run over a directory.
#[derive(Debug, Default)]
pub struct Report {
    pub directory: PathBuf,
    pub candidates: usize,
    /// Source images turned into icon containers.
    pub converted: Vec<PathBuf>,
    /// Subset of `converted` that went through the single-resolution fallback.
    pub degraded: Vec<PathBuf>,
    /// Candidates that were already icons.
    pub existing_icons: Vec<PathBuf>,
    pub purged: Vec<PathBuf>,
    pub folders: Vec<PathBuf>,
    pub failures: Vec<ItemFailure>,
    pub convert_duration: Duration,
    pub fold_duration: Duration,
}

impl Report {
    pub fn new(directory: &Path) -> Self {
        Self {
            directory: directory.to_path_buf(),
            ..Default::default()
        }
    }

    pub(crate) fn record(&mut self, path: &Path, stage: Stage, err: Error) {
        error!("[{}] {}: {}", stage, path.display(), err);
        self.failures.push(ItemFailure {
            path: path.to_path_buf(),
            stage,
            error: err,
        });
    }

    pub fn failures_in(&self, stage: Stage) -> impl Iterator<Item = &ItemFailure> {
        self.failures.iter().filter(move |f| f.stage == stage)
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// True when nothing was found to do.
    pub fn is_noop(&self) -> bool {
        self.candidates == 0 && self.failures.is_empty()
    }
}
