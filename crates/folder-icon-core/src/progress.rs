use std::path::Path;

/// Trait for reporting pipeline progress.
///
/// The CLI implements it with indicatif bars; the core only emits events.
/// All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_discover_complete(&self, _candidates: usize) {}
    fn on_convert_start(&self, _total: usize) {}
    fn on_convert_item(&self, _source: &Path, _succeeded: bool) {}
    fn on_convert_complete(&self, _converted: usize, _failed: usize, _duration_secs: f64) {}
    fn on_purge_item(&self, _path: &Path) {}
    fn on_fold_start(&self, _total: usize) {}
    fn on_fold_item(&self, _folder: &Path, _succeeded: bool) {}
    fn on_fold_complete(&self, _folders: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
