use folder_icon_core::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Mutex;

/// CLI progress reporter using indicatif progress bars.
///
/// - Convert phase: progress bar over the discovered images
/// - Fold phase: progress bar over the produced icons
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn start_bar(&self, total: usize, label: &str) {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::with_template(&format!(
                "  {{spinner:.cyan}} {} [{{bar:30.cyan/dim}}] {{pos}}/{{len}} {{msg}}",
                label
            ))
            .unwrap()
            .progress_chars("━╸─")
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.enable_steady_tick(std::time::Duration::from_millis(80));

        let mut guard = self.bar.lock().unwrap();
        if let Some(old) = guard.take() {
            old.finish_and_clear();
        }
        *guard = Some(pb);
    }

    fn advance(&self, item: &Path) {
        let guard = self.bar.lock().unwrap();
        if let Some(pb) = guard.as_ref() {
            let name = item
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_default();
            pb.set_message(name);
            pb.inc(1);
        }
    }

    fn finish_bar(&self) {
        let mut guard = self.bar.lock().unwrap();
        if let Some(pb) = guard.take() {
            pb.finish_and_clear();
        }
    }
}

impl ProgressReporter for CliReporter {
    fn on_discover_complete(&self, candidates: usize) {
        eprintln!("  \x1b[32m✓\x1b[0m Found {} image files", candidates);
    }

    fn on_convert_start(&self, total: usize) {
        self.start_bar(total, "Converting");
    }

    fn on_convert_item(&self, source: &Path, _succeeded: bool) {
        self.advance(source);
    }

    fn on_convert_complete(&self, converted: usize, failed: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Conversion complete: {} converted, {} failed in {:.2}s",
            converted, failed, duration_secs
        );
    }

    fn on_fold_start(&self, total: usize) {
        self.start_bar(total, "Folding");
    }

    fn on_fold_item(&self, folder: &Path, _succeeded: bool) {
        self.advance(folder);
    }

    fn on_fold_complete(&self, folders: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Folders ready: {} in {:.2}s",
            folders, duration_secs
        );
    }
}
