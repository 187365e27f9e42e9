use crate::config::AppConfig;
use crate::error::Error;
use crate::icon;
use crate::marker;
use crate::platform::{AttributeSetter, NativeAttributes};
use crate::progress::ProgressReporter;
use crate::report::{Report, Stage};
use crate::scanner::{self, CandidateKind, ImageCandidate};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

pub struct FolderIconEngine {
    config: AppConfig,
    attributes: Box<dyn AttributeSetter>,
}

/// An icon container sitting at the directory root, waiting to be folded.
#[derive(Debug)]
struct Artifact {
    path: PathBuf,
    source: PathBuf,
    base_name: String,
    file_name: String,
}

impl Artifact {
    fn new(path: PathBuf, candidate: &ImageCandidate) -> Self {
        let file_name = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            source: candidate.path.clone(),
            base_name: candidate.base_name.clone(),
            file_name,
        }
    }
}

impl FolderIconEngine {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            attributes: Box::new(NativeAttributes),
        }
    }

    pub fn with_attributes(mut self, attributes: impl AttributeSetter + 'static) -> Self {
        self.attributes = Box::new(attributes);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run the full pipeline on `directory`:
    /// 1. Discover image candidates at the top level
    /// 2. Convert every raster candidate to `<name>.ico`
    /// 3. Delete the sources that converted successfully
    /// 4. Move each icon into a `<name>/` folder and write its marker
    ///
    /// Only a missing directory (or an unreadable listing) aborts the run;
    /// every other problem is recorded in the returned [`Report`].
    pub fn process(
        &self,
        directory: &Path,
        reporter: &dyn ProgressReporter,
    ) -> Result<Report, Error> {
        // Phase 0: Validate
        if !directory.is_dir() {
            return Err(Error::DirectoryNotFound(directory.to_path_buf()));
        }
        info!("Processing directory: {}", directory.display());
        let mut report = Report::new(directory);

        // Phase 1: Discover
        let candidates =
            scanner::discover_candidates(directory).map_err(|e| Error::io(directory, e))?;
        report.candidates = candidates.len();
        reporter.on_discover_complete(candidates.len());
        if candidates.is_empty() {
            info!("No image files found in {}", directory.display());
            return Ok(report);
        }
        info!("Found {} image files", candidates.len());

        // Phase 2: Convert
        let convert_start = Instant::now();
        let artifacts = self.convert_all(directory, &candidates, &mut report, reporter);
        report.convert_duration = convert_start.elapsed();
        reporter.on_convert_complete(
            report.converted.len(),
            report.failures_in(Stage::Convert).count(),
            report.convert_duration.as_secs_f64(),
        );

        // Phase 3: Purge originals
        if self.config.keep_originals {
            info!("Keeping original images");
        } else {
            self.purge_converted(&mut report, reporter);
        }

        // Phase 4: Fold into folders
        let fold_start = Instant::now();
        self.fold_all(directory, &artifacts, &mut report, reporter);
        report.fold_duration = fold_start.elapsed();
        reporter.on_fold_complete(report.folders.len(), report.fold_duration.as_secs_f64());

        Ok(report)
    }

    fn convert_all(
        &self,
        directory: &Path,
        candidates: &[ImageCandidate],
        report: &mut Report,
        reporter: &dyn ProgressReporter,
    ) -> Vec<Artifact> {
        info!("Converting images to .ico...");
        reporter.on_convert_start(candidates.len());
        let mut artifacts: Vec<Artifact> = Vec::new();

        for candidate in candidates {
            if let Some(existing) = artifacts
                .iter()
                .find(|a| same_base_name(&a.base_name, &candidate.base_name))
            {
                let err = Error::NameConflict {
                    path: candidate.path.clone(),
                    existing: existing.source.clone(),
                };
                report.record(&candidate.path, Stage::Convert, err);
                reporter.on_convert_item(&candidate.path, false);
                continue;
            }

            if candidate.kind == CandidateKind::Icon {
                debug!("Already .ico format: {}", candidate.path.display());
                report.existing_icons.push(candidate.path.clone());
                artifacts.push(Artifact::new(candidate.path.clone(), candidate));
                reporter.on_convert_item(&candidate.path, true);
                continue;
            }

            let target = directory.join(format!(
                "{}.{}",
                candidate.base_name,
                scanner::candidates::ICON_EXTENSION
            ));
            let result = icon::synthesize(&candidate.path).and_then(|container| {
                container
                    .write_to(&target)
                    .map_err(|e| Error::io(&target, e))?;
                Ok(container)
            });

            match result {
                Ok(container) => {
                    info!(
                        "Converted {} -> {} ({} sizes)",
                        candidate.file_name(),
                        target.display(),
                        container.variants().len()
                    );
                    if container.is_degraded() {
                        report.degraded.push(candidate.path.clone());
                    }
                    report.converted.push(candidate.path.clone());
                    artifacts.push(Artifact::new(target, candidate));
                    reporter.on_convert_item(&candidate.path, true);
                }
                Err(err) => {
                    report.record(&candidate.path, Stage::Convert, err);
                    reporter.on_convert_item(&candidate.path, false);
                }
            }
        }

        artifacts
    }

    // Only sources whose conversion succeeded are deleted; a failed
    // conversion keeps its original.
    fn purge_converted(&self, report: &mut Report, reporter: &dyn ProgressReporter) {
        info!("Deleting converted originals...");
        let converted = report.converted.clone();

        for source in converted {
            match fs::remove_file(&source) {
                Ok(()) => {
                    debug!("Deleted {}", source.display());
                    reporter.on_purge_item(&source);
                    report.purged.push(source);
                }
                Err(e) => {
                    let err = Error::io(&source, e);
                    report.record(&source, Stage::Purge, err);
                }
            }
        }
    }

    fn fold_all(
        &self,
        directory: &Path,
        artifacts: &[Artifact],
        report: &mut Report,
        reporter: &dyn ProgressReporter,
    ) {
        info!("Creating folders and applying icons...");
        reporter.on_fold_start(artifacts.len());

        for artifact in artifacts {
            if !artifact.path.is_file() {
                debug!("Skipping {}: no longer present", artifact.path.display());
                continue;
            }

            match self.fold(directory, artifact, report) {
                Ok(folder) => {
                    reporter.on_fold_item(&folder, true);
                    report.folders.push(folder);
                }
                Err(err) => {
                    reporter.on_fold_item(&directory.join(&artifact.base_name), false);
                    report.record(&artifact.path, Stage::Fold, err);
                }
            }
        }
    }

    fn fold(
        &self,
        directory: &Path,
        artifact: &Artifact,
        report: &mut Report,
    ) -> Result<PathBuf, Error> {
        let folder = directory.join(&artifact.base_name);
        if folder.is_dir() {
            debug!("Folder already exists: {}", folder.display());
        } else {
            fs::create_dir(&folder).map_err(|e| Error::io(&folder, e))?;
            info!("Created folder {}", folder.display());
        }

        let destination = folder.join(&artifact.file_name);
        if destination.exists() {
            // A hidden target cannot be overwritten on Windows.
            self.set_hidden(&destination, false, report);
        }
        fs::copy(&artifact.path, &destination).map_err(|e| Error::io(&destination, e))?;
        self.set_hidden(&destination, true, report);

        match marker::apply_marker(
            &folder,
            &artifact.file_name,
            &self.config.folder_type,
            self.attributes.as_ref(),
        ) {
            Ok(outcome) => {
                for warning in outcome.attribute_warnings {
                    let path = warning
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| outcome.path.clone());
                    report.record(&path, Stage::Attribute, warning);
                }
            }
            Err(err) => report.record(&folder, Stage::Marker, err),
        }

        if let Err(e) = fs::remove_file(&artifact.path) {
            let err = Error::io(&artifact.path, e);
            report.record(&artifact.path, Stage::Fold, err);
        }

        Ok(folder)
    }

    fn set_hidden(&self, path: &Path, hidden: bool, report: &mut Report) {
        if let Err(source) = self.attributes.set_hidden(path, hidden) {
            let err = Error::Attribute {
                path: path.to_path_buf(),
                source,
            };
            report.record(path, Stage::Attribute, err);
        }
    }
}

// NTFS folds case beyond ASCII, so `Ä` and `ä` name the same folder.
fn same_base_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_base_name_folds_unicode_case() {
        assert!(same_base_name("Ä", "ä"));
        assert!(same_base_name("Cover", "cOVER"));
        assert!(same_base_name("ÉTÉ", "été"));
        assert!(!same_base_name("cover", "covers"));
    }
}
