use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error};
use walkdir::WalkDir;

/// Extensions recognised as images, compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: [&str; 8] =
    ["jpg", "jpeg", "png", "bmp", "gif", "tiff", "webp", "ico"];

pub const ICON_EXTENSION: &str = "ico";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CandidateKind {
    /// Already an icon container; folded without conversion.
    Icon,
    Raster,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    pub path: PathBuf,
    pub base_name: String,
    pub kind: CandidateKind,
}

impl ImageCandidate {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension().and_then(OsStr::to_str)?;
        if !is_supported_extension(extension) {
            return None;
        }
        let base_name = path.file_stem()?.to_string_lossy().into_owned();
        if base_name.is_empty() {
            return None;
        }
        let kind = if extension.eq_ignore_ascii_case(ICON_EXTENSION) {
            CandidateKind::Icon
        } else {
            CandidateKind::Raster
        };
        Some(Self {
            path: path.to_path_buf(),
            base_name,
            kind,
        })
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

pub fn is_supported_extension(extension: &str) -> bool {
    SUPPORTED_EXTENSIONS
        .iter()
        .any(|supported| extension.eq_ignore_ascii_case(supported))
}

/// List the image candidates directly inside `dir` (no recursion).
///
/// Icon candidates come first, then raster candidates, each group ordered by
/// file name, so an existing `name.ico` claims its base name before any
/// `name.png` is converted.
pub fn discover_candidates(dir: &Path) -> io::Result<Vec<ImageCandidate>> {
    let mut candidates = Vec::new();

    for entry_result in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(err) => {
                if err.depth() == 0 {
                    let kind = err
                        .io_error()
                        .map(|e| e.kind())
                        .unwrap_or(io::ErrorKind::Other);
                    return Err(io::Error::new(
                        kind,
                        format!("Error reading directory {}: {}", dir.display(), err),
                    ));
                }
                error!("Error reading entry in directory {}: {}", dir.display(), err);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        if let Some(candidate) = ImageCandidate::from_path(entry.path()) {
            debug!("Found candidate {}", entry.path().display());
            candidates.push(candidate);
        }
    }

    candidates.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.path.cmp(&b.path)));
    Ok(candidates)
}
