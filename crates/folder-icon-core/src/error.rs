use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Unable to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Unable to convert {}: {message}", path.display())]
    Conversion { path: PathBuf, message: String },

    #[error("{} would overwrite {}", path.display(), existing.display())]
    NameConflict { path: PathBuf, existing: PathBuf },

    #[error("Marker error at {}: {message}", path.display())]
    Marker { path: PathBuf, message: String },

    #[error("Unable to change attributes of {}: {source}", path.display())]
    Attribute {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl Error {
    /// File system entry the error refers to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Error::DirectoryNotFound(path)
            | Error::Decode { path, .. }
            | Error::Conversion { path, .. }
            | Error::NameConflict { path, .. }
            | Error::Marker { path, .. }
            | Error::Attribute { path, .. }
            | Error::Io { path, .. } => Some(path),
            Error::Config(_) => None,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn marker(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Error::Marker {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
