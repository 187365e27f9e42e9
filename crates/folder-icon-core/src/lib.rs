pub mod config;
pub mod engine;
pub mod error;
pub mod icon;
pub mod marker;
pub mod platform;
pub mod progress;
pub mod report;
pub mod scanner;

pub use config::AppConfig;
pub use engine::FolderIconEngine;
pub use error::Error;
pub use progress::{ProgressReporter, SilentReporter};
pub use report::{ItemFailure, Report, Stage};
