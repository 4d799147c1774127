//! Error types for the viewer and exporter.

use planetvis_core::VisError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur after the scene has been assembled, or while
/// setting the run up.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// Loading, indexing or assembly failed
    #[error(transparent)]
    Core(#[from] VisError),
    
    /// The frame directory or a frame image could not be written
    #[error("Frame export failed at {path:?}: {reason}")]
    ExportIo { path: PathBuf, reason: String },
    
    /// The scene page or figure file could not be written
    #[error("Failed to write {path:?}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    
    /// The configuration is invalid or unreadable
    #[error("Config error: {0}")]
    Config(String),
    
    /// Figure serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ViewerError {
    /// Creates an export error.
    pub fn export(path: &Path, reason: impl std::fmt::Display) -> Self {
        Self::ExportIo {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
    
    /// Creates an output error.
    pub fn output(path: &Path, source: std::io::Error) -> Self {
        Self::Output {
            path: path.to_path_buf(),
            source,
        }
    }
}
