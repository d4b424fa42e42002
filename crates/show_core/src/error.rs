//! Viewer error types

use std::path::Path;
use thiserror::Error;

/// Main viewer error type
#[derive(Error, Debug)]
pub enum ViewerError {
    // ===== Recoverable Errors (notify user, continue) =====
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image write error: {0}")]
    ImageWrite(String),

    #[error("Failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with status {code:?}")]
    ProcessFailed { program: String, code: Option<i32> },

    // ===== Fatal Errors (fix configuration, do not retry) =====
    #[error("No viewing application found")]
    MissingApplication,

    #[error("Command template resolved to an empty argument vector")]
    EmptyCommand,

    #[error("Cannot find temporary directory: {0}")]
    TempDirectory(String),
}

impl ViewerError {
    /// Is this error recoverable?
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ViewerError::Io(_)
                | ViewerError::ImageWrite(_)
                | ViewerError::Launch { .. }
                | ViewerError::ProcessFailed { .. }
        )
    }

    /// Is this a fatal error?
    pub fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }

    /// Get a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            ViewerError::MissingApplication => {
                "No ImageJ/Fiji application found. Set one with --app or adjust the search path."
                    .to_string()
            }
            ViewerError::Launch { program, .. } => format!("Cannot start viewer: {}", program),
            ViewerError::ImageWrite(msg) => format!("Cannot write image: {}", msg),
            _ => self.to_string(),
        }
    }

    pub(crate) fn launch(program: impl Into<String>, source: std::io::Error) -> Self {
        ViewerError::Launch {
            program: program.into(),
            source,
        }
    }

    pub(crate) fn image_write(path: &Path, e: impl std::fmt::Display) -> Self {
        ViewerError::ImageWrite(format!("{}: {}", path.display(), e))
    }
}

impl From<image::ImageError> for ViewerError {
    fn from(e: image::ImageError) -> Self {
        ViewerError::ImageWrite(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;
