use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a whole batch. Per-file problems never surface here.
#[derive(Debug, Error)]
pub enum RenameError {
    #[error("Path is not a directory: {}", .0.display())]
    InvalidTarget(PathBuf),
    #[error("Failed to read directory {}: {source}", path.display())]
    Enumeration {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Operation interrupted by user")]
    Interrupted,
}

impl From<walkdir::Error> for RenameError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(PathBuf::from).unwrap_or_default();
        let source = err
            .into_io_error()
            .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
        Self::Enumeration { path, source }
    }
}
