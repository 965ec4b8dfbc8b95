use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a conversion or visualization run.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("I/O error on {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read manifest {}: {}", .path.display(), .source)]
    Manifest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse annotation {}: {}", .path.display(), .source)]
    Annotation {
        path: PathBuf,
        #[source]
        source: quick_xml::DeError,
    },

    #[error("Failed to read image {}: {}", .path.display(), .source)]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Malformed label line {} in {}: {}", .line, .path.display(), .reason)]
    Label {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Failed to load font {}", .path.display())]
    Font { path: PathBuf },

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

impl ConvertError {
    /// Build a closure that wraps an `std::io::Error` with the path it came from
    pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| ConvertError::Io { path, source }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
