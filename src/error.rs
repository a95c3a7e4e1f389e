use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why a call to a remote API (chat, image generation or image download) failed.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error("Missing credential: {0} is not set")]
    MissingCredential(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("ChatCompletion error: {0}")]
    Request(#[source] ApiError),
    #[error("Expected {expected} concepts but the model returned {actual}")]
    ConceptCount { expected: usize, actual: usize },
    #[error("Output directory error at {}: {source}", path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Image creation error for '{concept}': {source}")]
    ImageGeneration {
        concept: String,
        #[source]
        source: ApiError,
    },
    #[error("Image download error from {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: ApiError,
    },
    #[error("File creation error at {}: {source}", path.display())]
    FileCreation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("File write error at {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ThumbnailError {
    /// Name of the pipeline step that produced this error, used in log lines and reports.
    pub fn stage(&self) -> &'static str {
        match self {
            ThumbnailError::MissingCredential(_) | ThumbnailError::Config(_) => "config",
            ThumbnailError::Request(_) | ThumbnailError::ConceptCount { .. } => "concepts",
            ThumbnailError::OutputDirectory { .. } => "output",
            ThumbnailError::ImageGeneration { .. } => "generate",
            ThumbnailError::Download { .. } => "download",
            ThumbnailError::FileCreation { .. } => "create",
            ThumbnailError::Write { .. } => "write",
        }
    }
}

pub type Result<T> = std::result::Result<T, ThumbnailError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_cause() {
        let err = ThumbnailError::ImageGeneration {
            concept: "Networks".to_string(),
            source: ApiError::Status {
                status: 429,
                message: "Rate limit reached".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "Image creation error for 'Networks': HTTP 429: Rate limit reached"
        );
        assert_eq!(err.stage(), "generate");
    }

    #[test]
    fn test_source_chain() {
        let err = ThumbnailError::Write {
            path: PathBuf::from("images/Networks.png"),
            source: io::Error::new(io::ErrorKind::Other, "disk full"),
        };
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("disk full"));
    }
}
