//! Error taxonomy for the library seams. The CLI layer wraps these in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GelfetchError {
    /// Request could not be sent or the body could not be read.
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("HTTP {status} from {url}")]
    Http { url: String, status: u16 },

    /// Expected pattern was not found in a response.
    #[error("parse error: {0}")]
    Parse(String),

    #[error("filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A pipeline thread could not be spawned, or panicked.
    #[error("pipeline thread error: {0}")]
    Thread(String),
}

impl GelfetchError {
    pub fn transport(url: &str, message: impl ToString) -> Self {
        GelfetchError::Transport {
            url: url.to_string(),
            message: message.to_string(),
        }
    }

    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GelfetchError::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Short label for a progress status line.
    pub fn status_label(&self) -> &'static str {
        match self {
            GelfetchError::Transport { .. } => "Failed to GET",
            GelfetchError::Http { .. } => "Bad HTTP status",
            GelfetchError::Parse(_) => "Failed to parse",
            GelfetchError::Filesystem { .. } => "Failed to open",
            GelfetchError::Configuration(_) => "Bad config",
            GelfetchError::Thread(_) => "Thread failed",
        }
    }
}

pub type GelfetchResult<T> = std::result::Result<T, GelfetchError>;
