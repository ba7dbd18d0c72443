use std::io;
use std::path::PathBuf;
use thiserror::Error;

use super::config::ConfigError;
use crate::core::io::traits::FilterError;
use crate::core::models::ids::IdError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    InvalidIdentifier(#[from] IdError),

    #[error("Failed to download structure {id} from {url}: {source}")]
    Download {
        id: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Transfer of structure {id} from {url} was interrupted: {source}")]
    Transfer {
        id: String,
        url: String,
        #[source]
        source: io::Error,
    },

    #[error("Structure {id} is unavailable at {url} (HTTP {status})")]
    Unavailable { id: String, url: String, status: u16 },

    #[error("Failed to launch '{program}': {source}")]
    ToolLaunch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("'{program}' exited with {status}: {stderr}")]
    ToolFailed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("Refusing to overwrite the input structure: {path}", path = path.display())]
    InputOverwrite { path: PathBuf },

    #[error("Expected output file was not produced: {path}", path = path.display())]
    MissingOutput { path: PathBuf },

    #[error("Hetero-group filtering failed: {0}")]
    Filter(#[from] FilterError),

    #[error("I/O error on '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
