use std::path::PathBuf;

use thiserror::Error;

use crate::host::{BufferId, WindowId};

#[derive(Debug, Error)]
pub enum PurposeError {
    #[error("Buffer not found: {name}")]
    BufferNotFound { name: String },

    #[error("Buffer is no longer live: {id}")]
    DeadBuffer { id: BufferId },

    #[error("Window not found: {id}")]
    WindowNotFound { id: WindowId },

    #[error("Invalid buffer name pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to parse config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Not a dummy buffer name: {name}")]
    NotADummyName { name: String },

    #[error("Empty purpose for config key: {key}")]
    EmptyPurpose { key: String },

    #[error("Unknown config key: {key}")]
    ConfigKeyNotFound { key: String },

    #[error("Invalid scenario: {message}")]
    InvalidScenario { message: String },

    #[error("Cannot delete the only window of the layout")]
    CannotDeleteLastWindow,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Home directory not found")]
    HomeNotFound,
}

pub type Result<T> = std::result::Result<T, PurposeError>;

impl PurposeError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::BufferNotFound { .. } | Self::DeadBuffer { .. } | Self::WindowNotFound { .. } => 2,
            Self::InvalidPattern { .. }
            | Self::ConfigParse { .. }
            | Self::ConfigKeyNotFound { .. }
            | Self::EmptyPurpose { .. }
            | Self::TomlDe(_)
            | Self::TomlSer(_) => 3,
            Self::InvalidScenario { .. } => 4,
            _ => 1,
        }
    }
}
