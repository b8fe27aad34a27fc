//! Error taxonomy for recipe loading and resampling.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Crate result type
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Where in the candidate pipeline a set ran dry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateStage {
    Generated,
    Filtered,
}

impl std::fmt::Display for CandidateStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandidateStage::Generated => write!(f, "generation"),
            CandidateStage::Filtered => write!(f, "validity filtering"),
        }
    }
}

/// Recipe and configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no candidates left for `{variable}` after {stage}")]
    EmptyCandidateSet {
        variable: String,
        stage: CandidateStage,
    },

    #[error("invalid parameters for protocol `{protocol}`: {message}")]
    InvalidProtocolParams { protocol: String, message: String },

    #[error("randomizer not supported: {0}")]
    UnsupportedVariableKind(String),

    #[error("randomized variable `{0}` has no choices")]
    MissingChoicesForRandomizedVariable(String),

    #[error("malformed weights for `{variable}`: {message}")]
    MalformedWeights { variable: String, message: String },

    #[error("protocol `{protocol}` for `{variable}` is not implemented")]
    ProtocolNotImplemented { variable: String, protocol: String },

    #[error("unknown protocol `{tag}` for `{variable}`")]
    UnknownProtocol { variable: String, tag: String },

    #[error("malformed recipe: {0}")]
    MalformedRecipe(String),

    #[error("malformed board: {0}")]
    MalformedBoard(String),

    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("{operation} not allowed while configuration is {state}")]
    InvalidState {
        operation: &'static str,
        state: crate::config::LoadState,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    /// Generation-level errors are skipped by the loader rather than aborting it.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ConfigError::InvalidProtocolParams { .. } | ConfigError::UnsupportedVariableKind(_)
        )
    }
}
