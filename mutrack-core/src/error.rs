//! Errors raised by a layout pass
//!
//! Only malformed input and invalid configuration are errors. Events that
//! cannot be placed in the current view are dropped and counted instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Malformed region {index}: {message}")]
    MalformedRegion { index: usize, message: String },

    #[error("Malformed event at {path}: {message}")]
    MalformedEvent { path: String, message: String },

    #[error("Malformed sample at {path}: {message}")]
    MalformedSample { path: String, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No regions in view")]
    NoRegions,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LayoutError {
    pub fn region<S: Into<String>>(index: usize, message: S) -> Self {
        Self::MalformedRegion {
            index,
            message: message.into(),
        }
    }

    pub fn event<P: Into<String>, S: Into<String>>(path: P, message: S) -> Self {
        Self::MalformedEvent {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn sample<P: Into<String>, S: Into<String>>(path: P, message: S) -> Self {
        Self::MalformedSample {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig(message.into())
    }
}

pub type LayoutResult<T> = Result<T, LayoutError>;
