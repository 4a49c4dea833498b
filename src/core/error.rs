//! Error types for Instafilter.
//!
//! Uses thiserror for structured errors with context. Errors are designed to:
//! - Carry enough detail to build a user-facing notice
//! - Never terminate the process: every kind is recoverable at the boundary

use crate::core::types::ParameterKind;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Instafilter.
///
/// Returned by the command-line front-end, which drives a whole
/// load-render-save run and can fail at any layer.
#[derive(Error, Debug)]
pub enum InstafilterError {
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Acquire error: {0}")]
    Acquire(#[from] AcquireError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid arguments: {0}")]
    Usage(String),
}

/// Errors from processing-session operations.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No image loaded")]
    NoImageLoaded,

    #[error("Unknown filter '{0}'")]
    UnknownFilter(String),

    #[error("No filters registered")]
    NoFilters,

    #[error("{kind} value must be finite")]
    NonFiniteParameter { kind: ParameterKind },

    #[error("Filter '{filter}' produced no output: {reason}")]
    KernelProducedNoOutput { filter: String, reason: KernelError },

    #[error("No rendered image to save")]
    NothingToSave,

    #[error("Failed to save image: {0}")]
    Persist(#[from] PersistError),

    #[error("Session worker has shut down")]
    WorkerUnavailable,
}

/// Reasons a filter kernel could not produce an image.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    #[error("filter '{0}' is not supported by this kernel")]
    UnsupportedFilter(String),

    #[error("source image is empty")]
    EmptyImage,

    #[error("invalid {kind} value: {reason}")]
    InvalidParameter { kind: ParameterKind, reason: String },

    #[error("{0}")]
    Other(String),
}

/// Outcomes of an image acquisition request other than an image.
#[derive(Error, Debug)]
pub enum AcquireError {
    /// The user dismissed the picker. Normal control flow.
    #[error("Image selection cancelled")]
    Cancelled,

    #[error("Failed to load image: {0}")]
    Load(String),
}

/// Errors from handing an image to a persistence sink.
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("I/O error writing {path}: {error}")]
    Io { path: PathBuf, error: std::io::Error },

    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("{0}")]
    Rejected(String),
}

/// Errors while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {error}")]
    Io { path: PathBuf, error: std::io::Error },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Default filter '{0}' is not registered")]
    UnknownDefaultFilter(String),

    #[error("Unsupported output format '{0}'")]
    UnsupportedFormat(String),
}

// ============================================================================
// Error Utilities
// ============================================================================

impl SessionError {
    /// Whether this error means the kernel rejected the current inputs.
    pub fn is_render_failure(&self) -> bool {
        matches!(self, SessionError::KernelProducedNoOutput { .. })
    }
}

impl AcquireError {
    /// Cancellation is control flow, not a failure worth a notice.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AcquireError::Cancelled)
    }
}

/// Result type alias for Instafilter operations.
pub type InstafilterResult<T> = Result<T, InstafilterError>;

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Result type alias for kernel operations.
pub type KernelResult<T> = Result<T, KernelError>;
