//! User-facing notices.
//!
//! Every error the session can report is turned into a [`Notice`] at the
//! application boundary. Presenting it is fire-and-forget.

use crate::core::error::{AcquireError, PersistError, SessionError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity used by presenters to pick a log level or icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    /// Confirmation of a completed action.
    Info,
    /// Something the user asked for did not happen.
    Warning,
    /// An operation failed.
    Error,
}

/// A short title and message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    /// Create a notice.
    pub fn new(level: NoticeLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Confirmation shown after a successful save.
    pub fn saved() -> Self {
        Self::new(
            NoticeLevel::Info,
            "Saved",
            "Your altered image has been saved.",
        )
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.title)
        } else {
            write!(f, "{}: {}", self.title, self.message)
        }
    }
}

impl From<&SessionError> for Notice {
    fn from(error: &SessionError) -> Self {
        match error {
            SessionError::NoImageLoaded => Notice::new(NoticeLevel::Warning, "No image selected", ""),
            SessionError::UnknownFilter(id) => Notice::new(
                NoticeLevel::Error,
                "Unknown filter",
                format!("'{}' is not an available filter.", id),
            ),
            SessionError::NoFilters => {
                Notice::new(NoticeLevel::Error, "Error", "No filters are available.")
            }
            SessionError::NonFiniteParameter { kind } => Notice::new(
                NoticeLevel::Warning,
                "Invalid value",
                format!("{} must be a finite number.", kind),
            ),
            SessionError::KernelProducedNoOutput { .. } => {
                Notice::new(NoticeLevel::Warning, "No image selected", "")
            }
            SessionError::NothingToSave => Notice::new(NoticeLevel::Warning, "No image found", ""),
            SessionError::Persist(err) => Notice::from(err),
            SessionError::WorkerUnavailable => Notice::new(
                NoticeLevel::Error,
                "Error",
                "The image processor is no longer running.",
            ),
        }
    }
}

impl From<&PersistError> for Notice {
    fn from(error: &PersistError) -> Self {
        Notice::new(NoticeLevel::Error, "Save error", error.to_string())
    }
}

impl From<&AcquireError> for Notice {
    fn from(error: &AcquireError) -> Self {
        Notice::new(NoticeLevel::Error, "Import error", error.to_string())
    }
}
