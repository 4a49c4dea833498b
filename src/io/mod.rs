//! Image I/O boundary.
//!
//! The session never talks to a picker, a photo library or a dialog
//! directly. These traits are the request/response seams a front-end
//! implements; file-system and logging implementations ship with the crate.

pub mod file;
pub mod presenter;

use crate::core::error::{AcquireError, PersistError};
use crate::core::notice::Notice;
use crate::core::types::ImageValue;
use std::path::PathBuf;

pub use file::{DirectorySink, FilePicker, PathSink};
pub use presenter::{LogPresenter, RecordingPresenter};

/// Supplies a source image chosen by the user.
pub trait ImagePicker {
    /// Ask for an image. [`AcquireError::Cancelled`] means the user backed out.
    fn acquire_image(&mut self) -> Result<ImageValue, AcquireError>;
}

/// Accepts a final image for storage.
pub trait PersistenceSink {
    /// Store `image`. Failures are reported, never retried.
    fn persist(&mut self, image: &ImageValue) -> Result<PersistReceipt, PersistError>;
}

/// Shows short notices to the user. Fire-and-forget.
pub trait NoticePresenter {
    /// Present a notice.
    fn present(&self, notice: Notice);
}

/// Where a persisted image ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistReceipt {
    /// File path, if the sink writes to the file system.
    pub location: Option<PathBuf>,
    /// Encoded size in bytes, if known.
    pub bytes: Option<u64>,
}

impl PersistReceipt {
    /// Receipt for a file written to `path`.
    pub fn file(path: PathBuf, bytes: Option<u64>) -> Self {
        Self {
            location: Some(path),
            bytes,
        }
    }
}
