//! Core types for the Instafilter pipeline.
//!
//! This module contains the foundational types shared by every layer:
//! - Parameter kinds, raw slider values and native kernel values
//! - The shared image wrapper
//! - Error types
//! - User-facing notices

pub mod types;
pub mod error;
pub mod notice;

// Re-export commonly used types
pub use types::{
    ImageFormat, ImageId, ImageMetadata, ImageValue, NativeParameters, NativeValue, ParameterKind,
    ParameterSet, ParameterValues,
};
pub use error::{
    AcquireError, ConfigError, InstafilterError, KernelError, PersistError, SessionError,
};
pub use notice::{Notice, NoticeLevel};
