//! # Instafilter - parametric image filtering
//!
//! Instafilter applies one of a fixed set of image filters to a photo,
//! driven by four universal knobs: intensity, radius, scale and center.
//!
//! ## Features
//!
//! - **Declarative parameter contract**: each filter declares which knobs it
//!   honours; only those reach the kernel
//! - **Fixed scaling**: slider values in `[0, 1]` map to native ranges
//! - **No chaining**: every render starts from the original image
//! - **Pluggable kernels**: implement [`FilterKernel`](filters::FilterKernel)
//!   or use the built-in CPU kernel
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use instafilter::prelude::*;
//! use std::sync::Arc;
//!
//! let registry = Arc::new(FilterRegistry::with_builtins());
//! let mut session = ProcessingSession::new(registry, BuiltinKernel::new())?;
//!
//! session.import_image(ImageValue::from_path("input.png")?)?;
//! session.select_filter("vignette")?;
//! session.set_parameter(ParameterKind::Intensity, 0.5)?;
//! session.set_parameter(ParameterKind::Radius, 0.2)?;
//!
//! session.save(&mut PathSink::new("output.png"))?;
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: parameter kinds, image values, errors and notices
//! - [`filters`]: descriptor registry, kernel trait and built-in kernel
//! - [`session`]: the processing session, scaling rules and worker thread
//! - [`io`]: picker, sink and presenter seams with file-system implementations
//! - [`app`]: the controller that turns errors into notices
//! - [`config`]: TOML configuration
//! - [`cli`]: option parsing and the one-shot run behind the binary

#![warn(clippy::all)]

pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod filters;
pub mod io;
pub mod session;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use instafilter::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::types::{
        ImageFormat, ImageId, ImageMetadata, ImageValue, NativeParameters, NativeValue,
        ParameterKind, ParameterSet, ParameterValues,
    };

    // Errors and notices
    pub use crate::core::error::{
        AcquireError, ConfigError, InstafilterError, InstafilterResult, KernelError, PersistError,
        SessionError, SessionResult,
    };
    pub use crate::core::notice::{Notice, NoticeLevel};

    // Filters
    pub use crate::filters::builtin::BuiltinKernel;
    pub use crate::filters::descriptor::{Category, FilterDescriptor};
    pub use crate::filters::kernel::FilterKernel;
    pub use crate::filters::registry::{FilterRegistry, RegistryBuilder};

    // Session
    pub use crate::session::processing::{ProcessingSession, SessionSnapshot, SessionState};
    pub use crate::session::worker::SessionWorker;

    // I/O
    pub use crate::io::{
        DirectorySink, FilePicker, ImagePicker, LogPresenter, NoticePresenter, PathSink,
        PersistReceipt, PersistenceSink, RecordingPresenter,
    };

    // Application
    pub use crate::app::App;
    pub use crate::config::AppConfig;
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
