//! Processing session: state, parameter scaling and the worker thread.

pub mod processing;
pub mod scaling;
pub mod worker;

pub use processing::{ProcessingSession, SessionSnapshot, SessionState};
pub use scaling::{native_parameters, native_value, RADIUS_FACTOR, SCALE_FACTOR};
pub use worker::SessionWorker;
