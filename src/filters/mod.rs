//! Filter module.
//!
//! Contains the descriptor registry, the kernel seam and the built-in
//! CPU kernel.

pub mod descriptor;
pub mod registry;
pub mod kernel;
pub mod builtin;

pub use descriptor::{Category, FilterDescriptor};
pub use registry::{FilterRegistry, RegistryBuilder};
pub use kernel::FilterKernel;
pub use builtin::BuiltinKernel;
