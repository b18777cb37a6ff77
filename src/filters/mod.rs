//! Filter registry and device-program loading.
//!
//! A filter is a named per-pixel transform backed by a WGSL compute program.
//! The registry is the only place that knows which filters exist; the
//! execution engine just asks it for a descriptor and runs whatever comes
//! back.

mod loader;
mod registry;

pub use loader::ProgramLoader;
pub use registry::{filters, resolve, FilterDescriptor};
