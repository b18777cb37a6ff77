//! Error taxonomy for the filter engine.

use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::DeviceClass;

/// Errors that can occur while enumerating devices, resolving filter
/// programs, or running a filter.
///
/// None of these are retried internally and none downgrade to a partial
/// result: a failed run releases everything it acquired and returns the
/// error to the caller.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("No compute device available")]
    NoDeviceAvailable,
    #[error("No device of class {0:?} found")]
    DeviceClassNotFound(DeviceClass),
    #[error("Unknown filter: {0}")]
    UnknownFilter(String),
    #[error("Cannot read program source {path:?}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to create device context: {0}")]
    ContextCreationFailed(#[from] wgpu::RequestDeviceError),
    #[error("Device buffer allocation failed: {0}")]
    BufferAllocationFailed(String),
    #[error("Program compilation failed:\n{0}")]
    CompilationFailed(String),
    #[error("Dispatch did not complete within {0:?}")]
    DispatchTimedOut(Duration),
    #[error("Result readback failed: {0}")]
    ReadbackFailed(String),
}
