//! Pixelforge Core
//!
//! GPU-accelerated per-pixel image filter execution engine.
//!
//! Callers hand in a filter name and a flat buffer of packed 32-bit ARGB
//! pixels; the engine picks (or is told) a compute device, compiles the
//! filter's WGSL program at run time, dispatches one work item per pixel,
//! and returns a new buffer of identical length plus the elapsed
//! dispatch-to-readback time.
//!
//! # Components
//!
//! - Device catalog: platform/device enumeration and selection via wgpu
//! - Filter registry: static name → {program source, entry point} table
//! - Program loader: reads WGSL sources from a program directory
//! - Execution engine: per-run context/queue/buffer/kernel lifecycle with
//!   deterministic teardown on every exit path
//!
//! ```no_run
//! use pixelforge::{FilterEngine, ProgramLoader};
//!
//! let mut engine = FilterEngine::new(ProgramLoader::bundled());
//! let input = vec![0xFFC8961Eu32; 4];
//! let result = engine.run("grayscale", &input, None)?;
//! assert_eq!(result.pixels.len(), input.len());
//! # Ok::<(), pixelforge::FilterError>(())
//! ```

pub mod catalog;
pub mod engine;
pub mod error;
pub mod filters;
pub mod pixel;

// Re-export commonly used types
pub use catalog::{DeviceCatalog, DeviceClass, DeviceDescriptor, DeviceInfo};
pub use engine::{validate_source, ExecutionResult, FilterEngine};
pub use error::FilterError;
pub use filters::{filters, resolve, FilterDescriptor, ProgramLoader};
