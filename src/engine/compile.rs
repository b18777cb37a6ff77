//! WGSL front-end validation.
//!
//! The loaded program text goes through naga's parser and validator before
//! any device object is created, so a broken program surfaces the compiler's
//! own diagnostic text instead of an opaque device error. The same check is
//! usable from tests without a GPU.

use naga::valid::{Capabilities, ValidationFlags, Validator};

use crate::error::FilterError;

/// Parse and validate a WGSL program and confirm the kernel entry point
/// exists. Returns `CompilationFailed` carrying the rendered diagnostics.
///
/// Public so tooling (and the test suite) can check a program without
/// touching a device.
pub fn validate_source(source: &str, entry_point: &str) -> Result<(), FilterError> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| FilterError::CompilationFailed(e.emit_to_string(source)))?;

    Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .map_err(|e| FilterError::CompilationFailed(e.emit_to_string(source)))?;

    if !module.entry_points.iter().any(|ep| ep.name == entry_point) {
        return Err(FilterError::CompilationFailed(format!(
            "entry point `{entry_point}` not found in program (available: {})",
            module
                .entry_points
                .iter()
                .map(|ep| ep.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
        @group(0) @binding(0) var<storage, read> input_pixels: array<u32>;
        @group(0) @binding(1) var<storage, read_write> output_pixels: array<u32>;

        @compute @workgroup_size(64)
        fn copy_kernel(@builtin(global_invocation_id) gid: vec3<u32>) {
            let i = gid.x;
            if (i >= arrayLength(&input_pixels)) {
                return;
            }
            output_pixels[i] = input_pixels[i];
        }
    "#;

    #[test]
    fn test_valid_program_passes() {
        assert!(validate_source(VALID, "copy_kernel").is_ok());
    }

    #[test]
    fn test_syntax_error_carries_diagnostics() {
        let err = validate_source("fn broken(", "copy_kernel").unwrap_err();
        match err {
            FilterError::CompilationFailed(diag) => assert!(!diag.is_empty()),
            other => panic!("expected CompilationFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_entry_point() {
        let err = validate_source(VALID, "absent_kernel").unwrap_err();
        match err {
            FilterError::CompilationFailed(diag) => {
                assert!(diag.contains("absent_kernel"));
                assert!(diag.contains("copy_kernel"));
            }
            other => panic!("expected CompilationFailed, got {other:?}"),
        }
    }
}
