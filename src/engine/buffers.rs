//! Per-run device buffers.

use wgpu::{Buffer, BufferUsages, Device};

/// The buffer trio for one dispatch: input pixels, output pixels, and a
/// host-mappable staging buffer for readback. All three are sized to the
/// same pixel count, fixing the output length to the input length.
pub struct FilterBuffers {
    pub input: Buffer,
    pub output: Buffer,
    pub staging: Buffer,
}

impl FilterBuffers {
    pub fn new(device: &Device, pixel_count: usize) -> Self {
        let size = (pixel_count * std::mem::size_of::<u32>()) as u64;

        let input = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("filter_input_pixels"),
            size,
            usage: BufferUsages::STORAGE | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let output = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("filter_output_pixels"),
            size,
            usage: BufferUsages::STORAGE | BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("filter_staging"),
            size,
            usage: BufferUsages::MAP_READ | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            input,
            output,
            staging,
        }
    }
}
