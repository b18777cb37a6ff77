//! Filter execution engine.
//!
//! Owns the per-run lifecycle: resolve the filter program, pick a device,
//! build a context and queue, upload pixels, compile the program into a
//! kernel, dispatch one work item per pixel, read the result back, and
//! release everything — on every exit path.

mod buffers;
mod compile;

pub use compile::validate_source;

use std::sync::mpsc;
use std::time::{Duration, Instant};

use crate::catalog::{DeviceCatalog, DeviceDescriptor};
use crate::error::FilterError;
use crate::filters::{FilterDescriptor, ProgramLoader};

use buffers::FilterBuffers;

/// Must match `@workgroup_size` in every registered program.
const WORKGROUP_SIZE: u32 = 64;

/// Output of one filter run: the transformed pixels and the wall-clock
/// duration of the dispatch-to-readback interval.
///
/// The timer starts immediately before the submission that carries the
/// compute pass (the input upload is staged into that same submission) and
/// stops once the result has been copied back to the host. Program
/// compilation and device enumeration are never part of the interval.
#[derive(Debug)]
pub struct ExecutionResult {
    pub pixels: Vec<u32>,
    pub elapsed: Duration,
}

impl ExecutionResult {
    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed.as_millis()
    }
}

/// GPU filter engine.
///
/// `run` takes `&mut self`: one engine instance holds at most one live
/// execution context, so overlapping runs require separate engines. Each
/// run builds and tears down its own context/queue/buffers; no device state
/// survives between runs.
pub struct FilterEngine {
    loader: ProgramLoader,
    timeout: Option<Duration>,
}

impl FilterEngine {
    pub fn new(loader: ProgramLoader) -> Self {
        Self {
            loader,
            timeout: None,
        }
    }

    /// Bound the post-dispatch wait. When the deadline fires the run fails
    /// with `DispatchTimedOut`; the run's resources are queued for release
    /// as the context unwinds. Device-side cancellation is best-effort.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn loader(&self) -> &ProgramLoader {
        &self.loader
    }

    /// Run a registered filter over a packed-ARGB pixel buffer.
    ///
    /// Targets `device` when given, otherwise the catalog default. Returns
    /// a new buffer of identical length; the input is never mutated.
    pub fn run(
        &mut self,
        filter_name: &str,
        input_pixels: &[u32],
        device: Option<&DeviceDescriptor>,
    ) -> Result<ExecutionResult, FilterError> {
        let descriptor = self.loader.resolve(filter_name)?;
        let source = self.loader.load_source(descriptor)?;
        compile::validate_source(&source, descriptor.entry_point)?;

        let target = match device {
            Some(d) => d.clone(),
            None => DeviceCatalog::new().default_device()?,
        };
        log::debug!(
            "running `{}` over {} pixels on {}",
            filter_name,
            input_pixels.len(),
            target.name()
        );

        // Zero-sized storage bindings are invalid; the length invariant
        // holds trivially for an empty buffer.
        if input_pixels.is_empty() {
            return Ok(ExecutionResult {
                pixels: Vec::new(),
                elapsed: Duration::ZERO,
            });
        }

        let ctx = ExecutionContext::new(&target, &source, descriptor, input_pixels.len())?;
        ctx.dispatch(input_pixels, self.timeout)
    }
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self::new(ProgramLoader::default())
    }
}

/// Everything one run acquires from the compute runtime, in one place.
///
/// Single-use: built for exactly one dispatch, consumed by it, never shared.
/// Fields are declared in reverse acquisition order — Rust drops fields top
/// to bottom, so the kernel goes first and the device context last, on both
/// the success path and every early error return.
struct ExecutionContext {
    bind_group: wgpu::BindGroup,
    pipeline: wgpu::ComputePipeline,
    _module: wgpu::ShaderModule,
    buffers: FilterBuffers,
    queue: wgpu::Queue,
    device: wgpu::Device,
}

impl ExecutionContext {
    fn new(
        target: &DeviceDescriptor,
        source: &str,
        descriptor: &FilterDescriptor,
        pixel_count: usize,
    ) -> Result<Self, FilterError> {
        let (device, queue) = pollster::block_on(target.adapter().request_device(
            &wgpu::DeviceDescriptor {
                label: Some("pixelforge-run"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
                experimental_features: wgpu::ExperimentalFeatures::default(),
            },
        ))?;

        let bytes = (pixel_count * std::mem::size_of::<u32>()) as u64;
        let max_binding = device.limits().max_storage_buffer_binding_size as u64;
        if bytes > max_binding {
            return Err(FilterError::BufferAllocationFailed(format!(
                "pixel buffer of {bytes} bytes exceeds the device's {max_binding}-byte storage binding limit"
            )));
        }

        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let buffers = FilterBuffers::new(&device, pixel_count);
        if let Some(e) = pollster::block_on(device.pop_error_scope()) {
            return Err(FilterError::BufferAllocationFailed(e.to_string()));
        }

        // The source already passed naga validation; this scope catches
        // anything the device's own compiler still rejects.
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(descriptor.source_id),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("filter_layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::COMPUTE,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Storage { read_only: true },
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::COMPUTE,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Storage { read_only: false },
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                ],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("filter_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some(descriptor.entry_point),
            layout: Some(&pipeline_layout),
            module: &module,
            entry_point: Some(descriptor.entry_point),
            compilation_options: Default::default(),
            cache: None,
        });

        if let Some(e) = pollster::block_on(device.pop_error_scope()) {
            return Err(FilterError::CompilationFailed(e.to_string()));
        }

        // Argument order is fixed: binding 0 = input, binding 1 = output.
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("filter_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffers.input.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: buffers.output.as_entire_binding(),
                },
            ],
        });

        Ok(Self {
            bind_group,
            pipeline,
            _module: module,
            buffers,
            queue,
            device,
        })
    }

    /// Upload, dispatch one work item per pixel, read the result back.
    /// Consumes the context; drop releases every handle in reverse order.
    fn dispatch(
        self,
        input_pixels: &[u32],
        timeout: Option<Duration>,
    ) -> Result<ExecutionResult, FilterError> {
        let pixel_count = input_pixels.len();
        let bytes = (pixel_count * std::mem::size_of::<u32>()) as u64;

        self.queue
            .write_buffer(&self.buffers.input, 0, bytemuck::cast_slice(input_pixels));

        let (groups_x, groups_y) = dispatch_extent(
            pixel_count as u32,
            self.device.limits().max_compute_workgroups_per_dimension,
        );

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("filter_encoder"),
            });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("filter_pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.bind_group, &[]);
            pass.dispatch_workgroups(groups_x, groups_y, 1);
        }
        encoder.copy_buffer_to_buffer(&self.buffers.output, 0, &self.buffers.staging, 0, bytes);

        let started = Instant::now();
        self.queue.submit(Some(encoder.finish()));

        let pixels = self.read_staging(pixel_count, timeout)?;
        let elapsed = started.elapsed();
        log::debug!("dispatch + readback took {} ms", elapsed.as_millis());

        Ok(ExecutionResult { pixels, elapsed })
    }

    /// Block until the queue drains, then copy the staging buffer out.
    fn read_staging(
        &self,
        pixel_count: usize,
        timeout: Option<Duration>,
    ) -> Result<Vec<u32>, FilterError> {
        let size = (pixel_count * std::mem::size_of::<u32>()) as u64;
        let slice = self.buffers.staging.slice(..size);

        let (tx, rx) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |r| {
            let _ = tx.send(r);
        });

        let map_result = match timeout {
            None => {
                self.device
                    .poll(wgpu::PollType::wait_indefinitely())
                    .map_err(|e| FilterError::ReadbackFailed(e.to_string()))?;
                rx.recv()
                    .map_err(|e| FilterError::ReadbackFailed(e.to_string()))?
            }
            Some(limit) => {
                let deadline = Instant::now() + limit;
                loop {
                    let _ = self.device.poll(wgpu::PollType::Poll);
                    match rx.recv_timeout(Duration::from_millis(1)) {
                        Ok(r) => break r,
                        Err(mpsc::RecvTimeoutError::Timeout) => {
                            if Instant::now() >= deadline {
                                return Err(FilterError::DispatchTimedOut(limit));
                            }
                        }
                        Err(mpsc::RecvTimeoutError::Disconnected) => {
                            return Err(FilterError::ReadbackFailed(
                                "map callback dropped without a result".into(),
                            ));
                        }
                    }
                }
            }
        };
        map_result.map_err(|e| FilterError::ReadbackFailed(format!("{e:?}")))?;

        let data = slice.get_mapped_range();
        let result: Vec<u32> = bytemuck::cast_slice(&data).to_vec();
        drop(data);
        self.buffers.staging.unmap();

        Ok(result)
    }
}

/// Split a 1D pixel count into a (x, y) workgroup grid that respects the
/// device's per-dimension workgroup limit. Programs linearize with
/// `gid.x + gid.y * num_workgroups.x * WORKGROUP_SIZE` and bounds-check
/// against `arrayLength`, so overshoot in the last row is harmless.
fn dispatch_extent(pixel_count: u32, max_per_dimension: u32) -> (u32, u32) {
    let groups = pixel_count.div_ceil(WORKGROUP_SIZE);
    let groups_x = groups.min(max_per_dimension);
    let groups_y = groups.div_ceil(groups_x);
    (groups_x, groups_y)
}
