//! Benchmarks for full filter runs (upload, dispatch, readback).

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pixelforge::{DeviceCatalog, FilterEngine, ProgramLoader};

fn synthetic_pixels(count: usize) -> Vec<u32> {
    let mut state = 0x2545F491u32;
    (0..count)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state
        })
        .collect()
}

fn bench_filters(c: &mut Criterion) {
    if DeviceCatalog::new().default_device().is_err() {
        eprintln!("Skipping GPU benchmarks: no compute device available");
        return;
    }

    let mut group = c.benchmark_group("Filter Runs");
    group.sample_size(20);

    let resolutions = [
        (640, 360, "360p"),
        (1280, 720, "720p"),
        (1920, 1080, "1080p"),
    ];

    for (width, height, name) in resolutions {
        let input = synthetic_pixels(width * height);

        for filter in ["grayscale", "sepia"] {
            let mut engine = FilterEngine::new(ProgramLoader::bundled());
            group.bench_with_input(
                BenchmarkId::new(filter, name),
                &input,
                |b, input| {
                    b.iter(|| {
                        black_box(engine.run(filter, input, None).unwrap());
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_filters);
criterion_main!(benches);
