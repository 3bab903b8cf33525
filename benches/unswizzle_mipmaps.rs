use criterion::black_box;
use criterion::{criterion_group, criterion_main, Criterion};
use console_swizzler::{Platform, SwizzleContext};

use criterion::BenchmarkId;
use criterion::Throughput;

fn unswizzle_mipmaps_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("unswizzle_bc7_cube_mipmaps");
    for size in [32, 256, 512] {
        let mut context = SwizzleContext::new();
        context.set_platform(Platform::Switch).unwrap();
        context.set_texture_size(size, size).unwrap();
        context.set_block_info(4, 4, 16).unwrap();
        context.set_has_mips(true);
        context.set_array_size(6).unwrap();

        // Allocate outside the benchmark loop to only measure unswizzling.
        let source = vec![0u8; context.swizzled_size()];
        let mut destination = vec![0u8; context.unswizzled_size()];

        group.throughput(Throughput::Bytes(destination.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| context.unswizzle(black_box(&source), &mut destination))
        });
    }
    group.finish();
}

criterion_group!(benches, unswizzle_mipmaps_benchmark);
criterion_main!(benches);
