use criterion::black_box;
use criterion::{criterion_group, criterion_main, Criterion};
use console_swizzler::{Platform, SwizzleContext};

use criterion::BenchmarkId;
use criterion::Throughput;

fn context(platform: Platform, size: i32) -> SwizzleContext {
    let mut context = SwizzleContext::new();
    context.set_platform(platform).unwrap();
    context.set_texture_size(size, size).unwrap();
    context.set_block_info(1, 1, 4).unwrap();
    context
}

fn swizzle_benchmark(c: &mut Criterion, platform: Platform, name: &str) {
    let mut group = c.benchmark_group(name);
    for size in [32, 256, 512, 1024] {
        let mut context = context(platform, size);
        let source = vec![0u8; context.unswizzled_size()];
        let mut destination = vec![0u8; context.swizzled_size()];

        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| context.swizzle(black_box(&source), &mut destination))
        });
    }
    group.finish();
}

fn swizzle_ps4_benchmark(c: &mut Criterion) {
    swizzle_benchmark(c, Platform::Ps4, "swizzle_ps4_rgba");
}

fn swizzle_switch_benchmark(c: &mut Criterion) {
    swizzle_benchmark(c, Platform::Switch, "swizzle_switch_rgba");
}

criterion_group!(benches, swizzle_ps4_benchmark, swizzle_switch_benchmark);
criterion_main!(benches);
