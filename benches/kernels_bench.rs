/// 标量与向量内核基准测试

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use lane_kernels::config::InputConfig;
use lane_kernels::harness::KernelInputs;
use lane_kernels::kernels::*;
use lane_kernels::VectorUnit;
use std::hint::black_box;

const SIZES: [usize; 3] = [64, 1024, 16384];

fn inputs(size: usize) -> KernelInputs {
    KernelInputs::generate(&InputConfig {
        size,
        ..Default::default()
    })
}

fn bench_abs(c: &mut Criterion) {
    let mut group = c.benchmark_group("abs");

    for size in SIZES {
        let inputs = inputs(size);
        let mut output = vec![0.0; size];

        group.bench_with_input(BenchmarkId::new("serial", size), &inputs, |b, inputs| {
            b.iter(|| abs_serial(black_box(&inputs.values), &mut output))
        });

        let mut unit = VectorUnit::<4>::new();
        group.bench_with_input(BenchmarkId::new("vector_w4", size), &inputs, |b, inputs| {
            b.iter(|| {
                unit.reset();
                abs_vector(&mut unit, black_box(&inputs.values), &mut output)
            })
        });
    }

    group.finish();
}

fn bench_clamped_exp(c: &mut Criterion) {
    let mut group = c.benchmark_group("clamped_exp");

    for size in SIZES {
        let inputs = inputs(size);
        let mut output = vec![0.0; size];

        group.bench_with_input(BenchmarkId::new("serial", size), &inputs, |b, inputs| {
            b.iter(|| clamped_exp_serial(black_box(&inputs.values), &inputs.exponents, &mut output))
        });

        let mut unit = VectorUnit::<4>::new();
        group.bench_with_input(BenchmarkId::new("vector_w4", size), &inputs, |b, inputs| {
            b.iter(|| {
                unit.reset();
                clamped_exp_vector(&mut unit, black_box(&inputs.values), &inputs.exponents, &mut output)
            })
        });

        let mut unit = VectorUnit::<8>::new();
        group.bench_with_input(BenchmarkId::new("vector_w8", size), &inputs, |b, inputs| {
            b.iter(|| {
                unit.reset();
                clamped_exp_vector(&mut unit, black_box(&inputs.values), &inputs.exponents, &mut output)
            })
        });
    }

    group.finish();
}

fn bench_array_sum(c: &mut Criterion) {
    let mut group = c.benchmark_group("array_sum");

    for size in SIZES {
        let inputs = inputs(size);

        group.bench_with_input(BenchmarkId::new("serial", size), &inputs, |b, inputs| {
            b.iter(|| array_sum_serial(black_box(&inputs.values)))
        });

        let mut unit = VectorUnit::<4>::new();
        group.bench_with_input(BenchmarkId::new("vector_w4", size), &inputs, |b, inputs| {
            b.iter(|| {
                unit.reset();
                array_sum_vector(&mut unit, black_box(&inputs.values))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_abs, bench_clamped_exp, bench_array_sum);
criterion_main!(benches);
