//! Benchmarks for patch-table resolution
//!
//! Run with: cargo bench -p tessel-exec

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tessel_compile::{Executable, ExecutableOptions, rewrite_arithmetic};
use tessel_exec::{MemoryWrites, build_patch_values, resolve};
use tessel_ir::{Declaration, Expression, Function, Instruction, MemoryType, Program};

/// A program with `n` distinct parametric rotations over a region of `n` angles.
fn parametric_program(n: u32) -> Program {
    let mut program = Program::new();
    program.push(Instruction::declare(Declaration::new("angles", MemoryType::Real, n)));
    program.push(Instruction::declare(Declaration::new("scale", MemoryType::Real, 1)));
    for i in 0..n {
        let angle = Expression::address("angles", i);
        let param = Expression::address("scale", 0) * angle.clone()
            + Expression::apply(Function::Sin, angle);
        program.push(Instruction::gate("RZ", [param], [i]));
    }
    program
}

fn memory(n: u32) -> MemoryWrites {
    let mut memory = MemoryWrites::new();
    memory.set_region("angles", (0..n).map(|i| f64::from(i) * 0.01));
    memory.set("scale", 0, 0.5);
    memory
}

/// Benchmark resolving the recalculation table alone
fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    for n in &[10, 100, 1000] {
        let rewrite = rewrite_arithmetic(&parametric_program(*n)).unwrap();
        let memory = memory(*n);
        group.bench_with_input(BenchmarkId::new("rules", n), n, |b, _| {
            b.iter(|| resolve(black_box(&rewrite.recalculation_table), black_box(&memory)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark building the full patch table
fn bench_build_patch_values(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_patch_values");

    for n in &[10, 100, 1000] {
        let exe = Executable::from_native(&parametric_program(*n), &ExecutableOptions::default())
            .unwrap();
        let memory = memory(*n);
        group.bench_with_input(BenchmarkId::new("rules", n), n, |b, _| {
            b.iter(|| build_patch_values(black_box(&exe), black_box(&memory)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark the rewrite that produces the tables
fn bench_rewrite(c: &mut Criterion) {
    let mut group = c.benchmark_group("rewrite_arithmetic");

    for n in &[10, 100, 1000] {
        let program = parametric_program(*n);
        group.bench_with_input(BenchmarkId::new("gates", n), n, |b, _| {
            b.iter(|| rewrite_arithmetic(black_box(&program)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_build_patch_values, bench_rewrite);
criterion_main!(benches);
