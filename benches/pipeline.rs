//! End-to-end pipeline benchmark over a loop-heavy program.

use bfc::{compile_source, CompilerOptions, Level, Reporter};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_pipeline(c: &mut Criterion) {
    // Nested multiplication loops, repeated enough to exercise both
    // branch forms and the optimizer's merge/prune passes.
    let program = "++[>++[>+<-]<-]>>. +-<> ".repeat(128);
    let options = CompilerOptions::default();
    let reporter = Reporter::new(Level::Fatal);

    c.bench_function("compile_nested_loops", |b| {
        b.iter(|| {
            compile_source(
                "bench.bf",
                black_box(program.as_str()),
                &options,
                &reporter,
            )
            .unwrap()
        });
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
