use std::hint::black_box;
use std::str::FromStr;

use criterion::{Criterion, criterion_group, criterion_main};
use fixint::Int128;

const MIN: &str = "-170141183460469231731687303715884105728";

fn bench_addition(c: &mut Criterion) {
    c.bench_function("int128_addition", |b| {
        let x = Int128::from_i64(-9223372036854543385);
        let y = Int128::from_i64(9223372036854775574);
        b.iter(|| black_box(black_box(x) + black_box(y)));
    });
}

fn bench_subtraction(c: &mut Criterion) {
    c.bench_function("int128_subtraction", |b| {
        let x = Int128::from_i64(-9223372036854543385);
        let y = Int128::from_i64(9223372036854775574);
        b.iter(|| black_box(black_box(x) - black_box(y)));
    });
}

fn bench_negation(c: &mut Criterion) {
    c.bench_function("int128_negation", |b| {
        let x = Int128::from_i64(-42);
        b.iter(|| black_box(-black_box(x)));
    });
}

fn bench_comparison(c: &mut Criterion) {
    c.bench_function("int128_comparison", |b| {
        let x = Int128::MIN;
        let y = Int128::NEG_ONE;
        b.iter(|| black_box(black_box(x) < black_box(y)));
    });
}

fn bench_parsing(c: &mut Criterion) {
    c.bench_function("int128_parsing_min", |b| {
        b.iter(|| black_box(Int128::from_str(black_box(MIN)).unwrap()));
    });
}

fn bench_formatting(c: &mut Criterion) {
    c.bench_function("int128_formatting_min", |b| {
        let x = Int128::MIN;
        b.iter(|| black_box(format!("{}", black_box(x))));
    });
}

fn bench_binary_write_read(c: &mut Criterion) {
    c.bench_function("int128_binary_write_read", |b| {
        let x = Int128::MIN;
        let mut buf = [0u8; 16];
        b.iter(|| {
            black_box(x).write_le_bytes(&mut buf);
            black_box(Int128::read_le_bytes(&buf))
        });
    });
}

criterion_group!(
    benches,
    bench_addition,
    bench_subtraction,
    bench_negation,
    bench_comparison,
    bench_parsing,
    bench_formatting,
    bench_binary_write_read,
);

criterion_main!(benches);
