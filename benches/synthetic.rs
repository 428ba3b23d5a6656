use criterion::{black_box, criterion_group, criterion_main, Criterion};

use polyclip::{
    clip,
    generators::{checkerboard, slanted_checkerboard, slanties, star, zigzag},
    offset, BinaryOp, EndStyle, FillRule, JoinStyle, OffsetOptions,
};

fn boolean_ops(c: &mut Criterion) {
    let (even, odd) = checkerboard(10);
    for (name, op) in [
        ("checkerboard union", BinaryOp::Union),
        ("checkerboard intersection", BinaryOp::Intersection),
        ("checkerboard xor", BinaryOp::Xor),
    ] {
        c.bench_function(name, |b| {
            b.iter(|| black_box(clip(&even, &odd, op, FillRule::EvenOdd)));
        });
    }

    let (even, odd) = slanted_checkerboard(10);
    c.bench_function("slanted checkerboard xor", |b| {
        b.iter(|| black_box(clip(&even, &odd, BinaryOp::Xor, FillRule::EvenOdd)));
    });

    let (even, odd) = slanties(20);
    c.bench_function("slanties union", |b| {
        b.iter(|| black_box(clip(&even, &odd, BinaryOp::Union, FillRule::NonZero)));
    });
}

fn offsets(c: &mut Criterion) {
    let opts = OffsetOptions::default();

    let star = star(50, 10_000);
    c.bench_function("star round", |b| {
        b.iter(|| {
            black_box(offset(
                &star,
                100.0,
                JoinStyle::Round,
                EndStyle::Polygon,
                &opts,
            ))
        });
    });
    c.bench_function("star shrink miter", |b| {
        b.iter(|| {
            black_box(offset(
                &star,
                -100.0,
                JoinStyle::Miter,
                EndStyle::Polygon,
                &opts,
            ))
        });
    });

    let zz = zigzag(100);
    c.bench_function("zigzag square ends", |b| {
        b.iter(|| black_box(offset(&zz, 3.0, JoinStyle::Square, EndStyle::Square, &opts)));
    });
}

criterion_group!(benches, boolean_ops, offsets);
criterion_main!(benches);
