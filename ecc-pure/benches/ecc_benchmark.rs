//! Performance benchmarks for field, curve and ECDSA operations.
//!
//! Run with: cargo bench --bench ecc_benchmark

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use ecc_pure::{Curve, Ecdsa, Field};
use rand::rngs::OsRng;
use std::hint::black_box;

const P79: &str = "62CE5177412ACA899CF5";
const A79: &str = "6FEE9D4D2D1217D44FC3";
const B79: &str = "053DDCC4023A12C2A40A";
const PX79: &str = "315D4B201C208475057D";
const PY79: &str = "035F3DF5AB370252450A";
const D79: &str = "02CE5177407B7258DC31";

fn eccp79() -> Ecdsa {
    let field = Field::from_hex(P79).expect("valid modulus");
    let a = field.element_from_hex(A79).expect("valid coefficient");
    let b = field.element_from_hex(B79).expect("valid coefficient");
    let curve = Curve::new(field.clone(), a, b).expect("non-singular curve");
    let px = field.element_from_hex(PX79).expect("valid coordinate");
    let py = field.element_from_hex(PY79).expect("valid coordinate");
    let base_point = curve.point(px, py).expect("point on curve");
    Ecdsa::new(field, curve, base_point)
}

fn bench_field_mul(c: &mut Criterion) {
    let field = Field::from_hex(P79).expect("valid modulus");
    let a = field.element_from_hex(A79).expect("valid coefficient");
    let b = field.element_from_hex(PX79).expect("valid coefficient");
    c.bench_function("field_mul_79bit", |bencher| {
        bencher.iter(|| black_box(a.mul(black_box(&b))));
    });
}

fn bench_field_div(c: &mut Criterion) {
    let field = Field::from_hex(P79).expect("valid modulus");
    let a = field.element_from_hex(A79).expect("valid coefficient");
    let b = field.element_from_hex(PX79).expect("valid coefficient");
    c.bench_function("field_div_79bit", |bencher| {
        bencher.iter(|| black_box(a.div(black_box(&b))).expect("divisor is non-zero"));
    });
}

fn bench_scalar_multiply(c: &mut Criterion) {
    let ecdsa = eccp79();
    let base_point = ecdsa.base_point();
    let d = ecdsa.field().element_from_hex(D79).expect("valid scalar");

    let mut group = c.benchmark_group("scalar_multiply");
    for width in [2u32, 3, 4, 5, 6] {
        let table = base_point.precompute_naf_points(width).expect("valid width");
        group.bench_with_input(BenchmarkId::new("width", width), &width, |bencher, &width| {
            bencher.iter(|| {
                black_box(
                    base_point
                        .multiply_with_table(black_box(&d), width, &table)
                        .expect("valid table"),
                )
            });
        });
    }
    group.finish();
}

fn bench_sign_and_verify(c: &mut Criterion) {
    let ecdsa = eccp79();
    let d = ecdsa.field().element_from_hex(D79).expect("valid scalar");
    let q = ecdsa.derive_public_key(&d);
    let message = ecdsa.field().element_from_hex("deadbeef").expect("valid message");
    let mut rng = OsRng;

    c.bench_function("ecdsa_sign_79bit", |bencher| {
        bencher.iter(|| black_box(ecdsa.sign(black_box(&message), black_box(&d), &mut rng)));
    });

    let signature = ecdsa.sign(&message, &d, &mut rng);
    c.bench_function("ecdsa_verify_79bit", |bencher| {
        bencher.iter(|| black_box(ecdsa.verify(black_box(&q), black_box(&message), black_box(&signature))));
    });
}

criterion_group!(
    benches,
    bench_field_mul,
    bench_field_div,
    bench_scalar_multiply,
    bench_sign_and_verify
);
criterion_main!(benches);
