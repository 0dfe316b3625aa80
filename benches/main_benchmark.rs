use radixfloat::{decode, encode, Format, FP64};

fn values() -> [f64; 8] {
    [
        0.1,
        1.0 / 3.0,
        123456.789,
        6.02214076e23,
        1.602176634e-19,
        f64::MAX,
        f64::MIN_POSITIVE,
        f64::from_bits(1),
    ]
}

fn test_encode_shortest() {
    let format = Format::round_trip(FP64);
    for v in values() {
        black_box(encode(v, &format).ok());
    }
}

fn test_encode_scientific() {
    let format = Format::scientific(16);
    for v in values() {
        black_box(encode(v, &format).ok());
    }
}

fn test_encode_exact() {
    let format = Format::exact();
    for v in values() {
        black_box(encode(v, &format).ok());
    }
}

fn test_encode_hex() {
    let format = Format::hex_float(13);
    for v in values() {
        black_box(encode(v, &format).ok());
    }
}

fn test_decode() {
    let format = Format::default();
    let inputs = [
        "0.1",
        "0.3333333333333333",
        "123456.789",
        "6.02214076e23",
        "1.602176634e-19",
        "1.7976931348623157e308",
        "2.2250738585072014e-308",
        "4.9e-324",
    ];
    for s in inputs {
        black_box(decode::<f64>(s, &format).ok());
    }
}

fn test_decode_long() {
    let format = Format::default();
    let s = encode(f64::from_bits(1), &Format::exact()).unwrap_or_default();
    black_box(decode::<f64>(&s, &format).ok());
}

use criterion::{black_box, criterion_group, criterion_main, Criterion};

pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("test_encode_shortest", |b| b.iter(test_encode_shortest));
    c.bench_function("test_encode_scientific", |b| b.iter(test_encode_scientific));
    c.bench_function("test_encode_exact", |b| b.iter(test_encode_exact));
    c.bench_function("test_encode_hex", |b| b.iter(test_encode_hex));
    c.bench_function("test_decode", |b| b.iter(test_decode));
    c.bench_function("test_decode_long", |b| b.iter(test_decode_long));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
