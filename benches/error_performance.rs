// benches/error_performance.rs
//! Benchmarks for the normalization hot paths: fresh construction, wrapping
//! foreign errors, challenge rendering, and payload serialization.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rampart_errors::{Challenge, Normalizer};

fn bench_create(c: &mut Criterion) {
    let errors = Normalizer::new();

    c.bench_function("create/no_message", |b| {
        b.iter(|| black_box(errors.create(black_box(404), None, None)))
    });

    c.bench_function("create/with_message", |b| {
        b.iter(|| black_box(errors.create(black_box(400), Some("missing field"), None)))
    });

    c.bench_function("create/with_data", |b| {
        b.iter(|| {
            black_box(errors.create(
                black_box(409),
                Some("conflict"),
                Some(serde_json::json!({ "resource": "user", "id": 42 })),
            ))
        })
    });
}

fn bench_wrap(c: &mut Criterion) {
    let errors = Normalizer::new();

    c.bench_function("wrap/foreign_error", |b| {
        b.iter(|| {
            let cause = std::io::Error::new(std::io::ErrorKind::InvalidData, "parse fail");
            black_box(errors.wrap(black_box(cause)))
        })
    });

    c.bench_function("wrap/already_normalized", |b| {
        b.iter(|| {
            let err = errors.bad_request(Some("original"), None);
            black_box(errors.wrap(black_box(err)))
        })
    });

    c.bench_function("wrap/with_prefix", |b| {
        b.iter(|| {
            let cause = std::io::Error::new(std::io::ErrorKind::InvalidData, "parse fail");
            black_box(errors.wrap_with(black_box(cause), 500, Some("ctx")))
        })
    });
}

fn bench_challenge(c: &mut Criterion) {
    let errors = Normalizer::new();

    c.bench_function("challenge/named_scheme", |b| {
        b.iter(|| {
            let challenge = Challenge::named("Bearer")
                .attribute("realm", "api")
                .attribute("scope", "read write");
            black_box(errors.unauthorized_with(Some("bad creds"), challenge))
        })
    });

    c.bench_function("challenge/list", |b| {
        b.iter(|| {
            let challenge = Challenge::list(["Basic", "Bearer realm=\"api\""]);
            black_box(errors.unauthorized_with(None, challenge))
        })
    });
}

fn bench_payload_serialization(c: &mut Criterion) {
    let errors = Normalizer::new();
    let err = errors.bad_request(Some("missing field"), None);

    c.bench_function("payload/to_json", |b| {
        b.iter(|| black_box(serde_json::to_string(err.payload()).unwrap()))
    });
}

fn bench_notification(c: &mut Criterion) {
    let errors = Normalizer::new();
    for _ in 0..8 {
        errors.subscribe(|err| {
            black_box(err.status_code());
        });
    }

    c.bench_function("notify/eight_observers", |b| {
        b.iter(|| black_box(errors.not_found(None, None)))
    });
}

criterion_group!(
    benches,
    bench_create,
    bench_wrap,
    bench_challenge,
    bench_payload_serialization,
    bench_notification
);
criterion_main!(benches);
