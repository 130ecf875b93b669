use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;
use uuid::Uuid;

use planora::domain::models::{Money, Service};
use planora::services::{select_cheapest, validate};

fn catalog(size: usize) -> Vec<Service> {
    let vendor = Uuid::new_v4();
    (0..size)
        .map(|i| {
            // Spread prices so that roughly half the catalog fits the budget.
            let cents = ((i * 7_919) % 20_000) as i64 + 100;
            Service::new(format!("Service {i}"), Money::from_cents(cents), vendor, "s.png")
        })
        .collect()
}

fn bench_select_cheapest(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection.fallback");
    for size in [10, 50, 500] {
        let services = catalog(size);
        let budget = Some(Money::from_units(size as i64 * 50));
        group.bench_with_input(BenchmarkId::from_parameter(size), &services, |b, services| {
            b.iter(|| select_cheapest(black_box(services), black_box(budget)));
        });
    }
    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection.validate");
    for size in [10, 50, 500] {
        let services = catalog(size);
        let ids: Vec<_> = services
            .iter()
            .rev()
            .map(|s| json!({ "id": s.id, "reason": "matches the theme" }))
            .collect();
        let raw = format!("Here is my pick:\n{}", json!({ "selection": ids, "rationale": "ok" }));
        let budget = Some(Money::from_units(size as i64 * 50));
        group.bench_with_input(BenchmarkId::from_parameter(size), &raw, |b, raw| {
            b.iter(|| validate(black_box(raw), black_box(&services), black_box(budget)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_select_cheapest, bench_validate);
criterion_main!(benches);
