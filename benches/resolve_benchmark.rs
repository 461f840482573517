use class_variants::{cx, AxisValue, Variants};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;

/// Build a component with `axes` axes of four values each plus one compound rule per axis
fn create_variants(axes: usize) -> Variants {
    let mut builder = Variants::builder("inline-flex items-center rounded-md font-medium");
    for axis in 0..axes {
        let values = (0..4).map(|value| {
            (
                format!("v{}", value),
                format!("axis{}-v{} hover:axis{}-v{}-hover", axis, value, axis, value),
            )
        });
        builder = builder
            .variant(format!("axis{}", axis), values)
            .default_value(format!("axis{}", axis), "v0");
    }
    for axis in 1..axes {
        builder = builder.compound(
            [
                (format!("axis{}", axis - 1), AxisValue::from("v1")),
                (format!("axis{}", axis), AxisValue::from("v0")),
            ],
            format!("compound-{}", axis),
        );
    }
    builder.build().unwrap()
}

fn benchmark_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    for axes in [2, 8, 32].iter() {
        let variants = create_variants(*axes);
        let defaults = json!({});
        let mut explicit = serde_json::Map::new();
        for axis in 0..*axes {
            explicit.insert(format!("axis{}", axis), json!("v1"));
        }

        group.bench_with_input(BenchmarkId::new("defaults", axes), axes, |b, _| {
            b.iter(|| black_box(variants.resolve(black_box(&defaults))))
        });
        group.bench_with_input(BenchmarkId::new("explicit", axes), axes, |b, _| {
            b.iter(|| black_box(variants.resolve(black_box(&explicit))))
        });
    }

    group.finish();
}

fn benchmark_cx(c: &mut Criterion) {
    let nested = vec![vec!["d", "e"], vec!["f", "g", "h"]];
    c.bench_function("cx_nested", |b| {
        b.iter(|| black_box(cx!("a", ["b", "c"], black_box(&nested), Some("i"))))
    });
}

criterion_group!(benches, benchmark_resolve, benchmark_cx);
criterion_main!(benches);
