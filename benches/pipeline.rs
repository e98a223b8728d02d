use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use rule_pipeline::bridge::{transform, Delimited, Structured, TextRow};
use rule_pipeline::processing::run;
use rule_pipeline::rules::{AggregateOp, AggregationRule, FilterRule, MappingRule, RuleSet};
use rule_pipeline::types::{Record, Value};

fn rows(n: usize) -> Vec<TextRow> {
    (0..n)
        .map(|i| {
            vec![
                ("Id".to_string(), i.to_string()),
                ("Name".to_string(), format!("user{i}")),
                ("Age".to_string(), (i % 90).to_string()),
                ("Amount".to_string(), if i % 7 == 0 { "n/a".to_string() } else { format!("{}.5", i % 100) }),
            ]
        })
        .collect()
}

fn records(n: usize) -> Vec<Record> {
    rows(n)
        .into_iter()
        .map(|row| row.into_iter().map(|(k, v)| (k, Value::String(v))).collect())
        .collect()
}

fn rules() -> RuleSet {
    RuleSet {
        filter: vec![FilterRule::new("Age", ">18"), FilterRule::new("*", "<100000")],
        mapping: MappingRule {
            lowered_field_names: true,
            ..Default::default()
        },
        aggregation: vec![
            AggregationRule::new(AggregateOp::Sum, "amount", "total_<column>"),
            AggregationRule::new(AggregateOp::Count, "*", "n_<column>"),
        ],
    }
}

fn bench_run(c: &mut Criterion) {
    let rules = rules();
    let mut group = c.benchmark_group("run");
    for n in [1_000, 10_000] {
        let input = records(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &input, |b, input| {
            b.iter(|| run(black_box(input), black_box(&rules)))
        });
    }
    group.finish();
}

fn bench_csv_to_json(c: &mut Criterion) {
    let rules = rules();
    let input = rows(10_000);
    c.bench_function("transform_csv_to_json_10k", |b| {
        b.iter(|| transform::<Delimited, Structured>(black_box(input.clone()), &rules))
    });
}

criterion_group!(benches, bench_run, bench_csv_to_json);
criterion_main!(benches);
