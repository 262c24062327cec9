use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use qualify::{Attribute, FieldCatalog, RuleEditor};

const FIELDS: &[&str] = &[
    "collections",
    "product_tags",
    "products",
    "subscribed",
    "discount_codes",
    "cart_value",
];

/// Build a session with `n` rules spread across every builtin field, each
/// with its first operator chosen.
fn build_session(n: usize) -> RuleEditor {
    let catalog = Arc::new(FieldCatalog::builtin());
    let mut ed = RuleEditor::new(Arc::clone(&catalog));
    for i in 0..n {
        let field = FIELDS[i % FIELDS.len()];
        let id = ed.add();
        ed.update(id, Attribute::Field, field);
        let op = catalog.operators_of(field)[0].id.clone();
        ed.update(id, Attribute::Operator, op);
    }
    ed
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("update");

    for &n in &[5, 20, 50] {
        let ed = build_session(n);
        let target = ed.rules()[n / 2].id();

        group.bench_function(&format!("{n}_rules_field_change"), |b| {
            b.iter(|| {
                let mut ed = ed.clone();
                ed.update(target, Attribute::Field, black_box("cart_value"));
                ed
            });
        });

        group.bench_function(&format!("{n}_rules_value_change"), |b| {
            b.iter(|| {
                let mut ed = ed.clone();
                ed.update(target, Attribute::Value, black_box("42"));
                ed
            });
        });
    }

    group.finish();
}

fn bench_options(c: &mut Criterion) {
    let mut group = c.benchmark_group("options");

    for &n in &[5, 20, 50] {
        let ed = build_session(n);

        group.bench_function(&format!("{n}_rules_field_options"), |b| {
            b.iter(|| black_box(ed.field_options()));
        });

        group.bench_function(&format!("{n}_rules_operator_options"), |b| {
            b.iter(|| black_box(ed.operator_options(black_box("collections"))));
        });
    }

    group.finish();
}

fn bench_catalog(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog");

    group.bench_function("builtin", |b| {
        b.iter(|| black_box(FieldCatalog::builtin()));
    });

    let dsl = r#"
field collections "Specific Collections" (priority 1) exclusive products:
    - contains_any "Contains Any" inclusion
    - is_not "Is Not" exclusion
field products "Specific Products" (priority 3) exclusive collections:
    - equals_anything "Equals Anything" neutral
    - contains_any "Contains Any" inclusion
    - is_not "Is Not" exclusion
field cart_value "Cart Value Range" (priority 6) numeric range between:
    - gte "Is Equal or Greater Than"
    - between "Is Between"
    - lt "Is Less Than"
"#;
    group.bench_function("from_dsl", |b| {
        b.iter(|| black_box(FieldCatalog::from_dsl(black_box(dsl)).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_update, bench_options, bench_catalog);
criterion_main!(benches);
