use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use criterion::{criterion_group, criterion_main, Criterion};
use qualify::{Attribute, FieldCatalog, RuleEditor};

/// Script one authoring session: add a handful of rules, pick fields and
/// operators, and read back options the way a UI redraw would.
fn author_session(catalog: &Arc<FieldCatalog>) -> usize {
    let mut ed = RuleEditor::new(Arc::clone(catalog));
    let products = ed.add();
    ed.update(products, Attribute::Field, "products");
    ed.update(products, Attribute::Operator, "contains_any");
    let cart = ed.add();
    ed.update(cart, Attribute::Field, "cart_value");
    ed.update(cart, Attribute::Operator, "between");
    ed.update(cart, Attribute::Value, "10");
    ed.update(cart, Attribute::SecondValue, "90");
    let collections = ed.add();
    ed.update(collections, Attribute::Field, "collections");
    let disabled = ed
        .operator_options("collections")
        .iter()
        .filter(|o| o.disabled)
        .count();
    disabled + ed.field_options().len() + ed.snapshot().len()
}

fn bench_throughput(c: &mut Criterion) {
    let thread_counts = [1, 2, 4, 8];

    let mut group = c.benchmark_group("throughput");
    group.measurement_time(Duration::from_secs(5));

    for &threads in &thread_counts {
        let catalog = Arc::new(FieldCatalog::builtin());

        group.bench_function(&format!("{threads}_threads"), |b| {
            b.iter_custom(|iters| {
                let per_thread = iters / threads as u64;
                let handles: Vec<_> = (0..threads)
                    .map(|_| {
                        let cat = Arc::clone(&catalog);
                        thread::spawn(move || {
                            let start = Instant::now();
                            for _ in 0..per_thread {
                                let _ = author_session(&cat);
                            }
                            start.elapsed()
                        })
                    })
                    .collect();

                let mut max_elapsed = Duration::ZERO;
                for h in handles {
                    let elapsed = h.join().unwrap();
                    if elapsed > max_elapsed {
                        max_elapsed = elapsed;
                    }
                }
                max_elapsed
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_throughput);
criterion_main!(benches);
