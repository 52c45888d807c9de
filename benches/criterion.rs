#[macro_use]
extern crate criterion;
extern crate cellpart;
use cellpart::{Catalog, SearchContext, Universe};
use criterion::Criterion;

fn _1_catalog_build(c: &mut Criterion) {
    let universe = Universe::hypercube(3).unwrap();
    c.bench_function("_1_catalog_build", |b| {
        b.iter(|| Catalog::build(&universe, 8))
    });
}

fn _2_enumerate_hypercube_3(c: &mut Criterion) {
    let universe = Universe::hypercube(3).unwrap();
    let catalog = Catalog::build(&universe, 8);
    c.bench_function("_2_enumerate_hypercube_3", |b| {
        b.iter(|| {
            let mut context = SearchContext::new(&universe, &catalog);
            let mut out = Vec::new();
            let mut found = 0;
            for first in 1..=8 {
                found += context.run_pass(first, &mut out).unwrap();
            }
            found
        })
    });
}

fn _3_enumerate_grid_3x3(c: &mut Criterion) {
    let universe = Universe::grid(3, 3).unwrap();
    let catalog = Catalog::build(&universe, 9);
    c.bench_function("_3_enumerate_grid_3x3", |b| {
        b.iter(|| {
            let mut context = SearchContext::new(&universe, &catalog);
            let mut out = Vec::new();
            let mut found = 0;
            for first in 1..=9 {
                found += context.run_pass(first, &mut out).unwrap();
            }
            found
        })
    });
}

criterion_group!(
    benches,
    _1_catalog_build,
    _2_enumerate_hypercube_3,
    _3_enumerate_grid_3x3
);
criterion_main!(benches);
