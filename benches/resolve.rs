#![allow(dead_code)]

use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;
use wirebox::{capability, Registry};

trait Service: Send + Sync {
    fn id(&self) -> u32;
}

struct A;
struct B(Arc<dyn Service>);

impl Service for A {
    fn id(&self) -> u32 {
        1
    }
}

impl Service for B {
    fn id(&self) -> u32 {
        self.0.id() + 1
    }
}

capability!(dyn Service = [A, B]);

struct Leaf(u32);

capability!(Leaf);

struct Counted(Arc<Leaf>);

impl Service for Counted {
    fn id(&self) -> u32 {
        self.0 .0
    }
}

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("resolve_eager", |b| {
        let registry = Registry::new();
        registry.register_singleton::<dyn Service, _>(A).unwrap();

        b.iter(|| registry.resolve::<dyn Service>().unwrap());
    })
    .bench_function("resolve_lazy_forced", |b| {
        let registry = Registry::new();
        registry.register_lazy_singleton::<dyn Service, _, _>(|| Ok(A));
        registry.resolve::<dyn Service>().unwrap();

        b.iter(|| registry.resolve::<dyn Service>().unwrap());
    })
    .bench_function("resolve_transient", |b| {
        let registry = Registry::new();
        registry.register_transient::<Leaf, _, _>(|| Ok(Leaf(1)));

        b.iter(|| registry.resolve::<Leaf>().unwrap());
    })
    .bench_function("resolve_transient_chain", |b| {
        let registry = Registry::new();
        registry.register_lazy_singleton::<Leaf, _, _>(|| Ok(Leaf(1)));
        registry.register_transient::<dyn Service, _, _>({
            let registry = registry.clone();
            move || {
                let leaf = registry.resolve::<Leaf>()?;
                Ok(B(Arc::new(Counted(leaf))))
            }
        });

        b.iter(|| registry.resolve::<dyn Service>().unwrap());
    })
    .bench_function("resolve_missing", |b| {
        let registry = Registry::new();

        b.iter(|| registry.resolve_or_default::<Leaf>());
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
