// Copyright 2025 Irreducible Inc.

use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use schreier_field::{BinaryPrimeField, PolyRing, WordPrimeField};
use schreier_tower::{FieldId, Tower};

fn tower_of_height<A: PolyRing>(fp: A, height: usize) -> (Tower<A>, FieldId) {
	let mut tower = Tower::new(fp).unwrap();
	let mut rng = StdRng::seed_from_u64(0);
	let mut id = tower.create_field(1, &mut rng).unwrap();
	for _ in 0..height {
		id = tower.extend(id).unwrap();
	}
	(tower, id)
}

fn bench_embedding(c: &mut Criterion) {
	let mut group = c.benchmark_group("embedding");

	let (t2, k2) = tower_of_height(BinaryPrimeField::new(), 8);
	let mut rng = StdRng::seed_from_u64(1);
	let a2 = t2.field(k2).unwrap().random(&mut rng);
	let d2 = t2.push_down(&a2).unwrap();
	group.bench_function("push_down/p2_deg256", |bench| {
		bench.iter(|| t2.push_down(&a2).unwrap());
	});
	group.bench_function("lift_up/p2_deg256", |bench| {
		bench.iter(|| t2.lift_up(&d2).unwrap());
	});

	let (t5, k5) = tower_of_height(WordPrimeField::new(5).unwrap(), 3);
	let a5 = t5.field(k5).unwrap().random(&mut rng);
	let d5 = t5.push_down(&a5).unwrap();
	group.bench_function("push_down/p5_deg125", |bench| {
		bench.iter(|| t5.push_down(&a5).unwrap());
	});
	group.bench_function("lift_up/p5_deg125", |bench| {
		bench.iter(|| t5.lift_up(&d5).unwrap());
	});
}

fn bench_roots(c: &mut Criterion) {
	let mut group = c.benchmark_group("roots");

	let (t2, k2) = tower_of_height(BinaryPrimeField::new(), 6);
	let mut rng = StdRng::seed_from_u64(2);
	let w = t2.field(k2).unwrap().random(&mut rng);
	let alpha = t2.sub(&t2.pow(&w, 2).unwrap(), &w).unwrap();
	group.bench_function("couveignes/p2_deg64", |bench| {
		bench.iter(|| t2.couveignes(k2, &alpha).unwrap());
	});

	let (t3, k3) = tower_of_height(WordPrimeField::new(3).unwrap(), 3);
	let w = t3.field(k3).unwrap().random(&mut rng);
	let alpha = t3.sub(&t3.pow(&w, 3).unwrap(), &w).unwrap();
	group.bench_function("couveignes/p3_deg27", |bench| {
		bench.iter(|| t3.couveignes(k3, &alpha).unwrap());
	});
}

criterion_group!(tower, bench_embedding, bench_roots);
criterion_main!(tower);
