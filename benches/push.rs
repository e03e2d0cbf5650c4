use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dynarr::{DynArr, StringArr};

fn bench_push_std(c: &mut Criterion) {
	c.bench_function("std_vec_push", |b| {
		b.iter(|| {
			let mut v = Vec::new();
			for i in 0..1000 {
				v.push(black_box(i));
			}
			v
		})
	});
}

fn bench_push_dynarr(c: &mut Criterion) {
	c.bench_function("dynarr_push", |b| {
		b.iter(|| {
			let mut v: DynArr<i32> = DynArr::new();
			for i in 0..1000 {
				v.push(black_box(i)).unwrap();
			}
			v
		})
	});
}

fn bench_insert_front(c: &mut Criterion) {
	c.bench_function("dynarr_insert_front", |b| {
		b.iter(|| {
			let mut v: DynArr<i32> = DynArr::new();
			for i in 0..1000 {
				v.insert(0, black_box(i)).unwrap();
			}
			v
		})
	});
}

fn bench_deep_copy_strings(c: &mut Criterion) {
	let mut v = StringArr::new();
	for i in 0..1000 {
		v.push(i.to_string()).unwrap();
	}
	c.bench_function("dynarr_deep_copy_strings", |b| {
		b.iter(|| black_box(&v).deep_copy().unwrap())
	});
}

criterion_group!(benches, bench_push_std, bench_push_dynarr, bench_insert_front, bench_deep_copy_strings);
criterion_main!(benches);
