use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rc_runtime::ffi::{array_push_int, rc_drop, rc_new_ints, rc_take};
use rc_runtime::{create, create_integers, push_integer};

fn bench_refcount(c: &mut Criterion) {
    let obj = create_integers(&[1, 2, 3]).expect("create");

    c.bench_function("retain_release", |b| {
        b.iter(|| {
            let extra = black_box(obj.retain());
            black_box(extra.release());
        });
    });

    let handle = unsafe { rc_new_ints([1, 2, 3].as_ptr(), 3) };
    c.bench_function("ffi_take_drop", |b| {
        b.iter(|| {
            rc_take(black_box(handle));
            rc_drop(black_box(handle));
        });
    });
    rc_drop(handle);
}

fn bench_create(c: &mut Criterion) {
    let mut group = c.benchmark_group("create");

    for size in [0usize, 16, 256].iter() {
        let bytes = vec![b'x'; *size];
        group.bench_with_input(BenchmarkId::new("text", size), &bytes, |b, bytes| {
            b.iter(|| create(black_box(bytes)).expect("create"));
        });

        let ints: Vec<i32> = (0..*size as i32).collect();
        group.bench_with_input(BenchmarkId::new("integers", size), &ints, |b, ints| {
            b.iter(|| create_integers(black_box(ints)).expect("create"));
        });
    }

    group.finish();
}

fn bench_push(c: &mut Criterion) {
    c.bench_function("push_unique_1000", |b| {
        b.iter(|| {
            let mut arr = create_integers(&[]).expect("create");
            for i in 0..1000 {
                push_integer(&mut arr, black_box(i)).expect("push");
            }
            arr
        });
    });

    c.bench_function("ffi_push_1000", |b| {
        b.iter(|| {
            let mut arr = unsafe { rc_new_ints(core::ptr::null(), 0) };
            for i in 0..1000 {
                arr = array_push_int(arr, black_box(i));
            }
            rc_drop(arr);
        });
    });
}

criterion_group!(benches, bench_refcount, bench_create, bench_push);
criterion_main!(benches);
