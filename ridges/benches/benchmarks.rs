use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ridges::{
    math::{downsample, project, rescale},
    repair_gaps,
};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

const NODATA: f64 = -999_999.0;

/// A full-width California row: 11 one-third arcsecond tiles.
fn synthetic_row() -> Vec<f64> {
    (0..11 * 10_812)
        .map(|i| {
            if i % 97 == 0 {
                NODATA
            } else {
                f64::from(i % 4_000)
            }
        })
        .collect()
}

fn ridge_row(c: &mut Criterion) {
    let mut group = c.benchmark_group("Ridge Row");
    let row = synthetic_row();

    group.bench_function("repair_gaps", |b| {
        b.iter(|| repair_gaps(black_box(&row), |s| s == NODATA).unwrap())
    });

    group.bench_function("rescale+downsample+project", |b| {
        b.iter(|| {
            let mut row = row.clone();
            rescale(&mut row, 1.0 / 4_418.0, 37.5);
            let mut y = downsample(black_box(&row), 100).unwrap();
            project(&mut y);
            y
        })
    });
}

criterion_group!(benches, ridge_row);
criterion_main!(benches);
