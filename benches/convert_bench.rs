use criterion::{black_box, criterion_group, criterion_main, Criterion};

use gridref::batch;
use gridref::{GeodeticPoint, MgrsReference, OsGridRef, ReferenceKind, UtmReference};

fn make_points(n: usize) -> Vec<GeodeticPoint> {
    (0..n)
        .map(|i| {
            let t = i as f64 / n as f64;
            GeodeticPoint::new(-75.0 + t * 155.0, -175.0 + t * 350.0, 0.0)
        })
        .collect()
}

fn make_gb_points(n: usize) -> Vec<GeodeticPoint> {
    (0..n)
        .map(|i| {
            let t = i as f64 / n as f64;
            GeodeticPoint::new(50.5 + t * 8.0, -5.0 + t * 6.0, 0.0)
        })
        .collect()
}

fn bench_utm_forward(c: &mut Criterion) {
    let p = GeodeticPoint::new(48.8582, 2.2945, 0.0);
    c.bench_function("utm_forward", |b| b.iter(|| black_box(p).to_utm().unwrap()));
}

fn bench_utm_inverse(c: &mut Criterion) {
    let utm: UtmReference = "31 N 448251.795 5411932.678".parse().unwrap();
    c.bench_function("utm_inverse", |b| b.iter(|| black_box(utm).to_geodetic()));
}

fn bench_national_grid(c: &mut Criterion) {
    let p = GeodeticPoint::new(52.657_57, 1.717_92, 0.0);
    let grid = OsGridRef::new(651_409.903, 313_177.270).unwrap();

    c.bench_function("national_grid_forward", |b| {
        b.iter(|| black_box(p).to_os_grid().unwrap())
    });
    c.bench_function("national_grid_inverse", |b| {
        b.iter(|| black_box(&grid).to_geodetic().unwrap())
    });
}

fn bench_cartesian(c: &mut Criterion) {
    let p = GeodeticPoint::new(50.797_814, 4.359_165, 148.964);
    let ecef = p.to_cartesian();
    c.bench_function("cartesian_to_geodetic", |b| {
        b.iter(|| black_box(ecef).to_geodetic())
    });
}

fn bench_parsing(c: &mut Criterion) {
    c.bench_function("parse_mgrs", |b| {
        b.iter(|| black_box("31U DQ 48251 11932").parse::<MgrsReference>().unwrap())
    });
    c.bench_function("parse_utm", |b| {
        b.iter(|| black_box("31 N 448251.795 5411932.678").parse::<UtmReference>().unwrap())
    });
    c.bench_function("parse_os_grid", |b| {
        b.iter(|| black_box("TG 51409 13177").parse::<OsGridRef>().unwrap())
    });
}

fn bench_batch(c: &mut Criterion) {
    let n = 100_000_usize;
    let points = make_points(n);
    let gb = make_gb_points(n);

    c.bench_function("batch_utm_100k", |b| {
        b.iter(|| black_box(batch::to_utm(&points)))
    });
    c.bench_function("batch_mgrs_100k", |b| {
        b.iter(|| black_box(batch::to_mgrs(&points)))
    });
    c.bench_function("batch_os_grid_100k", |b| {
        b.iter(|| black_box(batch::to_os_grid(&gb)))
    });

    let refs: Vec<String> = batch::to_mgrs(&points[..10_000])
        .into_iter()
        .filter_map(|r| r.ok())
        .map(|m| m.to_string())
        .collect();
    c.bench_function("batch_convert_mgrs_to_geodetic_10k", |b| {
        b.iter(|| {
            black_box(batch::convert(
                refs.as_slice(),
                ReferenceKind::Mgrs,
                ReferenceKind::Geodetic,
            ))
        })
    });
}

fn bench_batch_thread_scaling(c: &mut Criterion) {
    let points = make_points(100_000);

    for &threads in &[1, 2, 4, 8] {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap();

        c.bench_function(&format!("batch_utm_threads_{threads}"), |b| {
            b.iter(|| black_box(pool.install(|| batch::to_utm(&points))))
        });
    }
}

criterion_group!(
    benches,
    bench_utm_forward,
    bench_utm_inverse,
    bench_national_grid,
    bench_cartesian,
    bench_parsing,
    bench_batch,
    bench_batch_thread_scaling
);
criterion_main!(benches);
