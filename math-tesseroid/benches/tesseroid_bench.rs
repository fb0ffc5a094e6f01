use criterion::{black_box, criterion_group, criterion_main, Criterion};
use math_tesseroid::{
    Field, ObservationPoints, Tesseroid, TesseroidConfig, evaluate, evaluate_adaptive,
    evaluate_direct,
};
use ndarray::Array1;

fn grid(n: usize, height: f64, mean_radius: f64) -> ObservationPoints {
    let mut lon = Vec::with_capacity(n * n);
    let mut lat = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            lon.push(-5.0 + 10.0 * i as f64 / (n - 1) as f64);
            lat.push(-5.0 + 10.0 * j as f64 / (n - 1) as f64);
        }
    }
    let height = vec![height; n * n];
    ObservationPoints::from_geographic(&lon, &lat, &height, mean_radius).unwrap()
}

fn bench_direct(c: &mut Criterion) {
    let config = TesseroidConfig::default();
    let tess = Tesseroid::new(-0.5, 0.5, -0.5, 0.5, 0.0, -10_000.0).unwrap();
    let points = grid(50, 250_000.0, config.mean_radius);
    let indices: Vec<usize> = (0..points.len()).collect();

    for field in [Field::Potential, Field::Gz, Field::Gzz] {
        c.bench_function(&format!("direct_{}_2500_points", field), |b| {
            let mut result = Array1::zeros(points.len());
            b.iter(|| {
                evaluate_direct(&tess, 2670.0, &points, &indices, field, &config, &mut result)
                    .unwrap();
                black_box(&result);
            })
        });
    }
}

fn bench_adaptive(c: &mut Criterion) {
    let config = TesseroidConfig::default();
    let tess = Tesseroid::new(-1.0, 1.0, -1.0, 1.0, 0.0, -10_000.0).unwrap();
    // Low flight over the cell: every point needs refinement
    let points = grid(10, 2_000.0, config.mean_radius);
    let indices: Vec<usize> = (0..points.len()).collect();

    c.bench_function("adaptive_gzz_low_flight", |b| {
        let mut result = Array1::zeros(points.len());
        b.iter(|| {
            black_box(
                evaluate_adaptive(
                    &tess,
                    2670.0,
                    config.ratio_for(Field::Gzz),
                    &points,
                    &indices,
                    Field::Gzz,
                    &config,
                    &mut result,
                )
                .unwrap(),
            );
        })
    });

    let mixed = grid(30, 10_000.0, config.mean_radius);
    c.bench_function("evaluate_gz_mixed_distances", |b| {
        let mut result = Array1::zeros(mixed.len());
        b.iter(|| {
            black_box(
                evaluate(
                    &tess,
                    2670.0,
                    config.ratio_for(Field::Gz),
                    &mixed,
                    Field::Gz,
                    &config,
                    &mut result,
                )
                .unwrap(),
            );
        })
    });
}

criterion_group!(benches, bench_direct, bench_adaptive);
criterion_main!(benches);
