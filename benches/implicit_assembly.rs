use criterion::{black_box, Criterion, criterion_group, criterion_main};
use bcrs_assembly::{BcrsMatrix, BuildMode};

const N: usize = 100;

/// 5-point Laplacian on an N×N grid, assembled element by element so that
/// every interior position receives several contributions.
fn assemble_laplacian(avg: f64, overflow: f64) -> BcrsMatrix<f64> {
    let n = N * N;
    let mut a = BcrsMatrix::new_implicit(n, n, avg, overflow).unwrap();
    for gy in 0..N {
        for gx in 0..N {
            let p = gy * N + gx;
            *a.entry(p, p).unwrap() += 4.0;
            for (dx, dy) in [(-1i64, 0i64), (1, 0), (0, -1), (0, 1)] {
                let (nx, ny) = (gx as i64 + dx, gy as i64 + dy);
                if (0..N as i64).contains(&nx) && (0..N as i64).contains(&ny) {
                    *a.entry(p, ny as usize * N + nx as usize).unwrap() -= 1.0;
                }
            }
        }
    }
    a.compress().unwrap();
    a
}

fn bench_assembly(c: &mut Criterion) {
    c.bench_function("implicit assembly, exact average", |ben| {
        ben.iter(|| black_box(assemble_laplacian(5.0, 0.0)))
    });

    c.bench_function("implicit assembly, underestimated average", |ben| {
        ben.iter(|| black_box(assemble_laplacian(3.0, 0.7)))
    });

    c.bench_function("random assembly", |ben| {
        ben.iter(|| {
            let n = N * N;
            let mut a = BcrsMatrix::<f64>::with_size(n, n, BuildMode::Random).unwrap();
            for p in 0..n {
                a.set_row_size(p, 3.min(n - p)).unwrap();
            }
            a.end_row_sizes().unwrap();
            for p in 0..n {
                for q in p..(p + 3).min(n) {
                    a.add_index(p, q).unwrap();
                }
            }
            black_box(a.end_indices().unwrap())
        })
    });

    let a = assemble_laplacian(5.0, 0.0);
    let x: Vec<f64> = (0..N * N).map(|i| (i as f64).sin()).collect();
    let mut y = vec![0.0; N * N];
    c.bench_function("mv", |ben| ben.iter(|| a.mv(black_box(&x), &mut y).unwrap()));
}

criterion_group!(benches, bench_assembly);
criterion_main!(benches);
