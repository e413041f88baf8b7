//! Assemble a 1D Poisson matrix from element contributions and report the
//! compression statistics.
//!
//! Run with `RUST_LOG=debug cargo run --example poisson_assembly` to see the
//! capacity plan and compression logged.

use bcrs_assembly::{BcrsMatrix, MatrixError};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), MatrixError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let n = 50;
    let mut a = BcrsMatrix::<f64>::new_implicit(n, n, 3.0, 0.05)?;
    // each element couples nodes e and e+1; interior diagonals get two contributions
    for e in 0..n - 1 {
        for (i, j, v) in [(e, e, 1.0), (e, e + 1, -1.0), (e + 1, e, -1.0), (e + 1, e + 1, 1.0)] {
            *a.entry(i, j)? += v;
        }
    }
    let stats = a.compress()?;
    println!(
        "n = {n}, nnz = {}, avg = {:.2}, max = {}, overflow = {}",
        a.nonzeroes(),
        stats.avg,
        stats.maximum,
        stats.overflow_total
    );

    let x = vec![1.0; n];
    let mut y = vec![0.0; n];
    a.mv(&x, &mut y)?;
    println!("|A 1|_inf = {:e}, |A|_F = {:.4}", y.iter().fold(0.0_f64, |m, v| m.max(v.abs())), a.frobenius_norm()?);
    Ok(())
}
