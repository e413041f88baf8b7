//! Entry types stored in a block sparse matrix.
//!
//! A matrix entry is either a scalar or a small dense block. Assembly only
//! needs a zero value and accumulation; the compressed matrix additionally
//! needs scaling, norms and the local block mat-vec kernels. All of that is
//! captured by the [`Block`] capability trait.

use std::fmt;
use std::ops::{AddAssign, SubAssign};

use num_traits::Float;

/// Capabilities required from a matrix entry.
pub trait Block: Clone + fmt::Debug + PartialEq + AddAssign + SubAssign + Send + Sync {
    /// Underlying scalar field.
    type Field: Float + fmt::Debug + Send + Sync + 'static;

    /// Scalar rows per block.
    const ROWS: usize;
    /// Scalar columns per block.
    const COLS: usize;

    /// Additive identity.
    fn zero() -> Self;

    /// Set every scalar component to `value`.
    fn fill(&mut self, value: Self::Field);

    /// Multiply in place by `alpha`.
    fn scale(&mut self, alpha: Self::Field);

    /// `self += alpha * other`.
    fn axpy(&mut self, alpha: Self::Field, other: &Self);

    /// Scalar component at local position (`r`, `c`).
    fn at(&self, r: usize, c: usize) -> Self::Field;

    /// Sum of squared components.
    fn frobenius_norm2(&self) -> Self::Field;

    /// Maximum absolute row sum.
    fn infinity_norm(&self) -> Self::Field;

    /// Infinity norm using the Manhattan norm for components.
    ///
    /// Identical to [`Block::infinity_norm`] for real fields.
    fn infinity_norm_real(&self) -> Self::Field {
        self.infinity_norm()
    }

    /// `y += alpha * B x` with `x.len() == COLS`, `y.len() == ROWS`.
    fn usmv(&self, alpha: Self::Field, x: &[Self::Field], y: &mut [Self::Field]);

    /// `y += alpha * Bᵀ x` with `x.len() == ROWS`, `y.len() == COLS`.
    fn usmtv(&self, alpha: Self::Field, x: &[Self::Field], y: &mut [Self::Field]);

    /// `y += alpha * Bᴴ x`; the conjugate is the identity on real fields.
    fn usmhv(&self, alpha: Self::Field, x: &[Self::Field], y: &mut [Self::Field]) {
        self.usmtv(alpha, x, y)
    }
}

macro_rules! scalar_block {
    ($($t:ty),*) => {$(
        impl Block for $t {
            type Field = $t;
            const ROWS: usize = 1;
            const COLS: usize = 1;

            fn zero() -> Self { 0.0 }
            fn fill(&mut self, value: $t) { *self = value; }
            fn scale(&mut self, alpha: $t) { *self *= alpha; }
            fn axpy(&mut self, alpha: $t, other: &Self) { *self += alpha * *other; }
            fn at(&self, _r: usize, _c: usize) -> $t { *self }
            fn frobenius_norm2(&self) -> $t { *self * *self }
            fn infinity_norm(&self) -> $t { self.abs() }
            fn usmv(&self, alpha: $t, x: &[$t], y: &mut [$t]) { y[0] += alpha * *self * x[0]; }
            fn usmtv(&self, alpha: $t, x: &[$t], y: &mut [$t]) { y[0] += alpha * *self * x[0]; }
        }
    )*};
}

scalar_block!(f32, f64);

/// Fixed-size dense `R × C` block, stored row-major.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DenseBlock<T, const R: usize, const C: usize> {
    data: [[T; C]; R],
}

impl<T: Float, const R: usize, const C: usize> DenseBlock<T, R, C> {
    pub fn from_rows(data: [[T; C]; R]) -> Self {
        Self { data }
    }

    /// `value` on the diagonal, zero elsewhere.
    pub fn diagonal(value: T) -> Self {
        let mut data = [[T::zero(); C]; R];
        for (i, row) in data.iter_mut().enumerate().take(C) {
            row[i] = value;
        }
        Self { data }
    }

    pub fn rows(&self) -> &[[T; C]; R] {
        &self.data
    }

    pub fn get_mut(&mut self, r: usize, c: usize) -> &mut T {
        &mut self.data[r][c]
    }
}

impl<T: Float, const R: usize, const C: usize> AddAssign for DenseBlock<T, R, C> {
    fn add_assign(&mut self, rhs: Self) {
        for (a, b) in self.data.iter_mut().flatten().zip(rhs.data.iter().flatten()) {
            *a = *a + *b;
        }
    }
}

impl<T: Float, const R: usize, const C: usize> SubAssign for DenseBlock<T, R, C> {
    fn sub_assign(&mut self, rhs: Self) {
        for (a, b) in self.data.iter_mut().flatten().zip(rhs.data.iter().flatten()) {
            *a = *a - *b;
        }
    }
}

impl<T, const R: usize, const C: usize> Block for DenseBlock<T, R, C>
where
    T: Float + fmt::Debug + Send + Sync + 'static,
{
    type Field = T;
    const ROWS: usize = R;
    const COLS: usize = C;

    fn zero() -> Self {
        Self { data: [[T::zero(); C]; R] }
    }

    fn fill(&mut self, value: T) {
        self.data.iter_mut().flatten().for_each(|v| *v = value);
    }

    fn scale(&mut self, alpha: T) {
        self.data.iter_mut().flatten().for_each(|v| *v = *v * alpha);
    }

    fn axpy(&mut self, alpha: T, other: &Self) {
        for (a, b) in self.data.iter_mut().flatten().zip(other.data.iter().flatten()) {
            *a = *a + alpha * *b;
        }
    }

    fn at(&self, r: usize, c: usize) -> T {
        self.data[r][c]
    }

    fn frobenius_norm2(&self) -> T {
        self.data.iter().flatten().fold(T::zero(), |acc, v| acc + *v * *v)
    }

    fn infinity_norm(&self) -> T {
        self.data
            .iter()
            .map(|row| row.iter().fold(T::zero(), |acc, v| acc + v.abs()))
            .fold(T::zero(), T::max)
    }

    fn usmv(&self, alpha: T, x: &[T], y: &mut [T]) {
        for (yi, row) in y.iter_mut().zip(self.data.iter()) {
            let dot = row.iter().zip(x).fold(T::zero(), |acc, (a, b)| acc + *a * *b);
            *yi = *yi + alpha * dot;
        }
    }

    fn usmtv(&self, alpha: T, x: &[T], y: &mut [T]) {
        for (xi, row) in x.iter().zip(self.data.iter()) {
            for (yj, a) in y.iter_mut().zip(row.iter()) {
                *yj = *yj + alpha * *a * *xi;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_block_kernels() {
        let mut a = 2.0_f64;
        a.axpy(3.0, &1.5);
        assert_eq!(a, 6.5);
        let mut y = [1.0];
        a.usmv(2.0, &[1.0], &mut y);
        assert_eq!(y[0], 14.0);
        assert_eq!((-4.0_f64).infinity_norm(), 4.0);
        assert_eq!(<f64 as Block>::ROWS, 1);
    }

    #[test]
    fn dense_block_matvec_and_transpose() {
        let b = DenseBlock::from_rows([[1.0, 2.0], [3.0, 4.0]]);
        let mut y = [0.0; 2];
        b.usmv(1.0, &[1.0, 1.0], &mut y);
        assert_eq!(y, [3.0, 7.0]);
        let mut yt = [0.0; 2];
        b.usmtv(1.0, &[1.0, 1.0], &mut yt);
        assert_eq!(yt, [4.0, 6.0]);
        assert_eq!(b.infinity_norm(), 7.0);
        assert_eq!(b.frobenius_norm2(), 30.0);
    }

    #[test]
    fn dense_block_accumulates() {
        let mut b = DenseBlock::<f64, 2, 2>::zero();
        b += DenseBlock::diagonal(2.0);
        b += DenseBlock::diagonal(1.0);
        assert_eq!(b.at(0, 0), 3.0);
        assert_eq!(b.at(0, 1), 0.0);
        b.fill(5.0);
        assert_eq!(b.at(1, 0), 5.0);
    }
}
