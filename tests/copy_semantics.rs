//! Copy construction and assignment across build states.
//!
//! Only compressed or empty matrices can be copied; anything sized but not yet
//! compressed is rejected on either side of an assignment.

use bcrs_assembly::{BcrsMatrix, BuildStage, ErrorKind};

/// Tridiagonal 10×10 implicit matrix with all stored values set to 1.
fn half_built() -> BcrsMatrix<f64> {
    let mut m = BcrsMatrix::new_implicit(10, 10, 3.0, 0.1).unwrap();
    for i in 0..10usize {
        for j in i.saturating_sub(1)..=(i + 1).min(9) {
            *m.entry(i, j).unwrap() = 1.0;
        }
    }
    m
}

fn compressed() -> BcrsMatrix<f64> {
    let mut m = half_built();
    m.compress().unwrap();
    m
}

#[test]
fn copy_construction_and_assignment() {
    let m = compressed();
    let mut m2 = m.try_clone().unwrap();
    m2.fill(3.0).unwrap();
    assert_eq!(*m.get(4, 5).unwrap(), 1.0);
    assert_eq!(*m2.get(4, 5).unwrap(), 3.0);

    let mut m3 = m.try_clone().unwrap();
    m3.assign_from(&m2).unwrap();
    assert_eq!(*m3.get(0, 0).unwrap(), 3.0);

    let mut m4 = BcrsMatrix::new();
    m4.assign_from(&m).unwrap();
    assert!(m4.pattern_matches(&m));
    assert_eq!(m4.compression_statistics(), m.compression_statistics());
    let mut x = vec![0.0; 10];
    let mut y = vec![0.0; 10];
    x[3] = 1.0;
    m4.mv(&x, &mut y).unwrap();
    assert_eq!(&y[2..5], &[1.0, 1.0, 1.0]);
}

#[test]
fn copies_are_independent() {
    let m = compressed();
    let mut copy = m.try_clone().unwrap();
    *copy.get_mut(2, 2).unwrap() = 9.0;
    assert_eq!(*m.get(2, 2).unwrap(), 1.0);
}

#[test]
fn copy_of_mid_build_matrix_fails() {
    let m = half_built();
    let err = m.try_clone().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Copy);

    let sized_only = BcrsMatrix::<f64>::new_implicit(4, 4, 1.0, 0.0).unwrap();
    assert_eq!(sized_only.try_clone().unwrap_err().kind(), ErrorKind::Copy);
}

#[test]
fn invalid_copy_assignment() {
    let mut m = half_built();

    // incomplete into empty
    let mut empty = BcrsMatrix::<f64>::new();
    assert_eq!(empty.assign_from(&m).unwrap_err().kind(), ErrorKind::Copy);
    assert_eq!(empty.stage(), BuildStage::Unsized);

    // incomplete into full
    let mut full = compressed();
    assert_eq!(full.assign_from(&m).unwrap_err().kind(), ErrorKind::Copy);
    assert!(full.is_compressed());

    // full into half-built
    m.compress().unwrap();
    let mut target = half_built();
    assert_eq!(target.assign_from(&m).unwrap_err().kind(), ErrorKind::Copy);
    assert_eq!(target.stage(), BuildStage::Building);
}

#[test]
fn empty_matrices_copy() {
    let empty = BcrsMatrix::<f64>::new();
    let copy = empty.try_clone().unwrap();
    assert_eq!(copy.stage(), BuildStage::Unsized);

    let mut full = compressed();
    full.assign_from(&empty).unwrap();
    assert_eq!(full.stage(), BuildStage::Unsized);
    assert_eq!(full.nonzeroes(), 0);
}
