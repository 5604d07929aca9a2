use approx::assert_relative_eq;
use ndarray::{array, Array2, Array4};

use crate::rdm::make_rdm12_on_mo;

/// Two-particle density matrix of a closed-shell single determinant with one-particle density
/// matrix `dm1`.
fn closed_shell_dm2(dm1: &Array2<f64>) -> Array4<f64> {
    let n = dm1.nrows();
    Array4::from_shape_fn((n, n, n, n), |(p, q, r, s)| {
        dm1[[p, q]] * dm1[[r, s]] - 0.5 * dm1[[p, s]] * dm1[[r, q]]
    })
}

#[test]
fn test_rdm_make_rdm12_on_mo_closed_shell() {
    let casdm1 = array![[1.5, 0.3], [0.3, 0.5]];
    let casdm2 = closed_shell_dm2(&casdm1);
    let rdms = make_rdm12_on_mo(casdm1.view(), casdm2.view(), 2, 2, 5).unwrap();
    assert_eq!(rdms.nmo(), 5);
    assert_eq!(rdms.active(), 2..4);

    let dm1_ref = array![
        [2.0, 0.0, 0.0, 0.0, 0.0],
        [0.0, 2.0, 0.0, 0.0, 0.0],
        [0.0, 0.0, 1.5, 0.3, 0.0],
        [0.0, 0.0, 0.3, 0.5, 0.0],
        [0.0, 0.0, 0.0, 0.0, 0.0],
    ];
    assert_eq!(rdms.dm1, dm1_ref);
    assert_relative_eq!(rdms.n_electrons(), 6.0);

    let dm2_ref = closed_shell_dm2(&dm1_ref);
    rdms.dm2
        .indexed_iter()
        .for_each(|(idx, x)| assert_relative_eq!(*x, dm2_ref[idx], epsilon = 1e-12));
}

#[test]
fn test_rdm_make_rdm12_on_mo_core_terms() {
    let casdm1 = array![[1.0]];
    let casdm2 = Array4::<f64>::zeros((1, 1, 1, 1));
    let rdms = make_rdm12_on_mo(casdm1.view(), casdm2.view(), 2, 1, 4).unwrap();
    let dm2 = &rdms.dm2;
    assert_eq!(dm2[[0, 0, 0, 0]], 2.0);
    assert_eq!(dm2[[0, 0, 1, 1]], 4.0);
    assert_eq!(dm2[[0, 1, 1, 0]], -2.0);
    assert_eq!(dm2[[1, 1, 2, 2]], 2.0);
    assert_eq!(dm2[[2, 2, 1, 1]], 2.0);
    assert_eq!(dm2[[1, 2, 2, 1]], -1.0);
    assert_eq!(dm2[[2, 1, 1, 2]], -1.0);
    assert_eq!(dm2[[2, 2, 2, 2]], 0.0);
    assert!(dm2
        .indexed_iter()
        .filter(|((p, q, r, s), _)| *p == 3 || *q == 3 || *r == 3 || *s == 3)
        .all(|(_, x)| *x == 0.0));
}

#[test]
fn test_rdm_make_rdm12_on_mo_no_core() {
    let casdm1 = array![[2.0, 0.0], [0.0, 0.0]];
    let casdm2 = closed_shell_dm2(&casdm1);
    let rdms = make_rdm12_on_mo(casdm1.view(), casdm2.view(), 0, 2, 2).unwrap();
    assert_eq!(rdms.dm1, casdm1);
    assert_eq!(rdms.dm2, casdm2);
    assert_relative_eq!(rdms.dm2_trace(), 2.0);
}

#[test]
fn test_rdm_make_rdm12_on_mo_trace() {
    let casdm1 = array![[2.0, 0.0], [0.0, 0.0]];
    let casdm2 = closed_shell_dm2(&casdm1);
    let rdms = make_rdm12_on_mo(casdm1.view(), casdm2.view(), 3, 2, 6).unwrap();
    // Eight electrons in a closed-shell determinant.
    assert_relative_eq!(rdms.n_electrons(), 8.0);
    assert_relative_eq!(rdms.dm2_trace(), 8.0 * 7.0, epsilon = 1e-12);
}

#[test]
fn test_rdm_make_rdm12_on_mo_invalid() {
    let casdm1 = Array2::<f64>::zeros((2, 2));
    let casdm2 = Array4::<f64>::zeros((2, 2, 2, 2));
    assert!(make_rdm12_on_mo(casdm1.view(), casdm2.view(), 1, 3, 6).is_err());
    assert!(make_rdm12_on_mo(casdm1.view(), casdm2.view(), 3, 2, 4).is_err());

    let casdm2 = Array4::<f64>::zeros((2, 2, 2, 3));
    assert!(make_rdm12_on_mo(casdm1.view(), casdm2.view(), 1, 2, 4).is_err());
}
