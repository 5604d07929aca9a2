//! Assembly of reduced density matrices in the full molecular-orbital basis from those of an
//! active space.
//!
//! The molecular orbitals are partitioned into `ncore` doubly occupied core orbitals, `ncas`
//! active orbitals, and the remaining virtual orbitals. The two-particle density matrix follows
//! the chemists' index ordering $`\Gamma_{pqrs} = \langle a^\dagger_p a^\dagger_r a_s a_q \rangle`$.

use std::fmt;
use std::ops::Range;

use anyhow::{self, ensure};
use ndarray::{s, Array2, Array4, ArrayView2, ArrayView4};
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "rdm_tests.rs"]
mod rdm_tests;

/// A structure containing one- and two-particle reduced density matrices in the full
/// molecular-orbital basis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoRdms {
    /// The number of core orbitals.
    pub ncore: usize,

    /// The number of active orbitals.
    pub ncas: usize,

    /// The one-particle reduced density matrix, of shape `(nmo, nmo)`.
    pub dm1: Array2<f64>,

    /// The two-particle reduced density matrix, of shape `(nmo, nmo, nmo, nmo)`.
    pub dm2: Array4<f64>,
}

impl MoRdms {
    /// Returns the number of molecular orbitals.
    pub fn nmo(&self) -> usize {
        self.dm1.nrows()
    }

    /// Returns the index range of the active orbitals.
    pub fn active(&self) -> Range<usize> {
        self.ncore..self.ncore + self.ncas
    }

    /// Returns the trace of the one-particle density matrix, *i.e.* the number of electrons.
    pub fn n_electrons(&self) -> f64 {
        self.dm1.diag().sum()
    }

    /// Returns the full trace $`\sum_{pq} \Gamma_{ppqq}`$ of the two-particle density matrix,
    /// which equals $`N(N-1)`$ for an $`N`$-electron state.
    pub fn dm2_trace(&self) -> f64 {
        let nmo = self.nmo();
        (0..nmo)
            .flat_map(|p| (0..nmo).map(move |q| (p, q)))
            .map(|(p, q)| self.dm2[[p, p, q, q]])
            .sum()
    }
}

impl fmt::Display for MoRdms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of molecular orbitals: {}", self.nmo())?;
        writeln!(f, "Number of core orbitals: {}", self.ncore)?;
        writeln!(f, "Number of active orbitals: {}", self.ncas)?;
        writeln!(f, "Tr(1-RDM): {:.8}", self.n_electrons())?;
        writeln!(f, "Tr(2-RDM): {:.8}", self.dm2_trace())?;
        Ok(())
    }
}

/// Embeds active-space one- and two-particle density matrices into the full molecular-orbital
/// basis, with every core orbital doubly occupied and every virtual orbital empty.
///
/// # Arguments
///
/// * `casdm1` - The active-space one-particle density matrix, of shape `(ncas, ncas)`.
/// * `casdm2` - The active-space two-particle density matrix, of shape
/// `(ncas, ncas, ncas, ncas)`.
/// * `ncore` - The number of core orbitals.
/// * `ncas` - The number of active orbitals.
/// * `nmo` - The total number of molecular orbitals.
///
/// # Errors
///
/// Errors if the shapes of the active-space matrices do not match `ncas`, or if there are more
/// core and active orbitals than molecular orbitals.
pub fn make_rdm12_on_mo(
    casdm1: ArrayView2<f64>,
    casdm2: ArrayView4<f64>,
    ncore: usize,
    ncas: usize,
    nmo: usize,
) -> Result<MoRdms, anyhow::Error> {
    ensure!(
        casdm1.shape() == [ncas, ncas],
        "The active-space 1-RDM has shape {:?}, but ({ncas}, {ncas}) is expected.",
        casdm1.shape()
    );
    ensure!(
        casdm2.shape() == [ncas, ncas, ncas, ncas],
        "The active-space 2-RDM has shape {:?}, but ({ncas}, {ncas}, {ncas}, {ncas}) is expected.",
        casdm2.shape()
    );
    let nocc = ncore + ncas;
    ensure!(
        nocc <= nmo,
        "{ncore} core and {ncas} active orbitals exceed the {nmo} molecular orbitals."
    );

    let mut dm1 = Array2::<f64>::zeros((nmo, nmo));
    for i in 0..ncore {
        dm1[[i, i]] = 2.0;
    }
    dm1.slice_mut(s![ncore..nocc, ncore..nocc]).assign(&casdm1);

    let mut dm2 = Array4::<f64>::zeros((nmo, nmo, nmo, nmo));
    dm2.slice_mut(s![ncore..nocc, ncore..nocc, ncore..nocc, ncore..nocc])
        .assign(&casdm2);
    let coulomb = casdm1.mapv(|x| 2.0 * x);
    let exchange = casdm1.mapv(|x| -x);
    for i in 0..ncore {
        for j in 0..ncore {
            dm2[[i, i, j, j]] += 4.0;
            dm2[[i, j, j, i]] -= 2.0;
        }
        dm2.slice_mut(s![i, i, ncore..nocc, ncore..nocc])
            .assign(&coulomb);
        dm2.slice_mut(s![ncore..nocc, ncore..nocc, i, i])
            .assign(&coulomb);
        dm2.slice_mut(s![i, ncore..nocc, ncore..nocc, i])
            .assign(&exchange);
        dm2.slice_mut(s![ncore..nocc, i, i, ncore..nocc])
            .assign(&exchange);
    }
    log::debug!("Embedded {ncas} active orbitals after {ncore} core orbitals in {nmo} MOs.");

    Ok(MoRdms {
        ncore,
        ncas,
        dm1,
        dm2,
    })
}
