//! # qcutils: small utilities for quantum-chemistry workflows
//!
//! qcutils collects a handful of tools that sit around active-space calculations:
//! - exhaustive enumeration of the electronic configurations obtainable by distributing the
//!   active electrons of a system over orbitals grouped by irreducible representations,
//! - conversion of CI vector listings, with determinants given as alpha and beta orbital-index
//!   lists, into occupation notation,
//! - radial pair-distribution functions and electron–electron interaction energies from
//!   scattering intensities, and
//! - assembly of one- and two-particle reduced density matrices in the full molecular-orbital
//!   basis from active-space ones.
//!
//! Configurations are written in occupation notation, with one symbol per orbital: `0` for an
//! empty orbital, `a` and `b` for singly occupied orbitals with an alpha or beta electron, and
//! `2` for a doubly occupied orbital. Orbitals are grouped by irreps, and groups are separated by
//! single spaces.
//!
//! ## Examples and usage
//!
//! For most items (structs, enums, functions, and traits), their usages are illustrated in test
//! functions.
//!
//! The `qcutils` binary is driven by YAML input files:
//! - `qcutils template -n <NAME>` writes a template input `<NAME>.yml` with every section filled
//!   with default values, and
//! - `qcutils run -c <CONFIG> [-o <OUTPUT>]` runs every section present in `<CONFIG>`, writing the
//!   main output to the standard output and, if requested, to `<OUTPUT>.out`.
//!
//! ## License
//!
//! GNU Lesser General Public License v3.0.

pub mod configuration;
pub mod conversion;
pub mod drivers;
pub mod interfaces;
pub mod io;
pub mod rdm;
pub mod scattering;
