//! Enumeration of electronic configurations in an active space.
//!
//! A configuration is written in occupation notation, with one symbol per orbital:
//! - `0` for an empty orbital,
//! - `a` for an orbital occupied by a single alpha electron,
//! - `b` for an orbital occupied by a single beta electron, and
//! - `2` for a doubly occupied orbital.
//!
//! Orbitals are grouped by the irreducible representations (irreps) they belong to, and the
//! groups are separated by single spaces, *e.g.* `2a0 b 0`.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use anyhow::{self, bail, ensure};
use derive_builder::Builder;
use indexmap::IndexMap;
use itertools::Itertools;
use log;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "configuration_tests.rs"]
mod configuration_tests;

// =================
// Occupation symbol
// =================

/// An enumerated type for the occupation of a single spatial orbital.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OccupationSymbol {
    /// Variant for an empty orbital, written `0`.
    Empty,

    /// Variant for an orbital holding one alpha electron, written `a`.
    Alpha,

    /// Variant for an orbital holding one beta electron, written `b`.
    Beta,

    /// Variant for an orbital holding one alpha and one beta electron, written `2`.
    Double,
}

impl OccupationSymbol {
    /// Returns the number of electrons in the orbital.
    pub fn weight(&self) -> usize {
        match self {
            OccupationSymbol::Empty => 0,
            OccupationSymbol::Alpha | OccupationSymbol::Beta => 1,
            OccupationSymbol::Double => 2,
        }
    }

    /// Returns the single-character symbol of the occupation.
    pub fn to_char(&self) -> char {
        match self {
            OccupationSymbol::Empty => '0',
            OccupationSymbol::Alpha => 'a',
            OccupationSymbol::Beta => 'b',
            OccupationSymbol::Double => '2',
        }
    }

    /// Returns the occupation after adding an alpha electron, or `None` if the orbital already
    /// holds an alpha electron.
    pub fn with_alpha(self) -> Option<Self> {
        match self {
            OccupationSymbol::Empty => Some(OccupationSymbol::Alpha),
            OccupationSymbol::Beta => Some(OccupationSymbol::Double),
            OccupationSymbol::Alpha | OccupationSymbol::Double => None,
        }
    }

    /// Returns the occupation after adding a beta electron, or `None` if the orbital already
    /// holds a beta electron.
    pub fn with_beta(self) -> Option<Self> {
        match self {
            OccupationSymbol::Empty => Some(OccupationSymbol::Beta),
            OccupationSymbol::Alpha => Some(OccupationSymbol::Double),
            OccupationSymbol::Beta | OccupationSymbol::Double => None,
        }
    }
}

impl TryFrom<char> for OccupationSymbol {
    type Error = anyhow::Error;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            '0' => Ok(OccupationSymbol::Empty),
            'a' => Ok(OccupationSymbol::Alpha),
            'b' => Ok(OccupationSymbol::Beta),
            '2' => Ok(OccupationSymbol::Double),
            _ => bail!("`{c}` is not a valid occupation symbol."),
        }
    }
}

impl fmt::Display for OccupationSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

// ==========
// Occupation
// ==========

/// A structure containing the occupations of an ordered sequence of spatial orbitals.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Occupation {
    symbols: Vec<OccupationSymbol>,
}

impl Occupation {
    /// Constructs an occupation with all orbitals empty.
    pub fn empty(n_orbitals: usize) -> Self {
        Self {
            symbols: vec![OccupationSymbol::Empty; n_orbitals],
        }
    }

    /// Constructs an occupation by placing alpha electrons and then beta electrons into the
    /// orbitals with the specified indices.
    ///
    /// # Arguments
    ///
    /// * `n_orbitals` - The number of orbitals.
    /// * `alpha` - The indices of the orbitals occupied by alpha electrons.
    /// * `beta` - The indices of the orbitals occupied by beta electrons.
    ///
    /// # Returns
    ///
    /// The occupation, or `None` if an index is out of range or if an orbital receives two
    /// electrons of the same spin.
    pub fn from_placements(n_orbitals: usize, alpha: &[usize], beta: &[usize]) -> Option<Self> {
        let mut occ = Self::empty(n_orbitals);
        for &i in alpha {
            let symbol = occ.symbols.get_mut(i)?;
            *symbol = symbol.with_alpha()?;
        }
        for &i in beta {
            let symbol = occ.symbols.get_mut(i)?;
            *symbol = symbol.with_beta()?;
        }
        Some(occ)
    }

    /// Returns the occupation symbols.
    pub fn symbols(&self) -> &[OccupationSymbol] {
        &self.symbols
    }

    /// Returns the number of orbitals.
    pub fn n_orbitals(&self) -> usize {
        self.symbols.len()
    }

    /// Returns the total number of electrons.
    pub fn weight(&self) -> usize {
        self.symbols.iter().map(OccupationSymbol::weight).sum()
    }
}

impl From<Vec<OccupationSymbol>> for Occupation {
    fn from(symbols: Vec<OccupationSymbol>) -> Self {
        Self { symbols }
    }
}

impl FromStr for Occupation {
    type Err = anyhow::Error;

    /// Parses an occupation string. Group separators (whitespace) are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbols = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(OccupationSymbol::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { symbols })
    }
}

impl fmt::Display for Occupation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.symbols
            .iter()
            .try_for_each(|symbol| write!(f, "{symbol}"))
    }
}

// =============
// Orbital space
// =============

/// A structure containing the orbitals of an active space, grouped by irreps.
///
/// The order of the irreps defines the orbital indexing: orbital indices run contiguously from
/// zero through the irreps in their listed order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrbitalSpace {
    /// The irrep labels and the number of orbitals in each, in order.
    irreps: IndexMap<String, usize>,
}

impl OrbitalSpace {
    /// Constructs an orbital space from an ordered mapping of irrep labels to orbital counts.
    pub fn new(irreps: IndexMap<String, usize>) -> Self {
        Self { irreps }
    }

    /// Returns the irrep labels and orbital counts.
    pub fn irreps(&self) -> &IndexMap<String, usize> {
        &self.irreps
    }

    /// Returns the total number of orbitals.
    pub fn n_orbitals(&self) -> usize {
        self.irreps.values().sum()
    }

    /// Returns the half-open index ranges `[start, end)` of the orbitals of each irrep.
    pub fn boundaries(&self) -> Vec<(usize, usize)> {
        self.irreps
            .values()
            .scan(0, |start, &count| {
                let range = (*start, *start + count);
                *start += count;
                Some(range)
            })
            .collect_vec()
    }

    /// Renders an occupation with its symbols grouped by irreps.
    ///
    /// # Errors
    ///
    /// Errors if the occupation does not have exactly as many orbitals as this space.
    pub fn format(&self, occ: &Occupation) -> Result<String, anyhow::Error> {
        ensure!(
            occ.n_orbitals() == self.n_orbitals(),
            "Occupation `{occ}` has {} orbitals but the space has {}.",
            occ.n_orbitals(),
            self.n_orbitals()
        );
        Ok(self.group_symbols(occ))
    }

    /// Joins the symbols of an occupation of matching length by irrep groups.
    fn group_symbols(&self, occ: &Occupation) -> String {
        self.boundaries()
            .into_iter()
            .map(|(start, end)| {
                occ.symbols()[start..end]
                    .iter()
                    .map(OccupationSymbol::to_char)
                    .collect::<String>()
            })
            .join(" ")
    }
}

impl fmt::Display for OrbitalSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.irreps
                .iter()
                .map(|(irrep, count)| format!("{irrep}({count})"))
                .join(" ")
        )
    }
}

// ===============
// Electron budget
// ===============

/// A structure containing the electron counts of a system.
///
/// The active electrons are split between the two spin spaces with alpha receiving the floor
/// half, so that there are never more alpha than beta electrons. Deserialisation goes through
/// [`ElectronBudget::new`], so an invalid budget cannot be read from a file either.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawElectronBudget")]
pub struct ElectronBudget {
    /// The total number of electrons.
    total_electrons: usize,

    /// The number of frozen core electrons.
    frozen_core: usize,
}

impl ElectronBudget {
    /// Constructs an electron budget.
    ///
    /// # Errors
    ///
    /// Errors if there are more frozen core electrons than electrons.
    pub fn new(total_electrons: usize, frozen_core: usize) -> Result<Self, anyhow::Error> {
        ensure!(
            frozen_core <= total_electrons,
            "The number of frozen core electrons ({frozen_core}) exceeds the total number of electrons ({total_electrons})."
        );
        Ok(Self {
            total_electrons,
            frozen_core,
        })
    }

    /// Returns the total number of electrons.
    pub fn total_electrons(&self) -> usize {
        self.total_electrons
    }

    /// Returns the number of frozen core electrons.
    pub fn frozen_core(&self) -> usize {
        self.frozen_core
    }

    /// Returns the number of active electrons.
    pub fn active_electrons(&self) -> usize {
        self.total_electrons - self.frozen_core
    }

    /// Returns the number of active alpha electrons.
    pub fn n_alpha(&self) -> usize {
        self.active_electrons() / 2
    }

    /// Returns the number of active beta electrons.
    pub fn n_beta(&self) -> usize {
        self.active_electrons() - self.n_alpha()
    }
}

/// Unvalidated electron counts as they appear in serialised data.
#[derive(Deserialize)]
struct RawElectronBudget {
    total_electrons: usize,
    frozen_core: usize,
}

impl TryFrom<RawElectronBudget> for ElectronBudget {
    type Error = anyhow::Error;

    fn try_from(raw: RawElectronBudget) -> Result<Self, Self::Error> {
        Self::new(raw.total_electrons, raw.frozen_core)
    }
}

// =================
// Configuration set
// =================

/// A structure containing a set of distinct configuration strings.
///
/// Two configurations are the same if and only if their rendered strings are identical.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationSet {
    configurations: HashSet<String>,
}

impl ConfigurationSet {
    /// Returns the number of configurations.
    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    /// Returns `true` if there are no configurations.
    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }

    /// Checks if a configuration string is in the set.
    pub fn contains(&self, configuration: &str) -> bool {
        self.configurations.contains(configuration)
    }

    /// Returns an iterator over the configurations in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.configurations.iter()
    }

    /// Returns the configurations in lexicographic order.
    pub fn sorted(&self) -> Vec<&String> {
        self.configurations.iter().sorted().collect_vec()
    }

    /// Returns at most the first `count` configurations in lexicographic order.
    pub fn preview(&self, count: usize) -> Vec<&String> {
        self.configurations.iter().sorted().take(count).collect_vec()
    }
}

impl FromIterator<String> for ConfigurationSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            configurations: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ConfigurationSet {
    type Item = String;
    type IntoIter = std::collections::hash_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.configurations.into_iter()
    }
}

// ========================
// Configuration enumerator
// ========================

/// A structure to enumerate all configurations obtainable by placing the active electrons of a
/// system as alpha and beta electrons in an orbital space.
///
/// Every choice of alpha orbitals is combined with every choice of beta orbitals, so the
/// enumeration is exhaustive and scales as $`\binom{N}{n_\alpha}\binom{N}{n_\beta}`$.
#[derive(Builder, Clone, Debug)]
pub struct ConfigurationEnumerator {
    /// The orbital space in which the electrons are placed.
    orbital_space: OrbitalSpace,

    /// The electron counts of the system.
    electron_budget: ElectronBudget,
}

impl ConfigurationEnumerator {
    /// Returns a builder to construct a new configuration enumerator.
    pub fn builder() -> ConfigurationEnumeratorBuilder {
        ConfigurationEnumeratorBuilder::default()
    }

    /// Constructs a configuration enumerator.
    ///
    /// # Arguments
    ///
    /// * `total_electrons` - The total number of electrons in the system.
    /// * `frozen_core` - The number of frozen core electrons.
    /// * `irrep_specs` - An ordered mapping from irrep labels to their numbers of orbitals.
    ///
    /// # Errors
    ///
    /// Errors if `frozen_core` exceeds `total_electrons`.
    pub fn new(
        total_electrons: usize,
        frozen_core: usize,
        irrep_specs: IndexMap<String, usize>,
    ) -> Result<Self, anyhow::Error> {
        Ok(Self {
            orbital_space: OrbitalSpace::new(irrep_specs),
            electron_budget: ElectronBudget::new(total_electrons, frozen_core)?,
        })
    }

    /// Returns the orbital space.
    pub fn orbital_space(&self) -> &OrbitalSpace {
        &self.orbital_space
    }

    /// Returns the electron budget.
    pub fn electron_budget(&self) -> &ElectronBudget {
        &self.electron_budget
    }

    /// Places the beta electrons in every possible way on top of one alpha placement and
    /// inserts the resulting configurations into `configurations`.
    fn accumulate_alpha_placement(&self, alpha: &[usize], configurations: &mut HashSet<String>) {
        let n_orbitals = self.orbital_space.n_orbitals();
        (0..n_orbitals)
            .combinations(self.electron_budget.n_beta())
            .filter_map(|beta| Occupation::from_placements(n_orbitals, alpha, &beta))
            .for_each(|occ| {
                configurations.insert(self.orbital_space.group_symbols(&occ));
            });
    }

    /// Enumerates all distinct configurations.
    ///
    /// If there are more alpha or beta electrons than orbitals, the result is empty. If there
    /// are no active electrons, the result contains the single all-empty configuration.
    pub fn enumerate(&self) -> ConfigurationSet {
        let n_orbitals = self.orbital_space.n_orbitals();
        log::debug!(
            "Enumerating configurations of {} alpha and {} beta electrons in {} orbitals.",
            self.electron_budget.n_alpha(),
            self.electron_budget.n_beta(),
            n_orbitals
        );
        let mut configurations = HashSet::new();
        for alpha in (0..n_orbitals).combinations(self.electron_budget.n_alpha()) {
            self.accumulate_alpha_placement(&alpha, &mut configurations);
        }
        log::debug!("Found {} distinct configurations.", configurations.len());
        ConfigurationSet { configurations }
    }

    /// Enumerates all distinct configurations with the alpha placements distributed over the
    /// `rayon` thread pool. The result is identical to that of [`Self::enumerate`].
    pub fn enumerate_par(&self) -> ConfigurationSet {
        let n_orbitals = self.orbital_space.n_orbitals();
        let alphas = (0..n_orbitals)
            .combinations(self.electron_budget.n_alpha())
            .collect_vec();
        log::debug!(
            "Enumerating configurations from {} alpha placements in parallel.",
            alphas.len()
        );
        let configurations = alphas
            .par_iter()
            .fold(HashSet::new, |mut configurations, alpha| {
                self.accumulate_alpha_placement(alpha, &mut configurations);
                configurations
            })
            .reduce(HashSet::new, |a, b| {
                let (mut larger, smaller) = if a.len() >= b.len() { (a, b) } else { (b, a) };
                larger.extend(smaller);
                larger
            });
        log::debug!("Found {} distinct configurations.", configurations.len());
        ConfigurationSet { configurations }
    }
}

