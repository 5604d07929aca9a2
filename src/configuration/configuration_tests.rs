use std::collections::HashSet;

use indexmap::IndexMap;
use proptest::prelude::*;

use crate::configuration::{
    ConfigurationEnumerator, ElectronBudget, Occupation, OccupationSymbol, OrbitalSpace,
};

fn irreps(specs: &[(&str, usize)]) -> IndexMap<String, usize> {
    specs
        .iter()
        .map(|(label, count)| (label.to_string(), *count))
        .collect()
}

fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

fn set_of(configurations: &[&str]) -> HashSet<String> {
    configurations.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_configuration_occupation_symbol_overlay() {
    assert_eq!(
        OccupationSymbol::Empty.with_alpha(),
        Some(OccupationSymbol::Alpha)
    );
    assert_eq!(
        OccupationSymbol::Beta.with_alpha(),
        Some(OccupationSymbol::Double)
    );
    assert_eq!(OccupationSymbol::Alpha.with_alpha(), None);
    assert_eq!(
        OccupationSymbol::Alpha.with_beta(),
        Some(OccupationSymbol::Double)
    );
    assert_eq!(OccupationSymbol::Beta.with_beta(), None);
    assert_eq!(OccupationSymbol::Double.with_beta(), None);
    assert_eq!(OccupationSymbol::Double.weight(), 2);
    assert!(OccupationSymbol::try_from('x').is_err());
}

#[test]
fn test_configuration_occupation_from_placements() {
    let occ = Occupation::from_placements(4, &[0, 2], &[0, 3]).unwrap();
    assert_eq!(occ.to_string(), "20ab");
    assert_eq!(occ.weight(), 4);

    // Repeated beta index
    assert!(Occupation::from_placements(3, &[0], &[1, 1]).is_none());

    // Out of range
    assert!(Occupation::from_placements(3, &[3], &[]).is_none());

    let parsed = "2a 0 b".parse::<Occupation>().unwrap();
    assert_eq!(parsed.to_string(), "2a0b");
    assert_eq!(parsed.weight(), 4);
}

#[test]
fn test_configuration_orbital_space_grouping() {
    let space = OrbitalSpace::new(irreps(&[("A1", 3), ("B1", 1), ("B2", 2)]));
    assert_eq!(space.n_orbitals(), 6);
    assert_eq!(space.boundaries(), vec![(0, 3), (3, 4), (4, 6)]);
    let occ = "22ab0a".parse::<Occupation>().unwrap();
    assert_eq!(space.format(&occ).unwrap(), "22a b 0a");
    assert_eq!(space.to_string(), "A1(3) B1(1) B2(2)");

    let short = "2".parse::<Occupation>().unwrap();
    assert!(space.format(&short).is_err());
    let long = "22ab0a0".parse::<Occupation>().unwrap();
    assert!(space.format(&long).is_err());
}

#[test]
fn test_configuration_electron_budget() {
    let budget = ElectronBudget::new(10, 2).unwrap();
    assert_eq!(budget.active_electrons(), 8);
    assert_eq!(budget.n_alpha(), 4);
    assert_eq!(budget.n_beta(), 4);

    let budget = ElectronBudget::new(5, 0).unwrap();
    assert_eq!(budget.n_alpha(), 2);
    assert_eq!(budget.n_beta(), 3);

    assert!(ElectronBudget::new(2, 4).is_err());
}

#[test]
fn test_configuration_electron_budget_deserialisation() {
    let budget =
        serde_yaml::from_str::<ElectronBudget>("total_electrons: 10\nfrozen_core: 2\n").unwrap();
    assert_eq!(budget, ElectronBudget::new(10, 2).unwrap());

    let invalid = serde_yaml::from_str::<ElectronBudget>("total_electrons: 2\nfrozen_core: 4\n");
    assert!(invalid.is_err());

    let bytes = bincode::serialize(&(2usize, 4usize)).unwrap();
    assert!(bincode::deserialize::<ElectronBudget>(&bytes).is_err());
    let bytes = bincode::serialize(&budget).unwrap();
    assert_eq!(bincode::deserialize::<ElectronBudget>(&bytes).unwrap(), budget);
}

#[test]
fn test_configuration_enumerator_single_irrep() {
    let enumerator = ConfigurationEnumerator::new(2, 0, irreps(&[("A", 2)])).unwrap();
    let configurations = enumerator.enumerate();
    assert_eq!(
        configurations.iter().cloned().collect::<HashSet<_>>(),
        set_of(&["20", "02", "ab", "ba"])
    );
}

#[test]
fn test_configuration_enumerator_two_irreps() {
    let enumerator = ConfigurationEnumerator::new(2, 0, irreps(&[("A", 1), ("B", 1)])).unwrap();
    let configurations = enumerator.enumerate();
    assert_eq!(
        configurations.iter().cloned().collect::<HashSet<_>>(),
        set_of(&["2 0", "0 2", "a b", "b a"])
    );
}

#[test]
fn test_configuration_enumerator_no_active_electrons() {
    let enumerator =
        ConfigurationEnumerator::new(0, 0, irreps(&[("Ag", 2), ("B1u", 1), ("B3g", 3)])).unwrap();
    let configurations = enumerator.enumerate();
    assert_eq!(configurations.len(), 1);
    assert!(configurations.contains("00 0 000"));

    let enumerator = ConfigurationEnumerator::new(4, 4, irreps(&[("A", 2)])).unwrap();
    assert_eq!(enumerator.enumerate().sorted(), vec!["00"]);
}

#[test]
fn test_configuration_enumerator_too_many_electrons() {
    // Three beta electrons do not fit in two orbitals.
    let enumerator = ConfigurationEnumerator::new(5, 0, irreps(&[("A", 1), ("B", 1)])).unwrap();
    assert!(enumerator.enumerate().is_empty());
    assert!(enumerator.enumerate_par().is_empty());

    // Fully occupied.
    let enumerator = ConfigurationEnumerator::new(4, 0, irreps(&[("A", 1), ("B", 1)])).unwrap();
    assert_eq!(enumerator.enumerate().sorted(), vec!["2 2"]);
}

#[test]
fn test_configuration_enumerator_odd_electrons() {
    // One alpha and two beta electrons.
    let enumerator = ConfigurationEnumerator::new(4, 1, irreps(&[("A", 2), ("B", 1)])).unwrap();
    let configurations = enumerator.enumerate();
    assert_eq!(configurations.len(), 3 * 3);
    assert!(configurations.contains("2b 0"));
    assert!(configurations.contains("bb a"));
    assert!(configurations.contains("0b 2"));
    assert!(!configurations.contains("aa b"));
    configurations.iter().for_each(|configuration| {
        let occ = configuration.parse::<Occupation>().unwrap();
        let n_alpha = occ
            .symbols()
            .iter()
            .filter(|s| matches!(s, OccupationSymbol::Alpha | OccupationSymbol::Double))
            .count();
        assert_eq!(n_alpha, 1);
        assert_eq!(occ.weight(), 3);
    });
}

#[test]
fn test_configuration_enumerator_empty_irrep_group() {
    let enumerator =
        ConfigurationEnumerator::new(2, 0, irreps(&[("A", 1), ("B", 0), ("C", 1)])).unwrap();
    let configurations = enumerator.enumerate();
    assert_eq!(configurations.len(), 4);
    assert!(configurations.contains("2  0"));
    assert!(configurations.contains("a  b"));
}

#[test]
fn test_configuration_enumerator_preview_sorted() {
    let enumerator = ConfigurationEnumerator::new(2, 0, irreps(&[("A", 2)])).unwrap();
    let configurations = enumerator.enumerate();
    assert_eq!(configurations.sorted(), vec!["02", "20", "ab", "ba"]);
    assert_eq!(configurations.preview(2).len(), 2);
    assert_eq!(configurations.preview(2)[0], "02");
    assert_eq!(configurations.preview(10).len(), 4);
}

#[test]
fn test_configuration_enumerator_builder() {
    let enumerator = ConfigurationEnumerator::builder()
        .orbital_space(OrbitalSpace::new(irreps(&[("A1", 2), ("B2", 1)])))
        .electron_budget(ElectronBudget::new(4, 2).unwrap())
        .build()
        .unwrap();
    assert_eq!(enumerator.orbital_space().n_orbitals(), 3);
    assert_eq!(enumerator.electron_budget().active_electrons(), 2);
    assert_eq!(enumerator.enumerate().len(), 9);
}

#[test]
fn test_configuration_enumerator_count_matches_placements() {
    // Every (alpha, beta) placement pair maps onto a distinct configuration.
    let enumerator = ConfigurationEnumerator::new(
        6,
        2,
        irreps(&[("Ag", 2), ("B3u", 1), ("B2u", 1), ("B1g", 2)]),
    )
    .unwrap();
    let configurations = enumerator.enumerate();
    assert_eq!(configurations.len(), binomial(6, 2) * binomial(6, 2));
}

#[test]
fn test_configuration_enumerator_parallel_matches_serial() {
    let enumerator = ConfigurationEnumerator::new(
        7,
        2,
        irreps(&[("A1", 3), ("A2", 1), ("B1", 2), ("B2", 1)]),
    )
    .unwrap();
    let serial = enumerator.enumerate();
    let parallel = enumerator.enumerate_par();
    assert_eq!(serial.len(), binomial(7, 2) * binomial(7, 3));
    assert_eq!(serial, parallel);
}

proptest! {
    #[test]
    fn test_configuration_enumerator_invariants(
        counts in prop::collection::vec(0usize..=3, 1..=3),
        active in 0usize..=8,
        frozen in 0usize..=2,
    ) {
        let specs = counts
            .iter()
            .enumerate()
            .map(|(i, count)| (format!("G{i}"), *count))
            .collect::<IndexMap<_, _>>();
        let n_orbitals: usize = counts.iter().sum();
        let enumerator =
            ConfigurationEnumerator::new(active + frozen, frozen, specs).unwrap();
        let n_alpha = active / 2;
        let n_beta = active - n_alpha;
        let configurations = enumerator.enumerate();

        prop_assert_eq!(
            configurations.len(),
            binomial(n_orbitals, n_alpha) * binomial(n_orbitals, n_beta)
        );
        for configuration in configurations.iter() {
            let groups = configuration.split(' ').collect::<Vec<_>>();
            prop_assert_eq!(groups.len(), counts.len());
            for (group, count) in groups.iter().zip(counts.iter()) {
                prop_assert_eq!(group.chars().count(), *count);
            }
            let occ = configuration.parse::<Occupation>().unwrap();
            prop_assert_eq!(occ.n_orbitals(), n_orbitals);
            prop_assert_eq!(occ.weight(), active);
        }
    }
}
