use super::params::{BondStyle, Forcefield, LjParam};
use super::potentials;
use crate::core::topology::special::BondSeparation;
use itertools::Itertools;
use std::collections::{BTreeMap, HashMap};

/// Mixed Lennard-Jones coefficients of one type pair, with the energy offset used by
/// shifted potentials.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixedPair {
    pub epsilon: f64,
    pub sigma: f64,
    pub offset: f64,
}

/// Mixed coefficients keyed by the unordered type pair.
///
/// Only declared types get entries, so sparse type ids cost nothing.
#[derive(Debug, Clone)]
pub struct PairCoeffTable {
    entries: HashMap<(usize, usize), MixedPair>,
}

impl PairCoeffTable {
    pub fn build(forcefield: &Forcefield) -> Self {
        let mut entries = HashMap::new();
        for ((&ti, pi), (&tj, pj)) in forcefield
            .pair_coeffs
            .iter()
            .tuple_combinations()
            .chain(forcefield.pair_coeffs.iter().map(|entry| (entry, entry)))
        {
            let LjParam { epsilon, sigma } = forcefield.mixing.mix(pi, pj);
            let offset = if forcefield.shift {
                potentials::lennard_jones_12_6(forcefield.cutoff, sigma, epsilon)
            } else {
                0.0
            };
            entries.insert(
                Self::key(ti, tj),
                MixedPair {
                    epsilon,
                    sigma,
                    offset,
                },
            );
        }
        Self { entries }
    }

    #[inline]
    fn key(ti: usize, tj: usize) -> (usize, usize) {
        (ti.min(tj), ti.max(tj))
    }

    #[inline]
    pub fn get(&self, ti: usize, tj: usize) -> Option<&MixedPair> {
        self.entries.get(&Self::key(ti, tj))
    }

    pub fn n_entries(&self) -> usize {
        self.entries.len()
    }

    /// Long-range dispersion correction for a homogeneous fluid beyond the cutoff.
    ///
    /// Sums over ordered type pairs in ascending type order and divides by the volume.
    pub fn tail_energy(
        &self,
        cutoff: f64,
        type_counts: &BTreeMap<usize, usize>,
        volume: f64,
    ) -> f64 {
        let mut etail = 0.0;
        for (&ti, &ni) in type_counts {
            for (&tj, &nj) in type_counts {
                if let Some(coeff) = self.get(ti, tj) {
                    etail += (ni * nj) as f64
                        * potentials::lennard_jones_tail(cutoff, coeff.sigma, coeff.epsilon);
                }
            }
        }
        etail / volume
    }
}

/// Scaled energy of one atom pair and the radial force factor `(dE/dr) / r`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PairContribution {
    pub vdw: f64,
    pub coulomb: f64,
    pub fpair: f64,
}

pub struct EnergyCalculator;

impl EnergyCalculator {
    /// Evaluates one pair at distance `dist`.
    ///
    /// Returns `None` when the pair contributes nothing: both special factors are zero,
    /// or it lies outside every active cutoff.
    #[inline]
    pub fn calculate_pair(
        forcefield: &Forcefield,
        coeff: &MixedPair,
        charges: (f64, f64),
        dist: f64,
        separation: Option<BondSeparation>,
    ) -> Option<PairContribution> {
        let special = &forcefield.special_bonds;
        let factor_lj = special.vdw_factor(separation);
        let factor_coul = special.coulomb_factor(separation);
        if factor_lj == 0.0 && factor_coul == 0.0 {
            return None;
        }

        let mut contribution = PairContribution::default();
        let mut dedr = 0.0;
        let mut active = false;

        if factor_lj != 0.0 && dist <= forcefield.cutoff {
            let energy = potentials::lennard_jones_12_6(dist, coeff.sigma, coeff.epsilon);
            contribution.vdw = factor_lj * (energy - coeff.offset);
            dedr += factor_lj
                * potentials::lennard_jones_12_6_derivative(dist, coeff.sigma, coeff.epsilon);
            active = true;
        }

        if factor_coul != 0.0
            && forcefield.pair_style.has_coulomb()
            && dist <= forcefield.coulomb_cutoff
        {
            let (qi, qj) = charges;
            let conversion = forcefield.coulomb_constant();
            contribution.coulomb = factor_coul
                * potentials::coulomb(dist, qi, qj, forcefield.dielectric, conversion);
            dedr += factor_coul
                * potentials::coulomb_derivative(dist, qi, qj, forcefield.dielectric, conversion);
            active = true;
        }

        if !active {
            return None;
        }
        contribution.fpair = dedr / dist;
        Some(contribution)
    }

    /// Bond energy and the radial force factor `(dE/dr) / r`.
    #[inline]
    pub fn calculate_bond(style: &BondStyle, dist: f64) -> (f64, f64) {
        (style.energy(dist), style.derivative(dist) / dist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forcefield::params::{CoefficientTable, ForcefieldSettings};

    fn forcefield(extra_pair: &str) -> Forcefield {
        let content = format!(
            r#"
            [pair]
            style = "lj/cut/coul/cut"
            cutoff = 10.0
            {}

            [pair.coeffs]
            1 = {{ epsilon = 1.0, sigma = 3.5 }}
            3 = {{ epsilon = 0.25, sigma = 2.0 }}

            [special-bonds]
            lj = [0.0, 0.0, 0.5]
            coul = [0.0, 0.0, 0.5]
            "#,
            extra_pair
        );
        let settings: ForcefieldSettings = toml::from_str(&content).unwrap();
        Forcefield::from_settings(&settings, &CoefficientTable::default()).unwrap()
    }

    #[test]
    fn table_mixes_present_types_and_leaves_gaps_empty() {
        let table = PairCoeffTable::build(&forcefield(""));
        let like = table.get(1, 1).unwrap();
        assert_eq!((like.epsilon, like.sigma), (1.0, 3.5));
        let unlike = table.get(1, 3).unwrap();
        assert_eq!(unlike.epsilon, 0.5);
        assert_eq!(unlike.sigma, 7f64.sqrt());
        assert_eq!(table.get(3, 1), table.get(1, 3));
        assert!(table.get(2, 2).is_none());
        assert!(table.get(0, 1).is_none());
        assert!(table.get(4, 1).is_none());
    }

    #[test]
    fn sparse_type_ids_only_store_declared_pairs() {
        let content = r#"
            [pair]
            style = "lj/cut"
            cutoff = 10.0

            [pair.coeffs]
            1 = { epsilon = 1.0, sigma = 3.5 }
            200000 = { epsilon = 0.25, sigma = 2.0 }
        "#;
        let settings: ForcefieldSettings = toml::from_str(content).unwrap();
        let ff = Forcefield::from_settings(&settings, &CoefficientTable::default()).unwrap();
        let table = PairCoeffTable::build(&ff);
        assert_eq!(table.n_entries(), 3);
        assert_eq!(table.get(200000, 1).unwrap().epsilon, 0.5);
        assert_eq!(table.get(200000, 200000).unwrap().sigma, 2.0);
        assert!(table.get(2, 1).is_none());
    }

    #[test]
    fn unrelated_pair_gets_full_strength() {
        let ff = forcefield("");
        let table = PairCoeffTable::build(&ff);
        let coeff = table.get(1, 1).unwrap();
        let c = EnergyCalculator::calculate_pair(&ff, coeff, (0.0, 0.0), 5.0, None).unwrap();
        let ratio: f64 = 0.7;
        assert!((c.vdw - 4.0 * (ratio.powi(12) - ratio.powi(6))).abs() < 1e-12);
        assert_eq!(c.coulomb, 0.0);
    }

    #[test]
    fn excluded_neighbors_are_skipped() {
        let ff = forcefield("");
        let table = PairCoeffTable::build(&ff);
        let coeff = table.get(1, 1).unwrap();
        for separation in [BondSeparation::OneTwo, BondSeparation::OneThree] {
            assert!(
                EnergyCalculator::calculate_pair(&ff, coeff, (1.0, 1.0), 4.0, Some(separation))
                    .is_none()
            );
        }
    }

    #[test]
    fn one_four_pair_is_scaled_by_half() {
        let ff = forcefield("");
        let table = PairCoeffTable::build(&ff);
        let coeff = table.get(1, 1).unwrap();
        let full = EnergyCalculator::calculate_pair(&ff, coeff, (0.5, -0.5), 5.0, None).unwrap();
        let scaled = EnergyCalculator::calculate_pair(
            &ff,
            coeff,
            (0.5, -0.5),
            5.0,
            Some(BondSeparation::OneFour),
        )
        .unwrap();
        assert_eq!(scaled.vdw, 0.5 * full.vdw);
        assert_eq!(scaled.coulomb, 0.5 * full.coulomb);
        assert!((scaled.fpair - 0.5 * full.fpair).abs() < 1e-15);
    }

    #[test]
    fn pair_beyond_cutoff_contributes_nothing() {
        let ff = forcefield("");
        let table = PairCoeffTable::build(&ff);
        let coeff = table.get(1, 1).unwrap();
        assert!(EnergyCalculator::calculate_pair(&ff, coeff, (1.0, 1.0), 10.5, None).is_none());
        assert!(EnergyCalculator::calculate_pair(&ff, coeff, (1.0, 1.0), 10.0, None).is_some());
    }

    #[test]
    fn coulomb_uses_unit_conversion_constant() {
        let ff = forcefield("");
        let table = PairCoeffTable::build(&ff);
        let coeff = table.get(1, 1).unwrap();
        let c = EnergyCalculator::calculate_pair(&ff, coeff, (1.0, -1.0), 2.0, None).unwrap();
        assert!((c.coulomb + 332.06371 / 2.0).abs() < 1e-9);
    }

    #[test]
    fn shifted_potential_vanishes_at_cutoff() {
        let ff = forcefield("shift = true");
        let table = PairCoeffTable::build(&ff);
        let coeff = table.get(1, 1).unwrap();
        assert!(coeff.offset < 0.0);
        let at_cutoff =
            EnergyCalculator::calculate_pair(&ff, coeff, (0.0, 0.0), 10.0, None).unwrap();
        assert!(at_cutoff.vdw.abs() < 1e-15);
    }

    #[test]
    fn tail_energy_sums_ordered_type_pairs() {
        let ff = forcefield("tail = true");
        let table = PairCoeffTable::build(&ff);
        let counts = BTreeMap::from([(1, 10), (3, 4)]);
        let volume = 8000.0;

        let term = |ti: usize, tj: usize| {
            let c = table.get(ti, tj).unwrap();
            potentials::lennard_jones_tail(10.0, c.sigma, c.epsilon)
        };
        let expected = (100.0 * term(1, 1) + 40.0 * term(1, 3) + 40.0 * term(3, 1)
            + 16.0 * term(3, 3))
            / volume;
        let etail = table.tail_energy(10.0, &counts, volume);
        assert!((etail - expected).abs() < 1e-15);
        assert!(etail < 0.0);
    }

    #[test]
    fn bond_force_factor_is_derivative_over_distance() {
        let style = BondStyle::Harmonic { k: 50.0, r0: 4.0 };
        let (energy, fbond) = EnergyCalculator::calculate_bond(&style, 5.0);
        assert_eq!(energy, 50.0);
        assert_eq!(fbond, 20.0);
    }
}
