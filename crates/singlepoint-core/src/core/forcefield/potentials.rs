use std::f64::consts::PI;

/// 12-6 Lennard-Jones energy, `4 eps [(sigma/r)^12 - (sigma/r)^6]`.
#[inline]
pub fn lennard_jones_12_6(dist: f64, sigma: f64, epsilon: f64) -> f64 {
    let sr2 = (sigma / dist).powi(2);
    let sr6 = sr2 * sr2 * sr2;
    4.0 * epsilon * (sr6 * sr6 - sr6)
}

/// Radial derivative `dE/dr` of [`lennard_jones_12_6`].
#[inline]
pub fn lennard_jones_12_6_derivative(dist: f64, sigma: f64, epsilon: f64) -> f64 {
    let sr2 = (sigma / dist).powi(2);
    let sr6 = sr2 * sr2 * sr2;
    24.0 * epsilon * (sr6 - 2.0 * sr6 * sr6) / dist
}

/// Analytic energy integral of the 12-6 potential beyond `cutoff` for one ordered pair
/// of atom types, per unit number density: `8 pi eps sigma^6 (sigma^6 - 3 rc^6) / (9 rc^9)`.
#[inline]
pub fn lennard_jones_tail(cutoff: f64, sigma: f64, epsilon: f64) -> f64 {
    let sig6 = sigma.powi(6);
    let rc3 = cutoff.powi(3);
    let rc6 = rc3 * rc3;
    let rc9 = rc3 * rc6;
    8.0 * PI * epsilon * sig6 * (sig6 - 3.0 * rc6) / (9.0 * rc9)
}

#[inline]
pub fn coulomb(dist: f64, q1: f64, q2: f64, dielectric: f64, conversion: f64) -> f64 {
    conversion * q1 * q2 / (dielectric * dist)
}

#[inline]
pub fn coulomb_derivative(dist: f64, q1: f64, q2: f64, dielectric: f64, conversion: f64) -> f64 {
    -coulomb(dist, q1, q2, dielectric, conversion) / dist
}

/// Harmonic bond, `K (r - r0)^2`. The 1/2 factor is absorbed into `K`.
#[inline]
pub fn harmonic_bond(dist: f64, k: f64, r0: f64) -> f64 {
    let dr = dist - r0;
    k * dr * dr
}

#[inline]
pub fn harmonic_bond_derivative(dist: f64, k: f64, r0: f64) -> f64 {
    2.0 * k * (dist - r0)
}

/// Morse bond, `D (1 - exp(-alpha (r - r0)))^2 - D`, with its minimum of `-D` at `r0`.
#[inline]
pub fn morse_bond(dist: f64, d0: f64, alpha: f64, r0: f64) -> f64 {
    let ralpha = (-alpha * (dist - r0)).exp();
    d0 * (1.0 - ralpha).powi(2) - d0
}

#[inline]
pub fn morse_bond_derivative(dist: f64, d0: f64, alpha: f64, r0: f64) -> f64 {
    let ralpha = (-alpha * (dist - r0)).exp();
    2.0 * d0 * alpha * (1.0 - ralpha) * ralpha
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    fn numerical_derivative(f: impl Fn(f64) -> f64, x: f64) -> f64 {
        let h = 1e-6;
        (f(x + h) - f(x - h)) / (2.0 * h)
    }

    #[test]
    fn lennard_jones_is_zero_at_sigma() {
        assert!(f64_approx_equal(lennard_jones_12_6(3.5, 3.5, 1.0), 0.0));
    }

    #[test]
    fn lennard_jones_at_minimum_returns_negative_well_depth() {
        let r_min = 2f64.powf(1.0 / 6.0) * 3.5;
        assert!(f64_approx_equal(lennard_jones_12_6(r_min, 3.5, 0.7), -0.7));
        assert!(lennard_jones_12_6_derivative(r_min, 3.5, 0.7).abs() < 1e-12);
    }

    #[test]
    fn lennard_jones_matches_closed_form_at_five_angstrom() {
        let ratio: f64 = 3.5 / 5.0;
        let expected = 4.0 * (ratio.powi(12) - ratio.powi(6));
        assert!(f64_approx_equal(lennard_jones_12_6(5.0, 3.5, 1.0), expected));
    }

    #[test]
    fn lennard_jones_at_zero_distance_is_not_clamped() {
        let at_origin = lennard_jones_12_6(0.0, 3.5, 1.0);
        assert!(at_origin.is_nan() || at_origin.is_infinite());
        assert!(lennard_jones_12_6(1e-3, 3.5, 1.0) > 1e40);
    }

    #[test]
    fn lennard_jones_derivative_matches_finite_difference() {
        for &r in &[3.0, 3.9, 5.0, 12.0] {
            let analytic = lennard_jones_12_6_derivative(r, 3.5, 1.0);
            let numeric = numerical_derivative(|x| lennard_jones_12_6(x, 3.5, 1.0), r);
            assert!((analytic - numeric).abs() < 1e-6, "r = {}", r);
        }
    }

    #[test]
    fn lennard_jones_tail_is_negative_for_large_cutoff() {
        let tail = lennard_jones_tail(20.0, 3.5, 1.0);
        let expected = 8.0 * PI * 3.5f64.powi(6) * (3.5f64.powi(6) - 3.0 * 20f64.powi(6))
            / (9.0 * 20f64.powi(9));
        assert!(tail < 0.0);
        assert!((tail - expected).abs() < 1e-12);
    }

    #[test]
    fn coulomb_calculates_repulsive_and_attractive_energy() {
        assert!(f64_approx_equal(coulomb(1.0, 1.0, 1.0, 1.0, 332.06371), 332.06371));
        assert!(f64_approx_equal(coulomb(2.0, 1.0, -1.0, 1.0, 332.06371), -166.031855));
        assert!(f64_approx_equal(coulomb(2.0, 1.0, 1.0, 4.0, 1.0), 0.125));
    }

    #[test]
    fn coulomb_derivative_matches_finite_difference() {
        let analytic = coulomb_derivative(2.5, 0.4, -0.8, 1.0, 332.06371);
        let numeric = numerical_derivative(|x| coulomb(x, 0.4, -0.8, 1.0, 332.06371), 2.5);
        assert!((analytic - numeric).abs() < 1e-5);
    }

    #[test]
    fn harmonic_bond_uses_no_half_factor() {
        assert!(f64_approx_equal(harmonic_bond(5.0, 50.0, 4.0), 50.0));
        assert!(f64_approx_equal(harmonic_bond(3.0, 50.0, 4.0), 50.0));
        assert!(f64_approx_equal(harmonic_bond(4.0, 50.0, 4.0), 0.0));
        assert!(f64_approx_equal(harmonic_bond_derivative(5.0, 50.0, 4.0), 100.0));
    }

    #[test]
    fn morse_bond_has_minimum_of_minus_well_depth_at_r0() {
        assert!(f64_approx_equal(morse_bond(1.5, 2.0, 1.3, 1.5), -2.0));
        assert!(f64_approx_equal(morse_bond_derivative(1.5, 2.0, 1.3, 1.5), 0.0));
    }

    #[test]
    fn morse_bond_approaches_zero_at_dissociation() {
        assert!(morse_bond(100.0, 2.0, 1.3, 1.5).abs() < 1e-12);
    }

    #[test]
    fn morse_bond_derivative_matches_finite_difference() {
        for &r in &[1.0, 1.7, 3.0] {
            let analytic = morse_bond_derivative(r, 2.0, 1.3, 1.5);
            let numeric = numerical_derivative(|x| morse_bond(x, 2.0, 1.3, 1.5), r);
            assert!((analytic - numeric).abs() < 1e-6, "r = {}", r);
        }
    }
}
