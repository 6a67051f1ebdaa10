//! Wavefronts: finite linear combinations of Zernike polynomials.
//!
//! A [`WaveFront`] maps `(n, m)` pairs to coefficients `a_n^m` of the
//! **unnormalized** basis `z_n^m`; absent pairs are zero. Adding an orthonormal
//! [`Zernike`] therefore contributes its normalization constant as coefficient,
//! so the represented surface is the same whichever convention built it.
//!
//! All arithmetic is out-of-place: every operation returns a new wavefront.
//!
//! # Rotation
//!
//! Expressing the surface in a coordinate system rotated by `α`
//! (`W'(ρ, θ) = W(ρ, θ + α)`) mixes each cosine/sine pair of equal `n` and `|m|`:
//!
//! ```text
//! b_n^m  =  a_n^m cos(mα) + a_n^-m sin(mα)
//! b_n^-m = -a_n^m sin(mα) + a_n^-m cos(mα)
//! ```
//!
//! A missing partner coefficient counts as zero, so a single `a_n^m` term
//! generally rotates into two.

use std::collections::{BTreeMap, BTreeSet};
use std::f64::consts::PI;
use std::iter::Sum;
use std::ops::{Add, Mul, Neg, Sub};
use std::sync::OnceLock;

use crate::error::{check_lengths, Result, ZernikeError};
use crate::expr::Expr;
use crate::grid::to_polar;
use crate::zernike::{zernike_norm_squared, Zernike};

/// `(n, m)` key of a wavefront coefficient.
pub type ZernikeIndex = (u32, i32);

#[derive(Debug, Clone, Default)]
pub struct WaveFront {
    coefs: BTreeMap<ZernikeIndex, f64>,
    /// Unnormalized basis in `coefs` order, built on first evaluation.
    basis: OnceLock<Vec<Zernike>>,
}

impl PartialEq for WaveFront {
    fn eq(&self, other: &Self) -> bool {
        self.coefs == other.coefs
    }
}

impl WaveFront {
    /// Build from `((n, m), a)` pairs. Repeated keys are summed.
    ///
    /// Fails with [`ZernikeError::InvalidIndices`] for any key with `|m| > n`.
    pub fn new<I>(coefs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (ZernikeIndex, f64)>,
    {
        let mut map = BTreeMap::new();
        for ((n, m), a) in coefs {
            if m.unsigned_abs() > n {
                return Err(ZernikeError::InvalidIndices {
                    n: n as i64,
                    m: m as i64,
                });
            }
            *map.entry((n, m)).or_insert(0.0) += a;
        }
        Ok(Self::from_map(map))
    }

    /// Wavefront with no terms.
    pub fn zero() -> Self {
        Self::default()
    }

    pub(crate) fn from_map(coefs: BTreeMap<ZernikeIndex, f64>) -> Self {
        Self {
            coefs,
            basis: OnceLock::new(),
        }
    }

    pub fn coefs(&self) -> &BTreeMap<ZernikeIndex, f64> {
        &self.coefs
    }

    /// Coefficient of `z_n^m`, zero when absent.
    pub fn coef(&self, n: u32, m: i32) -> f64 {
        self.coefs.get(&(n, m)).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.coefs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefs.is_empty()
    }

    /// Highest radial order present, if any.
    pub fn max_order(&self) -> Option<u32> {
        self.coefs.keys().map(|&(n, _)| n).max()
    }

    /// Unnormalized basis polynomials paired with their coefficients.
    ///
    /// The polynomials are built once per wavefront and shared by every
    /// evaluation path.
    fn terms(&self) -> impl Iterator<Item = (f64, &Zernike)> + '_ {
        let basis = self.basis.get_or_init(|| {
            self.coefs
                .keys()
                .map(|&(n, m)| Zernike::from_valid(n, m, false))
                .collect()
        });
        self.coefs.values().copied().zip(basis)
    }

    /// Symbolic `Σ a_i z_i`.
    pub fn expr(&self) -> Expr {
        Expr::sum(
            self.terms()
                .map(|(a, z)| z.expr().clone().scale(a))
                .collect(),
        )
    }

    pub fn evaluate(&self, rho: f64, theta: f64) -> f64 {
        self.terms().map(|(a, z)| a * z.evaluate(rho, theta)).sum()
    }

    /// Evaluate at paired `(ρ_i, θ_i)` samples.
    pub fn evaluate_many(&self, rho: &[f64], theta: &[f64]) -> Result<Vec<f64>> {
        check_lengths(rho, theta)?;
        Ok(rho
            .iter()
            .zip(theta)
            .map(|(&r, &t)| self.evaluate(r, t))
            .collect())
    }

    pub fn cart(&self, x: f64, y: f64) -> f64 {
        let (rho, theta) = to_polar(x, y);
        self.evaluate(rho, theta)
    }

    pub fn cart_many(&self, x: &[f64], y: &[f64]) -> Result<Vec<f64>> {
        check_lengths(x, y)?;
        let (rho, theta): (Vec<f64>, Vec<f64>) =
            x.iter().zip(y).map(|(&xi, &yi)| to_polar(xi, yi)).unzip();
        self.evaluate_many(&rho, &theta)
    }

    /// Cartesian gradient `(∂W/∂x, ∂W/∂y)`. Non-finite at the origin.
    pub fn gradient(&self, x: f64, y: f64) -> (f64, f64) {
        self.terms().fold((0.0, 0.0), |(gx, gy), (a, z)| {
            let (dx, dy) = z.gradient(x, y);
            (gx + a * dx, gy + a * dy)
        })
    }

    /// Coefficients in a coordinate system rotated by `alpha` radians.
    pub fn rotate(&self, alpha: f64) -> WaveFront {
        let mut rotated = BTreeMap::new();
        let mut blocks = BTreeSet::new();
        for (&(n, m), &a) in &self.coefs {
            if m == 0 {
                rotated.insert((n, 0), a);
            } else {
                blocks.insert((n, m.unsigned_abs() as i32));
            }
        }
        for (n, k) in blocks {
            let a_cos = self.coef(n, k);
            let a_sin = self.coef(n, -k);
            let (s, c) = (k as f64 * alpha).sin_cos();
            rotated.insert((n, k), a_cos * c + a_sin * s);
            rotated.insert((n, -k), -a_cos * s + a_sin * c);
        }
        WaveFront::from_map(rotated)
    }

    /// Copy without coefficients whose magnitude is at most `tolerance`.
    pub fn pruned(&self, tolerance: f64) -> WaveFront {
        WaveFront::from_map(
            self.coefs
                .iter()
                .filter(|(_, a)| a.abs() > tolerance)
                .map(|(&k, &a)| (k, a))
                .collect(),
        )
    }

    /// Every coefficient multiplied by `c`.
    pub fn scaled(&self, c: f64) -> WaveFront {
        WaveFront::from_map(self.coefs.iter().map(|(&k, &a)| (k, a * c)).collect())
    }

    /// `⟨W, W'⟩ = Σ a_i b_i ‖z_i‖²` over the unit disk.
    pub fn dot(&self, other: &WaveFront) -> f64 {
        self.coefs
            .iter()
            .filter_map(|(&(n, m), &a)| {
                other
                    .coefs
                    .get(&(n, m))
                    .map(|&b| a * b * zernike_norm_squared(n, m))
            })
            .sum()
    }

    /// Root-mean-square of the surface over the unit disk, piston included.
    pub fn rms(&self) -> f64 {
        (self.dot(self) / PI).sqrt()
    }
}

impl From<&Zernike> for WaveFront {
    fn from(z: &Zernike) -> Self {
        let mut coefs = BTreeMap::new();
        coefs.insert((z.n(), z.m()), z.scale());
        WaveFront::from_map(coefs)
    }
}

impl From<Zernike> for WaveFront {
    fn from(z: Zernike) -> Self {
        WaveFront::from(&z)
    }
}

impl Add for &WaveFront {
    type Output = WaveFront;

    fn add(self, rhs: &WaveFront) -> WaveFront {
        let mut coefs = self.coefs.clone();
        for (&k, &a) in &rhs.coefs {
            *coefs.entry(k).or_insert(0.0) += a;
        }
        WaveFront::from_map(coefs)
    }
}

impl Add for WaveFront {
    type Output = WaveFront;

    fn add(self, rhs: WaveFront) -> WaveFront {
        &self + &rhs
    }
}

impl Add<&Zernike> for &WaveFront {
    type Output = WaveFront;

    fn add(self, rhs: &Zernike) -> WaveFront {
        self + &WaveFront::from(rhs)
    }
}

impl Add<Zernike> for WaveFront {
    type Output = WaveFront;

    fn add(self, rhs: Zernike) -> WaveFront {
        &self + &rhs
    }
}

impl Add<&WaveFront> for &Zernike {
    type Output = WaveFront;

    fn add(self, rhs: &WaveFront) -> WaveFront {
        &WaveFront::from(self) + rhs
    }
}

impl Add for &Zernike {
    type Output = WaveFront;

    fn add(self, rhs: &Zernike) -> WaveFront {
        &WaveFront::from(self) + &WaveFront::from(rhs)
    }
}

impl Add for Zernike {
    type Output = WaveFront;

    fn add(self, rhs: Zernike) -> WaveFront {
        &self + &rhs
    }
}

impl Sub for &WaveFront {
    type Output = WaveFront;

    fn sub(self, rhs: &WaveFront) -> WaveFront {
        self + &rhs.scaled(-1.0)
    }
}

impl Neg for &WaveFront {
    type Output = WaveFront;

    fn neg(self) -> WaveFront {
        self.scaled(-1.0)
    }
}

impl Mul<f64> for &WaveFront {
    type Output = WaveFront;

    fn mul(self, rhs: f64) -> WaveFront {
        self.scaled(rhs)
    }
}

impl Mul<f64> for &Zernike {
    type Output = WaveFront;

    fn mul(self, rhs: f64) -> WaveFront {
        WaveFront::from(self).scaled(rhs)
    }
}

impl<'a> Sum<&'a Zernike> for WaveFront {
    fn sum<I: Iterator<Item = &'a Zernike>>(iter: I) -> WaveFront {
        iter.fold(WaveFront::zero(), |acc, z| &acc + z)
    }
}

impl Sum for WaveFront {
    fn sum<I: Iterator<Item = WaveFront>>(iter: I) -> WaveFront {
        iter.fold(WaveFront::zero(), |acc, w| acc + w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> WaveFront {
        WaveFront::new([((5, 3), 2.0), ((3, 1), -0.5), ((4, 0), 0.3), ((2, -2), 0.7)]).unwrap()
    }

    #[test]
    fn test_new_validates_and_merges() {
        assert!(WaveFront::new([((2, 3), 1.0)]).is_err());
        let w = WaveFront::new([((2, 0), 1.0), ((2, 0), 0.5)]).unwrap();
        assert_eq!(w.len(), 1);
        assert_eq!(w.coef(2, 0), 1.5);
        assert_eq!(w.coef(7, 1), 0.0);
    }

    #[test]
    fn test_zernike_addition() {
        let z = Zernike::new(4, 2, false).unwrap();
        let w = &z + &z;
        assert_eq!(w.len(), 1);
        assert_eq!(w.coef(4, 2), 2.0);

        let other = Zernike::new(3, -1, false).unwrap();
        let w = &z + &other;
        assert_eq!(w.len(), 2);
        assert_eq!(w.coef(4, 2), 1.0);
        assert_eq!(w.coef(3, -1), 1.0);
    }

    #[test]
    fn test_addition_commutative_associative() {
        let a = Zernike::new(2, 0, false).unwrap();
        let b = Zernike::new(3, 1, false).unwrap();
        let c = Zernike::new(2, 0, false).unwrap();
        assert_eq!(&a + &b, &b + &a);
        let left = &(&a + &b) + &c;
        let right = &a + &(&b + &c);
        assert_eq!(left, right);
        assert_eq!(left.coef(2, 0), 2.0);
        let total: WaveFront = [a, b, c].iter().sum();
        assert_eq!(total, left);
    }

    #[test]
    fn test_orthonormal_term_uses_unnormalized_coefficient() {
        let z = Zernike::new(2, 2, true).unwrap();
        let w = WaveFront::from(&z);
        assert!((w.coef(2, 2) - z.scale()).abs() < 1e-15);
        let (rho, theta) = (0.6, 0.4);
        assert!((w.evaluate(rho, theta) - z.evaluate(rho, theta)).abs() < 1e-14);
    }

    #[test]
    fn test_evaluate_is_sum_of_terms() {
        let w = sample();
        let (rho, theta) = (0.7_f64, 1.9_f64);
        let expected: f64 = w
            .coefs()
            .iter()
            .map(|(&(n, m), &a)| a * Zernike::new(n, m, false).unwrap().evaluate(rho, theta))
            .sum();
        assert!((w.evaluate(rho, theta) - expected).abs() < 1e-14);
        assert!((w.expr().evaluate(rho, theta) - expected).abs() < 1e-13);
        let (x, y) = (rho * theta.cos(), rho * theta.sin());
        assert!((w.cart(x, y) - expected).abs() < 1e-13);
        let many = w.cart_many(&[x, 0.0], &[y, 0.5]).unwrap();
        assert!((many[0] - expected).abs() < 1e-13);
    }

    #[test]
    fn test_rotation_single_term_splits() {
        let w = WaveFront::new([((5, 3), 2.0)]).unwrap();
        let alpha = PI / 5.0;
        let r = w.rotate(alpha);
        assert_eq!(r.len(), 2);
        assert!((r.coef(5, 3) - 2.0 * (3.0 * alpha).cos()).abs() < 1e-15);
        assert!((r.coef(5, -3) + 2.0 * (3.0 * alpha).sin()).abs() < 1e-15);
    }

    #[test]
    fn test_rotation_matches_rotated_evaluation() {
        let w = sample();
        let alpha = 0.83;
        let r = w.rotate(alpha);
        for &(rho, theta) in &[(0.3, 0.2), (0.9, 2.2), (0.55, -1.0)] {
            assert!(
                (r.evaluate(rho, theta) - w.evaluate(rho, theta + alpha)).abs() < 1e-12,
                "({}, {})",
                rho,
                theta
            );
        }
    }

    #[test]
    fn test_rotation_roundtrip() {
        let w = sample();
        for alpha in [0.1, PI / 5.0, 1.7, -2.4] {
            let back = w.rotate(alpha).rotate(-alpha);
            for n in 0..=5u32 {
                for m in -(n as i32)..=n as i32 {
                    assert!(
                        (back.coef(n, m) - w.coef(n, m)).abs() < 1e-12,
                        "alpha={} ({}, {})",
                        alpha,
                        n,
                        m
                    );
                }
            }
        }
    }

    #[test]
    fn test_rotation_preserves_norm() {
        let w = sample();
        assert!((w.rotate(1.1).rms() - w.rms()).abs() < 1e-12);
    }

    #[test]
    fn test_arithmetic() {
        let w = sample();
        let zero = &w - &w;
        assert!(zero.coefs().values().all(|a| a.abs() < 1e-15));
        assert!(zero.pruned(1e-12).is_empty());
        let doubled = &w * 2.0;
        assert_eq!(doubled.coef(5, 3), 4.0);
        assert_eq!((-&w).coef(3, 1), 0.5);
        let z = Zernike::new(5, 3, false).unwrap();
        assert_eq!((&z * 3.0).coef(5, 3), 3.0);
        assert_eq!(w.max_order(), Some(5));
    }

    #[test]
    fn test_dot_and_rms() {
        // piston of 1 has rms 1
        let p = WaveFront::new([((0, 0), 1.0)]).unwrap();
        assert!((p.rms() - 1.0).abs() < 1e-15);
        // ‖z_2^2‖² = π/6, so rms² = a²/6
        let w = WaveFront::new([((2, 2), 3.0)]).unwrap();
        assert!((w.rms() - (9.0_f64 / 6.0).sqrt()).abs() < 1e-14);
        assert_eq!(p.dot(&w), 0.0);
    }

    #[test]
    fn test_gradient_sums_terms() {
        let w = sample();
        let (x, y) = (0.2, -0.35);
        let h = 1e-6;
        let (gx, gy) = w.gradient(x, y);
        let fx = (w.cart(x + h, y) - w.cart(x - h, y)) / (2.0 * h);
        let fy = (w.cart(x, y + h) - w.cart(x, y - h)) / (2.0 * h);
        assert!((gx - fx).abs() < 1e-6);
        assert!((gy - fy).abs() < 1e-6);
    }

    #[test]
    fn test_basis_built_once_for_scalar_paths() {
        let w = sample();
        assert!(w.basis.get().is_none());

        let first = w.evaluate(0.4, 0.9);
        let basis = w.basis.get().unwrap().as_ptr();
        assert_eq!(w.basis.get().unwrap().len(), w.len());

        let _ = w.cart(0.1, -0.3);
        let _ = w.gradient(0.2, 0.5);
        let _ = w.expr();
        assert_eq!(w.evaluate(0.4, 0.9), first);
        assert_eq!(w.basis.get().unwrap().as_ptr(), basis);

        let many = w.evaluate_many(&[0.4, 0.8], &[0.9, -2.0]).unwrap();
        assert_eq!(many[0], first);
        assert_eq!(w.basis.get().unwrap().as_ptr(), basis);

        // cached basis does not affect equality
        assert_eq!(w, sample());
    }
}
