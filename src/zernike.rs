//! Zernike polynomials Z_n^m(ρ, θ) = r_n^|m|(ρ) · a_m(θ).
//!
//! Inner product on the unit disk:
//!
//! ```text
//! ⟨z_n^m, z_n'^m'⟩ = ∫_0^{2π} ∫_0^1 z_n^m z_n'^m' ρ dρ dθ
//!                  = δ_nn' δ_mm' (1 + δ_m0) π / (2n + 2)
//! ```
//!
//! The orthonormal variant is scaled by `N_n^m = √((2n+2) / ((1+δ_m0) π))`, the
//! product of the radial and angular constants.
//!
//! # Cartesian derivatives
//!
//! ```text
//! ∂Z/∂x = dR/dρ · A · cos θ − (R/ρ) · dA/dθ · sin θ
//! ∂Z/∂y = dR/dρ · A · sin θ + (R/ρ) · dA/dθ · cos θ
//! ```
//!
//! The `R/ρ` term is singular at the origin. It is evaluated as-is, so gradients
//! at `ρ = 0` come back non-finite; callers that need a value there must handle
//! the origin themselves.

use std::fmt;

use tracing::trace;

use crate::angular::{angular_normalization, epsilon, Angular};
use crate::error::{check_lengths, Result, ZernikeError};
use crate::expr::{Expr, Variable};
use crate::grid::to_polar;
use crate::indexing::IndexScheme;
use crate::radial::{radial_normalization, Radial};

/// Combined normalization constant `N_n^m = N_n · N_m`.
pub fn zernike_normalization(n: u32, m: i32) -> f64 {
    radial_normalization(n) * angular_normalization(m)
}

/// Squared norm `⟨z_n^m, z_n^m⟩` of the unnormalized polynomial; zero when
/// `n - |m|` is odd.
pub fn zernike_norm_squared(n: u32, m: i32) -> f64 {
    let am = m.unsigned_abs();
    if am > n || (n - am) % 2 != 0 {
        return 0.0;
    }
    epsilon(m) * std::f64::consts::PI / (2.0 * n as f64 + 2.0)
}

/// Zernike polynomial `z_n^m`, optionally orthonormalized.
#[derive(Debug, Clone, PartialEq)]
pub struct Zernike {
    n: u32,
    m: i32,
    orthonormal: bool,
    radial: Radial,
    angular: Angular,
    expr: Expr,
}

impl Zernike {
    /// Build `z_n^m` from `Radial(n, |m|)` and `Angular(m)`.
    ///
    /// Fails with [`ZernikeError::InvalidIndices`] when `|m| > n`.
    pub fn new(n: u32, m: i32, orthonormal: bool) -> Result<Self> {
        if m.unsigned_abs() > n {
            return Err(ZernikeError::InvalidIndices {
                n: n as i64,
                m: m as i64,
            });
        }
        Ok(Self::from_valid(n, m, orthonormal))
    }

    /// Construction for indices already known to satisfy `|m| <= n`.
    pub(crate) fn from_valid(n: u32, m: i32, orthonormal: bool) -> Self {
        let radial = Radial::from_valid(n, m.unsigned_abs(), orthonormal);
        let angular = Angular::new(m, orthonormal);
        let expr = (radial.expr().clone() * angular.expr().clone()).expand();
        trace!("built Zernike(n={}, m={}): {}", n, m, expr);
        Self {
            n,
            m,
            orthonormal,
            radial,
            angular,
            expr,
        }
    }

    /// Build the polynomial at single index `j` of the given ordering.
    pub fn from_index(scheme: IndexScheme, j: u32, orthonormal: bool) -> Result<Self> {
        let (n, m) = scheme.indices(j)?;
        Ok(Self::from_valid(n, m, orthonormal))
    }

    /// Single index of this polynomial in the given ordering.
    pub fn index(&self, scheme: IndexScheme) -> Result<u32> {
        scheme.index(self.n, self.m)
    }

    pub fn n(&self) -> u32 {
        self.n
    }

    pub fn m(&self) -> i32 {
        self.m
    }

    pub fn is_orthonormal(&self) -> bool {
        self.orthonormal
    }

    pub fn is_zero(&self) -> bool {
        self.radial.is_zero()
    }

    /// Radial component `r_n^|m|`.
    pub fn radial(&self) -> &Radial {
        &self.radial
    }

    /// Angular component `a_m`.
    pub fn angular(&self) -> &Angular {
        &self.angular
    }

    /// Factor applied to the unnormalized polynomial: `N_n^m` or 1.
    pub fn scale(&self) -> f64 {
        self.radial.scale() * self.angular.scale()
    }

    /// Expanded product expression `R(ρ)·A(θ)`.
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn evaluate(&self, rho: f64, theta: f64) -> f64 {
        self.expr.evaluate(rho, theta)
    }

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
        Ok(x.iter().zip(y).map(|(&xi, &yi)| self.cart(xi, yi)).collect())
    }

    /// Symbolic `∂Z/∂ρ`.
    pub fn derivative_rho(&self) -> Expr {
        self.expr.derivative(Variable::Rho)
    }

    /// Symbolic `∂Z/∂θ`.
    pub fn derivative_theta(&self) -> Expr {
        self.expr.derivative(Variable::Theta)
    }

    /// Cartesian gradient `(∂Z/∂x, ∂Z/∂y)` at `(x, y)`.
    ///
    /// Non-finite at the origin, see the module documentation.
    pub fn gradient(&self, x: f64, y: f64) -> (f64, f64) {
        let (rho, theta) = to_polar(x, y);
        let r = self.radial.evaluate(rho);
        let dr = self.radial.derivative_at(rho);
        let a = self.angular.evaluate(theta);
        let da = self.angular.derivative_at(theta);
        let (sin_t, cos_t) = theta.sin_cos();
        let r_over_rho = r / rho;
        (
            dr * a * cos_t - r_over_rho * da * sin_t,
            dr * a * sin_t + r_over_rho * da * cos_t,
        )
    }

    /// `⟨Z, Z'⟩` over the unit disk: the product of the radial and angular
    /// inner products.
    pub fn dot(&self, other: &Zernike) -> f64 {
        let angular = self.angular.dot(&other.angular);
        if angular == 0.0 {
            return 0.0;
        }
        self.radial.dot(&other.radial) * angular
    }
}

impl fmt::Display for Zernike {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Zernike(n={}, m={}, ortho_norm={}) : {}>",
            self.n, self.m, self.orthonormal, self.expr
        )
    }
}
