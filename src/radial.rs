//! Radial polynomials r_n^m(ρ).
//!
//! For `n - m` even the closed form is the finite sum
//!
//! ```text
//! r_n^m(ρ) = Σ_{i=0}^{(n-m)/2} (-1)^i (n-i)! / (i! ((n+m)/2-i)! ((n-m)/2-i)!) · ρ^(n-2i)
//! ```
//!
//! and for `n - m` odd the polynomial is identically zero. The factorial ratio is
//! evaluated as the product of two binomials, `C(n-i, i) · C(n-2i, (n-m)/2-i)`,
//! which stays exact in integer arithmetic far beyond the range where the
//! factorials themselves overflow. Past `u128` (around n = 106) the coefficients
//! fall back to a running `f64` product.
//!
//! Evaluation uses the expanded power basis. The coefficients grow roughly like
//! `2^n` with alternating signs, so cancellation eats the `f64` mantissa well
//! before that limit: the absolute error tracks the largest coefficient, and by
//! n = 50 values are no longer meaningful (`r_50^0(1)` evaluates to ~11, not 1).
//!
//! Orthogonality on `[0, 1]` with weight ρ:
//!
//! ```text
//! ∫_0^1 r_n^m(ρ) r_n'^m(ρ) ρ dρ = δ_nn' / (2n + 2)
//! ```
//!
//! so the orthonormal variant is `R_n^m = √(2n+2) · r_n^m`.

use std::fmt;

use crate::error::{check_lengths, Result, ZernikeError};
use crate::expr::{Expr, Variable};
use crate::quadrature;

/// Radial normalization constant `N_n = √(2n + 2)`.
pub fn radial_normalization(n: u32) -> f64 {
    (2.0 * n as f64 + 2.0).sqrt()
}

/// Exact binomial coefficient `C(n, k)`, or `None` when it does not fit in `u128`.
fn binomial(n: u32, k: u32) -> Option<u128> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k) as u128;
    let n = n as u128;
    let mut c: u128 = 1;
    for j in 1..=k {
        // c·(n-k+j) is always divisible by j at this point
        c = c.checked_mul(n - k + j)? / j;
    }
    Some(c)
}

/// Binomial coefficient `C(n, k)` as a running floating-point product.
fn binomial_f64(n: u32, k: u32) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    (1..=k).fold(1.0, |c, j| c * (n - k + j) as f64 / j as f64)
}

/// `C(a, b) · C(c, d)`, exact while the product fits in `u128`.
fn binomial_product(a: u32, b: u32, c: u32, d: u32) -> f64 {
    binomial(a, b)
        .zip(binomial(c, d))
        .and_then(|(x, y)| x.checked_mul(y))
        .map(|v| v as f64)
        .unwrap_or_else(|| binomial_f64(a, b) * binomial_f64(c, d))
}

/// Closed-form terms `(power, coefficient)` of the unnormalized `r_n^m`, highest
/// power first. Empty when `n - m` is odd.
///
/// Callers guarantee `m <= n`.
pub(crate) fn radial_terms(n: u32, m: u32) -> Vec<(u32, f64)> {
    if (n - m) % 2 != 0 {
        return Vec::new();
    }
    let half = (n - m) / 2;
    (0..=half)
        .map(|i| {
            let magnitude = binomial_product(n - i, i, n - 2 * i, half - i);
            let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
            (n - 2 * i, sign * magnitude)
        })
        .collect()
}

/// Build the symbolic unnormalized `r_n^m(ρ)`.
///
/// Returns [`ZernikeError::InvalidIndices`] when `m > n`. The zero expression is
/// returned for `n - m` odd.
pub fn build_radial(n: u32, m: u32) -> Result<Expr> {
    if m > n {
        return Err(ZernikeError::InvalidIndices {
            n: n as i64,
            m: m as i64,
        });
    }
    Ok(terms_to_expr(&radial_terms(n, m), 1.0))
}

fn terms_to_expr(terms: &[(u32, f64)], scale: f64) -> Expr {
    Expr::sum(
        terms
            .iter()
            .map(|&(p, c)| Expr::pow(Expr::var(Variable::Rho), p).scale(c * scale))
            .collect(),
    )
}

/// Radial polynomial `r_n^m(ρ)`, optionally orthonormalized.
///
/// The expression and its ρ-derivative are built once at construction; all
/// evaluation goes through them.
#[derive(Debug, Clone, PartialEq)]
pub struct Radial {
    n: u32,
    m: u32,
    orthonormal: bool,
    expr: Expr,
    derivative: Expr,
}

impl Radial {
    /// Build `r_n^m`, or `√(2n+2)·r_n^m` when `orthonormal` is set.
    ///
    /// Fails with [`ZernikeError::InvalidIndices`] when `m > n`.
    pub fn new(n: u32, m: u32, orthonormal: bool) -> Result<Self> {
        if m > n {
            return Err(ZernikeError::InvalidIndices {
                n: n as i64,
                m: m as i64,
            });
        }
        Ok(Self::from_valid(n, m, orthonormal))
    }

    /// Construction for indices already known to satisfy `m <= n`.
    pub(crate) fn from_valid(n: u32, m: u32, orthonormal: bool) -> Self {
        let scale = if orthonormal {
            radial_normalization(n)
        } else {
            1.0
        };
        let expr = terms_to_expr(&radial_terms(n, m), scale);
        let derivative = expr.derivative(Variable::Rho);
        Self {
            n,
            m,
            orthonormal,
            expr,
            derivative,
        }
    }

    pub fn n(&self) -> u32 {
        self.n
    }

    pub fn m(&self) -> u32 {
        self.m
    }

    pub fn is_orthonormal(&self) -> bool {
        self.orthonormal
    }

    /// `true` when `n - m` is odd and the polynomial vanishes identically.
    pub fn is_zero(&self) -> bool {
        (self.n - self.m) % 2 != 0
    }

    /// Factor applied to the unnormalized polynomial: `√(2n+2)` or 1.
    pub fn scale(&self) -> f64 {
        if self.orthonormal {
            radial_normalization(self.n)
        } else {
            1.0
        }
    }

    /// Closed-form expression in ρ.
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// `(power, coefficient)` pairs of the stored polynomial, highest power first.
    pub fn coefficients(&self) -> Vec<(u32, f64)> {
        let scale = self.scale();
        radial_terms(self.n, self.m)
            .into_iter()
            .map(|(p, c)| (p, c * scale))
            .collect()
    }

    pub fn evaluate(&self, rho: f64) -> f64 {
        self.expr.evaluate(rho, 0.0)
    }

    pub fn evaluate_many(&self, rho: &[f64]) -> Vec<f64> {
        rho.iter().map(|&r| self.evaluate(r)).collect()
    }

    /// Evaluate at Cartesian `(x, y)`, i.e. at `ρ = hypot(x, y)`.
    pub fn cart(&self, x: f64, y: f64) -> f64 {
        self.evaluate(x.hypot(y))
    }

    pub fn cart_many(&self, x: &[f64], y: &[f64]) -> Result<Vec<f64>> {
        check_lengths(x, y)?;
        Ok(x.iter().zip(y).map(|(&xi, &yi)| self.cart(xi, yi)).collect())
    }

    /// Symbolic `d/dρ` of the stored expression.
    pub fn derivative(&self) -> &Expr {
        &self.derivative
    }

    pub fn derivative_at(&self, rho: f64) -> f64 {
        self.derivative.evaluate(rho, 0.0)
    }

    /// `∫_0^1 r(ρ) r'(ρ) ρ dρ`.
    ///
    /// Same-`m` pairs use the closed form `δ_nn' / (2n+2)` scaled by both
    /// normalization factors. Pairs with different `m` are not orthogonal in
    /// general and are integrated with a Gauss–Legendre rule of sufficient
    /// order to be exact for the polynomial integrand.
    pub fn dot(&self, other: &Radial) -> f64 {
        if self.is_zero() || other.is_zero() {
            return 0.0;
        }
        if self.m == other.m {
            if self.n != other.n {
                return 0.0;
            }
            return self.scale() * other.scale() / (2.0 * self.n as f64 + 2.0);
        }
        let points = quadrature::points_for_degree(self.n + other.n + 1);
        quadrature::integrate(
            |rho| self.evaluate(rho) * other.evaluate(rho) * rho,
            0.0,
            1.0,
            points,
        )
    }
}

impl fmt::Display for Radial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Radial(n={}, m={}, ortho_norm={}) : {}>",
            self.n, self.m, self.orthonormal, self.expr
        )
    }
}
