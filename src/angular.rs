//! Angular polynomials a_m(θ).
//!
//! ```text
//! a_m(θ) = cos(mθ)    m > 0
//!          sin(-mθ)   m < 0
//!          1          m = 0
//! ```
//!
//! with `∫_0^{2π} a_m a_m' dθ = δ_mm' (1 + δ_m0) π`.

use std::f64::consts::PI;
use std::fmt;

use crate::error::{check_lengths, Result};
use crate::expr::{Expr, Variable};

/// Angular normalization constant `N_m = 1 / √((1 + δ_m0) π)`.
pub fn angular_normalization(m: i32) -> f64 {
    1.0 / (epsilon(m) * PI).sqrt()
}

/// Neumann factor `ε_m = 1 + δ_m0`.
pub(crate) fn epsilon(m: i32) -> f64 {
    if m == 0 {
        2.0
    } else {
        1.0
    }
}

/// Build the symbolic unnormalized `a_m(θ)`. Every integer `m` is accepted.
pub fn build_angular(m: i32) -> Expr {
    let arg = |k: u32| Expr::var(Variable::Theta).scale(k as f64);
    match m {
        0 => Expr::one(),
        m if m > 0 => Expr::cos(arg(m.unsigned_abs())),
        m => Expr::sin(arg(m.unsigned_abs())),
    }
}

/// Angular polynomial `a_m(θ)`, optionally orthonormalized.
#[derive(Debug, Clone, PartialEq)]
pub struct Angular {
    m: i32,
    orthonormal: bool,
    expr: Expr,
    derivative: Expr,
}

impl Angular {
    pub fn new(m: i32, orthonormal: bool) -> Self {
        let mut expr = build_angular(m);
        if orthonormal {
            expr = expr.scale(angular_normalization(m));
        }
        let derivative = expr.derivative(Variable::Theta);
        Self {
            m,
            orthonormal,
            expr,
            derivative,
        }
    }

    pub fn m(&self) -> i32 {
        self.m
    }

    pub fn is_orthonormal(&self) -> bool {
        self.orthonormal
    }

    /// Factor applied to the unnormalized function: `N_m` or 1.
    pub fn scale(&self) -> f64 {
        if self.orthonormal {
            angular_normalization(self.m)
        } else {
            1.0
        }
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn evaluate(&self, theta: f64) -> f64 {
        self.expr.evaluate(0.0, theta)
    }

    pub fn evaluate_many(&self, theta: &[f64]) -> Vec<f64> {
        theta.iter().map(|&t| self.evaluate(t)).collect()
    }

    /// Evaluate at Cartesian `(x, y)`, i.e. at `θ = atan2(y, x)`.
    pub fn cart(&self, x: f64, y: f64) -> f64 {
        self.evaluate(y.atan2(x))
    }

    pub fn cart_many(&self, x: &[f64], y: &[f64]) -> Result<Vec<f64>> {
        check_lengths(x, y)?;
        Ok(x.iter().zip(y).map(|(&xi, &yi)| self.cart(xi, yi)).collect())
    }

    /// Symbolic `d/dθ` of the stored expression.
    pub fn derivative(&self) -> &Expr {
        &self.derivative
    }

    pub fn derivative_at(&self, theta: f64) -> f64 {
        self.derivative.evaluate(0.0, theta)
    }

    /// `∫_0^{2π} a(θ) a'(θ) dθ`, from the closed-form orthogonality relation.
    pub fn dot(&self, other: &Angular) -> f64 {
        if self.m != other.m {
            return 0.0;
        }
        self.scale() * other.scale() * epsilon(self.m) * PI
    }
}

impl fmt::Display for Angular {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Angular(m={}, ortho_norm={}) : {}>",
            self.m, self.orthonormal, self.expr
        )
    }
}
