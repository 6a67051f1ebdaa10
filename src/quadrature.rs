//! Gauss–Legendre quadrature.
//!
//! An `n`-point rule integrates polynomials of degree `2n - 1` exactly, which is
//! what the radial inner product needs when the closed-form orthogonality
//! relation does not apply (radial terms with different `m`).

use std::f64::consts::PI;

/// Nodes and weights of the `n`-point Gauss–Legendre rule on `[-1, 1]`.
///
/// Nodes are the roots of `P_n`, found by Newton iteration from the
/// Chebyshev-like initial guess `cos(π (i + 3/4) / (n + 1/2))`.
pub fn gauss_legendre(n: usize) -> (Vec<f64>, Vec<f64>) {
    let mut nodes = vec![0.0; n];
    let mut weights = vec![0.0; n];
    if n == 0 {
        return (nodes, weights);
    }

    // Roots are symmetric, so only half need to be found.
    let half = n.div_ceil(2);
    for i in 0..half {
        let mut x = (PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
        for _ in 0..100 {
            let (p, dp) = legendre_with_derivative(n, x);
            let delta = p / dp;
            x -= delta;
            if delta.abs() < 1e-15 {
                break;
            }
        }
        let (_, dp) = legendre_with_derivative(n, x);
        let w = 2.0 / ((1.0 - x * x) * dp * dp);
        nodes[i] = -x;
        nodes[n - 1 - i] = x;
        weights[i] = w;
        weights[n - 1 - i] = w;
    }
    (nodes, weights)
}

/// `P_n(x)` and `P_n'(x)` via the three-term recurrence.
fn legendre_with_derivative(n: usize, x: f64) -> (f64, f64) {
    let (mut p_prev, mut p_curr) = (1.0, x);
    if n == 0 {
        return (1.0, 0.0);
    }
    for k in 1..n {
        let p_next = ((2 * k + 1) as f64 * x * p_curr - k as f64 * p_prev) / (k + 1) as f64;
        p_prev = p_curr;
        p_curr = p_next;
    }
    let dp = n as f64 * (x * p_curr - p_prev) / (x * x - 1.0);
    (p_curr, dp)
}

/// Integrate `f` over `[a, b]` with an `n`-point Gauss–Legendre rule.
pub fn integrate<F>(f: F, a: f64, b: f64, n: usize) -> f64
where
    F: Fn(f64) -> f64,
{
    let (nodes, weights) = gauss_legendre(n);
    let half_width = 0.5 * (b - a);
    let mid = 0.5 * (a + b);
    nodes
        .iter()
        .zip(&weights)
        .map(|(&x, &w)| w * f(mid + half_width * x))
        .sum::<f64>()
        * half_width
}

/// Smallest rule that integrates a polynomial of degree `degree` exactly.
pub fn points_for_degree(degree: u32) -> usize {
    (degree as usize / 2) + 1
}
