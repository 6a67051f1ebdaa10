//! Sampling grids on the unit disk and polar/Cartesian conversion.
//!
//! [`PolarGrid`] reproduces the usual `meshgrid(linspace(0, 1), linspace(0, 2π))`
//! sampling: θ varies along the outer axis, ρ along the inner one, and the
//! flattened vectors are stored row-major.

use std::f64::consts::PI;

/// Convert Cartesian `(x, y)` to polar `(ρ, θ)` with `θ = atan2(y, x)`.
#[inline]
pub fn to_polar(x: f64, y: f64) -> (f64, f64) {
    (x.hypot(y), y.atan2(x))
}

/// Convert polar `(ρ, θ)` to Cartesian `(x, y)`.
#[inline]
pub fn to_cartesian(rho: f64, theta: f64) -> (f64, f64) {
    (rho * theta.cos(), rho * theta.sin())
}

/// `num` evenly spaced values over `[start, stop]`, endpoints included.
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            (0..num)
                .map(|i| {
                    if i == num - 1 {
                        stop
                    } else {
                        start + step * i as f64
                    }
                })
                .collect()
        }
    }
}

/// Flattened polar sampling of the unit disk.
///
/// Samples are stored angle-major: sample `i` sits at radius index
/// `i % n_rho` and angle index `i / n_rho`.
#[derive(Debug, Clone)]
pub struct PolarGrid {
    /// Number of radii
    pub n_rho: usize,
    /// Number of angles
    pub n_theta: usize,
    /// Radius of each sample
    pub rho: Vec<f64>,
    /// Polar angle of each sample, radians
    pub theta: Vec<f64>,
    /// Cartesian x of each sample
    pub x: Vec<f64>,
    /// Cartesian y of each sample
    pub y: Vec<f64>,
}

impl PolarGrid {
    /// `n_rho` radii in `[0, 1]` by `n_theta` angles in `[0, 2π]`.
    pub fn new(n_rho: usize, n_theta: usize) -> Self {
        let rhos = linspace(0.0, 1.0, n_rho);
        let thetas = linspace(0.0, 2.0 * PI, n_theta);
        let len = n_rho * n_theta;
        let mut rho = Vec::with_capacity(len);
        let mut theta = Vec::with_capacity(len);
        let mut x = Vec::with_capacity(len);
        let mut y = Vec::with_capacity(len);
        for &t in &thetas {
            for &r in &rhos {
                let (xi, yi) = to_cartesian(r, t);
                rho.push(r);
                theta.push(t);
                x.push(xi);
                y.push(yi);
            }
        }
        Self {
            n_rho,
            n_theta,
            rho,
            theta,
            x,
            y,
        }
    }

    pub fn len(&self) -> usize {
        self.rho.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rho.is_empty()
    }
}

/// Regular `n × n` Cartesian grid over `[-1, 1]²`, flattened row-major
/// (`y` outer, `x` inner). Points outside the unit disk are kept.
pub fn cartesian_grid(n: usize) -> (Vec<f64>, Vec<f64>) {
    let axis = linspace(-1.0, 1.0, n);
    let mut x = Vec::with_capacity(n * n);
    let mut y = Vec::with_capacity(n * n);
    for &yi in &axis {
        for &xi in &axis {
            x.push(xi);
            y.push(yi);
        }
    }
    (x, y)
}
