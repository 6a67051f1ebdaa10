//! Zernike transform: decomposition of a sampled surface onto the Zernike basis.
//!
//! Given samples `G(x_i, y_i)` this module recovers coefficients `a_n^m` for every
//! `(n, m)` with `n ≤ n_max`, `|m| ≤ n` and `n - |m|` even, cosine (`m > 0`) and
//! sine (`m < 0`) terms separately. Two estimators are available:
//!
//! - [`FitMethod::LeastSquares`] (default) solves the overdetermined system
//!   `Z a = G` with an SVD. It works for any sampling layout (polar meshgrids,
//!   scattered points, masked apertures) and is exact when the surface lies in
//!   the span of the basis.
//! - [`FitMethod::Projection`] uses orthogonality directly,
//!
//!   ```text
//!   a_n^m = (2n+2) / (ε_m π) · ⟨G, z_n^m⟩,   ⟨F, G⟩ = ∫∫ F G ρ dρ dθ
//!   ```
//!
//!   with the inner product approximated as `(π / N) Σ G z` over the in-disk
//!   samples. This assumes the samples are uniformly distributed over the disk
//!   (e.g. a regular Cartesian grid); on other layouts prefer least squares.
//!
//! Samples outside the unit disk or with non-finite values are discarded before
//! fitting.

use std::collections::BTreeMap;

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::angular::epsilon;
use crate::error::{check_lengths, Result, ZernikeError};
use crate::grid::to_polar;
use crate::wavefront::{WaveFront, ZernikeIndex};
use crate::zernike::Zernike;

/// Coefficient estimator used by [`fit_wavefront`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitMethod {
    #[default]
    LeastSquares,
    Projection,
}

/// Configuration for wavefront fitting.
#[derive(Debug, Clone)]
pub struct FitConfig {
    /// Highest radial order to fit. Default 10.
    pub n_max: u32,
    /// Coefficient estimator. Default least squares.
    pub method: FitMethod,
    /// Minimum usable samples per fitted term; fewer raises
    /// [`ZernikeError::DegenerateSampling`]. Default 3.
    pub min_samples_per_term: usize,
    /// Relative singular-value cutoff for the least-squares solve and rank test.
    /// Default 1e-12.
    pub rcond: f64,
    /// Samples with `ρ > 1 + disk_tolerance` are discarded. Default 1e-9.
    pub disk_tolerance: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            n_max: 10,
            method: FitMethod::LeastSquares,
            min_samples_per_term: 3,
            rcond: 1e-12,
            disk_tolerance: 1e-9,
        }
    }
}

/// Result of a wavefront fit.
#[derive(Debug, Clone)]
pub struct WaveFrontFitResult {
    /// Fitted coefficients, one entry per term (including near-zero ones).
    pub wavefront: WaveFront,
    /// RMS of `G - W` over the samples used.
    pub rms_residual: f64,
    /// Number of in-disk finite samples used.
    pub n_samples: usize,
    /// Number of basis terms fitted.
    pub n_terms: usize,
}

/// Every `(n, m)` with `n ≤ n_max`, `|m| ≤ n` and `n - |m|` even, ordered by `n`
/// then `m`.
pub fn fit_terms(n_max: u32) -> Vec<ZernikeIndex> {
    let mut terms = Vec::with_capacity(((n_max + 1) * (n_max + 2) / 2) as usize);
    for n in 0..=n_max {
        let n_i = n as i32;
        for m in (-n_i..=n_i).step_by(2) {
            terms.push((n, m));
        }
    }
    terms
}

/// A usable sample in polar coordinates.
struct DiskSample {
    rho: f64,
    theta: f64,
    value: f64,
}

fn gather_disk_samples(x: &[f64], y: &[f64], z: &[f64], disk_tolerance: f64) -> Vec<DiskSample> {
    x.iter()
        .zip(y)
        .zip(z)
        .filter(|((xi, yi), zi)| xi.is_finite() && yi.is_finite() && zi.is_finite())
        .filter_map(|((&xi, &yi), &zi)| {
            let (rho, theta) = to_polar(xi, yi);
            (rho <= 1.0 + disk_tolerance).then_some(DiskSample {
                rho,
                theta,
                value: zi,
            })
        })
        .collect()
}

/// Decompose the sampled surface `z(x, y)` onto the Zernike basis.
///
/// `x`, `y` and `z` are paired element-wise (flattened grids are fine).
pub fn fit_wavefront(
    x: &[f64],
    y: &[f64],
    z: &[f64],
    config: &FitConfig,
) -> Result<WaveFrontFitResult> {
    check_lengths(x, y)?;
    check_lengths(x, z)?;

    let samples = gather_disk_samples(x, y, z, config.disk_tolerance);
    let terms = fit_terms(config.n_max);
    let required = config.min_samples_per_term * terms.len();
    if samples.len() < required.max(1) {
        return Err(ZernikeError::DegenerateSampling {
            in_disk: samples.len(),
            terms: terms.len(),
            reason: "too few samples inside the unit disk",
        });
    }

    let basis: Vec<Zernike> = terms
        .iter()
        .map(|&(n, m)| Zernike::from_valid(n, m, false))
        .collect();
    let design = DMatrix::<f64>::from_fn(samples.len(), basis.len(), |i, k| {
        basis[k].evaluate(samples[i].rho, samples[i].theta)
    });
    let values = DVector::<f64>::from_iterator(samples.len(), samples.iter().map(|s| s.value));

    let coeffs = match config.method {
        FitMethod::LeastSquares => solve_least_squares(&design, &values, config.rcond)?,
        FitMethod::Projection => project(&design, &values, &terms),
    };

    let residual = &values - &design * &coeffs;
    let rms_residual = (residual.norm_squared() / samples.len() as f64).sqrt();

    let wavefront = WaveFront::from_map(
        terms
            .iter()
            .zip(coeffs.iter())
            .map(|(&k, &a)| (k, a))
            .collect::<BTreeMap<_, _>>(),
    );

    debug!(
        "Zernike fit ({:?}): n_max={}, terms={}, samples={}/{}, rms residual {:.3e}",
        config.method,
        config.n_max,
        terms.len(),
        samples.len(),
        x.len(),
        rms_residual
    );

    Ok(WaveFrontFitResult {
        wavefront,
        rms_residual,
        n_samples: samples.len(),
        n_terms: terms.len(),
    })
}

/// Solve `A a = b` in the least-squares sense, failing when `A` does not have
/// full column rank.
fn solve_least_squares(a: &DMatrix<f64>, b: &DVector<f64>, rcond: f64) -> Result<DVector<f64>> {
    let n_terms = a.ncols();
    let svd = a.clone().svd(true, true);
    let eps = rcond * svd.singular_values.max();
    let rank = svd.rank(eps);
    if rank < n_terms {
        debug!("Zernike fit: design matrix rank {} < {} terms", rank, n_terms);
        return Err(ZernikeError::DegenerateSampling {
            in_disk: a.nrows(),
            terms: n_terms,
            reason: "sample layout cannot separate all requested terms",
        });
    }
    svd.solve(b, eps)
        .map_err(|_| ZernikeError::DegenerateSampling {
            in_disk: a.nrows(),
            terms: n_terms,
            reason: "singular value decomposition failed",
        })
}

/// Orthogonality projection with a uniform-area quadrature of the disk.
fn project(a: &DMatrix<f64>, b: &DVector<f64>, terms: &[ZernikeIndex]) -> DVector<f64> {
    let n_samples = a.nrows() as f64;
    let inner = a.transpose() * b;
    DVector::from_iterator(
        terms.len(),
        terms.iter().zip(inner.iter()).map(|(&(n, m), &g)| {
            // (2n+2)/(ε π) · (π/N) Σ G z
            (2.0 * n as f64 + 2.0) / epsilon(m) * g / n_samples
        }),
    )
}

impl WaveFront {
    /// Zernike transform of the sampled surface `z(x, y)` up to radial order
    /// `n_max`, using least squares and the default [`FitConfig`] thresholds.
    pub fn from_sampled_wavefront(x: &[f64], y: &[f64], z: &[f64], n_max: u32) -> Result<WaveFront> {
        let config = FitConfig {
            n_max,
            ..Default::default()
        };
        fit_wavefront(x, y, z, &config).map(|r| r.wavefront)
    }
}
