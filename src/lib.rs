//! # zernike
//!
//! Radial, angular and Zernike polynomials on the unit disk, with the wavefront
//! algebra built on top of them.
//!
//! Every polynomial is built once from its integer indices into an immutable
//! symbolic [`Expr`], which is then evaluated (at scalars or paired arrays, in
//! polar or Cartesian coordinates), differentiated, or rendered as text/LaTeX.
//! Inner products use the closed-form orthogonality relations where they apply
//! and exact Gauss–Legendre quadrature otherwise.
//!
//! ## Features
//!
//! - **Radial polynomials** `r_n^m(ρ)` from the classical finite sum
//! - **Angular functions** `a_m(θ)`: `cos(mθ)`, `sin(-mθ)` or 1
//! - **Zernike polynomials** `z_n^m = r_n^|m| · a_m`, plain or orthonormal
//! - **Wavefronts**: sparse coefficient maps with out-of-place arithmetic and
//!   closed-form rotation of the coordinate system
//! - **Zernike transform**: fit coefficients to a sampled surface by least
//!   squares or orthogonality projection
//! - **Indexing schemes**: Noll, OSA/ANSI and Fringe single indices
//!
//! ## Example
//!
//! ```
//! use std::f64::consts::PI;
//! use zernike::{grid::PolarGrid, Radial, WaveFront, Zernike};
//!
//! let r = Radial::new(2, 2, false).unwrap();
//! assert_eq!(r.expr().to_string(), "rho**2");
//! assert!((r.dot(&r) - 1.0 / 6.0).abs() < 1e-15);
//!
//! let z = Zernike::new(4, 2, false).unwrap();
//! assert!((z.evaluate(0.5, PI / 2.0) - 0.5).abs() < 1e-12);
//!
//! // Express a wavefront in a rotated frame, then recover it from samples.
//! let wfe = WaveFront::new([((5, 3), 2.0), ((3, 1), -0.5)]).unwrap();
//! let alpha = PI / 5.0;
//! let grid = PolarGrid::new(31, 41);
//! let shifted: Vec<f64> = grid.theta.iter().map(|t| t + alpha).collect();
//! let samples = wfe.evaluate_many(&grid.rho, &shifted).unwrap();
//! let fitted = WaveFront::from_sampled_wavefront(&grid.x, &grid.y, &samples, 6).unwrap();
//! let expected = wfe.rotate(alpha);
//! assert!((fitted.coef(5, -3) - expected.coef(5, -3)).abs() < 1e-8);
//! ```
//!
//! ## Conventions
//!
//! - ρ is the normalized radius on the unit disk and θ the polar angle, with
//!   `ρ = hypot(x, y)` and `θ = atan2(y, x)` for Cartesian input.
//! - Wavefront coefficients always refer to the unnormalized basis `z_n^m`.
//! - All types are immutable after construction and `Send + Sync`; concurrent
//!   evaluation needs no coordination.

pub mod angular;
pub mod error;
pub mod expr;
pub mod fit;
pub mod grid;
pub mod indexing;
pub mod quadrature;
pub mod radial;
pub mod summary;
pub mod wavefront;
pub mod zernike;

pub use angular::{angular_normalization, build_angular, Angular};
pub use error::{Result, ZernikeError};
pub use expr::{Expr, Variable};
pub use fit::{fit_wavefront, FitConfig, FitMethod, WaveFrontFitResult};
pub use indexing::IndexScheme;
pub use radial::{build_radial, radial_normalization, Radial};
pub use wavefront::{WaveFront, ZernikeIndex};
pub use zernike::{zernike_norm_squared, zernike_normalization, Zernike};
