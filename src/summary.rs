//! Tabular summaries of polynomial families.
//!
//! Each function returns one row per polynomial over an index range, with the
//! closed form in text and LaTeX, the normalization constant and the self inner
//! product. Rendering the rows (tables, dataframes, plots) is left to the caller.

use std::ops::RangeInclusive;

use crate::angular::{angular_normalization, Angular};
use crate::indexing::IndexScheme;
use crate::radial::{radial_normalization, Radial};
use crate::zernike::{zernike_normalization, Zernike};

/// One radial polynomial `r_n^m`.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialRow {
    /// Radial order
    pub n: u32,
    /// Azimuthal order
    pub m: u32,
    /// Closed form in plain text, e.g. `2*rho**2 - 1`
    pub expression: String,
    /// Closed form as LaTeX
    pub latex: String,
    /// Orthonormalization constant `√(2n+2)`
    pub normalization: f64,
    /// `⟨r_n^m, r_n^m⟩` of the unnormalized polynomial
    pub self_dot: f64,
}

/// One angular function `a_m`.
#[derive(Debug, Clone, PartialEq)]
pub struct AngularRow {
    /// Signed azimuthal order; negative selects the sine
    pub m: i32,
    /// Closed form in plain text, e.g. `cos(2*theta)`
    pub expression: String,
    /// Closed form as LaTeX
    pub latex: String,
    /// Orthonormalization constant
    pub normalization: f64,
    /// `⟨a_m, a_m⟩` of the unnormalized function
    pub self_dot: f64,
}

/// One Zernike polynomial `z_n^m` with its single indices.
#[derive(Debug, Clone, PartialEq)]
pub struct ZernikeRow {
    /// Radial order
    pub n: u32,
    /// Signed azimuthal order
    pub m: i32,
    /// Noll index (1-based)
    pub noll: u32,
    /// OSA/ANSI index (0-based)
    pub osa: u32,
    /// Fringe index (1-based)
    pub fringe: u32,
    /// Closed form in plain text
    pub expression: String,
    /// Closed form as LaTeX
    pub latex: String,
    /// Orthonormalization constant `N_n^m`
    pub normalization: f64,
    /// `⟨z_n^m, z_n^m⟩` over the unit disk, unnormalized
    pub self_dot: f64,
}

/// Non-vanishing radial polynomials with `n ≤ n_max`, ordered by `n` then `m`.
pub fn radial_table(n_max: u32) -> Vec<RadialRow> {
    let mut rows = Vec::new();
    for n in 0..=n_max {
        for m in (n % 2..=n).step_by(2) {
            let r = Radial::from_valid(n, m, false);
            rows.push(RadialRow {
                n,
                m,
                expression: r.expr().to_string(),
                latex: r.expr().to_latex(),
                normalization: radial_normalization(n),
                self_dot: r.dot(&r),
            });
        }
    }
    rows
}

/// Angular functions for every `m` in `range`.
pub fn angular_table(range: RangeInclusive<i32>) -> Vec<AngularRow> {
    range
        .map(|m| {
            let a = Angular::new(m, false);
            AngularRow {
                m,
                expression: a.expr().to_string(),
                latex: a.expr().to_latex(),
                normalization: angular_normalization(m),
                self_dot: a.dot(&a),
            }
        })
        .collect()
}

/// Non-vanishing Zernike polynomials with `n ≤ n_max`, in OSA order.
pub fn zernike_table(n_max: u32) -> Vec<ZernikeRow> {
    let mut rows = Vec::new();
    for n in 0..=n_max {
        let n_i = n as i32;
        for m in (-n_i..=n_i).step_by(2) {
            let z = Zernike::from_valid(n, m, false);
            let (Ok(noll), Ok(osa), Ok(fringe)) = (
                z.index(IndexScheme::Noll),
                z.index(IndexScheme::Osa),
                z.index(IndexScheme::Fringe),
            ) else {
                continue;
            };
            rows.push(ZernikeRow {
                n,
                m,
                noll,
                osa,
                fringe,
                expression: z.expr().to_string(),
                latex: z.expr().to_latex(),
                normalization: zernike_normalization(n, m),
                self_dot: z.dot(&z),
            });
        }
    }
    rows
}
