//! Error type shared by every fallible operation in the crate.
//!
//! Index validation happens eagerly when a polynomial or wavefront is built, so
//! evaluation, inner products and rotation never fail. Numeric singularities
//! (e.g. `R/ρ` at the origin) are not errors; they surface as non-finite values.

/// Errors produced by polynomial construction, index conversion and fitting.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ZernikeError {
    /// Indices do not describe a polynomial: `m > n` for a radial term,
    /// or `|m| > n` for a Zernike term.
    #[error("invalid indices (n={n}, m={m}): require n >= |m| >= 0")]
    InvalidIndices { n: i64, m: i64 },

    /// A single-index value lies outside the domain of its ordering scheme.
    #[error("index {index} is not valid in the {scheme} ordering")]
    InvalidIndex { scheme: &'static str, index: u32 },

    /// The sampled surface cannot resolve the requested polynomial order.
    #[error("degenerate sampling: {in_disk} usable samples for {terms} terms ({reason})")]
    DegenerateSampling {
        in_disk: usize,
        terms: usize,
        reason: &'static str,
    },

    /// Two array-valued inputs that must be paired have different lengths.
    #[error("mismatched input lengths: expected {expected}, got {got}")]
    MismatchedInputs { expected: usize, got: usize },
}

pub type Result<T> = std::result::Result<T, ZernikeError>;

/// Fail with [`ZernikeError::MismatchedInputs`] unless both slices have the same length.
pub(crate) fn check_lengths(a: &[f64], b: &[f64]) -> Result<()> {
    if a.len() != b.len() {
        return Err(ZernikeError::MismatchedInputs {
            expected: a.len(),
            got: b.len(),
        });
    }
    Ok(())
}
