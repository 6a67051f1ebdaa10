//! Single-index orderings of the Zernike polynomials.
//!
//! Three conventions are supported:
//!
//! - **Noll** (1-based): `j = n(n+1)/2 + |m| + k`, with `k ∈ {0, 1}` chosen so that
//!   even `j` carries the cosine (`m > 0`) term and odd `j` the sine (`m < 0`) term.
//! - **OSA/ANSI** (0-based): `j = (n(n+2) + m) / 2`.
//! - **Fringe** (1-based): `j = (1 + (n+|m|)/2)² - 2|m| + [m < 0]`.
//!
//! Only pairs with `|m| ≤ n` and `n - |m|` even have an index.

use crate::error::{Result, ZernikeError};

/// Single-index ordering convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexScheme {
    /// Noll, starting at 1
    Noll,
    /// OSA/ANSI, starting at 0
    Osa,
    /// Fringe (University of Arizona), starting at 1
    Fringe,
}

fn check_pair(n: u32, m: i32) -> Result<()> {
    let am = m.unsigned_abs();
    if am > n || (n - am) % 2 != 0 {
        return Err(ZernikeError::InvalidIndices {
            n: n as i64,
            m: m as i64,
        });
    }
    Ok(())
}

impl IndexScheme {
    pub fn name(self) -> &'static str {
        match self {
            IndexScheme::Noll => "Noll",
            IndexScheme::Osa => "OSA/ANSI",
            IndexScheme::Fringe => "Fringe",
        }
    }

    /// Smallest valid single index.
    pub fn first(self) -> u32 {
        match self {
            IndexScheme::Osa => 0,
            IndexScheme::Noll | IndexScheme::Fringe => 1,
        }
    }

    /// Single index of the pair `(n, m)`.
    ///
    /// Fails with [`ZernikeError::InvalidIndices`] when the pair has no index or
    /// its index does not fit in `u32`.
    pub fn index(self, n: u32, m: i32) -> Result<u32> {
        check_pair(n, m)?;
        let am = u128::from(m.unsigned_abs());
        let wide = u128::from(n);
        let j = match self {
            IndexScheme::Noll => {
                let base = wide * (wide + 1) / 2 + am;
                let bump = match m {
                    0 => 1,
                    m if m > 0 => base % 2,
                    _ => 1 - base % 2,
                };
                base + bump
            }
            IndexScheme::Osa => ((wide * (wide + 2)) as i128 + i128::from(m)) as u128 / 2,
            IndexScheme::Fringe => {
                let p = 1 + (wide + am) / 2;
                p * p - 2 * am + u128::from(m < 0)
            }
        };
        u32::try_from(j).map_err(|_| ZernikeError::InvalidIndices {
            n: n as i64,
            m: m as i64,
        })
    }

    /// Pair `(n, m)` of the single index `j`.
    pub fn indices(self, j: u32) -> Result<(u32, i32)> {
        let invalid = ZernikeError::InvalidIndex {
            scheme: self.name(),
            index: j,
        };
        let wide = u64::from(j);
        match self {
            IndexScheme::Noll => {
                if j == 0 {
                    return Err(invalid);
                }
                // radial order n: n(n+1)/2 < j ≤ (n+1)(n+2)/2
                let mut n = 0u64;
                while (n + 1) * (n + 2) / 2 < wide {
                    n += 1;
                }
                let n = n as u32;
                (-(n as i32)..=n as i32)
                    .step_by(2)
                    .find(|&m| self.index(n, m).ok() == Some(j))
                    .map(|m| (n, m))
                    .ok_or(invalid)
            }
            IndexScheme::Osa => {
                let mut n = 0u64;
                while (n + 1) * (n + 2) / 2 <= wide {
                    n += 1;
                }
                let m = 2 * wide as i64 - (n * (n + 2)) as i64;
                Ok((n as u32, m as i32))
            }
            IndexScheme::Fringe => {
                if j == 0 {
                    return Err(invalid);
                }
                // j ∈ [p² + 1, (p+1)²] where p = (n + |m|) / 2
                let mut p = 0u64;
                while (p + 1) * (p + 1) < wide {
                    p += 1;
                }
                let d = (p + 1) * (p + 1) - wide;
                let (am, negative) = if d % 2 == 0 {
                    (d / 2, false)
                } else {
                    ((d + 1) / 2, true)
                };
                let n = (2 * p - am) as u32;
                let m = if negative { -(am as i32) } else { am as i32 };
                Ok((n, m))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noll_table() {
        let expected = [
            (1, (0, 0)),
            (2, (1, 1)),
            (3, (1, -1)),
            (4, (2, 0)),
            (5, (2, -2)),
            (6, (2, 2)),
            (7, (3, -1)),
            (8, (3, 1)),
            (9, (3, -3)),
            (10, (3, 3)),
            (11, (4, 0)),
            (12, (4, 2)),
            (13, (4, -2)),
            (14, (4, 4)),
            (15, (4, -4)),
        ];
        for (j, (n, m)) in expected {
            assert_eq!(IndexScheme::Noll.index(n, m), Ok(j), "({}, {})", n, m);
            assert_eq!(IndexScheme::Noll.indices(j), Ok((n, m)), "j={}", j);
        }
    }

    #[test]
    fn test_osa_table() {
        let expected = [
            (0, (0, 0)),
            (1, (1, -1)),
            (2, (1, 1)),
            (3, (2, -2)),
            (4, (2, 0)),
            (5, (2, 2)),
            (6, (3, -3)),
            (9, (3, 3)),
            (12, (4, 0)),
        ];
        for (j, (n, m)) in expected {
            assert_eq!(IndexScheme::Osa.index(n, m), Ok(j));
            assert_eq!(IndexScheme::Osa.indices(j), Ok((n, m)));
        }
    }

    #[test]
    fn test_fringe_table() {
        let expected = [
            (1, (0, 0)),
            (2, (1, 1)),
            (3, (1, -1)),
            (4, (2, 0)),
            (5, (2, 2)),
            (6, (2, -2)),
            (7, (3, 1)),
            (8, (3, -1)),
            (9, (4, 0)),
            (10, (3, 3)),
            (11, (3, -3)),
            (16, (6, 0)),
        ];
        for (j, (n, m)) in expected {
            assert_eq!(IndexScheme::Fringe.index(n, m), Ok(j), "({}, {})", n, m);
            assert_eq!(IndexScheme::Fringe.indices(j), Ok((n, m)), "j={}", j);
        }
    }

    #[test]
    fn test_roundtrip_all_schemes() {
        for scheme in [IndexScheme::Noll, IndexScheme::Osa, IndexScheme::Fringe] {
            for j in scheme.first()..scheme.first() + 120 {
                let (n, m) = scheme.indices(j).unwrap();
                assert_eq!(scheme.index(n, m), Ok(j), "{} j={}", scheme.name(), j);
            }
        }
    }

    #[test]
    fn test_invalid() {
        assert!(IndexScheme::Noll.indices(0).is_err());
        assert!(IndexScheme::Fringe.indices(0).is_err());
        assert!(IndexScheme::Noll.index(3, 2).is_err());
        assert!(IndexScheme::Osa.index(2, 4).is_err());
    }

    #[test]
    fn test_large_orders() {
        // n(n+2) leaves u32 here, the index itself still fits
        assert_eq!(IndexScheme::Osa.index(70_000, 0), Ok(2_450_070_000));
        assert_eq!(IndexScheme::Osa.indices(2_450_070_000), Ok((70_000, 0)));
        assert_eq!(IndexScheme::Noll.index(70_000, 0), Ok(2_450_035_001));
        assert_eq!(IndexScheme::Noll.indices(2_450_035_001), Ok((70_000, 0)));
        assert_eq!(IndexScheme::Fringe.index(70_000, 0), Ok(1_225_070_001));
        assert_eq!(IndexScheme::Fringe.indices(1_225_070_001), Ok((70_000, 0)));

        for scheme in [IndexScheme::Noll, IndexScheme::Osa, IndexScheme::Fringe] {
            assert_eq!(
                scheme.index(200_000, 0),
                Err(ZernikeError::InvalidIndices { n: 200_000, m: 0 }),
                "{}",
                scheme.name()
            );
            assert!(scheme.index(u32::MAX, -1).is_err());
            let (n, m) = scheme.indices(u32::MAX).unwrap();
            assert_eq!(scheme.index(n, m), Ok(u32::MAX), "{}", scheme.name());
        }
    }
}
