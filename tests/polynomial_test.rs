//! Integration tests for the polynomial families: documented values,
//! orthogonality against brute-force quadrature, and the public API surface.

use std::f64::consts::PI;

use zernike::quadrature::integrate;
use zernike::summary::{radial_table, zernike_table};
use zernike::{Angular, IndexScheme, Radial, WaveFront, Zernike, ZernikeError};

/// Numerically integrate `f(ρ, θ) ρ` over the unit disk.
fn disk_integral<F: Fn(f64, f64) -> f64>(f: F) -> f64 {
    integrate(
        |rho| integrate(|theta| f(rho, theta), 0.0, 2.0 * PI, 48) * rho,
        0.0,
        1.0,
        24,
    )
}

#[test]
fn test_documented_examples() {
    let r = Radial::new(2, 2, false).unwrap();
    assert_eq!(r.to_string(), "<Radial(n=2, m=2, ortho_norm=false) : rho**2>");
    assert!((r.evaluate(0.5) - 0.25).abs() < 1e-15);

    let r22 = Radial::new(2, 2, false).unwrap();
    let r42 = Radial::new(4, 2, false).unwrap();
    assert!(r22.dot(&r42).abs() < 1e-15);
    assert!((r22.dot(&r22) - 1.0 / 6.0).abs() < 1e-15);

    let a_m3 = Angular::new(-3, false);
    let a_4 = Angular::new(4, false);
    assert!(a_m3.dot(&a_4).abs() < 1e-15);
    assert!((a_m3.dot(&a_m3) - PI).abs() < 1e-15);
    let a_m3 = Angular::new(-3, true);
    assert!((a_m3.dot(&a_m3) - 1.0).abs() < 1e-15);

    let z = Zernike::new(4, 2, false).unwrap();
    assert_eq!(z.radial().to_string(), "<Radial(n=4, m=2, ortho_norm=false) : 4*rho**4 - 3*rho**2>");
    assert_eq!(z.angular().to_string(), "<Angular(m=2, ortho_norm=false) : cos(2*theta)>");
    assert!((z.evaluate(0.5, PI / 2.0) - 0.5).abs() < 1e-14);
}

#[test]
fn test_zernike_dot_matches_disk_quadrature() {
    let polys: Vec<Zernike> = [(2, 0), (2, 2), (3, -1), (4, 2), (4, -2), (5, 3)]
        .iter()
        .map(|&(n, m)| Zernike::new(n, m, false).unwrap())
        .collect();
    for a in &polys {
        for b in &polys {
            let numeric = disk_integral(|rho, theta| a.evaluate(rho, theta) * b.evaluate(rho, theta));
            assert!(
                (a.dot(b) - numeric).abs() < 1e-10,
                "<z_{}^{}, z_{}^{}>: {} vs {}",
                a.n(),
                a.m(),
                b.n(),
                b.m(),
                a.dot(b),
                numeric
            );
        }
    }
}

#[test]
fn test_orthonormal_family_is_orthonormal() {
    let polys: Vec<Zernike> = (0..21)
        .map(|j| Zernike::from_index(IndexScheme::Osa, j, true).unwrap())
        .collect();
    for (i, a) in polys.iter().enumerate() {
        for (k, b) in polys.iter().enumerate() {
            let expected = if i == k { 1.0 } else { 0.0 };
            assert!((a.dot(b) - expected).abs() < 1e-12);
        }
    }
}

#[test]
fn test_zero_radial_for_odd_difference() {
    for n in 0..=9u32 {
        for m in 0..=n {
            if (n - m) % 2 == 1 {
                let r = Radial::new(n, m, false).unwrap();
                assert!([0.0, 0.2, 0.77, 1.0].iter().all(|&p| r.evaluate(p) == 0.0));
            }
        }
    }
}

#[test]
fn test_invalid_indices_fail_at_construction() {
    assert!(matches!(
        Radial::new(1, 2, true),
        Err(ZernikeError::InvalidIndices { n: 1, m: 2 })
    ));
    assert!(Zernike::new(3, 4, false).is_err());
    assert!(Zernike::new(3, -4, false).is_err());
    assert!(WaveFront::new([((1, -2), 1.0)]).is_err());
}

#[test]
fn test_zernike_sum_builds_wavefront() {
    let z1 = Zernike::new(2, 0, false).unwrap();
    let z2 = Zernike::new(2, 0, false).unwrap();
    let z3 = Zernike::new(3, 1, false).unwrap();

    let same = &z1 + &z2;
    assert_eq!(same.len(), 1);
    assert_eq!(same.coef(2, 0), 2.0);

    let different = z1.clone() + z3.clone();
    assert_eq!(different.len(), 2);

    let mixed = &different + &z2;
    assert_eq!(mixed.coef(2, 0), 2.0);
    assert_eq!(mixed.coef(3, 1), 1.0);

    let (rho, theta) = (0.4, 2.0);
    let direct = 2.0 * z1.evaluate(rho, theta) + z3.evaluate(rho, theta);
    assert!((mixed.evaluate(rho, theta) - direct).abs() < 1e-14);
}

#[test]
fn test_vectorized_matches_scalar() {
    let grid = zernike::grid::PolarGrid::new(9, 13);
    let z = Zernike::new(6, -4, true).unwrap();
    let polar = z.evaluate_many(&grid.rho, &grid.theta).unwrap();
    let cart = z.cart_many(&grid.x, &grid.y).unwrap();
    for i in 0..grid.len() {
        assert_eq!(polar[i], z.evaluate(grid.rho[i], grid.theta[i]));
        assert!((cart[i] - polar[i]).abs() < 1e-12, "sample {}", i);
    }
}

#[test]
fn test_summary_tables() {
    let radial = radial_table(6);
    assert_eq!(radial.len(), 16);
    assert!(radial.iter().all(|r| (r.self_dot * (2.0 * r.n as f64 + 2.0) - 1.0).abs() < 1e-14));

    let zern = zernike_table(4);
    assert_eq!(zern.len(), 15);
    let noll: Vec<u32> = zern.iter().map(|r| r.noll).collect();
    let mut sorted = noll.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, (1..=15).collect::<Vec<u32>>());
}
