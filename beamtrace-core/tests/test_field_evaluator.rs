//! Unit tests for the piecewise magnetic-field evaluator

use beamtrace_core::tests::test_helpers::{approx_eq, approx_eq_vec, magnet};
use beamtrace_core::{MagnetKind, MagnetSystem};
use glam::DVec3;

#[test]
fn test_zero_outside_every_z_range() {
    let system = MagnetSystem::new(vec![magnet(
        MagnetKind::DipoleY,
        "D1",
        (0.0, -3.529),
        -7000.0,
        -4000.0,
    )]);

    // points outside the only element's z-range must yield the exact zero
    // vector, not merely a small one
    assert_eq!(system.field(DVec3::new(0.0, 0.0, 0.0), 350.0), DVec3::ZERO);
    assert_eq!(
        system.field(DVec3::new(50.0, -20.0, 5000.0), 350.0),
        DVec3::ZERO
    );
}

#[test]
fn test_z_range_is_open_interval() {
    let system = MagnetSystem::new(vec![magnet(
        MagnetKind::DipoleY,
        "D1",
        (0.0, -3.529),
        -7000.0,
        -4000.0,
    )]);

    // containment is strict: the boundary itself is outside
    assert_eq!(system.field(DVec3::new(0.0, 0.0, -7000.0), 1.0), DVec3::ZERO);
    assert_eq!(system.field(DVec3::new(0.0, 0.0, -4000.0), 1.0), DVec3::ZERO);
    assert_ne!(system.field(DVec3::new(0.0, 0.0, -6999.9), 1.0), DVec3::ZERO);
}

#[test]
fn test_dipole_x_constant_field() {
    let system = MagnetSystem::new(vec![magnet(
        MagnetKind::DipoleX,
        "Muon",
        (0.67, 0.0),
        -1180.0,
        -750.0,
    )]);

    // a dipole along x has no z-sign flip and no transverse dependence
    let b = system.field(DVec3::new(12.0, -7.0, -900.0), 350.0);
    assert!(approx_eq_vec(b, DVec3::new(0.67 * 350.0, 0.0, 0.0), 1e-12));

    let b2 = system.field(DVec3::new(-40.0, 33.0, -1000.0), 350.0);
    assert_eq!(b, b2);
}

#[test]
fn test_dipole_y_flips_sign_with_z_side() {
    let system = MagnetSystem::new(vec![magnet(
        MagnetKind::DipoleY,
        "D1_pair",
        (0.0, -3.529),
        -100.0,
        100.0,
    )]);

    // mirrored pair straddling the origin: B_y = i_y * scale * sign(z)
    let b_neg = system.field(DVec3::new(0.0, 0.0, -50.0), 1.0);
    let b_pos = system.field(DVec3::new(0.0, 0.0, 50.0), 1.0);
    assert!(approx_eq_vec(b_neg, DVec3::new(0.0, 3.529, 0.0), 1e-12));
    assert!(approx_eq_vec(b_pos, DVec3::new(0.0, -3.529, 0.0), 1e-12));
}

#[test]
fn test_quadrupole_linear_in_transverse_coordinates() {
    let system = MagnetSystem::new(vec![magnet(
        MagnetKind::Quadrupole,
        "Q1",
        (200.34, -200.34),
        2300.0,
        2930.0,
    )]);

    // B_x = i_x * scale * y / 100 * sign(z), B_y = i_y * scale * x / 100 * sign(z)
    let b = system.field(DVec3::new(30.0, -20.0, 2500.0), 1.0);
    assert!(approx_eq(b.x, 200.34 * -20.0 / 100.0, 1e-12));
    assert!(approx_eq(b.y, -200.34 * 30.0 / 100.0, 1e-12));
    assert_eq!(b.z, 0.0);

    // doubling a transverse coordinate doubles the matching component
    let b2 = system.field(DVec3::new(60.0, -20.0, 2500.0), 1.0);
    assert!(approx_eq(b2.y, 2.0 * b.y, 1e-12));
    assert!(approx_eq(b2.x, b.x, 1e-12));
}

#[test]
fn test_quadrupole_flips_sign_with_z_side() {
    let system = MagnetSystem::new(vec![magnet(
        MagnetKind::Quadrupole,
        "Q_pair",
        (200.34, -200.34),
        -2930.0,
        2930.0,
    )]);

    let b_pos = system.field(DVec3::new(10.0, 5.0, 1000.0), 1.0);
    let b_neg = system.field(DVec3::new(10.0, 5.0, -1000.0), 1.0);
    assert!(approx_eq_vec(b_neg, -b_pos, 1e-12));
}

#[test]
fn test_scale_multiplies_field() {
    let system = MagnetSystem::new(vec![magnet(
        MagnetKind::DipoleY,
        "D1",
        (0.0, -3.529),
        100.0,
        200.0,
    )]);

    let b1 = system.field(DVec3::new(0.0, 0.0, 150.0), 1.0);
    let b350 = system.field(DVec3::new(0.0, 0.0, 150.0), 350.0);
    assert!(approx_eq_vec(b350, b1 * 350.0, 1e-9));
}

#[test]
fn test_overlapping_elements_last_match_wins() {
    // two elements share a z-range: the later element overwrites the
    // earlier contribution instead of summing with it
    let system = MagnetSystem::new(vec![
        magnet(MagnetKind::DipoleX, "first", (1.0, 0.0), 0.0, 100.0),
        magnet(MagnetKind::DipoleY, "second", (0.0, 2.0), 0.0, 100.0),
    ]);

    let b = system.field(DVec3::new(0.0, 0.0, 50.0), 1.0);
    assert!(approx_eq_vec(b, DVec3::new(0.0, 2.0, 0.0), 1e-12));

    // reversed order, reversed winner
    let system = MagnetSystem::new(vec![
        magnet(MagnetKind::DipoleY, "second", (0.0, 2.0), 0.0, 100.0),
        magnet(MagnetKind::DipoleX, "first", (1.0, 0.0), 0.0, 100.0),
    ]);
    let b = system.field(DVec3::new(0.0, 0.0, 50.0), 1.0);
    assert!(approx_eq_vec(b, DVec3::new(1.0, 0.0, 0.0), 1e-12));
}
