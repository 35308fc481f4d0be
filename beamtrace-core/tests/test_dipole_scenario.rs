//! Reference scenario: a forward proton bent by the D1 dipole
//!
//! One DipoleY with intensity (0, -3.529) spans z in [-7000, -4000]. Its
//! field points along y, so the Lorentz force q·v×B on a particle moving
//! along +z points along x: the trajectory bends in the x-z plane while
//! inside the magnet and continues straight after the exit.

use beamtrace_core::tests::test_helpers::{forward_proton, single_dipole_system};
use beamtrace_core::{SimParticle, TrackMode};

#[test]
fn test_deflection_accumulates_inside_dipole() {
    let magnets = single_dipole_system();
    let mut sim = SimParticle::with_steps(forward_proton(), 4000, 1.0);
    let track = sim.track(&magnets, TrackMode::Euler, 1.0).unwrap();

    let positions = track.positions();
    let momenta = track.momenta();

    // the transverse kick grows monotonically while z is inside the magnet
    let mut prev_px_abs = 0.0;
    let mut inside_steps = 0;
    for (pos, mom) in positions.iter().zip(momenta) {
        if pos.z > -7000.0 && pos.z < -4100.0 {
            assert!(
                mom.x.abs() >= prev_px_abs,
                "transverse momentum shrank inside the dipole at z = {}",
                pos.z
            );
            prev_px_abs = mom.x.abs();
            inside_steps += 1;
        }
    }
    assert!(inside_steps > 2000);

    // by the exit the displacement is well away from the axis
    let exit_index = positions
        .iter()
        .position(|p| p.z > -4000.0)
        .expect("track must leave the magnet");
    assert!(positions[exit_index].x.abs() > 1.0);
    assert!(momenta[exit_index].x.abs() > 1.0);

    // the field has no force component along y for this initial state
    for pos in positions {
        assert!(pos.y.abs() < 1e-9);
    }
}

#[test]
fn test_straight_continuation_after_exit() {
    let magnets = single_dipole_system();
    let mut sim = SimParticle::with_steps(forward_proton(), 4000, 1.0);
    let track = sim.track(&magnets, TrackMode::Euler, 1.0).unwrap();

    let positions = track.positions();
    let momenta = track.momenta();
    let n = track.steps_used();

    // find the first recorded step fully beyond the magnet (midpoint
    // sampling means the step starting at the boundary may still see field)
    let exit_index = positions
        .iter()
        .position(|p| p.z > -3999.0)
        .expect("track must leave the magnet");
    assert!(exit_index + 10 < n);

    // zero field: momentum is frozen bit-for-bit from one step to the next
    for i in exit_index + 1..n {
        assert_eq!(momenta[i], momenta[exit_index + 1]);
    }

    // and the positions advance by a constant increment
    let increment = positions[exit_index + 2] - positions[exit_index + 1];
    for i in exit_index + 2..n {
        let step = positions[i] - positions[i - 1];
        assert!((step - increment).length() < 1e-9);
    }
}

#[test]
fn test_deflection_scales_with_field_scale() {
    let magnets = single_dipole_system();

    let mut weak = SimParticle::with_steps(forward_proton(), 3200, 1.0);
    let mut strong = SimParticle::with_steps(forward_proton(), 3200, 1.0);

    let weak_exit = weak.track(&magnets, TrackMode::Euler, 1.0).unwrap().momenta()
        [3100]
        .x
        .abs();
    let strong_exit = strong.track(&magnets, TrackMode::Euler, 2.0).unwrap().momenta()
        [3100]
        .x
        .abs();

    // twice the field bends roughly twice as hard over the same path
    assert!(strong_exit > 1.5 * weak_exit);
}
