//! Momentum magnitude is conserved by construction in both schemes

use beamtrace_core::tests::test_helpers::{approx_eq, forward_proton, single_dipole_system};
use beamtrace_core::{SimParticle, TrackMode};

fn assert_momentum_magnitude_conserved(mode: TrackMode) {
    let particle = forward_proton();
    let magnets = single_dipole_system();
    let p0 = particle.mom.length();

    let mut sim = SimParticle::with_steps(particle, 3200, 1.0);
    let track = sim.track(&magnets, mode, 1.0).unwrap();

    // the trajectory spends ~3000 steps inside the dipole, so the field
    // actually acted on most of the recorded steps
    assert!(track.steps_used() > 3000);

    for (i, mom) in track.momenta().iter().enumerate() {
        assert!(
            approx_eq(mom.length(), p0, 1e-6),
            "|p| drifted to {} at step {}",
            mom.length(),
            i
        );
    }
}

#[test]
fn test_momentum_magnitude_euler() {
    assert_momentum_magnitude_conserved(TrackMode::Euler);
}

#[test]
fn test_momentum_magnitude_rk4() {
    assert_momentum_magnitude_conserved(TrackMode::RungeKutta4);
}

#[test]
fn test_momentum_direction_rotates_in_field() {
    // conservation of |p| must not mean the momentum froze: the dipole
    // bends the trajectory, so the direction has to change
    let particle = forward_proton();
    let magnets = single_dipole_system();

    let mut sim = SimParticle::with_steps(particle, 1000, 1.0);
    let track = sim.track(&magnets, TrackMode::Euler, 1.0).unwrap();

    let first = track.momenta()[0];
    let last = track.momenta()[track.steps_used() - 1];
    assert!(first.angle_between(last) > 0.0);
}
