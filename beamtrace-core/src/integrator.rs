//! Relativistic trajectory integrator
//!
//! Advances a [`Particle`] through a [`MagnetSystem`] with a fixed spatial
//! step, in one of two interchangeable schemes: a semi-implicit Euler-type
//! step and a classical 4th-order Runge-Kutta step. Both conserve the
//! momentum magnitude by construction (the post-step momentum is rescaled
//! to its pre-step magnitude), so β and γ stay constant over a track.

use crate::geometry::MagnetSystem;
use crate::particle::Particle;
use crate::track::Track;
use glam::DVec3;
use std::str::FromStr;
use thiserror::Error;

/// Speed of light [cm/s]
pub const SPEED_OF_LIGHT: f64 = 29_979_245_800.0;
/// Elementary charge [C = A·s]
pub const ELEMENTARY_CHARGE: f64 = 1.602_176_565e-19;
/// Conversion from (cm·kg)/s to GeV/c
pub const MOMENTUM_CONVERSION: f64 = 1.870_802_6e16;
/// Tracking stops once |z| exceeds this bound [cm]
pub const Z_CUTOFF: f64 = 9000.0;

const DEFAULT_NSTEPS: usize = 3000;
const DEFAULT_STEP_SIZE: f64 = 0.1;

/// Selector between the two integration schemes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackMode {
    Euler,
    RungeKutta4,
}

impl TrackMode {
    pub const NMODES: usize = 2;

    fn index(self) -> usize {
        match self {
            TrackMode::Euler => 0,
            TrackMode::RungeKutta4 => 1,
        }
    }
}

impl FromStr for TrackMode {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "euler" => Ok(TrackMode::Euler),
            "rk4" | "rungekutta4" => Ok(TrackMode::RungeKutta4),
            other => Err(TrackError::UnsupportedMode(other.to_string())),
        }
    }
}

/// Failures of a tracking call
#[derive(Debug, Error)]
pub enum TrackError {
    #[error("the tracking mode '{0}' is not supported")]
    UnsupportedMode(String),
    #[error("cannot normalize a momentum vector of zero magnitude")]
    DegenerateMomentum,
}

/// Tracks one particle through a magnet system and memoizes the result
///
/// The first `track` call per mode runs the integration; later calls with
/// the same mode return the cached track unchanged.
#[derive(Debug, Clone)]
pub struct SimParticle {
    particle: Particle,
    n_steps: usize,
    step_size: f64,
    tracks: [Option<Track>; TrackMode::NMODES],
}

impl SimParticle {
    pub fn new(particle: Particle) -> Self {
        Self::with_steps(particle, DEFAULT_NSTEPS, DEFAULT_STEP_SIZE)
    }

    /// `n_steps` is the step budget, `step_size` the spatial arc length
    /// covered per step [cm]
    pub fn with_steps(particle: Particle, n_steps: usize, step_size: f64) -> Self {
        Self {
            particle,
            n_steps,
            step_size,
            tracks: [None, None],
        }
    }

    pub fn particle(&self) -> &Particle {
        &self.particle
    }

    /// Run (or return the memoized) trajectory for `mode`, querying
    /// `magnets` with the given field scale factor.
    pub fn track(
        &mut self,
        magnets: &MagnetSystem,
        mode: TrackMode,
        scale: f64,
    ) -> Result<&Track, TrackError> {
        let slot = mode.index();
        if self.tracks[slot].is_none() {
            let track = match mode {
                TrackMode::Euler => self.track_euler(magnets, scale)?,
                TrackMode::RungeKutta4 => self.track_rungekutta4(magnets, scale)?,
            };
            self.tracks[slot] = Some(track);
        }
        Ok(self.tracks[slot].as_ref().unwrap())
    }

    /// v = p·c / (γ·m): momentum [GeV/c] to velocity [cm/s]
    fn relativistic_velocity(mom: DVec3, gamma: f64, mass: f64) -> DVec3 {
        mom * (SPEED_OF_LIGHT / (gamma * mass))
    }

    /// F = q·(v × B), in (A·s)·(cm/s)·(kg/(A·s²)) = (cm·kg)/s²
    fn lorentz_force(charge: f64, vel: DVec3, b_field: DVec3) -> DVec3 {
        charge * vel.cross(b_field)
    }

    fn mass_shell_energy(mom: DVec3, mass: f64) -> f64 {
        (mom.length_squared() + mass * mass).sqrt()
    }

    fn track_euler(&self, magnets: &MagnetSystem, scale: f64) -> Result<Track, TrackError> {
        let mass = self.particle.mass;
        let charge = f64::from(self.particle.charge) * ELEMENTARY_CHARGE;

        let mut pos = self.particle.pos;
        let mut mom = self.particle.mom;
        if mom.length_squared() == 0.0 {
            return Err(TrackError::DegenerateMomentum);
        }
        let mut vel = Self::relativistic_velocity(mom, self.particle.gamma(), mass);

        // |p| is conserved step to step, so β is a per-track constant and
        // the time a step of arc length Δs represents can be fixed up front
        let delta_t = self.step_size / (SPEED_OF_LIGHT * self.particle.beta());

        let mut energies = Vec::with_capacity(self.n_steps);
        let mut positions = Vec::with_capacity(self.n_steps);
        let mut momenta = Vec::with_capacity(self.n_steps);

        let mut steps_used = 0;
        while steps_used < self.n_steps {
            positions.push(pos);
            momenta.push(mom);

            // field-free trial advance and the midpoint it spans
            let pos_incr = mom * (self.step_size / mom.length());
            let pos_next = pos + pos_incr;
            let pos_mid = (pos + pos_next) * 0.5;

            let b_field = magnets.field(pos_mid, scale);

            if b_field.length_squared() == 0.0 {
                pos = pos_next;
            } else {
                let force = Self::lorentz_force(charge, vel, b_field);

                // F = dp/dt, converted to GeV/c
                let mom_delta = force * (delta_t * MOMENTUM_CONVERSION);
                let mut mom_next = mom + mom_delta;

                // the field does no work: rescale to the pre-step magnitude
                let mag0 = mom.length();
                let mag1 = mom_next.length();
                mom_next *= mag0 / mag1;

                pos += mom_next * (self.step_size / mag0);
                mom = mom_next;

                let gamma = Self::mass_shell_energy(mom, mass) / mass;
                vel = Self::relativistic_velocity(mom, gamma, mass);
            }

            energies.push(Self::mass_shell_energy(mom, mass));
            steps_used += 1;

            if pos.z.abs() > Z_CUTOFF {
                break;
            }
        }

        Ok(Track::new(steps_used, energies, positions, momenta))
    }

    fn track_rungekutta4(&self, magnets: &MagnetSystem, scale: f64) -> Result<Track, TrackError> {
        let mass = self.particle.mass;
        let charge = f64::from(self.particle.charge) * ELEMENTARY_CHARGE;
        let ds = self.step_size;

        let mut pos = self.particle.pos;
        let mut mom = self.particle.mom;
        if mom.length_squared() == 0.0 {
            return Err(TrackError::DegenerateMomentum);
        }
        let mut vel = Self::relativistic_velocity(mom, self.particle.gamma(), mass);

        let mut energies = Vec::with_capacity(self.n_steps);
        let mut positions = Vec::with_capacity(self.n_steps);
        let mut momenta = Vec::with_capacity(self.n_steps);

        let velocity_at = |mom: DVec3| -> DVec3 {
            let gamma = Self::mass_shell_energy(mom, mass) / mass;
            Self::relativistic_velocity(mom, gamma, mass)
        };

        let mut steps_used = 0;
        while steps_used < self.n_steps {
            positions.push(pos);
            momenta.push(mom);

            let pos_incr = mom * (ds / mom.length());
            let pos_next = pos + pos_incr;
            let pos_mid = (pos + pos_next) * 0.5;

            // the field is sampled once per step, at the Euler-predicted
            // midpoint, and reused for all four sub-estimates
            let b_field = magnets.field(pos_mid, scale);

            if b_field.length_squared() == 0.0 {
                pos = pos_next;
            } else {
                // momentum update: forces at four trial momenta
                let k1 = Self::lorentz_force(charge, vel, b_field);
                let k2 = Self::lorentz_force(charge, velocity_at(mom + k1 * (ds * 0.5)), b_field);
                let k3 = Self::lorentz_force(charge, velocity_at(mom + k2 * (ds * 0.5)), b_field);
                let k4 = Self::lorentz_force(charge, velocity_at(mom + k3 * ds), b_field);

                let mut mom_next = mom + (k1 + 2.0 * k2 + 2.0 * k3 + k4) * (ds / 6.0);

                let mag0 = mom.length();
                let mag1 = mom_next.length();
                mom_next *= mag0 / mag1;
                mom = mom_next;

                // position update: velocities at four trial momenta around
                // the updated state, advanced one arc length along their
                // weighted average direction
                let v1 = velocity_at(mom);
                let v2 = velocity_at(mom + v1 * (ds * 0.5));
                let v3 = velocity_at(mom + v2 * (ds * 0.5));
                let v4 = velocity_at(mom + v3 * ds);

                let v_avg = (v1 + 2.0 * v2 + 2.0 * v3 + v4) / 6.0;
                pos += v_avg * (ds / v_avg.length());

                vel = velocity_at(mom);
            }

            energies.push(Self::mass_shell_energy(mom, mass));
            steps_used += 1;

            if pos.z.abs() > Z_CUTOFF {
                break;
            }
        }

        Ok(Track::new(steps_used, energies, positions, momenta))
    }
}
