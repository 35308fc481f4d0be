//! Completed-trajectory record

use glam::DVec3;

/// Immutable per-step record of a tracking run
///
/// Three parallel sequences: positions and momenta are recorded at the top
/// of each step, energies after the step's momentum update. Filled
/// monotonically by the integrator, then frozen; consumers only ever see a
/// completed track by shared reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Track {
    steps_used: usize,
    energies: Vec<f64>,
    positions: Vec<DVec3>,
    momenta: Vec<DVec3>,
}

impl Track {
    pub fn new(
        steps_used: usize,
        energies: Vec<f64>,
        positions: Vec<DVec3>,
        momenta: Vec<DVec3>,
    ) -> Self {
        Self {
            steps_used,
            energies,
            positions,
            momenta,
        }
    }

    pub fn steps_used(&self) -> usize {
        self.steps_used
    }

    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    pub fn positions(&self) -> &[DVec3] {
        &self.positions
    }

    pub fn momenta(&self) -> &[DVec3] {
        &self.momenta
    }
}
