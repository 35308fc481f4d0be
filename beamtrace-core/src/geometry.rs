//! Beamline geometry: magnet elements and the piecewise field evaluator

use crate::diagnostics::{Diagnostic, Diagnostics};
use glam::DVec3;

/// Axis-aligned bounding box of a beamline element, in cm
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    x: (f64, f64),
    y: (f64, f64),
    z: (f64, f64),
}

impl Dimensions {
    pub fn new(x1: f64, x2: f64, y1: f64, y2: f64, z1: f64, z2: f64) -> Self {
        Self {
            x: (x1, x2),
            y: (y1, y2),
            z: (z1, z2),
        }
    }

    pub fn x(&self) -> (f64, f64) {
        self.x
    }

    pub fn y(&self) -> (f64, f64) {
        self.y
    }

    pub fn z(&self) -> (f64, f64) {
        self.z
    }

    /// Whether `z` lies strictly inside the element's longitudinal extent.
    /// Only the z-range decides field containment; x/y extents exist for
    /// rendering.
    pub fn contains_z(&self, z: f64) -> bool {
        z > self.z.0 && z < self.z.1
    }
}

/// Kind of field-producing element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagnetKind {
    DipoleX,
    DipoleY,
    Quadrupole,
}

/// One field-producing region of the beamline
#[derive(Debug, Clone)]
pub struct Magnet {
    pub kind: MagnetKind,
    pub label: String,
    /// B-field intensity along x and y, with sign [T]
    pub intensity: (f64, f64),
    /// Beginning and end coordinates in x, y and z [cm]
    pub dims: Dimensions,
}

/// An ordered group of magnets, immutable after construction
///
/// The integrator only borrows it for read-only field queries, so a single
/// system can be shared by any number of tracking runs.
#[derive(Debug, Clone)]
pub struct MagnetSystem {
    magnets: Vec<Magnet>,
}

impl MagnetSystem {
    /// Build a system from an ordered magnet list. Intensity pairs that are
    /// inconsistent with the declared kind are reported through `log::warn!`;
    /// they never alter field evaluation.
    pub fn new(magnets: Vec<Magnet>) -> Self {
        let system = Self { magnets };
        for diagnostic in system.validate().iter() {
            log::warn!("{}", diagnostic);
        }
        system
    }

    pub fn magnets(&self) -> &[Magnet] {
        &self.magnets
    }

    /// Check every element's intensity pair against its declared kind
    pub fn validate(&self) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        for magnet in &self.magnets {
            match magnet.kind {
                MagnetKind::DipoleX => {
                    if magnet.intensity.1 != 0.0 {
                        diagnostics.push(Diagnostic::warning(format!(
                            "magnet '{}': are you sure this is a dipole along x? \
                             y-intensity {} is ignored",
                            magnet.label, magnet.intensity.1
                        )));
                    }
                }
                MagnetKind::DipoleY => {
                    if magnet.intensity.0 != 0.0 {
                        diagnostics.push(Diagnostic::warning(format!(
                            "magnet '{}': are you sure this is a dipole along y? \
                             x-intensity {} is ignored",
                            magnet.label, magnet.intensity.0
                        )));
                    }
                }
                MagnetKind::Quadrupole => {
                    if magnet.intensity.0 == 0.0 || magnet.intensity.1 == 0.0 {
                        diagnostics.push(Diagnostic::warning(format!(
                            "magnet '{}': are you sure this is a quadrupole? \
                             intensity pair is ({}, {})",
                            magnet.label, magnet.intensity.0, magnet.intensity.1
                        )));
                    }
                }
            }
        }
        diagnostics
    }

    /// Magnetic-field vector at `pos` [cm], scaled by `scale`.
    ///
    /// Elements are visited in order and a matching element overwrites the
    /// running result, so with overlapping z-ranges the last match wins.
    /// Overlap is not the expected configuration; the override is kept as
    /// reference behavior. Points outside every z-range return the exact
    /// zero vector.
    pub fn field(&self, pos: DVec3, scale: f64) -> DVec3 {
        let mut b_field = DVec3::ZERO;

        for magnet in &self.magnets {
            if !magnet.dims.contains_z(pos.z) {
                continue;
            }
            match magnet.kind {
                MagnetKind::DipoleX => {
                    b_field = DVec3::new(magnet.intensity.0 * scale, 0.0, 0.0);
                }
                MagnetKind::DipoleY => {
                    // mirrored pair straddling the origin: field flips sign
                    // with the side of z = 0
                    let intensity = magnet.intensity.1 * scale * sign_direction(pos.z);
                    b_field = DVec3::new(0.0, intensity, 0.0);
                }
                MagnetKind::Quadrupole => {
                    // dividing by 100 converts the cm coordinate to the meter
                    // convention of the intensity constants
                    let sign = sign_direction(pos.z);
                    let bx = magnet.intensity.0 * scale * pos.y / 100.0 * sign;
                    let by = magnet.intensity.1 * scale * pos.x / 100.0 * sign;
                    b_field = DVec3::new(bx, by, 0.0);
                }
            }
        }

        b_field
    }
}

fn sign_direction(z: f64) -> f64 {
    if z < 0.0 {
        -1.0
    } else {
        1.0
    }
}
