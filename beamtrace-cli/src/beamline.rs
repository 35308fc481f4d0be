//! Beamline configuration: JSON loading and the built-in reference table

use beamtrace_core::{Dimensions, Magnet, MagnetKind, MagnetSystem};
use serde::Deserialize;
use std::path::Path;

/// Top-level beamline file: an ordered magnet table
#[derive(Debug, Deserialize)]
pub struct BeamlineConfig {
    pub magnets: Vec<MagnetConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindConfig {
    DipoleX,
    DipoleY,
    Quadrupole,
}

/// One magnet row: kind, label, signed intensity pair and spatial extent.
/// The transverse extents default to the reference 100 cm half-widths;
/// only the z-range affects tracking.
#[derive(Debug, Deserialize)]
pub struct MagnetConfig {
    pub kind: KindConfig,
    pub label: String,
    pub intensity: [f64; 2],
    #[serde(default = "default_transverse")]
    pub x: [f64; 2],
    #[serde(default = "default_transverse")]
    pub y: [f64; 2],
    pub z: [f64; 2],
}

fn default_transverse() -> [f64; 2] {
    [-100.0, 100.0]
}

impl BeamlineConfig {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn build(&self) -> MagnetSystem {
        let magnets = self
            .magnets
            .iter()
            .map(|m| Magnet {
                kind: match m.kind {
                    KindConfig::DipoleX => MagnetKind::DipoleX,
                    KindConfig::DipoleY => MagnetKind::DipoleY,
                    KindConfig::Quadrupole => MagnetKind::Quadrupole,
                },
                label: m.label.clone(),
                intensity: (m.intensity[0], m.intensity[1]),
                dims: Dimensions::new(m.x[0], m.x[1], m.y[0], m.y[1], m.z[0], m.z[1]),
            })
            .collect();
        MagnetSystem::new(magnets)
    }
}

/// The 12-element forward spectrometer the feasibility studies were run
/// against: D1 dipole pairs at the far ends, four quadrupoles per side,
/// and the corrector plus muon dipole on the negative side only.
pub fn reference_beamline() -> MagnetSystem {
    let rows: [(&str, MagnetKind, (f64, f64), (f64, f64)); 12] = [
        ("D1_neg", MagnetKind::DipoleY, (0.0, -3.529), (-6785.0, -5840.0)),
        ("Q4_neg", MagnetKind::Quadrupole, (200.34, -200.34), (-5360.0, -4730.0)),
        ("Q3_neg", MagnetKind::Quadrupole, (-200.34, 200.34), (-4380.0, -3830.0)),
        ("Q2_neg", MagnetKind::Quadrupole, (-200.34, 200.34), (-3730.0, -3180.0)),
        ("Q1_neg", MagnetKind::Quadrupole, (200.34, -200.34), (-2930.0, -2300.0)),
        ("D_corr", MagnetKind::DipoleX, (-1.1716, 0.0), (-2110.0, -1920.0)),
        ("Muon", MagnetKind::DipoleX, (0.67, 0.0), (-1180.0, -750.0)),
        ("Q1_pos", MagnetKind::Quadrupole, (200.34, -200.34), (2300.0, 2930.0)),
        ("Q2_pos", MagnetKind::Quadrupole, (-200.34, 200.34), (3180.0, 3730.0)),
        ("Q3_pos", MagnetKind::Quadrupole, (-200.34, 200.34), (3830.0, 4380.0)),
        ("Q4_pos", MagnetKind::Quadrupole, (200.34, -200.34), (4730.0, 5360.0)),
        ("D1_pos", MagnetKind::DipoleY, (0.0, -3.529), (5840.0, 6785.0)),
    ];

    let magnets = rows
        .into_iter()
        .map(|(label, kind, intensity, z)| Magnet {
            kind,
            label: label.to_string(),
            intensity,
            dims: Dimensions::new(-100.0, 100.0, -100.0, 100.0, z.0, z.1),
        })
        .collect();
    MagnetSystem::new(magnets)
}
