pub mod diagnostics;
pub mod generator;
pub mod geometry;
pub mod integrator;
pub mod particle;
pub mod track;

pub use diagnostics::{Diagnostic, DiagnosticSeverity, Diagnostics};
pub use geometry::{Dimensions, Magnet, MagnetKind, MagnetSystem};
pub use integrator::{SimParticle, TrackError, TrackMode};
pub use particle::Particle;
pub use track::Track;

// Test helpers module (public for integration tests)
// Always compiled - integration tests are separate crates and need access
pub mod tests;
