mod beamline;

use beamline::{reference_beamline, BeamlineConfig};
use beamtrace_core::generator::{Boltzmann, FermiMomentum};
use beamtrace_core::{MagnetSystem, Particle, SimParticle, Track, TrackMode};
use clap::{Parser, Subcommand};
use glam::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "beamtrace")]
#[command(about = "Charged-particle tracking through a piecewise beamline field", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample a particle batch, track it, and export the results
    Track {
        /// Beamline JSON file; the built-in reference beamline if omitted
        #[arg(long)]
        beamline: Option<PathBuf>,
        /// Number of particles to sample and track
        #[arg(long, default_value_t = 1)]
        particles: usize,
        /// Integration scheme: euler or rk4
        #[arg(long, default_value = "euler")]
        mode: String,
        /// Step budget per track
        #[arg(long, default_value_t = 30000)]
        steps: usize,
        /// Spatial step size [cm]
        #[arg(long, default_value_t = 1.0)]
        step_size: f64,
        /// Field scale factor applied to every element
        #[arg(long, default_value_t = 350.0)]
        scale: f64,
        /// Beam origin along z [cm]
        #[arg(long, default_value_t = -6990.0)]
        z0: f64,
        /// Longitudinal momentum [GeV/c]
        #[arg(long, default_value_t = 5000.0)]
        pz: f64,
        /// Rest mass [GeV/c²]
        #[arg(long, default_value_t = 0.938)]
        mass: f64,
        /// Charge in elementary-charge units
        #[arg(long, default_value_t = 1)]
        charge: i32,
        /// Gaussian beam-spot sigma in x and y [cm]
        #[arg(long, default_value_t = 0.0)]
        sigma: f64,
        /// Transverse-momentum spectrum: none, fermi or boltzmann
        #[arg(long, default_value = "none")]
        pt_dist: String,
        /// RNG seed for the batch
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// CSV with one summary row per particle
        #[arg(long)]
        output: Option<PathBuf>,
        /// CSV with the full per-step dump of the first track
        #[arg(long)]
        dump_track: Option<PathBuf>,
    },
    /// Print the field vector along z at fixed transverse coordinates
    Field {
        /// Beamline JSON file; the built-in reference beamline if omitted
        #[arg(long)]
        beamline: Option<PathBuf>,
        #[arg(long, default_value_t = 0.0)]
        x: f64,
        #[arg(long, default_value_t = 0.0)]
        y: f64,
        #[arg(long, default_value_t = -7000.0)]
        from: f64,
        #[arg(long, default_value_t = 7000.0)]
        to: f64,
        /// Sampling spacing along z [cm]
        #[arg(long, default_value_t = 100.0)]
        dz: f64,
        #[arg(long, default_value_t = 350.0)]
        scale: f64,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Track {
            beamline,
            particles,
            mode,
            steps,
            step_size,
            scale,
            z0,
            pz,
            mass,
            charge,
            sigma,
            pt_dist,
            seed,
            output,
            dump_track,
        } => run_track(
            beamline, particles, &mode, steps, step_size, scale, z0, pz, mass, charge, sigma,
            &pt_dist, seed, output, dump_track,
        ),
        Commands::Field {
            beamline,
            x,
            y,
            from,
            to,
            dz,
            scale,
        } => run_field(beamline, x, y, from, to, dz, scale),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_beamline(path: Option<PathBuf>) -> Result<MagnetSystem, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(BeamlineConfig::load(&path)?.build()),
        None => Ok(reference_beamline()),
    }
}

/// Transverse-momentum spectrum chosen on the command line
enum PtSpectrum {
    None,
    Fermi(FermiMomentum),
    Boltzmann(Boltzmann),
}

impl PtSpectrum {
    fn parse(name: &str, mass: f64) -> Result<Self, Box<dyn std::error::Error>> {
        match name {
            "none" => Ok(PtSpectrum::None),
            "fermi" => Ok(PtSpectrum::Fermi(FermiMomentum::new())),
            // spectrum shape parameters from the d²N/(2π dpT dy) fit
            "boltzmann" => Ok(PtSpectrum::Boltzmann(Boltzmann::new(1.0, 0.2, 10.0, mass))),
            other => Err(format!("unknown pt spectrum '{}'", other).into()),
        }
    }

    fn sample(&self, rng: &mut StdRng) -> f64 {
        match self {
            PtSpectrum::None => 0.0,
            PtSpectrum::Fermi(dist) => dist.sample(rng),
            PtSpectrum::Boltzmann(dist) => dist.sample(rng),
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn run_track(
    beamline: Option<PathBuf>,
    particles: usize,
    mode: &str,
    steps: usize,
    step_size: f64,
    scale: f64,
    z0: f64,
    pz: f64,
    mass: f64,
    charge: i32,
    sigma: f64,
    pt_dist: &str,
    seed: u64,
    output: Option<PathBuf>,
    dump_track: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let magnets = load_beamline(beamline)?;
    let mode: TrackMode = mode.parse()?;
    let spectrum = PtSpectrum::parse(pt_dist, mass)?;

    let mut rng = StdRng::seed_from_u64(seed);
    let spot = Normal::new(0.0, sigma.max(0.0))?;

    let mut summary = output
        .map(|path| File::create(path).map(BufWriter::new))
        .transpose()?;
    if let Some(w) = summary.as_mut() {
        writeln!(w, "id,steps_used,x,y,z,px,py,pz,energy,angle")?;
    }

    let mut first_track: Option<Track> = None;

    for id in 0..particles {
        let (x, y) = if sigma > 0.0 {
            (spot.sample(&mut rng), spot.sample(&mut rng))
        } else {
            (0.0, 0.0)
        };
        let pt = spectrum.sample(&mut rng);
        let phi = rng.gen_range(0.0..std::f64::consts::TAU);
        let mom = DVec3::new(pt * phi.cos(), pt * phi.sin(), pz);

        let particle = Particle::new(DVec3::new(x, y, z0), mom, mass, charge);
        let mut sim = SimParticle::with_steps(particle, steps, step_size);
        let track = sim.track(&magnets, mode, scale)?;

        // a zero step budget leaves the track empty; report the start state
        let end = track.positions().last().copied().unwrap_or(particle.pos);
        let end_mom = track.momenta().last().copied().unwrap_or(particle.mom);
        let energy = track.energies().last().copied().unwrap_or(particle.energy());
        if let Some(w) = summary.as_mut() {
            writeln!(
                w,
                "{},{},{},{},{},{},{},{},{},{}",
                id,
                track.steps_used(),
                end.x,
                end.y,
                end.z,
                end_mom.x,
                end_mom.y,
                end_mom.z,
                energy,
                acute_angle_to_beamline(end)
            )?;
        }
        if id == 0 {
            println!(
                "track 0: {} steps, end = ({:.2}, {:.2}, {:.2}) cm, E = {:.3} GeV",
                track.steps_used(),
                end.x,
                end.y,
                end.z,
                energy
            );
            if dump_track.is_some() {
                first_track = Some(track.clone());
            }
        }
    }

    if let (Some(path), Some(track)) = (dump_track, first_track) {
        let mut w = BufWriter::new(File::create(path)?);
        writeln!(w, "step,x,y,z,px,py,pz,energy")?;
        for (i, ((pos, mom), energy)) in track
            .positions()
            .iter()
            .zip(track.momenta())
            .zip(track.energies())
            .enumerate()
        {
            writeln!(
                w,
                "{},{},{},{},{},{},{},{}",
                i, pos.x, pos.y, pos.z, mom.x, mom.y, mom.z, energy
            )?;
        }
    }

    println!("tracked {} particle(s)", particles);
    Ok(())
}

fn run_field(
    beamline: Option<PathBuf>,
    x: f64,
    y: f64,
    from: f64,
    to: f64,
    dz: f64,
    scale: f64,
) -> Result<(), Box<dyn std::error::Error>> {
    let magnets = load_beamline(beamline)?;

    for m in magnets.magnets() {
        let (z1, z2) = m.dims.z();
        eprintln!(
            "# {:?} '{}' intensity ({}, {}) z [{}, {}]",
            m.kind, m.label, m.intensity.0, m.intensity.1, z1, z2
        );
    }

    println!("z,bx,by,bz");
    let mut z = from;
    while z <= to {
        let b = magnets.field(DVec3::new(x, y, z), scale);
        println!("{},{},{},{}", z, b.x, b.y, b.z);
        z += dz;
    }
    Ok(())
}

/// Acute angle between the line from the origin through `pos` and the beam
/// axis. Correct only for lines through the origin with the beam along z.
fn acute_angle_to_beamline(pos: DVec3) -> f64 {
    let opposite = (pos.x * pos.x + pos.y * pos.y).sqrt();
    (opposite / pos.z).atan()
}
