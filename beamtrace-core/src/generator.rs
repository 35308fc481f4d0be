//! Random samplers for initial beam kinematics
//!
//! Everything here implements [`rand_distr::Distribution<f64>`], so the
//! samplers compose with any seeded RNG; determinism is the caller's
//! responsibility. Uniform and normal sampling come straight from
//! `rand_distr` and are not wrapped.

use rand::distributions::WeightedIndex;
use rand::Rng;
use rand_distr::Distribution;

/// Transverse-momentum spectrum f(pT) = pT·B / (1 + (mT − m0)/(n·T))^n,
/// with mT = sqrt(pT² + m0²), sampled by rejection over [0, 100] GeV.
///
/// Fit function for d²N/(2π·dpT·dy); the 1/pT term is removed so the
/// original pT distribution is recovered.
#[derive(Debug, Clone)]
pub struct Boltzmann {
    b: f64,
    temp: f64,
    n: f64,
    m0: f64,
    envelope: f64,
}

/// Upper edge of the Boltzmann sampling support [GeV]
const BOLTZMANN_PT_MAX: f64 = 100.0;
/// Grid points used to scan for the rejection envelope
const BOLTZMANN_SCAN_POINTS: usize = 5000;

impl Boltzmann {
    pub fn new(b: f64, temp: f64, n: f64, m0: f64) -> Self {
        let mut dist = Self {
            b,
            temp,
            n,
            m0,
            envelope: 0.0,
        };
        let mut max = 0.0_f64;
        for i in 0..=BOLTZMANN_SCAN_POINTS {
            let pt = BOLTZMANN_PT_MAX * i as f64 / BOLTZMANN_SCAN_POINTS as f64;
            max = max.max(dist.density(pt));
        }
        // small headroom so grid maxima slightly below the true peak
        // still dominate the density
        dist.envelope = max * 1.05;
        dist
    }

    pub fn density(&self, pt: f64) -> f64 {
        let mt = (pt * pt + self.m0 * self.m0).sqrt();
        pt * self.b / (1.0 + (mt - self.m0) / (self.n * self.temp)).powf(self.n)
    }
}

impl Distribution<f64> for Boltzmann {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        loop {
            let pt = rng.gen_range(0.0..BOLTZMANN_PT_MAX);
            let y = rng.gen_range(0.0..self.envelope);
            if y <= self.density(pt) {
                return pt;
            }
        }
    }
}

/// Nucleon Fermi-momentum spectrum, from a tabulated 71-point probability
/// graph interpolated onto a binned histogram over [0, 0.65] GeV; a draw
/// picks a bin by weight and a uniform value within it.
#[derive(Debug, Clone)]
pub struct FermiMomentum {
    bins: WeightedIndex<f64>,
    bin_width: f64,
}

const FERMI_PT_MAX: f64 = 0.65;

const FERMI_PT: [f64; 71] = [
    0.0206, 0.0272, 0.0322, 0.0361, 0.0419, 0.0485, 0.0551, 0.0614, 0.0664, 0.0707, 0.0773,
    0.0831, 0.0901, 0.0959, 0.104, 0.114, 0.122, 0.131, 0.135, 0.141, 0.149, 0.16, 0.168, 0.178,
    0.185, 0.194, 0.203, 0.209, 0.213, 0.218, 0.225, 0.231, 0.245, 0.252, 0.259, 0.267, 0.275,
    0.282, 0.289, 0.295, 0.304, 0.309, 0.316, 0.323, 0.33, 0.338, 0.346, 0.353, 0.363, 0.371,
    0.377, 0.384, 0.394, 0.403, 0.411, 0.425, 0.438, 0.448, 0.461, 0.476, 0.49, 0.505, 0.519,
    0.533, 0.551, 0.565, 0.579, 0.592, 0.609, 0.624, 0.638,
];

const FERMI_PROB: [f64; 71] = [
    0.195, 0.356, 0.461, 0.572, 0.761, 0.963, 1.18, 1.4, 1.58, 1.73, 1.94, 2.14, 2.33, 2.51,
    2.67, 2.83, 2.92, 2.99, 3.0, 3.01, 2.98, 2.93, 2.88, 2.83, 2.79, 2.72, 2.67, 2.62, 2.6, 2.58,
    2.53, 2.5, 2.42, 2.37, 2.32, 2.28, 2.2, 2.14, 2.07, 2.01, 1.95, 1.88, 1.82, 1.75, 1.68, 1.59,
    1.54, 1.46, 1.4, 1.33, 1.28, 1.24, 1.19, 1.14, 1.1, 1.05, 1.02, 0.991, 0.97, 0.928, 0.921,
    0.901, 0.88, 0.852, 0.796, 0.768, 0.733, 0.698, 0.663, 0.628, 0.579,
];

impl FermiMomentum {
    pub fn new() -> Self {
        let n_bins = (FERMI_PT.len() as f64 * 2.5) as usize;
        let bin_width = FERMI_PT_MAX / n_bins as f64;

        let weights: Vec<f64> = (0..n_bins)
            .map(|i| {
                let center = (i as f64 + 0.5) * bin_width;
                interpolate_table(&FERMI_PT, &FERMI_PROB, center).max(0.0)
            })
            .collect();

        Self {
            bins: WeightedIndex::new(&weights).expect("tabulated weights are non-negative"),
            bin_width,
        }
    }
}

impl Default for FermiMomentum {
    fn default() -> Self {
        Self::new()
    }
}

impl Distribution<f64> for FermiMomentum {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let bin = self.bins.sample(rng);
        (bin as f64 + rng.gen_range(0.0..1.0)) * self.bin_width
    }
}

/// Piecewise-linear interpolation on a sorted (x, y) table, extrapolating
/// from the outermost segment beyond its ends
fn interpolate_table(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    let n = xs.len();
    let i = match xs.partition_point(|&v| v < x) {
        0 => 0,
        i if i >= n => n - 2,
        i => i - 1,
    };
    let (x0, x1) = (xs[i], xs[i + 1]);
    let (y0, y1) = (ys[i], ys[i + 1]);
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}
