// Pattern set record: everything needed to run a pattern set on the DMD and to reconstruct from it

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::MINIMUM_RELATIVE_PEAK_SIZE;
use crate::error::PatternError;
use crate::geometries::LatticeVector;
use crate::interfaces::{FrequencyUnits, OriginMode};
use crate::lattice::{reciprocal_vectors, Pattern};

use super::leakage::find_nearest_leakage_peaks;
use super::pattern_search::{find_closest_multicolor_set, MulticolorSearchOptions};
use super::sim_pattern::{sim_angle, sim_frequency, sim_pattern, sim_period, sim_phase};

/// Derived parameters of a pattern set, serialised as a flat JSON object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternSetRecord {
    pub vec_as: Vec<LatticeVector>,
    pub vec_bs: Vec<LatticeVector>,
    pub frqs: Vec<[f64; 2]>,
    /// Radians
    pub angles: Vec<f64>,
    /// Mirrors
    pub periods: Vec<f64>,
    /// `phases[angle][phase]`, radians, referenced to the FFT origin
    pub phases: Vec<Vec<f64>>,
    pub nx: usize,
    pub ny: usize,
    pub recp_vects_a: Vec<[f64; 2]>,
    pub recp_vects_b: Vec<[f64; 2]>,
    /// Distance to the nearest leakage peak, `None` when no pattern leaks onto another
    pub min_leakage_angle: Option<f64>,
    pub dmd_pitch: f64,
    pub wavelength: f64,
}

impl PatternSetRecord {
    pub fn nangles(&self) -> usize {
        self.vec_as.len()
    }

    /// Conventional file name, `sim_patterns_period=<mean period>_nangles=<n>.json`
    pub fn file_name(&self) -> String {
        let mean_period = if self.periods.is_empty() {
            0.0
        } else {
            self.periods.iter().sum::<f64>() / self.periods.len() as f64
        };
        format!("sim_patterns_period={:.2}_nangles={}.json", mean_period, self.nangles())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Patterns of a set together with its record
#[derive(Debug, Clone, PartialEq)]
pub struct PatternSetData {
    /// `patterns[angle][phase]`, empty when patterns were not requested
    pub patterns: Vec<Vec<Pattern>>,
    pub record: PatternSetRecord,
}

/// Generate the patterns and derived parameters of a pattern set.
///
/// `invert` swaps on and off mirrors in the generated patterns. A missing `wavelength` is taken as 1,
/// in which case leakage distances are in units of `1 / pitch`.
#[allow(clippy::too_many_arguments)]
pub fn pattern_set_data(
    nx: usize,
    ny: usize,
    vec_as: &[LatticeVector],
    vec_bs: &[LatticeVector],
    nphases: usize,
    wavelength: Option<f64>,
    invert: bool,
    pitch: f64,
    generate_patterns: bool,
) -> Result<PatternSetData, PatternError> {
    if vec_as.len() != vec_bs.len() {
        return Err(PatternError::LengthMismatch {
            what: "vec_b entries",
            expected: vec_as.len(),
            found: vec_bs.len(),
        });
    }
    let wavelength = wavelength.unwrap_or(1.0);

    let leakage = find_nearest_leakage_peaks(
        vec_as,
        vec_bs,
        nphases,
        MINIMUM_RELATIVE_PEAK_SIZE,
        wavelength,
        pitch,
    )?;

    let nangles = vec_as.len();
    let mut record = PatternSetRecord {
        vec_as: vec_as.to_vec(),
        vec_bs: vec_bs.to_vec(),
        frqs: Vec::with_capacity(nangles),
        angles: Vec::with_capacity(nangles),
        periods: Vec::with_capacity(nangles),
        phases: Vec::with_capacity(nangles),
        nx,
        ny,
        recp_vects_a: Vec::with_capacity(nangles),
        recp_vects_b: Vec::with_capacity(nangles),
        min_leakage_angle: Some(leakage.min_distance).filter(|d| d.is_finite()),
        dmd_pitch: pitch,
        wavelength,
    };
    let mut patterns = Vec::new();

    for (&va, &vb) in vec_as.iter().zip(vec_bs) {
        let reciprocal = reciprocal_vectors(va, vb, FrequencyUnits::Frequency)?;
        let frequency = sim_frequency(va, vb)?;

        record.recp_vects_a.push([reciprocal.ra.x, reciprocal.ra.y]);
        record.recp_vects_b.push([reciprocal.rb.x, reciprocal.rb.y]);
        record.frqs.push([frequency.x, frequency.y]);
        record.angles.push(sim_angle(va, vb)?);
        record.periods.push(sim_period(va, vb)?);
        record.phases.push(
            (0..nphases)
                .map(|jj| sim_phase(va, vb, nphases, jj, (nx, ny), OriginMode::Fft))
                .collect::<Result<_, _>>()?,
        );

        if generate_patterns {
            let mut phase_patterns = Vec::with_capacity(nphases);
            for jj in 0..nphases {
                let (pattern, _) = sim_pattern(nx, ny, va, vb, nphases, jj)?;
                phase_patterns.push(if invert { pattern.map(|on| !on) } else { pattern });
            }
            patterns.push(phase_patterns);
        }
    }
    debug!("pattern set of {nangles} angles, nearest leakage at {:?}", record.min_leakage_angle);

    Ok(PatternSetData { patterns, record })
}

/// Search a pattern set for each of `periods` and derive its data for every wavelength.
///
/// Returns `sets[period][wavelength]` with wavelengths in ascending order. Records carry the
/// wavelength when `wavelengths` is given, and `invert` applies to every set.
#[allow(clippy::too_many_arguments)]
pub fn all_pattern_sets(
    nx: usize,
    ny: usize,
    periods: &[f64],
    nangles: usize,
    nphases: usize,
    wavelengths: Option<&[f64]>,
    invert: bool,
    options: &MulticolorSearchOptions,
    generate_patterns: bool,
) -> Result<Vec<Vec<PatternSetData>>, PatternError> {
    let labelled = wavelengths.is_some_and(|w| !w.is_empty());

    periods
        .iter()
        .map(|&period| -> Result<Vec<PatternSetData>, PatternError> {
            info!("searching {nangles} angle pattern set with period {period:.2}");
            let set = find_closest_multicolor_set(period, nangles, nphases, wavelengths, options)?;

            set.wavelengths
                .iter()
                .zip(&set.vec_as)
                .zip(&set.vec_bs)
                .map(|((&wavelength, vec_as), vec_bs)| {
                    pattern_set_data(
                        nx,
                        ny,
                        vec_as,
                        vec_bs,
                        nphases,
                        labelled.then_some(wavelength),
                        invert,
                        options.pitch,
                        generate_patterns,
                    )
                })
                .collect()
        })
        .collect()
}
