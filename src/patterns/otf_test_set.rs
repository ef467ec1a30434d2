// OTF test set: single SIM patterns on a grid of periods and angles
//
// Periods are spaced evenly in frequency so the transfer function is sampled uniformly. Each
// pattern is the perfect phase shift pattern closest to the requested period and angle.

use std::f64::consts::PI;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::{
    DEFAULT_OTF_MAX_PERIOD, DEFAULT_OTF_MIN_PERIOD, DEFAULT_OTF_NANGLES, DEFAULT_OTF_NPERIODS,
    DEFAULT_VECTOR_MAX_SIZE,
};
use crate::error::PatternError;
use crate::geometries::LatticeVector;
use crate::interfaces::OriginMode;
use crate::lattice::Pattern;

use super::pattern_search::find_closest_pattern;
use super::sim_pattern::{sim_frequency, sim_pattern, sim_phase};

/// Grid and search bounds of an OTF test set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtfTestOptions {
    /// Shortest period, in mirrors
    pub min_period: f64,
    /// Longest period, in mirrors
    pub max_period: f64,
    pub nperiods: usize,
    /// Angles `k * pi / nangles`
    pub nangles: usize,
    /// Sets the filling fraction `1 / nphases` of every pattern
    pub nphases: usize,
    pub avec_max_size: i64,
    pub bvec_max_size: i64,
    pub phase_index: usize,
}

impl Default for OtfTestOptions {
    fn default() -> Self {
        Self {
            min_period: DEFAULT_OTF_MIN_PERIOD,
            max_period: DEFAULT_OTF_MAX_PERIOD,
            nperiods: DEFAULT_OTF_NPERIODS,
            nangles: DEFAULT_OTF_NANGLES,
            nphases: 3,
            avec_max_size: DEFAULT_VECTOR_MAX_SIZE,
            bvec_max_size: DEFAULT_VECTOR_MAX_SIZE,
            phase_index: 0,
        }
    }
}

/// Realised parameters of an OTF test set, all indexed `[period][angle]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtfTestRecord {
    pub vec_as: Vec<Vec<LatticeVector>>,
    pub vec_bs: Vec<Vec<LatticeVector>>,
    /// Radians
    pub angles: Vec<Vec<f64>>,
    /// Mirrors
    pub periods: Vec<Vec<f64>>,
    /// 1/mirrors
    pub frequencies: Vec<Vec<[f64; 2]>>,
    /// Radians, referenced to the FFT origin
    pub phases: Vec<Vec<f64>>,
    pub nphases: usize,
    pub phase_index: usize,
}

impl OtfTestRecord {
    /// Number of lattice patterns, not counting the all on and all off patterns shown after them
    pub fn npatterns(&self) -> usize {
        self.vec_as.iter().map(Vec::len).sum()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// OTF test patterns with their record
#[derive(Debug, Clone, PartialEq)]
pub struct OtfTestSet {
    /// `patterns[period][angle]`, empty when patterns were not requested
    pub patterns: Vec<Vec<Pattern>>,
    pub record: OtfTestRecord,
}

/// Periods equally spaced in frequency between `1 / max_period` and `1 / min_period`, shortest first
pub fn otf_test_periods(min_period: f64, max_period: f64, nperiods: usize) -> Vec<f64> {
    let (fmin, fmax) = (1.0 / max_period, 1.0 / min_period);
    (0..nperiods)
        .rev()
        .map(|k| {
            let f = if nperiods == 1 {
                fmin
            } else {
                fmin + (fmax - fmin) * k as f64 / (nperiods - 1) as f64
            };
            1.0 / f
        })
        .collect()
}

/// Find the pattern closest to every period and angle of the test grid.
///
/// The phase of each pattern is for `phase_index` on an `nx` by `ny` canvas.
pub fn otf_test_set(
    nx: usize,
    ny: usize,
    options: &OtfTestOptions,
    generate_patterns: bool,
) -> Result<OtfTestSet, PatternError> {
    for period in [options.min_period, options.max_period] {
        if !(period.is_finite() && period > 0.0) {
            return Err(PatternError::ValueOutOfRange(period));
        }
    }
    if options.nphases == 0 {
        return Err(PatternError::ValueOutOfRange(0.0));
    }
    if options.phase_index >= options.nphases {
        return Err(PatternError::InvalidPhaseIndex {
            index: options.phase_index,
            nphases: options.nphases,
        });
    }

    let periods = otf_test_periods(options.min_period, options.max_period, options.nperiods);
    let angles: Vec<f64> = (0..options.nangles)
        .map(|jj| jj as f64 * PI / options.nangles as f64)
        .collect();

    let mut record = OtfTestRecord {
        vec_as: Vec::with_capacity(periods.len()),
        vec_bs: Vec::with_capacity(periods.len()),
        angles: Vec::with_capacity(periods.len()),
        periods: Vec::with_capacity(periods.len()),
        frequencies: Vec::with_capacity(periods.len()),
        phases: Vec::with_capacity(periods.len()),
        nphases: options.nphases,
        phase_index: options.phase_index,
    };
    let mut patterns = Vec::new();

    for &period in &periods {
        let mut vec_as = Vec::with_capacity(angles.len());
        let mut vec_bs = Vec::with_capacity(angles.len());
        let mut real_angles = Vec::with_capacity(angles.len());
        let mut real_periods = Vec::with_capacity(angles.len());
        let mut frequencies = Vec::with_capacity(angles.len());
        let mut phases = Vec::with_capacity(angles.len());
        let mut period_patterns = Vec::new();

        for &angle in &angles {
            let closest = find_closest_pattern(
                period,
                angle,
                options.nphases,
                options.avec_max_size,
                options.bvec_max_size,
            )?;
            let (va, vb) = (closest.vec_a, closest.vec_b);
            debug!(
                "period {period:.3}, angle {angle:.4}: va = {va}, vb = {vb}, realised period {:.3}",
                closest.period
            );

            let frequency = sim_frequency(va, vb)?;
            frequencies.push([frequency.x, frequency.y]);
            phases.push(sim_phase(va, vb, options.nphases, options.phase_index, (nx, ny), OriginMode::Fft)?);
            if generate_patterns {
                let (pattern, _) = sim_pattern(nx, ny, va, vb, options.nphases, options.phase_index)?;
                period_patterns.push(pattern);
            }

            vec_as.push(va);
            vec_bs.push(vb);
            real_angles.push(closest.angle);
            real_periods.push(closest.period);
        }

        record.vec_as.push(vec_as);
        record.vec_bs.push(vec_bs);
        record.angles.push(real_angles);
        record.periods.push(real_periods);
        record.frequencies.push(frequencies);
        record.phases.push(phases);
        if generate_patterns {
            patterns.push(period_patterns);
        }
    }

    info!(
        "OTF test set of {} periods and {} angles",
        periods.len(),
        angles.len()
    );
    Ok(OtfTestSet { patterns, record })
}
