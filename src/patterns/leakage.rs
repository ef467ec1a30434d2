// Leakage peaks: Fourier peaks of one pattern landing close to the main peak of another

use log::debug;
use nalgebra::Vector2;

use crate::error::PatternError;
use crate::fourier::fourier_components::cell_transform;
use crate::geometries::LatticeVector;
use crate::interfaces::FrequencyUnits;
use crate::lattice::{reciprocal_vectors, sim_unit_cell, ReciprocalVectors, UnitCell};

// Harmonics of a pattern against itself, excluding the main peaks (0, +-1) and DC
const SELF_HARMONICS_N: [i64; 2] = [-1, 1];
const SELF_HARMONICS_M: [i64; 3] = [-1, 0, 2];

// Extra coefficients scanned around the real valued match of a cross pair
const CROSS_SEARCH_MARGIN: i64 = 2;

/// Distances from each pattern's main frequency to the nearest significant competing peak
#[derive(Debug, Clone, PartialEq)]
pub struct LeakagePeaks {
    /// Minimum over all patterns
    pub min_distance: f64,
    /// Minimum for each pattern
    pub per_pattern: Vec<f64>,
    /// Pattern whose peak realises the minimum for each pattern
    pub nearest_pattern: Vec<usize>,
}

/// Reciprocal lattice coefficients `(n, m)` of the other pattern to check against `rb_target`
fn candidate_coefficients(
    same: bool,
    va: LatticeVector,
    vb: LatticeVector,
    rb_target: &Vector2<f64>,
) -> Vec<(i64, i64)> {
    if same {
        return SELF_HARMONICS_N
            .iter()
            .flat_map(|&n| SELF_HARMONICS_M.iter().map(move |&m| (n, m)))
            .collect();
    }

    // n * ra + m * rb = rb_target has n = va . rb_target, m = vb . rb_target
    let n = va.to_vector2().dot(rb_target);
    let m = vb.to_vector2().dot(rb_target);

    let ns = (n.floor() as i64 - CROSS_SEARCH_MARGIN)..=(n.ceil() as i64 + CROSS_SEARCH_MARGIN);
    let ms = (m.floor() as i64 - CROSS_SEARCH_MARGIN)..=(m.ceil() as i64 + CROSS_SEARCH_MARGIN);
    ns.flat_map(|n| ms.clone().map(move |m| (n, m))).collect()
}

/// Find the nearest leakage peak for every pattern of a set.
///
/// For each ordered pair `(i, j)`, peaks `n * ra_j + m * rb_j` of pattern `j` near the main
/// frequency `rb_i` are weighted by their Fourier magnitude relative to DC; peaks weaker than
/// `minimum_relative_peak_size` are ignored. Distances are scaled by `wavelength / pitch`.
pub fn find_nearest_leakage_peaks(
    vec_as: &[LatticeVector],
    vec_bs: &[LatticeVector],
    nphases: usize,
    minimum_relative_peak_size: f64,
    wavelength: f64,
    pitch: f64,
) -> Result<LeakagePeaks, PatternError> {
    if vec_as.len() != vec_bs.len() {
        return Err(PatternError::LengthMismatch {
            what: "vec_b entries",
            expected: vec_as.len(),
            found: vec_bs.len(),
        });
    }
    let nangles = vec_as.len();

    let cells: Vec<UnitCell> = vec_as
        .iter()
        .zip(vec_bs)
        .map(|(&va, &vb)| sim_unit_cell(va, vb, nphases))
        .collect::<Result<_, _>>()?;
    let reciprocals: Vec<ReciprocalVectors> = vec_as
        .iter()
        .zip(vec_bs)
        .map(|(&va, &vb)| reciprocal_vectors(va, vb, FrequencyUnits::Frequency))
        .collect::<Result<_, _>>()?;

    let mut per_pattern = Vec::with_capacity(nangles);
    let mut nearest_pattern = Vec::with_capacity(nangles);

    for ii in 0..nangles {
        let target = reciprocals[ii].rb;
        let mut best = (f64::INFINITY, 0usize);

        for jj in 0..nangles {
            let dc = cells[jj].on_count() as f64;
            let mut min_dist = f64::INFINITY;

            for (n, m) in candidate_coefficients(ii == jj, vec_as[jj], vec_bs[jj], &target) {
                let frequency = reciprocals[jj].frequency(n, m);
                let weight = cell_transform(&cells[jj], &frequency).norm() / dc;
                if weight < minimum_relative_peak_size {
                    continue;
                }

                let dist = (frequency - target).norm() * wavelength / pitch;
                if dist < min_dist {
                    min_dist = dist;
                }
            }

            if min_dist < best.0 {
                best = (min_dist, jj);
            }
        }

        per_pattern.push(best.0);
        nearest_pattern.push(best.1);
    }

    let min_distance = per_pattern.iter().copied().fold(f64::INFINITY, f64::min);
    debug!("nearest leakage peak over {nangles} patterns: {min_distance:.3e}");

    Ok(LeakagePeaks {
        min_distance,
        per_pattern,
        nearest_pattern,
    })
}
