// Pattern set search
//
// Finds lattice vectors for a set of equally spaced SIM angles with a requested period. With several
// wavelengths the periods scale with wavelength, and the angles must agree across wavelengths so
// the diffracted orders land in the same place in the Fourier plane. Among the candidate sets,
// the one whose main peaks are furthest from any leakage peak is kept.

use std::f64::consts::PI;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::{
    DEFAULT_ANGLE_SEPARATION_TOLERANCE, DEFAULT_ANGLE_TOLERANCE, DEFAULT_DMD_PITCH,
    DEFAULT_MAX_SOLUTIONS_TO_SEARCH, DEFAULT_PERIOD_TOLERANCE_RELATIVE, DEFAULT_VECTOR_MAX_SIZE,
    MINIMUM_RELATIVE_PEAK_SIZE,
};
use crate::error::PatternError;
use crate::geometries::LatticeVector;
use crate::interfaces::AngleDiffMode;

use super::leakage::find_nearest_leakage_peaks;
use super::rational_approx::{allowed_angles, min_angle_diff, rational_approx_angle, AllowedAngle};
use super::sim_pattern::{sim_angle, sim_period};

/// Search parameters for `find_closest_multicolor_set`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MulticolorSearchOptions {
    /// Maximum component size of vb, in mirrors
    pub bvec_max_size: i64,
    /// Maximum component size of va, in mirrors
    pub avec_max_size: i64,
    /// Maximum deviation between the angles used for different wavelengths
    pub atol: f64,
    /// Maximum period deviation as a fraction of the requested period
    pub ptol_relative: f64,
    /// Maximum deviation of adjacent angle separations from pi / nangles
    pub angle_sep_tol: f64,
    /// Number of cheapest angle sets checked for leakage
    pub max_solutions_to_search: usize,
    /// Mirror pitch, in the units of the wavelengths
    pub pitch: f64,
    pub minimize_leakage: bool,
    /// Leakage peaks weaker than this fraction of DC are ignored
    pub minimum_relative_peak_size: f64,
}

impl Default for MulticolorSearchOptions {
    fn default() -> Self {
        MulticolorSearchOptions {
            bvec_max_size: DEFAULT_VECTOR_MAX_SIZE,
            avec_max_size: DEFAULT_VECTOR_MAX_SIZE,
            atol: DEFAULT_ANGLE_TOLERANCE,
            ptol_relative: DEFAULT_PERIOD_TOLERANCE_RELATIVE,
            angle_sep_tol: DEFAULT_ANGLE_SEPARATION_TOLERANCE,
            max_solutions_to_search: DEFAULT_MAX_SOLUTIONS_TO_SEARCH,
            pitch: DEFAULT_DMD_PITCH,
            minimize_leakage: true,
            minimum_relative_peak_size: MINIMUM_RELATIVE_PEAK_SIZE,
        }
    }
}

/// Lattice vectors for every wavelength and angle of a pattern set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MulticolorPatternSet {
    /// Wavelengths in ascending order
    pub wavelengths: Vec<f64>,
    /// `vec_as[wavelength][angle]`
    pub vec_as: Vec<Vec<LatticeVector>>,
    /// `vec_bs[wavelength][angle]`
    pub vec_bs: Vec<Vec<LatticeVector>>,
    /// Distance to the nearest leakage peak, if leakage was minimised
    pub min_leakage: Option<f64>,
}

/// Single pattern closest to a requested period and angle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestPattern {
    pub vec_a: LatticeVector,
    pub vec_b: LatticeVector,
    /// Realised period and angle
    pub period: f64,
    pub angle: f64,
}

/// Find the pattern with perfect phase shifts whose period and angle are closest to the request.
pub fn find_closest_pattern(
    period: f64,
    angle: f64,
    nphases: usize,
    avec_max_size: i64,
    bvec_max_size: i64,
) -> Result<ClosestPattern, PatternError> {
    let candidates = allowed_angles(period, nphases, bvec_max_size);
    let best = candidates
        .iter()
        .min_by(|a, b| (angle - a.angle).abs().total_cmp(&(angle - b.angle).abs()))
        .ok_or_else(|| {
            PatternError::NoPatternSetFound(format!(
                "no perfect phase shift angle for period {period} with |vb| < {bvec_max_size}"
            ))
        })?;

    let vec_a = rational_approx_angle(best.angle, avec_max_size)?.vector();
    let vec_b = best.vec_b;

    Ok(ClosestPattern {
        vec_a,
        vec_b,
        period: sim_period(vec_a, vec_b)?,
        angle: sim_angle(vec_a, vec_b)?,
    })
}

/// Index of the first entry of `angles` closest to `angle`
fn closest_angle(angle: f64, angles: &[AllowedAngle]) -> Option<(usize, f64)> {
    angles
        .iter()
        .enumerate()
        .map(|(i, a)| (i, (angle - a.angle).abs()))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Every combination of indices into lists of the given lengths, last index varying fastest
fn index_combinations(lengths: &[usize]) -> Vec<Vec<usize>> {
    if lengths.iter().any(|&l| l == 0) {
        return Vec::new();
    }

    let total: usize = lengths.iter().product();
    let mut combinations = Vec::with_capacity(total);
    let mut current = vec![0usize; lengths.len()];

    for _ in 0..total {
        combinations.push(current.clone());
        for digit in (0..lengths.len()).rev() {
            current[digit] += 1;
            if current[digit] < lengths[digit] {
                break;
            }
            current[digit] = 0;
        }
    }
    combinations
}

/// Chains of `nangles` angle indices, each angle following the previous by about `pi / nangles`
fn angle_chains(angles: &[f64], nangles: usize, angle_sep_tol: f64) -> Vec<Vec<usize>> {
    let expected_sep = PI / nangles as f64;
    let min_sep = expected_sep - angle_sep_tol;
    let max_sep = expected_sep + angle_sep_tol;

    let successors: Vec<Vec<usize>> = angles
        .iter()
        .map(|&a| {
            (0..angles.len())
                .filter(|&j| angles[j] > a + min_sep && angles[j] < a + max_sep)
                .collect()
        })
        .collect();

    let mut chains: Vec<Vec<usize>> = (0..angles.len()).map(|i| vec![i]).collect();
    for _ in 1..nangles {
        chains = chains
            .iter()
            .flat_map(|chain| {
                let last = chain[chain.len() - 1];
                successors[last].iter().map(move |&next| {
                    let mut extended = chain.clone();
                    extended.push(next);
                    extended
                })
            })
            .collect();
    }

    // the last angle must also be about pi / nangles away from the first, modulo pi
    if nangles > 1 {
        chains.retain(|chain| {
            let wrap = min_angle_diff(angles[chain[0]], angles[chain[nangles - 1]], AngleDiffMode::Half);
            (wrap.abs() - expected_sep).abs() <= angle_sep_tol
        });
    }
    chains
}

/// Minimum leakage distance of every `vec_a` combination, in the order of `combinations`
fn leakage_distances(
    combinations: &[Vec<usize>],
    accepted: &[Vec<LatticeVector>],
    vec_bs: &[LatticeVector],
    nphases: usize,
    wavelength: f64,
    options: &MulticolorSearchOptions,
) -> Result<Vec<f64>, PatternError> {
    let evaluate = |combination: &Vec<usize>| -> Result<f64, PatternError> {
        let vec_as: Vec<LatticeVector> = combination
            .iter()
            .enumerate()
            .map(|(angle, &i)| accepted[angle][i])
            .collect();
        let peaks = find_nearest_leakage_peaks(
            &vec_as,
            vec_bs,
            nphases,
            options.minimum_relative_peak_size,
            wavelength,
            options.pitch,
        )?;
        Ok(peaks.min_distance)
    };

    #[cfg(feature = "parallel")]
    let distances = {
        use rayon::prelude::*;

        combinations.par_iter().map(evaluate).collect()
    };

    #[cfg(not(feature = "parallel"))]
    let distances = combinations.iter().map(evaluate).collect();

    distances
}

/// Whether a set with leakage distance `proposed` replaces the current best.
///
/// The first scored set is always taken, even at zero distance; later sets must be strictly further.
fn improves_on(best: Option<f64>, proposed: f64) -> bool {
    best.map_or(true, |best| proposed > best)
}

/// Find lattice vectors for `nangles` SIM angles at `period` (for the shortest wavelength), with
/// periods scaled by wavelength and matching angles across all `wavelengths`.
///
/// Angle chains are ranked by the total length of their `vb`. Without leakage minimisation the
/// cheapest chain is returned with `va` from the best rational approximation of each angle.
/// Otherwise the cheapest `max_solutions_to_search` chains are scanned, each `va` drawn from the
/// approximations meeting the angle and period tolerances, and the set maximising the distance to
/// the nearest leakage peak over all wavelengths is returned.
pub fn find_closest_multicolor_set(
    period: f64,
    nangles: usize,
    nphases: usize,
    wavelengths: Option<&[f64]>,
    options: &MulticolorSearchOptions,
) -> Result<MulticolorPatternSet, PatternError> {
    if nangles == 0 {
        return Err(PatternError::NoPatternSetFound("nangles must be at least 1".to_string()));
    }

    let mut wavelengths: Vec<f64> = match wavelengths {
        Some(w) if !w.is_empty() => w.to_vec(),
        _ => vec![1.0],
    };
    if let Some(&bad) = wavelengths.iter().find(|&&w| !(w.is_finite() && w > 0.0)) {
        return Err(PatternError::ValueOutOfRange(bad));
    }
    wavelengths.sort_by(|a, b| a.total_cmp(b));
    let periods: Vec<f64> = wavelengths.iter().map(|w| period * w / wavelengths[0]).collect();

    let allowed: Vec<Vec<AllowedAngle>> = periods
        .iter()
        .map(|&p| allowed_angles(p, nphases, options.bvec_max_size))
        .collect();

    // keep the angles of the first wavelength that every other wavelength can match
    let mut kept: Vec<Vec<AllowedAngle>> = vec![Vec::new(); wavelengths.len()];
    for a in &allowed[0] {
        let matches: Option<Vec<usize>> = allowed
            .iter()
            .map(|angles| match closest_angle(a.angle, angles) {
                Some((i, diff)) if diff <= options.atol => Some(i),
                _ => None,
            })
            .collect();

        if let Some(indices) = matches {
            for (ii, &i) in indices.iter().enumerate() {
                kept[ii].push(allowed[ii][i]);
            }
        }
    }
    debug!(
        "{} of {} allowed angles match across {} wavelengths",
        kept[0].len(),
        allowed[0].len(),
        wavelengths.len()
    );

    let angles: Vec<f64> = kept[0].iter().map(|a| a.angle).collect();
    let mut chains = angle_chains(&angles, nangles, options.angle_sep_tol);

    let cost = |chain: &Vec<usize>| -> f64 {
        chain.iter().map(|&i| kept[0][i].vec_b.norm() / nphases as f64).sum()
    };
    chains.sort_by(|a, b| cost(a).total_cmp(&cost(b)));
    debug!("{} candidate angle sets", chains.len());

    if chains.is_empty() {
        return Err(PatternError::NoPatternSetFound(format!(
            "no set of {nangles} angles for period {period} within the separation tolerance"
        )));
    }

    if !options.minimize_leakage {
        let chain = &chains[0];
        let mut vec_as = Vec::with_capacity(wavelengths.len());
        let mut vec_bs = Vec::with_capacity(wavelengths.len());
        for kept_wavelength in &kept {
            vec_bs.push(chain.iter().map(|&s| kept_wavelength[s].vec_b).collect());
            vec_as.push(
                chain
                    .iter()
                    .map(|&s| Ok(rational_approx_angle(kept_wavelength[s].angle, options.avec_max_size)?.vector()))
                    .collect::<Result<Vec<_>, PatternError>>()?,
            );
        }

        info!("selected cheapest pattern set of {} candidates", chains.len());
        return Ok(MulticolorPatternSet {
            wavelengths,
            vec_as,
            vec_bs,
            min_leakage: None,
        });
    }

    let mut best: Option<MulticolorPatternSet> = None;

    'chains: for chain in chains.iter().take(options.max_solutions_to_search) {
        let mut vec_as_proposed = Vec::with_capacity(wavelengths.len());
        let mut vec_bs_proposed = Vec::with_capacity(wavelengths.len());
        let mut leakage_per_wavelength = Vec::with_capacity(wavelengths.len());

        for (ii, kept_wavelength) in kept.iter().enumerate() {
            let targets: Vec<AllowedAngle> = chain.iter().map(|&s| kept_wavelength[s]).collect();
            let vec_bs: Vec<LatticeVector> = targets.iter().map(|t| t.vec_b).collect();

            let mut accepted: Vec<Vec<LatticeVector>> = Vec::with_capacity(nangles);
            for target in &targets {
                let approximation = rational_approx_angle(target.angle, options.avec_max_size)?;
                let mut candidates = Vec::new();
                for va in approximation.sequence {
                    if va.cross(&target.vec_b) == 0 {
                        continue;
                    }
                    let angle_ok = min_angle_diff(sim_angle(va, target.vec_b)?, target.angle, AngleDiffMode::Half)
                        .abs()
                        < options.atol;
                    let period_ok =
                        ((sim_period(va, target.vec_b)? - periods[ii]) / periods[ii]).abs() < options.ptol_relative;
                    if angle_ok && period_ok {
                        candidates.push(va);
                    }
                }

                if candidates.is_empty() {
                    warn!(
                        "no va within tolerance for angle {:.4} at wavelength {}; skipping angle set",
                        target.angle, wavelengths[ii]
                    );
                    continue 'chains;
                }
                accepted.push(candidates);
            }

            let lengths: Vec<usize> = accepted.iter().map(Vec::len).collect();
            let combinations = index_combinations(&lengths);
            let distances = leakage_distances(&combinations, &accepted, &vec_bs, nphases, wavelengths[ii], options)?;

            // first maximum
            let mut imax = 0;
            for (k, &d) in distances.iter().enumerate() {
                if d > distances[imax] {
                    imax = k;
                }
            }

            leakage_per_wavelength.push(distances[imax]);
            vec_as_proposed.push(
                combinations[imax]
                    .iter()
                    .enumerate()
                    .map(|(angle, &i)| accepted[angle][i])
                    .collect(),
            );
            vec_bs_proposed.push(vec_bs);
        }

        let proposed = leakage_per_wavelength.iter().copied().fold(f64::INFINITY, f64::min);
        debug!("angle set {chain:?}: nearest leakage peak at {proposed:.3e}");
        if improves_on(best.as_ref().and_then(|b| b.min_leakage), proposed) {
            best = Some(MulticolorPatternSet {
                wavelengths: wavelengths.clone(),
                vec_as: vec_as_proposed,
                vec_bs: vec_bs_proposed,
                min_leakage: Some(proposed),
            });
        }
    }

    match best {
        Some(set) => {
            info!("selected pattern set with nearest leakage peak at {:?}", set.min_leakage);
            Ok(set)
        }
        None => Err(PatternError::NoPatternSetFound(format!(
            "none of the {} cheapest angle sets has a va within tolerance",
            options.max_solutions_to_search.min(chains.len())
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_combinations_order() {
        let combinations = index_combinations(&[2, 3]);
        assert_eq!(combinations.len(), 6);
        assert_eq!(combinations[0], vec![0, 0]);
        assert_eq!(combinations[1], vec![0, 1]);
        assert_eq!(combinations[3], vec![1, 0]);
        assert!(index_combinations(&[2, 0]).is_empty());
    }

    #[test]
    fn test_zero_leakage_sets_are_kept() {
        // every candidate scoring zero still yields the first one
        let scores = [0.0, 0.0, 0.0];
        let mut best: Option<(usize, f64)> = None;
        for (i, &score) in scores.iter().enumerate() {
            if improves_on(best.map(|(_, d)| d), score) {
                best = Some((i, score));
            }
        }
        assert_eq!(best, Some((0, 0.0)));

        assert!(improves_on(None, 0.0));
        assert!(!improves_on(Some(0.0), 0.0));
        assert!(improves_on(Some(0.0), 1e-6));
        assert!(!improves_on(Some(0.2), 0.1));
    }

    #[test]
    fn test_angle_chains() {
        let deg = PI / 180.0;
        let angles = [0.0, 30.0 * deg, 60.0 * deg, 121.0 * deg, 150.0 * deg];
        let chains = angle_chains(&angles, 3, 5.0 * deg);
        assert!(chains.contains(&vec![0, 2, 3]));
        assert!(chains.iter().all(|c| c.len() == 3));

        // a single angle needs no wrap check
        assert_eq!(angle_chains(&angles, 1, 5.0 * deg).len(), angles.len());
    }
}
