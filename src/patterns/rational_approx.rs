// Angle search on the integer lattice
//
// Pattern angles are only realisable where the lattice vectors are integer, so a requested angle
// is approximated by a rational slope (Stern-Brocot search), and for a requested period only the
// angles admitting an integer vb with perfect phase stepping are allowed.

use std::f64::consts::PI;

use log::trace;

use crate::config::PERFECT_PHASE_TOLERANCE;
use crate::error::PatternError;
use crate::geometries::LatticeVector;
use crate::interfaces::AngleDiffMode;

/// Successively better integer vectors perpendicular to a target angle
#[derive(Debug, Clone, PartialEq)]
pub struct RationalApproximation {
    /// Components of the best vector
    pub x: i64,
    pub y: i64,
    /// Every improving approximation in the order found, the last one is the best
    pub sequence: Vec<LatticeVector>,
}

impl RationalApproximation {
    pub fn vector(&self) -> LatticeVector {
        LatticeVector::new(self.x, self.y)
    }
}

/// Perfect phase shift pattern direction and the vb realising it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AllowedAngle {
    pub angle: f64,
    pub vec_b: LatticeVector,
}

/// Period realisable at a fixed angle with `vb` along a coordinate axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AllowedPeriod {
    pub period: f64,
    /// vb has length `l * nphases`
    pub l: i64,
    /// vb lies along x rather than y
    pub x_like: bool,
}

/// Best rational approximations `num / den` of `slope` in `[0, 1]` with `den < nmax`.
fn mediant_search(slope: f64, nmax: i64) -> Vec<(i64, i64)> {
    let mut lower = (0i64, 1i64);
    let mut upper = (1i64, 1i64);
    let mut sequence: Vec<(i64, i64)> = Vec::new();

    loop {
        let num = lower.0 + upper.0;
        let den = lower.1 + upper.1;
        if den >= nmax {
            break;
        }

        let mediant = num as f64 / den as f64;
        if mediant == slope {
            sequence.push((num, den));
            break;
        }

        if mediant > slope {
            upper = (num, den);
        } else {
            lower = (num, den);
        }

        let improves = match sequence.last() {
            None => true,
            Some(&(bn, bd)) => (mediant - slope).abs() <= (bn as f64 / bd as f64 - slope).abs(),
        };
        if improves {
            sequence.push((num, den));
        }
    }

    sequence
}

/// Approximate a vector perpendicular to the direction `angle` by integer vectors with
/// components below `nmax`.
///
/// The angle is folded into `[0, pi / 2]`, its slope (inverted if above 1) is approximated by a
/// mediant search, and the signs are restored per quadrant so that `tan(angle) = -x / y`.
pub fn rational_approx_angle(angle: f64, nmax: i64) -> Result<RationalApproximation, PatternError> {
    let angle = angle.rem_euclid(2.0 * PI);

    let (folded, quadrant) = if angle <= PI / 2.0 {
        (angle, 1)
    } else if angle <= PI {
        (PI - angle, 2)
    } else if angle <= 3.0 * PI / 2.0 {
        (angle - PI, 3)
    } else {
        (2.0 * PI - angle, 4)
    };

    let mut slope = folded.tan();
    let inverted = slope > 1.0;
    if inverted {
        slope = 1.0 / slope;
    }

    let mut fractions = mediant_search(slope, nmax);
    if fractions.is_empty() {
        return Err(PatternError::SearchBoundTooSmall { nmax });
    }
    if inverted {
        fractions.iter_mut().for_each(|f| *f = (f.1, f.0));
    }

    let sequence: Vec<LatticeVector> = fractions
        .into_iter()
        .map(|(s0, s1)| match quadrant {
            1 => LatticeVector::new(-s0, s1),
            2 => LatticeVector::new(-s0, -s1),
            3 => LatticeVector::new(s0, -s1),
            _ => LatticeVector::new(s0, s1),
        })
        .collect();
    trace!("rational approximations of angle {angle}: {} candidates", sequence.len());

    let best = sequence[sequence.len() - 1];
    Ok(RationalApproximation {
        x: best.x,
        y: best.y,
        sequence,
    })
}

/// Angles in `[0, pi]` at which a pattern of period `period` allows perfect phase shifting.
///
/// For `vb = (dxb, dyb)` with both components multiples of `nphases` and below `nmax`, solve
/// `period = dxb cos(t) + dyb sin(t)` (or `-period`). Squaring gives a quadratic in `cos(t)`; only
/// roots satisfying the unsquared equation are kept. Results are sorted by angle.
pub fn allowed_angles(period: f64, nphases: usize, nmax: i64) -> Vec<AllowedAngle> {
    let step = nphases.max(1);
    let positive: Vec<i64> = (nphases as i64..nmax).step_by(step).collect();

    let dxs: Vec<i64> = positive
        .iter()
        .rev()
        .map(|d| -d)
        .chain(std::iter::once(0))
        .chain(positive.iter().copied())
        .collect();
    let dys: Vec<i64> = (0..nmax).step_by(step).collect();

    let vbs: Vec<LatticeVector> = dys
        .iter()
        .flat_map(|&dy| dxs.iter().map(move |&dx| LatticeVector::new(dx, dy)))
        .filter(|vb| !vb.is_zero())
        .collect();

    // residual of dxb x + dyb sqrt(1 - x^2) = target
    let satisfies = |vb: &LatticeVector, x: f64, target: f64| {
        let residual = vb.x as f64 * x + vb.y as f64 * (1.0 - x * x).sqrt() - target;
        residual.abs() <= PERFECT_PHASE_TOLERANCE
    };

    let mut roots: [Vec<AllowedAngle>; 4] = Default::default();
    for vb in &vbs {
        let (dxb, dyb) = (vb.x as f64, vb.y as f64);
        let a = dxb * dxb + dyb * dyb;
        let b = -2.0 * period * dxb;
        let c = period * period - dyb * dyb;
        let sqrt_disc = (b * b - 4.0 * a * c).sqrt();

        let candidates = [
            (0.5 * (-b + sqrt_disc) / a, period),
            (0.5 * (-b - sqrt_disc) / a, period),
            (0.5 * (b + sqrt_disc) / a, -period),
            (0.5 * (b - sqrt_disc) / a, -period),
        ];

        for (group, &(x, target)) in candidates.iter().enumerate() {
            if !x.is_finite() || !satisfies(vb, x, target) {
                continue;
            }
            let angle = x.acos();
            if angle.is_nan() {
                continue;
            }
            roots[group].push(AllowedAngle { angle, vec_b: *vb });
        }
    }

    let mut angles: Vec<AllowedAngle> = roots.into_iter().flatten().collect();
    angles.sort_by(|a, b| a.angle.total_cmp(&b.angle));
    angles
}

/// Periods realisable at `angle` with `vb = (l * nphases, 0)` or `(0, l * nphases)`, sorted.
pub fn allowed_periods(angle: f64, nphases: usize, nmax: i64) -> Vec<AllowedPeriod> {
    let np = nphases.max(1) as i64;
    let lmax = nmax.div_euclid(np);

    let mut periods: Vec<AllowedPeriod> = (1..lmax)
        .map(|l| AllowedPeriod {
            period: angle.cos() * (l * np) as f64,
            l,
            x_like: true,
        })
        .chain((1..lmax).map(|l| AllowedPeriod {
            period: angle.sin() * (l * np) as f64,
            l,
            x_like: false,
        }))
        .collect();

    periods.sort_by(|a, b| a.period.total_cmp(&b.period));
    periods
}

/// Signed smallest difference `angle1 - angle2` in `(-pi, pi]`.
///
/// In `Half` mode `angle2` and `angle2 + pi` are equivalent and the smaller magnitude is returned.
pub fn min_angle_diff(angle1: f64, angle2: f64, mode: AngleDiffMode) -> f64 {
    let wrap = |d: f64| {
        let d = d.rem_euclid(2.0 * PI);
        if d > PI {
            d - 2.0 * PI
        } else {
            d
        }
    };

    let diff = wrap(angle1 - angle2);
    match mode {
        AngleDiffMode::Normal => diff,
        AngleDiffMode::Half => {
            let diff_pi = wrap(angle1 - angle2 - PI);
            if diff_pi.abs() < diff.abs() {
                diff_pi
            } else {
                diff
            }
        }
    }
}
