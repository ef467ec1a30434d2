// Basis reduction and nearest-lattice-point utilities
//
// Lagrange-Gauss reduction is the two dimensional analogue of LLL: repeatedly subtract the rounded
// projection of the longer vector onto the shorter one and swap while that makes it shorter. Each
// swap strictly decreases a non-negative integer squared norm, so the loop terminates.

use log::trace;
use nalgebra::Vector2;

use crate::error::PatternError;
use crate::geometries::{in_parallelogram, LatticeVector};
use crate::interfaces::FrequencyUnits;
use crate::lattice::base_matrix::{reciprocal_vectors, LatticeBasis, ReciprocalVectors};

/// Lattice vector nearest to a query point, with its coefficients in the basis that was passed in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestLatticeVector {
    pub vector: Vector2<f64>,
    pub na: i64,
    pub nb: i64,
}

/// Integer division rounding toward negative infinity
fn floor_div(numerator: i64, denominator: i64) -> i64 {
    if denominator < 0 {
        (-numerator).div_euclid(-denominator)
    } else {
        numerator.div_euclid(denominator)
    }
}

/// Rounded projection coefficient of `v` onto `onto`, ties to even
fn projection_coefficient(v: LatticeVector, onto: LatticeVector) -> i64 {
    (v.dot(&onto) as f64 / onto.norm_squared() as f64).round_ties_even() as i64
}

/// Find the shortest pair of basis vectors spanning the same lattice as `va`, `vb`.
///
/// Returns `(short, long)` with `|short| <= |long|`. The pair is as close to orthogonal as the
/// lattice allows: the projection coefficient of `long` on `short` is at most 1/2.
pub fn reduce_basis(
    va: LatticeVector,
    vb: LatticeVector,
) -> Result<(LatticeVector, LatticeVector), PatternError> {
    LatticeBasis::new(va, vb)?;

    let mut short = va;
    let mut long = vb - va * projection_coefficient(vb, va);
    let mut short_norm = short.norm_squared();
    let mut long_norm = long.norm_squared();

    while long_norm < short_norm {
        std::mem::swap(&mut short, &mut long);
        short_norm = long_norm;

        long = long - short * projection_coefficient(long, short);
        long_norm = long.norm_squared();
        trace!("reduce_basis step: short = {short}, long = {long}");
    }

    Ok((short, long))
}

/// Reciprocal vectors of the reduced basis.
///
/// These span the reciprocal lattice of `va`, `vb`, but are not dual to the original vectors.
pub fn reduce_reciprocal_basis(
    va: LatticeVector,
    vb: LatticeVector,
) -> Result<ReciprocalVectors, PatternError> {
    let (va_r, vb_r) = reduce_basis(va, vb)?;
    reciprocal_vectors(va_r, vb_r, FrequencyUnits::Frequency)
}

/// Find the lattice vector closest to `point`.
///
/// Candidates are the four lattice points surrounding `point` in the reduced basis; the winner is
/// re-expressed in terms of the original `va`, `vb`.
pub fn closest_lattice_vector(
    point: Vector2<f64>,
    va: LatticeVector,
    vb: LatticeVector,
) -> Result<ClosestLatticeVector, PatternError> {
    let (va_r, vb_r) = reduce_basis(va, vb)?;
    let reduced = reciprocal_vectors(va_r, vb_r, FrequencyUnits::Frequency)?;

    let frac_a = point.dot(&reduced.ra);
    let frac_b = point.dot(&reduced.rb);
    let candidates_a = [frac_a.ceil() as i64, frac_a.floor() as i64];
    let candidates_b = [frac_b.ceil() as i64, frac_b.floor() as i64];

    let mut best = (0, 0);
    let mut best_distance = f64::INFINITY;
    for &na in &candidates_a {
        for &nb in &candidates_b {
            let candidate = (va_r * na + vb_r * nb).to_vector2();
            let distance = (point - candidate).norm();
            if distance < best_distance {
                best_distance = distance;
                best = (na, nb);
            }
        }
    }

    let (na_r, nb_r) = best;
    let vector = (va_r * na_r + vb_r * nb_r).to_vector2();

    // express the reduced vectors in the original basis
    let original = reciprocal_vectors(va, vb, FrequencyUnits::Frequency)?;
    let va_r_coeffs = (va_r.to_vector2().dot(&original.ra), va_r.to_vector2().dot(&original.rb));
    let vb_r_coeffs = (vb_r.to_vector2().dot(&original.ra), vb_r.to_vector2().dot(&original.rb));

    let na = (na_r as f64 * va_r_coeffs.0 + nb_r as f64 * vb_r_coeffs.0).round() as i64;
    let nb = (na_r as f64 * va_r_coeffs.1 + nb_r as f64 * vb_r_coeffs.1).round() as i64;

    Ok(ClosestLatticeVector { vector, na, nb })
}

/// Find the reciprocal lattice vector `na * ra + nb * rb` closest to a point in frequency space.
///
/// The reciprocal vectors scaled by the determinant have integer components, so the search reuses
/// [`closest_lattice_vector`] on that scaled lattice.
pub fn closest_reciprocal_vector(
    frequency: Vector2<f64>,
    va: LatticeVector,
    vb: LatticeVector,
) -> Result<ClosestLatticeVector, PatternError> {
    let det = LatticeBasis::new(va, vb)?.determinant();

    // det * ra and det * rb
    let ra_scaled = LatticeVector::new(vb.y, -vb.x);
    let rb_scaled = LatticeVector::new(-va.y, va.x);

    let scaled = closest_lattice_vector(frequency * det as f64, ra_scaled, rb_scaled)?;
    Ok(ClosestLatticeVector {
        vector: scaled.vector / det as f64,
        na: scaled.na,
        nb: scaled.nb,
    })
}

/// Reduce `point` into the unit cell spanned by `va`, `vb`.
///
/// Returns the reduced point and the coefficients `(na, nb)` with
/// `point = reduced + na * va + nb * vb`. Dual coordinates are floored exactly in integer
/// arithmetic, so the reduced point has fractional coordinates in `[0, 1)`.
pub fn reduce_to_cell(
    point: LatticeVector,
    va: LatticeVector,
    vb: LatticeVector,
) -> Result<(LatticeVector, i64, i64), PatternError> {
    let det = LatticeBasis::new(va, vb)?.determinant();

    // point . ra = cross(point, vb) / det and point . rb = cross(va, point) / det
    let na = floor_div(point.cross(&vb), det);
    let nb = floor_div(va.cross(&point), det);
    let reduced = point - va * na - vb * nb;

    if !in_parallelogram(reduced.to_vector2(), va, vb) {
        return Err(PatternError::UnresolvedLatticePoint {
            x: point.x,
            y: point.y,
            ax: va.x,
            ay: va.y,
            bx: vb.x,
            by: vb.y,
        });
    }

    Ok((reduced, na, nb))
}
