// SIM patterns from a pair of lattice vectors, and the pattern parameters derived from them
//
// The on pixels of one unit cell are the sub-cell spanned by va and vb / nphases, so the pattern
// is a sequence of lines along va repeating every vb. Phase k is the same pattern translated by
// k * vb / nphases.

use std::f64::consts::PI;

use nalgebra::Vector2;

use crate::error::PatternError;
use crate::fourier::pattern_fourier_component;
use crate::geometries::LatticeVector;
use crate::interfaces::{FrequencyUnits, OriginMode};
use crate::lattice::{reciprocal_vectors, sim_unit_cell, tile_pattern, Pattern, TilingOptions, UnitCell};

/// Generate phase `phase_index` of the SIM pattern with lattice vectors `va`, `vb` on an
/// `nx` by `ny` canvas.
///
/// Returns the pattern and its unit cell. Both components of `vb` must be divisible by `nphases`.
pub fn sim_pattern(
    nx: usize,
    ny: usize,
    va: LatticeVector,
    vb: LatticeVector,
    nphases: usize,
    phase_index: usize,
) -> Result<(Pattern, UnitCell), PatternError> {
    let vb_sub = vb.divide_exact(nphases)?;
    let cell = sim_unit_cell(va, vb, nphases)?;

    let start = vb_sub * phase_index as i64;
    let pattern = tile_pattern(nx, ny, va, vb, start, &cell, &TilingOptions::default())?;

    Ok((pattern, cell))
}

/// Angle of the pattern wave vector `rb` in `[0, 2 pi)`
pub fn sim_angle(va: LatticeVector, vb: LatticeVector) -> Result<f64, PatternError> {
    let rb = reciprocal_vectors(va, vb, FrequencyUnits::Frequency)?.rb;
    Ok(rb.y.atan2(rb.x).rem_euclid(2.0 * PI))
}

/// Pattern period in mirrors: the distance between the lines through 0 and `vb` along `va`.
pub fn sim_period(va: LatticeVector, vb: LatticeVector) -> Result<f64, PatternError> {
    if va.is_zero() {
        return Err(PatternError::InvalidBasis(
            "va must be non-zero to define a period".to_string(),
        ));
    }
    let perpendicular = Vector2::new(va.y as f64, -va.x as f64) / va.norm();
    Ok(perpendicular.dot(&vb.to_vector2()).abs())
}

/// Frequency of the pattern, the reciprocal vector `rb`, in 1/mirrors
pub fn sim_frequency(va: LatticeVector, vb: LatticeVector) -> Result<Vector2<f64>, PatternError> {
    Ok(reciprocal_vectors(va, vb, FrequencyUnits::Frequency)?.rb)
}

/// Phase in `[0, 2 pi)` of the pattern component at `rb`, referenced to `origin`.
///
/// With this phase the pattern approximately follows `0.5 * (1 + cos(2 pi rb . r + phase))`.
pub fn sim_phase(
    va: LatticeVector,
    vb: LatticeVector,
    nphases: usize,
    phase_index: usize,
    canvas: (usize, usize),
    origin: OriginMode,
) -> Result<f64, PatternError> {
    let cell = sim_unit_cell(va, vb, nphases)?;
    let (component, _) = pattern_fourier_component(
        &cell,
        va,
        vb,
        0,
        1,
        nphases,
        phase_index,
        origin,
        Some(canvas),
    )?;
    Ok(component.arg().rem_euclid(2.0 * PI))
}
