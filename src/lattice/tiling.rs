// Tiling of unit cells over the mirror array
//
// The canvas is covered by pasting copies of the cell at every lattice translate
// n * va + m * vb + start that overlaps it. When that takes too many pastes, the cell is first
// enlarged by repeated doubling along both lattice vectors, which costs a logarithmic number of
// pastes instead.

use log::debug;
use nalgebra::{DMatrix, Vector2};
use serde::{Deserialize, Serialize};

use crate::config::TILING_ITERATION_THRESHOLD;
use crate::error::PatternError;
use crate::geometries::{IntBoundingBox, LatticeVector};
use crate::lattice::base_matrix::LatticeBasis;
use crate::lattice::unit_cell::{minimal_cell, Pixel, UnitCell};

/// Binary pattern of shape `(ny, nx)`, `pattern[(iy, ix)]` is the mirror at `(x, y) = (ix, iy)`
pub type Pattern = DMatrix<bool>;

/// Runtime options for [`tile_pattern`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TilingOptions {
    /// Re-express the cell in the reduced basis before tiling
    pub reduce_basis: bool,
    /// Cell pastes above which the cell is doubled first
    pub iteration_threshold: usize,
}

impl Default for TilingOptions {
    fn default() -> Self {
        Self {
            reduce_basis: true,
            iteration_threshold: TILING_ITERATION_THRESHOLD,
        }
    }
}

/// Range of lattice coefficients `(n_min, n_max, m_min, m_max)` needed to cover the canvas
fn coefficient_bounds(
    nx: usize,
    ny: usize,
    basis: &LatticeBasis,
    start: LatticeVector,
) -> (i64, i64, i64, i64) {
    let (sx, sy) = (start.x as f64, start.y as f64);
    let (fx, fy) = (nx as f64, ny as f64);
    let corners = [
        Vector2::new(fx - sx, fy - sy),
        Vector2::new(-sx, fy - sy),
        Vector2::new(fx - sx, -sy),
        Vector2::new(-sx, -sy),
    ];

    let mut n_lo = f64::INFINITY;
    let mut n_hi = f64::NEG_INFINITY;
    let mut m_lo = f64::INFINITY;
    let mut m_hi = f64::NEG_INFINITY;
    for corner in corners {
        let coeffs = basis.fractional_coordinates(corner);
        n_lo = n_lo.min(coeffs.x);
        n_hi = n_hi.max(coeffs.x);
        m_lo = m_lo.min(coeffs.y);
        m_hi = m_hi.max(coeffs.y);
    }

    (
        n_lo.floor() as i64,
        n_hi.ceil() as i64,
        m_lo.floor() as i64,
        m_hi.ceil() as i64,
    )
}

/// Number of doublings to apply for a coefficient range of `range` cells
fn doublings_for(range: i64) -> u32 {
    let max_doublings = (range.max(1) as f64).log2().floor();
    ((max_doublings / 2.0).round_ties_even() as u32).max(1)
}

/// Tile `cell` over an `nx` by `ny` canvas, with a cell origin at `start`.
///
/// Every canvas pixel must be covered by some translate of the cell, otherwise
/// `IncompleteTiling` is returned.
pub fn tile_pattern(
    nx: usize,
    ny: usize,
    va: LatticeVector,
    vb: LatticeVector,
    start: LatticeVector,
    cell: &UnitCell,
    options: &TilingOptions,
) -> Result<Pattern, PatternError> {
    let (mut cell, mut va, mut vb) = if options.reduce_basis {
        minimal_cell(cell, va, vb)?
    } else {
        (cell.clone(), va, vb)
    };

    let (na_min, na_max, nb_min, nb_max) = loop {
        let basis = LatticeBasis::new(va, vb)?;
        let (na_min, na_max, nb_min, nb_max) = coefficient_bounds(nx, ny, &basis, start);

        let na_range = na_max - na_min;
        let nb_range = nb_max - nb_min;
        let niterations = (na_range * nb_range).max(0) as usize;

        // ranges of a few cells cannot shrink further by doubling
        if niterations <= options.iteration_threshold || (na_range <= 2 && nb_range <= 2) {
            break (na_min, na_max, nb_min, nb_max);
        }

        let na = doublings_for(na_range);
        let nb = doublings_for(nb_range);
        debug!(
            "tiling needs {niterations} pastes, doubling cell {na} times along {va} and {nb} times along {vb}"
        );

        cell = double_cell(&cell, va, vb, na, nb)?;
        va = va * (1i64 << na);
        vb = vb * (1i64 << nb);
    };

    let mut canvas = DMatrix::from_element(ny, nx, Pixel::Outside);
    let (dx, dy) = cell.shape();
    let (width, height) = (nx as i64, ny as i64);

    for n in na_min..=na_max {
        for m in nb_min..=nb_max {
            // (0, 0) of the cell sits at n * va + m * vb + start
            let zero = va * n + vb * m + start;
            let xstart = zero.x + cell.min_x();
            let ystart = zero.y + cell.min_y();
            let xend = xstart + dx as i64;
            let yend = ystart + dy as i64;

            if xend < 0 || yend < 0 || xstart > width || ystart > height {
                continue;
            }

            for iy in ystart.max(0)..yend.min(height) {
                for ix in xstart.max(0)..xend.min(width) {
                    let value = cell.value((ix - xstart) as usize, (iy - ystart) as usize);
                    let target = &mut canvas[(iy as usize, ix as usize)];
                    *target = target.merge(value);
                }
            }
        }
    }

    // storage is column major
    if let Some(index) = canvas.iter().position(|p| !p.is_inside()) {
        return Err(PatternError::IncompleteTiling {
            x: index / ny,
            y: index % ny,
        });
    }

    Ok(canvas.map(|p| p.is_on()))
}

/// Double a cell once along `va`, giving a cell of the lattice spanned by `2 * va` and `vb`.
fn double_cell_once(
    cell: &UnitCell,
    va: LatticeVector,
    vb: LatticeVector,
) -> Result<UnitCell, PatternError> {
    let corners = [LatticeVector::zero(), va * 2, vb, va * 2 + vb];
    let bounds = IntBoundingBox::from_points(corners).ok_or_else(|| {
        PatternError::InvalidBasis(format!("cannot double cell of va = {va}, vb = {vb}"))
    })?;

    let mut doubled = UnitCell::outside(bounds.x_range().collect(), bounds.y_range().collect());
    for n in 0..2 {
        let shift = va * n;
        for (point, value) in cell.inside_pixels() {
            if let Some(index) = doubled.index_of(point + shift) {
                doubled.pixels[index] = value;
            }
        }
    }

    Ok(doubled)
}

/// Enlarge a cell `2^na` times along `va` and `2^nb` times along `vb`.
///
/// The result is a unit cell of the lattice spanned by `2^na * va` and `2^nb * vb`.
pub fn double_cell(
    cell: &UnitCell,
    va: LatticeVector,
    vb: LatticeVector,
    na: u32,
    nb: u32,
) -> Result<UnitCell, PatternError> {
    LatticeBasis::new(va, vb)?;

    let mut big_cell = cell.clone();
    for ii in 0..na {
        big_cell = double_cell_once(&big_cell, va * (1i64 << ii), vb)?;
    }

    let va_big = va * (1i64 << na);
    for jj in 0..nb {
        big_cell = double_cell_once(&big_cell, vb * (1i64 << jj), va_big)?;
    }

    Ok(big_cell)
}
