// Unit cell construction: the pixels of one lattice period and which of them are "on"
//
// A cell is stored on the rectangular grid of its bounding coordinates. Grid pixels that do not
// belong to the half-open parallelogram are `Pixel::Outside` and are ignored when cells are pasted.

use log::debug;
use nalgebra::DMatrix;

use crate::error::PatternError;
use crate::geometries::{in_parallelogram, LatticeVector};
use crate::lattice::base_matrix::LatticeBasis;
use crate::lattice::basis_reduction::{reduce_basis, reduce_to_cell};

/// State of one grid pixel of a unit cell or of a partially tiled canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pixel {
    /// Padding, not part of the cell
    #[default]
    Outside,
    Off,
    On,
}

impl Pixel {
    pub fn is_inside(&self) -> bool {
        !matches!(self, Pixel::Outside)
    }

    pub fn is_on(&self) -> bool {
        matches!(self, Pixel::On)
    }

    /// Combine two layers, `Outside` acts as the identity
    pub fn merge(self, other: Pixel) -> Pixel {
        match (self, other) {
            (Pixel::Outside, p) | (p, Pixel::Outside) => p,
            (Pixel::On, _) | (_, Pixel::On) => Pixel::On,
            _ => Pixel::Off,
        }
    }
}

impl From<bool> for Pixel {
    fn from(on: bool) -> Self {
        if on {
            Pixel::On
        } else {
            Pixel::Off
        }
    }
}

/// Pixels of a unit cell together with their integer coordinates.
///
/// `pixels[(iy, ix)]` is the pixel at coordinate `(x[ix], y[iy])`; coordinates are consecutive
/// integers.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitCell {
    pub pixels: DMatrix<Pixel>,
    pub x: Vec<i64>,
    pub y: Vec<i64>,
}

impl UnitCell {
    /// Cell on the grid with coordinates `x`, `y` whose pixels are all `Outside`
    pub fn outside(x: Vec<i64>, y: Vec<i64>) -> Self {
        let pixels = DMatrix::from_element(y.len(), x.len(), Pixel::Outside);
        Self { pixels, x, y }
    }

    /// Number of columns and rows
    pub fn shape(&self) -> (usize, usize) {
        (self.x.len(), self.y.len())
    }

    pub fn min_x(&self) -> i64 {
        self.x.first().copied().unwrap_or(0)
    }

    pub fn min_y(&self) -> i64 {
        self.y.first().copied().unwrap_or(0)
    }

    /// Number of pixels belonging to the cell
    pub fn area(&self) -> usize {
        self.pixels.iter().filter(|p| p.is_inside()).count()
    }

    pub fn on_count(&self) -> usize {
        self.pixels.iter().filter(|p| p.is_on()).count()
    }

    /// Grid index of coordinate `(x, y)`, if it is on the grid
    pub fn index_of(&self, point: LatticeVector) -> Option<(usize, usize)> {
        let ix = point.x - self.min_x();
        let iy = point.y - self.min_y();
        if ix < 0 || iy < 0 || ix as usize >= self.x.len() || iy as usize >= self.y.len() {
            return None;
        }
        Some((iy as usize, ix as usize))
    }

    /// Pixel at coordinate `(x, y)`, `None` if off the grid
    pub fn get(&self, point: LatticeVector) -> Option<Pixel> {
        self.index_of(point).map(|index| self.pixels[index])
    }

    /// Pixel at grid index `(ix, iy)`
    pub fn value(&self, ix: usize, iy: usize) -> Pixel {
        self.pixels[(iy, ix)]
    }

    /// Coordinates and values of all pixels belonging to the cell, row by row
    pub fn inside_pixels(&self) -> impl Iterator<Item = (LatticeVector, Pixel)> + '_ {
        self.y.iter().enumerate().flat_map(move |(iy, &y)| {
            self.x.iter().enumerate().filter_map(move |(ix, &x)| {
                let pixel = self.pixels[(iy, ix)];
                pixel.is_inside().then(|| (LatticeVector::new(x, y), pixel))
            })
        })
    }
}

/// Grid coordinates along one axis for a cell whose edge vectors have components `a` and `b`.
///
/// The range has `|a| + |b|` entries and is shifted so it starts just above the most negative
/// corner, which the half-open cell never contains.
fn axis_coordinates(a: i64, b: i64) -> Vec<i64> {
    let len = a.abs() + b.abs();
    let offset = match (a < 0, b < 0) {
        (true, false) => a + 1,
        (false, true) => b + 1,
        (true, true) => a + b + 1,
        (false, false) => 0,
    };
    (offset..offset + len).collect()
}

/// Build the unit cell spanned by `va` and `vb`, with every member pixel set to `Off`.
pub fn unit_cell(va: LatticeVector, vb: LatticeVector) -> Result<UnitCell, PatternError> {
    let basis = LatticeBasis::new(va, vb)?;

    let mut cell = UnitCell::outside(axis_coordinates(va.x, vb.x), axis_coordinates(va.y, vb.y));
    for (iy, &y) in cell.y.iter().enumerate() {
        for (ix, &x) in cell.x.iter().enumerate() {
            if in_parallelogram(LatticeVector::new(x, y).to_vector2(), va, vb) {
                cell.pixels[(iy, ix)] = Pixel::Off;
            }
        }
    }

    let area = cell.area();
    if area != basis.area() {
        return Err(PatternError::InvalidBasis(format!(
            "unit cell of va = {va}, vb = {vb} has {area} pixels, expected {}",
            basis.area()
        )));
    }

    Ok(cell)
}

/// Build the unit cell of a SIM pattern with `nphases` phase shifts along `vb`.
///
/// The pixels of the sub-cell spanned by `va` and `vb / nphases` are on, the rest of the cell is
/// off. Translating the pattern by `vb / nphases` then steps through the phases.
pub fn sim_unit_cell(
    va: LatticeVector,
    vb: LatticeVector,
    nphases: usize,
) -> Result<UnitCell, PatternError> {
    let vb_sub = vb.divide_exact(nphases)?;

    let mut cell = unit_cell(va, vb)?;
    let phase_cell = unit_cell(va, vb_sub)?;

    for (point, _) in phase_cell.inside_pixels() {
        if let Some(index) = cell.index_of(point) {
            if cell.pixels[index].is_inside() {
                cell.pixels[index] = Pixel::On;
            }
        }
    }

    let found = cell.on_count();
    let expected = cell.area() / nphases;
    if found != expected {
        return Err(PatternError::PhaseCellMismatch { found, expected });
    }

    Ok(cell)
}

/// Express `cell`, a unit cell of the lattice spanned by `va1`, `vb1`, in the basis `va2`, `vb2`.
///
/// Both bases must generate the same lattice.
pub fn convert_cell(
    cell: &UnitCell,
    va1: LatticeVector,
    vb1: LatticeVector,
    va2: LatticeVector,
    vb2: LatticeVector,
) -> Result<UnitCell, PatternError> {
    let area1 = LatticeBasis::new(va1, vb1)?.area();
    let area2 = LatticeBasis::new(va2, vb2)?.area();

    let same_lattice = area1 == area2
        && reduce_to_cell(va2, va1, vb1)?.0.is_zero()
        && reduce_to_cell(vb2, va1, vb1)?.0.is_zero();
    if !same_lattice {
        return Err(PatternError::InvalidBasis(format!(
            "va = {va2}, vb = {vb2} do not generate the lattice of va = {va1}, vb = {vb1}"
        )));
    }

    let mut converted = unit_cell(va2, vb2)?;
    for iy in 0..converted.y.len() {
        for ix in 0..converted.x.len() {
            if !converted.pixels[(iy, ix)].is_inside() {
                continue;
            }

            let point = LatticeVector::new(converted.x[ix], converted.y[iy]);
            let (reduced, _, _) = reduce_to_cell(point, va1, vb1)?;
            let value = cell
                .get(reduced)
                .filter(Pixel::is_inside)
                .ok_or(PatternError::UnresolvedLatticePoint {
                    x: point.x,
                    y: point.y,
                    ax: va1.x,
                    ay: va1.y,
                    bx: vb1.x,
                    by: vb1.y,
                })?;
            converted.pixels[(iy, ix)] = value;
        }
    }

    Ok(converted)
}

/// Re-express a cell in the reduced basis of its lattice.
///
/// Returns the converted cell and the reduced vectors.
pub fn minimal_cell(
    cell: &UnitCell,
    va: LatticeVector,
    vb: LatticeVector,
) -> Result<(UnitCell, LatticeVector, LatticeVector), PatternError> {
    let (va_r, vb_r) = reduce_basis(va, vb)?;
    debug!("minimal cell: va = {va} -> {va_r}, vb = {vb} -> {vb_r}");

    let converted = convert_cell(cell, va, vb, va_r, vb_r)?;
    Ok((converted, va_r, vb_r))
}
