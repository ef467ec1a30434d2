// Lattice module: integer lattices on the mirror grid, their unit cells and tilings
// This module turns a pair of periodicity vectors into a binary pattern covering the DMD

// ======================== MODULE DECLARATIONS ========================
pub mod base_matrix;
pub mod basis_reduction;
pub mod tiling;
pub mod unit_cell;

mod _tests_tiling;
mod _tests_unit_cell;

// ======================== BASIS & RECIPROCAL VECTORS ========================
pub use base_matrix::{
    reciprocal_vectors, // fn(va, vb, units: FrequencyUnits) -> Result<ReciprocalVectors> - dual basis
    LatticeBasis,       // struct - validated pair of linearly independent lattice vectors
    ReciprocalVectors,  // struct - reciprocal vectors ra, rb
};
// LatticeBasis impl methods:
//   new(va, vb) -> Result<Self>                                  - fails with InvalidBasis on collinear vectors
//   determinant(&self) -> i64 / area(&self) -> usize            - signed and absolute cell area
//   matrix(&self) -> Matrix2<f64>                                - lattice vectors as columns
//   fractional_coordinates(&self, point) -> Vector2<f64>         - coefficients in the basis
//   reciprocal(&self) -> ReciprocalVectors                       - dual basis in frequency units
// ReciprocalVectors impl methods:
//   frequency(&self, n, m) -> Vector2<f64>                       - n * ra + m * rb
//   matrix(&self) -> Matrix2<f64>                                - reciprocal vectors as columns

// ======================== BASIS REDUCTION ========================
pub use basis_reduction::{
    closest_lattice_vector,    // fn(point: Vector2<f64>, va, vb) -> Result<ClosestLatticeVector> - nearest lattice point
    closest_reciprocal_vector, // fn(frequency: Vector2<f64>, va, vb) -> Result<ClosestLatticeVector> - nearest reciprocal point
    reduce_basis,              // fn(va, vb) -> Result<(LatticeVector, LatticeVector)> - Lagrange-Gauss reduction, shorter first
    reduce_reciprocal_basis,   // fn(va, vb) -> Result<ReciprocalVectors> - reciprocal vectors of the reduced basis
    reduce_to_cell,            // fn(point, va, vb) -> Result<(LatticeVector, i64, i64)> - reduced point and coefficients
    ClosestLatticeVector,      // struct - nearest vector with coefficients (na, nb)
};

// ======================== UNIT CELLS ========================
pub use unit_cell::{
    convert_cell,  // fn(cell, va1, vb1, va2, vb2) -> Result<UnitCell> - same lattice, new basis
    minimal_cell,  // fn(cell, va, vb) -> Result<(UnitCell, LatticeVector, LatticeVector)> - cell in reduced basis
    sim_unit_cell, // fn(va, vb, nphases) -> Result<UnitCell> - cell with the phase sub-cell on
    unit_cell,     // fn(va, vb) -> Result<UnitCell> - cell with every member pixel off
    Pixel,         // enum - Outside, Off, On
    UnitCell,      // struct - cell pixels with x, y coordinates
};
// UnitCell impl methods:
//   area(&self) / on_count(&self) -> usize                       - member and on pixel counts
//   get(&self, point) -> Option<Pixel>                           - pixel by coordinate
//   value(&self, ix, iy) -> Pixel                                - pixel by grid index
//   inside_pixels(&self) -> impl Iterator<(LatticeVector, Pixel)> - member pixels with coordinates

// ======================== TILING ========================
pub use tiling::{
    double_cell,   // fn(cell, va, vb, na, nb) -> Result<UnitCell> - cell of the lattice (2^na va, 2^nb vb)
    tile_pattern,  // fn(nx, ny, va, vb, start, cell, options) -> Result<Pattern> - cover the canvas
    Pattern,       // type - DMatrix<bool> of shape (ny, nx)
    TilingOptions, // struct - cell reduction and doubling threshold
};
