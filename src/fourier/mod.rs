// Fourier module: Fourier components of tiled lattice patterns
// This module evaluates the pattern spectrum on the reciprocal lattice, directly from the unit cell

// ======================== MODULE DECLARATIONS ========================
pub mod fourier_components;
pub mod lattice_dft;


// ======================== PATTERN FOURIER COMPONENTS ========================
pub use fourier_components::{
    autocorrelate,                // fn(values: &DMatrix<Complex64>) -> Result<DMatrix<Complex64>> - I(s) = sum_k E(k) E*(k - s)
    efield_fourier_components,    // fn(cell, va, vb, nphases, phase_index, canvas, nmax, origin, otf) -> Result<FourierGrid>
    intensity_fourier_components, // fn(cell, va, vb, fmax, nphases, phase_index, canvas, nmax, origin) -> Result<(FourierGrid, FourierGrid)>
    pattern_fourier_component,    // fn(cell, va, vb, n, m, nphases, phase_index, origin, canvas) -> Result<(Complex64, Vector2<f64>)>
    FourierGrid,                  // struct - components on (n, m) in [-nmax, nmax]^2
};
// FourierGrid impl methods:
//   size(&self) -> usize                                         - 2 * nmax + 1
//   frequency(&self, i, j) -> Vector2<f64>                       - frequency of grid entry
//   component(&self, n, m) -> Option<Complex64>                  - component by coefficients
//   index_to_coefficient / coefficient_to_index                  - grid index conversions

// ======================== LATTICE DFT ========================
pub use lattice_dft::{
    inverse_lattice_dft,     // fn(components, point) -> f64 - pattern value from its lattice DFT
    lattice_dft,             // fn(cell, va, vb) -> Result<Vec<LatticeDftComponent>> - all distinct components
    lattice_dft_frequencies, // fn(va, vb) -> Result<Vec<LatticeFrequency>> - one frequency per class
    LatticeDftComponent,     // struct - frequency with its component
    LatticeFrequency,        // struct - (n, m) and n * ra + m * rb
};
