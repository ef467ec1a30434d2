// Lattice DFT: the complete set of Fourier components of a periodic pattern on the pixel grid
//
// Frequencies f = n * ra + m * rb that differ by an integer vector give identical components on
// integer pixels. An integer vector g has coefficients (g . va, g . vb), so the distinct classes are
// the coefficient pairs (n, m) in a unit cell of the lattice spanned by (va.x, vb.x), (va.y, vb.y).
// There are |det| of them, as many as pixels in the cell, and the transform is invertible.

use std::f64::consts::PI;

use nalgebra::Vector2;
use num_complex::Complex64;

use crate::error::PatternError;
use crate::fourier::fourier_components::cell_transform;
use crate::geometries::LatticeVector;
use crate::interfaces::FrequencyUnits;
use crate::lattice::{reciprocal_vectors, unit_cell, UnitCell};

/// One frequency of the lattice DFT, `frequency = n * ra + m * rb`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeFrequency {
    pub n: i64,
    pub m: i64,
    pub frequency: Vector2<f64>,
}

/// Lattice DFT component at one frequency
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeDftComponent {
    pub frequency: LatticeFrequency,
    pub value: Complex64,
}

/// Representatives of the distinct Fourier frequencies of patterns with lattice vectors `va`, `vb`.
pub fn lattice_dft_frequencies(
    va: LatticeVector,
    vb: LatticeVector,
) -> Result<Vec<LatticeFrequency>, PatternError> {
    let reciprocal = reciprocal_vectors(va, vb, FrequencyUnits::Frequency)?;

    // coefficient lattice of the integer grid
    let ga = LatticeVector::new(va.x, vb.x);
    let gb = LatticeVector::new(va.y, vb.y);
    let coefficient_cell = unit_cell(ga, gb)?;

    Ok(coefficient_cell
        .inside_pixels()
        .map(|(c, _)| LatticeFrequency {
            n: c.x,
            m: c.y,
            frequency: reciprocal.frequency(c.x, c.y),
        })
        .collect())
}

/// Lattice DFT of a unit cell, `LDFT(f) = sum_{r in cell} P(r) exp(-2 pi i f . r)`.
pub fn lattice_dft(
    cell: &UnitCell,
    va: LatticeVector,
    vb: LatticeVector,
) -> Result<Vec<LatticeDftComponent>, PatternError> {
    let frequencies = lattice_dft_frequencies(va, vb)?;
    Ok(frequencies
        .into_iter()
        .map(|frequency| LatticeDftComponent {
            value: cell_transform(cell, &frequency.frequency),
            frequency,
        })
        .collect())
}

/// Evaluate the pattern at `point` from its lattice DFT.
pub fn inverse_lattice_dft(components: &[LatticeDftComponent], point: LatticeVector) -> f64 {
    if components.is_empty() {
        return 0.0;
    }

    let r = point.to_vector2();
    let sum: Complex64 = components
        .iter()
        .map(|c| c.value * Complex64::from_polar(1.0, 2.0 * PI * c.frequency.frequency.dot(&r)))
        .sum();
    sum.re / components.len() as f64
}
