// Fourier components of lattice patterns
//
// A pattern tiled from a unit cell has Fourier weight only at the reciprocal lattice points
// f = n * ra + m * rb, and the component there is a sum over the cell alone:
//     P(f) = sum_{r in cell} P(r) exp(-2 pi i f . r)

use std::f64::consts::PI;

use log::debug;
use nalgebra::{DMatrix, Vector2};
use num_complex::Complex64;

use crate::config::MAX_DMD_FREQUENCY;
use crate::error::PatternError;
use crate::geometries::LatticeVector;
use crate::interfaces::{FrequencyUnits, OriginMode};
use crate::lattice::{reciprocal_vectors, UnitCell};

/// Fourier components on the grid of reciprocal lattice points `(n, m) in [-nmax, nmax]^2`.
///
/// `values[(i, j)]` is the component at `n = i - nmax`, `m = j - nmax`, whose frequency is
/// `(fx[(i, j)], fy[(i, j)])`.
#[derive(Debug, Clone, PartialEq)]
pub struct FourierGrid {
    pub values: DMatrix<Complex64>,
    pub fx: DMatrix<f64>,
    pub fy: DMatrix<f64>,
    pub nmax: usize,
}

impl FourierGrid {
    /// Side length of the grid
    pub fn size(&self) -> usize {
        2 * self.nmax + 1
    }

    /// Coefficient index of grid row or column `i`
    pub fn index_to_coefficient(&self, i: usize) -> i64 {
        i as i64 - self.nmax as i64
    }

    /// Grid index of coefficient `n`, `None` if outside `[-nmax, nmax]`
    pub fn coefficient_to_index(&self, n: i64) -> Option<usize> {
        let i = n + self.nmax as i64;
        (i >= 0 && (i as usize) < self.size()).then_some(i as usize)
    }

    pub fn frequency(&self, i: usize, j: usize) -> Vector2<f64> {
        Vector2::new(self.fx[(i, j)], self.fy[(i, j)])
    }

    /// Component at `n * ra + m * rb`, `None` outside the grid
    pub fn component(&self, n: i64, m: i64) -> Option<Complex64> {
        let i = self.coefficient_to_index(n)?;
        let j = self.coefficient_to_index(m)?;
        Some(self.values[(i, j)])
    }
}

/// Sum of `exp(-2 pi i f . r)` over the on pixels of a cell
pub(crate) fn cell_transform(cell: &UnitCell, frequency: &Vector2<f64>) -> Complex64 {
    cell.inside_pixels()
        .filter(|(_, pixel)| pixel.is_on())
        .map(|(r, _)| Complex64::from_polar(1.0, -2.0 * PI * frequency.dot(&r.to_vector2())))
        .sum()
}

/// Compute the Fourier component of a SIM pattern at `f = n * ra + m * rb`.
///
/// The phase is referenced to the requested origin: `Corner` is `pattern[(0, 0)]`, `Fft` is the
/// zero-frequency position of an unshifted FFT, `(nx / 2, ny / 2)`, and needs the canvas size.
/// The phase also accounts for the shift of phase `phase_index` by `vb / nphases * phase_index`.
#[allow(clippy::too_many_arguments)]
pub fn pattern_fourier_component(
    cell: &UnitCell,
    va: LatticeVector,
    vb: LatticeVector,
    n: i64,
    m: i64,
    nphases: usize,
    phase_index: usize,
    origin: OriginMode,
    canvas: Option<(usize, usize)>,
) -> Result<(Complex64, Vector2<f64>), PatternError> {
    if nphases == 0 {
        return Err(PatternError::ValueOutOfRange(0.0));
    }
    let reciprocal = reciprocal_vectors(va, vb, FrequencyUnits::Frequency)?;
    let frequency = reciprocal.frequency(n, m);

    let component = cell_transform(cell, &frequency);

    let start = vb.to_vector2() / nphases as f64 * phase_index as f64;
    let mut phase = component.arg() - 2.0 * PI * start.dot(&frequency);

    if origin == OriginMode::Fft {
        let (nx, ny) = canvas.ok_or(PatternError::MissingCanvasSize)?;
        let center = Vector2::new((nx / 2) as f64, (ny / 2) as f64);
        phase += 2.0 * PI * center.dot(&frequency);
    }

    Ok((Complex64::from_polar(component.norm(), phase), frequency))
}

/// Compute the electric field Fourier components on the grid `(n, m) in [-nmax, nmax]^2`.
///
/// Frequencies with `|fx|` or `|fy|` above 0.5 1/mirrors are set to zero. Only `n >= 0` is
/// computed directly, the rest follows from `E(-f) = E(f)*`. The optional `otf` weights each
/// component by its frequency, and the result is normalised by the cell area.
#[allow(clippy::too_many_arguments)]
pub fn efield_fourier_components(
    cell: &UnitCell,
    va: LatticeVector,
    vb: LatticeVector,
    nphases: usize,
    phase_index: usize,
    canvas: Option<(usize, usize)>,
    nmax: usize,
    origin: OriginMode,
    otf: Option<&dyn Fn(f64, f64) -> f64>,
) -> Result<FourierGrid, PatternError> {
    let reciprocal = reciprocal_vectors(va, vb, FrequencyUnits::Frequency)?;
    let size = 2 * nmax + 1;
    let offset = nmax as i64;

    let mut values = DMatrix::from_element(size, size, Complex64::new(0.0, 0.0));
    let mut fx = DMatrix::zeros(size, size);
    let mut fy = DMatrix::zeros(size, size);

    for i in nmax..size {
        for j in 0..size {
            let n = i as i64 - offset;
            let m = j as i64 - offset;
            let frequency = reciprocal.frequency(n, m);
            fx[(i, j)] = frequency.x;
            fy[(i, j)] = frequency.y;

            // beyond this the pixel grid aliases
            if frequency.x.abs() > MAX_DMD_FREQUENCY || frequency.y.abs() > MAX_DMD_FREQUENCY {
                continue;
            }

            let (component, _) = pattern_fourier_component(
                cell, va, vb, n, m, nphases, phase_index, origin, canvas,
            )?;
            values[(i, j)] = component;
        }
    }

    // E(-f) = E(f)*
    for i in 0..nmax {
        for j in 0..size {
            let (ii, jj) = (size - 1 - i, size - 1 - j);
            values[(i, j)] = values[(ii, jj)].conj();
            fx[(i, j)] = -fx[(ii, jj)];
            fy[(i, j)] = -fy[(ii, jj)];
        }
    }

    if let Some(otf) = otf {
        for i in 0..size {
            for j in 0..size {
                values[(i, j)] *= otf(fx[(i, j)], fy[(i, j)]);
            }
        }
    }

    let area = cell.area() as f64;
    values.apply(|v| *v /= area);

    Ok(FourierGrid {
        values,
        fx,
        fy,
        nmax,
    })
}

/// Autocorrelation `I(s) = sum_k E(k) E*(k - s)` of a grid with the zero shift at its center.
///
/// Both dimensions must be odd, so that `f -> -f` maps the grid onto itself.
pub fn autocorrelate(values: &DMatrix<Complex64>) -> Result<DMatrix<Complex64>, PatternError> {
    let (rows, cols) = values.shape();
    if rows % 2 == 0 || cols % 2 == 0 {
        return Err(PatternError::InvalidGridSize { rows, cols });
    }

    let (cr, cc) = ((rows / 2) as i64, (cols / 2) as i64);
    let mut result = DMatrix::from_element(rows, cols, Complex64::new(0.0, 0.0));

    for si in 0..rows {
        for sj in 0..cols {
            let di = si as i64 - cr;
            let dj = sj as i64 - cc;

            let mut acc = Complex64::new(0.0, 0.0);
            for ki in 0..rows as i64 {
                let li = ki - di;
                if li < 0 || li >= rows as i64 {
                    continue;
                }
                for kj in 0..cols as i64 {
                    let lj = kj - dj;
                    if lj < 0 || lj >= cols as i64 {
                        continue;
                    }
                    acc += values[(ki as usize, kj as usize)]
                        * values[(li as usize, lj as usize)].conj();
                }
            }
            result[(si, sj)] = acc;
        }
    }

    Ok(result)
}

/// Band limited intensity Fourier components, returned as `(intensity, efield)`.
///
/// The field is limited to `|f| <= min(0.5, fmax)` and autocorrelated, giving the intensity
/// components at the same lattice frequencies; these are limited to `|f| <= min(1, 2 fmax)`.
#[allow(clippy::too_many_arguments)]
pub fn intensity_fourier_components(
    cell: &UnitCell,
    va: LatticeVector,
    vb: LatticeVector,
    fmax: f64,
    nphases: usize,
    phase_index: usize,
    canvas: Option<(usize, usize)>,
    nmax: usize,
    origin: OriginMode,
) -> Result<(FourierGrid, FourierGrid), PatternError> {
    let mut efield = efield_fourier_components(
        cell, va, vb, nphases, phase_index, canvas, nmax, origin, None,
    )?;

    let field_limit = fmax.min(MAX_DMD_FREQUENCY);
    let size = efield.size();
    for i in 0..size {
        for j in 0..size {
            if efield.frequency(i, j).norm() > field_limit {
                efield.values[(i, j)] = Complex64::new(0.0, 0.0);
            }
        }
    }

    let mut values = autocorrelate(&efield.values)?;

    let intensity_limit = (2.0 * fmax).min(2.0 * MAX_DMD_FREQUENCY);
    for i in 0..size {
        for j in 0..size {
            if efield.frequency(i, j).norm() > intensity_limit {
                values[(i, j)] = Complex64::new(0.0, 0.0);
            }
        }
    }
    debug!("computed {size}x{size} intensity components with fmax = {fmax}");

    let intensity = FourierGrid {
        values,
        fx: efield.fx.clone(),
        fy: efield.fy.clone(),
        nmax,
    };

    Ok((intensity, efield))
}
