// Gray scale to binary mirror patterns

use nalgebra::DMatrix;
use rand::Rng;

use crate::error::PatternError;
use crate::interfaces::DitherMode;
use crate::lattice::Pattern;

/// Diffusion kernel entries as (row offset, column offset, weight), relative to the current pixel
const FLOYD_STEINBERG: [(usize, isize, f64); 4] = [
    (0, 1, 7.0 / 16.0),
    (1, -1, 3.0 / 16.0),
    (1, 0, 5.0 / 16.0),
    (1, 1, 1.0 / 16.0),
];

const JARVIS_JUDICE_NINKE: [(usize, isize, f64); 12] = [
    (0, 1, 7.0 / 48.0),
    (0, 2, 5.0 / 48.0),
    (1, -2, 3.0 / 48.0),
    (1, -1, 5.0 / 48.0),
    (1, 0, 7.0 / 48.0),
    (1, 1, 5.0 / 48.0),
    (1, 2, 3.0 / 48.0),
    (2, -2, 1.0 / 48.0),
    (2, -1, 3.0 / 48.0),
    (2, 0, 5.0 / 48.0),
    (2, 1, 3.0 / 48.0),
    (2, 2, 1.0 / 48.0),
];

fn round_pixel(value: f64) -> bool {
    value.round_ties_even() >= 1.0
}

/// Scan rows in order, rounding each pixel and pushing its error onto unvisited neighbours
fn error_diffusion(gray: &DMatrix<f64>, kernel: &[(usize, isize, f64)]) -> Pattern {
    let (ny, nx) = gray.shape();
    let mut residual = gray.clone();
    let mut binary = Pattern::from_element(ny, nx, false);

    for iy in 0..ny {
        for ix in 0..nx {
            let on = round_pixel(residual[(iy, ix)]);
            binary[(iy, ix)] = on;
            let err = residual[(iy, ix)] - if on { 1.0 } else { 0.0 };

            for &(dy, dx, weight) in kernel {
                let (ty, tx) = (iy + dy, ix as isize + dx);
                if ty < ny && tx >= 0 && (tx as usize) < nx {
                    residual[(ty, tx as usize)] += err * weight;
                }
            }
        }
    }
    binary
}

/// Binarize a gray scale pattern with values in `[0, 1]`, drawing random dither from `rng`.
pub fn binarize_with_rng<R: Rng>(
    gray: &DMatrix<f64>,
    mode: DitherMode,
    rng: &mut R,
) -> Result<Pattern, PatternError> {
    if let Some(&bad) = gray.iter().find(|&&v| !(0.0..=1.0).contains(&v)) {
        return Err(PatternError::ValueOutOfRange(bad));
    }

    let binary = match mode {
        DitherMode::FloydSteinberg => error_diffusion(gray, &FLOYD_STEINBERG),
        DitherMode::Jjn => error_diffusion(gray, &JARVIS_JUDICE_NINKE),
        DitherMode::Random => gray.map(|p| rng.gen_bool(p)),
        DitherMode::Round => gray.map(round_pixel),
    };
    Ok(binary)
}

/// Binarize a gray scale pattern with values in `[0, 1]`.
pub fn binarize(gray: &DMatrix<f64>, mode: DitherMode) -> Result<Pattern, PatternError> {
    binarize_with_rng(gray, mode, &mut rand::thread_rng())
}
