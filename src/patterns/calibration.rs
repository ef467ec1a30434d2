// DMD calibration patterns: uniform fields, centred discs, checkerboards, line gratings, affine
// fit grids and lattice patches

use log::debug;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::config::{
    CORNER_BLOCK_SIZE, DEFAULT_AFFINE_CORNER_SIZE, DEFAULT_AFFINE_MARK_SEPARATION, DEFAULT_AFFINE_POINT_SPACING,
    VARIABLE_PERIOD_REPEATS,
};
use crate::error::PatternError;
use crate::geometries::LatticeVector;
use crate::lattice::Pattern;

use super::sim_pattern::sim_pattern;

/// Grid of `n_on` by `n_on` on squares with period `n_on + n_off` in both directions
pub fn checkerboard(nx: usize, ny: usize, n_on: usize, n_off: usize) -> Pattern {
    let n_cell = n_on + n_off;
    Pattern::from_fn(ny, nx, |iy, ix| n_cell > 0 && iy % n_cell < n_on && ix % n_cell < n_on)
}

/// Disc of radius `radius` about the canvas centre `((nx - 1) / 2, (ny - 1) / 2)`
pub fn circle_pattern(nx: usize, ny: usize, radius: f64) -> Pattern {
    let xc = (nx as f64 - 1.0) / 2.0;
    let yc = (ny as f64 - 1.0) / 2.0;
    Pattern::from_fn(ny, nx, |iy, ix| {
        let (dx, dy) = (ix as f64 - xc, iy as f64 - yc);
        (dx * dx + dy * dy).sqrt() <= radius
    })
}

/// Switch on the block `[x0, x0 + width) x [y0, y0 + height)`, clipped to the canvas
fn fill_block(pattern: &mut Pattern, x0: i64, y0: i64, width: usize, height: usize) {
    let (ny, nx) = pattern.shape();
    let xs = x0.max(0)..(x0 + width as i64).min(nx as i64);
    for y in y0.max(0)..(y0 + height as i64).min(ny as i64) {
        for x in xs.clone() {
            pattern[(y as usize, x as usize)] = true;
        }
    }
}

/// Square blocks of `corner_size` mirrors on in the top left, top right and bottom left corners
pub fn three_corners_pattern(nx: usize, ny: usize, corner_size: usize) -> Pattern {
    let mut pattern = Pattern::from_element(ny, nx, false);
    let size = corner_size as i64;
    fill_block(&mut pattern, 0, 0, corner_size, corner_size);
    fill_block(&mut pattern, nx as i64 - size, 0, corner_size, corner_size);
    fill_block(&mut pattern, 0, ny as i64 - size, corner_size, corner_size);
    pattern
}

/// Line gratings stepping through `periods`, `repeats` lines each, arranged as a 2 x 2 block.
///
/// The gratings stacked along y form a square of side `repeats * sum(periods)`, each period with
/// `ceil(p / 2)` rows on. The diagonal quadrants hold this square and the off diagonal ones its
/// rotation by 90 degrees; the block is tiled over the canvas. Zero periods are skipped.
pub fn variable_period_pattern(nx: usize, ny: usize, periods: &[usize], repeats: usize) -> Pattern {
    let rows: Vec<bool> = periods
        .iter()
        .filter(|&&p| p > 0)
        .flat_map(|&p| (0..p * repeats).map(move |r| r % p < p.div_ceil(2)))
        .collect();

    let side = rows.len();
    if side == 0 {
        return Pattern::from_element(ny, nx, false);
    }

    Pattern::from_fn(ny, nx, |iy, ix| {
        let (y, x) = (iy % (2 * side), ix % (2 * side));
        if y / side == x / side {
            rows[y % side]
        } else {
            rows[x % side]
        }
    })
}

/// Layout of the affine calibration grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AffineFitOptions {
    /// Distance between neighbouring spots, in mirrors
    pub point_spacing: usize,
    /// Edge of the corner and orientation blocks
    pub corner_size: usize,
    /// Offset of the orientation blocks from the canvas centre
    pub mark_separation: usize,
}

impl Default for AffineFitOptions {
    fn default() -> Self {
        Self {
            point_spacing: DEFAULT_AFFINE_POINT_SPACING,
            corner_size: DEFAULT_AFFINE_CORNER_SIZE,
            mark_separation: DEFAULT_AFFINE_MARK_SEPARATION,
        }
    }
}

/// Spot grids for fitting the affine map between DMD and camera, one pattern per radius
#[derive(Debug, Clone, PartialEq)]
pub struct AffineFitPatterns {
    pub patterns: Vec<Pattern>,
    pub radii: Vec<f64>,
    /// Spot centres `(x, y)` in mirrors, row by row
    pub centers: Vec<Vector2<f64>>,
}

/// Sparse grids of round spots with orientation marks.
///
/// Spots of radius `r` (strictly inside) sit at `c + k * point_spacing` in x and y with
/// `c = (point_spacing - 1) / 2`. All four corners carry a block, the first row and column are on,
/// and four blocks near the centre break the mirror symmetries. Marks are clipped to the canvas.
pub fn affine_fit_patterns(
    nx: usize,
    ny: usize,
    radii: &[f64],
    options: &AffineFitOptions,
) -> Result<AffineFitPatterns, PatternError> {
    let spacing = options.point_spacing;
    if spacing == 0 {
        return Err(PatternError::ValueOutOfRange(0.0));
    }
    let c = (spacing as f64 - 1.0) / 2.0;

    let grid_coordinates = |n: usize| -> Vec<f64> {
        (0..)
            .map(|k| c + (k * spacing) as f64)
            .take_while(|&v| v < n as f64)
            .collect()
    };
    let xs = grid_coordinates(nx);
    let centers: Vec<Vector2<f64>> = grid_coordinates(ny)
        .into_iter()
        .flat_map(|y| xs.iter().map(move |&x| Vector2::new(x, y)))
        .collect();

    let cs = options.corner_size;
    let (size, half, sep) = (cs as i64, (cs / 2) as i64, options.mark_separation as i64);
    let (cx, cy) = ((nx / 2) as i64, (ny / 2) as i64);

    let patterns = radii
        .iter()
        .map(|&r| {
            let mut pattern = Pattern::from_fn(ny, nx, |iy, ix| {
                ((ix % spacing) as f64 - c).hypot((iy % spacing) as f64 - c) < r
            });

            fill_block(&mut pattern, 0, 0, cs, cs);
            fill_block(&mut pattern, nx as i64 - size, 0, cs, cs);
            fill_block(&mut pattern, 0, ny as i64 - size, cs, cs);
            fill_block(&mut pattern, nx as i64 - size, ny as i64 - size, cs, cs);

            fill_block(&mut pattern, 0, 0, nx, 1);
            fill_block(&mut pattern, 0, 0, 1, ny);

            fill_block(&mut pattern, cx - sep, cy - half, cs, cs);
            fill_block(&mut pattern, cx - 2 * sep, cy - half, cs, cs);
            fill_block(&mut pattern, cx - half, cy - sep, cs, cs);
            fill_block(&mut pattern, cx - half, cy - half, cs, cs);
            pattern
        })
        .collect();

    debug!("affine fit grid of {} spots for {} radii", centers.len(), radii.len());
    Ok(AffineFitPatterns {
        patterns,
        radii: radii.to_vec(),
        centers,
    })
}

/// Checkerboard periods of the standard calibration series
fn checkerboard_periods() -> impl Iterator<Item = usize> {
    (2..12).chain((12..30).step_by(2)).chain((30..200).step_by(10))
}

/// Standard calibration series, each pattern with a descriptive name.
///
/// All on, all off, on and off discs for each radius, checkerboards with `ceil(p / 2)` on
/// mirrors for a range of periods `p`, a variable period grating and the three corners pattern.
pub fn calibration_patterns(nx: usize, ny: usize, circle_radii: &[usize]) -> Vec<(String, Pattern)> {
    let mut patterns = vec![
        ("on".to_string(), Pattern::from_element(ny, nx, true)),
        ("off".to_string(), Pattern::from_element(ny, nx, false)),
    ];

    for &r in circle_radii {
        let disc = circle_pattern(nx, ny, r as f64);
        patterns.push((format!("circle_off_r={r}"), disc.map(|on| !on)));
        patterns.push((format!("circle_on_r={r}"), disc));
    }

    for p in checkerboard_periods() {
        let n_on = p.div_ceil(2);
        patterns.push((format!("checkerboard_period={p}"), checkerboard(nx, ny, n_on, p - n_on)));
    }

    let grating_periods: Vec<usize> = (2..20).step_by(2).collect();
    patterns.push((
        format!("variable_pattern_periods={}_to_{}", grating_periods[0], grating_periods[grating_periods.len() - 1]),
        variable_period_pattern(nx, ny, &grating_periods, VARIABLE_PERIOD_REPEATS),
    ));
    patterns.push((
        format!("three_corners_{CORNER_BLOCK_SIZE}"),
        three_corners_pattern(nx, ny, CORNER_BLOCK_SIZE),
    ));

    debug!("{} calibration patterns on a {nx} x {ny} canvas", patterns.len());
    patterns
}

/// Patches of lattice pattern for mapping DMD surface aberrations.
///
/// Each centre gets a disc of radius `radius` cut from phase `phase_indices[i]` of the SIM pattern
/// `(va, vb)`. A single phase index applies to every centre. Patches are clipped to the canvas.
#[allow(clippy::too_many_arguments)]
pub fn aberration_map_pattern(
    nx: usize,
    ny: usize,
    va: LatticeVector,
    vb: LatticeVector,
    nphases: usize,
    centers: &[LatticeVector],
    radius: usize,
    phase_indices: &[usize],
) -> Result<Pattern, PatternError> {
    let phase_indices: Vec<usize> = match phase_indices {
        [single] => vec![*single; centers.len()],
        many if many.len() == centers.len() => many.to_vec(),
        many => {
            return Err(PatternError::LengthMismatch {
                what: "phase indices",
                expected: centers.len(),
                found: many.len(),
            })
        }
    };
    if let Some(&index) = phase_indices.iter().find(|&&i| i >= nphases) {
        return Err(PatternError::InvalidPhaseIndex { index, nphases });
    }

    let size = 2 * radius + 1;
    let disc = circle_pattern(size, size, radius as f64);
    let patches: Vec<Pattern> = (0..nphases)
        .map(|ii| {
            let (patch, _) = sim_pattern(size, size, va, vb, nphases, ii)?;
            Ok(patch.zip_map(&disc, |p, d| p && d))
        })
        .collect::<Result<_, PatternError>>()?;

    let mut pattern = Pattern::from_element(ny, nx, false);
    let r = radius as i64;
    for (center, &phase_index) in centers.iter().zip(&phase_indices) {
        let patch = &patches[phase_index];
        for py in 0..size {
            let y = center.y - r + py as i64;
            if y < 0 || y >= ny as i64 {
                continue;
            }
            for px in 0..size {
                let x = center.x - r + px as i64;
                if x < 0 || x >= nx as i64 {
                    continue;
                }
                pattern[(y as usize, x as usize)] = patch[(py, px)];
            }
        }
    }
    Ok(pattern)
}
