// Patterns module: SIM pattern generation, pattern set search and DMD calibration patterns
// This module builds on the lattice and fourier modules to produce the patterns actually shown on the DMD

// ======================== MODULE DECLARATIONS ========================
pub mod binarize;
pub mod calibration;
pub mod leakage;
pub mod otf_test_set;
pub mod pattern_export;
pub mod pattern_search;
pub mod rational_approx;
pub mod sim_pattern;

mod _tests_calibration;
mod _tests_leakage;
mod _tests_pattern_search;

// ======================== SIM PATTERNS ========================
pub use sim_pattern::{
    sim_angle,     // fn(va, vb) -> Result<f64> - angle of rb in [0, 2 pi)
    sim_frequency, // fn(va, vb) -> Result<Vector2<f64>> - pattern frequency rb
    sim_pattern,   // fn(nx, ny, va, vb, nphases, phase_index) -> Result<(Pattern, UnitCell)> - phase shifted pattern
    sim_period,    // fn(va, vb) -> Result<f64> - line spacing in mirrors
    sim_phase,     // fn(va, vb, nphases, phase_index, canvas, origin) -> Result<f64> - phase of the rb component
};

// ======================== ANGLE APPROXIMATION ========================
pub use rational_approx::{
    allowed_angles,        // fn(period, nphases, nmax) -> Vec<AllowedAngle> - perfect phase shift angles
    allowed_periods,       // fn(angle, nphases, nmax) -> Vec<AllowedPeriod> - periods with vb on an axis
    min_angle_diff,        // fn(angle1, angle2, mode: AngleDiffMode) -> f64 - signed wrapped difference
    rational_approx_angle, // fn(angle, nmax) -> Result<RationalApproximation> - Stern-Brocot search
    AllowedAngle,          // struct - angle with its vb
    AllowedPeriod,         // struct - period with vb length and axis
    RationalApproximation, // struct - best vector and the improving sequence
};

// ======================== LEAKAGE ========================
pub use leakage::{
    find_nearest_leakage_peaks, // fn(vec_as, vec_bs, nphases, minimum_relative_peak_size, wavelength, pitch) -> Result<LeakagePeaks>
    LeakagePeaks,               // struct - overall, per pattern and source pattern of the nearest peak
};

// ======================== PATTERN SET SEARCH ========================
pub use pattern_search::{
    find_closest_multicolor_set, // fn(period, nangles, nphases, wavelengths, options) -> Result<MulticolorPatternSet>
    find_closest_pattern,        // fn(period, angle, nphases, avec_max_size, bvec_max_size) -> Result<ClosestPattern>
    ClosestPattern,              // struct - va, vb and realised period and angle
    MulticolorPatternSet,        // struct - vectors per wavelength and angle with the leakage distance
    MulticolorSearchOptions,     // struct - tolerances and bounds, serde configurable
};

// ======================== EXPORT ========================
pub use pattern_export::{
    all_pattern_sets, // fn(nx, ny, periods, nangles, nphases, wavelengths, invert, options, generate_patterns) -> Result<Vec<Vec<PatternSetData>>>
    pattern_set_data, // fn(nx, ny, vec_as, vec_bs, nphases, wavelength, invert, pitch, generate_patterns) -> Result<PatternSetData>
    PatternSetData,   // struct - patterns[angle][phase] and record
    PatternSetRecord, // struct - flat JSON record of the derived parameters
};
// PatternSetRecord impl methods:
//   nangles(&self) -> usize                                      - number of angles
//   file_name(&self) -> String                                   - conventional JSON file name
//   to_json(&self) -> serde_json::Result<String>                 - pretty printed record
//   from_json(json: &str) -> serde_json::Result<Self>            - read a record back

// ======================== BINARIZATION ========================
pub use binarize::{
    binarize,          // fn(gray, mode: DitherMode) -> Result<Pattern> - gray levels to mirror states
    binarize_with_rng, // fn(gray, mode, rng) -> Result<Pattern> - as binarize with a caller supplied rng
};

// ======================== CALIBRATION ========================
pub use calibration::{
    aberration_map_pattern,  // fn(nx, ny, va, vb, nphases, centers, radius, phase_indices) -> Result<Pattern> - lattice patches
    affine_fit_patterns,     // fn(nx, ny, radii, options) -> Result<AffineFitPatterns> - spot grids for affine registration
    calibration_patterns,    // fn(nx, ny, circle_radii) -> Vec<(String, Pattern)> - standard named series
    checkerboard,            // fn(nx, ny, n_on, n_off) -> Pattern - grid of on squares
    circle_pattern,          // fn(nx, ny, radius) -> Pattern - centred disc
    three_corners_pattern,   // fn(nx, ny, corner_size) -> Pattern - blocks in three corners
    variable_period_pattern, // fn(nx, ny, periods, repeats) -> Pattern - line gratings of increasing period
    AffineFitOptions,        // struct - spot spacing and mark sizes, serde configurable
    AffineFitPatterns,       // struct - one pattern per radius with the spot centres
};

// ======================== OTF TEST SET ========================
pub use otf_test_set::{
    otf_test_periods, // fn(min_period, max_period, nperiods) -> Vec<f64> - periods even in frequency
    otf_test_set,     // fn(nx, ny, options, generate_patterns) -> Result<OtfTestSet> - closest pattern per period and angle
    OtfTestOptions,   // struct - grid and search bounds, serde configurable
    OtfTestRecord,    // struct - realised vectors, periods, angles, frequencies and phases
    OtfTestSet,       // struct - patterns[period][angle] and record
};
// OtfTestRecord impl methods:
//   npatterns(&self) -> usize                                    - lattice patterns in the set
//   to_json(&self) -> serde_json::Result<String>                 - pretty printed record
