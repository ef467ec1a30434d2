// Constants

// Tolerances
pub const CELL_MEMBERSHIP_PRECISION: i32 = 12; // Decimal digits kept before comparing against cell edges
pub const PERFECT_PHASE_TOLERANCE: f64 = 1e-7; // Residual allowed for P = dxb cos(t) + dyb sin(t) roots

// Tiling
pub const TILING_ITERATION_THRESHOLD: usize = 1000; // Above this many cell pastes the cell is doubled first

// Fourier analysis
pub const MAX_DMD_FREQUENCY: f64 = 0.5; // 1/mirrors, beyond this the DFT repeats itself
pub const MINIMUM_RELATIVE_PEAK_SIZE: f64 = 1e-3; // Leakage peaks below this fraction of DC are ignored

// Pattern search defaults
pub const DEFAULT_DMD_PITCH: f64 = 7560.0; // nm
pub const DEFAULT_VECTOR_MAX_SIZE: i64 = 40; // mirrors
pub const DEFAULT_ANGLE_TOLERANCE: f64 = std::f64::consts::PI / 180.0;
pub const DEFAULT_PERIOD_TOLERANCE_RELATIVE: f64 = 0.1;
pub const DEFAULT_ANGLE_SEPARATION_TOLERANCE: f64 = 5.0 * std::f64::consts::PI / 180.0;
pub const DEFAULT_MAX_SOLUTIONS_TO_SEARCH: usize = 20;

// Calibration patterns
pub const CORNER_BLOCK_SIZE: usize = 300; // mirrors, edge of the three corners pattern blocks
pub const VARIABLE_PERIOD_REPEATS: usize = 4; // Line pairs per period in the variable period pattern
pub const DEFAULT_AFFINE_POINT_SPACING: usize = 61; // mirrors
pub const DEFAULT_AFFINE_CORNER_SIZE: usize = 4; // mirrors
pub const DEFAULT_AFFINE_MARK_SEPARATION: usize = 15; // mirrors, orientation marks from the centre

// OTF test set defaults
pub const DEFAULT_OTF_MIN_PERIOD: f64 = 4.5; // mirrors
pub const DEFAULT_OTF_MAX_PERIOD: f64 = 50.0; // mirrors
pub const DEFAULT_OTF_NPERIODS: usize = 20;
pub const DEFAULT_OTF_NANGLES: usize = 12;
