use thiserror::Error;

/// Errors raised by lattice construction, tiling, Fourier analysis and pattern search.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PatternError {
    #[error("invalid lattice basis: {0}")]
    InvalidBasis(String),

    #[error("vec_b = ({x}, {y}) is not divisible by nphases = {nphases}")]
    PhaseDivisibility { x: i64, y: i64, nphases: usize },

    #[error("phase cell has {found} 'on' pixels, expected {expected}")]
    PhaseCellMismatch { found: usize, expected: usize },

    #[error("lattice vectors ({ax}, {ay}) and ({bx}, {by}) are linearly dependent, reciprocal vectors are undefined")]
    DegenerateReciprocalBasis { ax: i64, ay: i64, bx: i64, by: i64 },

    #[error("point ({x}, {y}) could not be reduced into the unit cell of va = ({ax}, {ay}), vb = ({bx}, {by})")]
    UnresolvedLatticePoint {
        x: i64,
        y: i64,
        ax: i64,
        ay: i64,
        bx: i64,
        by: i64,
    },

    #[error("invalid {kind} '{value}', expected one of: {expected}")]
    InvalidMode {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("canvas size is required when the origin mode is 'fft'")]
    MissingCanvasSize,

    #[error("value {0} is outside the allowed range")]
    ValueOutOfRange(f64),

    #[error("grid of shape {rows}x{cols} must have odd dimensions with zero frequency at the center")]
    InvalidGridSize { rows: usize, cols: usize },

    #[error("pixel ({x}, {y}) was not covered while tiling the pattern")]
    IncompleteTiling { x: usize, y: usize },

    #[error("no rational approximation with denominator below {nmax}")]
    SearchBoundTooSmall { nmax: i64 },

    #[error("no pattern set satisfies the requested tolerances: {0}")]
    NoPatternSetFound(String),

    #[error("expected {expected} {what}, found {found}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("phase index {index} is out of range for {nphases} phases")]
    InvalidPhaseIndex { index: usize, nphases: usize },
}
