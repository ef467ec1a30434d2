use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::PatternError;

/// Integer 2D vector in mirror (pixel) units.
///
/// Serialized as a two element array `[x, y]` so pattern records stay flat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[i64; 2]", into = "[i64; 2]")]
pub struct LatticeVector {
    pub x: i64,
    pub y: i64,
}

impl LatticeVector {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    pub const fn zero() -> Self {
        Self { x: 0, y: 0 }
    }

    /// Convert floating point components, failing if either is not an integer.
    pub fn try_from_f64(components: [f64; 2]) -> Result<Self, PatternError> {
        let [x, y] = components;
        if x.fract() != 0.0 || y.fract() != 0.0 || !x.is_finite() || !y.is_finite() {
            return Err(PatternError::InvalidBasis(format!(
                "components ({x}, {y}) cannot be interpreted as integers"
            )));
        }
        Ok(Self::new(x as i64, y as i64))
    }

    /// z-component of the cross product, i.e. the signed parallelogram area
    pub fn cross(&self, other: &LatticeVector) -> i64 {
        self.x * other.y - self.y * other.x
    }

    pub fn dot(&self, other: &LatticeVector) -> i64 {
        self.x * other.x + self.y * other.y
    }

    pub fn norm_squared(&self) -> i64 {
        self.dot(self)
    }

    pub fn norm(&self) -> f64 {
        (self.norm_squared() as f64).sqrt()
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0 && self.y == 0
    }

    pub fn scale(&self, factor: i64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Divide both components by `n`, requiring the division to be exact.
    pub fn divide_exact(&self, n: usize) -> Result<Self, PatternError> {
        let divisor = n as i64;
        if divisor == 0 || self.x % divisor != 0 || self.y % divisor != 0 {
            return Err(PatternError::PhaseDivisibility {
                x: self.x,
                y: self.y,
                nphases: n,
            });
        }
        Ok(Self::new(self.x / divisor, self.y / divisor))
    }

    pub fn to_vector2(&self) -> Vector2<f64> {
        Vector2::new(self.x as f64, self.y as f64)
    }
}

impl From<[i64; 2]> for LatticeVector {
    fn from(v: [i64; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

impl From<LatticeVector> for [i64; 2] {
    fn from(v: LatticeVector) -> Self {
        [v.x, v.y]
    }
}

impl Add for LatticeVector {
    type Output = LatticeVector;

    fn add(self, rhs: LatticeVector) -> LatticeVector {
        LatticeVector::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for LatticeVector {
    type Output = LatticeVector;

    fn sub(self, rhs: LatticeVector) -> LatticeVector {
        LatticeVector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for LatticeVector {
    type Output = LatticeVector;

    fn neg(self) -> LatticeVector {
        LatticeVector::new(-self.x, -self.y)
    }
}

impl Mul<i64> for LatticeVector {
    type Output = LatticeVector;

    fn mul(self, rhs: i64) -> LatticeVector {
        self.scale(rhs)
    }
}

impl fmt::Display for LatticeVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
