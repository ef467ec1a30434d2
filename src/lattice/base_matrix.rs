use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::PatternError;
use crate::geometries::LatticeVector;
use crate::interfaces::FrequencyUnits;

/// Pair of linearly independent integer lattice vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatticeBasis {
    va: LatticeVector,
    vb: LatticeVector,
}

/// Dual basis of a lattice, `dot(va, ra) = dot(vb, rb) = 1` and `dot(va, rb) = dot(vb, ra) = 0`
/// in frequency units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReciprocalVectors {
    pub ra: Vector2<f64>,
    pub rb: Vector2<f64>,
}

impl LatticeBasis {
    pub fn new(va: LatticeVector, vb: LatticeVector) -> Result<Self, PatternError> {
        // Linearly non-dependent (also catches zero vectors)
        if va.cross(&vb) == 0 {
            return Err(PatternError::InvalidBasis(format!(
                "va = {va} and vb = {vb} are linearly dependent"
            )));
        }

        Ok(LatticeBasis { va, vb })
    }

    pub fn va(&self) -> LatticeVector {
        self.va
    }

    pub fn vb(&self) -> LatticeVector {
        self.vb
    }

    /// Signed determinant of the matrix with rows va, vb
    pub fn determinant(&self) -> i64 {
        self.va.cross(&self.vb)
    }

    /// Number of pixels in a unit cell
    pub fn area(&self) -> usize {
        self.determinant().unsigned_abs() as usize
    }

    /// Matrix with the lattice vectors as columns
    pub fn matrix(&self) -> Matrix2<f64> {
        Matrix2::new(
            self.va.x as f64,
            self.vb.x as f64,
            self.va.y as f64,
            self.vb.y as f64,
        )
    }

    /// Coefficients (n, m) with point = n * va + m * vb
    pub fn fractional_coordinates(&self, point: Vector2<f64>) -> Vector2<f64> {
        let reciprocal = self.reciprocal();
        Vector2::new(point.dot(&reciprocal.ra), point.dot(&reciprocal.rb))
    }

    /// Reciprocal vectors in frequency units. Cannot fail, as the basis is non-degenerate.
    pub fn reciprocal(&self) -> ReciprocalVectors {
        let det = self.determinant() as f64;
        ReciprocalVectors {
            ra: Vector2::new(self.vb.y as f64 / det, -self.vb.x as f64 / det),
            rb: Vector2::new(-self.va.y as f64 / det, self.va.x as f64 / det),
        }
    }
}

impl ReciprocalVectors {
    /// Frequency n * ra + m * rb
    pub fn frequency(&self, n: i64, m: i64) -> Vector2<f64> {
        self.ra * n as f64 + self.rb * m as f64
    }

    /// Matrix with the reciprocal vectors as columns
    pub fn matrix(&self) -> Matrix2<f64> {
        Matrix2::from_columns(&[self.ra, self.rb])
    }
}

/// Compute the reciprocal vectors of `va`, `vb`.
///
/// Casting the duality relations as a matrix problem,
/// `[[ax, ay], [bx, by]] * [ra | rb] = I`, the reciprocal vectors are the columns of the inverse of
/// the matrix whose rows are the lattice vectors.
pub fn reciprocal_vectors(
    va: LatticeVector,
    vb: LatticeVector,
    units: FrequencyUnits,
) -> Result<ReciprocalVectors, PatternError> {
    let degenerate = || PatternError::DegenerateReciprocalBasis {
        ax: va.x,
        ay: va.y,
        bx: vb.x,
        by: vb.y,
    };

    // check directly, inversion of a nearly singular float matrix may still succeed
    if va.cross(&vb) == 0 {
        return Err(degenerate());
    }

    let rows = Matrix2::new(va.x as f64, va.y as f64, vb.x as f64, vb.y as f64);
    let inverse = rows.try_inverse().ok_or_else(degenerate)?;

    let scale = match units {
        FrequencyUnits::Frequency => 1.0,
        FrequencyUnits::AngularFrequency => 2.0 * PI,
    };

    Ok(ReciprocalVectors {
        ra: inverse.column(0).into_owned() * scale,
        rb: inverse.column(1).into_owned() * scale,
    })
}
