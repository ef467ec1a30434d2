// Integer bounding box module: pixel extents of cells and canvases
// Bounds are inclusive on both ends, so a box holding a single pixel has width 1.

use std::ops::RangeInclusive;

use crate::geometries::lattice_vector::LatticeVector;

/// Integer axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntBoundingBox {
    /// Minimum corner
    pub min: LatticeVector,
    /// Maximum corner (inclusive)
    pub max: LatticeVector,
}

impl IntBoundingBox {
    /// Create a new bounding box from minimum and maximum corners
    ///
    /// # Panics
    /// Panics in debug mode if min coordinates are greater than max coordinates
    pub fn new(min: LatticeVector, max: LatticeVector) -> Self {
        debug_assert!(
            min.x <= max.x && min.y <= max.y,
            "Minimum coordinates must be less than or equal to maximum coordinates"
        );
        Self { min, max }
    }

    /// Smallest box containing all points, `None` for an empty iterator
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = LatticeVector>,
    {
        let mut points_iter = points.into_iter();
        let first_point = points_iter.next()?;

        let mut min = first_point;
        let mut max = first_point;

        for point in points_iter {
            min.x = min.x.min(point.x);
            min.y = min.y.min(point.y);
            max.x = max.x.max(point.x);
            max.y = max.y.max(point.y);
        }

        Some(Self { min, max })
    }

    /// Box around the parallelogram 0, `va`, `vb`, `va + vb`
    pub fn of_parallelogram(va: LatticeVector, vb: LatticeVector) -> Self {
        Self::from_points([LatticeVector::zero(), va, vb, va + vb])
            .unwrap_or_else(|| Self::new(LatticeVector::zero(), LatticeVector::zero()))
    }

    /// Number of pixel columns
    pub fn width(&self) -> usize {
        (self.max.x - self.min.x + 1) as usize
    }

    /// Number of pixel rows
    pub fn height(&self) -> usize {
        (self.max.y - self.min.y + 1) as usize
    }

    pub fn contains(&self, point: LatticeVector) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    pub fn x_range(&self) -> RangeInclusive<i64> {
        self.min.x..=self.max.x
    }

    pub fn y_range(&self) -> RangeInclusive<i64> {
        self.min.y..=self.max.y
    }
}
