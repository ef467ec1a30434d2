// Geometries module: integer vectors and the pixel-level geometry of lattice cells
// This module provides the primitives every lattice and pattern routine builds on

// ======================== MODULE DECLARATIONS ========================
pub mod geometry2d_bounding_box;
pub mod geometry2d_lines;
pub mod lattice_vector;


// ======================== INTEGER VECTORS ========================
pub use lattice_vector::LatticeVector; // struct - integer (dx, dy) pair in mirror units
// LatticeVector impl methods:
//   new(x: i64, y: i64) -> Self                              - creates vector
//   zero() -> Self                                           - origin
//   try_from_f64(components: [f64; 2]) -> Result<Self>       - fails on non-integer components
//   cross(&self, other) -> i64                               - signed parallelogram area
//   dot(&self, other) -> i64                                 - integer dot product
//   norm_squared(&self) -> i64 / norm(&self) -> f64          - lengths
//   scale(&self, factor: i64) -> Self                        - integer multiple
//   divide_exact(&self, n: usize) -> Result<Self>            - exact division, fails with PhaseDivisibility
//   to_vector2(&self) -> Vector2<f64>                        - float view

// ======================== CELL MEMBERSHIP ========================
pub use geometry2d_lines::{
    in_parallelogram,   // fn(point: Vector2<f64>, va, vb) -> bool - half-open parallelogram test
    line_y,             // fn(x: f64, p1, p2) -> f64 - y of the line through p1, p2
    round_to_precision, // fn(value: f64, digits: i32) -> f64 - decimal rounding
};

// ======================== BOUNDING BOXES ========================
pub use geometry2d_bounding_box::IntBoundingBox; // struct - inclusive integer box
// IntBoundingBox impl methods:
//   new(min, max) -> Self                                    - creates box from corners
//   from_points(points) -> Option<Self>                      - box containing all points
//   of_parallelogram(va, vb) -> Self                         - box of 0, va, vb, va + vb
//   width(&self) / height(&self) -> usize                    - pixel counts
//   contains(&self, point) -> bool                           - inclusive membership
//   x_range(&self) / y_range(&self) -> RangeInclusive<i64>   - coordinate ranges
