// Line and parallelogram membership tests used to carve unit cells out of the pixel grid.
//
// A pixel belongs to the cell spanned by 0, va, vb, va + vb when its center does. Pixels whose
// center sits exactly on an edge are inside for the edges through the origin and outside for the
// two far edges, so adjacent cells never claim the same pixel.

use nalgebra::Vector2;

use crate::config::CELL_MEMBERSHIP_PRECISION;
use crate::geometries::lattice_vector::LatticeVector;

/// y-coordinate at `x` of the (non-vertical) line through `p1` and `p2`
pub fn line_y(x: f64, p1: Vector2<f64>, p2: Vector2<f64>) -> f64 {
    ((p2.y - p1.y) * x + p1.y * p2.x - p1.x * p2.y) / (p2.x - p1.x)
}

/// Round to a fixed number of decimal places
pub fn round_to_precision(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (value * scale).round() / scale
}

/// Side test against the pair of parallel edges 0 -> `edge` and `offset` -> `offset + edge`.
fn between_edge_pair(point: Vector2<f64>, edge: LatticeVector, offset: LatticeVector) -> bool {
    let p = CELL_MEMBERSHIP_PRECISION;

    let (above_near, on_near, above_far, on_far) = if edge.x != 0 {
        let y = round_to_precision(point.y, p);
        let near = round_to_precision(
            line_y(point.x, Vector2::zeros(), edge.to_vector2()),
            p,
        );
        let far = round_to_precision(
            line_y(point.x, offset.to_vector2(), (offset + edge).to_vector2()),
            p,
        );
        (near > y, near == y, far > y, far == y)
    } else {
        // vertical edge, offset.x cannot vanish for a valid basis
        let x = round_to_precision(point.x, p);
        let far_x = offset.x as f64;
        (x > 0.0, x == 0.0, x > far_x, x == far_x)
    };

    (above_near != above_far || on_near) && !on_far
}

/// Whether `point` lies in the half-open parallelogram spanned by `va` and `vb`.
pub fn in_parallelogram(point: Vector2<f64>, va: LatticeVector, vb: LatticeVector) -> bool {
    between_edge_pair(point, va, vb) && between_edge_pair(point, vb, va)
}
