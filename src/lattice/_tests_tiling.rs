#[cfg(test)]
mod tests {
    use super::super::tiling::*;
    use super::super::unit_cell::{sim_unit_cell, unit_cell};
    use crate::error::PatternError;
    use crate::geometries::LatticeVector;
    use proptest::prelude::*;

    fn v(x: i64, y: i64) -> LatticeVector {
        LatticeVector::new(x, y)
    }

    fn no_doubling() -> TilingOptions {
        TilingOptions {
            reduce_basis: false,
            iteration_threshold: usize::MAX,
        }
    }

    /// Check `pattern(r + shift) == pattern(r)` wherever both are on the canvas
    fn is_periodic(pattern: &Pattern, shift: LatticeVector) -> bool {
        let (ny, nx) = pattern.shape();
        for iy in 0..ny as i64 {
            for ix in 0..nx as i64 {
                let (jx, jy) = (ix + shift.x, iy + shift.y);
                if jx < 0 || jy < 0 || jx >= nx as i64 || jy >= ny as i64 {
                    continue;
                }
                if pattern[(iy as usize, ix as usize)] != pattern[(jy as usize, jx as usize)] {
                    return false;
                }
            }
        }
        true
    }

    #[test]
    fn test_default_options() {
        let options = TilingOptions::default();
        assert!(options.reduce_basis);
        assert_eq!(options.iteration_threshold, 1000);

        let parsed: TilingOptions = serde_json::from_str(r#"{"reduce_basis": false}"#).unwrap();
        assert!(!parsed.reduce_basis);
        assert_eq!(parsed.iteration_threshold, 1000);
    }

    #[test]
    fn test_tile_horizontal_stripes() {
        let va = v(3, 0);
        let vb = v(0, 3);
        let cell = sim_unit_cell(va, vb, 3).unwrap();

        let pattern = tile_pattern(9, 6, va, vb, v(0, 0), &cell, &TilingOptions::default()).unwrap();
        assert_eq!(pattern.shape(), (6, 9));
        for iy in 0..6 {
            for ix in 0..9 {
                assert_eq!(pattern[(iy, ix)], iy % 3 == 0, "pixel ({ix}, {iy})");
            }
        }

        // one phase step moves the stripes by vb / 3
        let shifted = tile_pattern(9, 6, va, vb, v(0, 1), &cell, &TilingOptions::default()).unwrap();
        for iy in 0..6 {
            for ix in 0..9 {
                assert_eq!(shifted[(iy, ix)], iy % 3 == 1);
            }
        }
    }

    #[test]
    fn test_tiled_pattern_is_periodic() {
        let va = v(3, 3);
        let vb = v(-9, 9);
        let cell = sim_unit_cell(va, vb, 3).unwrap();
        let pattern = tile_pattern(50, 40, va, vb, v(0, 0), &cell, &TilingOptions::default()).unwrap();

        assert!(is_periodic(&pattern, va));
        assert!(is_periodic(&pattern, vb));
        assert!(!is_periodic(&pattern, v(-3, 3)));

        let on = pattern.iter().filter(|p| **p).count() as f64;
        let fraction = on / (50.0 * 40.0);
        assert!((fraction - 1.0 / 3.0).abs() < 0.05);
    }

    #[test]
    fn test_doubling_gives_same_pattern() {
        let va = v(3, 3);
        let vb = v(-9, 9);
        let cell = sim_unit_cell(va, vb, 3).unwrap();

        let direct = tile_pattern(200, 150, va, vb, v(-1, 2), &cell, &no_doubling()).unwrap();
        for reduce_basis in [false, true] {
            let options = TilingOptions {
                reduce_basis,
                iteration_threshold: 10,
            };
            let doubled = tile_pattern(200, 150, va, vb, v(-1, 2), &cell, &options).unwrap();
            assert_eq!(doubled, direct);
        }
    }

    #[test]
    fn test_double_cell_area() {
        let va = v(2, 1);
        let vb = v(-2, 6);
        let cell = sim_unit_cell(va, vb, 2).unwrap();

        let doubled = double_cell(&cell, va, vb, 2, 1).unwrap();
        assert_eq!(doubled.area(), cell.area() * 8);
        assert_eq!(doubled.on_count(), cell.on_count() * 8);

        // the doubled cell tiles with the enlarged vectors
        let big = tile_pattern(30, 30, va * 4, vb * 2, v(0, 0), &doubled, &no_doubling()).unwrap();
        let small = tile_pattern(30, 30, va, vb, v(0, 0), &cell, &no_doubling()).unwrap();
        assert_eq!(big, small);
    }

    #[test]
    fn test_wrong_cell_leaves_gaps() {
        let cell = unit_cell(v(3, 0), v(0, 2)).unwrap();
        let err = tile_pattern(8, 4, v(4, 0), v(0, 2), v(0, 0), &cell, &no_doubling()).unwrap_err();
        assert_eq!(err, PatternError::IncompleteTiling { x: 3, y: 0 });
    }

    fn sim_basis() -> impl Strategy<Value = (LatticeVector, LatticeVector, usize)> {
        (-8i64..=8, -8i64..=8, -4i64..=4, -4i64..=4, 1usize..=3)
            .prop_map(|(ax, ay, wx, wy, n)| (v(ax, ay), v(wx * n as i64, wy * n as i64), n))
            .prop_filter("collinear", |(va, vb, _)| va.cross(vb) != 0)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_tiling_is_periodic_and_doubling_invariant(
            (va, vb, nphases) in sim_basis(),
            sx in -5i64..=5,
            sy in -5i64..=5,
        ) {
            let cell = sim_unit_cell(va, vb, nphases).unwrap();
            let start = v(sx, sy);

            let direct = tile_pattern(32, 24, va, vb, start, &cell, &no_doubling()).unwrap();
            prop_assert!(is_periodic(&direct, va));
            prop_assert!(is_periodic(&direct, vb));

            let options = TilingOptions { reduce_basis: true, iteration_threshold: 4 };
            let doubled = tile_pattern(32, 24, va, vb, start, &cell, &options).unwrap();
            prop_assert_eq!(doubled, direct);
        }
    }
}
