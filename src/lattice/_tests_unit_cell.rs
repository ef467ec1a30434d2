#[cfg(test)]
mod tests {
    use super::super::basis_reduction::reduce_to_cell;
    use super::super::unit_cell::*;
    use crate::error::PatternError;
    use crate::geometries::{in_parallelogram, LatticeVector};
    use proptest::prelude::*;

    fn v(x: i64, y: i64) -> LatticeVector {
        LatticeVector::new(x, y)
    }

    #[test]
    fn test_pixel_merge() {
        assert_eq!(Pixel::Outside.merge(Pixel::On), Pixel::On);
        assert_eq!(Pixel::Off.merge(Pixel::Outside), Pixel::Off);
        assert_eq!(Pixel::Outside.merge(Pixel::Outside), Pixel::Outside);
        assert_eq!(Pixel::Off.merge(Pixel::On), Pixel::On);
        assert_eq!(Pixel::Off.merge(Pixel::Off), Pixel::Off);
        assert_eq!(Pixel::from(true), Pixel::On);
    }

    #[test]
    fn test_rectangular_cell() {
        let cell = unit_cell(v(3, 0), v(0, 2)).unwrap();
        assert_eq!(cell.x, vec![0, 1, 2]);
        assert_eq!(cell.y, vec![0, 1]);
        assert_eq!(cell.area(), 6);
        assert_eq!(cell.on_count(), 0);
        assert!(cell.pixels.iter().all(|p| *p == Pixel::Off));
    }

    #[test]
    fn test_cell_coordinates_with_negative_components() {
        let cell = unit_cell(v(3, 3), v(-9, 9)).unwrap();
        assert_eq!(cell.x, (-8..4).collect::<Vec<_>>());
        assert_eq!(cell.y, (0..12).collect::<Vec<_>>());
        assert_eq!(cell.area(), 54);

        let cell = unit_cell(v(-2, -1), v(-1, 3)).unwrap();
        assert_eq!(cell.x, (-2..1).collect::<Vec<_>>());
        assert_eq!(cell.y, (0..4).collect::<Vec<_>>());
        assert_eq!(cell.area(), 7);
    }

    #[test]
    fn test_cell_membership_matches_parallelogram() {
        let va = v(5, 2);
        let vb = v(-3, 4);
        let cell = unit_cell(va, vb).unwrap();
        for (iy, &y) in cell.y.iter().enumerate() {
            for (ix, &x) in cell.x.iter().enumerate() {
                let inside = in_parallelogram(v(x, y).to_vector2(), va, vb);
                assert_eq!(cell.value(ix, iy).is_inside(), inside, "pixel ({x}, {y})");
            }
        }
        assert_eq!(cell.get(v(0, 0)), Some(Pixel::Off));
        assert_eq!(cell.get(v(100, 0)), None);
    }

    #[test]
    fn test_sim_unit_cell() {
        let va = v(3, 3);
        let vb = v(-9, 9);
        let cell = sim_unit_cell(va, vb, 3).unwrap();
        assert_eq!(cell.area(), 54);
        assert_eq!(cell.on_count(), 18);

        // the on pixels are the cell of (va, vb / 3)
        let vb_sub = v(-3, 3);
        for (point, pixel) in cell.inside_pixels() {
            assert_eq!(pixel.is_on(), in_parallelogram(point.to_vector2(), va, vb_sub));
        }
    }

    #[test]
    fn test_sim_unit_cell_requires_divisible_vb() {
        let err = sim_unit_cell(v(3, 3), v(-9, 8), 3).unwrap_err();
        assert_eq!(
            err,
            PatternError::PhaseDivisibility {
                x: -9,
                y: 8,
                nphases: 3
            }
        );
    }

    #[test]
    fn test_single_phase_cell_is_all_on() {
        let cell = sim_unit_cell(v(4, 1), v(-1, 3), 1).unwrap();
        assert_eq!(cell.on_count(), cell.area());
    }

    #[test]
    fn test_convert_cell_preserves_values() {
        let va = v(3, 3);
        let vb = v(-9, 9);
        let cell = sim_unit_cell(va, vb, 3).unwrap();

        let vb2 = vb + va;
        let converted = convert_cell(&cell, va, vb, va, vb2).unwrap();
        assert_eq!(converted.area(), 54);
        assert_eq!(converted.on_count(), 18);

        for (point, pixel) in converted.inside_pixels() {
            let (reduced, _, _) = reduce_to_cell(point, va, vb).unwrap();
            assert_eq!(cell.get(reduced), Some(pixel));
        }
    }

    #[test]
    fn test_convert_cell_rejects_other_lattice() {
        let cell = unit_cell(v(3, 0), v(0, 2)).unwrap();
        let err = convert_cell(&cell, v(3, 0), v(0, 2), v(2, 0), v(0, 3)).unwrap_err();
        assert!(matches!(err, PatternError::InvalidBasis(_)));
    }

    #[test]
    fn test_minimal_cell() {
        let cell = sim_unit_cell(v(2, 0), v(6, 3), 3).unwrap();
        let (minimal, va, vb) = minimal_cell(&cell, v(2, 0), v(6, 3)).unwrap();
        assert_eq!((va, vb), (v(2, 0), v(0, 3)));
        assert_eq!(minimal.x, vec![0, 1]);
        assert_eq!(minimal.y, vec![0, 1, 2]);
        assert_eq!(minimal.area(), 6);
        assert_eq!(minimal.on_count(), 2);
    }

    fn sim_basis() -> impl Strategy<Value = (LatticeVector, LatticeVector, usize)> {
        (-15i64..=15, -15i64..=15, -8i64..=8, -8i64..=8, 1usize..=4)
            .prop_map(|(ax, ay, wx, wy, n)| (v(ax, ay), v(wx * n as i64, wy * n as i64), n))
            .prop_filter("collinear", |(va, vb, _)| va.cross(vb) != 0)
    }

    proptest! {
        #[test]
        fn prop_cell_area_and_phase_fraction((va, vb, nphases) in sim_basis()) {
            let cell = unit_cell(va, vb).unwrap();
            prop_assert_eq!(cell.area() as i64, va.cross(&vb).abs());

            let sim = sim_unit_cell(va, vb, nphases).unwrap();
            prop_assert_eq!(sim.area(), cell.area());
            prop_assert_eq!(sim.on_count() * nphases, sim.area());
        }
    }
}
