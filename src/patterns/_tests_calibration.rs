#[cfg(test)]
mod tests {
    use super::super::calibration::*;
    use super::super::sim_pattern::sim_pattern;
    use crate::error::PatternError;
    use crate::geometries::LatticeVector;

    fn v(x: i64, y: i64) -> LatticeVector {
        LatticeVector::new(x, y)
    }

    #[test]
    fn test_checkerboard() {
        let pattern = checkerboard(7, 5, 2, 1);
        assert_eq!(pattern.shape(), (5, 7));
        for iy in 0..5 {
            for ix in 0..7 {
                assert_eq!(pattern[(iy, ix)], iy % 3 < 2 && ix % 3 < 2, "pixel ({ix}, {iy})");
            }
        }

        assert!(checkerboard(4, 4, 0, 0).iter().all(|&on| !on));
        assert!(checkerboard(4, 4, 3, 0).iter().all(|&on| on));
    }

    #[test]
    fn test_circle_pattern() {
        let disc = circle_pattern(5, 5, 1.0);
        let on: Vec<(usize, usize)> = (0..5)
            .flat_map(|iy| (0..5).map(move |ix| (iy, ix)))
            .filter(|&index| disc[index])
            .collect();
        assert_eq!(on, vec![(1, 2), (2, 1), (2, 2), (2, 3), (3, 2)]);

        // an even canvas has its centre between pixels
        let disc = circle_pattern(4, 4, 0.5);
        assert!(disc.iter().all(|&on| !on));
        assert_eq!(circle_pattern(4, 4, 0.75).iter().filter(|&&on| on).count(), 4);
    }

    #[test]
    fn test_calibration_series() {
        let patterns = calibration_patterns(64, 48, &[1, 5]);
        let names: Vec<&str> = patterns.iter().map(|(name, _)| name.as_str()).collect();

        assert_eq!(names[..6], ["on", "off", "circle_off_r=1", "circle_on_r=1", "circle_off_r=5", "circle_on_r=5"]);
        // 10 + 9 + 17 checkerboard periods, the grating and the corners
        assert_eq!(patterns.len(), 6 + 36 + 2);
        assert!(!names.contains(&"checkerboard_period=13"));
        assert!(names.contains(&"checkerboard_period=14"));
        assert!(names.contains(&"checkerboard_period=190"));
        assert_eq!(names[names.len() - 2..], ["variable_pattern_periods=2_to_18", "three_corners_300"]);

        assert!(patterns[0].1.iter().all(|&on| on));
        assert!(patterns[1].1.iter().all(|&on| !on));
        assert_eq!(patterns[4].1, patterns[5].1.map(|on| !on));

        let (_, period_5) = patterns
            .iter()
            .find(|(name, _)| name == "checkerboard_period=5")
            .unwrap();
        assert_eq!(*period_5, checkerboard(64, 48, 3, 2));
    }

    #[test]
    fn test_three_corners() {
        let pattern = three_corners_pattern(20, 12, 5);
        assert_eq!(pattern.iter().filter(|&&on| on).count(), 75);
        assert!(pattern[(0, 0)] && pattern[(4, 4)]);
        assert!(pattern[(0, 19)] && pattern[(4, 15)] && !pattern[(4, 14)]);
        assert!(pattern[(11, 0)] && pattern[(7, 4)] && !pattern[(6, 4)]);
        assert!(!pattern[(11, 19)]);

        // blocks larger than the canvas cover it
        assert!(three_corners_pattern(4, 3, 10).iter().all(|&on| on));
    }

    #[test]
    fn test_variable_period_grating() {
        // periods 2 and 4 give the column of rows [on, off, on, on, off, off]
        let rows = [true, false, true, true, false, false];
        let pattern = variable_period_pattern(30, 14, &[2, 4], 1);

        for iy in 0..6 {
            for ix in 0..6 {
                // rows in the diagonal quadrants, columns in the others
                assert_eq!(pattern[(iy, ix)], rows[iy]);
                assert_eq!(pattern[(iy + 6, ix + 6)], rows[iy]);
                assert_eq!(pattern[(iy, ix + 6)], rows[ix]);
                assert_eq!(pattern[(iy + 6, ix)], rows[ix]);
            }
        }
        // tiled with period 12
        for iy in 0..2 {
            for ix in 0..18 {
                assert_eq!(pattern[(iy + 12, ix + 12)], pattern[(iy, ix)]);
            }
        }

        let grating = variable_period_pattern(400, 400, &[2, 4, 6, 8, 10, 12, 14, 16, 18], 4);
        // 4 * 90 rows: the first period 2 repeats four times
        assert_eq!(
            (0..8).map(|iy| grating[(iy, 0)]).collect::<Vec<_>>(),
            [true, false, true, false, true, false, true, false]
        );
        assert!(grating[(8, 0)] && grating[(9, 0)] && !grating[(10, 0)]);
        assert_eq!(grating[(0, 360)], grating[(0, 0)]);

        assert!(variable_period_pattern(8, 8, &[], 4).iter().all(|&on| !on));
    }

    #[test]
    fn test_affine_fit_grid() {
        let options = AffineFitOptions::default();
        assert_eq!(options.point_spacing, 61);

        let fit = affine_fit_patterns(130, 70, &[1.0, 1.5], &options).unwrap();
        assert_eq!(fit.radii, vec![1.0, 1.5]);
        assert_eq!(fit.centers.len(), 2);
        assert_eq!((fit.centers[0].x, fit.centers[0].y), (30.0, 30.0));
        assert_eq!((fit.centers[1].x, fit.centers[1].y), (91.0, 30.0));

        let (small, large) = (&fit.patterns[0], &fit.patterns[1]);
        assert_eq!(small.shape(), (70, 130));
        // spot interiors are strict
        assert!(small[(30, 30)] && !small[(30, 31)]);
        assert!(large[(30, 31)] && large[(31, 31)] && !large[(30, 32)]);
        assert!(large[(30, 91)] && large[(29, 92)]);
        assert!(!large[(10, 10)]);

        // corners, first row and first column
        for &(iy, ix) in &[(3, 3), (3, 126), (66, 3), (69, 129)] {
            assert!(large[(iy, ix)], "corner pixel ({ix}, {iy})");
        }
        assert!(!large[(4, 126)]);
        assert!((0..130).all(|ix| large[(0, ix)]));
        assert!((0..70).all(|iy| large[(iy, 0)]));
        assert!(!large[(69, 64)]);

        // orientation marks around the centre (65, 35)
        assert!(large[(33, 50)] && large[(36, 53)] && !large[(36, 54)]);
        assert!(large[(33, 35)] && large[(36, 38)]);
        assert!(large[(20, 63)] && large[(23, 66)] && !large[(24, 66)]);
        assert!(large[(35, 65)]);

        let err = affine_fit_patterns(
            130,
            70,
            &[1.0],
            &AffineFitOptions {
                point_spacing: 0,
                ..options
            },
        )
        .unwrap_err();
        assert_eq!(err, PatternError::ValueOutOfRange(0.0));
    }

    #[test]
    fn test_aberration_patches() {
        let va = v(3, 0);
        let vb = v(0, 3);
        let radius = 3;
        let centers = [v(5, 5), v(20, 10)];
        let pattern = aberration_map_pattern(30, 16, va, vb, 3, &centers, radius, &[0, 1]).unwrap();

        let (phase0, _) = sim_pattern(7, 7, va, vb, 3, 0).unwrap();
        let (phase1, _) = sim_pattern(7, 7, va, vb, 3, 1).unwrap();
        for py in 0..7usize {
            for px in 0..7usize {
                let inside = (px as f64 - 3.0).hypot(py as f64 - 3.0) <= 3.0;
                assert_eq!(pattern[(2 + py, 2 + px)], inside && phase0[(py, px)]);
                assert_eq!(pattern[(7 + py, 17 + px)], inside && phase1[(py, px)]);
            }
        }

        let on = pattern.iter().filter(|&&on| on).count();
        let patch_on = |p: &crate::lattice::Pattern| {
            (0..7usize)
                .flat_map(|py| (0..7usize).map(move |px| (py, px)))
                .filter(|&(py, px)| p[(py, px)] && (px as f64 - 3.0).hypot(py as f64 - 3.0) <= 3.0)
                .count()
        };
        assert_eq!(on, patch_on(&phase0) + patch_on(&phase1));
    }

    #[test]
    fn test_aberration_patch_clipped_and_broadcast() {
        let centers = [v(0, 0), v(9, 9)];
        let pattern = aberration_map_pattern(10, 10, v(3, 0), v(0, 3), 3, &centers, 2, &[0]).unwrap();
        assert_eq!(pattern.shape(), (10, 10));
        // patch row 3 lands on canvas row 1, patch row 0 of the second patch on canvas row 7
        assert!(pattern[(1, 0)] && pattern[(1, 1)] && pattern[(7, 9)]);
        assert!(!pattern[(0, 0)]);
        assert_eq!(pattern.iter().filter(|&&on| on).count(), 3);
    }

    #[test]
    fn test_aberration_argument_errors() {
        let centers = [v(5, 5), v(20, 10)];
        let err = aberration_map_pattern(30, 16, v(3, 0), v(0, 3), 3, &centers, 3, &[0, 1, 2]).unwrap_err();
        assert_eq!(
            err,
            PatternError::LengthMismatch {
                what: "phase indices",
                expected: 2,
                found: 3
            }
        );

        let err = aberration_map_pattern(30, 16, v(3, 0), v(0, 3), 3, &centers, 3, &[3]).unwrap_err();
        assert_eq!(err, PatternError::InvalidPhaseIndex { index: 3, nphases: 3 });
    }
}
