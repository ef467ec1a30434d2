#[cfg(test)]
mod tests {
    use super::super::leakage::find_nearest_leakage_peaks;
    use super::super::pattern_search::*;
    use super::super::rational_approx::min_angle_diff;
    use super::super::sim_pattern::{sim_angle, sim_period};
    use crate::error::PatternError;
    use crate::geometries::LatticeVector;
    use crate::interfaces::AngleDiffMode;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn v(x: i64, y: i64) -> LatticeVector {
        LatticeVector::new(x, y)
    }

    fn small_search(minimize_leakage: bool) -> MulticolorSearchOptions {
        MulticolorSearchOptions {
            bvec_max_size: 20,
            avec_max_size: 20,
            max_solutions_to_search: 5,
            minimize_leakage,
            ..MulticolorSearchOptions::default()
        }
    }

    /// Realised angles of one wavelength, sorted
    fn sorted_angles(vec_as: &[LatticeVector], vec_bs: &[LatticeVector]) -> Vec<f64> {
        let mut angles: Vec<f64> = vec_as
            .iter()
            .zip(vec_bs)
            .map(|(&va, &vb)| sim_angle(va, vb).unwrap().rem_euclid(PI))
            .collect();
        angles.sort_by(|a, b| a.total_cmp(b));
        angles
    }

    #[test]
    fn test_default_options() {
        let options = MulticolorSearchOptions::default();
        assert_eq!(options.bvec_max_size, 40);
        assert_eq!(options.avec_max_size, 40);
        assert_relative_eq!(options.atol, PI / 180.0);
        assert_relative_eq!(options.angle_sep_tol, 5.0 * PI / 180.0);
        assert_eq!(options.max_solutions_to_search, 20);
        assert_eq!(options.pitch, 7560.0);
        assert!(options.minimize_leakage);

        let parsed: MulticolorSearchOptions =
            serde_json::from_str(r#"{"bvec_max_size": 24, "minimize_leakage": false}"#).unwrap();
        assert_eq!(parsed.bvec_max_size, 24);
        assert!(!parsed.minimize_leakage);
        assert_eq!(parsed.avec_max_size, 40);
    }

    #[test]
    fn test_closest_pattern() {
        let closest = find_closest_pattern(10.0, 0.2, 3, 40, 40).unwrap();
        assert_eq!(closest.vec_b.x % 3, 0);
        assert_eq!(closest.vec_b.y % 3, 0);
        assert!((closest.period - 10.0).abs() < 0.1, "period {}", closest.period);
        assert!(min_angle_diff(closest.angle, 0.2, AngleDiffMode::Half).abs() < 0.01);
        assert_eq!(closest.period, sim_period(closest.vec_a, closest.vec_b).unwrap());
    }

    #[test]
    fn test_closest_pattern_without_candidates() {
        let err = find_closest_pattern(10.0, 0.2, 3, 40, 3).unwrap_err();
        assert!(matches!(err, PatternError::NoPatternSetFound(_)));
    }

    #[test]
    fn test_cheapest_set_without_leakage_search() {
        let set = find_closest_multicolor_set(10.0, 3, 3, None, &small_search(false)).unwrap();
        assert_eq!(set.wavelengths, vec![1.0]);
        assert_eq!(set.min_leakage, None);
        assert_eq!(set.vec_bs, vec![vec![v(9, 6), v(-3, 12), v(-12, 3)]]);
        assert_eq!(set.vec_as, vec![vec![v(-1, 5), v(-5, 2), v(-6, -5)]]);
    }

    #[test]
    fn test_leakage_minimised_set() {
        let options = small_search(true);
        let set = find_closest_multicolor_set(10.0, 3, 3, Some(&[]), &options).unwrap();
        assert_eq!(set.vec_as.len(), 1);
        assert_eq!(set.vec_as[0].len(), 3);

        for (&va, &vb) in set.vec_as[0].iter().zip(&set.vec_bs[0]) {
            assert_eq!(vb.x % 3, 0);
            assert_eq!(vb.y % 3, 0);
            let period = sim_period(va, vb).unwrap();
            assert!((period - 10.0).abs() / 10.0 < options.ptol_relative);
        }

        // angles are roughly pi / 3 apart, modulo pi
        let angles = sorted_angles(&set.vec_as[0], &set.vec_bs[0]);
        for pair in angles.windows(2) {
            let separation = pair[1] - pair[0];
            assert!((separation - PI / 3.0).abs() < options.angle_sep_tol + 2.0 * options.atol);
        }

        let leakage = set.min_leakage.unwrap();
        assert!(leakage > 0.0);
        let peaks = find_nearest_leakage_peaks(
            &set.vec_as[0],
            &set.vec_bs[0],
            3,
            options.minimum_relative_peak_size,
            1.0,
            options.pitch,
        )
        .unwrap();
        assert_relative_eq!(peaks.min_distance, leakage);
    }

    #[test]
    fn test_multicolor_set() {
        let options = small_search(true);
        let set = find_closest_multicolor_set(10.0, 3, 3, Some(&[532.0, 465.0]), &options).unwrap();
        assert_eq!(set.wavelengths, vec![465.0, 532.0]);
        assert_eq!(set.vec_as.len(), 2);
        assert_eq!(set.vec_bs.len(), 2);

        for (ii, scale) in [1.0, 532.0 / 465.0].into_iter().enumerate() {
            for (&va, &vb) in set.vec_as[ii].iter().zip(&set.vec_bs[ii]) {
                let period = sim_period(va, vb).unwrap();
                assert!((period - 10.0 * scale).abs() / (10.0 * scale) < options.ptol_relative);
            }
        }

        // both colors use the same directions
        for angle in 0..3 {
            let a0 = sim_angle(set.vec_as[0][angle], set.vec_bs[0][angle]).unwrap();
            let a1 = sim_angle(set.vec_as[1][angle], set.vec_bs[1][angle]).unwrap();
            assert!(min_angle_diff(a0, a1, AngleDiffMode::Half).abs() < 3.0 * options.atol);
        }
    }

    #[test]
    fn test_invalid_requests() {
        let options = small_search(false);

        let err = find_closest_multicolor_set(10.0, 0, 3, None, &options).unwrap_err();
        assert!(matches!(err, PatternError::NoPatternSetFound(_)));

        let err = find_closest_multicolor_set(10.0, 3, 3, Some(&[532.0, -1.0]), &options).unwrap_err();
        assert_eq!(err, PatternError::ValueOutOfRange(-1.0));

        let tiny = MulticolorSearchOptions {
            bvec_max_size: 3,
            ..options
        };
        let err = find_closest_multicolor_set(10.0, 3, 3, None, &tiny).unwrap_err();
        assert!(matches!(err, PatternError::NoPatternSetFound(_)));
    }
}
