#[cfg(test)]
mod tests {
    use super::super::leakage::*;
    use crate::error::PatternError;
    use crate::geometries::LatticeVector;
    use approx::assert_relative_eq;

    fn v(x: i64, y: i64) -> LatticeVector {
        LatticeVector::new(x, y)
    }

    fn three_angle_set() -> (Vec<LatticeVector>, Vec<LatticeVector>) {
        (
            vec![v(-1, 5), v(-5, 2), v(-6, -5)],
            vec![v(9, 6), v(-3, 12), v(-12, 3)],
        )
    }

    #[test]
    fn test_single_pattern_has_no_leakage() {
        // line patterns only have harmonics of rb, which are excluded against themselves
        let peaks = find_nearest_leakage_peaks(&[v(3, 3)], &[v(-9, 9)], 3, 1e-3, 1.0, 1.0).unwrap();
        assert_eq!(peaks.min_distance, f64::INFINITY);
        assert_eq!(peaks.per_pattern, vec![f64::INFINITY]);
        assert_eq!(peaks.nearest_pattern, vec![0]);
    }

    #[test]
    fn test_three_angle_set() {
        let (vec_as, vec_bs) = three_angle_set();
        let peaks = find_nearest_leakage_peaks(&vec_as, &vec_bs, 3, 1e-3, 1.0, 1.0).unwrap();

        assert_relative_eq!(peaks.per_pattern[0], 0.05749357029425617, max_relative = 1e-9);
        assert_relative_eq!(peaks.per_pattern[1], 0.06737455037256676, max_relative = 1e-9);
        assert_relative_eq!(peaks.per_pattern[2], 0.09920504470928859, max_relative = 1e-9);
        assert_eq!(peaks.min_distance, peaks.per_pattern[0]);

        // the nearest peak always comes from another pattern
        for (i, &j) in peaks.nearest_pattern.iter().enumerate() {
            assert_ne!(i, j);
        }
    }

    #[test]
    fn test_pair_is_symmetric() {
        let (vec_as, vec_bs) = three_angle_set();
        let peaks = find_nearest_leakage_peaks(&vec_as[..2], &vec_bs[..2], 3, 1e-3, 1.0, 1.0).unwrap();
        assert_relative_eq!(peaks.per_pattern[0], 0.09512118298787026, max_relative = 1e-9);
        assert_relative_eq!(peaks.per_pattern[1], 0.09512118298787026, max_relative = 1e-9);
        assert_eq!(peaks.nearest_pattern, vec![1, 0]);
    }

    #[test]
    fn test_distance_scales_with_wavelength_over_pitch() {
        let (vec_as, vec_bs) = three_angle_set();
        let unit = find_nearest_leakage_peaks(&vec_as, &vec_bs, 3, 1e-3, 1.0, 1.0).unwrap();
        let scaled = find_nearest_leakage_peaks(&vec_as, &vec_bs, 3, 1e-3, 532.0, 7560.0).unwrap();
        assert_relative_eq!(scaled.min_distance, unit.min_distance * 532.0 / 7560.0, max_relative = 1e-12);
    }

    #[test]
    fn test_peak_floor_removes_everything() {
        let (vec_as, vec_bs) = three_angle_set();
        // no peak is larger than the DC peak
        let peaks = find_nearest_leakage_peaks(&vec_as, &vec_bs, 3, 1.5, 1.0, 1.0).unwrap();
        assert!(peaks.per_pattern.iter().all(|d| d.is_infinite()));
    }

    #[test]
    fn test_length_mismatch() {
        let err = find_nearest_leakage_peaks(&[v(3, 0), v(0, 3)], &[v(0, 3)], 3, 1e-3, 1.0, 1.0).unwrap_err();
        assert_eq!(
            err,
            PatternError::LengthMismatch {
                what: "vec_b entries",
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_empty_set() {
        let peaks = find_nearest_leakage_peaks(&[], &[], 3, 1e-3, 1.0, 1.0).unwrap();
        assert!(peaks.per_pattern.is_empty());
        assert_eq!(peaks.min_distance, f64::INFINITY);
    }
}
