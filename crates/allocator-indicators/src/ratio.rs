//! Ratio series built from two aligned price series.

use crate::moving_average::trailing_mean;

/// Element-wise `numerator[i] / denominator[i] * scale` over the common
/// length. Points with a zero or non-finite denominator are skipped.
pub fn ratio_series(numerator: &[f64], denominator: &[f64], scale: f64) -> Vec<f64> {
    numerator
        .iter()
        .zip(denominator)
        .filter(|(_, &d)| d.is_finite() && d != 0.0)
        .map(|(&n, &d)| n / d * scale)
        .filter(|r| r.is_finite())
        .collect()
}

/// Mean of the ratio series over all available points.
pub fn mean_ratio(numerator: &[f64], denominator: &[f64], scale: f64) -> Option<f64> {
    trailing_mean(&ratio_series(numerator, denominator, scale))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_series_skips_zero_denominators() {
        let gold = [200.0, 210.0, 220.0];
        let bonds = [100.0, 0.0, 110.0];

        let ratios = ratio_series(&gold, &bonds, 1.0);
        assert_eq!(ratios, vec![2.0, 2.0]);
    }

    #[test]
    fn test_ratio_series_truncates_to_common_length() {
        let stocks = [60.0, 66.0, 70.0, 80.0];
        let gold = [200.0, 220.0];

        let ratios = ratio_series(&stocks, &gold, 100.0);
        assert_eq!(ratios.len(), 2);
        assert!((ratios[0] - 30.0).abs() < 1e-10);
        assert!((ratios[1] - 30.0).abs() < 1e-10);
    }

    #[test]
    fn test_mean_ratio() {
        assert_eq!(mean_ratio(&[], &[1.0], 1.0), None);
        let mean = mean_ratio(&[2.0, 6.0], &[1.0, 2.0], 1.0).unwrap();
        assert!((mean - 2.5).abs() < 1e-10);
    }
}
