//!
//! Discretised normal kernel, used for smoothing length histograms
//!
use libm::{erf, sqrt};

///
/// `P(X <= x)` of `X ~ N(mu, sigma^2)`
///
pub fn normal_cdf(x: f64, mu: f64, sigma: f64) -> f64 {
    0.5 * (1.0 + erf((x - mu) / sqrt(2.0 * sigma * sigma)))
}

///
/// Mass of the integer bin `x`, i.e. `P(x - 0.5 <= X < x + 0.5)`
///
pub fn normal_bin(x: usize, mu: f64, sigma: f64) -> f64 {
    let x = x as f64;
    let p0 = normal_cdf(x + 0.5, mu, sigma);
    let p1 = normal_cdf(x - 0.5, mu, sigma);
    (p0 - p1).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_cdf_symmetric() {
        assert_abs_diff_eq!(normal_cdf(50.0, 50.0, 10.0), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(
            normal_cdf(40.0, 50.0, 10.0) + normal_cdf(60.0, 50.0, 10.0),
            1.0,
            epsilon = 1e-12
        );
    }
    #[test]
    fn normal_bins_sum_to_one() {
        let total: f64 = (0..200).map(|x| normal_bin(x, 100.0, 10.0)).sum();
        assert_abs_diff_eq!(total, 1.0, epsilon = 1e-9);
        assert!(normal_bin(100, 100.0, 10.0) > normal_bin(110, 100.0, 10.0));
    }
}
