use {
    crate::error::{AnalysisError, AnalysisResult},
    itertools::Itertools,
    statrs::statistics::Statistics,
};

/// Population standard deviation of day-over-day simple returns.
///
/// Fewer than two prices yield 0.0. A zero or non-finite price that would be used
/// as a divisor is an error rather than a silent NaN/inf.
pub fn compute_volatility(prices: &[f64]) -> AnalysisResult<f64> {
    if prices.len() < 2 {
        return Ok(0.0);
    }

    let returns = prices
        .iter()
        .tuple_windows()
        .enumerate()
        .map(|(i, (&prev, &curr))| {
            if prev == 0.0 || !prev.is_finite() || !curr.is_finite() {
                Err(AnalysisError::computation(format!(
                    "cannot compute return from price {prev} at index {i}"
                )))
            } else {
                Ok((curr - prev) / prev)
            }
        })
        .collect::<AnalysisResult<Vec<f64>>>()?;

    Ok(returns.iter().population_std_dev())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn too_short_is_zero() {
        assert_eq!(compute_volatility(&[]).unwrap(), 0.0);
        assert_eq!(compute_volatility(&[100.0]).unwrap(), 0.0);
    }

    #[test]
    fn matches_population_std_of_returns() {
        let vol = compute_volatility(&[100.0, 110.0, 105.0]).unwrap();
        let r1: f64 = 0.10;
        let r2 = -5.0 / 110.0;
        let mean = (r1 + r2) / 2.0;
        let expected = (((r1 - mean).powi(2) + (r2 - mean).powi(2)) / 2.0).sqrt();
        assert_abs_diff_eq!(vol, expected, epsilon = 1e-12);
    }

    #[test]
    fn steady_growth_has_no_volatility() {
        let prices: Vec<f64> = (0..10).map(|i| 100.0 * 1.01f64.powi(i)).collect();
        assert_abs_diff_eq!(compute_volatility(&prices).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_price_is_rejected() {
        let err = compute_volatility(&[100.0, 0.0, 50.0]).unwrap_err();
        match err {
            AnalysisError::Computation(msg) => assert!(msg.contains("index 1")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
