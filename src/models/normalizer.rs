//! Min-max scaling of price series into [0, 1] and back.

use crate::{
    error::{AnalysisError, AnalysisResult},
    utils::{get_max, get_min},
};

/// Observed bounds of the series a window was scaled from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub min: f64,
    pub max: f64,
}

impl Scale {
    /// Fails with `DegenerateScale` when every value is the same.
    pub fn fit(series: &[f64]) -> AnalysisResult<Self> {
        let scale = Self::fit_flat_as_unit(series)?;
        if scale.max <= scale.min {
            return Err(AnalysisError::DegenerateScale { value: scale.min });
        }
        Ok(scale)
    }

    /// Like `fit`, but a flat series is accepted with a unit range: every value
    /// scales to 0 and `inverse` just adds `min` back.
    pub fn fit_flat_as_unit(series: &[f64]) -> AnalysisResult<Self> {
        if let Some(idx) = series.iter().position(|v| !v.is_finite()) {
            return Err(AnalysisError::computation(format!(
                "non-finite price at index {idx}"
            )));
        }
        let (Some(min), Some(max)) = (get_min(series), get_max(series)) else {
            return Err(AnalysisError::InsufficientData {
                required: 1,
                available: 0,
            });
        };
        Ok(Self { min, max })
    }

    #[inline]
    pub fn range(&self) -> f64 {
        let range = self.max - self.min;
        if range > 0.0 { range } else { 1.0 }
    }

    #[inline]
    pub fn transform(&self, v: f64) -> f64 {
        (v - self.min) / self.range()
    }

    #[inline]
    pub fn inverse(&self, v: f64) -> f64 {
        v * self.range() + self.min
    }
}

pub fn fit_transform(series: &[f64]) -> AnalysisResult<(Vec<f64>, Scale)> {
    let scale = Scale::fit(series)?;
    let scaled = series.iter().map(|&v| scale.transform(v)).collect();
    Ok((scaled, scale))
}

pub fn inverse_transform(values: &[f64], scale: &Scale) -> Vec<f64> {
    values.iter().map(|&v| scale.inverse(v)).collect()
}

/// The most recent `len` prices in scaled form, carrying the scale needed to invert them.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedWindow {
    values: Vec<f64>,
    scale: Scale,
}

impl NormalizedWindow {
    /// Fits the scale on all of `prices`, then keeps the last `len` scaled values.
    /// A flat history scales to all zeros rather than failing.
    pub fn from_prices(prices: &[f64], len: usize) -> AnalysisResult<Self> {
        if prices.len() < len {
            return Err(AnalysisError::InsufficientData {
                required: len,
                available: prices.len(),
            });
        }
        let scale = Scale::fit_flat_as_unit(prices)?;
        let values = prices[prices.len() - len..]
            .iter()
            .map(|&v| scale.transform(v))
            .collect();
        Ok(Self { values, scale })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
