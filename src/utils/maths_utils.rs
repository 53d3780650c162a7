use argminmax::ArgMinMax;

#[inline]
pub(crate) fn get_max(vec: &[f64]) -> Option<f64> {
    if vec.is_empty() {
        return None;
    }
    let max_index: usize = vec.argmax();
    Some(vec[max_index])
}

#[inline]
pub(crate) fn get_min(vec: &[f64]) -> Option<f64> {
    if vec.is_empty() {
        return None;
    }
    let min_index: usize = vec.argmin();
    Some(vec[min_index])
}

/// Arithmetic mean; 0.0 for an empty slice.
#[inline]
pub(crate) fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Rounds half away from zero to `places` decimals.
pub(crate) fn round_to_places(val: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (val * factor).round() / factor
}
