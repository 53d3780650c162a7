use crate::{
    error::{AnalysisError, AnalysisResult},
    models::{NormalizedWindow, SequenceModel, inverse_transform},
};

/// Rolls the model forward `horizon` steps from a normalized seed window.
///
/// Each prediction is appended to the output and slid into the window (oldest value
/// dropped), so step `n` sees the model's own outputs from steps `1..n`. The model is
/// called exactly `horizon` times. The caller's seed is never modified.
pub fn roll_forward(
    model: &dyn SequenceModel,
    seed: &[f64],
    horizon: usize,
) -> AnalysisResult<Vec<f64>> {
    let mut predictions = Vec::with_capacity(horizon);
    if horizon == 0 {
        return Ok(predictions);
    }
    if seed.len() != model.window_len() {
        return Err(AnalysisError::computation(format!(
            "seed window has {} values but the model expects {}",
            seed.len(),
            model.window_len()
        )));
    }

    let mut window = seed.to_vec();
    for step in 1..=horizon {
        let pred = model.predict(&window)?;
        if !pred.is_finite() {
            return Err(AnalysisError::computation(format!(
                "model returned {pred} at step {step}"
            )));
        }
        #[cfg(debug_assertions)]
        if crate::config::DF.log_forecast_steps {
            log::info!("forecast step {}/{}: {:.6}", step, horizon, pred);
        }
        predictions.push(pred);

        window.remove(0);
        window.push(pred);
    }
    Ok(predictions)
}

/// Forecasts `horizon` real closing prices following `seed_prices`.
///
/// Fails with `InsufficientData` when fewer than `window_len` prices are supplied;
/// the history is never silently truncated to fit.
pub fn forecast(
    model: &dyn SequenceModel,
    seed_prices: &[f64],
    window_len: usize,
    horizon: usize,
) -> AnalysisResult<Vec<f64>> {
    if seed_prices.len() < window_len {
        return Err(AnalysisError::InsufficientData {
            required: window_len,
            available: seed_prices.len(),
        });
    }
    let window = NormalizedWindow::from_prices(seed_prices, window_len)?;
    let normalized = crate::trace_time!("Forecast loop", 50_000, {
        roll_forward(model, window.values(), horizon)?
    });
    Ok(inverse_transform(&normalized, &window.scale()))
}
