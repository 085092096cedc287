use crate::config::SignalToNoiseConfig;
use crate::errors::{
    PeakPickingError,
    Result,
};

/// Signal to noise ratio of a peak from the finest-scale wavelet coefficients.
///
/// The noise level is a high quantile of the coefficients inside the peak
/// and in a window on each side of it, the window being as wide as the
/// peak (times `window_size_multiplier`). The signal is the coefficient of
/// the ridge best point.
pub fn signal_to_noise(
    finest_coefficients: &[f64],
    best_coefficient: f64,
    left: usize,
    right: usize,
    config: &SignalToNoiseConfig,
) -> Result<f64> {
    let mut values = noise_coefficients(
        finest_coefficients,
        left,
        right,
        config.window_size_multiplier,
    );
    if config.absolute_coefficients {
        values.iter_mut().for_each(|x| *x = x.abs());
    }
    let noise = quantile(&mut values, config.noise_quantile)?;
    Ok(best_coefficient / noise)
}

fn noise_coefficients(
    finest_coefficients: &[f64],
    left: usize,
    right: usize,
    window_size_multiplier: f64,
) -> Vec<f64> {
    let width = right - left;
    let window = (window_size_multiplier * width as f64).round() as usize;
    let n = finest_coefficients.len();

    let mut values = Vec::with_capacity(2 * window + width + 1);
    values.extend(
        (right + 1..n)
            .take_while(|i| i - right < window)
            .map(|i| finest_coefficients[i]),
    );
    // Index 0 never takes part in the left window.
    values.extend(
        (1..left)
            .rev()
            .take_while(|i| left - i < window)
            .map(|i| finest_coefficients[i]),
    );
    values.extend_from_slice(&finest_coefficients[left..=right]);
    values
}

/// Interpolated quantile of `values`, which get sorted in place.
///
/// With `j = floor(n * p)` and `g = (n - 1) * p + 1 - j`, the estimate is
/// `(1 - g) * v[j] + g * v[j + 1]` over the 1-based sorted values.
/// At least two values are needed, and enough of them for `j` to be at
/// least 1.
pub fn quantile(values: &mut [f64], probability: f64) -> Result<f64> {
    if !(probability > 0.0 && probability < 1.0) {
        return Err(PeakPickingError::InvalidQuantile { probability });
    }
    let n = values.len();
    let j = (n as f64 * probability).floor() as usize;
    if n < 2 || j < 1 {
        return Err(PeakPickingError::InsufficientData {
            real: n,
            expected: ((1.0 / probability).ceil() as usize).max(2),
        });
    }
    values.sort_by(|a, b| a.total_cmp(b));

    let gamma = (n - 1) as f64 * probability + 1.0 - j as f64;
    Ok((1.0 - gamma) * values[j - 1] + gamma * values[j])
}
