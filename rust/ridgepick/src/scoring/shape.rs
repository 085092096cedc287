//! Peak shape descriptors computed over the final peak bounds.
//!
//! Slopes are measured per scan, not per retention time unit.

use super::most_intense_index;

/// Median slope of the flanks of a peak, above a quarter of its height.
///
/// The height is taken relative to the straight line joining both
/// boundary points. Returns `-1.0` when neither flank has a point above
/// that level (or the range is degenerate).
///
/// ```
/// use ridgepick::scoring::sharpness_yang;
///
/// let rts: Vec<f64> = (0..9).map(|x| x as f64).collect();
/// let triangle = [0.0, 1.0, 2.0, 3.0, 4.0, 3.0, 2.0, 1.0, 0.0];
/// assert_eq!(sharpness_yang(&triangle, &rts, 0, 8), 1.0);
/// ```
pub fn sharpness_yang(
    intensities: &[f64],
    retention_times: &[f64],
    left: usize,
    right: usize,
) -> f64 {
    if left >= right || right >= intensities.len() {
        return -1.0;
    }
    let peak_index = most_intense_index(intensities, left, right);
    let peak_height = intensities[peak_index];

    let slope = (intensities[right] - intensities[left])
        / (retention_times[right] - retention_times[left]);
    let intercept = intensities[left] - slope * retention_times[left];
    let baseline = slope * retention_times[peak_index] + intercept;

    let quarter = 0.25 * (peak_height - baseline);
    if quarter < 0.0 {
        return -1.0;
    }
    let threshold = quarter + baseline;

    let mut left_slopes: Vec<f64> = (left..peak_index)
        .filter(|&i| intensities[i] >= threshold)
        .map(|i| (peak_height - intensities[i]) / (peak_index - i) as f64)
        .collect();
    let mut right_slopes: Vec<f64> = (peak_index + 1..=right)
        .filter(|&i| intensities[i] >= threshold)
        .map(|i| (intensities[i] - peak_height) / (i - peak_index) as f64)
        .collect();

    match (median(&mut left_slopes), median(&mut right_slopes)) {
        (None, None) => -1.0,
        (Some(l), None) => l,
        (None, Some(r)) => r,
        // The right flank slope is negative.
        (Some(l), Some(r)) => (l - r) / 2.0,
    }
}

/// Angle, in radians, at the apex between the mean slopes of both flanks.
///
/// The flanks extend half a peak width past each boundary, clamped to the
/// trace. Narrow peaks give small angles, a flat trace gives `PI`.
/// Returns `-1.0` when the apex sits at the edge of the trace and one
/// flank is empty.
pub fn sharpness_angle(intensities: &[f64], left: usize, right: usize) -> f64 {
    if left > right || right >= intensities.len() {
        return -1.0;
    }
    let half_width = ((right - left) as f64 / 2.0).round() as usize;
    let peak_index = most_intense_index(intensities, left, right);
    let peak_height = intensities[peak_index];

    let first = left.saturating_sub(half_width);
    let last = (right + half_width).min(intensities.len() - 1);

    let left_slopes: Vec<f64> = (first..peak_index)
        .map(|i| (peak_height - intensities[i]) / (peak_index - i) as f64)
        .collect();
    let right_slopes: Vec<f64> = (peak_index + 1..=last)
        .map(|i| (intensities[i] - peak_height) / (i - peak_index) as f64)
        .collect();
    if left_slopes.is_empty() || right_slopes.is_empty() {
        return -1.0;
    }
    let mean_left = left_slopes.iter().sum::<f64>() / left_slopes.len() as f64;
    let mean_right = right_slopes.iter().sum::<f64>() / right_slopes.len() as f64;

    let mut left_theta = (1.0 / mean_left.abs()).atan();
    let mut right_theta = (1.0 / mean_right.abs()).atan();
    // A flank rising away from the apex opens the angle past vertical.
    if mean_left < 0.0 {
        left_theta = std::f64::consts::PI - left_theta;
    }
    if mean_right > 0.0 {
        right_theta = std::f64::consts::PI - right_theta;
    }
    left_theta + right_theta
}

/// Whether a peak looks like part of a larger, unresolved feature.
///
/// True when the intensities hold more than one local maximum (plateaus
/// count once), or when either edge, or the difference between both
/// edges, is too high relative to the apex.
pub fn is_shared(
    intensities: &[f64],
    edge_to_height_ratio: f64,
    delta_to_height_ratio: f64,
) -> bool {
    let (first, last) = match (intensities.first(), intensities.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return false,
    };
    let size = intensities.len();

    let mut apex = first.max(last);
    let mut num_maxima = 0;
    let mut index = 1;
    while index + 1 < size {
        let current = intensities[index];
        if current > apex {
            apex = current;
        }
        let mut next = index + 1;
        while next + 1 < size && intensities[next] == current {
            next += 1;
        }
        if intensities[index - 1] < current && current > intensities[next] {
            num_maxima += 1;
        }
        index = next;
    }
    if num_maxima > 1 {
        return true;
    }

    first / apex >= edge_to_height_ratio
        || last / apex >= edge_to_height_ratio
        || (first - last).abs() / apex >= delta_to_height_ratio
}

fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}
