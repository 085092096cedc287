//! Index-space helpers that turn a rough window around a ridge apex into
//! the bounds of a peak.
//!
//! All functions take inclusive scan indices into the intensity slice and
//! expect them to be in range.

/// Walks the left boundary to the nearest local minimum of intensity.
///
/// The walk stops at the first point that is below `min_intensity`, at
/// index 0, or at a point that both neighbours are not lower than.
/// Without a right neighbour the starting index is kept.
/// `None` means no direction could be decided, which only happens with
/// non comparable (NaN) intensities.
pub fn fix_left_boundary(intensities: &[f64], start: usize, min_intensity: f64) -> Option<usize> {
    let mut cur = start;
    loop {
        if cur + 1 >= intensities.len() {
            return Some(start);
        }
        if cur == 0 || intensities[cur] < min_intensity {
            return Some(cur);
        }
        let (left, here, right) = (
            intensities[cur - 1],
            intensities[cur],
            intensities[cur + 1],
        );
        if right >= here && left >= here {
            return Some(cur);
        } else if left <= here {
            cur -= 1;
        } else if right < here {
            cur += 1;
        } else {
            return None;
        }
    }
}

/// Mirror image of [`fix_left_boundary`].
///
/// The walk keeps the starting index as soon as it would need a left
/// neighbour at or before index 0.
pub fn fix_right_boundary(intensities: &[f64], start: usize, min_intensity: f64) -> Option<usize> {
    let mut cur = start;
    loop {
        if cur <= 1 {
            return Some(start);
        }
        if cur + 1 >= intensities.len() || intensities[cur] < min_intensity {
            return Some(cur);
        }
        let (left, here, right) = (
            intensities[cur - 1],
            intensities[cur],
            intensities[cur + 1],
        );
        if right >= here && left >= here {
            return Some(cur);
        } else if right <= here {
            cur += 1;
        } else if left < here {
            cur -= 1;
        } else {
            return None;
        }
    }
}

/// Drops runs of exact zeros at both edges of `[left, right]`, keeping one
/// zero on each side that had any so the peak still starts and ends at
/// the baseline.
///
/// `None` when the window holds no nonzero point.
pub fn crop_zero_edges(intensities: &[f64], left: usize, right: usize) -> Option<(usize, usize)> {
    let first = (left..right).find(|&i| intensities[i] != 0.0)?;
    let last = ((left + 1)..=right)
        .rev()
        .find(|&i| intensities[i] != 0.0)?;

    let cropped_left = if first != left { first - 1 } else { left };
    let cropped_right = if last != right { last + 1 } else { right };
    Some((cropped_left, cropped_right))
}

/// Are there at least as many near-zero points as others in `[left, right]`?
pub fn is_mostly_zero(intensities: &[f64], left: usize, right: usize, epsilon: f64) -> bool {
    let (zeros, others) = intensities[left..=right]
        .iter()
        .fold((0usize, 0usize), |(z, o), &x| {
            if x < epsilon {
                (z + 1, o)
            } else {
                (z, o + 1)
            }
        });
    zeros >= others
}

/// Area under the intensity curve between two scan indices, as a sum of
/// trapezoids over the retention time steps.
pub fn trapezoid_area(
    intensities: &[f64],
    retention_times: &[f64],
    left: usize,
    right: usize,
) -> f64 {
    (left..right)
        .map(|i| {
            let width = retention_times[i + 1] - retention_times[i];
            let (a, b) = (intensities[i], intensities[i + 1]);
            0.5 * width * (a - b).abs() + width * a.min(b)
        })
        .sum()
}
