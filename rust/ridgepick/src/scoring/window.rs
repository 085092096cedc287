use std::fmt::Display;

use tracing::trace;

use super::boundaries::{
    crop_zero_edges,
    fix_left_boundary,
    fix_right_boundary,
    is_mostly_zero,
    trapezoid_area,
};
use crate::config::WindowConfig;
use crate::models::Chromatogram;
use crate::ridge::RidgePoint;

/// Why a ridge best point did not turn into a peak window.
///
/// These are expected outcomes of the heuristics, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowRejection {
    /// The best point does not address a scan of the chromatogram.
    OutOfRange,
    UndecidableBoundary,
    AllZero,
    MostlyZero,
    LowCoeffOverArea,
    PeakWidthOutOfRange,
}

impl Display for WindowRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            Self::OutOfRange => "best point outside of the chromatogram",
            Self::UndecidableBoundary => "boundary walk could not pick a direction",
            Self::AllZero => "no nonzero intensity in the window",
            Self::MostlyZero => "at least half of the window is zero",
            Self::LowCoeffOverArea => "coefficient over area below threshold",
            Self::PeakWidthOutOfRange => "peak width outside of the accepted range",
        };
        write!(f, "{}", msg)
    }
}

/// Scratch state for turning one ridge into a peak.
///
/// `apex_left..=apex_right` is the raw window of half width `scale` around
/// the best point, `left_bound..=right_bound` the window after boundary
/// fixing and cropping, always with `left_bound < right_bound`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateWindow {
    pub best_point: RidgePoint,
    pub apex_left: usize,
    pub apex_right: usize,
    pub left_bound: usize,
    pub right_bound: usize,
    pub best_coefficient: f64,
    pub area: f64,
    pub coeff_over_area: f64,
}

impl CandidateWindow {
    pub fn from_ridge_point(
        best_point: RidgePoint,
        chromatogram: &Chromatogram,
        config: &WindowConfig,
    ) -> Result<Self, WindowRejection> {
        let intensities = chromatogram.intensities();
        let retention_times = chromatogram.retention_times();
        let n = chromatogram.len();
        if best_point.index >= n {
            return Err(WindowRejection::OutOfRange);
        }

        let half_width = config.half_width(best_point.scale);
        let apex_right = (best_point.index + half_width).min(n - 1);
        let apex_left = best_point.index.saturating_sub(half_width);

        let left = fix_left_boundary(intensities, apex_left, config.min_boundary_intensity)
            .ok_or(WindowRejection::UndecidableBoundary)?;
        let right = fix_right_boundary(intensities, apex_right, config.min_boundary_intensity)
            .ok_or(WindowRejection::UndecidableBoundary)?;

        // A successful crop always leaves left < right.
        let (left_bound, right_bound) =
            crop_zero_edges(intensities, left, right).ok_or(WindowRejection::AllZero)?;

        if is_mostly_zero(
            intensities,
            left_bound,
            right_bound,
            config.zero_intensity_epsilon,
        ) {
            return Err(WindowRejection::MostlyZero);
        }

        let best_coefficient = best_point.correlation;
        let area = trapezoid_area(intensities, retention_times, left_bound, right_bound);
        let coeff_over_area = best_coefficient / area;
        if !(coeff_over_area >= config.min_coeff_over_area) {
            trace!(
                "Window {}..={} rejected, coefficient over area {}",
                left_bound,
                right_bound,
                coeff_over_area
            );
            return Err(WindowRejection::LowCoeffOverArea);
        }

        let width = retention_times[right_bound] - retention_times[left_bound];
        if !config.accepts_width(width) {
            return Err(WindowRejection::PeakWidthOutOfRange);
        }

        Ok(Self {
            best_point,
            apex_left,
            apex_right,
            left_bound,
            right_bound,
            best_coefficient,
            area,
            coeff_over_area,
        })
    }

    /// Scan index of the most intense point within the bounds, the first
    /// one on ties.
    pub fn peak_index(&self, intensities: &[f64]) -> usize {
        most_intense_index(intensities, self.left_bound, self.right_bound)
    }
}

/// First index of the maximum intensity in `[left, right]`.
pub(crate) fn most_intense_index(intensities: &[f64], left: usize, right: usize) -> usize {
    let mut best = left;
    for i in left + 1..=right {
        if intensities[i] > intensities[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chromatogram(intensities: Vec<f64>) -> Chromatogram {
        let rts = (0..intensities.len()).map(|i| i as f64 * 0.1).collect();
        Chromatogram::try_new(rts, intensities).unwrap()
    }

    fn best(index: usize, scale: f64, correlation: f64) -> RidgePoint {
        RidgePoint {
            scale,
            index,
            correlation,
        }
    }

    fn bell() -> Chromatogram {
        chromatogram(vec![0.0, 0.0, 1.0, 5.0, 10.0, 5.0, 1.0, 0.0, 0.0, 0.0])
    }

    #[test]
    fn test_window_accepted() {
        let window =
            CandidateWindow::from_ridge_point(best(4, 2.0, 440.0), &bell(), &WindowConfig::default())
                .unwrap();
        assert_eq!((window.apex_left, window.apex_right), (2, 6));
        // Walked down to the zeros on both sides.
        assert_eq!((window.left_bound, window.right_bound), (1, 7));
        assert!((window.area - 2.2).abs() < 1e-9);
        assert!((window.coeff_over_area - 200.0).abs() < 1e-6);
        assert_eq!(window.best_coefficient, 440.0);
        assert_eq!(window.peak_index(bell().intensities()), 4);
    }

    #[test]
    fn test_low_coefficient_over_area() {
        let rejected =
            CandidateWindow::from_ridge_point(best(4, 2.0, 100.0), &bell(), &WindowConfig::default());
        assert_eq!(rejected, Err(WindowRejection::LowCoeffOverArea));

        let config = WindowConfig {
            min_coeff_over_area: 0.0,
            ..Default::default()
        };
        assert!(CandidateWindow::from_ridge_point(best(4, 2.0, 100.0), &bell(), &config).is_ok());
    }

    #[test]
    fn test_peak_width_range() {
        let config = WindowConfig {
            peak_width: (0.0, 0.5),
            ..Default::default()
        };
        let rejected = CandidateWindow::from_ridge_point(best(4, 2.0, 440.0), &bell(), &config);
        assert_eq!(rejected, Err(WindowRejection::PeakWidthOutOfRange));
    }

    #[test]
    fn test_zero_windows() {
        let flat = chromatogram(vec![0.0; 10]);
        let rejected =
            CandidateWindow::from_ridge_point(best(4, 2.0, 440.0), &flat, &WindowConfig::default());
        assert_eq!(rejected, Err(WindowRejection::AllZero));

        let spike = chromatogram(vec![0.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let rejected =
            CandidateWindow::from_ridge_point(best(4, 3.0, 440.0), &spike, &WindowConfig::default());
        assert_eq!(rejected, Err(WindowRejection::MostlyZero));
    }

    #[test]
    fn test_out_of_range_best_point() {
        let rejected =
            CandidateWindow::from_ridge_point(best(10, 2.0, 440.0), &bell(), &WindowConfig::default());
        assert_eq!(rejected, Err(WindowRejection::OutOfRange));
    }

    #[test]
    fn test_most_intense_index_takes_first_tie() {
        let intensities = [1.0, 4.0, 2.0, 4.0, 0.0];
        assert_eq!(most_intense_index(&intensities, 0, 4), 1);
        assert_eq!(most_intense_index(&intensities, 2, 4), 3);
        assert_eq!(most_intense_index(&intensities, 4, 4), 4);
    }
}
