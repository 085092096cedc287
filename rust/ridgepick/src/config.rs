//! Tunable parameters of the peak picker.
//!
//! Every heuristic constant of the algorithm lives here with its default.
//! All sections deserialize with `#[serde(default)]`, so a config file
//! only has to name the values it changes.
//!
//! ```
//! use ridgepick::DetectionConfig;
//!
//! let config: DetectionConfig =
//!     serde_json::from_str(r#"{"window": {"min_coeff_over_area": 50.0}}"#).unwrap();
//! assert_eq!(config.window.min_coeff_over_area, 50.0);
//! assert_eq!(config.ridge.scale_epsilon, 1e-9);
//! ```

use serde::{
    Deserialize,
    Serialize,
};

use crate::ridge::BestPointPolicy;

/// Two scales closer than this are the same scale.
pub const DEFAULT_SCALE_EPSILON: f64 = 1e-9;

/// Multiplier on the scale when deriving the ridge index tolerance.
pub const DEFAULT_INDEX_TOLERANCE_FACTOR: f64 = 1.0;

/// Neighbours closer than `round(scale * this)` to a taken maximum are suppressed.
pub const DEFAULT_MAXIMA_SUPPRESSION_FACTOR: f64 = 2.5;

/// Ridges shorter than `number_of_scales - this` are dropped.
pub const DEFAULT_MIN_RIDGE_LENGTH_SLACK: usize = 3;

/// Minimum wavelet coefficient over peak area ratio.
pub const DEFAULT_MIN_COEFF_OVER_AREA: f64 = 110.0;

pub const DEFAULT_EDGE_TO_HEIGHT_RATIO: f64 = 0.3;
pub const DEFAULT_DELTA_TO_HEIGHT_RATIO: f64 = 0.2;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct DetectionConfig {
    pub ridge: RidgeConfig,
    pub window: WindowConfig,
    pub signal_to_noise: SignalToNoiseConfig,
    pub shape: ShapeConfig,
}

/// Ridge tracking parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RidgeConfig {
    pub index_tolerance_factor: f64,
    pub scale_epsilon: f64,
    pub maxima_suppression_factor: f64,
    /// Ridges whose running gap count exceeds this are no longer extended.
    /// `None` keeps feeding every ridge.
    pub max_gap_count: Option<u32>,
    pub min_ridge_length_slack: usize,
    pub best_point_policy: BestPointPolicy,
}

impl Default for RidgeConfig {
    fn default() -> Self {
        Self {
            index_tolerance_factor: DEFAULT_INDEX_TOLERANCE_FACTOR,
            scale_epsilon: DEFAULT_SCALE_EPSILON,
            maxima_suppression_factor: DEFAULT_MAXIMA_SUPPRESSION_FACTOR,
            max_gap_count: None,
            min_ridge_length_slack: DEFAULT_MIN_RIDGE_LENGTH_SLACK,
            best_point_policy: BestPointPolicy::default(),
        }
    }
}

impl RidgeConfig {
    /// How far (in scans) a ridge may move between consecutive scales is
    /// `2 * index_tolerance(scale)` (exclusive).
    ///
    /// ```
    /// use ridgepick::RidgeConfig;
    ///
    /// let config = RidgeConfig::default();
    /// assert_eq!(config.index_tolerance(2.4), 2);
    /// assert_eq!(config.index_tolerance(2.5), 3);
    /// ```
    pub fn index_tolerance(&self, scale: f64) -> usize {
        // Negative products saturate to 0 on the cast.
        (scale * self.index_tolerance_factor).round() as usize
    }

    pub fn same_scale(&self, a: f64, b: f64) -> bool {
        (a - b).abs() < self.scale_epsilon
    }

    pub fn suppression_cutoff(&self, scale: f64) -> usize {
        (scale * self.maxima_suppression_factor).round() as usize
    }

    pub fn min_ridge_length(&self, total_number_of_scales: usize) -> usize {
        total_number_of_scales.saturating_sub(self.min_ridge_length_slack)
    }
}

/// Parameters for turning a ridge apex into a bounded peak window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Half width of the initial window is `round(scale * this)` scans.
    pub window_scale_factor: f64,
    /// Boundary walking stops on points below this intensity.
    pub min_boundary_intensity: f64,
    /// Points below this intensity count as zeros.
    pub zero_intensity_epsilon: f64,
    pub min_coeff_over_area: f64,
    /// Inclusive range of accepted peak widths, in retention time units.
    pub peak_width: (f64, f64),
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            window_scale_factor: 1.0,
            min_boundary_intensity: 1.0,
            zero_intensity_epsilon: 1e-4,
            min_coeff_over_area: DEFAULT_MIN_COEFF_OVER_AREA,
            peak_width: (0.0, 10.0),
        }
    }
}

impl WindowConfig {
    pub fn half_width(&self, scale: f64) -> usize {
        (scale * self.window_scale_factor).round() as usize
    }

    pub fn accepts_width(&self, width: f64) -> bool {
        self.peak_width.0 <= width && width <= self.peak_width.1
    }
}

/// Signal to noise estimation from the finest-scale wavelet coefficients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SignalToNoiseConfig {
    /// Noise window on each side of the peak is `round(multiplier * peak_width)`.
    pub window_size_multiplier: f64,
    pub absolute_coefficients: bool,
    pub noise_quantile: f64,
    /// Candidates below this are dropped. `None` only records the value.
    pub min_signal_to_noise: Option<f64>,
}

impl Default for SignalToNoiseConfig {
    fn default() -> Self {
        Self {
            window_size_multiplier: 1.0,
            absolute_coefficients: false,
            noise_quantile: 0.95,
            min_signal_to_noise: None,
        }
    }
}

/// Thresholds of the shared peak check, relative to the apex height.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShapeConfig {
    /// A boundary at least this high makes the peak shared.
    pub edge_to_height_ratio: f64,
    /// So does a difference between both boundaries at least this high.
    pub delta_to_height_ratio: f64,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            edge_to_height_ratio: DEFAULT_EDGE_TO_HEIGHT_RATIO,
            delta_to_height_ratio: DEFAULT_DELTA_TO_HEIGHT_RATIO,
        }
    }
}
