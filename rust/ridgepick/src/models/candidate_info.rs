use serde::{
    Deserialize,
    Serialize,
};
use std::cmp::Ordering;

use crate::errors::{
    PeakPickingError,
    Result,
};

/// Index-space bookkeeping for one detected peak on a mass trace.
///
/// Indices are scan indices into the trace chromatogram.
/// The apex pair is the raw, scale derived, window around the ridge
/// apex; the peak pair is the final boundary after boundary fixing.
/// Shape descriptors are measured over the peak pair.
///
/// Equality and ordering only look at `peak_index`, so sorting a list of
/// candidates orders them along the trace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateInfo {
    retention_time: f64,
    mz_value: f64,
    intensity: f64,
    retention_time_start: f64,
    retention_time_end: f64,
    peak_id: u32,
    peak_index: usize,
    left_apex_index: usize,
    right_apex_index: usize,
    left_peak_index: usize,
    right_peak_index: usize,
    signal_to_noise_ratio: f64,
    coeff_over_area: f64,
    sharpness: f64,
    sharpness_angle: f64,
    is_shared: bool,
}

impl CandidateInfo {
    pub fn new(mz_value: f64) -> Self {
        Self {
            mz_value,
            ..Default::default()
        }
    }

    /// Merges two overlapping candidates of the same mass channel.
    ///
    /// The intensity and peak index come together from the more intense
    /// candidate (`a` on ties), the bounds are the union of both.
    /// Timing, signal to noise, coefficient/area and shape are left at
    /// their defaults; they depend on the merged range and have to be recomputed
    /// by the caller.
    ///
    /// # Example
    ///
    /// ```
    /// use ridgepick::CandidateInfo;
    ///
    /// let a = CandidateInfo::new(100.0)
    ///     .with_intensity(50.0)
    ///     .with_peak_index(3)
    ///     .with_apex_bounds(1, 5);
    /// let b = CandidateInfo::new(100.0)
    ///     .with_intensity(80.0)
    ///     .with_peak_index(7)
    ///     .with_apex_bounds(4, 9);
    ///
    /// let merged = CandidateInfo::merge(&a, &b).unwrap();
    /// assert_eq!(merged.intensity(), 80.0);
    /// assert_eq!(merged.peak_index(), 7);
    /// assert_eq!(merged.apex_bounds(), (1, 9));
    ///
    /// let other_channel = CandidateInfo::new(101.0);
    /// assert!(CandidateInfo::merge(&a, &other_channel).is_err());
    /// ```
    pub fn merge(a: &CandidateInfo, b: &CandidateInfo) -> Result<CandidateInfo> {
        if a.mz_value != b.mz_value {
            return Err(PeakPickingError::MzConflict {
                left: a.mz_value,
                right: b.mz_value,
            });
        }

        let (intensity, peak_index) = if b.intensity > a.intensity {
            (b.intensity, b.peak_index)
        } else {
            (a.intensity, a.peak_index)
        };

        Ok(CandidateInfo {
            mz_value: a.mz_value,
            intensity,
            peak_index,
            left_apex_index: a.left_apex_index.min(b.left_apex_index),
            right_apex_index: a.right_apex_index.max(b.right_apex_index),
            left_peak_index: a.left_peak_index.min(b.left_peak_index),
            right_peak_index: a.right_peak_index.max(b.right_peak_index),
            ..Default::default()
        })
    }

    /// True when the peak index ranges of both candidates share a scan.
    pub fn overlaps(&self, other: &CandidateInfo) -> bool {
        self.left_peak_index <= other.right_peak_index
            && other.left_peak_index <= self.right_peak_index
    }

    pub fn with_retention_time(mut self, retention_time: f64) -> Self {
        self.retention_time = retention_time;
        self
    }

    pub fn with_mz_value(mut self, mz_value: f64) -> Self {
        self.mz_value = mz_value;
        self
    }

    pub fn with_intensity(mut self, intensity: f64) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_retention_time_bounds(mut self, start: f64, end: f64) -> Self {
        self.retention_time_start = start;
        self.retention_time_end = end;
        self
    }

    pub fn with_peak_id(mut self, peak_id: u32) -> Self {
        self.peak_id = peak_id;
        self
    }

    pub fn with_peak_index(mut self, peak_index: usize) -> Self {
        self.peak_index = peak_index;
        self
    }

    pub fn with_apex_bounds(mut self, left: usize, right: usize) -> Self {
        self.left_apex_index = left;
        self.right_apex_index = right;
        self
    }

    pub fn with_peak_bounds(mut self, left: usize, right: usize) -> Self {
        self.left_peak_index = left;
        self.right_peak_index = right;
        self
    }

    pub fn with_signal_to_noise_ratio(mut self, signal_to_noise_ratio: f64) -> Self {
        self.signal_to_noise_ratio = signal_to_noise_ratio;
        self
    }

    pub fn with_coeff_over_area(mut self, coeff_over_area: f64) -> Self {
        self.coeff_over_area = coeff_over_area;
        self
    }

    pub fn with_sharpness(mut self, sharpness: f64) -> Self {
        self.sharpness = sharpness;
        self
    }

    pub fn with_sharpness_angle(mut self, sharpness_angle: f64) -> Self {
        self.sharpness_angle = sharpness_angle;
        self
    }

    pub fn with_shared(mut self, is_shared: bool) -> Self {
        self.is_shared = is_shared;
        self
    }

    pub fn retention_time(&self) -> f64 {
        self.retention_time
    }

    pub fn mz_value(&self) -> f64 {
        self.mz_value
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    pub fn retention_time_bounds(&self) -> (f64, f64) {
        (self.retention_time_start, self.retention_time_end)
    }

    pub fn peak_id(&self) -> u32 {
        self.peak_id
    }

    pub fn peak_index(&self) -> usize {
        self.peak_index
    }

    /// `(left_apex_index, right_apex_index)`
    pub fn apex_bounds(&self) -> (usize, usize) {
        (self.left_apex_index, self.right_apex_index)
    }

    /// `(left_peak_index, right_peak_index)`
    pub fn peak_bounds(&self) -> (usize, usize) {
        (self.left_peak_index, self.right_peak_index)
    }

    pub fn signal_to_noise_ratio(&self) -> f64 {
        self.signal_to_noise_ratio
    }

    pub fn coeff_over_area(&self) -> f64 {
        self.coeff_over_area
    }

    /// Median flank slope above a quarter of the height, `-1.0` when undefined.
    pub fn sharpness(&self) -> f64 {
        self.sharpness
    }

    /// Apex angle in radians between the mean flank slopes.
    pub fn sharpness_angle(&self) -> f64 {
        self.sharpness_angle
    }

    pub fn is_shared(&self) -> bool {
        self.is_shared
    }
}

impl PartialEq for CandidateInfo {
    fn eq(&self, other: &Self) -> bool {
        self.peak_index == other.peak_index
    }
}

impl Eq for CandidateInfo {}

impl PartialOrd for CandidateInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CandidateInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.peak_index.cmp(&other.peak_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(mz: f64, intensity: f64, peak_index: usize, apex: (usize, usize)) -> CandidateInfo {
        CandidateInfo::new(mz)
            .with_intensity(intensity)
            .with_peak_index(peak_index)
            .with_apex_bounds(apex.0, apex.1)
    }

    #[test]
    fn test_merge_takes_the_more_intense_apex() {
        let a = candidate(100.0, 50.0, 3, (1, 5)).with_peak_bounds(0, 6);
        let b = candidate(100.0, 80.0, 7, (4, 9)).with_peak_bounds(3, 11);

        let merged = CandidateInfo::merge(&a, &b).unwrap();
        assert_eq!(merged.mz_value(), 100.0);
        assert_eq!(merged.intensity(), 80.0);
        assert_eq!(merged.peak_index(), 7);
        assert_eq!(merged.apex_bounds(), (1, 9));
        assert_eq!(merged.peak_bounds(), (0, 11));

        // Symmetric in the bounds, the apex follows the intensity.
        let merged = CandidateInfo::merge(&b, &a).unwrap();
        assert_eq!(merged.peak_index(), 7);
        assert_eq!(merged.apex_bounds(), (1, 9));
    }

    #[test]
    fn test_merge_ties_favor_the_first_operand() {
        let a = candidate(250.0, 10.0, 2, (0, 4));
        let b = candidate(250.0, 10.0, 6, (3, 8));
        assert_eq!(CandidateInfo::merge(&a, &b).unwrap().peak_index(), 2);
        assert_eq!(CandidateInfo::merge(&b, &a).unwrap().peak_index(), 6);
    }

    #[test]
    fn test_merge_resets_derived_fields() {
        let a = candidate(250.0, 10.0, 2, (0, 4))
            .with_retention_time(1.5)
            .with_signal_to_noise_ratio(12.0)
            .with_coeff_over_area(300.0)
            .with_sharpness(2.0)
            .with_shared(true)
            .with_peak_id(4);
        let b = candidate(250.0, 5.0, 6, (3, 8)).with_retention_time(2.5);

        let merged = CandidateInfo::merge(&a, &b).unwrap();
        assert_eq!(merged.retention_time(), 0.0);
        assert_eq!(merged.retention_time_bounds(), (0.0, 0.0));
        assert_eq!(merged.signal_to_noise_ratio(), 0.0);
        assert_eq!(merged.coeff_over_area(), 0.0);
        assert_eq!(merged.peak_id(), 0);
        assert_eq!(merged.sharpness(), 0.0);
        assert!(!merged.is_shared());
        // Inputs are untouched.
        assert_eq!(a.retention_time(), 1.5);
    }

    #[test]
    fn test_merge_rejects_different_channels() {
        let a = candidate(100.0, 50.0, 3, (1, 5));
        let b = candidate(100.0 + 1e-12, 80.0, 7, (4, 9));
        match CandidateInfo::merge(&a, &b) {
            Err(PeakPickingError::MzConflict { left, right }) => {
                assert_eq!(left, 100.0);
                assert_eq!(right, 100.0 + 1e-12);
            }
            other => panic!("Expected a conflict, got {:?}", other),
        }
    }

    #[test]
    fn test_ordering_by_peak_index() {
        let mut infos = vec![
            candidate(1.0, 5.0, 9, (0, 0)),
            candidate(1.0, 50.0, 2, (0, 0)),
            candidate(1.0, 1.0, 4, (0, 0)),
        ];
        infos.sort();
        let order: Vec<usize> = infos.iter().map(|x| x.peak_index()).collect();
        assert_eq!(order, vec![2, 4, 9]);
    }

    #[test]
    fn test_overlaps() {
        let a = CandidateInfo::new(1.0).with_peak_bounds(2, 6);
        let b = CandidateInfo::new(1.0).with_peak_bounds(6, 9);
        let c = CandidateInfo::new(1.0).with_peak_bounds(7, 9);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }
}
