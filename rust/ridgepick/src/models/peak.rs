use serde::Serialize;

use super::{
    CandidateInfo,
    Chromatogram,
};
use crate::errors::{
    PeakPickingError,
    Result,
};

/// A detected peak: a snapshot of its chromatogram plus values derived from it.
///
/// All derived values are computed once, at construction. Cloning copies
/// them as they are. The only mutable value is the retention time `shift`,
/// which an alignment step sets after detection.
#[derive(Debug, Clone, Serialize)]
pub struct PeakCandidate {
    chromatogram: Chromatogram,
    info: CandidateInfo,
    apex_intensity: f64,
    apex_retention_time: f64,
    apex_mz: f64,
    mz_min: f64,
    mz_max: f64,
    ret_time_min: f64,
    ret_time_max: f64,
    norm: f64,
    shift: f64,
}

impl PeakCandidate {
    /// Derives a peak from a chromatogram, taking the m/z from `info`.
    ///
    /// The chromatogram must not be empty.
    ///
    /// # Example
    ///
    /// ```
    /// use ridgepick::{CandidateInfo, Chromatogram, PeakCandidate};
    ///
    /// let chrom = Chromatogram::try_new(vec![1.0, 2.0, 3.0], vec![5.0, 10.0, 7.0]).unwrap();
    /// let peak = PeakCandidate::try_new(chrom, CandidateInfo::new(150.0)).unwrap();
    /// assert_eq!(peak.apex_retention_time(), 2.0);
    /// assert_eq!(peak.apex_intensity(), 10.0);
    /// assert!((peak.norm() - 174f64.sqrt()).abs() < 1e-12);
    /// ```
    pub fn try_new(chromatogram: Chromatogram, info: CandidateInfo) -> Result<Self> {
        let (apex_retention_time, apex_intensity) =
            chromatogram
                .apex()
                .ok_or(PeakPickingError::ExpectedNonEmptyData {
                    context: Some("peak chromatogram".to_string()),
                })?;
        let (ret_time_min, ret_time_max) = chromatogram.retention_time_range().ok_or(
            PeakPickingError::ExpectedNonEmptyData {
                context: Some("peak chromatogram".to_string()),
            },
        )?;

        let apex_mz = info.mz_value();
        let norm = chromatogram.dot(&chromatogram).sqrt();

        Ok(Self {
            chromatogram,
            info,
            apex_intensity,
            apex_retention_time,
            apex_mz,
            mz_min: apex_mz,
            mz_max: apex_mz,
            ret_time_min,
            ret_time_max,
            norm,
            shift: 0.0,
        })
    }

    /// Derives a peak with a default candidate record for the given m/z.
    pub fn from_mz(chromatogram: Chromatogram, mz: f64) -> Result<Self> {
        Self::try_new(chromatogram, CandidateInfo::new(mz))
    }

    /// Cosine similarity of the two chromatograms, pairing equal retention times.
    pub fn similarity(&self, other: &PeakCandidate) -> f64 {
        let denom = self.norm * other.norm;
        if denom == 0.0 {
            return 0.0;
        }
        self.chromatogram.dot(&other.chromatogram) / denom
    }

    pub fn set_shift(&mut self, shift: f64) {
        self.shift = shift;
    }

    pub fn shift(&self) -> f64 {
        self.shift
    }

    pub fn chromatogram(&self) -> &Chromatogram {
        &self.chromatogram
    }

    pub fn info(&self) -> &CandidateInfo {
        &self.info
    }

    pub fn apex_intensity(&self) -> f64 {
        self.apex_intensity
    }

    pub fn apex_retention_time(&self) -> f64 {
        self.apex_retention_time
    }

    pub fn apex_mz(&self) -> f64 {
        self.apex_mz
    }

    pub fn mz_range(&self) -> (f64, f64) {
        (self.mz_min, self.mz_max)
    }

    pub fn retention_time_range(&self) -> (f64, f64) {
        (self.ret_time_min, self.ret_time_max)
    }

    pub fn norm(&self) -> f64 {
        self.norm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_peak() -> PeakCandidate {
        let chrom = Chromatogram::try_new(vec![1.0, 2.0, 3.0], vec![5.0, 10.0, 7.0]).unwrap();
        PeakCandidate::from_mz(chrom, 301.2).unwrap()
    }

    #[test]
    fn test_derived_values() {
        let peak = sample_peak();
        assert_eq!(peak.apex_retention_time(), 2.0);
        assert_eq!(peak.apex_intensity(), 10.0);
        assert_eq!(peak.retention_time_range(), (1.0, 3.0));
        assert_eq!(peak.apex_mz(), 301.2);
        assert_eq!(peak.mz_range(), (301.2, 301.2));
        assert!((peak.norm() - 13.190906).abs() < 1e-6);
        assert_eq!(peak.shift(), 0.0);
        assert_eq!(peak.info().mz_value(), 301.2);
    }

    #[test]
    fn test_apex_tie_keeps_earliest() {
        let chrom =
            Chromatogram::try_new(vec![0.5, 1.0, 1.5, 2.0], vec![3.0, 8.0, 2.0, 8.0]).unwrap();
        let peak = PeakCandidate::from_mz(chrom, 10.0).unwrap();
        assert_eq!(peak.apex_retention_time(), 1.0);
        assert_eq!(peak.apex_intensity(), 8.0);
    }

    #[test]
    fn test_empty_chromatogram_is_rejected() {
        let out = PeakCandidate::from_mz(Chromatogram::default(), 10.0);
        assert!(matches!(
            out,
            Err(PeakPickingError::ExpectedNonEmptyData { .. })
        ));
    }

    #[test]
    fn test_shift_only_touches_shift() {
        let mut peak = sample_peak();
        let snapshot = peak.clone();
        peak.set_shift(0.25);
        assert_eq!(peak.shift(), 0.25);
        assert_eq!(snapshot.shift(), 0.0);
        assert_eq!(peak.norm(), snapshot.norm());
        assert_eq!(peak.apex_retention_time(), snapshot.apex_retention_time());
        assert_eq!(peak.retention_time_range(), snapshot.retention_time_range());
    }

    #[test]
    fn test_similarity() {
        let peak = sample_peak();
        assert!((peak.similarity(&peak) - 1.0).abs() < 1e-12);

        let disjoint = Chromatogram::try_new(vec![10.0, 11.0], vec![1.0, 2.0]).unwrap();
        let disjoint = PeakCandidate::from_mz(disjoint, 301.2).unwrap();
        assert_eq!(peak.similarity(&disjoint), 0.0);

        let flat = Chromatogram::try_new(vec![1.0], vec![0.0]).unwrap();
        let flat = PeakCandidate::from_mz(flat, 301.2).unwrap();
        assert_eq!(peak.similarity(&flat), 0.0);
    }
}
