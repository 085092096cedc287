use rayon::prelude::*;
use std::time::Instant;
use tracing::{
    debug,
    info,
    trace,
};

use crate::config::{
    DetectionConfig,
    ShapeConfig,
};
use crate::errors::{
    PeakPickingError,
    Result,
};
use crate::models::{
    CandidateInfo,
    Chromatogram,
    PeakCandidate,
};
use crate::ridge::{
    RidgeTracker,
    ScaleSpace,
};
use crate::scoring::boundaries::trapezoid_area;
use crate::scoring::{
    is_shared,
    sharpness_angle,
    sharpness_yang,
    signal_to_noise,
    CandidateWindow,
};

/// One mass channel: its m/z, the chromatogram and the wavelet scale space
/// computed over that chromatogram.
#[derive(Debug, Clone)]
pub struct MassTrace {
    mz: f64,
    chromatogram: Chromatogram,
    scale_space: ScaleSpace,
}

impl MassTrace {
    pub fn try_new(mz: f64, chromatogram: Chromatogram, scale_space: ScaleSpace) -> Result<Self> {
        if !mz.is_finite() {
            return Err(PeakPickingError::NonFiniteValue {
                index: 0,
                context: "trace m/z".to_string(),
            });
        }
        if chromatogram.is_empty() {
            return Err(PeakPickingError::ExpectedNonEmptyData {
                context: Some(format!("chromatogram of trace at m/z {}", mz)),
            });
        }
        if scale_space.num_points() != chromatogram.len() {
            return Err(PeakPickingError::ExpectedSlicesSameLength {
                expected: chromatogram.len(),
                other: scale_space.num_points(),
                context: "chromatogram points vs wavelet coefficients".to_string(),
            });
        }
        Ok(Self {
            mz,
            chromatogram,
            scale_space,
        })
    }

    pub fn mz(&self) -> f64 {
        self.mz
    }

    pub fn chromatogram(&self) -> &Chromatogram {
        &self.chromatogram
    }

    pub fn scale_space(&self) -> &ScaleSpace {
        &self.scale_space
    }
}

/// A candidate record with the wavelet coefficient it was scored with,
/// needed again when overlapping candidates are merged.
#[derive(Debug, Clone)]
struct ScoredCandidate {
    info: CandidateInfo,
    best_coefficient: f64,
}

/// Runs the whole detection on mass traces.
#[derive(Debug, Clone, Default)]
pub struct PeakDetector {
    config: DetectionConfig,
}

impl PeakDetector {
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Detects the peaks of a single trace, ordered by retention time.
    ///
    /// Ridges that fail any of the window heuristics are dropped silently;
    /// errors are only returned for inconsistent data.
    #[cfg_attr(
        feature = "instrumentation",
        tracing::instrument(skip(self, trace), fields(mz = trace.mz()), level = "trace")
    )]
    pub fn detect(&self, trace: &MassTrace) -> Result<Vec<PeakCandidate>> {
        let start = Instant::now();
        let ridges = RidgeTracker::from_scale_space(&self.config.ridge, &trace.scale_space)
            .into_filtered_ridges();
        let num_ridges = ridges.len();

        let mut candidates = Vec::with_capacity(num_ridges);
        for ridge in ridges.iter() {
            let best_point = match ridge.find_best_point_with(self.config.ridge.best_point_policy) {
                Some(x) => x,
                None => {
                    trace!("Ridge with {} points has no interior maximum", ridge.len());
                    continue;
                }
            };
            let window = match CandidateWindow::from_ridge_point(
                best_point,
                &trace.chromatogram,
                &self.config.window,
            ) {
                Ok(x) => x,
                Err(reason) => {
                    trace!("Ridge at index {} rejected: {}", best_point.index, reason);
                    continue;
                }
            };
            if let Some(candidate) = self.score_window(trace, &window) {
                candidates.push(candidate);
            }
        }
        let num_scored = candidates.len();

        let merged = merge_overlapping(candidates, trace, &self.config)?;
        let peaks = merged
            .into_iter()
            .enumerate()
            .map(|(peak_id, candidate)| {
                let (left, right) = candidate.info.peak_bounds();
                let chromatogram = trace.chromatogram.slice(left..=right)?;
                PeakCandidate::try_new(chromatogram, candidate.info.with_peak_id(peak_id as u32))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Trace at m/z {}: {} ridges, {} scored windows, {} peaks in {:?}",
            trace.mz,
            num_ridges,
            num_scored,
            peaks.len(),
            start.elapsed()
        );
        Ok(peaks)
    }

    /// Detects peaks on many traces in parallel, one result per trace in
    /// input order.
    pub fn detect_all(&self, traces: &[MassTrace]) -> Vec<Result<Vec<PeakCandidate>>> {
        let start = Instant::now();

        #[cfg(not(feature = "serial_detection"))]
        let results: Vec<Result<Vec<PeakCandidate>>> =
            traces.par_iter().map(|t| self.detect(t)).collect();

        #[cfg(feature = "serial_detection")]
        let results: Vec<Result<Vec<PeakCandidate>>> =
            traces.iter().map(|t| self.detect(t)).collect();

        let num_peaks: usize = results
            .iter()
            .filter_map(|r| r.as_ref().ok())
            .map(|x| x.len())
            .sum();
        info!(
            "Detected {} peaks on {} traces in {:?}",
            num_peaks,
            traces.len(),
            start.elapsed()
        );
        results
    }

    fn score_window(&self, trace: &MassTrace, window: &CandidateWindow) -> Option<ScoredCandidate> {
        let sn_config = &self.config.signal_to_noise;
        let sn = match signal_to_noise(
            trace.scale_space.finest_row(),
            window.best_coefficient,
            window.left_bound,
            window.right_bound,
            sn_config,
        ) {
            Ok(x) => x,
            Err(e) => {
                trace!("No signal to noise for window at {}: {}", window.left_bound, e);
                return None;
            }
        };
        if let Some(min_sn) = sn_config.min_signal_to_noise {
            if !(sn >= min_sn) {
                trace!("Window at {} below signal to noise: {}", window.left_bound, sn);
                return None;
            }
        }

        let intensities = trace.chromatogram.intensities();
        let rts = trace.chromatogram.retention_times();
        let peak_index = window.peak_index(intensities);
        let info = CandidateInfo::new(trace.mz)
            .with_intensity(intensities[peak_index])
            .with_peak_index(peak_index)
            .with_retention_time(rts[peak_index])
            .with_retention_time_bounds(rts[window.left_bound], rts[window.right_bound])
            .with_apex_bounds(window.apex_left, window.apex_right)
            .with_peak_bounds(window.left_bound, window.right_bound)
            .with_signal_to_noise_ratio(sn)
            .with_coeff_over_area(window.coeff_over_area);
        Some(ScoredCandidate {
            info: with_shape(info, trace, &self.config.shape),
            best_coefficient: window.best_coefficient,
        })
    }
}

/// Folds candidates whose peak ranges overlap, walking them by peak index.
///
/// A merge widens the last kept candidate, which can then reach back over
/// the ones kept before it; those are folded in until the kept list is
/// free of overlaps again.
fn merge_overlapping(
    mut candidates: Vec<ScoredCandidate>,
    trace: &MassTrace,
    config: &DetectionConfig,
) -> Result<Vec<ScoredCandidate>> {
    candidates.sort_by(|a, b| a.info.cmp(&b.info));

    let mut kept: Vec<ScoredCandidate> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let mut current = candidate;
        while let Some(last) = kept.last() {
            if !last.info.overlaps(&current.info) {
                break;
            }
            current = merge_pair(last, &current, trace, config)?;
            kept.pop();
        }
        kept.push(current);
    }
    Ok(kept)
}

fn merge_pair(
    a: &ScoredCandidate,
    b: &ScoredCandidate,
    trace: &MassTrace,
    config: &DetectionConfig,
) -> Result<ScoredCandidate> {
    let merged = CandidateInfo::merge(&a.info, &b.info)?;
    let best_coefficient = a.best_coefficient.max(b.best_coefficient);

    let intensities = trace.chromatogram.intensities();
    let rts = trace.chromatogram.retention_times();
    let (left, right) = merged.peak_bounds();
    // Taken from the more intense side, so within the merged bounds.
    let peak_index = merged.peak_index();

    let area = trapezoid_area(intensities, rts, left, right);
    let sn = signal_to_noise(
        trace.scale_space.finest_row(),
        best_coefficient,
        left,
        right,
        &config.signal_to_noise,
    )
    .unwrap_or_else(|_| {
        a.info
            .signal_to_noise_ratio()
            .max(b.info.signal_to_noise_ratio())
    });

    let info = merged
        .with_peak_index(peak_index)
        .with_intensity(intensities[peak_index])
        .with_retention_time(rts[peak_index])
        .with_retention_time_bounds(rts[left], rts[right])
        .with_signal_to_noise_ratio(sn)
        .with_coeff_over_area(best_coefficient / area);
    Ok(ScoredCandidate {
        info: with_shape(info, trace, &config.shape),
        best_coefficient,
    })
}

/// Shape descriptors over the peak bounds already set on `info`.
fn with_shape(info: CandidateInfo, trace: &MassTrace, config: &ShapeConfig) -> CandidateInfo {
    let intensities = trace.chromatogram.intensities();
    let (left, right) = info.peak_bounds();
    let sharpness = sharpness_yang(intensities, trace.chromatogram.retention_times(), left, right);
    let angle = sharpness_angle(intensities, left, right);
    let shared = is_shared(
        &intensities[left..=right],
        config.edge_to_height_ratio,
        config.delta_to_height_ratio,
    );
    info.with_sharpness(sharpness)
        .with_sharpness_angle(angle)
        .with_shared(shared)
}
