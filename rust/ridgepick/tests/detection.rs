use ridgepick::{
    BestPointPolicy,
    Chromatogram,
    DetectionConfig,
    MassTrace,
    PeakDetector,
    ScaleSpace,
};

const MZ: f64 = 445.12;

/// Gaussian peaks `(center, height, width)` on scans spaced 0.01 apart,
/// with everything below 1.0 clipped to zero.
fn synthetic_trace(n: usize, peaks: &[(f64, f64, f64)]) -> (Vec<f64>, Vec<f64>) {
    let rts: Vec<f64> = (0..n).map(|i| i as f64 * 0.01).collect();
    let intensities = (0..n)
        .map(|i| {
            let x = i as f64;
            peaks
                .iter()
                .map(|(center, height, width)| height * (-(x - center).powi(2) / width).exp())
                .sum::<f64>()
        })
        .map(|v| if v >= 1.0 { v } else { 0.0 })
        .collect();
    (rts, intensities)
}

fn ricker(x: f64, scale: f64) -> f64 {
    let a = 2.0 / (3.0 * scale * std::f64::consts::PI.sqrt()).sqrt()
        * (1.0 - x.powi(2) / scale.powi(2));
    (-x.powi(2) / (2.0 * scale.powi(2))).exp() * a
}

/// Mexican hat wavelet transform, scales in units of scans.
fn wavelet_coefficients(rts: &[f64], intensities: &[f64], scales: &[f64]) -> Vec<Vec<f64>> {
    let n = rts.len();
    let spacing = (rts[n - 1] - rts[0]) / (n - 1) as f64;
    scales
        .iter()
        .map(|&scale| {
            (0..n)
                .map(|center| {
                    let lo = (center as f64 - 5.0 * scale - 1.0).round().max(0.0) as usize;
                    let hi = ((center as f64 + 5.0 * scale + 1.0).round() as usize).min(n - 1);
                    (lo..=hi)
                        .map(|i| intensities[i] * ricker(rts[i] - rts[center], scale * spacing))
                        .sum()
                })
                .collect()
        })
        .collect()
}

fn mass_trace(n: usize, peaks: &[(f64, f64, f64)]) -> MassTrace {
    let (rts, intensities) = synthetic_trace(n, peaks);
    let scales: Vec<f64> = (1..=10).map(|s| s as f64).collect();
    let coefficients = wavelet_coefficients(&rts, &intensities, &scales);
    let chromatogram = Chromatogram::try_new(rts, intensities).unwrap();
    let scale_space = ScaleSpace::try_new(scales, coefficients).unwrap();
    MassTrace::try_new(MZ, chromatogram, scale_space).unwrap()
}

fn single_peak() -> MassTrace {
    mass_trace(101, &[(50.0, 1000.0, 18.0)])
}

fn two_peaks() -> MassTrace {
    mass_trace(141, &[(30.0, 1000.0, 18.0), (110.0, 600.0, 18.0)])
}

/// Two peaks close enough that their windows touch in the valley.
fn doublet() -> MassTrace {
    mass_trace(121, &[(52.0, 1000.0, 18.0), (66.0, 700.0, 18.0)])
}

#[test]
fn test_single_peak() {
    let detector = PeakDetector::new(DetectionConfig::default());
    let peaks = detector.detect(&single_peak()).unwrap();
    assert_eq!(peaks.len(), 1);

    let peak = &peaks[0];
    let info = peak.info();
    assert_eq!(info.peak_index(), 50);
    assert_eq!(info.peak_bounds(), (38, 62));
    // Scale 7 around index 50.
    assert_eq!(info.apex_bounds(), (43, 57));
    assert_eq!(info.peak_id(), 0);
    assert_eq!(info.intensity(), 1000.0);
    assert!((info.retention_time() - 0.5).abs() < 1e-9);
    let (start, end) = info.retention_time_bounds();
    assert!((start - 0.38).abs() < 1e-9);
    assert!((end - 0.62).abs() < 1e-9);
    assert!(info.coeff_over_area() > 200.0);
    assert!(info.signal_to_noise_ratio() > 15.0);
    assert!(!info.is_shared());
    assert!(info.sharpness() > 0.0);
    assert!(info.sharpness_angle() > 0.0 && info.sharpness_angle() < std::f64::consts::PI);

    assert_eq!(peak.chromatogram().len(), 25);
    assert_eq!(peak.apex_intensity(), 1000.0);
    assert!((peak.apex_retention_time() - 0.5).abs() < 1e-9);
    assert_eq!(peak.apex_mz(), MZ);
    assert_eq!(peak.mz_range(), (MZ, MZ));
    assert_eq!(peak.shift(), 0.0);
    assert!((peak.similarity(peak) - 1.0).abs() < 1e-12);
}

#[test]
fn test_two_separate_peaks() {
    let detector = PeakDetector::new(DetectionConfig::default());
    let peaks = detector.detect(&two_peaks()).unwrap();
    assert_eq!(peaks.len(), 2);

    assert_eq!(peaks[0].info().peak_index(), 30);
    assert_eq!(peaks[0].info().peak_bounds(), (18, 42));
    assert_eq!(peaks[0].info().peak_id(), 0);

    assert_eq!(peaks[1].info().peak_index(), 110);
    assert_eq!(peaks[1].info().peak_bounds(), (99, 121));
    assert_eq!(peaks[1].info().intensity(), 600.0);
    assert_eq!(peaks[1].info().peak_id(), 1);

    // Same shape, different heights.
    assert!(peaks[0].similarity(&peaks[1]).abs() < 1e-12);
}

#[test]
fn test_touching_windows_merge() {
    let detector = PeakDetector::new(DetectionConfig::default());
    let peaks = detector.detect(&doublet()).unwrap();
    assert_eq!(peaks.len(), 1);

    let info = peaks[0].info();
    assert_eq!(info.peak_bounds(), (40, 77));
    assert_eq!(info.apex_bounds(), (48, 71));
    assert_eq!(info.peak_index(), 52);
    assert!((info.intensity() - 1000.0).abs() < 0.1);
    // Recomputed over the merged range.
    assert!(info.coeff_over_area() > 110.0 && info.coeff_over_area() < 130.0);
    assert!(info.signal_to_noise_ratio() > 12.0);
    // Both apexes end up in one peak.
    assert!(info.is_shared());
    assert_eq!(peaks[0].chromatogram().len(), 38);
}

#[test]
fn test_coefficient_over_area_threshold() {
    let mut config = DetectionConfig::default();
    config.window.min_coeff_over_area = 300.0;
    let detector = PeakDetector::new(config);
    assert!(detector.detect(&single_peak()).unwrap().is_empty());
}

#[test]
fn test_peak_width_limits() {
    let mut config = DetectionConfig::default();
    config.window.peak_width = (0.0, 0.2);
    let detector = PeakDetector::new(config);
    assert!(detector.detect(&single_peak()).unwrap().is_empty());
}

#[test]
fn test_signal_to_noise_threshold() {
    let mut config = DetectionConfig::default();
    config.signal_to_noise.min_signal_to_noise = Some(15.0);
    let peaks = PeakDetector::new(config.clone())
        .detect(&two_peaks())
        .unwrap();
    assert_eq!(peaks.len(), 2);

    config.signal_to_noise.min_signal_to_noise = Some(25.0);
    let peaks = PeakDetector::new(config).detect(&two_peaks()).unwrap();
    assert!(peaks.is_empty());
}

#[test]
fn test_best_point_policies_agree_on_single_maximum() {
    let mut config = DetectionConfig::default();
    config.ridge.best_point_policy = BestPointPolicy::HighestCorrelation;
    let peaks = PeakDetector::new(config).detect(&single_peak()).unwrap();
    assert_eq!(peaks.len(), 1);
    assert_eq!(peaks[0].info().apex_bounds(), (43, 57));
}

#[test]
fn test_detect_all_keeps_input_order() {
    let detector = PeakDetector::default();
    let results = detector.detect_all(&[two_peaks(), single_peak(), doublet()]);
    let counts: Vec<usize> = results.into_iter().map(|r| r.unwrap().len()).collect();
    assert_eq!(counts, vec![2, 1, 1]);
}

#[test]
fn test_candidates_serialize() {
    let peaks = PeakDetector::default().detect(&single_peak()).unwrap();
    let json = serde_json::to_value(&peaks[0]).unwrap();
    assert_eq!(json["apex_intensity"], 1000.0);
    assert_eq!(json["info"]["peak_index"], 50);
    assert_eq!(json["info"]["is_shared"], false);
    assert_eq!(
        json["chromatogram"]["intensities"].as_array().unwrap().len(),
        25
    );
}
