//! Peak picking on chromatographic mass traces by tracking ridges of
//! continuous wavelet transform maxima across scales.
//!
//! The wavelet coefficients are computed upstream; this crate takes them
//! as a [`ScaleSpace`] next to the trace [`Chromatogram`] and returns the
//! detected [`PeakCandidate`]s.
//!
//! ```no_run
//! use ridgepick::{Chromatogram, DetectionConfig, MassTrace, PeakDetector, ScaleSpace};
//!
//! # fn coefficients() -> (Vec<f64>, Vec<Vec<f64>>) { unimplemented!() }
//! let chromatogram = Chromatogram::try_new(vec![0.0, 0.1, 0.2], vec![0.0, 10.0, 0.0]).unwrap();
//! let (scales, rows) = coefficients();
//! let scale_space = ScaleSpace::try_new(scales, rows).unwrap();
//! let trace = MassTrace::try_new(301.14, chromatogram, scale_space).unwrap();
//!
//! let detector = PeakDetector::new(DetectionConfig::default());
//! for peak in detector.detect(&trace).unwrap() {
//!     println!("{} at {}", peak.apex_intensity(), peak.apex_retention_time());
//! }
//! ```
pub mod config;
pub mod errors;
pub mod models;
pub mod pipeline;
pub mod ridge;
pub mod scoring;

pub use crate::config::{
    DetectionConfig,
    RidgeConfig,
    ShapeConfig,
    SignalToNoiseConfig,
    WindowConfig,
};
pub use crate::errors::{
    PeakPickingError,
    Result,
};
pub use crate::models::{
    CandidateInfo,
    Chromatogram,
    PeakCandidate,
};
pub use crate::pipeline::{
    MassTrace,
    PeakDetector,
};
pub use crate::ridge::{
    BestPointPolicy,
    RidgeExtension,
    RidgeLine,
    RidgePoint,
    RidgeTracker,
    ScaleSpace,
};
pub use crate::scoring::{
    CandidateWindow,
    WindowRejection,
};
