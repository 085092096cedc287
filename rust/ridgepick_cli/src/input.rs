use ridgepick::{
    Chromatogram,
    MassTrace,
    PeakPickingError,
    ScaleSpace,
};
use serde::Deserialize;

/// Input file layout: the traces to pick peaks on, each with the wavelet
/// coefficients already computed.
#[derive(Debug, Deserialize)]
pub struct TraceDocument {
    pub traces: Vec<TraceInput>,
}

#[derive(Debug, Deserialize)]
pub struct TraceInput {
    pub mz: f64,
    pub retention_times: Vec<f64>,
    pub intensities: Vec<f64>,
    /// Wavelet scales in units of scans, ascending.
    pub scales: Vec<f64>,
    /// One row per scale, one value per scan.
    pub coefficients: Vec<Vec<f64>>,
}

impl TraceInput {
    pub fn into_mass_trace(self) -> Result<MassTrace, PeakPickingError> {
        let chromatogram = Chromatogram::try_new(self.retention_times, self.intensities)
            .map_err(|e| e.append_to_context(" (chromatogram)"))?;
        let scale_space = ScaleSpace::try_new(self.scales, self.coefficients)
            .map_err(|e| e.append_to_context(" (scale space)"))?;
        MassTrace::try_new(self.mz, chromatogram, scale_space)
    }
}
