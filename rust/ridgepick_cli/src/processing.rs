use indicatif::{
    ParallelProgressIterator,
    ProgressStyle,
};
use rayon::prelude::*;
use ridgepick::{
    PeakCandidate,
    PeakDetector,
};
use serde::Serialize;
use std::io::{
    BufReader,
    BufWriter,
};
use std::path::Path;
use std::time::Instant;
use tracing::{
    info,
    warn,
};

use crate::config::OutputConfig;
use crate::errors::CliError;
use crate::input::TraceDocument;

/// One detected peak, tagged with the position of its trace in the input.
#[derive(Debug, Serialize)]
pub struct OutputPeak {
    pub trace_index: usize,
    #[serde(flatten)]
    pub peak: PeakCandidate,
}

pub fn read_traces(path: &Path) -> Result<TraceDocument, CliError> {
    let st = Instant::now();
    let file = std::fs::File::open(path).map_err(|e| CliError::Io {
        source: e.to_string(),
        path: Some(path.to_string_lossy().to_string()),
    })?;
    let document: TraceDocument = serde_json::from_reader(BufReader::new(file))?;
    info!(
        "Loading {} traces took: {:?} for {}",
        document.traces.len(),
        st.elapsed(),
        path.display()
    );
    Ok(document)
}

/// Runs the detector over every trace in parallel.
///
/// Traces that fail validation or detection are logged and skipped.
pub fn process_traces(document: TraceDocument, detector: &PeakDetector) -> Vec<OutputPeak> {
    let start = Instant::now();
    let num_traces = document.traces.len();
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar());

    let results: Vec<_> = document
        .traces
        .into_par_iter()
        .enumerate()
        .progress_with_style(style)
        .map(|(i, trace)| {
            let peaks = trace
                .into_mass_trace()
                .and_then(|trace| detector.detect(&trace));
            (i, peaks)
        })
        .collect();

    let mut num_skipped = 0;
    let mut out = Vec::new();
    for (trace_index, peaks) in results {
        match peaks {
            Ok(peaks) => out.extend(
                peaks
                    .into_iter()
                    .map(|peak| OutputPeak { trace_index, peak }),
            ),
            Err(e) => {
                warn!("Skipping trace {}: {}", trace_index, e);
                num_skipped += 1;
            }
        }
    }

    info!(
        "Processed {} traces ({} skipped), found {} peaks in {:?}",
        num_traces,
        num_skipped,
        out.len(),
        start.elapsed()
    );
    out
}

pub fn write_peaks(peaks: &[OutputPeak], output: &OutputConfig) -> Result<(), CliError> {
    let io_error = |e: std::io::Error| CliError::Io {
        source: e.to_string(),
        path: Some(output.path.to_string_lossy().to_string()),
    };
    if let Some(parent) = output.path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
    }
    let file = std::fs::File::create(&output.path).map_err(io_error)?;
    let writer = BufWriter::new(file);
    if output.pretty {
        serde_json::to_writer_pretty(writer, peaks)?;
    } else {
        serde_json::to_writer(writer, peaks)?;
    }
    info!("Wrote {} peaks to {}", peaks.len(), output.path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::TraceInput;

    fn bad_trace() -> TraceInput {
        TraceInput {
            mz: 200.0,
            retention_times: vec![0.0, 0.1],
            intensities: vec![1.0],
            scales: vec![1.0],
            coefficients: vec![vec![0.0, 0.0]],
        }
    }

    fn flat_trace() -> TraceInput {
        TraceInput {
            mz: 200.0,
            retention_times: (0..8).map(|i| i as f64 * 0.1).collect(),
            intensities: vec![0.0; 8],
            scales: vec![1.0, 2.0],
            coefficients: vec![vec![0.0; 8], vec![0.0; 8]],
        }
    }

    #[test]
    fn test_bad_traces_are_skipped() {
        let document = TraceDocument {
            traces: vec![bad_trace(), flat_trace()],
        };
        let peaks = process_traces(document, &PeakDetector::default());
        assert!(peaks.is_empty());
    }
}
