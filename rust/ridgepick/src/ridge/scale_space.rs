use crate::errors::{
    PeakPickingError,
    Result,
};

/// Wavelet coefficients of one trace, one row per scale.
///
/// Scales are in units of scans and strictly increasing, row `i` holds the
/// coefficient of scale `i` at every scan index of the trace.
/// The coefficients are produced upstream, this type only validates and
/// queries them.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleSpace {
    scales: Vec<f64>,
    coefficients: Vec<Vec<f64>>,
}

impl ScaleSpace {
    pub fn try_new(scales: Vec<f64>, coefficients: Vec<Vec<f64>>) -> Result<Self> {
        if scales.is_empty() {
            return Err(PeakPickingError::InvalidScales {
                context: "at least one scale is needed".to_string(),
            });
        }
        if scales.len() != coefficients.len() {
            return Err(PeakPickingError::ExpectedSlicesSameLength {
                expected: scales.len(),
                other: coefficients.len(),
                context: "one coefficient row per scale".to_string(),
            });
        }
        for (i, scale) in scales.iter().enumerate() {
            if !scale.is_finite() || *scale <= 0.0 {
                return Err(PeakPickingError::InvalidScales {
                    context: format!("scale {} at position {} is not positive and finite", scale, i),
                });
            }
            if i > 0 && *scale <= scales[i - 1] {
                return Err(PeakPickingError::InvalidScales {
                    context: format!("scales must be strictly increasing, {} after {}", scale, scales[i - 1]),
                });
            }
        }

        let num_points = coefficients[0].len();
        for row in coefficients.iter() {
            if row.len() != num_points {
                return Err(PeakPickingError::ExpectedSlicesSameLength {
                    expected: num_points,
                    other: row.len(),
                    context: "coefficient rows".to_string(),
                });
            }
            if let Some(index) = row.iter().position(|x| !x.is_finite()) {
                return Err(PeakPickingError::NonFiniteValue {
                    index,
                    context: "wavelet coefficient".to_string(),
                });
            }
        }

        Ok(Self {
            scales,
            coefficients,
        })
    }

    pub fn num_scales(&self) -> usize {
        self.scales.len()
    }

    /// Number of scan indices covered by every row.
    pub fn num_points(&self) -> usize {
        self.coefficients[0].len()
    }

    pub fn scales(&self) -> &[f64] {
        &self.scales
    }

    pub fn row(&self, scale_index: usize) -> Option<&[f64]> {
        self.coefficients.get(scale_index).map(|x| x.as_slice())
    }

    /// Coefficients of the smallest scale, used for noise estimation.
    pub fn finest_row(&self) -> &[f64] {
        &self.coefficients[0]
    }

    /// Scan indices of the maxima of one scale, strongest first.
    ///
    /// Greedy non-maximum suppression: walk the indices by decreasing
    /// coefficient, take every index not yet suppressed and suppress its
    /// neighbours closer than `cutoff` scans. Every index ends up either
    /// taken or suppressed, so flat regions still contribute maxima.
    pub fn maxima_for_scale(&self, scale_index: usize, cutoff: usize) -> Vec<usize> {
        let row = match self.row(scale_index) {
            Some(row) => row,
            None => return Vec::new(),
        };

        // Stable ascending sort, walked from the back: among equal
        // coefficients the later index comes first.
        let mut order: Vec<usize> = (0..row.len()).collect();
        order.sort_by(|&a, &b| row[a].total_cmp(&row[b]));

        let mut remaining = vec![true; row.len()];
        let mut maxima = Vec::new();
        for &idx in order.iter().rev() {
            if !remaining[idx] {
                continue;
            }
            maxima.push(idx);
            remaining[idx] = false;
            for j in 1..cutoff {
                if let Some(left) = idx.checked_sub(j) {
                    remaining[left] = false;
                }
                if idx + j < row.len() {
                    remaining[idx + j] = false;
                }
            }
        }
        maxima
    }
}
