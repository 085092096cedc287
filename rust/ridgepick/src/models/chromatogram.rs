use serde::Serialize;
use std::ops::RangeInclusive;

use crate::errors::{
    PeakPickingError,
    Result,
};

/// Ordered retention time -> intensity series of a single mass trace.
///
/// Retention times are unique and strictly increasing; the constructors
/// enforce it so every consumer can rely on positional indices being
/// scan indices in time order.
///
/// Cloning is a full structural copy, the clone owns its own buffers.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Chromatogram {
    retention_times: Vec<f64>,
    intensities: Vec<f64>,
}

impl Chromatogram {
    /// Builds a chromatogram from parallel, already sorted, arrays.
    ///
    /// # Example
    ///
    /// ```
    /// use ridgepick::Chromatogram;
    ///
    /// let chrom = Chromatogram::try_new(vec![1.0, 2.0, 3.0], vec![5.0, 10.0, 7.0]).unwrap();
    /// assert_eq!(chrom.len(), 3);
    /// assert!(Chromatogram::try_new(vec![2.0, 1.0], vec![1.0, 1.0]).is_err());
    /// ```
    pub fn try_new(retention_times: Vec<f64>, intensities: Vec<f64>) -> Result<Self> {
        if retention_times.len() != intensities.len() {
            return Err(PeakPickingError::ExpectedSlicesSameLength {
                expected: retention_times.len(),
                other: intensities.len(),
                context: "retention times vs intensities".to_string(),
            });
        }
        for (i, rt) in retention_times.iter().enumerate() {
            if !rt.is_finite() {
                return Err(PeakPickingError::NonFiniteValue {
                    index: i,
                    context: "retention time".to_string(),
                });
            }
            if i > 0 && *rt <= retention_times[i - 1] {
                return Err(PeakPickingError::UnsortedRetentionTimes {
                    index: i,
                    previous: retention_times[i - 1],
                    current: *rt,
                });
            }
        }
        if let Some(i) = intensities.iter().position(|x| !x.is_finite()) {
            return Err(PeakPickingError::NonFiniteValue {
                index: i,
                context: "intensity".to_string(),
            });
        }

        Ok(Self {
            retention_times,
            intensities,
        })
    }

    /// Builds a chromatogram from `(retention_time, intensity)` pairs in any order.
    ///
    /// Behaves like inserting every pair into an ordered map: the pairs are
    /// sorted by retention time and, for repeated retention times, the pair
    /// inserted last wins.
    pub fn from_unsorted_points(points: impl IntoIterator<Item = (f64, f64)>) -> Result<Self> {
        let mut points: Vec<(f64, f64)> = points.into_iter().collect();
        if let Some(i) = points.iter().position(|(rt, _)| !rt.is_finite()) {
            return Err(PeakPickingError::NonFiniteValue {
                index: i,
                context: "retention time".to_string(),
            });
        }
        if let Some(i) = points.iter().position(|(_, x)| !x.is_finite()) {
            return Err(PeakPickingError::NonFiniteValue {
                index: i,
                context: "intensity".to_string(),
            });
        }

        // Stable, so repeated keys keep insertion order.
        points.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut retention_times: Vec<f64> = Vec::with_capacity(points.len());
        let mut intensities: Vec<f64> = Vec::with_capacity(points.len());
        for (rt, intensity) in points {
            match retention_times.last() {
                Some(last) if *last == rt => {
                    if let Some(x) = intensities.last_mut() {
                        *x = intensity;
                    }
                }
                _ => {
                    retention_times.push(rt);
                    intensities.push(intensity);
                }
            }
        }

        Ok(Self {
            retention_times,
            intensities,
        })
    }

    pub fn len(&self) -> usize {
        self.retention_times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.retention_times.is_empty()
    }

    pub fn retention_times(&self) -> &[f64] {
        &self.retention_times
    }

    pub fn intensities(&self) -> &[f64] {
        &self.intensities
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.retention_times
            .iter()
            .copied()
            .zip(self.intensities.iter().copied())
    }

    /// First and last retention time, `None` when empty.
    pub fn retention_time_range(&self) -> Option<(f64, f64)> {
        match (self.retention_times.first(), self.retention_times.last()) {
            (Some(first), Some(last)) => Some((*first, *last)),
            _ => None,
        }
    }

    /// The `(retention_time, intensity)` of the most intense point.
    ///
    /// Ties resolve to the earliest retention time.
    pub fn apex(&self) -> Option<(f64, f64)> {
        let mut best: Option<(f64, f64)> = None;
        for (rt, intensity) in self.iter() {
            match best {
                Some((_, best_intensity)) if intensity > best_intensity => {
                    best = Some((rt, intensity))
                }
                None => best = Some((rt, intensity)),
                _ => {}
            }
        }
        best
    }

    /// Dot product of the intensities at matching retention times.
    ///
    /// Retention times present in only one of the two chromatograms
    /// contribute nothing.
    pub fn dot(&self, other: &Chromatogram) -> f64 {
        let mut i = 0;
        let mut j = 0;
        let mut out = 0.0;
        while i < self.len() && j < other.len() {
            let left = self.retention_times[i];
            let right = other.retention_times[j];
            if left < right {
                i += 1;
            } else if right < left {
                j += 1;
            } else {
                out += self.intensities[i] * other.intensities[j];
                i += 1;
                j += 1;
            }
        }
        out
    }

    /// Copies the points within an inclusive index range.
    pub fn slice(&self, range: RangeInclusive<usize>) -> Result<Chromatogram> {
        let (start, end) = (*range.start(), *range.end());
        if start > end || end >= self.len() {
            return Err(PeakPickingError::ExpectedNonEmptyData {
                context: Some(format!(
                    "slice {}..={} of a chromatogram with {} points",
                    start,
                    end,
                    self.len()
                )),
            });
        }
        Ok(Self {
            retention_times: self.retention_times[range.clone()].to_vec(),
            intensities: self.intensities[range].to_vec(),
        })
    }
}
