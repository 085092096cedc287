use serde::{
    Deserialize,
    Serialize,
};

use crate::config::RidgeConfig;

/// One wavelet correlation maximum: the scale it was found at, the scan
/// index and the coefficient value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RidgePoint {
    pub scale: f64,
    pub index: usize,
    pub correlation: f64,
}

/// Outcome of offering a point to a ridge line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RidgeExtension {
    /// Appended at a new scale.
    Extended,
    /// Swapped for the last point, which was at the same scale.
    Replaced,
    /// The ridge did not change.
    Rejected,
}

impl RidgeExtension {
    pub fn accepted(self) -> bool {
        !matches!(self, RidgeExtension::Rejected)
    }
}

/// Which interior local maximum of a ridge becomes its best point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BestPointPolicy {
    /// The maximum at the smallest scale, regardless of its correlation.
    ///
    /// This favors fine-scale detections over strong coarse ones.
    /// It is the historical ADAP behavior and kept as the default.
    #[default]
    FinestScale,
    /// The maximum with the largest correlation.
    HighestCorrelation,
}

impl BestPointPolicy {
    /// Does `candidate` replace `incumbent` as best point?
    pub fn prefers(self, candidate: &RidgePoint, incumbent: &RidgePoint) -> bool {
        match self {
            BestPointPolicy::FinestScale => prefer_finest_scale(candidate, incumbent),
            BestPointPolicy::HighestCorrelation => {
                prefer_highest_correlation(candidate, incumbent)
            }
        }
    }
}

pub fn prefer_finest_scale(candidate: &RidgePoint, incumbent: &RidgePoint) -> bool {
    candidate.scale < incumbent.scale
}

pub fn prefer_highest_correlation(candidate: &RidgePoint, incumbent: &RidgePoint) -> bool {
    candidate.correlation > incumbent.correlation
}

/// A connected path of wavelet correlation maxima across scales.
///
/// A ridge always holds at least its seed point. Points are kept in the
/// order they were accepted, so scale, index and correlation of a point
/// can never get out of step.
#[derive(Debug, Clone)]
pub struct RidgeLine {
    points: Vec<RidgePoint>,
    running_gap_count: u32,
    total_number_of_scales: usize,
}

impl RidgeLine {
    pub fn new(seed: RidgePoint, total_number_of_scales: usize) -> Self {
        Self {
            points: vec![seed],
            running_gap_count: 0,
            total_number_of_scales,
        }
    }

    /// Offers the maximum found at `index` on `scale` to this ridge.
    ///
    /// At a new scale the point is appended when it is closer than
    /// `2 * round(scale)` scans to the last point; otherwise the gap
    /// counter grows.
    ///
    /// At the scale the ridge already holds last, the point can only
    /// replace the last one:
    /// - with two or more points, if it sits closer to the second to last
    ///   point than the current last point does,
    /// - with only the seed, if it is within tolerance and has a higher
    ///   correlation.
    ///
    /// Same-scale offers never touch the gap counter.
    ///
    /// ```
    /// use ridgepick::{RidgeConfig, RidgeExtension, RidgeLine, RidgePoint};
    ///
    /// let config = RidgeConfig::default();
    /// let seed = RidgePoint { scale: 5.0, index: 40, correlation: 1.0 };
    /// let mut ridge = RidgeLine::new(seed, 10);
    ///
    /// assert_eq!(ridge.try_add_point(4.0, 45, 2.0, &config), RidgeExtension::Extended);
    /// assert_eq!(ridge.try_add_point(3.0, 60, 2.0, &config), RidgeExtension::Rejected);
    /// assert_eq!(ridge.running_gap_count(), 1);
    /// assert_eq!(ridge.try_add_point(4.0, 41, 0.5, &config), RidgeExtension::Replaced);
    /// assert_eq!(ridge.len(), 2);
    /// ```
    pub fn try_add_point(
        &mut self,
        scale: f64,
        index: usize,
        correlation: f64,
        config: &RidgeConfig,
    ) -> RidgeExtension {
        let index_tolerance = config.index_tolerance(scale);
        let last_pos = self.points.len() - 1;
        let last = self.points[last_pos];
        let index_diff = index.abs_diff(last.index);

        if !config.same_scale(last.scale, scale) {
            if index_diff < 2 * index_tolerance {
                self.points.push(RidgePoint {
                    scale,
                    index,
                    correlation,
                });
                self.running_gap_count = 0;
                return RidgeExtension::Extended;
            }
            self.running_gap_count += 1;
            return RidgeExtension::Rejected;
        }

        let replace = if last_pos > 0 {
            let previous = self.points[last_pos - 1];
            previous.index.abs_diff(index) < previous.index.abs_diff(last.index)
        } else {
            index_diff < 2 * index_tolerance && correlation > last.correlation
        };

        if !replace {
            return RidgeExtension::Rejected;
        }
        let last = &mut self.points[last_pos];
        last.index = index;
        last.correlation = correlation;
        RidgeExtension::Replaced
    }

    /// Best point using the historical finest-scale rule.
    ///
    /// Candidates are the interior points whose correlation is strictly
    /// larger than both neighbours (the first and last points never
    /// qualify). Among those, the one with the smallest nonzero scale wins,
    /// the first one on ties. `None` when no interior maximum exists.
    pub fn find_best_point(&self) -> Option<RidgePoint> {
        self.find_best_point_by(prefer_finest_scale)
    }

    pub fn find_best_point_with(&self, policy: BestPointPolicy) -> Option<RidgePoint> {
        self.find_best_point_by(|candidate, incumbent| policy.prefers(candidate, incumbent))
    }

    /// Best point with a custom preference, `prefer(candidate, incumbent)`
    /// returns true when `candidate` should take over.
    pub fn find_best_point_by<F>(&self, mut prefer: F) -> Option<RidgePoint>
    where
        F: FnMut(&RidgePoint, &RidgePoint) -> bool,
    {
        let mut best: Option<RidgePoint> = None;
        for window in self.points.windows(3) {
            let (before, point, after) = (window[0], window[1], window[2]);
            let is_local_max =
                point.correlation > before.correlation && point.correlation > after.correlation;
            if !is_local_max || point.scale == 0.0 {
                continue;
            }
            best = match best {
                Some(incumbent) if !prefer(&point, &incumbent) => Some(incumbent),
                _ => Some(point),
            };
        }
        best
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Never true, a ridge holds at least its seed.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[RidgePoint] {
        &self.points
    }

    pub fn scales(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.scale)
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.points.iter().map(|p| p.index)
    }

    pub fn correlations(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.correlation)
    }

    pub fn last_point(&self) -> RidgePoint {
        self.points[self.points.len() - 1]
    }

    pub fn running_gap_count(&self) -> u32 {
        self.running_gap_count
    }

    pub fn total_number_of_scales(&self) -> usize {
        self.total_number_of_scales
    }
}
