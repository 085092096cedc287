use tracing::debug;

use super::{
    RidgeLine,
    RidgePoint,
    ScaleSpace,
};
use crate::config::RidgeConfig;

/// The pool of ridge lines growing over one trace.
///
/// Maxima are fed one scale at a time. Every maximum is offered to every
/// open ridge and may extend more than one of them; a maximum nobody
/// accepts seeds a new ridge.
#[derive(Debug)]
pub struct RidgeTracker<'a> {
    config: &'a RidgeConfig,
    total_number_of_scales: usize,
    ridges: Vec<RidgeLine>,
}

impl<'a> RidgeTracker<'a> {
    pub fn new(config: &'a RidgeConfig, total_number_of_scales: usize) -> Self {
        Self {
            config,
            total_number_of_scales,
            ridges: Vec::new(),
        }
    }

    /// Tracks ridges over a whole scale space, from the coarsest scale to the finest.
    ///
    /// Coarse scales have few, well separated maxima, so they make the
    /// seeds that finer scales then attach to.
    pub fn from_scale_space(config: &'a RidgeConfig, scale_space: &ScaleSpace) -> Self {
        let mut tracker = Self::new(config, scale_space.num_scales());
        for scale_index in (0..scale_space.num_scales()).rev() {
            let scale = scale_space.scales()[scale_index];
            let row = match scale_space.row(scale_index) {
                Some(row) => row,
                None => continue,
            };
            let maxima: Vec<(usize, f64)> = scale_space
                .maxima_for_scale(scale_index, config.suppression_cutoff(scale))
                .into_iter()
                .map(|idx| (idx, row[idx]))
                .collect();
            tracker.feed_scale(scale, &maxima);
        }
        debug!(
            "Tracked {} ridges over {} scales",
            tracker.ridges.len(),
            tracker.total_number_of_scales
        );
        tracker
    }

    /// Offers the `(index, correlation)` maxima of one scale to the pool.
    pub fn feed_scale(&mut self, scale: f64, maxima: &[(usize, f64)]) {
        let config = self.config;
        for &(index, correlation) in maxima {
            let mut matched = false;
            for ridge in self.ridges.iter_mut().filter(|r| is_open(config, r)) {
                if ridge
                    .try_add_point(scale, index, correlation, config)
                    .accepted()
                {
                    matched = true;
                }
            }
            if !matched {
                self.ridges.push(RidgeLine::new(
                    RidgePoint {
                        scale,
                        index,
                        correlation,
                    },
                    self.total_number_of_scales,
                ));
            }
        }
    }

    pub fn ridges(&self) -> &[RidgeLine] {
        &self.ridges
    }

    /// Consumes the tracker, keeping only ridges long enough to span
    /// (almost) every scale.
    pub fn into_filtered_ridges(self) -> Vec<RidgeLine> {
        let min_length = self.config.min_ridge_length(self.total_number_of_scales);
        let total = self.ridges.len();
        let kept: Vec<RidgeLine> = self
            .ridges
            .into_iter()
            .filter(|r| r.len() >= min_length)
            .collect();
        debug!(
            "Kept {} of {} ridges with at least {} points",
            kept.len(),
            total,
            min_length
        );
        kept
    }
}

fn is_open(config: &RidgeConfig, ridge: &RidgeLine) -> bool {
    match config.max_gap_count {
        Some(max_gap) => ridge.running_gap_count() <= max_gap,
        None => true,
    }
}
