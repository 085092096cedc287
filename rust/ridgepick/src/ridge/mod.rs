//! Ridge lines: chains of wavelet correlation maxima across scales.
mod ridgeline;
mod scale_space;
mod tracker;

pub use ridgeline::{
    prefer_finest_scale,
    prefer_highest_correlation,
    BestPointPolicy,
    RidgeExtension,
    RidgeLine,
    RidgePoint,
};
pub use scale_space::ScaleSpace;
pub use tracker::RidgeTracker;
