//! From a ridge best point to a bounded, scored peak window.
pub mod boundaries;
mod shape;
mod signal_to_noise;
mod window;

pub use shape::{
    is_shared,
    sharpness_angle,
    sharpness_yang,
};
pub use signal_to_noise::{
    quantile,
    signal_to_noise,
};
pub(crate) use window::most_intense_index;
pub use window::{
    CandidateWindow,
    WindowRejection,
};
