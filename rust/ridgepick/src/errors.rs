use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum PeakPickingError {
    /// Two candidates were asked to merge but belong to different mass channels.
    MzConflict {
        left: f64,
        right: f64,
    },
    /// A chromatogram (or a derived window) had no data points.
    ExpectedNonEmptyData {
        context: Option<String>,
    },
    ExpectedSlicesSameLength {
        expected: usize,
        other: usize,
        context: String,
    },
    UnsortedRetentionTimes {
        index: usize,
        previous: f64,
        current: f64,
    },
    NonFiniteValue {
        index: usize,
        context: String,
    },
    InvalidScales {
        context: String,
    },
    InsufficientData {
        real: usize,
        expected: usize,
    },
    /// Quantiles are only estimated for probabilities strictly between 0 and 1.
    InvalidQuantile {
        probability: f64,
    },
}

impl PeakPickingError {
    pub fn append_to_context(mut self, context: &str) -> Self {
        match &mut self {
            PeakPickingError::ExpectedNonEmptyData {
                context: owned_context,
            } => match owned_context {
                Some(x) => x.push_str(context),
                None => *owned_context = Some(context.to_string()),
            },
            PeakPickingError::ExpectedSlicesSameLength {
                context: owned_context,
                ..
            }
            | PeakPickingError::NonFiniteValue {
                context: owned_context,
                ..
            }
            | PeakPickingError::InvalidScales {
                context: owned_context,
            } => {
                owned_context.push_str(context);
            }
            // No free-form context on these.
            PeakPickingError::MzConflict { .. }
            | PeakPickingError::UnsortedRetentionTimes { .. }
            | PeakPickingError::InsufficientData { .. }
            | PeakPickingError::InvalidQuantile { .. } => {}
        }
        self
    }
}

impl Display for PeakPickingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MzConflict { left, right } => write!(
                f,
                "Cannot merge candidates from different mass channels: {} != {}",
                left, right
            ),
            Self::ExpectedNonEmptyData { context } => match context {
                Some(context) => write!(f, "Expected non-empty data: {}", context),
                None => write!(f, "Expected non-empty data"),
            },
            Self::ExpectedSlicesSameLength {
                expected,
                other,
                context,
            } => write!(
                f,
                "Expected slices of the same length ({} vs {}): {}",
                expected, other, context
            ),
            Self::UnsortedRetentionTimes {
                index,
                previous,
                current,
            } => write!(
                f,
                "Retention times must be strictly increasing, found {} after {} at index {}",
                current, previous, index
            ),
            Self::NonFiniteValue { index, context } => {
                write!(f, "Non-finite value at index {}: {}", index, context)
            }
            Self::InvalidScales { context } => write!(f, "Invalid wavelet scales: {}", context),
            Self::InsufficientData { real, expected } => write!(
                f,
                "Insufficient data, got {} values but at least {} are needed",
                real, expected
            ),
            Self::InvalidQuantile { probability } => write!(
                f,
                "Quantile probability must be in (0, 1), got {}",
                probability
            ),
        }
    }
}

impl std::error::Error for PeakPickingError {}

pub type Result<T> = std::result::Result<T, PeakPickingError>;
