mod candidate_info;
mod chromatogram;
mod peak;

pub use candidate_info::CandidateInfo;
pub use chromatogram::Chromatogram;
pub use peak::PeakCandidate;
