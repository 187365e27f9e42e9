pub mod candidates;

pub use candidates::{discover_candidates, is_supported_extension, CandidateKind, ImageCandidate};
