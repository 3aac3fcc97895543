//! Error taxonomy for segment construction.
//!
//! Everything here is a caller contract violation or bad input data.
//! Budget exhaustion is not an error; it is flagged on the segment
//! itself (`Segment::anchor_evicted`).

use thiserror::Error;

use crate::segment::alias::CandidateId;

pub type SegmentResult<T> = Result<T, SegmentError>;

#[derive(Debug, Error)]
pub enum SegmentError {
    #[error("Malformed window: expected {expected} sentences, got {actual}")]
    MalformedWindow { expected: usize, actual: usize },

    #[error("Mention at sentence {sentence}, word {word} is outside the window")]
    MentionOutOfWindow { sentence: usize, word: usize },

    #[error("Candidate {candidate} has no mentions in the window")]
    EmptyMentions { candidate: CandidateId },

    #[error("Invalid config value for {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("Tokenizer failed: {0}")]
    Tokenizer(String),

    #[error("Instance format error at line {line}: {reason}")]
    InstanceFormat { line: usize, reason: String },

    #[error("Speaker '{name}' is not in the alias table")]
    UnknownSpeaker { name: String },

    #[error("Scorer returned {actual} scores for {expected} candidates")]
    ScoreMismatch { expected: usize, actual: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
