//! Speaker resolution
//!
//! The scorer itself lives outside this crate. It receives the segments of
//! one quote and returns one score per segment, in the same order; the
//! highest score names the speaker.

use serde::{Deserialize, Serialize};

use crate::segment::alias::{AliasTable, CandidateId};
use crate::segment::builder::Segment;
use crate::segment::error::{SegmentError, SegmentResult};

/// External scorer seam
pub trait SpeakerScorer {
    fn score(&self, segments: &[Segment]) -> SegmentResult<Vec<f32>>;
}

impl<F> SpeakerScorer for F
where
    F: Fn(&[Segment]) -> Vec<f32>,
{
    fn score(&self, segments: &[Segment]) -> SegmentResult<Vec<f32>> {
        Ok(self(segments))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerPrediction {
    /// Position in the candidate order
    pub index: usize,
    pub candidate: CandidateId,
    /// Canonical alias of the candidate
    pub name: Option<String>,
    pub score: f32,
}

/// Pick the best scored candidate. NaN scores never win; `None` when no
/// candidate has a comparable score.
pub fn resolve_speaker(
    candidates: &[CandidateId],
    scores: &[f32],
    aliases: &AliasTable,
) -> SegmentResult<Option<SpeakerPrediction>> {
    if scores.len() != candidates.len() {
        return Err(SegmentError::ScoreMismatch {
            expected: candidates.len(),
            actual: scores.len(),
        });
    }

    // first index wins on ties
    let best = scores
        .iter()
        .enumerate()
        .filter(|(_, s)| !s.is_nan())
        .fold(None, |best: Option<(usize, f32)>, (i, &s)| match best {
            Some((_, b)) if s <= b => best,
            _ => Some((i, s)),
        });

    Ok(best.map(|(index, score)| {
        let candidate = candidates[index];
        SpeakerPrediction {
            index,
            candidate,
            name: aliases.canonical_name(candidate).map(str::to_string),
            score,
        }
    }))
}

/// Score segments and resolve the speaker in one call
pub fn identify_speaker<S: SpeakerScorer + ?Sized>(
    scorer: &S,
    segments: &[Segment],
    aliases: &AliasTable,
) -> SegmentResult<Option<SpeakerPrediction>> {
    let scores = scorer.score(segments)?;
    let candidates: Vec<CandidateId> = segments.iter().map(|s| s.candidate).collect();
    resolve_speaker(&candidates, &scores, aliases)
}
