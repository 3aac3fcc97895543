//! Mention Locator
//!
//! Finds every position where a candidate's alias appears as a token.
//! Candidate order is first-discovery order and is part of the output
//! contract: segments, labels and scores are all aligned to it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::segment::alias::AliasTable;
use crate::segment::window::{MentionPosition, Window};

use crate::segment::alias::CandidateId;

/// Ordered mapping candidate → mention positions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateMentions {
    order: Vec<CandidateId>,
    positions: HashMap<CandidateId, Vec<MentionPosition>>,
}

impl CandidateMentions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, candidate: CandidateId, pos: MentionPosition) {
        if !self.positions.contains_key(&candidate) {
            self.order.push(candidate);
        }
        self.positions.entry(candidate).or_default().push(pos);
    }

    /// Candidates in first-discovery order
    pub fn candidates(&self) -> &[CandidateId] {
        &self.order
    }

    pub fn positions(&self, candidate: CandidateId) -> Option<&[MentionPosition]> {
        self.positions.get(&candidate).map(|p| p.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (CandidateId, &[MentionPosition])> {
        self.order
            .iter()
            .map(move |c| (*c, self.positions.get(c).map_or(&[][..], |p| p.as_slice())))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Record every alias token of the window under its candidate
pub fn locate(window: &Window, aliases: &AliasTable) -> CandidateMentions {
    let mut mentions = CandidateMentions::new();

    for (sent_idx, sentence) in window.sentences().iter().enumerate() {
        for (word_idx, word) in sentence.iter().enumerate() {
            if let Some(candidate) = aliases.get(word) {
                mentions.push(candidate, MentionPosition::new(sent_idx, word_idx));
            }
        }
    }

    mentions
}
