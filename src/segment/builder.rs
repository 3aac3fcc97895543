//! Segment Builder - candidate-specific segments (CSS)
//!
//! For each candidate: select the anchor, slice the window between anchor
//! and quote, truncate the slice, then join it into one string and place
//! the anchor's character span in that string.
//!
//! # Slicing
//! ```text
//! anchor before quote:  [s ..= W]   anchor sentence 0,     quote_idx = W - s
//! anchor after quote:   [W ..= s]   anchor sentence s - W, quote_idx = 0
//! ```
//!
//! Offsets are counted in chars and always use the same join policy as
//! the text, so `text[left..right]` is the anchor word for both policies.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::segment::alias::CandidateId;
use crate::segment::config::{AnchorShape, JoinPolicy, SegmentConfig};
use crate::segment::error::{SegmentError, SegmentResult};
use crate::segment::locator::CandidateMentions;
use crate::segment::selector::select_anchor;
use crate::segment::truncate::{truncate, Truncated};
use crate::segment::window::{char_len, sentence_char_len, MentionPosition, Window};

// =============================================================================
// Output Types
// =============================================================================

/// Where the anchor sits in the segment text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorSpan {
    /// Sentence index inside the segment
    pub sentence: usize,
    /// Char offset of the first anchor character
    pub left: usize,
    /// Char offset one past the last anchor character
    pub right: usize,
    /// Word index inside its sentence (`AnchorShape::WithWord` only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word: Option<usize>,
}

impl AnchorSpan {
    pub fn as_tuple(&self) -> (usize, usize, usize) {
        (self.sentence, self.left, self.right)
    }

    pub fn len(&self) -> usize {
        self.right - self.left
    }

    pub fn is_empty(&self) -> bool {
        self.left == self.right
    }
}

/// One candidate-specific segment, ready for the scorer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub candidate: CandidateId,
    /// Joined segment text
    pub text: String,
    /// Word characters per sentence (separators excluded)
    pub sent_char_lens: Vec<usize>,
    pub anchor: AnchorSpan,
    /// Sentence index of the quote inside the segment
    pub quote_idx: usize,
    /// Truncated sentences the text was joined from
    pub sentences: Vec<Vec<String>>,
    /// Words the truncator deleted
    #[serde(default)]
    pub removed_words: usize,
    /// Budget forced the anchor word out; `anchor` is then zero-width
    #[serde(default)]
    pub anchor_evicted: bool,
}

impl Segment {
    /// Text under the anchor span
    pub fn anchor_text(&self) -> &str {
        char_slice(&self.text, self.anchor.left, self.anchor.right)
    }

    pub fn char_len(&self) -> usize {
        char_len(&self.text)
    }
}

/// Slice a string by char offsets
pub fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let byte_at = |n: usize| {
        text.char_indices()
            .nth(n)
            .map_or(text.len(), |(b, _)| b)
    };
    let (start, end) = (byte_at(start), byte_at(end));
    if start >= end {
        return "";
    }
    &text[start..end]
}

// =============================================================================
// Offsets & Joining
// =============================================================================

/// Join every word of every sentence with the policy's separator
pub fn join_sentences(sentences: &[Vec<String>], join: JoinPolicy) -> String {
    let words: Vec<&str> = sentences.iter().flatten().map(|w| w.as_str()).collect();
    words.join(join.separator())
}

/// Char span of `anchor` inside `join_sentences(sentences, join)`
pub fn anchor_offsets(
    sentences: &[Vec<String>],
    anchor: MentionPosition,
    join: JoinPolicy,
    evicted: bool,
) -> (usize, usize) {
    let before = &sentences[..anchor.sentence];
    let own = sentences
        .get(anchor.sentence)
        .map_or(&[][..], |s| &s[..anchor.word.min(s.len())]);

    let preceding_chars: usize =
        before.iter().map(|s| sentence_char_len(s)).sum::<usize>() + sentence_char_len(own);
    let preceding_words: usize = before.iter().map(|s| s.len()).sum::<usize>() + own.len();

    let left = preceding_chars + preceding_words * join.separator_len();
    if evicted {
        return (left, left);
    }

    let width = sentences
        .get(anchor.sentence)
        .and_then(|s| s.get(anchor.word))
        .map_or(0, |w| char_len(w));
    (left, left + width)
}

// =============================================================================
// SegmentBuilder
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct SegmentBuilder {
    config: SegmentConfig,
}

impl SegmentBuilder {
    pub fn new(config: SegmentConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SegmentConfig {
        &self.config
    }

    /// Build one segment per candidate, in `mentions` order.
    ///
    /// Any failure aborts the whole window; no partial list is returned.
    pub fn build(&self, window: &Window, mentions: &CandidateMentions) -> SegmentResult<Vec<Segment>> {
        let expected = self.config.window_len();
        if window.len() != expected || window.radius() != self.config.radius {
            return Err(SegmentError::MalformedWindow {
                expected,
                actual: window.len(),
            });
        }

        mentions
            .iter()
            .map(|(candidate, positions)| self.build_one(window, candidate, positions))
            .collect()
    }

    /// Build the segment of a single candidate
    pub fn build_one(
        &self,
        window: &Window,
        candidate: CandidateId,
        positions: &[MentionPosition],
    ) -> SegmentResult<Segment> {
        for &pos in positions {
            window.check_position(pos)?;
        }

        let nearest = select_anchor(window, positions)
            .ok_or(SegmentError::EmptyMentions { candidate })?;

        let quote = window.quote_index();
        let (slice, anchor, quote_idx) = if nearest.sentence <= quote {
            (
                window.slice_owned(nearest.sentence, quote),
                MentionPosition::new(0, nearest.word),
                quote - nearest.sentence,
            )
        } else {
            (
                window.slice_owned(quote, nearest.sentence),
                MentionPosition::new(nearest.sentence - quote, nearest.word),
                0,
            )
        };

        debug!(candidate, ?nearest, quote_idx, "anchor selected");

        let Truncated { sentences, anchor, evicted, removed } =
            truncate(slice, anchor, self.config.max_chars);

        let sent_char_lens: Vec<usize> = sentences.iter().map(|s| sentence_char_len(s)).collect();
        let (left, right) = anchor_offsets(&sentences, anchor, self.config.join, evicted);
        let text = join_sentences(&sentences, self.config.join);

        let word = match self.config.anchor_shape {
            AnchorShape::Span => None,
            AnchorShape::WithWord => Some(anchor.word),
        };

        Ok(Segment {
            candidate,
            text,
            sent_char_lens,
            anchor: AnchorSpan {
                sentence: anchor.sentence,
                left,
                right,
                word,
            },
            quote_idx,
            sentences,
            removed_words: removed,
            anchor_evicted: evicted,
        })
    }
}

/// Build segments for every located candidate
pub fn build_segments(
    window: &Window,
    mentions: &CandidateMentions,
    config: &SegmentConfig,
) -> SegmentResult<Vec<Segment>> {
    SegmentBuilder::new(config.clone()).build(window, mentions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::config::ModelVariant;

    fn words(ws: &[&str]) -> Vec<String> {
        ws.iter().map(|w| w.to_string()).collect()
    }

    fn window(sentences: &[&[&str]], radius: usize) -> Window {
        Window::new(sentences.iter().map(|s| words(s)).collect(), radius).unwrap()
    }

    #[test]
    fn test_char_slice() {
        assert_eq!(char_slice("철수가", 0, 2), "철수");
        assert_eq!(char_slice("abc", 1, 9), "bc");
        assert_eq!(char_slice("abc", 2, 2), "");
    }

    #[test]
    fn test_dense_offsets() {
        let sents = vec![words(&["ab", "cd"]), words(&["e", "NAME"])];
        let (l, r) = anchor_offsets(&sents, MentionPosition::new(1, 1), JoinPolicy::Dense, false);
        assert_eq!((l, r), (5, 9));
        assert_eq!(char_slice(&join_sentences(&sents, JoinPolicy::Dense), l, r), "NAME");
    }

    #[test]
    fn test_spaced_offsets_count_separators() {
        let sents = vec![words(&["ab", "cd"]), words(&["e", "NAME"])];
        let (l, r) = anchor_offsets(&sents, MentionPosition::new(1, 1), JoinPolicy::Spaced, false);
        let text = join_sentences(&sents, JoinPolicy::Spaced);
        assert_eq!(text, "ab cd e NAME");
        assert_eq!((l, r), (8, 12));
        assert_eq!(char_slice(&text, l, r), "NAME");
    }

    #[test]
    fn test_spaced_join_skips_empty_sentences() {
        let sents = vec![words(&["a"]), words(&[]), words(&["b"])];
        assert_eq!(join_sentences(&sents, JoinPolicy::Spaced), "a b");
        let (l, _) = anchor_offsets(&sents, MentionPosition::new(2, 0), JoinPolicy::Spaced, false);
        assert_eq!(l, 2);
    }

    #[test]
    fn test_anchor_after_quote() {
        let w = window(&[&["x"], &["\"", "hi", "\""], &["well", ",", "Bob", "said"]], 1);
        let builder = SegmentBuilder::new(SegmentConfig::default().with_radius(1));
        let seg = builder.build_one(&w, 4, &[MentionPosition::new(2, 2)]).unwrap();

        assert_eq!(seg.quote_idx, 0);
        assert_eq!(seg.anchor.sentence, 1);
        assert_eq!(seg.text, "\"hi\"well,Bobsaid");
        assert_eq!(seg.sent_char_lens, vec![4, 12]);
        assert_eq!(seg.anchor_text(), "Bob");
        assert_eq!(seg.anchor.word, None);
    }

    #[test]
    fn test_anchor_in_quote_sentence() {
        let w = window(&[&["x"], &["Bob", ",", "run"], &["y"]], 1);
        let builder = SegmentBuilder::new(SegmentConfig::default().with_radius(1));
        let seg = builder.build_one(&w, 0, &[MentionPosition::new(1, 0)]).unwrap();
        assert_eq!(seg.quote_idx, 0);
        assert_eq!(seg.sentences.len(), 1);
        assert_eq!(seg.anchor.as_tuple(), (0, 0, 3));
    }

    #[test]
    fn test_kcsn_shape_reports_word_index() {
        let w = window(&[&["then", "Bob", "spoke"], &["\"", "hi", "\""], &["y"]], 1);
        let config = SegmentConfig::for_variant(ModelVariant::Kcsn).with_radius(1);
        let seg = SegmentBuilder::new(config).build_one(&w, 0, &[MentionPosition::new(0, 1)]).unwrap();
        assert_eq!(seg.text, "then Bob spoke \" hi \"");
        assert_eq!(seg.anchor, AnchorSpan { sentence: 0, left: 5, right: 8, word: Some(1) });
        assert_eq!(seg.anchor_text(), "Bob");
    }

    #[test]
    fn test_truncation_keeps_span_consistent() {
        let w = window(
            &[&["a", "bb", "Bob", "ccc", "dddd"], &["\"", "hello", "\""], &["z"]],
            1,
        );
        let config = SegmentConfig::default().with_radius(1).with_max_chars(10);
        let seg = SegmentBuilder::new(config).build_one(&w, 0, &[MentionPosition::new(0, 2)]).unwrap();

        assert!(seg.sent_char_lens.iter().sum::<usize>() <= 10);
        assert_eq!(seg.anchor_text(), "Bob");
        assert!(!seg.anchor_evicted);
    }

    #[test]
    fn test_empty_mentions_error() {
        let w = window(&[&["x"], &["y"], &["z"]], 1);
        let builder = SegmentBuilder::new(SegmentConfig::default().with_radius(1));
        let err = builder.build_one(&w, 9, &[]).unwrap_err();
        assert!(matches!(err, SegmentError::EmptyMentions { candidate: 9 }));
    }

    #[test]
    fn test_mention_outside_window_is_an_error() {
        let w = window(&[&["x"], &["y"], &["z"]], 1);
        let builder = SegmentBuilder::new(SegmentConfig::default().with_radius(1));

        let err = builder.build_one(&w, 0, &[MentionPosition::new(5, 0)]).unwrap_err();
        assert!(matches!(err, SegmentError::MentionOutOfWindow { sentence: 5, word: 0 }));

        let err = builder
            .build_one(&w, 0, &[MentionPosition::new(0, 0), MentionPosition::new(2, 3)])
            .unwrap_err();
        assert!(matches!(err, SegmentError::MentionOutOfWindow { sentence: 2, word: 3 }));
    }

    #[test]
    fn test_radius_mismatch_is_malformed() {
        let w = window(&[&["x"], &["y"], &["z"]], 1);
        let err = build_segments(&w, &CandidateMentions::new(), &SegmentConfig::default()).unwrap_err();
        assert!(matches!(err, SegmentError::MalformedWindow { expected: 21, actual: 3 }));
    }

    #[test]
    fn test_evicted_anchor_has_zero_width_span() {
        let w = window(&[&["x"], &["\"", "hi", "\""], &["Bartholomew"]], 1);
        let config = SegmentConfig::default().with_radius(1).with_max_chars(3);
        let seg = SegmentBuilder::new(config).build_one(&w, 0, &[MentionPosition::new(2, 0)]).unwrap();
        assert!(seg.anchor_evicted);
        assert!(seg.anchor.is_empty());
        assert_eq!(seg.text, "");
    }
}
