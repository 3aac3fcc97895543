//! Nearest-Mention Selector
//!
//! Picks the one mention per candidate that anchors its segment.
//!
//! # Distance (in words, quote sentence at `W`)
//! - mention inside the quote sentence: `2W`, so any cross-sentence
//!   mention within reach outranks it
//! - mention before the quote: words after it in its sentence plus every
//!   word of the sentences between it and the quote
//! - mention after the quote: words before it in its sentence plus every
//!   word of the sentences between the quote and it
//!
//! # Colon rule
//! When the sentence right before the quote ends with `：` ("X said："),
//! the nearest mention *before* the quote wins even if a mention after the
//! quote is closer.

use crate::segment::window::{MentionPosition, Window};

/// Word-level distance between a mention and the quote sentence
pub fn word_distance(window: &Window, pos: MentionPosition) -> usize {
    let quote = window.quote_index();

    if pos.sentence == quote {
        return quote * 2;
    }

    if pos.sentence < quote {
        let between: usize = (pos.sentence + 1..quote).map(|i| window.sentence_len(i)).sum();
        let after_mention = window
            .sentence_len(pos.sentence)
            .saturating_sub(pos.word + 1);
        between + after_mention
    } else {
        let between: usize = (quote + 1..pos.sentence).map(|i| window.sentence_len(i)).sum();
        between + pos.word
    }
}

/// Mentions sorted by distance; equal distances keep their input order
pub fn rank_mentions(window: &Window, positions: &[MentionPosition]) -> Vec<(MentionPosition, usize)> {
    let mut ranked: Vec<(MentionPosition, usize)> = positions
        .iter()
        .map(|&p| (p, word_distance(window, p)))
        .collect();
    ranked.sort_by_key(|&(_, d)| d);
    ranked
}

/// Select the anchor mention. `None` only when `positions` is empty.
pub fn select_anchor(window: &Window, positions: &[MentionPosition]) -> Option<MentionPosition> {
    let ranked = rank_mentions(window, positions);

    if window.colon_before_quote() {
        let quote = window.quote_index();
        if let Some(&(pos, _)) = ranked.iter().find(|(p, _)| p.sentence < quote) {
            return Some(pos);
        }
    }

    ranked.first().map(|&(pos, _)| pos)
}
