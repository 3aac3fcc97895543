//! Truncator
//!
//! Shrinks an owned slice of the window until its word characters fit
//! `max_chars`. Each sentence has a right-to-left cursor; every step deletes
//! the cursor word of the currently longest sentence. The anchor word is
//! stepped over, and its index follows deletions to its left, so it keeps
//! naming the same word. It is removed only once it is the last word left
//! anywhere in the slice.

use tracing::{debug, warn};

use crate::segment::window::{char_len, sentence_char_len, MentionPosition};

/// Result of one truncation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncated {
    pub sentences: Vec<Vec<String>>,
    /// Anchor position after index adjustment
    pub anchor: MentionPosition,
    /// The anchor word itself had to go
    pub evicted: bool,
    /// Number of words deleted
    pub removed: usize,
}

impl Truncated {
    pub fn total_chars(&self) -> usize {
        self.sentences.iter().map(|s| sentence_char_len(s)).sum()
    }
}

struct Cursors {
    next: Vec<Option<usize>>,
}

impl Cursors {
    fn new(sentences: &[Vec<String>]) -> Self {
        Self {
            next: sentences.iter().map(|s| s.len().checked_sub(1)).collect(),
        }
    }

    /// Next deletable word of a sentence, stepping over the live anchor
    fn deletable(&self, sent: usize, anchor: Option<MentionPosition>) -> Option<usize> {
        let cursor = self.next[sent]?;
        match anchor {
            Some(a) if a.sentence == sent && a.word == cursor => cursor.checked_sub(1),
            _ => Some(cursor),
        }
    }
}

/// Truncate `sentences` to at most `max_chars` word characters.
///
/// `anchor` is relative to `sentences`. The input is consumed; callers hand
/// in their own copy.
pub fn truncate(
    mut sentences: Vec<Vec<String>>,
    anchor: MentionPosition,
    max_chars: usize,
) -> Truncated {
    let mut lens: Vec<usize> = sentences.iter().map(|s| sentence_char_len(s)).collect();
    let mut total: usize = lens.iter().sum();
    let mut cursors = Cursors::new(&sentences);
    let mut anchor = anchor;
    let mut live = true;
    let mut removed = 0;

    while total > max_chars {
        let live_anchor = live.then_some(anchor);

        // longest sentence that still has a word other than the anchor; first on ties
        let target = (0..sentences.len())
            .filter_map(|i| cursors.deletable(i, live_anchor).map(|c| (i, c)))
            .fold(None, |best: Option<(usize, usize)>, (i, c)| match best {
                Some((b, _)) if lens[b] >= lens[i] => best,
                _ => Some((i, c)),
            });

        let (sent, word) = match target {
            Some(t) => t,
            None if live => {
                warn!(
                    max_chars,
                    anchor_chars = total,
                    "budget exhausted, dropping the anchor word"
                );
                let word = sentences[anchor.sentence].remove(anchor.word);
                total -= char_len(&word);
                lens[anchor.sentence] -= char_len(&word);
                cursors.next[anchor.sentence] = None;
                anchor.word = 0;
                live = false;
                removed += 1;
                continue;
            }
            None => break,
        };

        if live && sent == anchor.sentence && word < anchor.word {
            anchor.word -= 1;
        }

        let deleted = sentences[sent].remove(word);
        let deleted_len = char_len(&deleted);
        lens[sent] -= deleted_len;
        total -= deleted_len;
        cursors.next[sent] = word.checked_sub(1);
        removed += 1;
    }

    if removed > 0 {
        debug!(removed, total, max_chars, "truncated segment");
    }

    Truncated {
        sentences,
        anchor,
        evicted: !live,
        removed,
    }
}
