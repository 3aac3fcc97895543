//! Sentence window around a quote.
//!
//! A window is `2W + 1` tokenized sentences with the quote at index `W`.
//! It is never mutated after construction; truncation works on clones of
//! slices taken from it.

use serde::{Deserialize, Serialize};

use crate::segment::error::{SegmentError, SegmentResult};
use crate::segment::tokenize::WordTokenizer;

/// Full-width colon (U+FF1A), the "X said:" cue before a quote
pub const FULLWIDTH_COLON: &str = "\u{FF1A}";

/// Character length of a token, in chars
#[inline]
pub fn char_len(word: &str) -> usize {
    word.chars().count()
}

/// Sum of the character lengths of a sentence's words
pub fn sentence_char_len<S: AsRef<str>>(sentence: &[S]) -> usize {
    sentence.iter().map(|w| char_len(w.as_ref())).sum()
}

/// A (sentence index, word index) pair inside a window or a slice of it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MentionPosition {
    pub sentence: usize,
    pub word: usize,
}

impl MentionPosition {
    pub fn new(sentence: usize, word: usize) -> Self {
        Self { sentence, word }
    }
}

impl From<(usize, usize)> for MentionPosition {
    fn from((sentence, word): (usize, usize)) -> Self {
        Self { sentence, word }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWindow")]
pub struct Window {
    sentences: Vec<Vec<String>>,
    radius: usize,
}

/// Unchecked wire shape; deserialized windows go through `Window::new`
#[derive(Deserialize)]
struct RawWindow {
    sentences: Vec<Vec<String>>,
    radius: usize,
}

impl TryFrom<RawWindow> for Window {
    type Error = SegmentError;

    fn try_from(raw: RawWindow) -> SegmentResult<Self> {
        Self::new(raw.sentences, raw.radius)
    }
}

impl Window {
    /// Wrap already tokenized sentences. Fails unless there are exactly `2W + 1`.
    pub fn new(sentences: Vec<Vec<String>>, radius: usize) -> SegmentResult<Self> {
        let expected = radius * 2 + 1;
        if sentences.len() != expected {
            return Err(SegmentError::MalformedWindow {
                expected,
                actual: sentences.len(),
            });
        }
        Ok(Self { sentences, radius })
    }

    /// Tokenize raw sentences and wrap them
    pub fn from_raw<S, T>(raw: &[S], radius: usize, tokenizer: &T) -> SegmentResult<Self>
    where
        S: AsRef<str>,
        T: WordTokenizer + ?Sized,
    {
        let sentences = raw
            .iter()
            .map(|s| tokenizer.tokenize(s.as_ref()))
            .collect::<SegmentResult<Vec<_>>>()?;
        Self::new(sentences, radius)
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Index of the quote sentence (`W`)
    pub fn quote_index(&self) -> usize {
        self.radius
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn sentences(&self) -> &[Vec<String>] {
        &self.sentences
    }

    pub fn sentence(&self, idx: usize) -> Option<&[String]> {
        self.sentences.get(idx).map(|s| s.as_slice())
    }

    pub fn word(&self, pos: MentionPosition) -> Option<&str> {
        self.sentences
            .get(pos.sentence)
            .and_then(|s| s.get(pos.word))
            .map(|w| w.as_str())
    }

    /// Word count of a sentence (0 when out of range)
    pub fn sentence_len(&self, idx: usize) -> usize {
        self.sentences.get(idx).map_or(0, |s| s.len())
    }

    /// True when the sentence right before the quote ends with `：`
    pub fn colon_before_quote(&self) -> bool {
        self.radius
            .checked_sub(1)
            .and_then(|i| self.sentences.get(i))
            .and_then(|s| s.last())
            .is_some_and(|w| w == FULLWIDTH_COLON)
    }

    /// Fail unless `pos` names a word of this window
    pub fn check_position(&self, pos: MentionPosition) -> SegmentResult<()> {
        match self.word(pos) {
            Some(_) => Ok(()),
            None => Err(SegmentError::MentionOutOfWindow {
                sentence: pos.sentence,
                word: pos.word,
            }),
        }
    }

    /// Owned copy of sentences `start ..= end`
    pub fn slice_owned(&self, start: usize, end: usize) -> Vec<Vec<String>> {
        self.sentences[start..=end].to_vec()
    }
}
