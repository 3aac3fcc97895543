// speakercore/src/segment/tokenize.rs
//
// Word tokenizer adapters. The segment pipeline only needs
// "text -> ordered word tokens"; which tokenizer runs is up to the caller.

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use regex::Regex;
use tokenizers::pre_tokenizers::whitespace::Whitespace;
use tokenizers::pre_tokenizers::PreTokenizerWrapper;
use tokenizers::{OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer, Tokenizer};
use unicode_segmentation::UnicodeSegmentation;

use crate::segment::error::{SegmentError, SegmentResult};

/// Splits one sentence into an ordered sequence of word tokens
pub trait WordTokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> SegmentResult<Vec<String>>;
}

// =============================================================================
// UnicodeWordTokenizer
// =============================================================================

/// UAX#29 word-bound tokenizer with an optional alias lexicon.
///
/// Whitespace is dropped and punctuation stays as separate tokens. When a
/// lexicon is set, every lexicon entry that sits on word boundaries is cut
/// out as its own token before the rest is split. A Hangul alias may also end
/// inside a Hangul word, so `철수가` yields `철수`, `가` once `철수` is
/// registered, while `Samwise` stays whole with `Sam` registered.
#[derive(Debug, Clone, Default)]
pub struct UnicodeWordTokenizer {
    lexicon: Option<AhoCorasick>,
}

impl UnicodeWordTokenizer {
    pub fn new() -> Self {
        Self { lexicon: None }
    }

    /// Build with a lexicon of words that must survive as whole tokens
    pub fn with_lexicon<I, S>(entries: I) -> SegmentResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns: Vec<String> = entries
            .into_iter()
            .map(|e| e.as_ref().to_string())
            .filter(|e| !e.is_empty())
            .collect();

        if patterns.is_empty() {
            return Ok(Self::new());
        }

        let automaton = AhoCorasickBuilder::new()
            .match_kind(MatchKind::LeftmostLongest)
            .build(&patterns)
            .map_err(|e| SegmentError::Tokenizer(format!("Failed to build lexicon: {}", e)))?;

        Ok(Self { lexicon: Some(automaton) })
    }

    pub fn has_lexicon(&self) -> bool {
        self.lexicon.is_some()
    }

    fn push_words(text: &str, out: &mut Vec<String>) {
        out.extend(
            text.split_word_bounds()
                .filter(|t| !t.trim().is_empty())
                .map(str::to_string),
        );
    }
}

fn is_hangul(c: char) -> bool {
    matches!(c, '\u{AC00}'..='\u{D7A3}' | '\u{1100}'..='\u{11FF}' | '\u{3130}'..='\u{318F}')
}

fn starts_on_boundary(text: &str, start: usize) -> bool {
    text[..start]
        .chars()
        .next_back()
        .map_or(true, |c| !c.is_alphanumeric())
}

/// Word boundary after the match, or a Hangul particle glued to a Hangul alias
fn ends_on_boundary(text: &str, start: usize, end: usize) -> bool {
    match text[end..].chars().next() {
        None => true,
        Some(next) if !next.is_alphanumeric() => true,
        Some(next) => {
            is_hangul(next) && text[start..end].chars().next_back().is_some_and(is_hangul)
        }
    }
}

impl WordTokenizer for UnicodeWordTokenizer {
    fn tokenize(&self, text: &str) -> SegmentResult<Vec<String>> {
        let mut tokens = Vec::new();

        let automaton = match &self.lexicon {
            Some(a) => a,
            None => {
                Self::push_words(text, &mut tokens);
                return Ok(tokens);
            }
        };

        let mut cursor = 0;
        for mat in automaton.find_iter(text) {
            if !starts_on_boundary(text, mat.start()) || !ends_on_boundary(text, mat.start(), mat.end()) {
                continue;
            }
            Self::push_words(&text[cursor..mat.start()], &mut tokens);
            tokens.push(text[mat.start()..mat.end()].to_string());
            cursor = mat.end();
        }
        Self::push_words(&text[cursor..], &mut tokens);

        Ok(tokens)
    }
}

// =============================================================================
// RegexTokenizer
// =============================================================================

/// Tokens are the successive matches of a pattern
#[derive(Debug, Clone)]
pub struct RegexTokenizer {
    pattern: Regex,
}

impl RegexTokenizer {
    pub const DEFAULT_PATTERN: &'static str = r"\w+|[^\w\s]";

    pub fn new(pattern: &str) -> SegmentResult<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| SegmentError::Tokenizer(format!("Invalid pattern: {}", e)))?;
        Ok(Self { pattern })
    }
}

impl Default for RegexTokenizer {
    fn default() -> Self {
        Self {
            pattern: Regex::new(Self::DEFAULT_PATTERN).expect("default pattern is valid"),
        }
    }
}

impl WordTokenizer for RegexTokenizer {
    fn tokenize(&self, text: &str) -> SegmentResult<Vec<String>> {
        Ok(self
            .pattern
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect())
    }
}

// =============================================================================
// PreTokenizerAdapter
// =============================================================================

/// Word splitting borrowed from a HuggingFace pre-tokenizer
pub struct PreTokenizerAdapter<P> {
    inner: P,
}

impl PreTokenizerAdapter<Whitespace> {
    /// `\w+|[^\w\s]+` splitting, as BERT-style tokenizers do
    pub fn whitespace() -> Self {
        Self { inner: Whitespace::default() }
    }
}

impl PreTokenizerAdapter<PreTokenizerWrapper> {
    /// Use the pre-tokenizer declared in a tokenizer.json
    pub fn from_tokenizer_json(tokenizer_json: &str) -> SegmentResult<Self> {
        let tokenizer = Tokenizer::from_bytes(tokenizer_json.as_bytes())
            .map_err(|e| SegmentError::Tokenizer(format!("Failed to load tokenizer: {}", e)))?;

        let inner = tokenizer.get_pre_tokenizer().cloned().ok_or_else(|| {
            SegmentError::Tokenizer("tokenizer.json declares no pre-tokenizer".to_string())
        })?;

        Ok(Self { inner })
    }
}

impl<P: PreTokenizer> PreTokenizerAdapter<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

impl<P: PreTokenizer + Send + Sync> WordTokenizer for PreTokenizerAdapter<P> {
    fn tokenize(&self, text: &str) -> SegmentResult<Vec<String>> {
        let mut pretokenized = PreTokenizedString::from(text);
        self.inner
            .pre_tokenize(&mut pretokenized)
            .map_err(|e| SegmentError::Tokenizer(format!("Pre-tokenization failed: {}", e)))?;

        Ok(pretokenized
            .get_splits(OffsetReferential::Original, OffsetType::Char)
            .into_iter()
            .map(|(split, _, _)| split.to_string())
            .collect())
    }
}
