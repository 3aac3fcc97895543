//! Labelled instance reader.
//!
//! Instances come as fixed blocks of `2W + 6` lines:
//!
//! ```text
//! 0            header (ignored)
//! 1 ..= 2W+1   raw sentences, quote in the middle
//! 2W+2         speaker line, speaker name is the last field
//! 2W+3         ignored
//! 2W+4         category line, category is the last field
//! 2W+5         separator
//! ```
//!
//! Each block is tokenized, located and turned into segments plus labels
//! aligned to the candidate order. A bad block is recorded and skipped.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::segment::alias::{AliasTable, CandidateId};
use crate::segment::builder::{Segment, SegmentBuilder};
use crate::segment::config::SegmentConfig;
use crate::segment::error::{SegmentError, SegmentResult};
use crate::segment::locator::locate;
use crate::segment::scoring::{identify_speaker, SpeakerPrediction, SpeakerScorer};
use crate::segment::tokenize::{UnicodeWordTokenizer, WordTokenizer};
use crate::segment::window::Window;

/// One quote, ready for training or evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedInstance {
    pub raw_sentences: Vec<String>,
    pub window: Window,
    pub segments: Vec<Segment>,
    /// Candidate order shared by `segments`, `one_hot` and scores
    pub candidates: Vec<CandidateId>,
    pub speaker: CandidateId,
    pub one_hot: Vec<u8>,
    /// Index of the speaker in `candidates`, 0 when absent
    pub true_index: usize,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub prediction: SpeakerPrediction,
    pub correct: bool,
}

impl PreparedInstance {
    pub fn speaker_in_window(&self) -> bool {
        self.one_hot.contains(&1)
    }

    /// Score this instance and compare with its label
    pub fn evaluate<S: SpeakerScorer + ?Sized>(
        &self,
        scorer: &S,
        aliases: &AliasTable,
    ) -> SegmentResult<Option<Evaluation>> {
        let prediction = identify_speaker(scorer, &self.segments, aliases)?;
        Ok(prediction.map(|prediction| Evaluation {
            correct: prediction.index == self.true_index,
            prediction,
        }))
    }
}

#[derive(Debug)]
pub struct SkippedInstance {
    /// 0-based block number
    pub block: usize,
    pub error: SegmentError,
}

#[derive(Debug, Default)]
pub struct ReadReport {
    pub instances: Vec<PreparedInstance>,
    pub skipped: Vec<SkippedInstance>,
    /// Dropped by `skip_single_candidate`
    pub filtered: usize,
}

pub struct InstanceReader {
    aliases: AliasTable,
    builder: SegmentBuilder,
    tokenizer: Box<dyn WordTokenizer>,
    skip_single_candidate: bool,
}

impl InstanceReader {
    /// Reader with a Unicode tokenizer that keeps every alias whole
    pub fn new(aliases: AliasTable, config: SegmentConfig) -> SegmentResult<Self> {
        config.validate()?;
        let tokenizer = UnicodeWordTokenizer::with_lexicon(aliases.aliases())?;
        Ok(Self {
            aliases,
            builder: SegmentBuilder::new(config),
            tokenizer: Box::new(tokenizer),
            skip_single_candidate: false,
        })
    }

    pub fn with_tokenizer(mut self, tokenizer: Box<dyn WordTokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Drop instances with exactly one candidate (nothing to rank)
    pub fn skip_single_candidate(mut self, skip: bool) -> Self {
        self.skip_single_candidate = skip;
        self
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    fn block_len(&self) -> usize {
        self.builder.config().window_len() + 5
    }

    /// Read every complete block; a trailing partial block is ignored
    pub fn read(&self, text: &str) -> ReadReport {
        let lines: Vec<&str> = text.lines().collect();
        let block_len = self.block_len();
        let mut report = ReadReport::default();

        for (block, chunk) in lines.chunks_exact(block_len).enumerate() {
            match self.read_block(chunk, block * block_len) {
                Ok(Some(instance)) => report.instances.push(instance),
                Ok(None) => report.filtered += 1,
                Err(error) => {
                    warn!(block, %error, "skipping instance");
                    report.skipped.push(SkippedInstance { block, error });
                }
            }
        }

        info!(
            instances = report.instances.len(),
            skipped = report.skipped.len(),
            filtered = report.filtered,
            "read instance blocks"
        );
        report
    }

    /// Parse one block. `first_line` is its 0-based line number in the input.
    pub fn read_block(&self, block: &[&str], first_line: usize) -> SegmentResult<Option<PreparedInstance>> {
        let window_len = self.builder.config().window_len();
        if block.len() < window_len + 5 {
            return Err(SegmentError::InstanceFormat {
                line: first_line + block.len() + 1,
                reason: format!("block has {} lines, expected {}", block.len(), window_len + 5),
            });
        }

        let raw_sentences: Vec<String> =
            block[1..=window_len].iter().map(|l| l.trim().to_string()).collect();

        let speaker_line = window_len + 1;
        let speaker_name = last_field(block[speaker_line], first_line + speaker_line, "speaker")?;
        let category_line = window_len + 3;
        let category = last_field(block[category_line], first_line + category_line, "category")?;

        let window = Window::from_raw(
            &raw_sentences,
            self.builder.config().radius,
            self.tokenizer.as_ref(),
        )?;
        let mentions = locate(&window, &self.aliases);

        if self.skip_single_candidate && mentions.len() == 1 {
            return Ok(None);
        }

        let speaker = self
            .aliases
            .get(speaker_name)
            .ok_or_else(|| SegmentError::UnknownSpeaker { name: speaker_name.to_string() })?;

        let segments = self.builder.build(&window, &mentions)?;
        let candidates = mentions.candidates().to_vec();
        let one_hot: Vec<u8> = candidates.iter().map(|&c| u8::from(c == speaker)).collect();
        let true_index = one_hot.iter().position(|&v| v == 1).unwrap_or(0);

        Ok(Some(PreparedInstance {
            raw_sentences,
            window,
            segments,
            candidates,
            speaker,
            one_hot,
            true_index,
            category: category.to_string(),
        }))
    }
}

fn last_field<'a>(line: &'a str, line_idx: usize, what: &str) -> SegmentResult<&'a str> {
    line.split_whitespace()
        .last()
        .ok_or_else(|| SegmentError::InstanceFormat {
            line: line_idx + 1,
            reason: format!("missing {}", what),
        })
}
