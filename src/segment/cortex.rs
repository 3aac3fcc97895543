//! SegmentCortex: one-call segment construction for JS and native callers
//!
//! Owns the alias table, a lexicon-aware tokenizer and the builder.
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! const cortex = SegmentCortex.withConfig({ radius: 1, max_chars: 510 });
//! cortex.hydrateAliases([{ alias: "철수", id: 1 }, { alias: "영희", id: 2 }]);
//! const result = cortex.build(["철수가 말했다 ：", "\"안녕\"", "영희가 웃었다"]);
//! console.log(result.segments, result.stats);
//! ```

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::segment::alias::{AliasEntry, AliasTable, CandidateId};
use crate::segment::builder::{Segment, SegmentBuilder};
use crate::segment::config::SegmentConfig;
use crate::segment::error::SegmentResult;
use crate::segment::locator::locate;
use crate::segment::tokenize::UnicodeWordTokenizer;
use crate::segment::window::Window;

// =============================================================================
// Result Types
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildResult {
    pub segments: Vec<Segment>,
    /// Candidate order of `segments`
    pub candidates: Vec<CandidateId>,
    pub stats: BuildStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildStats {
    pub candidate_count: usize,
    pub truncated_count: usize,
    pub evicted_count: usize,
    pub timing_us: u64,
}

impl BuildStats {
    fn from_segments(segments: &[Segment], timing_us: u64) -> Self {
        Self {
            candidate_count: segments.len(),
            truncated_count: segments.iter().filter(|s| s.removed_words > 0).count(),
            evicted_count: segments.iter().filter(|s| s.anchor_evicted).count(),
            timing_us,
        }
    }
}

fn to_js_error<E: std::fmt::Display>(e: E) -> JsValue {
    JsValue::from_str(&e.to_string())
}

// =============================================================================
// SegmentCortex
// =============================================================================

#[wasm_bindgen]
pub struct SegmentCortex {
    aliases: AliasTable,
    tokenizer: UnicodeWordTokenizer,
    builder: SegmentBuilder,
}

impl Default for SegmentCortex {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl SegmentCortex {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            aliases: AliasTable::new(),
            tokenizer: UnicodeWordTokenizer::new(),
            builder: SegmentBuilder::default(),
        }
    }

    /// Create with a `SegmentConfig` object
    #[wasm_bindgen(js_name = withConfig)]
    pub fn js_with_config(config_js: JsValue) -> Result<SegmentCortex, JsValue> {
        let config: SegmentConfig = serde_wasm_bindgen::from_value(config_js)
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?;
        Self::with_config(config).map_err(to_js_error)
    }

    /// Hydrate aliases from `[{ alias, id }]` or from a name-list string
    #[wasm_bindgen(js_name = hydrateAliases)]
    pub fn js_hydrate_aliases(&mut self, entries: JsValue) -> Result<(), JsValue> {
        let table = match entries.as_string() {
            Some(name_list) => AliasTable::from_name_list(&name_list),
            None => {
                let entries: Vec<AliasEntry> = serde_wasm_bindgen::from_value(entries)
                    .map_err(|e| JsValue::from_str(&format!("Invalid aliases: {}", e)))?;
                AliasTable::from_entries(entries)
            }
        };
        self.hydrate_aliases(table).map_err(to_js_error)
    }

    /// Build segments for a window of raw sentences (array of strings)
    #[wasm_bindgen(js_name = build)]
    pub fn js_build(&self, sentences: JsValue) -> Result<JsValue, JsValue> {
        let sentences: Vec<String> = serde_wasm_bindgen::from_value(sentences)
            .map_err(|e| JsValue::from_str(&format!("Invalid sentences: {}", e)))?;

        let result = self.build_native(&sentences).map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&result).map_err(|e| {
            web_sys::console::error_1(&format!("[SegmentCortex] Serialization failed: {:?}", e).into());
            JsValue::from_str(&format!("Serialization error: {}", e))
        })
    }

    #[wasm_bindgen(js_name = aliasCount)]
    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    /// Sentences expected per window (`2W + 1`)
    #[wasm_bindgen(js_name = windowLen)]
    pub fn window_len(&self) -> usize {
        self.builder.config().window_len()
    }
}

// Native API
impl SegmentCortex {
    pub fn with_config(config: SegmentConfig) -> SegmentResult<Self> {
        config.validate()?;
        Ok(Self {
            builder: SegmentBuilder::new(config),
            ..Self::new()
        })
    }

    /// Replace the alias table and rebuild the tokenizer lexicon
    pub fn hydrate_aliases(&mut self, aliases: AliasTable) -> SegmentResult<()> {
        self.tokenizer = UnicodeWordTokenizer::with_lexicon(aliases.aliases())?;
        self.aliases = aliases;
        Ok(())
    }

    pub fn hydrate_name_list(&mut self, name_list: &str) -> SegmentResult<()> {
        self.hydrate_aliases(AliasTable::from_name_list(name_list))
    }

    /// Add one alias and rebuild the lexicon
    pub fn insert_alias(&mut self, alias: &str, id: CandidateId) -> SegmentResult<()> {
        let mut aliases = std::mem::take(&mut self.aliases);
        aliases.insert(alias, id);
        self.hydrate_aliases(aliases)
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn config(&self) -> &SegmentConfig {
        self.builder.config()
    }

    /// Tokenize raw sentences, then build
    pub fn build_native<S: AsRef<str>>(&self, sentences: &[S]) -> SegmentResult<BuildResult> {
        let window = Window::from_raw(sentences, self.builder.config().radius, &self.tokenizer)?;
        self.build_tokens(&window)
    }

    /// Build from an already tokenized window
    pub fn build_tokens(&self, window: &Window) -> SegmentResult<BuildResult> {
        let start = instant::Instant::now();

        let mentions = locate(window, &self.aliases);
        let segments = self.builder.build(window, &mentions)?;
        let stats = BuildStats::from_segments(&segments, start.elapsed().as_micros() as u64);

        Ok(BuildResult {
            candidates: mentions.candidates().to_vec(),
            segments,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::error::SegmentError;

    fn cortex() -> SegmentCortex {
        let mut cortex = SegmentCortex::with_config(SegmentConfig::default().with_radius(1)).unwrap();
        cortex.hydrate_name_list("철수\n영희").unwrap();
        cortex
    }

    #[test]
    fn test_build_native() {
        let result = cortex()
            .build_native(&["철수가 말했다 ：", "\"안녕\"", "영희가 웃었다"])
            .unwrap();

        assert_eq!(result.candidates, vec![0, 1]);
        assert_eq!(result.stats.candidate_count, 2);
        assert_eq!(result.stats.truncated_count, 0);
        assert_eq!(result.segments[0].text, "철수가말했다：\"안녕\"");
        assert_eq!(result.segments[1].anchor_text(), "영희");
    }

    #[test]
    fn test_wrong_window_size() {
        let err = cortex().build_native(&["철수가 왔다"]).unwrap_err();
        assert!(matches!(err, SegmentError::MalformedWindow { expected: 3, actual: 1 }));
    }

    #[test]
    fn test_insert_alias_updates_lexicon() {
        let mut cortex = cortex();
        cortex.insert_alias("민수", 2).unwrap();
        let result = cortex.build_native(&["민수는 조용했다", "\"응\"", "x"]).unwrap();
        assert_eq!(result.candidates, vec![2]);
        assert_eq!(result.segments[0].anchor_text(), "민수");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SegmentConfig::default().with_max_chars(0);
        assert!(SegmentCortex::with_config(config).is_err());
    }

    #[test]
    fn test_window_len() {
        assert_eq!(SegmentCortex::new().window_len(), 21);
    }
}
