//! SpeakerCore: Candidate-Specific Segment builder for quote speaker identification
//!
//! A Rust/WASM implementation of the segment preparation stage that sits in
//! front of a neural speaker scorer.
//!
//! # Architecture
//!
//! ## Segment Components
//! - `window.rs` - Window: `2W + 1` tokenized sentences, quote at index `W`
//! - `alias.rs` - AliasTable: alias → candidate id, name-list parsing
//! - `tokenize.rs` - WordTokenizer: Unicode, regex and HF pre-tokenizer adapters
//! - `locator.rs` - Mention locator, first-discovery candidate order
//! - `selector.rs` - Nearest-mention selector with the full-width colon rule
//! - `truncate.rs` - Anchor-preserving truncator
//! - `builder.rs` - SegmentBuilder: slicing, joining, anchor offsets
//! - `scoring.rs` - SpeakerScorer seam and speaker resolution
//! - `instance.rs` - InstanceReader: labelled instance blocks
//! - `cortex.rs` - SegmentCortex: one-call facade for JS
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { SegmentCortex } from 'speakercore';
//!
//! await init();
//!
//! const cortex = SegmentCortex.withConfig({ radius: 10, max_chars: 510, join: 'spaced' });
//! cortex.hydrateAliases("Gandalf Mithrandir\nFrodo\nSam");
//!
//! const result = cortex.build(sentences);   // 21 raw sentences
//! console.log(result.candidates);           // candidate ids, scorer order
//! console.log(result.segments);             // one segment per candidate
//! console.log(result.stats);                // truncation + timing
//! ```

pub mod segment;

pub use segment::*;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("speakercore v{}", env!("CARGO_PKG_VERSION"))
}
