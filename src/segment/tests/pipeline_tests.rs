//! End-to-end tests: alias table → locator → selector → truncator → builder

use crate::segment::alias::{AliasEntry, AliasTable};
use crate::segment::builder::SegmentBuilder;
use crate::segment::config::{ModelVariant, SegmentConfig};
use crate::segment::cortex::SegmentCortex;
use crate::segment::locator::locate;
use crate::segment::selector::select_anchor;
use crate::segment::window::{MentionPosition, Window};

fn tokens(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn korean_window() -> Window {
    Window::new(
        vec![
            tokens(&["철수", "가", "말했다", "："]),
            tokens(&["\"", "안녕", "\""]),
            tokens(&["영희", "가", "웃었다"]),
        ],
        1,
    )
    .unwrap()
}

fn korean_aliases() -> AliasTable {
    AliasTable::from_entries(vec![
        AliasEntry { alias: "철수".into(), id: 1 },
        AliasEntry { alias: "영희".into(), id: 2 },
    ])
}

fn csn(radius: usize) -> SegmentBuilder {
    SegmentBuilder::new(SegmentConfig::default().with_radius(radius))
}

// ============================================================================
// Worked Example
// ============================================================================

#[test]
fn test_korean_window_anchors() {
    let window = korean_window();
    let mentions = locate(&window, &korean_aliases());

    assert_eq!(mentions.candidates(), &[1, 2]);
    assert_eq!(
        select_anchor(&window, mentions.positions(1).unwrap()),
        Some(MentionPosition::new(0, 0))
    );
    assert_eq!(
        select_anchor(&window, mentions.positions(2).unwrap()),
        Some(MentionPosition::new(2, 0))
    );
}

#[test]
fn test_korean_window_segments() {
    let window = korean_window();
    let mentions = locate(&window, &korean_aliases());
    let segments = csn(1).build(&window, &mentions).unwrap();

    assert_eq!(segments.len(), 2);

    let first = &segments[0];
    assert_eq!(first.candidate, 1);
    assert_eq!(first.quote_idx, 1);
    assert_eq!(first.anchor.as_tuple(), (0, 0, 2));
    assert_eq!(first.text, "철수가말했다：\"안녕\"");
    assert_eq!(first.sent_char_lens, vec![7, 4]);

    let second = &segments[1];
    assert_eq!(second.candidate, 2);
    assert_eq!(second.quote_idx, 0);
    assert_eq!(second.anchor.as_tuple(), (1, 4, 6));
    assert_eq!(second.anchor_text(), "영희");
}

#[test]
fn test_build_is_idempotent() {
    let window = korean_window();
    let mentions = locate(&window, &korean_aliases());
    let builder = csn(1);

    assert_eq!(
        builder.build(&window, &mentions).unwrap(),
        builder.build(&window, &mentions).unwrap()
    );
}

#[test]
fn test_window_is_not_mutated_by_truncation() {
    let window = korean_window();
    let before = window.clone();
    let mentions = locate(&window, &korean_aliases());
    let builder = SegmentBuilder::new(SegmentConfig::default().with_radius(1).with_max_chars(4));

    let segments = builder.build(&window, &mentions).unwrap();
    assert!(segments.iter().all(|s| s.removed_words > 0));
    assert_eq!(window, before);
}

// ============================================================================
// Selection Rules
// ============================================================================

#[test]
fn test_colon_prefers_mention_before_quote() {
    let window = Window::new(
        vec![
            tokens(&["Bob", "turned", "and", "said", "："]),
            tokens(&["\"", "go", "\""]),
            tokens(&["Bob", "left"]),
        ],
        1,
    )
    .unwrap();
    let aliases = AliasTable::from_name_list("Bob");
    let segments = csn(1).build(&window, &locate(&window, &aliases)).unwrap();

    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].quote_idx, 1);
    assert_eq!(segments[0].anchor.as_tuple(), (0, 0, 3));
}

#[test]
fn test_without_colon_nearest_wins() {
    let window = Window::new(
        vec![
            tokens(&["Bob", "turned", "and", "said", "."]),
            tokens(&["\"", "go", "\""]),
            tokens(&["Bob", "left"]),
        ],
        1,
    )
    .unwrap();
    let aliases = AliasTable::from_name_list("Bob");
    let segments = csn(1).build(&window, &locate(&window, &aliases)).unwrap();

    assert_eq!(segments[0].quote_idx, 0);
    assert_eq!(segments[0].anchor.as_tuple(), (1, 4, 7));
}

#[test]
fn test_quote_sentence_mention_loses_to_neighbour() {
    let window = Window::new(
        vec![
            tokens(&["a"]),
            tokens(&["b"]),
            tokens(&["\"", "Ann", "?", "\""]),
            tokens(&["Ann", "asked"]),
            tokens(&["c"]),
        ],
        2,
    )
    .unwrap();
    let aliases = AliasTable::from_name_list("Ann");
    let segments = csn(2).build(&window, &locate(&window, &aliases)).unwrap();

    assert_eq!(segments[0].sentences.len(), 2);
    assert_eq!(segments[0].anchor.sentence, 1);
}

#[test]
fn test_aliases_share_one_segment() {
    let window = Window::new(
        vec![
            tokens(&["Gandalf", "frowned"]),
            tokens(&["\"", "no", "\""]),
            tokens(&["Mithrandir", "sighed"]),
        ],
        1,
    )
    .unwrap();
    let aliases = AliasTable::from_name_list("Gandalf Mithrandir\nFrodo");
    let mentions = locate(&window, &aliases);
    let segments = csn(1).build(&window, &mentions).unwrap();

    assert_eq!(mentions.candidates(), &[0]);
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].anchor_text(), "Mithrandir");
    assert_eq!(segments[0].quote_idx, 0);
}

// ============================================================================
// Variants
// ============================================================================

#[test]
fn test_kcsn_spaced_segment() {
    let window = korean_window();
    let config = SegmentConfig::for_variant(ModelVariant::Kcsn).with_radius(1);
    let segments = SegmentBuilder::new(config)
        .build(&window, &locate(&window, &korean_aliases()))
        .unwrap();

    let second = &segments[1];
    assert_eq!(second.text, "\" 안녕 \" 영희 가 웃었다");
    assert_eq!(second.anchor.as_tuple(), (1, 7, 9));
    assert_eq!(second.anchor.word, Some(0));
    assert_eq!(second.anchor_text(), "영희");
}

#[test]
fn test_no_candidates_yields_no_segments() {
    let window = korean_window();
    let segments = csn(1)
        .build(&window, &locate(&window, &AliasTable::from_name_list("민수")))
        .unwrap();
    assert!(segments.is_empty());
}

#[test]
fn test_cortex_matches_builder() {
    let mut cortex = SegmentCortex::with_config(SegmentConfig::default().with_radius(1)).unwrap();
    cortex.hydrate_aliases(korean_aliases()).unwrap();

    let result = cortex.build_tokens(&korean_window()).unwrap();
    let window = korean_window();
    let direct = csn(1).build(&window, &locate(&window, &korean_aliases())).unwrap();

    assert_eq!(result.segments, direct);
    assert_eq!(result.candidates, vec![1, 2]);
    assert_eq!(result.stats.evicted_count, 0);
}
