// speakercore/src/segment/config.rs
//
// Configuration types for candidate-specific segment construction

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::segment::error::{SegmentError, SegmentResult};

/// Scorer families the segments are prepared for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelVariant {
    /// Candidate-specific segment network: dense text, 3-field anchor span
    #[serde(rename = "CSN")]
    Csn,

    /// Korean CSN: space-joined text, anchor span carries the word index
    #[serde(rename = "KCSN")]
    Kcsn,
}

impl Default for ModelVariant {
    fn default() -> Self {
        Self::Csn
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csn => write!(f, "CSN"),
            Self::Kcsn => write!(f, "KCSN"),
        }
    }
}

impl ModelVariant {
    pub fn join_policy(&self) -> JoinPolicy {
        match self {
            Self::Csn => JoinPolicy::Dense,
            Self::Kcsn => JoinPolicy::Spaced,
        }
    }

    pub fn anchor_shape(&self) -> AnchorShape {
        match self {
            Self::Csn => AnchorShape::Span,
            Self::Kcsn => AnchorShape::WithWord,
        }
    }
}

/// How tokens are concatenated into segment text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum JoinPolicy {
    /// No separator at all, within or across sentences
    #[default]
    Dense,

    /// One space between every pair of consecutive words, across sentences too
    Spaced,
}

impl JoinPolicy {
    /// Separator length (in chars) inserted before every word but the first
    pub fn separator_len(&self) -> usize {
        match self {
            Self::Dense => 0,
            Self::Spaced => 1,
        }
    }

    pub fn separator(&self) -> &'static str {
        match self {
            Self::Dense => "",
            Self::Spaced => " ",
        }
    }
}

/// Which fields the anchor span reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnchorShape {
    /// (sentence, left, right)
    #[default]
    Span,

    /// (sentence, left, right, word index in sentence)
    WithWord,
}

/// Segment construction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentConfig {
    /// Single-sided context radius `W`; windows hold `2W + 1` sentences
    pub radius: usize,

    /// Maximum number of word characters kept in one segment
    pub max_chars: usize,

    #[serde(default)]
    pub join: JoinPolicy,

    #[serde(default)]
    pub anchor_shape: AnchorShape,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self::for_variant(ModelVariant::default())
    }
}

impl SegmentConfig {
    pub const DEFAULT_RADIUS: usize = 10;
    pub const DEFAULT_MAX_CHARS: usize = 510;

    /// Preset matching a scorer family
    pub fn for_variant(variant: ModelVariant) -> Self {
        Self {
            radius: Self::DEFAULT_RADIUS,
            max_chars: Self::DEFAULT_MAX_CHARS,
            join: variant.join_policy(),
            anchor_shape: variant.anchor_shape(),
        }
    }

    pub fn with_radius(mut self, radius: usize) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Number of sentences a window must hold
    pub fn window_len(&self) -> usize {
        self.radius * 2 + 1
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> SegmentResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SegmentResult<()> {
        if self.radius == 0 {
            return Err(SegmentError::InvalidConfig {
                field: "radius",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_chars == 0 {
            return Err(SegmentError::InvalidConfig {
                field: "max_chars",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_presets() {
        let csn = SegmentConfig::for_variant(ModelVariant::Csn);
        assert_eq!(csn.join, JoinPolicy::Dense);
        assert_eq!(csn.anchor_shape, AnchorShape::Span);

        let kcsn = SegmentConfig::for_variant(ModelVariant::Kcsn);
        assert_eq!(kcsn.join, JoinPolicy::Spaced);
        assert_eq!(kcsn.anchor_shape, AnchorShape::WithWord);
    }

    #[test]
    fn test_default_window_len() {
        assert_eq!(SegmentConfig::default().window_len(), 21);
    }

    #[test]
    fn test_from_json_with_defaults() {
        let config = SegmentConfig::from_json(r#"{"radius": 2, "max_chars": 64}"#).unwrap();
        assert_eq!(config.radius, 2);
        assert_eq!(config.max_chars, 64);
        assert_eq!(config.join, JoinPolicy::Dense);
    }

    #[test]
    fn test_from_json_spaced() {
        let config = SegmentConfig::from_json(
            r#"{"radius": 1, "max_chars": 10, "join": "spaced", "anchor_shape": "with_word"}"#,
        )
        .unwrap();
        assert_eq!(config.join, JoinPolicy::Spaced);
        assert_eq!(config.anchor_shape, AnchorShape::WithWord);
    }

    #[test]
    fn test_rejects_zero_radius() {
        let err = SegmentConfig::from_json(r#"{"radius": 0, "max_chars": 10}"#).unwrap_err();
        assert!(matches!(err, SegmentError::InvalidConfig { field: "radius", .. }));
    }

    #[test]
    fn test_variant_serde_names() {
        assert_eq!(serde_json::to_string(&ModelVariant::Kcsn).unwrap(), "\"KCSN\"");
        assert_eq!(ModelVariant::Csn.to_string(), "CSN");
    }
}
