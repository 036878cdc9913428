use serde::{Deserialize, Serialize};
use time::Date;

/// Which structural part of a press conference a text span came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentKind {
    Opening,
    Qa,
}

impl SegmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentKind::Opening => "Opening Speech",
            SegmentKind::Qa => "Q&A Session",
        }
    }
}

/// Valence of a text span.
///
/// `positive + neutral + negative` sums to 1 (within float tolerance) and
/// `compound` stays in [-1, 1]. A span with no scored tokens is all-neutral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToneScore {
    pub compound: f64,
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

impl ToneScore {
    pub fn neutral() -> Self {
        Self {
            compound: 0.0,
            positive: 0.0,
            neutral: 1.0,
            negative: 0.0,
        }
    }

    pub fn label(&self) -> SentimentLabel {
        SentimentLabel::from_compound(self.compound)
    }
}

/// Coarse polarity bucket for a compound score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Compound at or beyond +/-0.05 leaves the neutral band.
    pub fn from_compound(compound: f64) -> Self {
        if compound >= 0.05 {
            SentimentLabel::Positive
        } else if compound <= -0.05 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
        }
    }
}

/// Reader profile for narrative interpretation of a compound score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Audience {
    Investor,
    General,
}

/// One scored sentence with its 1-based position among retained sentences.
///
/// Sentences below a caller-chosen token minimum are dropped before
/// numbering, so `sequence` reflects the filtered order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceScore {
    pub sequence: usize,
    pub text: String,
    pub compound: f64,
}

/// An extremal-scoring sentence surfaced as evidence, tagged by origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub text: String,
    pub source: SegmentKind,
    pub compound: f64,
}

/// Assertiveness bucket for a certainty score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CertaintyLabel {
    Assertive,
    Neutral,
    Hedged,
}

impl CertaintyLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CertaintyLabel::Assertive => "Assertive",
            CertaintyLabel::Neutral => "Neutral",
            CertaintyLabel::Hedged => "Hedged",
        }
    }
}

/// Modal-verb assertiveness measure for a text span, in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Certainty {
    pub score: f64,
    pub label: CertaintyLabel,
    pub certain_count: usize,
    pub uncertain_count: usize,
}

/// A single speaker turn parsed from `<NAME>...</NAME>` markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerTurn {
    pub speaker: String,
    pub content: String,
}

/// One archived transcript on the historical timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: Date,
    pub compound: f64,
    pub market_change: Option<f64>,
    pub filename: String,
}
