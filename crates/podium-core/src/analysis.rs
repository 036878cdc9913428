//! Segment-level measurements on top of the scorer: sentence flow,
//! highlights, delivery certainty, topic sentiment, and the full
//! per-transcript aggregate.

use serde::Serialize;

use crate::error::SegmentError;
use crate::score::Scorer;
use crate::stats::{self, TTest};
use crate::transcript::{self, Segmenter};
use crate::types::{
    Certainty, CertaintyLabel, Highlight, SegmentKind, SentenceScore, SentimentLabel, ToneScore,
};

/// Shortest sentence, in tokens, scored in the sentence flow.
pub const FLOW_MIN_TOKENS: usize = 3;
/// Shortest sentence, in tokens, eligible as a highlight.
pub const HIGHLIGHT_MIN_TOKENS: usize = 5;
/// Highlights reported per polarity.
const HIGHLIGHT_COUNT: usize = 3;

const CERTAIN_WORDS: &[&str] = &[
    "will",
    "must",
    "shall",
    "definitely",
    "certainly",
    "clearly",
    "undoubtedly",
    "always",
    "never",
];

const UNCERTAIN_WORDS: &[&str] = &[
    "may",
    "might",
    "could",
    "possibly",
    "probably",
    "perhaps",
    "unlikely",
    "likely",
    "seems",
    "appears",
];

/// Named topics and their trigger words.
const TOPICS: &[(&str, &[&str])] = &[
    (
        "Inflation",
        &["inflation", "price", "cpi", "pce", "cost", "expensive"],
    ),
    (
        "Labor Market",
        &["labor", "job", "employment", "unemployment", "wage", "hiring", "worker"],
    ),
    (
        "Growth",
        &["growth", "gdp", "economy", "spending", "investment", "activity", "expansion"],
    ),
];

/// Certainty scores above this read as assertive, below 1 minus it as hedged.
const ASSERTIVE_ABOVE: f64 = 0.6;
const HEDGED_BELOW: f64 = 0.4;
/// Score movement per certain or uncertain word.
const CERTAINTY_STEP: f64 = 0.05;

/// Sentiment of the sentences mentioning one named topic.
#[derive(Debug, Clone, Serialize)]
pub struct TopicScore {
    pub topic: String,
    pub compound: f64,
}

/// Strongest clearly positive and clearly negative sentences.
#[derive(Debug, Clone, Serialize)]
pub struct Highlights {
    pub positive: Vec<Highlight>,
    pub negative: Vec<Highlight>,
}

/// Everything measured about one segment of a transcript.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentReport {
    pub kind: SegmentKind,
    pub score: ToneScore,
    pub label: SentimentLabel,
    pub certainty: Certainty,
    pub topics: Vec<TopicScore>,
    pub flow: Vec<SentenceScore>,
}

/// Full analysis of a single press-conference transcript.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptAnalysis {
    pub opening: SegmentReport,
    pub qa: SegmentReport,
    /// Compound change from the opening speech to the Q&A session.
    pub shift: f64,
    pub highlights: Highlights,
    /// Welch t-test over the two segments' sentence compounds.
    pub significance: TTest,
}

/// Score each sentence of at least `min_tokens` tokens, numbering the
/// retained sentences from one.
pub fn sentence_scores(scorer: &Scorer, text: &str, min_tokens: usize) -> Vec<SentenceScore> {
    transcript::sentences(text)
        .into_iter()
        .filter(|s| s.split_whitespace().count() >= min_tokens)
        .enumerate()
        .map(|(i, text)| {
            let compound = scorer.score(&text).compound;
            SentenceScore {
                sequence: i + 1,
                text,
                compound,
            }
        })
        .collect()
}

/// Strongest clearly positive and clearly negative sentences across both
/// segments, at most `count` per side. Sentences below the highlight length
/// or inside the neutral band are never highlighted.
pub fn highlights(scorer: &Scorer, opening: &str, qa: &str, count: usize) -> Highlights {
    let mut scored: Vec<Highlight> = Vec::new();
    for (source, text) in [(SegmentKind::Opening, opening), (SegmentKind::Qa, qa)] {
        for sentence in transcript::sentences(text) {
            if sentence.split_whitespace().count() < HIGHLIGHT_MIN_TOKENS {
                continue;
            }
            let compound = scorer.score(&sentence).compound;
            scored.push(Highlight {
                text: sentence,
                source,
                compound,
            });
        }
    }
    let mut positive: Vec<Highlight> = scored
        .iter()
        .filter(|h| SentimentLabel::from_compound(h.compound) == SentimentLabel::Positive)
        .cloned()
        .collect();
    let mut negative: Vec<Highlight> = scored
        .into_iter()
        .filter(|h| SentimentLabel::from_compound(h.compound) == SentimentLabel::Negative)
        .collect();
    positive.sort_by(|a, b| b.compound.total_cmp(&a.compound));
    negative.sort_by(|a, b| a.compound.total_cmp(&b.compound));
    positive.truncate(count);
    negative.truncate(count);
    Highlights { positive, negative }
}

/// Delivery confidence from modal language. The score starts at 0.5 and
/// moves one step per certain or uncertain word, clamped to [0, 1].
pub fn certainty(text: &str) -> Certainty {
    let mut certain = 0usize;
    let mut uncertain = 0usize;
    for raw in text.split_whitespace() {
        let core = raw
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        if core.is_empty() {
            continue;
        }
        if CERTAIN_WORDS.contains(&core.as_str()) {
            certain += 1;
        } else if UNCERTAIN_WORDS.contains(&core.as_str()) {
            uncertain += 1;
        }
    }
    let score = (0.5 + CERTAINTY_STEP * certain as f64 - CERTAINTY_STEP * uncertain as f64)
        .clamp(0.0, 1.0);
    let label = if score > ASSERTIVE_ABOVE {
        CertaintyLabel::Assertive
    } else if score < HEDGED_BELOW {
        CertaintyLabel::Hedged
    } else {
        CertaintyLabel::Neutral
    };
    Certainty {
        score,
        label,
        certain_count: certain,
        uncertain_count: uncertain,
    }
}

/// Sentiment of each named topic, scored over the sentences mentioning any
/// of its trigger words. Topics nobody mentioned score 0.0.
pub fn topic_sentiment(scorer: &Scorer, text: &str) -> Vec<TopicScore> {
    TOPICS
        .iter()
        .map(|&(topic, triggers)| {
            let matched: Vec<&str> = text
                .split('.')
                .map(str::trim)
                .filter(|sentence| {
                    let lower = sentence.to_lowercase();
                    triggers.iter().any(|t| lower.contains(t))
                })
                .collect();
            let compound = if matched.is_empty() {
                0.0
            } else {
                scorer.score(&matched.join(". ")).compound
            };
            TopicScore {
                topic: topic.to_string(),
                compound,
            }
        })
        .collect()
}

/// Sentences mentioning the keyword, case-insensitively, numbered within
/// the highlight-grade enumeration so sequences line up with highlights.
pub fn keyword_context(scorer: &Scorer, text: &str, keyword: &str) -> Vec<SentenceScore> {
    let needle = keyword.to_lowercase();
    transcript::sentences(text)
        .into_iter()
        .filter(|s| s.split_whitespace().count() >= HIGHLIGHT_MIN_TOKENS)
        .enumerate()
        .filter(|(_, s)| s.to_lowercase().contains(&needle))
        .map(|(i, text)| {
            let compound = scorer.score(&text).compound;
            SentenceScore {
                sequence: i + 1,
                text,
                compound,
            }
        })
        .collect()
}

/// Split a raw transcript, attribute the Q&A to one speaker when a name is
/// given, clean both segments, and measure them.
pub fn analyze_transcript(
    scorer: &Scorer,
    segmenter: &Segmenter,
    raw: &str,
    speaker: Option<&str>,
) -> Result<TranscriptAnalysis, SegmentError> {
    let (opening_raw, qa_raw) = segmenter.split(raw)?;
    let qa_attributed = match speaker {
        Some(name) => segmenter.filter_speaker(&qa_raw, name),
        None => qa_raw,
    };
    let opening = transcript::clean(&opening_raw);
    let qa = transcript::clean(&qa_attributed);

    let opening_report = segment_report(scorer, SegmentKind::Opening, &opening);
    let qa_report = segment_report(scorer, SegmentKind::Qa, &qa);
    let shift = qa_report.score.compound - opening_report.score.compound;
    let highlights = highlights(scorer, &opening, &qa, HIGHLIGHT_COUNT);

    let opening_flow: Vec<f64> = opening_report.flow.iter().map(|s| s.compound).collect();
    let qa_flow: Vec<f64> = qa_report.flow.iter().map(|s| s.compound).collect();
    let significance = stats::welch_t_test(&opening_flow, &qa_flow);

    Ok(TranscriptAnalysis {
        opening: opening_report,
        qa: qa_report,
        shift,
        highlights,
        significance,
    })
}

fn segment_report(scorer: &Scorer, kind: SegmentKind, text: &str) -> SegmentReport {
    let score = scorer.score(text);
    SegmentReport {
        kind,
        score,
        label: SentimentLabel::from_compound(score.compound),
        certainty: certainty(text),
        topics: topic_sentiment(scorer, text),
        flow: sentence_scores(scorer, text, FLOW_MIN_TOKENS),
    }
}
