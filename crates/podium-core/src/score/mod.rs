//! Domain-adapted tone scoring for central-bank language.
//!
//! Scoring runs in three steps: hedging words are collected from the raw
//! text, indicator-direction pairs are rewritten into synthetic sentiment
//! tokens, and the rewritten text is pushed through the valence engine. The
//! hedge factors then shrink the compound toward zero, so "inflation might
//! ease" lands closer to neutral than "inflation will ease".

mod engine;
mod lexicon;
mod reversal;

use crate::types::{Audience, SentimentLabel, ToneScore};
use lexicon::Lexicon;
use reversal::Rewriter;

/// Sentiment scorer for press-conference prose.
pub struct Scorer {
    lexicon: Lexicon,
    rewriter: Rewriter,
}

impl Scorer {
    pub fn new() -> Self {
        Self {
            lexicon: Lexicon::new(),
            rewriter: Rewriter::new(),
        }
    }

    /// Score a passage. Empty or whitespace-only text is neutral.
    pub fn score(&self, text: &str) -> ToneScore {
        if text.trim().is_empty() {
            return ToneScore::neutral();
        }
        let damping = self.hedge_damping(text);
        let rewritten = self.rewriter.rewrite(text);
        let mut score = engine::evaluate(&self.lexicon, &rewritten);
        score.compound = (score.compound * damping).clamp(-1.0, 1.0);
        score
    }

    /// Product of the damping factors of every hedge occurrence, taken from
    /// the text before rewriting.
    fn hedge_damping(&self, text: &str) -> f64 {
        text.split_whitespace()
            .filter_map(|raw| {
                let core = raw.trim_matches(|c: char| !c.is_alphanumeric());
                self.lexicon.hedge_of(&core.to_lowercase())
            })
            .product()
    }

    /// One-line reading of a compound score for a given audience.
    pub fn interpret(compound: f64, audience: Audience) -> &'static str {
        match (SentimentLabel::from_compound(compound), audience) {
            (SentimentLabel::Positive, Audience::Investor) => {
                "Dovish-to-optimistic tone; markets tend to read this as supportive for risk assets."
            }
            (SentimentLabel::Negative, Audience::Investor) => {
                "Hawkish or pessimistic tone; markets tend to read this as a signal for caution."
            }
            (SentimentLabel::Neutral, Audience::Investor) => {
                "Balanced, wait-and-see tone with little directional signal for markets."
            }
            (SentimentLabel::Positive, Audience::General) => {
                "The overall message is upbeat: the economy is described as being in good shape."
            }
            (SentimentLabel::Negative, Audience::General) => {
                "The overall message urges caution: conditions are described as difficult."
            }
            (SentimentLabel::Neutral, Audience::General) => {
                "The overall message is steady, with no strongly good or bad news."
            }
        }
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new()
    }
}
