//! Valence tables behind the scorer.
//!
//! A general-English base layer is overlaid with financial vocabulary, so a
//! domain entry always wins over the base entry for the same word. Direction
//! verbs ("fell", "climbed") are deliberately absent from both layers; their
//! effect on indicator words is resolved before lookup, in `reversal`.

use std::collections::{HashMap, HashSet};

/// General-English sentiment values, roughly on a -3.5..3.5 scale.
const BASE_VALENCE: &[(&str, f64)] = &[
    // Approval and progress
    ("accomplish", 1.8),
    ("achieve", 1.7),
    ("advantage", 1.6),
    ("agree", 1.5),
    ("appropriate", 0.8),
    ("balanced", 1.3),
    ("benefit", 1.9),
    ("benign", 1.4),
    ("best", 3.2),
    ("better", 1.9),
    ("calm", 1.3),
    ("capable", 1.6),
    ("careful", 0.8),
    ("clarity", 1.4),
    ("comfortable", 1.7),
    ("committed", 1.4),
    ("confidence", 1.8),
    ("confident", 2.2),
    ("constructive", 1.6),
    ("credible", 1.6),
    ("durable", 1.5),
    ("effective", 1.8),
    ("efficient", 1.6),
    ("encourage", 1.5),
    ("encouraging", 1.9),
    ("favorable", 1.9),
    ("fine", 1.2),
    ("gains", 1.6),
    ("glad", 1.9),
    ("good", 1.9),
    ("great", 3.1),
    ("happy", 2.7),
    ("health", 1.7),
    ("healthy", 1.9),
    ("help", 1.7),
    ("helpful", 1.6),
    ("hope", 1.9),
    ("hopeful", 1.8),
    ("impressive", 2.3),
    ("improve", 1.9),
    ("improved", 2.0),
    ("improvement", 1.9),
    ("intact", 1.0),
    ("manageable", 1.2),
    ("momentum", 1.4),
    ("normal", 0.9),
    ("opportunity", 1.8),
    ("optimism", 2.0),
    ("orderly", 1.2),
    ("patient", 1.1),
    ("please", 1.0),
    ("positive", 2.1),
    ("productive", 1.8),
    ("productivity", 1.3),
    ("progress", 1.8),
    ("promising", 1.9),
    ("prosperity", 2.4),
    ("prudent", 1.3),
    ("reassure", 1.5),
    ("reassuring", 1.7),
    ("recover", 1.6),
    ("relief", 1.9),
    ("remarkable", 2.1),
    ("resilience", 1.8),
    ("restore", 1.4),
    ("safe", 1.8),
    ("satisfied", 1.9),
    ("secure", 1.5),
    ("smooth", 1.3),
    ("smoothly", 1.3),
    ("stability", 1.8),
    ("steadily", 1.1),
    ("steady", 1.2),
    ("strong", 2.3),
    ("succeed", 2.2),
    ("success", 2.7),
    ("successful", 2.4),
    ("support", 1.7),
    ("supportive", 1.6),
    ("sustain", 1.2),
    ("sustainable", 1.6),
    ("sustained", 1.1),
    ("thank", 1.7),
    ("thanks", 1.9),
    ("transparent", 1.4),
    ("trust", 2.0),
    ("useful", 1.5),
    ("vibrant", 2.0),
    ("welcome", 1.9),
    ("well", 1.1),
    // Alarm and deterioration
    ("abrupt", -1.1),
    ("adverse", -1.7),
    ("alarm", -1.9),
    ("alarming", -2.2),
    ("bad", -2.5),
    ("bankruptcy", -2.6),
    ("bleak", -2.1),
    ("burden", -1.6),
    ("collapse", -2.7),
    ("concern", -1.4),
    ("concerned", -1.5),
    ("concerning", -1.7),
    ("conflict", -1.8),
    ("constrained", -1.2),
    ("contraction", -1.9),
    ("costly", -1.5),
    ("damage", -2.2),
    ("danger", -2.4),
    ("dangerous", -2.2),
    ("default", -2.0),
    ("deficit", -1.4),
    ("deteriorate", -2.0),
    ("deterioration", -2.0),
    ("difficult", -1.5),
    ("difficulty", -1.5),
    ("disappointing", -2.0),
    ("disorderly", -1.8),
    ("disrupt", -1.6),
    ("disruption", -1.7),
    ("distress", -2.2),
    ("doubt", -1.5),
    ("drag", -1.2),
    ("dysfunction", -2.0),
    ("emergency", -1.9),
    ("erode", -1.5),
    ("fail", -2.3),
    ("failure", -2.3),
    ("fear", -2.2),
    ("fragile", -1.8),
    ("harm", -2.1),
    ("hurt", -1.9),
    ("imbalance", -1.3),
    ("impaired", -1.7),
    ("inadequate", -1.6),
    ("instability", -2.0),
    ("insufficient", -1.4),
    ("lose", -1.9),
    ("loss", -2.1),
    ("losses", -2.1),
    ("mistake", -1.9),
    ("negative", -1.9),
    ("overheating", -1.3),
    ("panic", -2.6),
    ("pessimistic", -1.9),
    ("poor", -2.1),
    ("problem", -1.7),
    ("problems", -1.7),
    ("risky", -1.6),
    ("severe", -1.9),
    ("shock", -1.8),
    ("shortage", -1.6),
    ("shortfall", -1.5),
    ("strain", -1.5),
    ("stress", -1.7),
    ("struggle", -1.9),
    ("trouble", -1.8),
    ("turbulence", -1.7),
    ("unable", -1.2),
    ("unanchored", -1.5),
    ("unfavorable", -1.8),
    ("unstable", -1.9),
    ("unsustainable", -1.8),
    ("vulnerability", -1.5),
    ("vulnerable", -1.6),
    ("war", -2.9),
    ("warning", -1.4),
    ("worried", -1.9),
    ("worry", -1.8),
    ("worse", -2.1),
    ("worsen", -2.0),
    ("worst", -3.1),
    ("wrong", -1.7),
];

/// Financial overlay tuned for central-bank language. Entries here replace
/// the base value for the same word. The `economic_*` tokens are synthetic;
/// they only enter text through the indicator-direction rewrite. Plain
/// downward words are pinned to 0.0 so that "lower inflation" is judged by
/// the rewrite, not by the words themselves.
const DOMAIN_VALENCE: &[(&str, f64)] = &[
    ("robust", 2.0),
    ("strong", 1.5),
    ("growth", 1.5),
    ("stable", 1.5),
    ("expansion", 1.5),
    ("resilient", 1.5),
    ("optimistic", 1.0),
    ("solid", 1.5),
    ("anchored", 1.0),
    ("recalibration", 0.5),
    ("confidence", 1.5),
    ("remains", 0.5),
    ("carefully", 0.5),
    ("easing", 1.0),
    ("eased", 1.0),
    ("moderating", 1.0),
    ("soft", 1.0),
    ("hike", -1.0),
    ("turmoil", -2.5),
    ("volatility", -1.5),
    ("recession", -3.0),
    ("weak", -1.5),
    ("slowdown", -1.5),
    ("cooling", -0.5),
    ("cooled", -0.5),
    ("uncertainty", -1.0),
    ("risk", -1.0),
    ("downside", -1.5),
    ("pressure", -1.0),
    ("restrictive", -1.0),
    ("tightening", -0.5),
    ("crisis", -3.0),
    ("painful", -2.0),
    ("pandemic", -2.0),
    ("increases", -1.0),
    ("increase", -1.0),
    ("bottlenecks", -1.5),
    ("transitory", -0.5),
    ("elevated", -1.5),
    ("hard", -1.5),
    ("unemployment", -1.5),
    ("inflation", -1.5),
    ("economic_positive", 2.5),
    ("economic_negative", -2.5),
    ("lower", 0.0),
    ("low", 0.0),
    ("cut", 0.0),
    ("drop", 0.0),
    ("decrease", 0.0),
    ("declining", 0.0),
];

/// Intensity modifiers. The scalar is added to (or subtracted from) the
/// magnitude of the next valenced word within three tokens.
const BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", 0.293),
    ("considerably", 0.293),
    ("deeply", 0.293),
    ("especially", 0.293),
    ("exceptionally", 0.293),
    ("extremely", 0.293),
    ("greatly", 0.293),
    ("highly", 0.293),
    ("markedly", 0.293),
    ("notably", 0.293),
    ("particularly", 0.293),
    ("quite", 0.293),
    ("really", 0.293),
    ("remarkably", 0.293),
    ("sharply", 0.293),
    ("significantly", 0.293),
    ("so", 0.293),
    ("substantially", 0.293),
    ("truly", 0.293),
    ("very", 0.293),
    ("barely", -0.293),
    ("hardly", -0.293),
    ("marginally", -0.293),
    ("modestly", -0.293),
    ("partially", -0.293),
    ("partly", -0.293),
    ("relatively", -0.293),
    ("slightly", -0.293),
    ("somewhat", -0.293),
];

const NEGATORS: &[&str] = &[
    "no",
    "not",
    "never",
    "neither",
    "nor",
    "nothing",
    "without",
    "rarely",
    "seldom",
    "isn't",
    "wasn't",
    "aren't",
    "don't",
    "doesn't",
    "didn't",
    "won't",
    "can't",
    "cannot",
    "couldn't",
    "shouldn't",
    "wouldn't",
    "hasn't",
    "haven't",
];

/// Hedging words and the factor each occurrence applies to the compound.
const HEDGES: &[(&str, f64)] = &[
    ("might", 0.8),
    ("may", 0.85),
    ("could", 0.85),
    ("perhaps", 0.8),
    ("possibly", 0.8),
    ("probably", 0.9),
    ("likely", 0.9),
    ("unlikely", 0.9),
    ("somewhat", 0.9),
    ("seems", 0.9),
    ("appears", 0.9),
    ("suggests", 0.9),
];

/// Word tables consulted by the valence engine.
pub struct Lexicon {
    valence: HashMap<&'static str, f64>,
    boosters: HashMap<&'static str, f64>,
    negators: HashSet<&'static str>,
    hedges: HashMap<&'static str, f64>,
}

impl Lexicon {
    pub fn new() -> Self {
        let mut valence: HashMap<&'static str, f64> =
            HashMap::with_capacity(BASE_VALENCE.len() + DOMAIN_VALENCE.len());
        for &(word, value) in BASE_VALENCE {
            valence.insert(word, value);
        }
        for &(word, value) in DOMAIN_VALENCE {
            valence.insert(word, value);
        }
        Self {
            valence,
            boosters: BOOSTERS.iter().copied().collect(),
            negators: NEGATORS.iter().copied().collect(),
            hedges: HEDGES.iter().copied().collect(),
        }
    }

    /// Valence of a lowercased word, if it carries any.
    pub fn valence_of(&self, word: &str) -> Option<f64> {
        self.valence.get(word).copied()
    }

    /// Signed intensity scalar for a lowercased booster word.
    pub fn booster_of(&self, word: &str) -> Option<f64> {
        self.boosters.get(word).copied()
    }

    pub fn is_negator(&self, word: &str) -> bool {
        self.negators.contains(word)
    }

    /// Damping factor for a lowercased hedge word.
    pub fn hedge_of(&self, word: &str) -> Option<f64> {
        self.hedges.get(word).copied()
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_layer_overrides_base_layer() {
        let lexicon = Lexicon::new();
        // Both layers carry these words; the financial value must win.
        assert_eq!(lexicon.valence_of("strong"), Some(1.5));
        assert_eq!(lexicon.valence_of("confidence"), Some(1.5));
    }

    #[test]
    fn synthetic_tokens_are_present() {
        let lexicon = Lexicon::new();
        assert_eq!(lexicon.valence_of("economic_positive"), Some(2.5));
        assert_eq!(lexicon.valence_of("economic_negative"), Some(-2.5));
    }

    #[test]
    fn downward_words_are_neutralized() {
        let lexicon = Lexicon::new();
        for word in ["lower", "low", "cut", "drop", "decrease", "declining"] {
            assert_eq!(lexicon.valence_of(word), Some(0.0), "{word}");
        }
    }

    #[test]
    fn direction_verbs_are_absent() {
        let lexicon = Lexicon::new();
        for word in ["fell", "fall", "rose", "rise", "climbed"] {
            assert_eq!(lexicon.valence_of(word), None, "{word}");
        }
    }

    #[test]
    fn booster_signs() {
        let lexicon = Lexicon::new();
        assert!(lexicon.booster_of("very").is_some_and(|v| v > 0.0));
        assert!(lexicon.booster_of("slightly").is_some_and(|v| v < 0.0));
        assert_eq!(lexicon.booster_of("inflation"), None);
    }

    #[test]
    fn negators_and_hedges() {
        let lexicon = Lexicon::new();
        assert!(lexicon.is_negator("not"));
        assert!(lexicon.is_negator("won't"));
        assert!(!lexicon.is_negator("will"));
        assert_eq!(lexicon.hedge_of("might"), Some(0.8));
        assert_eq!(lexicon.hedge_of("will"), None);
    }
}
