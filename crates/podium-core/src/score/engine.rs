//! Token-walk valence arithmetic over a single passage.
//!
//! Produces a bounded compound score plus positive/neutral/negative
//! proportions. Intensity rules: negations flip and dampen, boosters add
//! magnitude with distance falloff, ALL-CAPS words in mixed-case text and
//! trailing exclamation marks add emphasis, and a "but" reweights the two
//! halves of the sentence toward the clause that follows it.

use crate::score::lexicon::Lexicon;
use crate::types::ToneScore;

/// Multiplier applied to a valence negated within the preceding window.
const NEGATION_FACTOR: f64 = -0.74;
/// Tokens scanned backwards for negators and boosters.
const CONTEXT_WINDOW: usize = 3;
/// Booster falloff by distance from the valenced word.
const BOOST_FALLOFF: [f64; 3] = [1.0, 0.95, 0.9];
/// Extra magnitude for an ALL-CAPS word when the text is mixed-case.
const CAPS_EMPHASIS: f64 = 0.733;
/// Per-exclamation emphasis, counted up to four marks.
const EXCLAIM_EMPHASIS: f64 = 0.292;
const MAX_EXCLAIMS: usize = 4;
/// Clause weights on either side of a "but".
const BEFORE_BUT: f64 = 0.5;
const AFTER_BUT: f64 = 1.5;
/// Normalization constant mapping the raw sum into (-1, 1).
const ALPHA: f64 = 15.0;

struct Token {
    lower: String,
    all_caps: bool,
}

/// Score one passage against the lexicon.
pub(crate) fn evaluate(lexicon: &Lexicon, text: &str) -> ToneScore {
    let tokens = tokenize(text);
    if tokens.is_empty() {
        return ToneScore::neutral();
    }
    let mixed_case = is_mixed_case(&tokens);

    let mut sentiments: Vec<f64> = Vec::with_capacity(tokens.len());
    for (i, token) in tokens.iter().enumerate() {
        let mut valence = match lexicon.valence_of(&token.lower) {
            // Boosters carry no valence of their own.
            Some(_) if lexicon.booster_of(&token.lower).is_some() => 0.0,
            Some(v) => v,
            None => {
                sentiments.push(0.0);
                continue;
            }
        };
        if valence != 0.0 {
            if token.all_caps && mixed_case {
                valence += CAPS_EMPHASIS * valence.signum();
            }
            valence = apply_context(lexicon, &tokens, i, mixed_case, valence);
        }
        sentiments.push(valence);
    }

    weigh_around_but(&tokens, &mut sentiments);

    let emphasis = EXCLAIM_EMPHASIS * text.matches('!').count().min(MAX_EXCLAIMS) as f64;
    let mut sum: f64 = sentiments.iter().sum();
    if sum > 0.0 {
        sum += emphasis;
    } else if sum < 0.0 {
        sum -= emphasis;
    }

    let (positive, neutral, negative) = proportions(&sentiments, emphasis);
    ToneScore {
        compound: normalize(sum),
        positive,
        neutral,
        negative,
    }
}

fn tokenize(text: &str) -> Vec<Token> {
    text.split_whitespace()
        .filter_map(|raw| {
            let core = raw.trim_matches(|c: char| !c.is_alphanumeric());
            if core.is_empty() {
                return None;
            }
            let has_alpha = core.chars().any(char::is_alphabetic);
            let all_caps = has_alpha
                && core.len() > 1
                && core.chars().filter(|c| c.is_alphabetic()).all(char::is_uppercase);
            Some(Token {
                lower: core.to_lowercase(),
                all_caps,
            })
        })
        .collect()
}

fn is_mixed_case(tokens: &[Token]) -> bool {
    let caps = tokens.iter().filter(|t| t.all_caps).count();
    caps > 0 && caps < tokens.len()
}

/// Fold boosters and negations from the preceding window into a valence.
fn apply_context(
    lexicon: &Lexicon,
    tokens: &[Token],
    index: usize,
    mixed_case: bool,
    mut valence: f64,
) -> f64 {
    let mut negated = false;
    for distance in 1..=CONTEXT_WINDOW {
        let Some(back) = index.checked_sub(distance) else {
            break;
        };
        let prior = &tokens[back];
        if let Some(scalar) = lexicon.booster_of(&prior.lower) {
            let mut boost = scalar * BOOST_FALLOFF[distance - 1];
            if prior.all_caps && mixed_case {
                boost += CAPS_EMPHASIS * scalar.signum();
            }
            valence += boost * valence.signum();
        }
        negated |= lexicon.is_negator(&prior.lower);
    }
    if negated {
        valence *= NEGATION_FACTOR;
    }
    valence
}

/// Halve everything before a "but" and amplify everything after it.
fn weigh_around_but(tokens: &[Token], sentiments: &mut [f64]) {
    let Some(pivot) = tokens.iter().position(|t| t.lower == "but") else {
        return;
    };
    for (i, sentiment) in sentiments.iter_mut().enumerate() {
        if i < pivot {
            *sentiment *= BEFORE_BUT;
        } else if i > pivot {
            *sentiment *= AFTER_BUT;
        }
    }
}

/// Positive, neutral, and negative shares of the total intensity.
fn proportions(sentiments: &[f64], emphasis: f64) -> (f64, f64, f64) {
    let mut positive = 0.0;
    let mut negative = 0.0;
    let mut neutral = 0.0;
    for &v in sentiments {
        if v > 0.0 {
            positive += v + 1.0;
        } else if v < 0.0 {
            negative += v - 1.0;
        } else {
            neutral += 1.0;
        }
    }
    if positive > negative.abs() {
        positive += emphasis;
    } else if positive < negative.abs() {
        negative -= emphasis;
    }
    let total = positive + negative.abs() + neutral;
    if total == 0.0 {
        return (0.0, 1.0, 0.0);
    }
    (positive / total, neutral / total, negative.abs() / total)
}

fn normalize(sum: f64) -> f64 {
    if sum == 0.0 {
        return 0.0;
    }
    (sum / (sum * sum + ALPHA).sqrt()).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon() -> Lexicon {
        Lexicon::new()
    }

    fn compound(text: &str) -> f64 {
        evaluate(&lexicon(), text).compound
    }

    #[test]
    fn empty_text_is_neutral() {
        let score = evaluate(&lexicon(), "   ");
        assert_eq!(score.compound, 0.0);
        assert_eq!(score.neutral, 1.0);
        assert_eq!(score.positive, 0.0);
        assert_eq!(score.negative, 0.0);
    }

    #[test]
    fn unknown_words_are_neutral() {
        let score = evaluate(&lexicon(), "The committee met on Tuesday.");
        assert_eq!(score.compound, 0.0);
        assert_eq!(score.neutral, 1.0);
    }

    #[test]
    fn proportions_sum_to_one() {
        let score = evaluate(&lexicon(), "Growth is strong but risk remains elevated.");
        let total = score.positive + score.neutral + score.negative;
        assert!((total - 1.0).abs() < 1e-9, "{total}");
    }

    #[test]
    fn compound_is_bounded() {
        let text = "robust robust robust robust robust robust robust robust";
        let score = evaluate(&lexicon(), text);
        assert!(score.compound > 0.9 && score.compound <= 1.0);
    }

    #[test]
    fn negation_flips_sign() {
        assert!(compound("strong") > 0.0);
        assert!(compound("not strong") < 0.0);
        assert!(compound("conditions are not strong") < 0.0);
    }

    #[test]
    fn booster_amplifies() {
        assert!(compound("very strong growth") > compound("strong growth"));
        assert!(compound("slightly strong growth") < compound("strong growth"));
    }

    #[test]
    fn caps_add_emphasis_in_mixed_case_text() {
        assert!(compound("STRONG growth ahead") > compound("strong growth ahead"));
    }

    #[test]
    fn exclamation_adds_emphasis() {
        assert!(compound("Growth is strong!") > compound("Growth is strong."));
        assert!(compound("Turmoil ahead!") < compound("Turmoil ahead."));
    }

    #[test]
    fn but_weighs_the_later_clause() {
        let grim = compound("Growth is strong but pressure is elevated");
        let bright = compound("Pressure is elevated but growth is strong");
        assert!(bright > grim);
        assert!(bright > 0.0);
        assert!(grim < 0.0);
    }

    #[test]
    fn repeated_evaluation_is_deterministic() {
        let text = "Inflation remains elevated but the labor market is strong.";
        assert_eq!(compound(text), compound(text));
    }
}
