//! Indicator-direction rewriting.
//!
//! "Inflation fell" is good news and "growth fell" is bad news, yet a plain
//! word lookup treats both alike. Before scoring, economic indicator words
//! whose nearby direction word points the favorable way are replaced with
//! `economic_positive`, and the unfavorable way with `economic_negative`.
//! The direction is taken from the first direction word to the right within
//! a short window, skipping auxiliaries and adverbs and never crossing a
//! clause boundary, or failing that from an immediately preceding modifier
//! ("lower inflation").

use std::collections::HashSet;

/// Indicators where rising is unwelcome.
const BAD_INDICATORS: &[&str] = &[
    "inflation",
    "unemployment",
    "cpi",
    "pce",
    "prices",
    "price",
    "cost",
    "risk",
    "uncertainty",
    "volatility",
    "pressure",
];

/// Indicators where rising is welcome.
const GOOD_INDICATORS: &[&str] = &[
    "growth",
    "gdp",
    "employment",
    "jobs",
    "hiring",
    "demand",
    "spending",
    "investment",
    "activity",
    "expansion",
    "recovery",
];

const UP_WORDS: &[&str] = &[
    "rise",
    "increase",
    "grow",
    "climb",
    "jump",
    "accelerate",
    "surge",
    "high",
    "elevated",
    "up",
    "peak",
    "skyrocket",
];

const DOWN_WORDS: &[&str] = &[
    "fall",
    "drop",
    "decline",
    "decrease",
    "slow",
    "cool",
    "moderate",
    "ease",
    "lower",
    "low",
    "down",
    "weak",
    "soft",
    "weaken",
];

/// Words the rightward scan steps over without consuming the window's
/// stopping rule. Anything else that is not a direction word ends the scan.
const AUXILIARIES: &[&str] = &[
    "is", "are", "was", "were", "be", "been", "being", "has", "have", "had", "will", "would",
    "may", "might", "could", "should", "can", "must", "do", "does", "did", "to", "still", "also",
    "now", "more", "less", "remain", "remains", "remained", "stay", "stays", "stayed", "become",
    "becomes", "became",
];

/// Words that open a new clause and end the rightward scan.
const CONJUNCTIONS: &[&str] = &[
    "and", "but", "while", "although", "though", "which", "that", "because", "as", "if", "when",
];

const IRREGULAR_LEMMAS: &[(&str, &str)] = &[
    ("fell", "fall"),
    ("fallen", "fall"),
    ("rose", "rise"),
    ("risen", "rise"),
    ("grew", "grow"),
    ("grown", "grow"),
];

/// Tokens examined to the right of an indicator.
const HEAD_WINDOW: usize = 4;

#[derive(Clone, Copy)]
enum Leaning {
    Good,
    Bad,
}

#[derive(Clone, Copy)]
enum Direction {
    Up,
    Down,
}

/// Rewrites indicator words into synthetic sentiment tokens.
pub(crate) struct Rewriter {
    good: HashSet<&'static str>,
    bad: HashSet<&'static str>,
    up: HashSet<&'static str>,
    down: HashSet<&'static str>,
}

impl Rewriter {
    pub(crate) fn new() -> Self {
        Self {
            good: GOOD_INDICATORS.iter().copied().collect(),
            bad: BAD_INDICATORS.iter().copied().collect(),
            up: UP_WORDS.iter().copied().collect(),
            down: DOWN_WORDS.iter().copied().collect(),
        }
    }

    /// Rewrite every indicator with a resolvable direction; all other tokens
    /// pass through untouched, with the text rejoined on single spaces.
    pub(crate) fn rewrite(&self, text: &str) -> String {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let mut out: Vec<String> = Vec::with_capacity(tokens.len());
        for (i, raw) in tokens.iter().enumerate() {
            out.push(self.rewrite_token(&tokens, i).unwrap_or_else(|| (*raw).to_string()));
        }
        out.join(" ")
    }

    fn rewrite_token(&self, tokens: &[&str], i: usize) -> Option<String> {
        let (prefix, core, suffix) = split_token(tokens[i]);
        let lower = core.to_lowercase();
        let leaning = self.leaning_of(self.canonical(&lower)?)?;
        let direction = self
            .head_direction(tokens, i)
            .or_else(|| self.child_direction(tokens, i))?;
        let synthetic = match (leaning, direction) {
            (Leaning::Bad, Direction::Down) | (Leaning::Good, Direction::Up) => "economic_positive",
            (Leaning::Bad, Direction::Up) | (Leaning::Good, Direction::Down) => "economic_negative",
        };
        Some(format!("{prefix}{synthetic}{suffix}"))
    }

    /// First direction word within the window to the right, or None if a
    /// clause boundary or an unrelated content word is hit first.
    fn head_direction(&self, tokens: &[&str], i: usize) -> Option<Direction> {
        let end = tokens.len().min(i + 1 + HEAD_WINDOW);
        for j in (i + 1)..end {
            let (_, _, prior_suffix) = split_token(tokens[j - 1]);
            if has_clause_punct(prior_suffix) {
                return None;
            }
            let (_, core, _) = split_token(tokens[j]);
            let lower = core.to_lowercase();
            if CONJUNCTIONS.contains(&lower.as_str()) {
                return None;
            }
            if let Some(direction) = self.canonical(&lower).and_then(|l| self.direction_of(l)) {
                return Some(direction);
            }
            if AUXILIARIES.contains(&lower.as_str()) || lower.ends_with("ly") {
                continue;
            }
            return None;
        }
        None
    }

    /// Direction word immediately before the indicator, as in "lower
    /// inflation", unless a clause boundary separates them.
    fn child_direction(&self, tokens: &[&str], i: usize) -> Option<Direction> {
        if i == 0 {
            return None;
        }
        let (_, core, suffix) = split_token(tokens[i - 1]);
        if has_clause_punct(suffix) {
            return None;
        }
        let lower = core.to_lowercase();
        if CONJUNCTIONS.contains(&lower.as_str()) {
            return None;
        }
        self.canonical(&lower).and_then(|l| self.direction_of(l))
    }

    fn leaning_of(&self, lemma: &str) -> Option<Leaning> {
        if self.bad.contains(lemma) {
            Some(Leaning::Bad)
        } else if self.good.contains(lemma) {
            Some(Leaning::Good)
        } else {
            None
        }
    }

    fn direction_of(&self, lemma: &str) -> Option<Direction> {
        if self.up.contains(lemma) {
            Some(Direction::Up)
        } else if self.down.contains(lemma) {
            Some(Direction::Down)
        } else {
            None
        }
    }

    /// Reduce an inflected form to a lemma known to the vocabulary. Returns
    /// the word itself when it is already known, otherwise tries irregular
    /// past forms and common suffix strips.
    fn canonical(&self, word: &str) -> Option<&'static str> {
        if let Some(known) = self.lookup(word) {
            return Some(known);
        }
        if let Some(&(_, lemma)) = IRREGULAR_LEMMAS.iter().find(|(form, _)| *form == word) {
            return self.lookup(lemma);
        }
        for candidate in suffix_candidates(word) {
            if let Some(known) = self.lookup(&candidate) {
                return Some(known);
            }
        }
        None
    }

    fn lookup(&self, word: &str) -> Option<&'static str> {
        self.bad
            .get(word)
            .or_else(|| self.good.get(word))
            .or_else(|| self.up.get(word))
            .or_else(|| self.down.get(word))
            .copied()
    }
}

/// Stems produced by stripping plural, past, progressive, and comparative
/// endings, with e-restoration and consonant undoubling variants.
fn suffix_candidates(word: &str) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(stem) = word.strip_suffix("ies") {
        out.push(format!("{stem}y"));
    }
    if word.len() > 3 {
        if let Some(stem) = word.strip_suffix("ed") {
            push_stems(&mut out, stem, true);
        }
        if let Some(stem) = word.strip_suffix("ing") {
            push_stems(&mut out, stem, true);
        }
        if let Some(stem) = word.strip_suffix("est") {
            push_stems(&mut out, stem, false);
        }
        if let Some(stem) = word.strip_suffix("er") {
            push_stems(&mut out, stem, false);
        }
        if let Some(stem) = word.strip_suffix("es") {
            out.push(stem.to_string());
        }
    }
    if word.len() > 2 {
        if let Some(stem) = word.strip_suffix('s') {
            out.push(stem.to_string());
        }
    }
    out
}

fn push_stems(out: &mut Vec<String>, stem: &str, restore_e: bool) {
    out.push(stem.to_string());
    if restore_e {
        out.push(format!("{stem}e"));
    }
    let bytes = stem.as_bytes();
    if bytes.len() >= 2 && bytes[bytes.len() - 1] == bytes[bytes.len() - 2] {
        out.push(stem[..stem.len() - 1].to_string());
    }
}

fn split_token(raw: &str) -> (&str, &str, &str) {
    let Some(start) = raw.find(|c: char| c.is_alphanumeric()) else {
        return (raw, "", "");
    };
    let end = raw
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_alphanumeric())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(start);
    (&raw[..start], &raw[start..end], &raw[end..])
}

fn has_clause_punct(suffix: &str) -> bool {
    suffix
        .chars()
        .any(|c| matches!(c, ',' | ';' | ':' | '.' | '!' | '?'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewriter() -> Rewriter {
        Rewriter::new()
    }

    #[test]
    fn falling_bad_indicator_reads_positive() {
        assert_eq!(
            rewriter().rewrite("Inflation fell sharply."),
            "economic_positive fell sharply."
        );
    }

    #[test]
    fn rising_bad_indicator_reads_negative() {
        assert_eq!(
            rewriter().rewrite("Inflation rose sharply."),
            "economic_negative rose sharply."
        );
    }

    #[test]
    fn falling_good_indicator_reads_negative() {
        assert_eq!(rewriter().rewrite("Growth fell."), "economic_negative fell.");
    }

    #[test]
    fn preceding_modifier_resolves_direction() {
        assert_eq!(
            rewriter().rewrite("We expect lower inflation."),
            "We expect lower economic_positive."
        );
    }

    #[test]
    fn comparative_modifier_is_stemmed() {
        assert_eq!(
            rewriter().rewrite("Higher inflation hurts everyone."),
            "Higher economic_negative hurts everyone."
        );
    }

    #[test]
    fn scan_skips_auxiliaries_and_adverbs() {
        assert_eq!(
            rewriter().rewrite("Inflation is still elevated."),
            "economic_negative is still elevated."
        );
    }

    #[test]
    fn clause_boundary_stops_the_scan() {
        // "risk" must not borrow the direction from the clause after "that".
        assert_eq!(
            rewriter().rewrite("There is a risk that inflation rises."),
            "There is a risk that economic_negative rises."
        );
    }

    #[test]
    fn punctuation_is_preserved_on_rewritten_tokens() {
        assert_eq!(
            rewriter().rewrite("Unemployment climbed, while growth slowed."),
            "economic_negative climbed, while economic_negative slowed."
        );
    }

    #[test]
    fn indicator_without_direction_is_untouched() {
        assert_eq!(
            rewriter().rewrite("Inflation expectations are anchored."),
            "Inflation expectations are anchored."
        );
    }

    #[test]
    fn whitespace_is_collapsed() {
        assert_eq!(rewriter().rewrite("Inflation   fell"), "economic_positive fell");
    }
}
