use crate::SegmentError;
use crate::types::SpeakerTurn;
use regex::{Regex, RegexBuilder};
use time::{Date, Month};

/// Moderator whose first marked turn doubles as a split fallback when no
/// closing phrase is present.
pub const DEFAULT_MODERATOR: &str = "MICHELLE SMITH";

/// Closing phrases that end the prepared statement, in priority order.
/// The first pattern with a match anywhere in the text decides the split,
/// regardless of where the other patterns would have matched.
const SEPARATOR_PATTERNS: [&str; 3] = [
    r"look\s+forward\s+to\s+(?:taking|answering|your)?\s*questions",
    r"(?:glad|happy|prepared)\s+to\s+(?:take|answer)\s+(?:your)?\s*questions",
    r"questions\s*,?\s*please",
];

const NAME_TAG_PATTERN: &str = r"<NAME>(.*?)</NAME>";
const MARKUP_PATTERN: &str = r"<[^>]+>";
const FILE_DATE_PATTERN: &str = r"\d{8}";

/// Strips `<...>` markup and collapses whitespace runs to single spaces.
/// Idempotent: cleaning a cleaned text is a no-op.
pub fn clean(text: &str) -> String {
    let markup = Regex::new(MARKUP_PATTERN).expect("markup pattern is valid");
    let stripped = markup.replace_all(text, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits transcripts at the opening/Q&A boundary and parses speaker markup.
pub struct Segmenter {
    separators: Vec<Regex>,
    moderator: Regex,
    name_tag: Regex,
}

impl Segmenter {
    pub fn new() -> Self {
        Self::with_moderator(DEFAULT_MODERATOR)
    }

    pub fn with_moderator(moderator: &str) -> Self {
        let separators = SEPARATOR_PATTERNS
            .iter()
            .map(|pattern| build_pattern(pattern))
            .collect();
        let moderator_pattern = format!("<NAME>[^<]*{}[^<]*</NAME>", regex::escape(moderator));
        Self {
            separators,
            moderator: build_pattern(&moderator_pattern),
            name_tag: build_pattern(NAME_TAG_PATTERN),
        }
    }

    /// Splits `text` into (opening, qa). The Q&A half starts at the matched
    /// separator phrase, so the phrase itself belongs to the Q&A segment.
    /// Refuses to guess when nothing matches.
    pub fn split(&self, text: &str) -> Result<(String, String), SegmentError> {
        for separator in &self.separators {
            if let Some(found) = separator.find(text) {
                return Ok(split_at(text, found.start()));
            }
        }
        if let Some(found) = self.moderator.find(text) {
            return Ok(split_at(text, found.start()));
        }
        Err(SegmentError::SeparatorNotFound)
    }

    /// Parses `<NAME>...</NAME>` markers pairwise: each marker names the
    /// speaker of everything up to the next marker or end of input.
    pub fn speaker_turns(&self, text: &str) -> Vec<SpeakerTurn> {
        let marks: Vec<(usize, usize, String)> = self
            .name_tag
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let name = caps.get(1)?.as_str().trim().to_string();
                Some((whole.start(), whole.end(), name))
            })
            .collect();

        let mut turns = Vec::with_capacity(marks.len());
        for (i, (_, content_start, speaker)) in marks.iter().enumerate() {
            let content_end = marks.get(i + 1).map(|m| m.0).unwrap_or(text.len());
            turns.push(SpeakerTurn {
                speaker: speaker.clone(),
                content: text[*content_start..content_end].trim().to_string(),
            });
        }
        turns
    }

    /// Keeps only the turns whose speaker name contains `target`
    /// (case-insensitive substring, so honorific variants still match) and
    /// joins their content with single spaces.
    ///
    /// Text without any markers passes through unchanged. Text with markers
    /// but no matching speaker yields an empty string: attributable content
    /// exists, none of it belongs to the target.
    pub fn filter_speaker(&self, text: &str, target: &str) -> String {
        if !self.name_tag.is_match(text) {
            return text.to_string();
        }
        let needle = target.trim().to_uppercase();
        let blocks: Vec<String> = self
            .speaker_turns(text)
            .into_iter()
            .filter(|turn| turn.speaker.to_uppercase().contains(&needle))
            .map(|turn| turn.content)
            .collect();
        blocks.join(" ")
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new()
    }
}

fn build_pattern(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .expect("segmenter pattern is valid")
}

fn split_at(text: &str, boundary: usize) -> (String, String) {
    let opening = text[..boundary].trim().to_string();
    let qa = text[boundary..].trim().to_string();
    (opening, qa)
}

/// Rule-based sentence splitter: breaks after `.`, `!` or `?` followed by
/// whitespace. Periods inside numbers ("2.5") stay put; abbreviation shards
/// that do split are short enough for token-minimum filters to drop.
pub fn sentences(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, ch)) = chars.next() {
        if matches!(ch, '.' | '!' | '?') {
            let at_break = match chars.peek() {
                Some((_, next)) => next.is_whitespace(),
                None => true,
            };
            if at_break {
                let end = i + ch.len_utf8();
                let sentence = text[start..end].trim();
                if !sentence.is_empty() {
                    out.push(sentence.to_string());
                }
                start = end;
            }
        }
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        out.push(tail.to_string());
    }
    out
}

/// Extracts a date from an 8-digit `YYYYMMDD` run in a filename, e.g.
/// `FOMCpresconf20200916.txt`. Returns `None` when no valid date is present.
pub fn date_from_filename(filename: &str) -> Option<Date> {
    let digits = Regex::new(FILE_DATE_PATTERN).expect("date pattern is valid");
    let run = digits.find(filename)?.as_str();
    let year: i32 = run[0..4].parse().ok()?;
    let month: u8 = run[4..6].parse().ok()?;
    let day: u8 = run[6..8].parse().ok()?;
    let month = Month::try_from(month).ok()?;
    Date::from_calendar_date(year, month, day).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_strips_markup_and_collapses_whitespace() {
        let cleaned = clean("<NAME>CHAIR</NAME>  Good\n\tafternoon.  ");
        assert_eq!(cleaned, "CHAIR Good afternoon.");
    }

    #[test]
    fn clean_is_idempotent() {
        let once = clean("<p>some   <b>text</b></p>");
        assert_eq!(clean(&once), once);
        assert!(!once.contains('<'));
    }

    #[test]
    fn split_on_look_forward_phrase() {
        let segmenter = Segmenter::new();
        let text = "The economy is strong. I look forward to your questions. First question?";
        let (opening, qa) = segmenter.split(text).unwrap();
        assert_eq!(opening, "The economy is strong. I");
        assert!(qa.starts_with("look forward to your questions."));
        assert!(qa.ends_with("First question?"));
    }

    #[test]
    fn split_prefers_pattern_priority_over_textual_order() {
        let segmenter = Segmenter::new();
        // "questions, please" appears first in the text, but the
        // look-forward pattern has higher priority and wins.
        let text = "Questions, please hold. More remarks. We look forward to taking questions now.";
        let (opening, qa) = segmenter.split(text).unwrap();
        assert!(opening.ends_with("More remarks. We"));
        assert!(qa.starts_with("look forward to taking questions now."));
    }

    #[test]
    fn split_matches_glad_to_take_variant() {
        let segmenter = Segmenter::new();
        let text = "Inflation has eased. I would be glad to take your questions today.";
        let (opening, qa) = segmenter.split(text).unwrap();
        assert_eq!(opening, "Inflation has eased. I would be");
        assert!(qa.starts_with("glad to take your questions"));
    }

    #[test]
    fn split_falls_back_to_moderator_marker() {
        let segmenter = Segmenter::new();
        let text = "Prepared remarks here. <NAME>MICHELLE SMITH</NAME> First question goes to Reuters.";
        let (opening, qa) = segmenter.split(text).unwrap();
        assert_eq!(opening, "Prepared remarks here.");
        assert!(qa.starts_with("<NAME>MICHELLE SMITH</NAME>"));
    }

    #[test]
    fn split_without_separator_is_an_error() {
        let segmenter = Segmenter::new();
        let err = segmenter.split("no separator here").unwrap_err();
        assert!(matches!(err, SegmentError::SeparatorNotFound));
    }

    #[test]
    fn filter_speaker_keeps_only_target_turns() {
        let segmenter = Segmenter::new();
        let text = "<NAME>CHAIR POWELL</NAME>Hello.<NAME>REPORTER</NAME>Why?";
        assert_eq!(segmenter.filter_speaker(text, "CHAIR POWELL"), "Hello.");
    }

    #[test]
    fn filter_speaker_matches_substring_case_insensitively() {
        let segmenter = Segmenter::new();
        let text = "<NAME>Chair Jerome Powell</NAME>First.<NAME>MS. SMITH</NAME>Next.<NAME>CHAIR POWELL</NAME>Second.";
        assert_eq!(segmenter.filter_speaker(text, "powell"), "First. Second.");
    }

    #[test]
    fn filter_speaker_passes_markerless_text_through() {
        let segmenter = Segmenter::new();
        let text = "just a single speaker with no markup";
        assert_eq!(segmenter.filter_speaker(text, "POWELL"), text);
    }

    #[test]
    fn filter_speaker_empty_when_markers_exist_but_target_absent() {
        let segmenter = Segmenter::new();
        let text = "<NAME>REPORTER</NAME>A question.";
        assert_eq!(segmenter.filter_speaker(text, "POWELL"), "");
    }

    #[test]
    fn speaker_turns_run_to_next_marker_or_end() {
        let segmenter = Segmenter::new();
        let text = "<NAME>A</NAME>first turn <NAME>B</NAME>last turn runs to the end";
        let turns = segmenter.speaker_turns(text);
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].speaker, "A");
        assert_eq!(turns[0].content, "first turn");
        assert_eq!(turns[1].content, "last turn runs to the end");
    }

    #[test]
    fn sentences_break_on_terminators_not_decimals() {
        let split = sentences("Growth hit 2.5 percent. Inflation cooled! Is that enough? Yes");
        assert_eq!(
            split,
            vec![
                "Growth hit 2.5 percent.",
                "Inflation cooled!",
                "Is that enough?",
                "Yes",
            ]
        );
    }

    #[test]
    fn sentences_of_empty_text_is_empty() {
        assert!(sentences("").is_empty());
        assert!(sentences("   ").is_empty());
    }

    #[test]
    fn date_from_filename_parses_eight_digit_runs() {
        let date = date_from_filename("FOMCpresconf20200916.txt").unwrap();
        assert_eq!(date.year(), 2020);
        assert_eq!(u8::from(date.month()), 9);
        assert_eq!(date.day(), 16);
    }

    #[test]
    fn date_from_filename_rejects_invalid_or_missing_dates() {
        assert!(date_from_filename("transcript.txt").is_none());
        assert!(date_from_filename("FOMC20201345.txt").is_none());
    }
}
