//! Cross-checking the lexicon scorer against an external financial-text
//! classifier over a sampled subset of sentences.

pub mod finbert;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::error::ClassifyError;
use crate::stats::{self, Correlation};
use crate::types::SentenceScore;

/// Sentences sampled per validation run by default.
pub const DEFAULT_SAMPLE_SIZE: usize = 30;

/// Class probabilities returned by a reference classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassProbs {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

impl ClassProbs {
    /// Collapse to one signed score comparable with a compound.
    pub fn scalar(&self) -> f64 {
        self.positive - self.negative
    }
}

/// Financial-text classifier abstraction.
pub trait ReferenceClassifier {
    fn name(&self) -> &'static str;
    fn classify(&self, text: &str) -> Result<ClassProbs, ClassifyError>;
}

/// Create a reference classifier by name.
///
/// - `"finbert"` requires an API key; `model` selects the hosted model
///   (defaults to `ProsusAI/finbert`).
pub fn create_classifier(
    provider: &str,
    model: Option<&str>,
    api_key: Option<&str>,
) -> Result<Box<dyn ReferenceClassifier>, ClassifyError> {
    match provider {
        "finbert" => Ok(Box::new(finbert::FinbertProvider::new(model, api_key)?)),
        other => Err(ClassifyError::Init(format!(
            "unknown classifier provider: {other}"
        ))),
    }
}

/// One sampled sentence scored by both sides.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationPair {
    pub text: String,
    pub internal: f64,
    pub reference: f64,
}

/// Agreement between the lexicon scorer and the reference classifier.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationOutcome {
    pub correlation: Correlation,
    pub samples: Vec<ValidationPair>,
}

/// Sample up to `sample_size` sentences with a seeded generator, classify
/// each remotely, and correlate the two scores. Sentences the classifier
/// rejects are skipped with a note on stderr; fewer than two classified
/// samples leave the degenerate correlation (r = 0, p = 1).
pub fn validate_sample(
    classifier: &dyn ReferenceClassifier,
    pool: &[SentenceScore],
    sample_size: usize,
    seed: u64,
) -> ValidationOutcome {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut samples = Vec::new();
    for sentence in pool.choose_multiple(&mut rng, sample_size) {
        match classifier.classify(&sentence.text) {
            Ok(probs) => samples.push(ValidationPair {
                text: sentence.text.clone(),
                internal: sentence.compound,
                reference: probs.scalar(),
            }),
            Err(err) => eprintln!("skipping sentence {}: {err}", sentence.sequence),
        }
    }

    let internal: Vec<f64> = samples.iter().map(|p| p.internal).collect();
    let reference: Vec<f64> = samples.iter().map(|p| p.reference).collect();
    ValidationOutcome {
        correlation: stats::pearson(&internal, &reference),
        samples,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Classifies by keyword so agreement with the pool is controllable.
    struct KeywordClassifier;

    impl ReferenceClassifier for KeywordClassifier {
        fn name(&self) -> &'static str {
            "keyword"
        }

        fn classify(&self, text: &str) -> Result<ClassProbs, ClassifyError> {
            if text.contains("unreachable") {
                return Err(ClassifyError::Network("boom".into()));
            }
            if text.contains("good") {
                Ok(ClassProbs {
                    positive: 0.9,
                    neutral: 0.05,
                    negative: 0.05,
                })
            } else {
                Ok(ClassProbs {
                    positive: 0.05,
                    neutral: 0.05,
                    negative: 0.9,
                })
            }
        }
    }

    fn sentence(sequence: usize, text: &str, compound: f64) -> SentenceScore {
        SentenceScore {
            sequence,
            text: text.to_string(),
            compound,
        }
    }

    #[test]
    fn scalar_is_positive_minus_negative() {
        let probs = ClassProbs {
            positive: 0.7,
            neutral: 0.1,
            negative: 0.2,
        };
        assert!((probs.scalar() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn agreement_yields_a_strong_correlation() {
        let pool = vec![
            sentence(1, "good news one", 0.6),
            sentence(2, "good news two", 0.5),
            sentence(3, "grim news one", -0.5),
            sentence(4, "grim news two", -0.6),
        ];
        let outcome = validate_sample(&KeywordClassifier, &pool, 10, 42);
        assert_eq!(outcome.samples.len(), 4);
        assert!(outcome.correlation.r > 0.9);
    }

    #[test]
    fn classifier_failures_are_skipped() {
        let pool = vec![
            sentence(1, "good news", 0.5),
            sentence(2, "unreachable text", 0.1),
            sentence(3, "grim news", -0.5),
        ];
        let outcome = validate_sample(&KeywordClassifier, &pool, 10, 42);
        assert_eq!(outcome.samples.len(), 2);
        assert!(outcome.samples.iter().all(|p| !p.text.contains("unreachable")));
    }

    #[test]
    fn too_few_samples_leave_the_degenerate_correlation() {
        let pool = vec![sentence(1, "good news", 0.5)];
        let outcome = validate_sample(&KeywordClassifier, &pool, 10, 42);
        assert_eq!(outcome.samples.len(), 1);
        assert_eq!(outcome.correlation.r, 0.0);
        assert_eq!(outcome.correlation.p_value, 1.0);
    }

    #[test]
    fn sampling_is_deterministic_per_seed() {
        let pool: Vec<SentenceScore> = (0..10)
            .map(|i| sentence(i, &format!("good sentence {i}"), 0.1 * i as f64))
            .collect();
        let first = validate_sample(&KeywordClassifier, &pool, 3, 7);
        let second = validate_sample(&KeywordClassifier, &pool, 3, 7);
        let texts = |o: &ValidationOutcome| {
            o.samples.iter().map(|p| p.text.clone()).collect::<Vec<_>>()
        };
        assert_eq!(texts(&first), texts(&second));
        assert_eq!(first.samples.len(), 3);
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let err = create_classifier("nonsense", None, None).err();
        assert!(matches!(err, Some(ClassifyError::Init(_))));
    }
}
