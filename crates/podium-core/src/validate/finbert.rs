use serde::Deserialize;
use serde_json::json;
use ureq::Agent;

use crate::error::ClassifyError;
use crate::http;

use super::{ClassProbs, ReferenceClassifier};

const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co/models";
const DEFAULT_MODEL: &str = "ProsusAI/finbert";

/// Hosted FinBERT classifier on the Hugging Face inference API.
pub struct FinbertProvider {
    agent: Agent,
    base_url: String,
    model: String,
    api_key: String,
}

impl FinbertProvider {
    pub fn new(model: Option<&str>, api_key: Option<&str>) -> Result<Self, ClassifyError> {
        let api_key = api_key
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ClassifyError::Init("classifier API key not set".into()))?
            .to_string();
        let base_url = std::env::var("PODIUM_CLASSIFIER_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Ok(Self {
            agent: http::default_agent(),
            base_url,
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
            api_key,
        })
    }

    fn parse_response(body: &str) -> Result<ClassProbs, ClassifyError> {
        let rows: Vec<Vec<LabelScore>> = serde_json::from_str(body)
            .map_err(|e| ClassifyError::InvalidResponse(e.to_string()))?;
        let labels = rows
            .into_iter()
            .next()
            .ok_or_else(|| ClassifyError::InvalidResponse("empty prediction".into()))?;
        let mut probs = ClassProbs {
            positive: 0.0,
            neutral: 0.0,
            negative: 0.0,
        };
        for entry in labels {
            match entry.label.to_lowercase().as_str() {
                "positive" => probs.positive = entry.score,
                "neutral" => probs.neutral = entry.score,
                "negative" => probs.negative = entry.score,
                _ => {}
            }
        }
        Ok(probs)
    }
}

impl ReferenceClassifier for FinbertProvider {
    fn name(&self) -> &'static str {
        "finbert"
    }

    fn classify(&self, text: &str) -> Result<ClassProbs, ClassifyError> {
        let url = format!("{}/{}", self.base_url, self.model);
        let body = json!({
            "inputs": text,
            "options": {"wait_for_model": true},
        });

        let response = http::with_retry(http::MAX_ATTEMPTS, || {
            self.agent
                .post(&url)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .send_json(&body)
        })
        .map_err(|e| ClassifyError::Network(format!("{e}")))?;

        let raw = response
            .into_body()
            .read_to_string()
            .map_err(|e| ClassifyError::Network(format!("{e}")))?;

        Self::parse_response(raw.trim())
    }
}

#[derive(Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}
