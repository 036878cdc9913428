use crate::config::ConfigPaths;
use podium_core::analysis::TranscriptAnalysis;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

const METADATA_FILE: &str = "metadata.toml";
const REPORT_FILE: &str = "report.txt";
const ANALYSIS_FILE: &str = "analysis.json";

#[derive(Debug, Error)]
pub enum RunError {
    #[error("run io error: {0}")]
    Io(#[from] io::Error),
    #[error("run metadata error: {0}")]
    Metadata(#[from] toml::ser::Error),
    #[error("run serialize error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("run time error: {0}")]
    Time(#[from] time::error::Format),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    pub id: String,
    pub created_at: String,
    pub transcript_file: String,
    pub speaker: Option<String>,
    pub opening_compound: f64,
    pub qa_compound: f64,
    pub shift: f64,
    pub report_file: String,
    pub analysis_file: String,
}

impl RunMetadata {
    fn new(
        analysis: &TranscriptAnalysis,
        transcript_file: &str,
        speaker: Option<&str>,
    ) -> Result<Self, RunError> {
        let id = Uuid::now_v7().to_string();
        let created_at = OffsetDateTime::now_utc().format(&Rfc3339)?;
        Ok(Self {
            id,
            created_at,
            transcript_file: transcript_file.to_string(),
            speaker: speaker.map(str::to_string),
            opening_compound: analysis.opening.score.compound,
            qa_compound: analysis.qa.score.compound,
            shift: analysis.shift,
            report_file: REPORT_FILE.to_string(),
            analysis_file: ANALYSIS_FILE.to_string(),
        })
    }
}

/// Persist one analysis under its own run directory and return that
/// directory: metadata.toml alongside the rendered report and the full
/// analysis as JSON.
pub fn save_run(
    paths: &ConfigPaths,
    analysis: &TranscriptAnalysis,
    transcript_file: &str,
    speaker: Option<&str>,
    report: &str,
) -> Result<PathBuf, RunError> {
    let metadata = RunMetadata::new(analysis, transcript_file, speaker)?;
    fs::create_dir_all(&paths.runs_dir)?;
    let dir = paths.runs_dir.join(&metadata.id);
    fs::create_dir_all(&dir)?;

    write_atomic(&dir.join(REPORT_FILE), report.as_bytes())?;
    let json = serde_json::to_string_pretty(analysis)?;
    write_atomic(&dir.join(ANALYSIS_FILE), json.as_bytes())?;
    let contents = toml::to_string_pretty(&metadata)?;
    write_atomic(&dir.join(METADATA_FILE), contents.as_bytes())?;

    Ok(dir)
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), RunError> {
    let parent = path
        .parent()
        .ok_or_else(|| io::Error::other("run path missing parent directory"))?;
    let tmp_path = parent.join(".tmp-write");
    fs::write(&tmp_path, contents)?;
    fs::rename(tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::save_run;
    use crate::config::ConfigPaths;
    use podium_core::Scorer;
    use podium_core::analysis::{TranscriptAnalysis, analyze_transcript};
    use podium_core::transcript::Segmenter;
    use std::fs;

    const TRANSCRIPT: &str = "<DOC>Growth is strong today. I look forward to your questions. \
        <NAME>CHAIR POWELL</NAME> Inflation fell sharply this year.</DOC>";

    fn sample_analysis() -> TranscriptAnalysis {
        let scorer = Scorer::default();
        let segmenter = Segmenter::new();
        analyze_transcript(&scorer, &segmenter, TRANSCRIPT, Some("CHAIR POWELL")).unwrap()
    }

    #[test]
    fn save_run_writes_report_metadata_and_json() {
        let temp = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::from_base(temp.path().join("podium"));
        let analysis = sample_analysis();

        let dir = save_run(
            &paths,
            &analysis,
            "fomc_20230322.txt",
            Some("CHAIR POWELL"),
            "report body\n",
        )
        .unwrap();

        assert!(dir.starts_with(&paths.runs_dir));
        assert_eq!(
            fs::read_to_string(dir.join("report.txt")).unwrap(),
            "report body\n"
        );

        let metadata = fs::read_to_string(dir.join("metadata.toml")).unwrap();
        assert!(metadata.contains("transcript_file = \"fomc_20230322.txt\""));
        assert!(metadata.contains("speaker = \"CHAIR POWELL\""));
        assert!(metadata.contains("report_file = \"report.txt\""));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.join("analysis.json")).unwrap()).unwrap();
        assert!(json.get("shift").is_some());
        assert!(json.get("opening").is_some());
    }

    #[test]
    fn save_run_uses_a_fresh_directory_per_run() {
        let temp = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::from_base(temp.path().join("podium"));
        let analysis = sample_analysis();

        let first = save_run(&paths, &analysis, "a.txt", None, "r").unwrap();
        let second = save_run(&paths, &analysis, "a.txt", None, "r").unwrap();
        assert_ne!(first, second);

        let metadata = fs::read_to_string(first.join("metadata.toml")).unwrap();
        assert!(!metadata.contains("speaker ="));
    }
}
