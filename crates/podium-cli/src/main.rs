mod config;
mod config_cmd;
mod report;
mod run;

use clap::{Args, Parser, Subcommand};
use config::{Config, ConfigPaths};
use podium_core::market::create_market_provider;
use podium_core::transcript::{self, Segmenter};
use podium_core::validate::{create_classifier, validate_sample};
use podium_core::{Scorer, analysis, archive, cluster};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "podium", version, about = "press conference sentiment analysis")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze one transcript end to end
    Analyze(AnalyzeArgs),
    /// Score a directory of dated transcripts as a timeline
    History(HistoryArgs),
    /// Check internal scores against a hosted classifier
    Validate(ValidateArgs),
    /// Show or change configuration
    Config(config_cmd::ConfigArgs),
}

#[derive(Args, Debug, Clone)]
struct AnalyzeArgs {
    /// Transcript file to analyze
    file: PathBuf,

    /// Keep only this speaker's Q&A answers (default: configured speaker)
    #[arg(long, value_name = "NAME")]
    speaker: Option<String>,

    /// Also list sentences mentioning this word
    #[arg(long, value_name = "WORD")]
    keyword: Option<String>,

    /// Number of topic clusters over Q&A sentences
    #[arg(long, value_name = "K")]
    clusters: Option<usize>,

    /// Persist report and analysis under the runs directory
    #[arg(long)]
    save: bool,
}

#[derive(Args, Debug, Clone)]
struct HistoryArgs {
    /// Directory of dated transcript files (default: configured archive.dir)
    dir: Option<PathBuf>,

    /// Attach same-day market changes and their correlation
    #[arg(long)]
    market: bool,
}

#[derive(Args, Debug, Clone)]
struct ValidateArgs {
    /// Transcript file to sample sentences from
    file: PathBuf,

    /// Number of sentences to sample
    #[arg(long, value_name = "N")]
    sample: Option<usize>,
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let paths = match ConfigPaths::from_home() {
        Ok(paths) => paths,
        Err(err) => {
            eprintln!("config paths error: {err}");
            std::process::exit(1);
        }
    };

    let mut config = match Config::load_or_create(&paths) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config load failed: {err}");
            std::process::exit(1);
        }
    };
    apply_env_overrides(&mut config);

    match cli.command {
        Command::Analyze(args) => {
            if let Err(e) = run_analyze(&args, &config, &paths) {
                eprintln!("analyze failed: {e}");
                std::process::exit(1);
            }
        }
        Command::History(args) => {
            if let Err(e) = run_history(&args, &config) {
                eprintln!("history failed: {e}");
                std::process::exit(1);
            }
        }
        Command::Validate(args) => {
            if let Err(e) = run_validate(&args, &config) {
                eprintln!("validate failed: {e}");
                std::process::exit(1);
            }
        }
        Command::Config(args) => {
            if let Err(e) = config_cmd::run(&args, &paths) {
                eprintln!("config failed: {e}");
                std::process::exit(1);
            }
        }
    }
}

fn run_analyze(args: &AnalyzeArgs, config: &Config, paths: &ConfigPaths) -> Result<(), String> {
    let raw = std::fs::read_to_string(&args.file)
        .map_err(|err| format!("cannot read {}: {err}", args.file.display()))?;

    let scorer = Scorer::default();
    let segmenter = Segmenter::with_moderator(config.analysis.moderator.as_str());
    let speaker = resolve_speaker(args.speaker.as_deref(), config.analysis.speaker.as_str());
    let analysis = analysis::analyze_transcript(&scorer, &segmenter, &raw, speaker)
        .map_err(|err| err.to_string())?;

    let k = args.clusters.unwrap_or(config.analysis.clusters);
    let clusters = cluster::cluster_topics(&analysis.qa.flow, k, config.analysis.seed);

    let keyword_hits = args.keyword.as_deref().map(|word| {
        let cleaned = transcript::clean(&raw);
        (word, analysis::keyword_context(&scorer, &cleaned, word))
    });
    let keyword = keyword_hits
        .as_ref()
        .map(|(word, hits)| (*word, hits.as_slice()));

    let rendered = report::render_analysis(&analysis, &clusters, keyword);
    print!("{rendered}");

    if args.save {
        let name = args.file.display().to_string();
        let dir = run::save_run(paths, &analysis, &name, speaker, &rendered)
            .map_err(|err| err.to_string())?;
        println!("saved run to {}", dir.display());
    }

    Ok(())
}

fn run_history(args: &HistoryArgs, config: &Config) -> Result<(), String> {
    let dir = archive_dir(args.dir.as_deref(), config.archive.dir.as_str())?;
    let scorer = Scorer::default();
    let mut points = archive::analyze_directory(&scorer, &dir).map_err(|err| err.to_string())?;
    if points.is_empty() {
        println!("no dated transcripts in {}", dir.display());
        return Ok(());
    }

    let correlation = if args.market {
        let quotes = create_market_provider(
            config.market.provider.as_str(),
            non_empty_str(config.market.symbol.as_str()),
        )
        .map_err(|err| err.to_string())?;
        archive::attach_market_changes(&mut points, quotes.as_ref());
        Some(archive::market_correlation(&points))
    } else {
        None
    };

    print!("{}", report::render_trend(&points, correlation.as_ref()));
    Ok(())
}

fn run_validate(args: &ValidateArgs, config: &Config) -> Result<(), String> {
    let raw = std::fs::read_to_string(&args.file)
        .map_err(|err| format!("cannot read {}: {err}", args.file.display()))?;

    let classifier = create_classifier(
        config.classifier.provider.as_str(),
        non_empty_str(config.classifier.model.as_str()),
        non_empty_str(config.classifier.api_key.as_str()),
    )
    .map_err(|err| err.to_string())?;

    let scorer = Scorer::default();
    let cleaned = transcript::clean(&raw);
    let pool = analysis::sentence_scores(&scorer, &cleaned, analysis::HIGHLIGHT_MIN_TOKENS);
    let sample_size = args.sample.unwrap_or(config.classifier.sample_size);
    let outcome = validate_sample(classifier.as_ref(), &pool, sample_size, config.analysis.seed);

    print!("{}", report::render_validation(&outcome));
    Ok(())
}

fn env_override(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn apply_env_overrides(config: &mut Config) {
    if let Some(value) = env_override("PODIUM_CLASSIFIER_MODEL") {
        config.classifier.model = value;
    }
    if let Some(value) = env_override("PODIUM_CLASSIFIER_API_KEY") {
        config.classifier.api_key = value;
    }
    if let Some(value) = env_override("PODIUM_MARKET_SYMBOL") {
        config.market.symbol = value;
    }
    if config.classifier.api_key.trim().is_empty() {
        if let Some(value) = env_override("HF_API_TOKEN") {
            config.classifier.api_key = value;
        }
    }
}

fn non_empty_str(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn resolve_speaker<'a>(flag: Option<&'a str>, configured: &'a str) -> Option<&'a str> {
    flag.and_then(non_empty_str)
        .or_else(|| non_empty_str(configured))
}

fn archive_dir(flag: Option<&Path>, configured: &str) -> Result<PathBuf, String> {
    if let Some(dir) = flag {
        return Ok(dir.to_path_buf());
    }
    match non_empty_str(configured) {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => Err("no archive directory given; pass DIR or set archive.dir".to_string()),
    }
}
