use crate::config::{Config, ConfigError, ConfigPaths};
use clap::Args;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Print config with secrets redacted
    #[arg(long)]
    pub print: bool,

    /// Print the config file path
    #[arg(long)]
    pub path: bool,

    /// Set a config value (dotted key=value)
    #[arg(long, value_name = "key=value")]
    pub set: Vec<String>,
}

pub fn run(args: &ConfigArgs, paths: &ConfigPaths) -> Result<(), ConfigError> {
    if args.path {
        println!("{}", paths.config_path.display());
        return Ok(());
    }

    let mut config = Config::load_or_create(paths)?;

    if !args.set.is_empty() {
        for assignment in &args.set {
            apply_set(&mut config, assignment)?;
        }
        config.validate()?;
        Config::write(paths, &config)?;
    }

    if args.print || args.set.is_empty() {
        let redacted = config.redacted();
        let output = toml::to_string_pretty(&redacted)?;
        println!("{output}");
    }

    Ok(())
}

fn apply_set(config: &mut Config, assignment: &str) -> Result<(), ConfigError> {
    let (key, value) = assignment
        .split_once('=')
        .ok_or_else(|| ConfigError::Validation("expected key=value for --set".into()))?;
    let value = value.trim();
    match key {
        "analysis.speaker" => {
            config.analysis.speaker = value.to_string();
        }
        "analysis.moderator" => {
            config.analysis.moderator = value.to_string();
        }
        "analysis.clusters" => {
            config.analysis.clusters = parse_usize(value, key)?;
        }
        "analysis.seed" => {
            config.analysis.seed = parse_u64(value, key)?;
        }
        "classifier.provider" => {
            config.classifier.provider = value.to_string();
        }
        "classifier.model" => {
            config.classifier.model = value.to_string();
        }
        "classifier.api_key" => {
            config.classifier.api_key = value.to_string();
        }
        "classifier.sample_size" => {
            let parsed = parse_usize(value, key)?;
            if parsed == 0 {
                return Err(ConfigError::Validation(
                    "classifier.sample_size must be greater than 0".into(),
                ));
            }
            config.classifier.sample_size = parsed;
        }
        "market.provider" => {
            config.market.provider = value.to_string();
        }
        "market.symbol" => {
            config.market.symbol = value.to_string();
        }
        "archive.dir" => {
            config.archive.dir = value.to_string();
        }
        _ => {
            return Err(ConfigError::Validation(format!(
                "unknown config key: {key}"
            )));
        }
    }
    Ok(())
}

fn parse_usize(value: &str, key: &str) -> Result<usize, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::Validation(format!("{key} expects an unsigned integer")))
}

fn parse_u64(value: &str, key: &str) -> Result<u64, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::Validation(format!("{key} expects an unsigned integer")))
}

#[cfg(test)]
mod tests {
    use super::apply_set;
    use crate::config::Config;

    #[test]
    fn apply_set_updates_dotted_keys() {
        let mut config = Config::default();
        apply_set(&mut config, "analysis.speaker=CHAIR YELLEN").unwrap();
        apply_set(&mut config, "analysis.clusters=5").unwrap();
        apply_set(&mut config, "analysis.seed=7").unwrap();
        apply_set(&mut config, "archive.dir=/data/fomc").unwrap();
        assert_eq!(config.analysis.speaker, "CHAIR YELLEN");
        assert_eq!(config.analysis.clusters, 5);
        assert_eq!(config.analysis.seed, 7);
        assert_eq!(config.archive.dir, "/data/fomc");
    }

    #[test]
    fn apply_set_rejects_bad_numbers() {
        let mut config = Config::default();
        let err = apply_set(&mut config, "analysis.clusters=many").unwrap_err();
        assert!(err.to_string().contains("unsigned integer"));
        let err = apply_set(&mut config, "classifier.sample_size=0").unwrap_err();
        assert!(err.to_string().contains("greater than 0"));
    }

    #[test]
    fn apply_set_rejects_unknown_key() {
        let mut config = Config::default();
        let err = apply_set(&mut config, "audio.sample_rate=48000").unwrap_err();
        assert!(err.to_string().contains("unknown config key"));
    }

    #[test]
    fn apply_set_requires_assignment() {
        let mut config = Config::default();
        let err = apply_set(&mut config, "analysis.speaker").unwrap_err();
        assert!(err.to_string().contains("key=value"));
    }
}
