use clap::Parser;
use std::path::PathBuf;

use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "collar-raffler")]
#[command(version = "0.1.0")]
#[command(
    about = "Draw raffle winners among wallets that burned Mutant Hound collars",
    long_about = None
)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.yaml", env = "RAFFLER_CONFIG")]
    pub config: PathBuf,

    /// Override max_winners from the config file
    #[arg(long)]
    pub max_winners: Option<u64>,

    /// Seed the draw for a reproducible result
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Block explorer API key
    #[arg(long, env = "ETHERSCAN_API_KEY", hide_env_values = true)]
    pub etherscan_api_key: Option<String>,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(max_winners) = self.max_winners {
            config.max_winners = max_winners;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["collar-raffler"]).unwrap();
        assert!(!cli.json);
        assert!(cli.max_winners.is_none());
        assert!(cli.seed.is_none());
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "collar-raffler",
            "--config",
            "drawings/march.yaml",
            "--max-winners",
            "3",
            "--seed",
            "99",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.config, PathBuf::from("drawings/march.yaml"));
        assert_eq!(cli.seed, Some(99));
        assert!(cli.json);

        let mut config = AppConfig::from_yaml(
            r#"
max_winners: 10
metadata_endpoint: https://api.mutanthounds.com/hounds
snapshot:
  start: "2023-03-01T00:00:00Z"
  stop: "2023-03-08T00:00:00Z"
"#,
        )
        .unwrap();
        cli.apply_overrides(&mut config);
        assert_eq!(config.max_winners, 3);
    }
}
