//! CLI module for the Traffic Control Center dashboard
//!
//! # Commands
//!
//! - `watch` - Poll the data source and redraw the dashboard
//! - `snapshot` - Poll once and print the result
//! - `simulate` - Serve the demo `/metrics` and `/timeline` endpoints
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Terminal 1: demo data
//! tcc simulate --seed 42
//!
//! # Terminal 2: live dashboard
//! tcc watch
//!
//! # Offline demo with fabricated KPIs
//! tcc watch --random
//! ```

pub mod completions;
pub mod config;
pub mod output;
pub mod simulate;
pub mod snapshot;
pub mod watch;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::config::TccConfig;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Traffic Control Center - railway operations dashboard
#[derive(Parser, Debug)]
#[command(
    name = "tcc",
    version,
    about = "Terminal dashboard for a railway Traffic Control Center"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll the data source and redraw the dashboard
    Watch(WatchArgs),
    /// Poll metrics and timeline once and print them
    Snapshot(SnapshotArgs),
    /// Run the demo simulator server
    Simulate(SimulateArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Options shared by commands that read from a data source
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "tcc.toml")]
    pub config: PathBuf,

    /// Override the base URL serving /metrics and /timeline
    #[arg(short, long, env = "TCC_BASE_URL")]
    pub base_url: Option<String>,

    /// Fabricate KPIs locally instead of polling
    #[arg(long)]
    pub random: bool,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "TCC_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Disable local alert synthesis
    #[arg(long)]
    pub no_synthesis: bool,
}

#[derive(Args, Debug)]
pub struct SnapshotArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "tcc.toml")]
    pub config: PathBuf,

    /// Override server port
    #[arg(short, long, env = "TCC_SIM_PORT")]
    pub port: Option<u16>,

    /// Override server host
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Seed the simulation for reproducible payloads
    #[arg(long)]
    pub seed: Option<u64>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "TCC_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "tcc.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Load the config file if present, then apply env overrides.
pub(crate) fn load_base_config(path: &Path) -> Result<TccConfig, Box<dyn std::error::Error>> {
    let config = if path.exists() {
        TccConfig::load(Some(path))?
    } else {
        tracing::debug!("Config file not found, using defaults");
        TccConfig::default()
    };
    Ok(config.with_env_overrides())
}

/// Load configuration with source overrides from the command line.
pub fn load_config_with_overrides(
    args: &SourceArgs,
) -> Result<TccConfig, Box<dyn std::error::Error>> {
    let mut config = load_base_config(&args.config)?;

    if let Some(ref base_url) = args.base_url {
        config.source.base_url = base_url.clone();
    }
    if args.random {
        config.source.mode = crate::config::SourceMode::Random;
    }
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceMode;
    use clap::Parser;
    use tempfile::NamedTempFile;

    #[test]
    fn test_cli_parse_watch_defaults() {
        let cli = Cli::try_parse_from(["tcc", "watch"]).unwrap();
        match cli.command {
            Commands::Watch(args) => {
                assert_eq!(args.source.config, PathBuf::from("tcc.toml"));
                assert!(!args.source.random);
                assert!(!args.no_synthesis);
            }
            _ => panic!("Expected Watch command"),
        }
    }

    #[test]
    fn test_cli_parse_watch_random() {
        let cli = Cli::try_parse_from(["tcc", "watch", "--random", "-l", "debug"]).unwrap();
        match cli.command {
            Commands::Watch(args) => {
                assert!(args.source.random);
                assert_eq!(args.source.log_level.as_deref(), Some("debug"));
            }
            _ => panic!("Expected Watch command"),
        }
    }

    #[test]
    fn test_cli_parse_snapshot_json() {
        let cli = Cli::try_parse_from([
            "tcc",
            "snapshot",
            "--json",
            "-b",
            "http://10.0.0.5:8000",
        ])
        .unwrap();
        match cli.command {
            Commands::Snapshot(args) => {
                assert!(args.json);
                assert_eq!(args.source.base_url.as_deref(), Some("http://10.0.0.5:8000"));
            }
            _ => panic!("Expected Snapshot command"),
        }
    }

    #[test]
    fn test_cli_parse_simulate_with_port_and_seed() {
        let cli = Cli::try_parse_from(["tcc", "simulate", "-p", "9000", "--seed", "42"]).unwrap();
        match cli.command {
            Commands::Simulate(args) => {
                assert_eq!(args.port, Some(9000));
                assert_eq!(args.seed, Some(42));
                assert!(args.host.is_none());
            }
            _ => panic!("Expected Simulate command"),
        }
    }

    #[test]
    fn test_cli_parse_config_init() {
        let cli = Cli::try_parse_from(["tcc", "config", "init", "--force"]).unwrap();
        match cli.command {
            Commands::Config(ConfigCommands::Init(args)) => {
                assert!(args.force);
                assert_eq!(args.output, PathBuf::from("tcc.toml"));
            }
            _ => panic!("Expected Config Init command"),
        }
    }

    fn source_args(config: PathBuf) -> SourceArgs {
        SourceArgs {
            config,
            base_url: None,
            random: false,
            log_level: None,
        }
    }

    #[test]
    fn test_config_file_loaded() {
        let temp = NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[refresh]\nmetrics_interval_ms = 1500").unwrap();

        let config = load_config_with_overrides(&source_args(temp.path().to_path_buf())).unwrap();
        assert_eq!(config.refresh.metrics_interval_ms, 1500);
    }

    #[test]
    fn test_cli_overrides_config() {
        let temp = NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[source]\nbase_url = \"http://a:1\"").unwrap();

        let mut args = source_args(temp.path().to_path_buf());
        args.base_url = Some("http://b:2".to_string());
        args.random = true;

        let config = load_config_with_overrides(&args).unwrap();
        assert_eq!(config.source.base_url, "http://b:2");
        assert_eq!(config.source.mode, SourceMode::Random);
    }

    #[test]
    fn test_works_without_config_file() {
        let config =
            load_config_with_overrides(&source_args(PathBuf::from("nonexistent.toml"))).unwrap();
        assert_eq!(config.refresh.metrics_interval_ms, 3000);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let mut args = source_args(PathBuf::from("nonexistent.toml"));
        args.base_url = Some("ftp://nowhere".to_string());
        assert!(load_config_with_overrides(&args).is_err());
    }
}
