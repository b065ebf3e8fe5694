//! bk_sim CLI
//!
//! 경기/하루 일정 시뮬레이션, 스키마 출력, 설정 프리셋 덤프.

use anyhow::Result;
use bk_cli::Format;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bk_sim")]
#[command(version, about = "Deterministic basketball game simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

impl From<OutputFormat> for Format {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Json => Format::Json,
            OutputFormat::Yaml => Format::Yaml,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one game from a GameRequest JSON file
    Game {
        /// Input request path
        #[arg(long)]
        r#in: PathBuf,

        /// League config file (.json/.yaml), overrides the request's config
        #[arg(long, conflicts_with = "preset")]
        config: Option<PathBuf>,

        /// Named league preset (pro, fiba, college, exhibition)
        #[arg(long)]
        preset: Option<String>,

        /// Output JSON path (stdout if omitted)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Print a box score summary instead of the JSON response
        #[arg(long, default_value = "false")]
        summary: bool,
    },

    /// Simulate every game of a DayRequest JSON file in parallel
    Day {
        #[arg(long)]
        r#in: PathBuf,

        #[arg(long, conflicts_with = "preset")]
        config: Option<PathBuf>,

        #[arg(long)]
        preset: Option<String>,

        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print the JSON Schema of the request format
    Schema {
        /// DayRequest instead of GameRequest
        #[arg(long, default_value = "false")]
        day: bool,
    },

    /// Dump a league config preset
    Config {
        #[arg(long, default_value = "pro")]
        preset: String,

        #[arg(long, value_enum, default_value = "yaml")]
        format: OutputFormat,
    },

    /// Write a ready-to-run demo request between two generated teams
    Demo {
        #[arg(long, default_value = "42")]
        seed: u64,

        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn league_config(config: Option<PathBuf>, preset: Option<String>) -> Result<Option<bk_core::LeagueConfig>> {
    match (config, preset) {
        (Some(path), _) => Ok(Some(bk_cli::load_config(&path)?)),
        (None, Some(name)) => Ok(Some(bk_cli::preset(&name)?)),
        (None, None) => Ok(None),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Game { r#in, config, preset, out, summary } => {
            let config = league_config(config, preset)?;
            let response = bk_cli::run_game(&r#in, config)?;
            let text = if summary {
                bk_cli::box_score_text(&response.result)
            } else {
                serde_json::to_string_pretty(&response)?
            };
            bk_cli::emit(&text, out.as_deref())?;
        }

        Commands::Day { r#in, config, preset, out } => {
            let config = league_config(config, preset)?;
            let text = bk_cli::run_day(&r#in, config)?;
            bk_cli::emit(&text, out.as_deref())?;
        }

        Commands::Schema { day } => {
            bk_cli::emit(&bk_cli::schema(day)?, None)?;
        }

        Commands::Config { preset, format } => {
            let config = bk_cli::preset(&preset)?;
            bk_cli::emit(&bk_cli::render_config(&config, format.into())?, None)?;
        }

        Commands::Demo { seed, out } => {
            let request = bk_cli::demo_request(seed);
            bk_cli::emit(&serde_json::to_string_pretty(&request)?, out.as_deref())?;
        }
    }

    Ok(())
}
