use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use redwatch_cli::config::AppConfig;
use redwatch_cli::pipeline;
use redwatch_crawler::make_client;

/// Forum risk-scoring pipeline
#[derive(Debug, Parser)]
#[clap(version)]
pub struct Args {
    /// Optional YAML configuration file
    #[clap(long, short, env = "REDWATCH_CONFIG")]
    pub config: Option<PathBuf>,
    /// When quiet no logs are outputted
    #[clap(long, short)]
    pub quiet: bool,
    #[clap(subcommand)]
    pub cmd: SubCommand,
}

#[derive(Debug, clap::Subcommand)]
pub enum SubCommand {
    /// Collect newest posts from the configured communities
    Collect,
    /// Fetch recent history for every collected author
    Enrich,
    /// Score collected posts and export JSONL/CSV
    Score,
    /// Aggregate per-user risk profiles and export them
    ScoreUsers,
    /// Run the whole pipeline: collect, enrich, score, score-users
    Run,
    #[clap(hide = true)]
    Completion { shell: Shell },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if !args.quiet {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let config = AppConfig::load(args.config.as_deref())?;

    match args.cmd {
        SubCommand::Collect => {
            let client = make_client(&config.crawler)?;
            pipeline::collect(&config, client.as_ref())?;
        }
        SubCommand::Enrich => {
            let client = make_client(&config.crawler)?;
            pipeline::enrich(&config, client.as_ref())?;
        }
        SubCommand::Score => pipeline::score_posts(&config)?,
        SubCommand::ScoreUsers => pipeline::score_user_profiles(&config)?,
        SubCommand::Run => {
            let client = make_client(&config.crawler)?;
            pipeline::run(&config, client.as_ref())?;
        }
        SubCommand::Completion { shell } => {
            generate(shell, &mut Args::command(), "redwatch", &mut io::stdout());
        }
    }

    Ok(())
}
