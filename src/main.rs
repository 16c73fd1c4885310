use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use taskxp::config::Config;
use taskxp::gamification::SystemClock;
use taskxp::store::SqliteStore;
use taskxp::GamificationEngine;

mod cli;

#[derive(Parser)]
#[command(name = "taskxp")]
#[command(about = "XP, levels, streaks and badges for your to-do list")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.taskxp/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the database (overrides the config file)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Complete a task and award XP to its owner
    CompleteTask {
        task_id: i64,
    },

    /// Complete a challenge for a user
    CompleteChallenge {
        challenge_id: i64,

        #[arg(long)]
        user: i64,
    },

    /// Show today's challenge
    Today,

    /// Show a user's XP, level, streak and badges
    Progress {
        #[arg(long)]
        user: i64,
    },

    /// Show the top users by XP
    Leaderboard {
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },

    /// List all badges
    Badges,

    /// Write a default config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init { force } = cli.command {
        return cli::init::init_command(cli.config, force);
    }

    let config = Config::load(cli.config.as_deref())?;

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else {
        config.settings.log_level.as_str()
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let db_path = cli.db.unwrap_or_else(|| config.database_path());
    let store = SqliteStore::open(&db_path)
        .with_context(|| format!("Failed to open database: {}", db_path.display()))?;
    let engine = GamificationEngine::new(store.stores(), Arc::new(SystemClock)).await?;

    match cli.command {
        Commands::CompleteTask { task_id } => {
            cli::complete::complete_task_command(&engine, task_id).await?;
        }
        Commands::CompleteChallenge { challenge_id, user } => {
            cli::complete::complete_challenge_command(&engine, challenge_id, user).await?;
        }
        Commands::Today => {
            cli::progress::today_command(&engine).await?;
        }
        Commands::Progress { user } => {
            cli::progress::progress_command(&engine, user).await?;
        }
        Commands::Leaderboard { limit } => {
            cli::progress::leaderboard_command(&engine, limit).await?;
        }
        Commands::Badges => {
            cli::progress::badges_command(&engine);
        }
        Commands::Init { .. } => {}
    }

    Ok(())
}
