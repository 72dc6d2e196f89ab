//! Development tasks for the Shadow Monarch workspace
//!
//! This binary provides development utilities using the cargo-xtask pattern.
//! Run with: `cargo xtask <command>`

mod commands;
mod dirs;

use anyhow::Result;
use clap::Parser;
use commands::{Clean, ReadSave, SkillTable, XpTable};
use tracing_subscriber::EnvFilter;

/// Development tasks for the Shadow Monarch workspace
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tools for Shadow Monarch", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Print the experience curve with derived per-level values
    XpTable(XpTable),

    /// Print mana cost and cooldown of every skill per level
    SkillTable(SkillTable),

    /// Read and inspect a player save file
    ReadSave(ReadSave),

    /// Delete saved player data
    Clean(Clean),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for MONARCH_SAVE_DIR and RUST_LOG)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::XpTable(cmd) => cmd.execute(),
        Command::SkillTable(cmd) => cmd.execute(),
        Command::ReadSave(cmd) => cmd.execute(),
        Command::Clean(cmd) => cmd.execute(),
    }
}
