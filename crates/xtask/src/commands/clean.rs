//! Clean saved player data
//!
//! Removes the player save directory, or the whole project data directory
//! with `--all`.
//!
//! Safety: Always prompts for confirmation before deletion.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use crate::dirs;

/// Delete saved player data
#[derive(Parser, Debug)]
pub struct Clean {
    /// Remove the whole data directory, not only player saves
    #[arg(long)]
    pub all: bool,

    /// Only delete the save of this player id
    #[arg(long, conflicts_with = "all")]
    pub player: Option<u64>,

    /// Custom save directory (defaults to MONARCH_SAVE_DIR or the platform location)
    #[arg(short, long, value_name = "DIR", conflicts_with = "all")]
    pub save_dir: Option<PathBuf>,

    /// Skip confirmation prompt (dangerous!)
    #[arg(short = 'y', long)]
    pub yes: bool,
}

impl Clean {
    pub fn execute(self) -> Result<()> {
        let save_dir = self.save_dir.clone().unwrap_or_else(dirs::save_dir);

        let (label, path) = match (self.all, self.player) {
            (true, _) => ("All data".to_string(), dirs::data_dir()),
            (false, Some(id)) => (
                format!("Save of player {id}"),
                save_dir.join(format!("player_{id}.json")),
            ),
            (false, None) => ("All player saves".to_string(), save_dir),
        };

        if !path.exists() {
            println!("{}", style("Nothing to clean - path doesn't exist yet").dim());
            return Ok(());
        }

        println!("{}", style("Clean Shadow Monarch data").yellow().bold());
        println!();
        println!("The following will be deleted:");
        println!("  {} {}", style("->").cyan(), style(&label).bold());
        println!("    {}", style(path.display()).dim());
        println!();

        if !self.yes && !confirm()? {
            println!("{}", style("Cancelled").dim());
            return Ok(());
        }

        print!("Deleting {}... ", label);
        io::stdout().flush()?;
        if path.is_dir() {
            std::fs::remove_dir_all(&path)
        } else {
            std::fs::remove_file(&path)
        }
        .with_context(|| format!("Failed to delete: {}", path.display()))?;
        println!("{}", style("done").green());

        Ok(())
    }
}

/// Prompt user for confirmation
fn confirm() -> Result<bool> {
    print!("{} ", style("Proceed? [y/N]").yellow().bold());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}
