//! Read and inspect player save files
//!
//! Loads `player_<id>.json` documents and displays them, including the
//! values the runtime derives on restore (max health, max mana, army cap).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use monarch_core::{PlayerId, army_cap};
use monarch_runtime::{FileSaveRepository, PlayerRepository, SaveData};

use super::content::ContentArgs;
use crate::dirs;

/// Read and inspect a player save file
#[derive(Parser)]
pub struct ReadSave {
    /// Player id to read. Lists the saved players if omitted
    #[arg(value_name = "PLAYER")]
    player: Option<u64>,

    /// Read this file directly instead of looking up a player
    #[arg(short, long, value_name = "FILE", conflicts_with = "player")]
    file: Option<PathBuf>,

    /// Custom save directory (defaults to MONARCH_SAVE_DIR or the platform location)
    #[arg(short, long, value_name = "DIR")]
    save_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "summary")]
    format: OutputFormat,

    #[command(flatten)]
    content: ContentArgs,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// Summary view (level, stats, skills, derived values)
    Summary,
    /// Full JSON output, as stored
    Json,
    /// Pretty-printed debug format
    Debug,
}

impl ReadSave {
    pub fn execute(self) -> Result<()> {
        let (label, save) = match (&self.file, self.player) {
            (Some(path), _) => {
                let save = FileSaveRepository::read_path(path)
                    .with_context(|| format!("Failed to read save file: {}", path.display()))?;
                (path.display().to_string(), save)
            }
            (None, player) => {
                let save_dir = self.save_dir.clone().unwrap_or_else(dirs::save_dir);
                if !save_dir.exists() {
                    anyhow::bail!(
                        "Save directory not found: {}\n\nHint: run a session first or pass --save-dir",
                        save_dir.display()
                    );
                }
                let repository = FileSaveRepository::new(&save_dir)?;
                let Some(player) = player else {
                    return list_players(&repository);
                };
                let player = PlayerId(player);
                let save = repository
                    .load(player)?
                    .with_context(|| format!("No save for {player} in {}", save_dir.display()))?;
                (player.to_string(), save)
            }
        };

        println!("{} {}", style("Save:").bold().cyan(), label);
        if let Some(saved_at) = save.saved_at {
            println!("{} {}", style("Saved at:").bold().cyan(), saved_at.to_rfc3339());
        }
        println!();

        match self.format {
            OutputFormat::Summary => print_summary(&save, &self.content)?,
            OutputFormat::Json => print_json(&save)?,
            OutputFormat::Debug => println!("{:#?}", save),
        }

        Ok(())
    }
}

fn list_players(repository: &FileSaveRepository) -> Result<()> {
    let players = repository.list_players()?;
    if players.is_empty() {
        println!(
            "{}",
            style(format!("No saves in {}", repository.base_dir().display())).dim()
        );
        return Ok(());
    }

    println!(
        "{} {}",
        style("Saved players in").bold().cyan(),
        repository.base_dir().display()
    );
    for player in players {
        match repository.load(player) {
            Ok(Some(save)) => println!(
                "  {} level {} \"{}\"",
                style(player.0).bold(),
                save.level,
                save.title
            ),
            Ok(None) => {}
            Err(err) => println!("  {} {}", style(player.0).bold(), style(err).red()),
        }
    }
    Ok(())
}

fn print_summary(save: &SaveData, content: &ContentArgs) -> Result<()> {
    let content = content.load()?;
    let config = &content.config;
    let (record, book, storage) = save.restore(&config.progression, &content.skills);

    println!("{}", style("=== Player Save Summary ===").bold().green());
    println!();

    println!("{}", style("Progression:").bold().yellow());
    println!("  Level: {}", record.level());
    println!(
        "  Experience: {}/{}",
        record.experience(),
        record.experience_to_next()
    );
    println!("  Unspent points: {}", record.stat_points());
    println!("  Title: {}", record.title());
    if !record.last_message().is_empty() {
        println!("  Last message: {}", record.last_message());
    }
    println!();

    let stats = record.stats();
    println!("{}", style("Stats:").bold().yellow());
    println!("  Strength: {}", stats.strength);
    println!("  Agility: {}", stats.agility);
    println!("  Sense: {}", stats.sense);
    println!("  Vitality: {}", stats.vitality);
    println!("  Intelligence: {}", stats.intelligence);
    println!();

    let extraction_level = content
        .skills
        .iter()
        .find(|d| matches!(d.kind, monarch_core::SkillKind::Extraction(_)))
        .map_or(0, |d| book.level_of(d));
    println!("{}", style("Derived:").bold().yellow());
    println!("  Max health: {:.1}", record.max_health(&config.progression));
    println!("  Mana: {:.1}/{:.1}", record.mana(), record.max_mana());
    println!(
        "  Army cap: {}",
        army_cap(&config.minions, stats.intelligence, extraction_level)
    );
    println!();

    println!("{}", style("Skills:").bold().yellow());
    if book.iter().next().is_none() {
        println!("  {}", style("none").dim());
    }
    for instance in book.iter() {
        let name = content
            .skills
            .get(instance.skill_id.as_str())
            .map_or(instance.skill_id.as_str(), |d| d.name.as_str());
        println!("  {} (level {})", name, instance.level);
    }
    let dropped = save.skills.len().saturating_sub(book.iter().count());
    if dropped > 0 {
        println!(
            "  {}",
            style(format!("{dropped} unknown skill(s) dropped on restore")).red()
        );
    }
    println!();

    println!("{}", style("Storage:").bold().yellow());
    if storage.is_empty() {
        println!("  {}", style("empty").dim());
    }
    for (index, stack) in storage.stacks().iter().enumerate() {
        println!("  [{index}] {} x{}", stack.item, stack.count);
    }
    println!();

    Ok(())
}

fn print_json(save: &SaveData) -> Result<()> {
    let json = serde_json::to_string_pretty(save).context("Failed to serialize save to JSON")?;
    println!("{}", json);
    Ok(())
}
