//! Print the experience curve.

use anyhow::{Result, bail};
use clap::Parser;
use console::style;
use monarch_core::GameConfig;
use serde_json::json;

use super::content::ContentArgs;

/// Print the experience curve with derived per-level values
#[derive(Parser, Debug)]
pub struct XpTable {
    /// First level to print
    #[arg(long, default_value_t = 1)]
    from: u32,

    /// Last level to print
    #[arg(long, default_value_t = 50)]
    to: u32,

    /// Emit JSON rows instead of a table
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    content: ContentArgs,
}

impl XpTable {
    pub fn execute(self) -> Result<()> {
        if self.from == 0 || self.from > self.to {
            bail!("invalid level range {}..={}", self.from, self.to);
        }

        let content = self.content.load()?;
        let progression = &content.config.progression;
        let curve = &progression.experience_curve;

        let rows: Vec<_> = (self.from..=self.to)
            .map(|level| {
                (
                    level,
                    curve.required(level),
                    curve.total_to_reach(level),
                    (level - GameConfig::MIN_LEVEL) * GameConfig::STAT_POINTS_PER_LEVEL,
                )
            })
            .collect();

        if self.json {
            let values: Vec<_> = rows
                .iter()
                .map(|(level, next, total, points)| {
                    json!({
                        "level": level,
                        "experience_to_next": next,
                        "total_to_reach": total,
                        "stat_points_earned": points,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&values)?);
            return Ok(());
        }

        println!("{}", style("=== Experience Curve ===").bold().green());
        println!(
            "{}",
            style(format!(
                "{:>6}  {:>12}  {:>14}  {:>12}",
                "Level", "To next", "Total", "Stat points"
            ))
            .bold()
            .cyan()
        );
        for (level, next, total, points) in rows {
            let line = format!("{level:>6}  {next:>12}  {total:>14}  {points:>12}");
            if level == progression.title_unlock_level {
                println!("{}  {}", line, style(&progression.unlocked_title).yellow());
            } else {
                println!("{line}");
            }
        }

        Ok(())
    }
}
