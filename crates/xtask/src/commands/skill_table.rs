//! Print skill cost and cooldown scaling.

use anyhow::{Result, bail};
use clap::Parser;
use console::style;
use monarch_core::{GameConfig, SkillDefinition};

use super::content::ContentArgs;

/// Print mana cost and cooldown of every skill per level
#[derive(Parser, Debug)]
pub struct SkillTable {
    /// Only print this skill (e.g. shadow_extraction)
    #[arg(value_name = "SKILL")]
    skill: Option<String>,

    #[command(flatten)]
    content: ContentArgs,
}

impl SkillTable {
    pub fn execute(self) -> Result<()> {
        let content = self.content.load()?;

        let skills: Vec<&SkillDefinition> = match &self.skill {
            Some(id) => match content.skills.get(id) {
                Some(definition) => vec![definition],
                None => bail!("Unknown skill: {id}"),
            },
            None => content.skills.iter().collect(),
        };

        for definition in skills {
            print_skill(definition);
        }
        Ok(())
    }
}

fn print_skill(definition: &SkillDefinition) {
    let mut flags = vec![definition.kind.label().to_string()];
    if definition.is_passive() {
        flags.push("passive".into());
    }
    if definition.innate {
        flags.push("innate".into());
    }

    println!(
        "{} {} {}",
        style(&definition.name).bold().green(),
        style(format!("({})", definition.id.as_str())).dim(),
        style(flags.join(", ")).yellow()
    );
    if !definition.description.is_empty() {
        println!("  {}", definition.description);
    }
    println!(
        "  {} {}   {} {}",
        style("Unlock level:").cyan(),
        definition.unlock_level,
        style("Max level:").cyan(),
        definition.max_level
    );

    if definition.is_passive() {
        println!();
        return;
    }

    println!(
        "  {}",
        style(format!("{:>5}  {:>8}  {:>10}", "Lvl", "Mana", "Cooldown")).bold()
    );
    for level in 1..=definition.max_level {
        let cooldown = definition.scaling.cooldown(level);
        println!(
            "  {:>5}  {:>8.2}  {:>7.1} s",
            level,
            definition.scaling.cost(level),
            cooldown as f64 / GameConfig::TICKS_PER_SECOND as f64
        );
    }
    println!();
}
