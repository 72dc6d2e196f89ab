//! Content selection shared by the table and save commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use monarch_content::{Content, ContentFactory};

#[derive(Args, Debug, Clone)]
pub struct ContentArgs {
    /// Load content from this directory instead of the bundled data
    /// (expects config.toml, skills.ron and classifier.ron)
    #[arg(long, value_name = "DIR")]
    pub content: Option<PathBuf>,
}

impl ContentArgs {
    pub fn load(&self) -> Result<Content> {
        tracing::debug!(dir = ?self.content, "loading content");
        match &self.content {
            Some(dir) => ContentFactory::new(dir)
                .load()
                .with_context(|| format!("Failed to load content from {}", dir.display())),
            None => ContentFactory::bundled().context("Failed to load bundled content"),
        }
    }
}
