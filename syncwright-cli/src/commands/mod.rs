pub mod changelog;
pub mod diff;
pub mod errors;
pub mod export;
pub mod tags;
pub mod translate;
pub mod vss;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use syncwright_core::config::{self, ProjectConfig};
use syncwright_sync::pipeline::changed_paths;
use syncwright_sync::WriteOutcome;

/// Flags shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Project root. Defaults to the current directory.
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Config file. Defaults to `<root>/syncwright.yaml`.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

impl GlobalArgs {
    pub fn root(&self) -> Result<PathBuf> {
        let cwd = std::env::current_dir().context("could not determine current directory")?;
        Ok(match &self.root {
            Some(root) if root.is_absolute() => root.clone(),
            Some(root) => cwd.join(root),
            None => cwd,
        })
    }

    fn config_path(&self, root: &Path) -> PathBuf {
        match &self.config {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => root.join(path),
            None => config::config_path_at(root),
        }
    }

    /// Load the project config; missing or malformed config is fatal.
    pub fn load(&self) -> Result<ProjectConfig> {
        let root = self.root()?;
        let path = self.config_path(&root);
        config::load_from(&path, &root)
            .with_context(|| format!("failed to load config {}", path.display()))
    }

    /// Like [`GlobalArgs::load`], but an absent config yields the defaults.
    pub fn load_or_default(&self) -> Result<ProjectConfig> {
        let root = self.root()?;
        if self.config_path(&root).exists() {
            return self.load();
        }
        Ok(ProjectConfig {
            root,
            ..ProjectConfig::default()
        })
    }
}

/// One summary line plus a glyph per file.
pub fn print_writes(label: &str, writes: &[WriteOutcome], dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let changed = changed_paths(writes).len();
    let unchanged = writes.len() - changed;
    let verb = if dry_run { "would write" } else { "written" };

    println!(
        "{prefix}{} {label} ({changed} {verb}, {unchanged} unchanged)",
        "✓".green().bold()
    );
    for w in writes {
        match w {
            WriteOutcome::Written { path } => println!("  ✎  {}", path.display()),
            WriteOutcome::WouldWrite { path } => println!("  ~  {}", path.display()),
            WriteOutcome::Unchanged { path } => {
                println!("  {}  {}", "·".bright_black(), path.display())
            }
        }
    }
}

pub fn print_failure(path: &Path, err: &dyn std::fmt::Display) {
    println!("  {}  {}: {err}", "✗".red().bold(), path.display());
}
