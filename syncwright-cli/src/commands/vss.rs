//! `syncwright vss`: propagate the version string.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use syncwright_sync::sync_version;
use syncwright_sync::version::TemplateOutcome;

use super::{print_writes, GlobalArgs};

/// Arguments for `syncwright vss`.
#[derive(Args, Debug)]
pub struct VssArgs {
    /// Use this `major.minor.patch` instead of the authoritative field.
    #[arg(long = "version", id = "set_version", value_name = "X")]
    pub set_version: Option<String>,

    /// Show what would be written without writing any files.
    #[arg(long)]
    pub dry_run: bool,
}

impl VssArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let config = global.load()?;
        let report = sync_version(&config, self.set_version.as_deref(), self.dry_run)
            .context("version propagation failed")?;

        println!("version {}", report.version.bold());
        for outcome in &report.templates {
            match outcome {
                TemplateOutcome::Replaced { file, count } => {
                    println!("  {}  {} ({count})", "✓".green(), file.display())
                }
                TemplateOutcome::TemplateMissing { file } => {
                    println!("  {}  {} (template not found)", "⚠".yellow(), file.display())
                }
                TemplateOutcome::FileMissing { file } => {
                    println!("  {}  {} (file missing)", "⚠".yellow(), file.display())
                }
            }
        }
        print_writes("version literals", &report.writes, self.dry_run);
        Ok(())
    }
}
