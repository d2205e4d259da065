//! `syncwright translate`: fan source units out to the translator.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use syncwright_dispatch::{translate_blocking, TranslateOptions};

use super::{print_failure, print_writes, GlobalArgs};

/// Arguments for `syncwright translate`.
#[derive(Args, Debug)]
pub struct TranslateArgs {
    /// Source units, relative to the project root.
    #[arg(required = true)]
    pub units: Vec<PathBuf>,

    /// Target language; repeat for several. Defaults to every configured target.
    #[arg(long = "target", value_name = "LANG")]
    pub targets: Vec<String>,

    /// Maximum concurrent translator calls.
    #[arg(long)]
    pub jobs: Option<usize>,

    /// Translate even when every output is newer than its unit.
    #[arg(long)]
    pub force: bool,

    /// Translate but do not write outputs.
    #[arg(long)]
    pub dry_run: bool,
}

impl TranslateArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let config = global.load()?;
        let options = TranslateOptions {
            units: self.units,
            languages: self.targets,
            jobs: self.jobs,
            force: self.force,
            dry_run: self.dry_run,
        };
        let report = translate_blocking(&config, &options).context("translation failed")?;
        let summary = &report.summary;

        println!(
            "{} units translated, {} up to date, {} failed in {:.2}s",
            summary.succeeded.len().to_string().green().bold(),
            summary.skipped.len().to_string().dimmed(),
            summary.failed.len().to_string().red().bold(),
            summary.elapsed.as_secs_f64()
        );
        print_writes("translations", &report.writes, self.dry_run);

        if !summary.is_ok() {
            for (unit, err) in &summary.failed {
                print_failure(unit, err);
            }
            bail!("{} unit(s) failed to translate", summary.failed.len());
        }
        Ok(())
    }
}
