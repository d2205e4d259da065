//! `syncwright errors`: render the error hierarchy.

use anyhow::{Context, Result};
use clap::Args;

use syncwright_sync::sync_errors;

use super::{print_writes, GlobalArgs};

/// Arguments for `syncwright errors`.
#[derive(Args, Debug)]
pub struct ErrorsArgs {
    /// Show what would be written without writing any files.
    #[arg(long)]
    pub dry_run: bool,
}

impl ErrorsArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let config = global.load()?;
        let report = sync_errors(&config, self.dry_run).context("error hierarchy sync failed")?;
        print_writes(
            &format!("{} error classes", report.names.len()),
            &report.writes,
            self.dry_run,
        );
        Ok(())
    }
}
