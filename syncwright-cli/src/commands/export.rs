//! `syncwright export-exchanges`: catalog-driven registries, docs and manifest.

use anyhow::{bail, Context, Result};
use clap::Args;

use syncwright_sync::export_exchanges;

use super::{print_failure, print_writes, GlobalArgs};

/// Arguments for `syncwright export-exchanges`.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Show what would be written without writing any files.
    #[arg(long)]
    pub dry_run: bool,
}

impl ExportArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let config = global.load()?;
        let report = export_exchanges(&config, self.dry_run).context("export-exchanges failed")?;

        print_writes(
            &format!("{} exchanges exported", report.catalog.len()),
            &report.writes,
            self.dry_run,
        );

        if !report.docs.is_ok() {
            for (path, err) in &report.docs.failures {
                print_failure(path, err);
            }
            let failed = report.docs.failures.len();
            bail!("{failed} documentation file(s) could not be updated");
        }
        Ok(())
    }
}
