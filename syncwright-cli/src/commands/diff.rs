//! `syncwright diff`: unified diffs of what every run would write.

use anyhow::{Context, Result};
use clap::Args;

use syncwright_sync::diff_all;

use super::GlobalArgs;

/// Arguments for `syncwright diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {}

impl DiffArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let config = global.load()?;
        let diffs = diff_all(&config).context("diff failed")?;

        if diffs.is_empty() {
            println!("No differences.");
            return Ok(());
        }

        for diff in diffs {
            print!("{}", diff.unified_diff);
            if !diff.unified_diff.ends_with('\n') {
                println!();
            }
        }
        Ok(())
    }
}
