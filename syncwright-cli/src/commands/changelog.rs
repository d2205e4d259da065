//! `syncwright changelog`: release notes from merged pull requests.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use syncwright_release::{build_changelog, render_markdown, write_changelog, GithubClient};

use super::{print_writes, GlobalArgs};

/// Arguments for `syncwright changelog`.
#[derive(Args, Debug)]
pub struct ChangelogArgs {
    /// Write here instead of the configured path. Without either, print to stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl ChangelogArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let config = global.load()?;
        let release = config
            .release
            .as_ref()
            .context("syncwright.yaml has no 'release' section")?;

        let client = GithubClient::from_env(&release.api_base, &release.repository);
        let releases = build_changelog(&client).map_err(|err| {
            tracing::warn!(error = %err, "changelog generation aborted");
            err
        })?;

        let output = self.output.or_else(|| release.changelog.clone());
        match output {
            Some(path) => {
                let path = config.resolve(&path);
                let write = write_changelog(&path, &releases, false)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                print_writes(&format!("{} releases", releases.len()), &[write], false);
            }
            None => print!("{}", render_markdown(&releases)),
        }
        Ok(())
    }
}
