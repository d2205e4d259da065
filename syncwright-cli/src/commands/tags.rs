//! `syncwright cleanup-old-tags`: prune tags outside the retention window.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use syncwright_release::{
    delete_tags, plan_retention, DeletionOutcome, GitRepo, RetentionPlan, TagDeletion, TagStore,
};

use super::GlobalArgs;

/// Arguments for `syncwright cleanup-old-tags`.
#[derive(Args, Debug)]
pub struct CleanupTagsArgs {
    /// Only report the plan (the default).
    #[arg(long, conflicts_with = "delete")]
    pub paper: bool,

    /// Delete the planned tags locally and on the remote.
    #[arg(long)]
    pub delete: bool,

    /// Only act on the N most recent deletions.
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct CleanupJson<'a> {
    dry_run: bool,
    keep: Vec<&'a str>,
    delete: Vec<&'a str>,
    deletions: &'a [TagDeletion],
}

#[derive(Tabled)]
struct PlanRow {
    #[tabled(rename = "tag")]
    tag: String,
    #[tabled(rename = "bucket")]
    bucket: String,
    #[tabled(rename = "action")]
    action: String,
}

impl CleanupTagsArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let config = global.load_or_default()?;
        let remote = config
            .release
            .as_ref()
            .map_or("origin", |r| r.remote.as_str());
        let repo = GitRepo::new(&config.root, remote);
        let dry_run = !self.delete;

        let names = repo.list_tags().context("failed to list tags")?;
        let plan = plan_retention(&names)
            .context("tag list contains a malformed tag")?
            .limit(self.limit);
        let deletions = delete_tags(&plan, &repo, dry_run);

        if self.json {
            let payload = CleanupJson {
                dry_run,
                keep: plan.keep.iter().map(|t| t.name.as_str()).collect(),
                delete: plan.delete.iter().map(|t| t.name.as_str()).collect(),
                deletions: &deletions,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).context("failed to serialize cleanup JSON")?
            );
        } else {
            print_plan(&plan, &deletions, dry_run);
        }

        let fixups: Vec<&str> = deletions
            .iter()
            .filter(|d| d.needs_fixup())
            .map(|d| d.tag.as_str())
            .collect();
        if !fixups.is_empty() {
            bail!(
                "{} tag(s) deleted locally but still on the remote, fix manually: {}",
                fixups.len(),
                fixups.join(", ")
            );
        }
        if deletions
            .iter()
            .any(|d| matches!(d.outcome, DeletionOutcome::LocalFailed(_)))
        {
            bail!("some tags could not be deleted locally");
        }
        Ok(())
    }
}

fn print_plan(plan: &RetentionPlan, deletions: &[TagDeletion], dry_run: bool) {
    println!(
        "{} tags kept, {} marked for deletion",
        plan.keep.len().to_string().green().bold(),
        plan.delete.len().to_string().red().bold()
    );
    if deletions.is_empty() {
        println!("Nothing to delete.");
        return;
    }

    let rows: Vec<PlanRow> = deletions
        .iter()
        .filter_map(|d| plan.delete.iter().find(|t| t.name == d.tag).map(|t| (d, t)))
        .map(|(d, t)| PlanRow {
            tag: d.tag.clone(),
            bucket: format!("{}.{}", t.major, t.minor),
            action: action_label(&d.outcome),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    if dry_run {
        println!("Run with --delete to remove these tags.");
    }
}

fn action_label(outcome: &DeletionOutcome) -> String {
    match outcome {
        DeletionOutcome::Planned => "would delete".yellow().to_string(),
        DeletionOutcome::Deleted => "deleted".green().to_string(),
        DeletionOutcome::LocalFailed(err) => format!("{} ({err})", "local failed".red()),
        DeletionOutcome::RemoteFailed(err) => format!("{} ({err})", "remote failed".red().bold()),
    }
}
