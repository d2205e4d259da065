//! Documentation tables.
//!
//! Each doc target owns one table whose header row is the view's exact column
//! list. The anchor runs from that header through the next blank line, so
//! prose around the table is never touched. Files are processed one by one:
//! a file whose anchor is missing is reported and left alone while the rest
//! of the batch is still staged.

use std::path::PathBuf;

use syncwright_core::config::{DocTarget, ProjectConfig};
use syncwright_core::{Catalog, MatchScope, TableView};
use syncwright_renderer::{render_table, table::columns};

use crate::error::SyncError;
use crate::patch::Anchor;
use crate::workset::Workset;

/// Placeholder of the optional count sentence.
pub const COUNT_PLACEHOLDER: &str = "{count}";

/// Anchor covering the table of `view`: header row through the next blank line.
pub fn table_anchor(view: TableView) -> Result<Anchor, SyncError> {
    let header: String = columns(view)
        .iter()
        .map(|c| format!(r" *{} *\|", regex::escape(c)))
        .collect();
    let pattern = format!(r"(?m)^\|{header}[ \t]*\n(?:[^\n]+\n?)*");
    Ok(Anchor::new(&pattern)?.unique())
}

/// Optional anchor for a sentence such as `supports {count} exchanges`.
pub fn count_anchor(template: &str) -> Result<Option<Anchor>, SyncError> {
    if !template.contains(COUNT_PLACEHOLDER) {
        return Ok(None);
    }
    let pattern = template
        .split(COUNT_PLACEHOLDER)
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\d+");
    Ok(Some(Anchor::new(&pattern)?.scope(MatchScope::All).optional()))
}

/// Per-file result of a doc batch.
#[derive(Debug, Default)]
pub struct DocsReport {
    pub staged: Vec<PathBuf>,
    pub failures: Vec<(PathBuf, SyncError)>,
}

impl DocsReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// Collapse into one [`SyncError::Batch`] if any file failed.
    pub fn into_result(self) -> Result<Vec<PathBuf>, SyncError> {
        if self.failures.is_empty() {
            return Ok(self.staged);
        }
        let total = self.staged.len() + self.failures.len();
        let failures = self
            .failures
            .iter()
            .map(|(path, err)| format!("{}: {err}", path.display()))
            .collect();
        Err(SyncError::Batch { total, failures })
    }
}

fn stage_doc(
    config: &ProjectConfig,
    target: &DocTarget,
    catalog: &Catalog,
    workset: &mut Workset,
) -> Result<PathBuf, SyncError> {
    let path = config.resolve(&target.file);
    tracing::info!("docs: {} view -> {}", view_name(target.view), path.display());

    let records = catalog.records();
    let table = render_table(&records, target.view, &target.centered);
    let anchor = table_anchor(target.view)?;
    let count = match &target.count_template {
        Some(template) => count_anchor(template)?
            .map(|a| (a, template.replace(COUNT_PLACEHOLDER, &catalog.len().to_string()))),
        None => None,
    };

    workset.edit(&path, |file| {
        file.apply(&anchor, &table)?;
        if let Some((anchor, sentence)) = &count {
            file.apply(anchor, sentence)?;
        }
        Ok(())
    })?;
    Ok(path)
}

fn view_name(view: TableView) -> &'static str {
    match view {
        TableView::Full => "full",
        TableView::Certified => "certified",
        TableView::ByCountry => "by-country",
    }
}

/// Stage every doc target. Never fails early: per-file errors are collected.
pub fn stage_docs(config: &ProjectConfig, catalog: &Catalog, workset: &mut Workset) -> DocsReport {
    let mut report = DocsReport::default();
    for target in &config.docs {
        match stage_doc(config, target, catalog, workset) {
            Ok(path) => report.staged.push(path),
            Err(err) => {
                let path = config.resolve(&target.file);
                tracing::warn!("docs: {} failed: {}", path.display(), err);
                report.failures.push((path, err));
            }
        }
    }
    report
}
