//! Run entrypoints used by the CLI.
//!
//! Every run stages its edits into one [`Workset`] and commits at the end, so
//! a fatal error in any stage leaves every file untouched. The only partial
//! outcome is the doc batch: healthy docs are committed, failed ones are
//! reported.

use std::path::PathBuf;

use syncwright_core::{build_catalog, get_included_ids, Catalog, DescriptorFactory, ProjectConfig};
use syncwright_renderer::TemplateEngine;

use crate::docs::{stage_docs, DocsReport};
use crate::error::SyncError;
use crate::hierarchy::{load_tree, stage_errors};
use crate::manifest::stage_manifest;
use crate::patch::WriteOutcome;
use crate::registry::sync_registry;
use crate::version::{resolve_version, stage_version, TemplateOutcome};
use crate::workset::{FileDiff, Workset};

/// Template engine with the project's overrides, if any.
pub fn engine_for(config: &ProjectConfig) -> Result<TemplateEngine, SyncError> {
    let dir = config.templates_dir.as_ref().map(|d| config.resolve(d));
    Ok(TemplateEngine::new(dir.as_deref())?)
}

/// Discover, filter and instantiate the catalog.
pub fn load_catalog(config: &ProjectConfig) -> Result<Catalog, SyncError> {
    let section = config.catalog.as_ref().ok_or(SyncError::MissingSection("catalog"))?;
    let ids = get_included_ids(
        &config.resolve(&section.inclusion),
        &config.resolve(&section.discovery_dir),
        &section.extension,
    )?;
    tracing::info!("catalog: {} included ids", ids.len());
    let factory = DescriptorFactory::new(config.resolve(&section.descriptors_dir));
    Ok(build_catalog(&ids, &factory)?)
}

// ---------------------------------------------------------------------------
// export-exchanges
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ExportReport {
    pub catalog: Catalog,
    pub writes: Vec<WriteOutcome>,
    pub docs: DocsReport,
}

fn stage_export(
    config: &ProjectConfig,
    engine: &TemplateEngine,
    workset: &mut Workset,
) -> Result<(Catalog, DocsReport), SyncError> {
    let catalog = load_catalog(config)?;
    let tree = load_tree(config)?;
    let error_names: Vec<&str> = tree.as_ref().map(|t| t.flatten()).unwrap_or_default();

    for target in &config.registries {
        let path = config.resolve(&target.file);
        tracing::info!("registry: catalog -> {}", path.display());
        workset.edit(&path, |file| {
            sync_registry(file, target, engine, catalog.ids(), &error_names)
        })?;
    }

    let docs = stage_docs(config, &catalog, workset);

    if let Some(manifest) = config.catalog.as_ref().and_then(|c| c.manifest.as_ref()) {
        stage_manifest(&config.resolve(manifest), &catalog, workset)?;
    }
    Ok((catalog, docs))
}

/// Rewrite registries, doc tables and the id manifest from the catalog.
pub fn export_exchanges(config: &ProjectConfig, dry_run: bool) -> Result<ExportReport, SyncError> {
    let engine = engine_for(config)?;
    let mut workset = Workset::new();
    let (catalog, docs) = stage_export(config, &engine, &mut workset)?;
    let writes = workset.commit(dry_run)?;
    Ok(ExportReport {
        catalog,
        writes,
        docs,
    })
}

// ---------------------------------------------------------------------------
// vss
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct VersionReport {
    pub version: String,
    pub templates: Vec<TemplateOutcome>,
    pub writes: Vec<WriteOutcome>,
}

/// Propagate the authoritative (or overridden) version through the manifest.
pub fn sync_version(
    config: &ProjectConfig,
    version_override: Option<&str>,
    dry_run: bool,
) -> Result<VersionReport, SyncError> {
    let version = resolve_version(config, version_override)?;
    let mut workset = Workset::new();
    let templates = stage_version(config, &version, &mut workset)?;
    let writes = workset.commit(dry_run)?;
    Ok(VersionReport {
        version,
        templates,
        writes,
    })
}

// ---------------------------------------------------------------------------
// errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ErrorsReport {
    pub names: Vec<String>,
    pub writes: Vec<WriteOutcome>,
}

/// Render the canonical error tree into every error target.
pub fn sync_errors(config: &ProjectConfig, dry_run: bool) -> Result<ErrorsReport, SyncError> {
    let engine = engine_for(config)?;
    let mut workset = Workset::new();
    let names = stage_errors(config, &engine, &mut workset)?;
    let writes = workset.commit(dry_run)?;
    Ok(ErrorsReport { names, writes })
}

// ---------------------------------------------------------------------------
// diff
// ---------------------------------------------------------------------------

/// Stage every configured run without writing and return the unified diffs.
pub fn diff_all(config: &ProjectConfig) -> Result<Vec<FileDiff>, SyncError> {
    let engine = engine_for(config)?;
    let mut workset = Workset::new();

    if config.errors.is_some() {
        stage_errors(config, &engine, &mut workset)?;
    }
    if config.catalog.is_some() {
        let (_, docs) = stage_export(config, &engine, &mut workset)?;
        docs.into_result()?;
    }
    if !config.version_templates.is_empty() {
        let version = resolve_version(config, None)?;
        stage_version(config, &version, &mut workset)?;
    }
    Ok(workset.diffs(&config.root))
}

/// Paths a report would change, for summaries.
pub fn changed_paths(writes: &[WriteOutcome]) -> Vec<PathBuf> {
    writes
        .iter()
        .filter(|w| w.is_change())
        .map(|w| w.path().to_path_buf())
        .collect()
}
