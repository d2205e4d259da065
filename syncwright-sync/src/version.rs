//! Version template propagation.
//!
//! Each [`VersionTemplate`] names a file and a line shape such as
//! `__version__ = '{version}'`. The literal parts are escaped, the
//! placeholder becomes a `MAJOR.MINOR.PATCH` pattern and the match is
//! replaced by the template filled with the new version.

use std::path::PathBuf;

use syncwright_core::config::{self, ProjectConfig};
use syncwright_core::{MatchScope, VersionTemplate};

use crate::error::SyncError;
use crate::patch::{Anchor, ArtifactFile};
use crate::workset::Workset;

/// Placeholder token inside a template.
pub const PLACEHOLDER: &str = "{version}";

const TRIPLET: &str = r"\d+\.\d+\.\d+";

/// True for a dotted numeric triplet such as `4.2.17`.
pub fn is_version(candidate: &str) -> bool {
    let mut parts = candidate.split('.');
    let ok = (0..3).all(|_| {
        parts
            .next()
            .map(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
            .unwrap_or(false)
    });
    ok && parts.next().is_none()
}

/// Search anchor for `template`. Optional: a missing match is a soft skip.
pub fn template_anchor(template: &str, global: bool) -> Option<Anchor> {
    if !template.contains(PLACEHOLDER) {
        return None;
    }
    let pattern = template
        .split(PLACEHOLDER)
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(TRIPLET);
    let scope = if global { MatchScope::All } else { MatchScope::First };
    Anchor::new(&pattern)
        .ok()
        .map(|a| a.scope(scope).optional())
}

/// Replace the template's version literal in `file`. Returns the number of
/// matches rewritten; zero means the template is absent from the file.
pub fn vss(
    file: &mut ArtifactFile,
    template: &str,
    version: &str,
    global: bool,
) -> Result<usize, SyncError> {
    if !is_version(version) {
        return Err(SyncError::InvalidVersion(version.to_string()));
    }
    let anchor = template_anchor(template, global).ok_or_else(|| SyncError::InvalidTemplate {
        file: file.path().to_path_buf(),
        template: template.to_string(),
    })?;
    let replacement = template.replace(PLACEHOLDER, version);
    file.apply(&anchor, &replacement)
}

/// What happened to one manifest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateOutcome {
    Replaced { file: PathBuf, count: usize },
    TemplateMissing { file: PathBuf },
    FileMissing { file: PathBuf },
}

/// Version to propagate: the override if given, else the authoritative field.
pub fn resolve_version(
    config: &ProjectConfig,
    version_override: Option<&str>,
) -> Result<String, SyncError> {
    let version = match version_override {
        Some(v) => v.to_string(),
        None => config::read_version_at(&config.root, &config.version)?,
    };
    if !is_version(&version) {
        return Err(SyncError::InvalidVersion(version));
    }
    Ok(version)
}

/// Stage every manifest entry of `config` into `workset`.
pub fn stage_version(
    config: &ProjectConfig,
    version: &str,
    workset: &mut Workset,
) -> Result<Vec<TemplateOutcome>, SyncError> {
    let mut outcomes = Vec::with_capacity(config.version_templates.len());
    for entry in &config.version_templates {
        outcomes.push(stage_template(config, entry, version, workset)?);
    }
    Ok(outcomes)
}

fn stage_template(
    config: &ProjectConfig,
    entry: &VersionTemplate,
    version: &str,
    workset: &mut Workset,
) -> Result<TemplateOutcome, SyncError> {
    let path = config.resolve(&entry.file);
    if !workset.is_staged(&path) && !path.exists() {
        tracing::warn!("version file missing, skipped: {}", path.display());
        return Ok(TemplateOutcome::FileMissing { file: path });
    }

    let global = entry.scope == MatchScope::All;
    let mut count = 0;
    workset.edit(&path, |file| {
        count = vss(file, &entry.template, version, global)?;
        Ok(())
    })?;

    if count == 0 {
        tracing::warn!(
            "template `{}` not found in {}, skipped",
            entry.template,
            path.display()
        );
        return Ok(TemplateOutcome::TemplateMissing { file: path });
    }
    tracing::info!("version {} -> {} ({} match(es))", version, path.display(), count);
    Ok(TemplateOutcome::Replaced { file: path, count })
}
