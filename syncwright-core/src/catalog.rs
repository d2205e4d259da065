//! Exchange catalog builder.
//!
//! [`get_included_ids`] discovers source units and applies the inclusion
//! filter; [`build_catalog`] turns every included id into an
//! [`ExchangeRecord`]. The build is all-or-nothing: one failed record fails
//! the whole catalog.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::descriptor::parse_descriptor;
use crate::error::{io_err, CoreError};
use crate::inclusion::InclusionConfig;
use crate::types::{CanonicalId, ExchangeRecord};

// ---------------------------------------------------------------------------
// Id discovery
// ---------------------------------------------------------------------------

/// Ids of the files in `discovery_dir` with the given extension, in file-name
/// order, filtered by the inclusion config at `config_path`.
pub fn get_included_ids(
    config_path: &Path,
    discovery_dir: &Path,
    extension: &str,
) -> Result<Vec<CanonicalId>, CoreError> {
    let inclusion = InclusionConfig::load(config_path)?;
    let discovered = discover_ids(discovery_dir, extension)?;
    Ok(filter_ids(discovered, &inclusion))
}

/// Stems of every regular file in `dir` ending in `extension`, sorted.
pub fn discover_ids(dir: &Path, extension: &str) -> Result<Vec<CanonicalId>, CoreError> {
    let suffix = if extension.starts_with('.') {
        extension.to_string()
    } else {
        format!(".{extension}")
    };

    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| io_err(dir, e))? {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let file_type = entry.file_type().map_err(|e| io_err(entry.path(), e))?;
        if file_type.is_file() {
            entries.push(entry);
        }
    }
    entries.sort_by_key(|e| e.file_name());

    let mut ids = Vec::new();
    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some(stem) = name.strip_suffix(&suffix) {
            if !stem.is_empty() {
                ids.push(CanonicalId::from(stem));
            }
        }
    }
    Ok(ids)
}

/// Apply the inclusion filter, keeping discovery order and dropping duplicates.
pub fn filter_ids(discovered: Vec<CanonicalId>, inclusion: &InclusionConfig) -> Vec<CanonicalId> {
    let mut out: Vec<CanonicalId> = Vec::with_capacity(discovered.len());
    for id in discovered {
        if inclusion.includes(&id) && !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Record instantiation
// ---------------------------------------------------------------------------

/// Switches applied before a stub record is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StubOptions {
    /// Verify declared dependencies are installed. Expensive; off for catalog builds.
    pub check_required_dependencies: bool,
}

impl Default for StubOptions {
    fn default() -> Self {
        Self {
            check_required_dependencies: true,
        }
    }
}

/// Produces the display record of one catalog id.
pub trait RecordFactory {
    fn instantiate(
        &self,
        id: &CanonicalId,
        options: &StubOptions,
    ) -> Result<ExchangeRecord, CoreError>;
}

/// Reads `<descriptors_dir>/<id>.yaml`.
///
/// Declared `requires` entries are paths relative to `descriptors_dir`; they
/// are only checked when [`StubOptions::check_required_dependencies`] is set.
#[derive(Debug, Clone)]
pub struct DescriptorFactory {
    descriptors_dir: PathBuf,
}

impl DescriptorFactory {
    pub fn new(descriptors_dir: impl Into<PathBuf>) -> Self {
        Self {
            descriptors_dir: descriptors_dir.into(),
        }
    }

    pub fn descriptor_path(&self, id: &CanonicalId) -> PathBuf {
        self.descriptors_dir.join(format!("{}.yaml", id.0))
    }
}

impl RecordFactory for DescriptorFactory {
    fn instantiate(
        &self,
        id: &CanonicalId,
        options: &StubOptions,
    ) -> Result<ExchangeRecord, CoreError> {
        let path = self.descriptor_path(id);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(CoreError::Instantiate {
                    id: id.0.clone(),
                    reason: format!("no descriptor at {}", path.display()),
                })
            }
            Err(err) => return Err(io_err(&path, err)),
        };

        let descriptor = parse_descriptor(&text, &path)?;
        if descriptor.record.id != *id {
            return Err(CoreError::Instantiate {
                id: id.0.clone(),
                reason: format!("descriptor declares id '{}'", descriptor.record.id),
            });
        }

        if options.check_required_dependencies {
            for dependency in &descriptor.requires {
                if !self.descriptors_dir.join(dependency).exists() {
                    return Err(CoreError::MissingDependency {
                        id: id.0.clone(),
                        dependency: dependency.clone(),
                    });
                }
            }
        }

        Ok(descriptor.record)
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Ordered id → record mapping.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    ids: Vec<CanonicalId>,
    records: HashMap<CanonicalId, ExchangeRecord>,
}

impl Catalog {
    pub fn ids(&self) -> &[CanonicalId] {
        &self.ids
    }

    pub fn get(&self, id: &CanonicalId) -> Option<&ExchangeRecord> {
        self.records.get(id)
    }

    /// Records in catalog order.
    pub fn records(&self) -> Vec<&ExchangeRecord> {
        self.ids.iter().filter_map(|id| self.records.get(id)).collect()
    }

    /// Ids whose record carries the pro flag, in catalog order.
    pub fn pro_ids(&self) -> Vec<&CanonicalId> {
        self.ids
            .iter()
            .filter(|id| self.records.get(*id).map(|r| r.pro).unwrap_or(false))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Instantiate one record per id with dependency checks disabled.
///
/// Any failure aborts the build; no partial catalog is ever returned.
pub fn build_catalog(
    ids: &[CanonicalId],
    factory: &dyn RecordFactory,
) -> Result<Catalog, CoreError> {
    let options = StubOptions {
        check_required_dependencies: false,
    };
    let mut catalog = Catalog::default();
    for id in ids {
        let record = factory.instantiate(id, &options)?;
        catalog.ids.push(id.clone());
        catalog.records.insert(id.clone(), record);
    }
    Ok(catalog)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
