//! Id manifest: the included ids plus the pro subset, as pretty JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use syncwright_core::Catalog;

use crate::error::SyncError;
use crate::workset::Workset;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdManifest {
    pub ids: Vec<String>,
    pub pro: Vec<String>,
}

impl IdManifest {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            ids: catalog.ids().iter().map(|id| id.0.clone()).collect(),
            pro: catalog.pro_ids().into_iter().map(|id| id.0.clone()).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, SyncError> {
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        Ok(text)
    }
}

/// Stage the manifest of `catalog` at `path`.
pub fn stage_manifest(path: &Path, catalog: &Catalog, workset: &mut Workset) -> Result<(), SyncError> {
    let manifest = IdManifest::from_catalog(catalog);
    tracing::info!("manifest: {} ids -> {}", manifest.ids.len(), path.display());
    workset.write(path, &manifest.to_json()?)
}
