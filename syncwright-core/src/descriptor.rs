//! Descriptor shape detection.
//!
//! Per-id descriptors come in two layouts. The layout is decided by comparing
//! the descriptor's top-level field-name set against each known shape: every
//! required field must be present and no field outside the allowed set may
//! appear. Descriptor text is only ever parsed as data.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;
use serde_yaml::Value;

use crate::error::CoreError;
use crate::types::{CanonicalId, ExchangeRecord, RecordUrls};

/// Known descriptor layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorShape {
    /// All display fields at the top level.
    Flat,
    /// Display fields grouped under `meta`.
    Nested,
}

const FLAT_REQUIRED: &[&str] = &["id", "name"];
const FLAT_ALLOWED: &[&str] = &[
    "id",
    "name",
    "urls",
    "countries",
    "certified",
    "pro",
    "version",
    "discount",
    "requires",
];

const NESTED_REQUIRED: &[&str] = &["id", "meta"];
const NESTED_ALLOWED: &[&str] = &["id", "meta", "urls", "requires"];

/// Classify a field-name set.
pub fn detect_shape(fields: &BTreeSet<&str>) -> Option<DescriptorShape> {
    if matches_shape(fields, FLAT_REQUIRED, FLAT_ALLOWED) {
        return Some(DescriptorShape::Flat);
    }
    if matches_shape(fields, NESTED_REQUIRED, NESTED_ALLOWED) {
        return Some(DescriptorShape::Nested);
    }
    None
}

fn matches_shape(fields: &BTreeSet<&str>, required: &[&str], allowed: &[&str]) -> bool {
    required.iter().all(|f| fields.contains(f)) && fields.iter().all(|f| allowed.contains(f))
}

/// A parsed descriptor: the display record plus declared dependencies.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    pub record: ExchangeRecord,
    pub requires: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct FlatDescriptor {
    #[serde(flatten)]
    record: ExchangeRecord,
    #[serde(default)]
    requires: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct NestedMeta {
    name: String,
    #[serde(default)]
    countries: Vec<String>,
    #[serde(default)]
    certified: bool,
    #[serde(default)]
    pro: bool,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    discount: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct NestedDescriptor {
    id: CanonicalId,
    meta: NestedMeta,
    #[serde(default)]
    urls: RecordUrls,
    #[serde(default)]
    requires: Vec<String>,
}

/// Parse descriptor text read from `path`.
pub fn parse_descriptor(text: &str, path: &Path) -> Result<Descriptor, CoreError> {
    let value: Value = serde_yaml::from_str(text).map_err(|e| CoreError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;

    let fields: BTreeSet<&str> = value
        .as_mapping()
        .map(|m| m.keys().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let parse_err = |e| CoreError::Parse {
        path: path.to_path_buf(),
        source: e,
    };

    match detect_shape(&fields) {
        Some(DescriptorShape::Flat) => {
            let flat: FlatDescriptor = serde_yaml::from_value(value.clone()).map_err(parse_err)?;
            Ok(Descriptor {
                record: flat.record,
                requires: flat.requires,
            })
        }
        Some(DescriptorShape::Nested) => {
            let nested: NestedDescriptor =
                serde_yaml::from_value(value.clone()).map_err(parse_err)?;
            Ok(Descriptor {
                record: ExchangeRecord {
                    id: nested.id,
                    name: nested.meta.name,
                    urls: nested.urls,
                    countries: nested.meta.countries,
                    certified: nested.meta.certified,
                    pro: nested.meta.pro,
                    version: nested.meta.version,
                    discount: nested.meta.discount,
                },
                requires: nested.requires,
            })
        }
        None => Err(CoreError::UnknownDescriptorShape {
            path: path.to_path_buf(),
            fields: fields.into_iter().collect::<Vec<_>>().join(", "),
        }),
    }
}
