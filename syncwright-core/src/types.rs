//! Domain types shared by every syncwright crate.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.
//! Types that appear in `syncwright.yaml` or in descriptor files are
//! serializable via serde.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed catalog id (one per discovered source unit).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalId(pub String);

impl CanonicalId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for CanonicalId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CanonicalId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// One of the output representations kept in sync by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetSyntax {
    Typescript,
    Python,
    Php,
    Json,
}

impl TargetSyntax {
    /// All syntaxes in a stable order.
    pub fn all() -> &'static [TargetSyntax] {
        &[
            TargetSyntax::Typescript,
            TargetSyntax::Python,
            TargetSyntax::Php,
            TargetSyntax::Json,
        ]
    }
}

impl fmt::Display for TargetSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetSyntax::Typescript => write!(f, "typescript"),
            TargetSyntax::Python => write!(f, "python"),
            TargetSyntax::Php => write!(f, "php"),
            TargetSyntax::Json => write!(f, "json"),
        }
    }
}

/// How many matches a version template rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchScope {
    #[default]
    First,
    All,
}

/// Catalog view rendered into a documentation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableView {
    Full,
    Certified,
    ByCountry,
}

/// Variant of a translation output for one target language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationMode {
    #[default]
    Sync,
    Async,
}

impl fmt::Display for TranslationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationMode::Sync => write!(f, "sync"),
            TranslationMode::Async => write!(f, "async"),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// A (file, template) pair from the version manifest.
///
/// `template` contains the `{version}` placeholder exactly once, e.g.
/// `__version__ = '{version}'`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionTemplate {
    pub file: PathBuf,
    pub template: String,
    #[serde(default)]
    pub scope: MatchScope,
}

/// Url set attached to a catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecordUrls {
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub referral: Option<String>,
}

/// Display record derived from one catalog id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRecord {
    pub id: CanonicalId,
    pub name: String,
    #[serde(default)]
    pub urls: RecordUrls,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub certified: bool,
    #[serde(default)]
    pub pro: bool,
    /// API version string, e.g. `v3`.
    #[serde(default)]
    pub version: Option<String>,
    /// Referral discount as a fraction (`0.1` = 10 %).
    #[serde(default)]
    pub discount: Option<f64>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
