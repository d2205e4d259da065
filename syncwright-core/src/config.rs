//! Project configuration (`syncwright.yaml`).
//!
//! # Layout
//!
//! ```text
//! <root>/
//!   syncwright.yaml       (this config)
//!   package.json          (authoritative version field, by default)
//! ```
//!
//! # API pattern
//!
//! Every loader has two forms:
//! - `fn_at(root: &Path, …)`: explicit project root; used in tests with `TempDir`
//! - `fn(…)`: derives the root from the current directory, delegates to `_at`
//!
//! Tests must NEVER call the no-arg wrappers; always use `_at`.
//! Paths inside the config are relative to the root; resolve them with
//! [`ProjectConfig::resolve`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, CoreError};
use crate::types::{TableView, TargetSyntax, TranslationMode, VersionTemplate};

/// File name of the project config, relative to the root.
pub const CONFIG_FILE_NAME: &str = "syncwright.yaml";

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Where the one authoritative version number lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSource {
    #[serde(default = "default_version_file")]
    pub file: PathBuf,
    #[serde(default = "default_version_field")]
    pub field: String,
}

impl Default for VersionSource {
    fn default() -> Self {
        Self {
            file: default_version_file(),
            field: default_version_field(),
        }
    }
}

fn default_version_file() -> PathBuf {
    PathBuf::from("package.json")
}

fn default_version_field() -> String {
    "version".to_string()
}

/// Inputs of the catalog builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Newline-delimited inclusion list. Missing file ⇒ include all.
    pub inclusion: PathBuf,
    /// Directory scanned for source units.
    pub discovery_dir: PathBuf,
    /// Extension of source units, with or without the leading dot.
    pub extension: String,
    /// Directory holding one `<id>.yaml` descriptor per id.
    pub descriptors_dir: PathBuf,
    /// Optional JSON id manifest written on export.
    #[serde(default)]
    pub manifest: Option<PathBuf>,
}

/// A file receiving the rendered error hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorTarget {
    pub file: PathBuf,
    pub syntax: TargetSyntax,
    /// Literal text immediately preceding the hierarchy literal, e.g. `error_hierarchy = `.
    pub prologue: String,
    /// Literal text immediately following the hierarchy literal, e.g. `\n\n`.
    pub boundary: String,
    /// Also rewrite the class declaration block (python only).
    #[serde(default)]
    pub declarations: bool,
}

/// Canonical error hierarchy and its generated targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorsConfig {
    pub source: PathBuf,
    #[serde(default)]
    pub targets: Vec<ErrorTarget>,
}

/// A generated root file whose import/registry/export blocks follow the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryTarget {
    pub file: PathBuf,
    pub syntax: TargetSyntax,
    /// Package prefix used in import lines (python).
    #[serde(default)]
    pub package: Option<String>,
}

/// A markdown document containing one generated catalog table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocTarget {
    pub file: PathBuf,
    pub view: TableView,
    /// Column headers rendered centered.
    #[serde(default)]
    pub centered: Vec<String>,
    /// Optional sentence carrying the catalog size, with a `{count}` placeholder.
    #[serde(default)]
    pub count_template: Option<String>,
}

/// One requested output of the translation dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateTarget {
    pub language: String,
    #[serde(default)]
    pub mode: TranslationMode,
    /// Extension of generated files, without the dot.
    pub extension: String,
    pub output_dir: PathBuf,
}

/// Whether the external translator takes all targets in one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslatorKind {
    #[default]
    Batch,
    Single,
}

/// External translator capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub kind: TranslatorKind,
    #[serde(default)]
    pub targets: Vec<TranslateTarget>,
    /// Worker pool size; defaults to available parallelism.
    #[serde(default)]
    pub jobs: Option<usize>,
}

/// Revision-history settings for tag curation and changelog generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseConfig {
    /// `owner/name` on the hosting service.
    pub repository: String,
    #[serde(default = "default_remote")]
    pub remote: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default)]
    pub changelog: Option<PathBuf>,
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

/// Root of `syncwright.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProjectConfig {
    #[serde(default)]
    pub version: VersionSource,
    #[serde(default)]
    pub version_templates: Vec<VersionTemplate>,
    #[serde(default)]
    pub catalog: Option<CatalogConfig>,
    #[serde(default)]
    pub errors: Option<ErrorsConfig>,
    #[serde(default)]
    pub registries: Vec<RegistryTarget>,
    #[serde(default)]
    pub docs: Vec<DocTarget>,
    #[serde(default)]
    pub translate: Option<TranslateConfig>,
    #[serde(default)]
    pub release: Option<ReleaseConfig>,
    /// Directory of `<syntax>/<block>.tera` files overriding the built-in templates.
    #[serde(default)]
    pub templates_dir: Option<PathBuf>,

    /// Absolute project root; filled in by the loader, never serialized.
    #[serde(skip)]
    pub root: PathBuf,
}

impl ProjectConfig {
    /// Resolve a config-relative path against the project root.
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        if relative.is_absolute() {
            relative.to_path_buf()
        } else {
            self.root.join(relative)
        }
    }
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// `<root>/syncwright.yaml`: pure, no I/O.
pub fn config_path_at(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Load the config at an explicit path, treating `root` as the project root.
pub fn load_from(path: &Path, root: &Path) -> Result<ProjectConfig, CoreError> {
    if !path.exists() {
        return Err(CoreError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    let mut config: ProjectConfig =
        serde_yaml::from_str(&contents).map_err(|e| CoreError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
    config.root = root.to_path_buf();
    Ok(config)
}

/// Load `<root>/syncwright.yaml`.
///
/// Returns `CoreError::ConfigNotFound` if absent,
/// `CoreError::Parse` (with path + line context) if malformed YAML.
pub fn load_at(root: &Path) -> Result<ProjectConfig, CoreError> {
    load_from(&config_path_at(root), root)
}

/// `load_at` convenience wrapper rooted at the current directory.
pub fn load() -> Result<ProjectConfig, CoreError> {
    let cwd = std::env::current_dir().map_err(|e| io_err(".", e))?;
    load_at(&cwd)
}

/// Read the authoritative version string named by `source`.
pub fn read_version_at(root: &Path, source: &VersionSource) -> Result<String, CoreError> {
    let path = if source.file.is_absolute() {
        source.file.clone()
    } else {
        root.join(&source.file)
    };
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    let doc: serde_json::Value =
        serde_json::from_str(&contents).map_err(|e| CoreError::Json {
            path: path.clone(),
            source: e,
        })?;
    doc.get(&source.field)
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .ok_or(CoreError::MissingVersionField {
            path,
            field: source.field.clone(),
        })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
