//! syncwright core library: canonical sources and domain types.
//!
//! Public API surface:
//! - [`types`]: newtypes and domain structs
//! - [`error`]: [`CoreError`]
//! - [`config`]: `syncwright.yaml` loading
//! - [`inclusion`]: inclusion list parsing
//! - [`hierarchy`]: canonical error tree
//! - [`descriptor`]: per-id descriptor shapes
//! - [`catalog`]: id discovery and record instantiation

pub mod catalog;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod hierarchy;
pub mod inclusion;
pub mod types;

pub use catalog::{build_catalog, get_included_ids, Catalog, DescriptorFactory, RecordFactory};
pub use config::ProjectConfig;
pub use error::CoreError;
pub use hierarchy::{ErrorNode, ErrorTree};
pub use inclusion::InclusionConfig;
pub use types::{
    CanonicalId, ExchangeRecord, MatchScope, RecordUrls, TableView, TargetSyntax,
    TranslationMode, VersionTemplate,
};
