//! # syncwright-renderer
//!
//! Pure rendering for generated artifacts: Tera block templates per target
//! syntax, error hierarchy literals, and markdown catalog tables. Nothing in
//! this crate touches generated files; `syncwright-sync` decides where the
//! rendered text lands.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use syncwright_core::{CanonicalId, TargetSyntax};
//! use syncwright_renderer::{Block, RegistryContext, TemplateEngine};
//!
//! fn registry(ids: &[CanonicalId]) {
//!     if let Ok(engine) = TemplateEngine::new(None) {
//!         let ctx = RegistryContext::new(TargetSyntax::Typescript, ids, &[], None);
//!         if let Ok(text) = engine.render_block(TargetSyntax::Typescript, Block::Registry, &ctx) {
//!             print!("{text}");
//!         }
//!     }
//! }
//! ```

pub mod context;
pub mod countries;
pub mod engine;
pub mod error;
pub mod literal;
pub mod table;

pub use context::{ClassDecl, DeclarationContext, RegistryContext};
pub use engine::{Block, TemplateEngine};
pub use error::RenderError;
pub use literal::{canonical_literal, render_literal, SubstitutionTable};
pub use table::render_table;
