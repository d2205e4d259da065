//! Tera rendering engine: [`Block`] enum and [`TemplateEngine`].
//!
//! # Block templates
//!
//! | Syntax      | Blocks                                                       |
//! |-------------|--------------------------------------------------------------|
//! | typescript  | `imports`, `error_imports`, `registry`, `exports`            |
//! | python      | `imports`, `error_imports`, `registry`, `exports`, `declarations` |
//! | php         | `registry`                                                   |
//! | json        | (none; error literal only)                                   |

use std::collections::HashMap;
use std::fs::DirEntry;
use std::path::Path;

use tera::Tera;

use syncwright_core::TargetSyntax;

use crate::context::{DeclarationContext, RegistryContext};
use crate::error::{io_err, RenderError};

// ---------------------------------------------------------------------------
// Embedded templates: baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    ("typescript/imports.tera", include_str!("templates/typescript/imports.tera")),
    (
        "typescript/error_imports.tera",
        include_str!("templates/typescript/error_imports.tera"),
    ),
    ("typescript/registry.tera", include_str!("templates/typescript/registry.tera")),
    ("typescript/exports.tera", include_str!("templates/typescript/exports.tera")),
    ("python/imports.tera", include_str!("templates/python/imports.tera")),
    (
        "python/error_imports.tera",
        include_str!("templates/python/error_imports.tera"),
    ),
    ("python/registry.tera", include_str!("templates/python/registry.tera")),
    ("python/exports.tera", include_str!("templates/python/exports.tera")),
    (
        "python/declarations.tera",
        include_str!("templates/python/declarations.tera"),
    ),
    ("php/registry.tera", include_str!("templates/php/registry.tera")),
];

// ---------------------------------------------------------------------------
// Overrides
// ---------------------------------------------------------------------------

fn read_entries(dir: &Path) -> Result<Vec<DirEntry>, RenderError> {
    std::fs::read_dir(dir)
        .map_err(|e| io_err(dir, e))?
        .map(|entry| entry.map_err(|e| io_err(dir, e)))
        .collect()
}

fn is_template(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("tera")
}

/// Read `<syntax>/<block>.tera` overrides from `dir`, keyed like [`TPLS`].
///
/// Non-template files are ignored. A template that replaces no embedded one
/// is an error.
fn load_overrides(dir: &Path) -> Result<Vec<(String, String)>, RenderError> {
    let mut overrides = Vec::new();
    if !dir.is_dir() {
        return Ok(overrides);
    }
    for entry in read_entries(dir)? {
        let syntax_dir = entry.path();
        if !syntax_dir.is_dir() {
            if is_template(&syntax_dir) {
                return Err(RenderError::UnknownOverride(syntax_dir));
            }
            continue;
        }
        let syntax = entry.file_name().to_string_lossy().into_owned();
        for file in read_entries(&syntax_dir)? {
            let path = file.path();
            if !is_template(&path) {
                continue;
            }
            let key = format!("{syntax}/{}", file.file_name().to_string_lossy());
            if !TPLS.iter().any(|(name, _)| *name == key) {
                return Err(RenderError::UnknownOverride(path));
            }
            let body = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
            overrides.push((key, body));
        }
    }
    Ok(overrides)
}

fn build_tera(overrides_dir: Option<&Path>) -> Result<Tera, RenderError> {
    let mut templates: HashMap<String, String> = TPLS
        .iter()
        .map(|(name, body)| (name.to_string(), body.to_string()))
        .collect();
    if let Some(dir) = overrides_dir {
        templates.extend(load_overrides(dir)?);
    }

    let mut tera = Tera::default();
    tera.add_raw_templates(templates)?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// Block
// ---------------------------------------------------------------------------

/// A rewritable region of a generated root file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Block {
    /// One import line per catalog id.
    Imports,
    /// Import(s) of the flattened error classes.
    ErrorImports,
    /// The id → module registry literal.
    Registry,
    /// The export / symbol list.
    Exports,
    /// Error class declarations plus their export list.
    Declarations,
}

impl Block {
    pub fn as_str(&self) -> &'static str {
        match self {
            Block::Imports => "imports",
            Block::ErrorImports => "error_imports",
            Block::Registry => "registry",
            Block::Exports => "exports",
            Block::Declarations => "declarations",
        }
    }

    /// Catalog-driven blocks present in a root file of `syntax`, in rewrite order.
    pub fn registry_blocks(syntax: TargetSyntax) -> &'static [Block] {
        match syntax {
            TargetSyntax::Typescript | TargetSyntax::Python => &[
                Block::Registry,
                Block::Imports,
                Block::ErrorImports,
                Block::Exports,
            ],
            TargetSyntax::Php => &[Block::Registry],
            TargetSyntax::Json => &[],
        }
    }

    /// Template name for this block in `syntax`.
    pub fn template_name(&self, syntax: TargetSyntax) -> String {
        format!("{}/{}.tera", syntax, self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TemplateEngine
// ---------------------------------------------------------------------------

/// Tera-based engine for rendering block templates with optional user overrides.
///
/// `user_template_dir` may contain `<syntax>/<block>.tera` files that override
/// embedded defaults. Each override must name a block the syntax already has.
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Construct a new [`TemplateEngine`], loading embedded templates plus any
    /// overrides found in `user_template_dir`.
    pub fn new(user_template_dir: Option<&Path>) -> Result<Self, RenderError> {
        let tera = build_tera(user_template_dir)?;
        Ok(TemplateEngine { tera })
    }

    fn render_named(
        &self,
        syntax: TargetSyntax,
        block: Block,
        ctx: &tera::Context,
    ) -> Result<String, RenderError> {
        let name = block.template_name(syntax);
        if !self.tera.get_template_names().any(|n| n == name) {
            return Err(RenderError::UnsupportedBlock {
                syntax,
                block: block.as_str(),
            });
        }
        Ok(self.tera.render(&name, ctx)?)
    }

    /// Render a catalog-driven block.
    pub fn render_block(
        &self,
        syntax: TargetSyntax,
        block: Block,
        ctx: &RegistryContext,
    ) -> Result<String, RenderError> {
        self.render_named(syntax, block, &ctx.to_tera_context()?)
    }

    /// Render the error class declaration block.
    pub fn render_declarations(
        &self,
        syntax: TargetSyntax,
        ctx: &DeclarationContext,
    ) -> Result<String, RenderError> {
        self.render_named(syntax, Block::Declarations, &ctx.to_tera_context()?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
