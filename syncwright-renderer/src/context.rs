//! Rendering payloads for block templates.

use serde::{Deserialize, Serialize};

use syncwright_core::{CanonicalId, ErrorTree, TargetSyntax};

use crate::error::RenderError;

/// Non-catalog names every generated root file exports ahead of the catalog.
pub fn fixed_symbols(syntax: TargetSyntax) -> &'static [&'static str] {
    match syntax {
        TargetSyntax::Typescript => &["version", "Exchange", "exchanges"],
        TargetSyntax::Python => &["__version__", "Exchange", "exchanges"],
        TargetSyntax::Php | TargetSyntax::Json => &[],
    }
}

/// Payload of the catalog-driven blocks (imports, registry, exports).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryContext {
    /// Catalog ids in canonical order.
    pub ids: Vec<String>,
    /// Import prefix. Empty renders relative imports.
    pub package: String,
    /// Flattened error class names, parents first.
    pub error_names: Vec<String>,
    /// Export list: fixed symbols, then error names, then ids.
    pub symbols: Vec<String>,
}

impl RegistryContext {
    pub fn new(
        syntax: TargetSyntax,
        ids: &[CanonicalId],
        error_names: &[&str],
        package: Option<&str>,
    ) -> Self {
        let ids: Vec<String> = ids.iter().map(|id| id.0.clone()).collect();
        let error_names: Vec<String> = error_names.iter().map(|n| n.to_string()).collect();

        let mut symbols: Vec<String> = fixed_symbols(syntax)
            .iter()
            .map(|s| s.to_string())
            .collect();
        symbols.extend(error_names.iter().cloned());
        symbols.extend(ids.iter().cloned());

        Self {
            ids,
            package: package.unwrap_or_default().to_string(),
            error_names,
            symbols,
        }
    }

    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}

/// One `class Name(Parent)` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: String,
    pub parent: String,
}

/// Payload of the error class declaration block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclarationContext {
    /// Classes in pre-order; the root derives from the language's base exception.
    pub classes: Vec<ClassDecl>,
    /// `error_hierarchy` followed by every class name.
    pub exports: Vec<String>,
}

/// Base class the hierarchy root derives from in declaring syntaxes.
pub const ROOT_EXCEPTION: &str = "Exception";

impl DeclarationContext {
    pub fn from_tree(tree: &ErrorTree) -> Self {
        let classes: Vec<ClassDecl> = tree
            .nodes()
            .iter()
            .map(|node| ClassDecl {
                name: node.name.clone(),
                parent: node
                    .parent
                    .clone()
                    .unwrap_or_else(|| ROOT_EXCEPTION.to_string()),
            })
            .collect();

        let mut exports = vec!["error_hierarchy".to_string()];
        exports.extend(classes.iter().map(|c| c.name.clone()));

        Self { classes, exports }
    }

    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}
