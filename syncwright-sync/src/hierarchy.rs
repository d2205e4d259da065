//! Error hierarchy propagation.
//!
//! The canonical tree is rendered once per target syntax and written between
//! the target's prologue (e.g. `error_hierarchy = `) and its boundary text.
//! Targets that declare classes also get their declaration block rebuilt.

use syncwright_core::config::{ErrorTarget, ProjectConfig};
use syncwright_core::ErrorTree;
use syncwright_renderer::{render_literal, DeclarationContext, TemplateEngine};

use crate::error::SyncError;
use crate::patch::Anchor;
use crate::workset::Workset;

/// Anchor spanning prologue, current literal and boundary.
pub fn literal_anchor(target: &ErrorTarget) -> Result<Anchor, SyncError> {
    let pattern = format!(
        "(?s){}.*?{}",
        regex::escape(&target.prologue),
        regex::escape(&target.boundary)
    );
    Ok(Anchor::new(&pattern)?.unique())
}

/// Anchor spanning the class declarations through the closing `]` of `__all__`.
pub fn declarations_anchor(tree: &ErrorTree) -> Result<Anchor, SyncError> {
    let pattern = format!(
        r"(?ms)^class {}\({}\):\n.*?^__all__ = \[\n.*?^\]\n",
        regex::escape(&tree.root().name),
        syncwright_renderer::context::ROOT_EXCEPTION
    );
    Ok(Anchor::new(&pattern)?.unique())
}

/// Load the canonical tree named by the `errors` section.
pub fn load_tree(config: &ProjectConfig) -> Result<Option<ErrorTree>, SyncError> {
    match &config.errors {
        Some(errors) => Ok(Some(ErrorTree::load(&config.resolve(&errors.source))?)),
        None => Ok(None),
    }
}

/// Stage every error target. Returns the pre-order class names.
pub fn stage_errors(
    config: &ProjectConfig,
    engine: &TemplateEngine,
    workset: &mut Workset,
) -> Result<Vec<String>, SyncError> {
    let errors = config.errors.as_ref().ok_or(SyncError::MissingSection("errors"))?;
    let source = config.resolve(&errors.source);
    let tree = ErrorTree::load(&source)?;

    for target in &errors.targets {
        let path = config.resolve(&target.file);
        tracing::info!("errors: {} -> {}", source.display(), path.display());
        let literal = render_literal(&tree, target.syntax);
        let anchor = literal_anchor(target)?;
        let replacement = format!("{}{}{}", target.prologue, literal, target.boundary);

        let declarations = if target.declarations {
            let ctx = DeclarationContext::from_tree(&tree);
            Some((
                declarations_anchor(&tree)?,
                engine.render_declarations(target.syntax, &ctx)?,
            ))
        } else {
            None
        };

        workset.edit(&path, |file| {
            file.apply(&anchor, &replacement)?;
            if let Some((anchor, block)) = &declarations {
                file.apply(anchor, block)?;
            }
            Ok(())
        })?;
    }

    Ok(tree.flatten().into_iter().map(str::to_owned).collect())
}
