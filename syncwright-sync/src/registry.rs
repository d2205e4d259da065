//! Registry synchronizer.
//!
//! Rewrites the catalog-driven blocks of a generated root file:
//!
//! | Block          | typescript anchor                               | python anchor                          |
//! |----------------|-------------------------------------------------|----------------------------------------|
//! | registry       | `const exchanges = {` … `}`                     | `exchanges = [` … `]`                  |
//! | imports        | every `import <id> from './src/<id>.js'` line   | every `from <pkg>.<id> import <id>` line |
//! | error imports  | `import { … } from './src/base/errors.js'`      | run of `from <pkg>.base.errors import` lines |
//! | exports        | `export {` … `}`                                | `__all__ = [` … `]`                    |
//!
//! PHP files only carry the `public static $exchanges = array(` … `);` block.
//!
//! Per-id import lines are first removed wherever they are, then the fresh
//! block is inserted directly above the registry declaration. The result of
//! one pass is therefore a fixed point of the next.

use syncwright_core::config::RegistryTarget;
use syncwright_core::{CanonicalId, MatchScope, TargetSyntax};
use syncwright_renderer::{Block, RegistryContext, TemplateEngine};

use crate::error::SyncError;
use crate::patch::{Anchor, ArtifactFile};

fn registry_anchor(syntax: TargetSyntax) -> Result<Option<Anchor>, SyncError> {
    let pattern = match syntax {
        TargetSyntax::Typescript => r"(?ms)^const exchanges = \{\n.*?^\}\n",
        TargetSyntax::Python => r"(?ms)^exchanges = \[\n.*?^\]\n",
        TargetSyntax::Php => r"(?ms)^[ \t]*public static \$exchanges = array\(\n.*?^[ \t]*\);\n",
        TargetSyntax::Json => return Ok(None),
    };
    Ok(Some(Anchor::new(pattern)?.unique()))
}

/// Per-id import lines, anywhere in the file.
fn import_lines_anchor(syntax: TargetSyntax, package: &str) -> Result<Option<Anchor>, SyncError> {
    let pattern = match syntax {
        TargetSyntax::Typescript => r"(?m)^import \w+ from '\./src/\w+\.js'\n".to_string(),
        TargetSyntax::Python => format!(
            r"(?m)^from {}\.\w+ import \w+ +# noqa: F401\n",
            regex::escape(package)
        ),
        TargetSyntax::Php | TargetSyntax::Json => return Ok(None),
    };
    Ok(Some(Anchor::new(&pattern)?.scope(MatchScope::All).optional()))
}

/// Blank lines directly above the registry declaration.
fn import_slot_anchor(syntax: TargetSyntax) -> Result<Option<(Anchor, &'static str)>, SyncError> {
    let (pattern, declaration) = match syntax {
        TargetSyntax::Typescript => (r"(?m)^\n*const exchanges = \{$", "const exchanges = {"),
        TargetSyntax::Python => (r"(?m)^\n*exchanges = \[$", "exchanges = ["),
        TargetSyntax::Php | TargetSyntax::Json => return Ok(None),
    };
    Ok(Some((Anchor::new(pattern)?.unique(), declaration)))
}

fn error_imports_anchor(syntax: TargetSyntax, package: &str) -> Result<Option<Anchor>, SyncError> {
    let pattern = match syntax {
        TargetSyntax::Typescript => {
            r"(?m)^import \{[^}\n]*\} from '\./src/base/errors\.js'\n".to_string()
        }
        TargetSyntax::Python => format!(
            r"(?m)(?:^from {}\.base\.errors import \w+ +# noqa: F401\n)+",
            regex::escape(package)
        ),
        TargetSyntax::Php | TargetSyntax::Json => return Ok(None),
    };
    Ok(Some(Anchor::new(&pattern)?.unique()))
}

fn exports_anchor(syntax: TargetSyntax) -> Result<Option<Anchor>, SyncError> {
    let pattern = match syntax {
        TargetSyntax::Typescript => r"(?ms)^export \{\n.*?^\}\n",
        TargetSyntax::Python => r"(?ms)^__all__ = \[\n.*?^\]\n",
        TargetSyntax::Php | TargetSyntax::Json => return Ok(None),
    };
    Ok(Some(Anchor::new(pattern)?.unique()))
}

/// Rewrite every catalog-driven block of `file`.
pub fn sync_registry(
    file: &mut ArtifactFile,
    target: &RegistryTarget,
    engine: &TemplateEngine,
    ids: &[CanonicalId],
    error_names: &[&str],
) -> Result<(), SyncError> {
    let syntax = target.syntax;
    let package = target.package.as_deref().unwrap_or_default();
    let ctx = RegistryContext::new(syntax, ids, error_names, target.package.as_deref());

    for block in Block::registry_blocks(syntax) {
        match block {
            Block::Registry => {
                if let Some(anchor) = registry_anchor(syntax)? {
                    let text = engine.render_block(syntax, *block, &ctx)?;
                    file.apply(&anchor, &text)?;
                }
            }
            Block::Imports => {
                if let Some(purge) = import_lines_anchor(syntax, package)? {
                    file.apply(&purge, "")?;
                }
                if let Some((slot, declaration)) = import_slot_anchor(syntax)? {
                    let imports = engine.render_block(syntax, *block, &ctx)?;
                    file.apply(&slot, &format!("{imports}\n{declaration}"))?;
                }
            }
            Block::ErrorImports => {
                if error_names.is_empty() {
                    continue;
                }
                if let Some(anchor) = error_imports_anchor(syntax, package)? {
                    let text = engine.render_block(syntax, *block, &ctx)?;
                    file.apply(&anchor, &text)?;
                }
            }
            Block::Exports => {
                if let Some(anchor) = exports_anchor(syntax)? {
                    let text = engine.render_block(syntax, *block, &ctx)?;
                    file.apply(&anchor, &text)?;
                }
            }
            Block::Declarations => {}
        }
    }
    Ok(())
}
