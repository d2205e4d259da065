//! Error hierarchy literals.
//!
//! The tree is first printed in one canonical single-quoted form:
//!
//! ```text
//! {
//!     'BaseError': {
//!         'ExchangeError': {},
//!         'NetworkError': {}
//!     }
//! }
//! ```
//!
//! Each target syntax then maps that form character by character through its
//! [`SubstitutionTable`]. Class names are identifiers, so the mapped
//! characters never occur inside a name.

use syncwright_core::{ErrorTree, TargetSyntax};

const INDENT: &str = "    ";

/// Character mapping from the canonical literal into one syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubstitutionTable {
    pub open: &'static str,
    pub close: &'static str,
    /// Replaces the `:` between a key and its children.
    pub colon: &'static str,
    pub quote: &'static str,
}

impl SubstitutionTable {
    pub fn for_syntax(syntax: TargetSyntax) -> Self {
        match syntax {
            TargetSyntax::Typescript | TargetSyntax::Python => Self {
                open: "{",
                close: "}",
                colon: ":",
                quote: "'",
            },
            TargetSyntax::Php => Self {
                open: "array(",
                close: ")",
                colon: " =>",
                quote: "'",
            },
            TargetSyntax::Json => Self {
                open: "{",
                close: "}",
                colon: ":",
                quote: "\"",
            },
        }
    }

    pub fn apply(&self, canonical: &str) -> String {
        let mut out = String::with_capacity(canonical.len() * 2);
        for c in canonical.chars() {
            match c {
                '{' => out.push_str(self.open),
                '}' => out.push_str(self.close),
                ':' => out.push_str(self.colon),
                '\'' => out.push_str(self.quote),
                other => out.push(other),
            }
        }
        out
    }
}

/// Canonical single-quoted literal of the whole tree, without a trailing newline.
pub fn canonical_literal(tree: &ErrorTree) -> String {
    let mut out = String::from("{\n");
    write_node(&mut out, tree, &tree.root().name, 1);
    out.push_str("\n}");
    out
}

fn write_node(out: &mut String, tree: &ErrorTree, name: &str, depth: usize) {
    let indent = INDENT.repeat(depth);
    out.push_str(&indent);
    out.push('\'');
    out.push_str(name);
    out.push_str("': ");

    let children = tree.get(name).map(|n| n.children.as_slice()).unwrap_or(&[]);
    if children.is_empty() {
        out.push_str("{}");
        return;
    }
    out.push_str("{\n");
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            out.push_str(",\n");
        }
        write_node(out, tree, child, depth + 1);
    }
    out.push('\n');
    out.push_str(&indent);
    out.push('}');
}

/// Literal of `tree` in `syntax`.
pub fn render_literal(tree: &ErrorTree, syntax: TargetSyntax) -> String {
    SubstitutionTable::for_syntax(syntax).apply(&canonical_literal(tree))
}
