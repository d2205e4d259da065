//! Canonical error hierarchy.
//!
//! The source is a nested YAML mapping with exactly one top-level key (the
//! unchecked base error). Child keys nest under their parent; a leaf is an
//! empty mapping (`{}`) or null:
//!
//! ```yaml
//! BaseError:
//!   ExchangeError:
//!     AuthenticationError:
//!       PermissionDenied: {}
//!   OperationFailed: {}
//! ```
//!
//! Nodes are stored in pre-order, so iterating [`ErrorTree::nodes`] always
//! yields a parent before any of its children.

use std::collections::HashMap;
use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::error::{io_err, CoreError};

/// One error class in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNode {
    pub name: String,
    pub parent: Option<String>,
    pub children: Vec<String>,
}

/// Acyclic, single-parent error tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorTree {
    nodes: Vec<ErrorNode>,
    index: HashMap<String, usize>,
}

impl ErrorTree {
    /// Load and validate the canonical hierarchy file.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let text = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        let value: Value = serde_yaml::from_str(&text).map_err(|e| CoreError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_value(&value)
    }

    /// Build from an already parsed YAML value.
    pub fn from_value(value: &Value) -> Result<Self, CoreError> {
        let top = value.as_mapping().ok_or_else(|| {
            CoreError::InvalidHierarchy("top level must be a mapping".to_string())
        })?;
        if top.len() != 1 {
            return Err(CoreError::InvalidHierarchy(format!(
                "expected exactly one root error, found {}",
                top.len()
            )));
        }

        let mut tree = ErrorTree {
            nodes: Vec::new(),
            index: HashMap::new(),
        };
        tree.insert_level(top, None)?;
        Ok(tree)
    }

    fn insert_level(&mut self, map: &Mapping, parent: Option<&str>) -> Result<(), CoreError> {
        for (key, children) in map {
            let name = key
                .as_str()
                .ok_or_else(|| CoreError::InvalidHierarchy(format!("non-string key {key:?}")))?;
            if !is_identifier(name) {
                return Err(CoreError::InvalidHierarchy(format!(
                    "'{name}' is not a valid class name"
                )));
            }
            if self.index.contains_key(name) {
                return Err(CoreError::InvalidHierarchy(format!(
                    "'{name}' appears more than once"
                )));
            }

            self.index.insert(name.to_string(), self.nodes.len());
            self.nodes.push(ErrorNode {
                name: name.to_string(),
                parent: parent.map(str::to_owned),
                children: Vec::new(),
            });
            if let Some(parent) = parent {
                let idx = self.index[parent];
                self.nodes[idx].children.push(name.to_string());
            }

            match children {
                Value::Null => {}
                Value::Mapping(sub) => self.insert_level(sub, Some(name))?,
                other => {
                    return Err(CoreError::InvalidHierarchy(format!(
                        "children of '{name}' must be a mapping, got {other:?}"
                    )))
                }
            }
        }
        Ok(())
    }

    /// The unchecked base error.
    pub fn root(&self) -> &ErrorNode {
        &self.nodes[0]
    }

    /// Nodes in pre-order.
    pub fn nodes(&self) -> &[ErrorNode] {
        &self.nodes
    }

    pub fn get(&self, name: &str) -> Option<&ErrorNode> {
        self.index.get(name).map(|&idx| &self.nodes[idx])
    }

    /// Pre-order flattening: every parent precedes all of its descendants.
    pub fn flatten(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
BaseError:
  ExchangeError:
    AuthenticationError:
      PermissionDenied: {}
    BadRequest:
  OperationFailed: {}
"#;

    fn tree() -> ErrorTree {
        ErrorTree::from_value(&serde_yaml::from_str(SAMPLE).unwrap()).expect("tree")
    }

    #[test]
    fn flatten_is_preorder() {
        assert_eq!(
            tree().flatten(),
            vec![
                "BaseError",
                "ExchangeError",
                "AuthenticationError",
                "PermissionDenied",
                "BadRequest",
                "OperationFailed",
            ]
        );
    }

    #[test]
    fn parents_and_children_are_linked() {
        let t = tree();
        assert_eq!(t.root().name, "BaseError");
        assert!(t.root().parent.is_none());
        let auth = t.get("AuthenticationError").unwrap();
        assert_eq!(auth.parent.as_deref(), Some("ExchangeError"));
        assert_eq!(auth.children, vec!["PermissionDenied".to_string()]);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let src = "BaseError:\n  A:\n    B: {}\n  C:\n    B: {}\n";
        let err = ErrorTree::from_value(&serde_yaml::from_str(src).unwrap()).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn multiple_roots_are_rejected() {
        let src = "A: {}\nB: {}\n";
        assert!(ErrorTree::from_value(&serde_yaml::from_str(src).unwrap()).is_err());
    }

    #[test]
    fn non_identifier_names_are_rejected() {
        let src = "BaseError:\n  'Bad{Name': {}\n";
        assert!(ErrorTree::from_value(&serde_yaml::from_str(src).unwrap()).is_err());
    }
}
