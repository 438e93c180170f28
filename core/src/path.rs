//! Schema-tree locations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::QName;

/// Ordered chain of [`QName`]s locating a node in the schema tree.
///
/// A path is absolute when it starts at the schema root and relative
/// otherwise (augmentation targets are relative to their use site).
///
/// # Examples
///
/// ```
/// use yang_model_core::{QName, SchemaPath};
///
/// let c = QName::new("urn:example", None, "c");
/// let x = c.sibling("x");
///
/// let path = SchemaPath::root().create_child(c.clone()).create_child(x.clone());
/// assert!(path.is_absolute());
/// assert_eq!(path.last(), Some(&x));
/// assert_eq!(path.parent().unwrap().last(), Some(&c));
/// assert_eq!(path.to_string(), "/c/x");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SchemaPath {
    path: Vec<QName>,
    absolute: bool,
}

impl SchemaPath {
    /// The empty absolute path.
    pub fn root() -> Self {
        Self {
            path: Vec::new(),
            absolute: true,
        }
    }

    pub fn absolute(path: Vec<QName>) -> Self {
        Self {
            path,
            absolute: true,
        }
    }

    pub fn relative(path: Vec<QName>) -> Self {
        Self {
            path,
            absolute: false,
        }
    }

    /// Returns a new path extended by `qname`.
    pub fn create_child(&self, qname: QName) -> Self {
        let mut path = self.path.clone();
        path.push(qname);
        Self {
            path,
            absolute: self.absolute,
        }
    }

    /// Returns the enclosing path, or `None` for an empty path.
    pub fn parent(&self) -> Option<Self> {
        if self.path.is_empty() {
            return None;
        }
        Some(Self {
            path: self.path[..self.path.len() - 1].to_vec(),
            absolute: self.absolute,
        })
    }

    pub fn path(&self) -> &[QName] {
        &self.path
    }

    pub fn last(&self) -> Option<&QName> {
        self.path.last()
    }

    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }
}

impl fmt::Display for SchemaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            return f.write_str(if self.absolute { "/" } else { "." });
        }
        for (index, qname) in self.path.iter().enumerate() {
            if index > 0 || self.absolute {
                f.write_str("/")?;
            }
            f.write_str(qname.local_name())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(name: &str) -> QName {
        QName::new("urn:example", None, name)
    }

    #[test]
    fn test_create_child_does_not_touch_parent() {
        let parent = SchemaPath::root().create_child(q("a"));
        let child = parent.create_child(q("b"));

        assert_eq!(parent.len(), 1);
        assert_eq!(child.len(), 2);
        assert_eq!(child.parent(), Some(parent));
    }

    #[test]
    fn test_relative_display() {
        let path = SchemaPath::relative(vec![q("c"), q("d")]);
        assert_eq!(path.to_string(), "c/d");
        assert_eq!(SchemaPath::relative(Vec::new()).to_string(), ".");
        assert_eq!(SchemaPath::root().to_string(), "/");
    }

    #[test]
    fn test_root_has_no_parent() {
        assert!(SchemaPath::root().parent().is_none());
        assert!(SchemaPath::root().is_empty());
    }
}
