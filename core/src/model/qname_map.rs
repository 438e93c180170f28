use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::{Serialize, Serializer};

use crate::error::{Result, SchemaError};
use crate::QName;

/// Collection of schema entities keyed by [`QName`].
///
/// Keys are unique: inserting a second entry under an existing QName is
/// rejected and the map is left unchanged. Iteration follows QName order,
/// so lookups by local name are deterministic.
///
/// Serializes as a sequence of its values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QNameMap<T> {
    entries: BTreeMap<QName, T>,
}

impl<T> QNameMap<T> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Inserts `value` under `qname` unless the key is already taken.
    ///
    /// `statement` names the kind of definition for the error message.
    pub(crate) fn insert_unique(
        &mut self,
        qname: QName,
        value: T,
        statement: &'static str,
    ) -> Result<()> {
        match self.entries.entry(qname) {
            Entry::Occupied(entry) => Err(SchemaError::DuplicateDefinition {
                statement,
                qname: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(value);
                Ok(())
            }
        }
    }

    pub(crate) fn get_mut(&mut self, qname: &QName) -> Option<&mut T> {
        self.entries.get_mut(qname)
    }

    pub fn get(&self, qname: &QName) -> Option<&T> {
        self.entries.get(qname)
    }

    pub fn contains(&self, qname: &QName) -> bool {
        self.entries.contains_key(qname)
    }

    /// Returns the first entry, in QName order, whose local name matches.
    ///
    /// When several namespaces define the same local name the entry with the
    /// smallest QName wins; the answer is stable for a given map.
    pub fn find_by_local_name(&self, local_name: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(qname, _)| qname.local_name() == local_name)
            .map(|(_, value)| value)
    }

    /// Returns the first key, in QName order, with the given local name.
    pub(crate) fn key_by_local_name(&self, local_name: &str) -> Option<&QName> {
        self.entries.keys().find(|qname| qname.local_name() == local_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QName, &T)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &QName> {
        self.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for QNameMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a QNameMap<T> {
    type Item = (&'a QName, &'a T);
    type IntoIter = std::collections::btree_map::Iter<'a, QName, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<T: Serialize> Serialize for QNameMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_unique_rejects_duplicate_and_keeps_first() {
        let key = QName::new("urn:example", None, "x");
        let mut map = QNameMap::new();
        map.insert_unique(key.clone(), 1, "leaf").unwrap();

        let err = map.insert_unique(key.clone(), 2, "leaf").unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateDefinition {
                statement: "leaf",
                qname: key.clone()
            }
        );
        assert_eq!(map.get(&key), Some(&1));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_find_by_local_name_prefers_smallest_namespace() {
        let mut map = QNameMap::new();
        map.insert_unique(QName::new("urn:b", None, "x"), "b", "leaf")
            .unwrap();
        map.insert_unique(QName::new("urn:a", None, "x"), "a", "leaf")
            .unwrap();

        assert_eq!(map.find_by_local_name("x"), Some(&"a"));
        assert_eq!(map.find_by_local_name("y"), None);
    }
}
