//! Namespace-qualified, revision-scoped identifiers.
//!
//! Every named schema entity is keyed by a [`QName`]. The namespace and
//! revision distinguish identically named nodes that come from different
//! modules or different revisions of the same module.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};

/// Date format of a module revision (`YYYY-MM-DD`).
pub const REVISION_FORMAT: &str = "%Y-%m-%d";

/// Parses a module revision date.
///
/// # Examples
///
/// ```
/// use yang_model_core::parse_revision;
///
/// assert!(parse_revision("2013-07-01").is_ok());
/// assert!(parse_revision("2013-13-01").is_err());
/// ```
pub fn parse_revision(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), REVISION_FORMAT)
        .map_err(|_| SchemaError::InvalidRevision(text.to_string()))
}

/// Global identity of a schema node: namespace, revision and local name.
///
/// Two QNames are equal iff all three components match. Ordering is by
/// namespace, then revision (absent sorts first), then local name; this is
/// the iteration order of every keyed collection in the model.
///
/// # Examples
///
/// ```
/// use yang_model_core::QName;
///
/// let x = QName::create("urn:example", "2013-07-01", "x").unwrap();
/// assert_eq!(x.local_name(), "x");
/// assert_eq!(x.to_string(), "(urn:example?revision=2013-07-01)x");
///
/// let parsed: QName = "(urn:example?revision=2013-07-01)x".parse().unwrap();
/// assert_eq!(parsed, x);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QName {
    namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    revision: Option<NaiveDate>,
    local_name: String,
}

impl QName {
    /// Creates a QName from already-validated parts.
    pub fn new(
        namespace: impl Into<String>,
        revision: Option<NaiveDate>,
        local_name: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            revision,
            local_name: local_name.into(),
        }
    }

    /// Creates a QName, parsing `revision` as a `YYYY-MM-DD` date.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidRevision`] for a malformed date and
    /// [`SchemaError::InvalidQName`] for an empty local name.
    pub fn create(namespace: &str, revision: &str, local_name: &str) -> Result<Self> {
        if local_name.trim().is_empty() {
            return Err(SchemaError::InvalidQName(format!(
                "({namespace}?revision={revision})"
            )));
        }
        Ok(Self::new(namespace, Some(parse_revision(revision)?), local_name))
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn revision(&self) -> Option<NaiveDate> {
        self.revision
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Returns a QName in the same namespace and revision with another local
    /// name.
    ///
    /// # Examples
    ///
    /// ```
    /// use yang_model_core::QName;
    ///
    /// let g = QName::new("urn:example", None, "g");
    /// let x = g.sibling("x");
    /// assert!(g.same_module(&x));
    /// assert_eq!(x.local_name(), "x");
    /// ```
    pub fn sibling(&self, local_name: impl Into<String>) -> Self {
        Self::new(self.namespace.clone(), self.revision, local_name)
    }

    /// Returns `true` if both names share namespace and revision.
    pub fn same_module(&self, other: &QName) -> bool {
        self.namespace == other.namespace && self.revision == other.revision
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.revision {
            Some(revision) => write!(
                f,
                "({}?revision={}){}",
                self.namespace,
                revision.format(REVISION_FORMAT),
                self.local_name
            ),
            None => write!(f, "({}){}", self.namespace, self.local_name),
        }
    }
}

impl FromStr for QName {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || SchemaError::InvalidQName(s.to_string());

        let rest = s.strip_prefix('(').ok_or_else(invalid)?;
        // Local names are identifiers, so the last ')' closes the module part.
        let (module, local_name) = rest.rsplit_once(')').ok_or_else(invalid)?;
        if local_name.is_empty() || module.is_empty() {
            return Err(invalid());
        }

        match module.rsplit_once("?revision=") {
            Some((namespace, revision)) => {
                Ok(Self::new(namespace, Some(parse_revision(revision)?), local_name))
            }
            None => Ok(Self::new(module, None, local_name)),
        }
    }
}
