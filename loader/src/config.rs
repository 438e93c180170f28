//! Compiler configuration.
//!
//! Defines the YAML-serializable configuration that controls which document
//! sources are loaded, which modules are skipped, and the build limits.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! sources:
//!   - schemas/
//!   - vendor/ietf-inet-types.yaml
//! exclude:
//!   - experimental
//! build:
//!   max_depth: 32
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use yang_model_core::BuildOptions;

use crate::error::Result;

/// Top-level compiler configuration.
///
/// Loaded from a YAML file (typically `.yang-compile.yml` next to the
/// schema sources).
///
/// # Examples
///
/// ```no_run
/// use yang_model_loader::CompilerConfig;
///
/// let config = CompilerConfig::load(".yang-compile.yml").unwrap();
/// if config.is_excluded("experimental") {
///     println!("experimental modules are skipped");
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Configuration format version (e.g., `"1.0"`).
    pub version: String,
    /// Document files or directories, relative to the config file.
    #[serde(default)]
    pub sources: Vec<PathBuf>,
    /// Module names to skip.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Build limits.
    #[serde(default)]
    pub build: BuildOptions,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            sources: Vec::new(),
            exclude: Vec::new(),
            build: BuildOptions::default(),
        }
    }
}

impl CompilerConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::LoaderError::IoError) if the file cannot
    /// be read, or [`YamlError`](crate::LoaderError::YamlError) if parsing
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::LoaderError::IoError) if the file cannot
    /// be written, or [`YamlError`](crate::LoaderError::YamlError) if
    /// serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Returns `true` if `module` is in the exclusion list.
    pub fn is_excluded(&self, module: &str) -> bool {
        self.exclude.iter().any(|m| m == module)
    }

    /// Resolves relative source paths against `base`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::{Path, PathBuf};
    /// use yang_model_loader::CompilerConfig;
    ///
    /// let config = CompilerConfig {
    ///     sources: vec![PathBuf::from("schemas"), PathBuf::from("/opt/yang")],
    ///     ..Default::default()
    /// };
    /// let paths = config.source_paths(Path::new("/work"));
    /// assert_eq!(paths, vec![PathBuf::from("/work/schemas"), PathBuf::from("/opt/yang")]);
    /// ```
    pub fn source_paths(&self, base: &Path) -> Vec<PathBuf> {
        self.sources.iter().map(|source| base.join(source)).collect()
    }
}
