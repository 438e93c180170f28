//! Document loading and module compilation.
//!
//! Provides [`SchemaLoader`] for holding a set of parsed module documents and
//! [`LoaderBuilder`] for collecting them from several files and directories.
//!
//! # Loading patterns
//!
//! ```no_run
//! use yang_model_core::BuildOptions;
//! use yang_model_loader::SchemaLoader;
//!
//! // Load every JSON/YAML document in a directory
//! let loader = SchemaLoader::from_dir("schemas/").unwrap();
//! let context = loader.compile(&BuildOptions::default()).unwrap();
//!
//! // Merge several sources and skip a module
//! let loader = SchemaLoader::builder()
//!     .source("schemas/")
//!     .source("vendor/ietf-inet-types.yaml")
//!     .exclude("experimental")
//!     .build()
//!     .unwrap();
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info};
use yang_model_core::{BuildOptions, SchemaContext, SchemaContextBuilder, SchemaError};

use crate::config::CompilerConfig;
use crate::document::{DocumentFormat, ModuleDocument};
use crate::driver::{ModuleDriver, ModuleHeaders, module_header};
use crate::error::{LoaderError, Result};

/// Describes where a [`SchemaLoader`] got its documents from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// Every `*.json`, `*.yaml` and `*.yml` file in a directory.
    Directory(PathBuf),
    /// A single document file.
    File(PathBuf),
    /// Documents handed over in memory.
    Memory,
    /// Merged from several sources.
    Multiple(Vec<DocumentSource>),
}

/// Parsed module documents, indexed by module name.
///
/// # Examples
///
/// ```
/// use yang_model_core::{BuildOptions, DataNodeContainer};
/// use yang_model_loader::{ModuleDocument, SchemaLoader};
///
/// let document = ModuleDocument::from_yaml_str(r#"
/// module: example
/// namespace: "urn:example"
/// prefix: ex
/// body:
///   - statement: leaf
///     name: hostname
///     type: string
/// "#).unwrap();
///
/// let loader = SchemaLoader::from_documents(vec![document]).unwrap();
/// let context = loader.compile(&BuildOptions::default()).unwrap();
/// let module = context.module("example").unwrap();
/// assert!(module.data_child_by_name("hostname").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct SchemaLoader {
    documents: BTreeMap<String, ModuleDocument>,
    source: DocumentSource,
}

impl SchemaLoader {
    /// Returns a new [`LoaderBuilder`] for merging several sources.
    pub fn builder() -> LoaderBuilder {
        LoaderBuilder::new()
    }

    /// Loads every document in a directory.
    ///
    /// Files are parsed in parallel. Files with other extensions are
    /// skipped; subdirectories are not searched.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::IoError`] if the directory or a file cannot be
    /// read, a JSON/YAML error if a document is malformed, or
    /// [`SchemaError::DuplicateModule`] if two files define the same module.
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut files = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let file_path = entry?.path();
            if file_path.is_file() && DocumentFormat::from_path(&file_path).is_some() {
                files.push(file_path);
            }
        }
        files.sort();

        let documents = files
            .par_iter()
            .map(|file| -> Result<ModuleDocument> {
                let document = ModuleDocument::from_path(file)?;
                debug!(file = %file.display(), module = %document.module, "parsed document");
                Ok(document)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut loader = Self::from_documents(documents)?;
        loader.source = DocumentSource::Directory(path.to_path_buf());
        Ok(loader)
    }

    /// Loads a single document file.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::UnsupportedFormat`] for unknown extensions,
    /// [`LoaderError::IoError`] if the file cannot be read, or a JSON/YAML
    /// error if parsing fails.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let document = ModuleDocument::from_path(path)?;
        let mut loader = Self::from_documents([document])?;
        loader.source = DocumentSource::File(path.to_path_buf());
        Ok(loader)
    }

    /// Wraps documents that are already in memory.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateModule`] if two documents share a
    /// module name.
    pub fn from_documents(documents: impl IntoIterator<Item = ModuleDocument>) -> Result<Self> {
        let mut loader = Self {
            documents: BTreeMap::new(),
            source: DocumentSource::Memory,
        };
        for document in documents {
            loader.insert(document)?;
        }
        Ok(loader)
    }

    /// Adds a document.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateModule`] if a document for the same
    /// module is already loaded.
    pub fn insert(&mut self, document: ModuleDocument) -> Result<()> {
        if self.documents.contains_key(&document.module) {
            return Err(SchemaError::DuplicateModule(document.module).into());
        }
        self.documents.insert(document.module.clone(), document);
        Ok(())
    }

    /// Removes a module's document, returning it if present.
    pub fn remove(&mut self, module: &str) -> Option<ModuleDocument> {
        self.documents.remove(module)
    }

    pub fn document(&self, module: &str) -> Option<&ModuleDocument> {
        self.documents.get(module)
    }

    pub fn contains(&self, module: &str) -> bool {
        self.documents.contains_key(module)
    }

    /// Returns module names in sorted order.
    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Returns a reference to the source metadata.
    pub fn source(&self) -> &DocumentSource {
        &self.source
    }

    /// Drives every document into a [`ModuleBuilder`](yang_model_core::ModuleBuilder)
    /// and collects them in one context builder.
    ///
    /// Prefixed names resolve through each document's imports. Nothing is
    /// resolved across modules yet; `uses` targets are looked up when the
    /// returned builder is built.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::UnknownImport`] or [`LoaderError::UnknownPrefix`]
    /// for names that cannot be resolved, and [`LoaderError::Module`] for
    /// statements the builders reject.
    pub fn assemble(&self) -> Result<SchemaContextBuilder> {
        let headers = self
            .documents
            .iter()
            .map(|(name, document)| -> Result<_> { Ok((name.clone(), module_header(document)?)) })
            .collect::<Result<ModuleHeaders>>()?;

        let modules = self
            .documents
            .par_iter()
            .map(|(_, document)| ModuleDriver::new(document, &headers)?.drive())
            .collect::<Result<Vec<_>>>()?;

        let mut context = SchemaContextBuilder::new();
        for module in modules {
            context.add_module(module)?;
        }
        debug!(modules = context.len(), "assembled schema context");
        Ok(context)
    }

    /// Assembles and builds every loaded module.
    ///
    /// # Errors
    ///
    /// Returns any [`assemble`](Self::assemble) error, or
    /// [`LoaderError::Schema`] if resolution fails.
    pub fn compile(&self, options: &BuildOptions) -> Result<SchemaContext> {
        let context = self.assemble()?.build_with(options)?;
        info!(modules = context.len(), "compiled schema context");
        Ok(context)
    }
}

/// Builder for a [`SchemaLoader`] merged from several sources.
///
/// Every source is loaded; a source that fails to load fails the build.
/// Excluded modules are dropped after loading.
///
/// # Example
///
/// ```no_run
/// use yang_model_loader::SchemaLoader;
///
/// let loader = SchemaLoader::builder()
///     .source("/opt/yang/")
///     .source("/opt/yang-extra/vendor.yaml")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct LoaderBuilder {
    sources: Vec<PathBuf>,
    exclude: Vec<String>,
}

impl LoaderBuilder {
    /// Creates a new builder with no sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document file or a directory of documents.
    pub fn source(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(path.into());
        self
    }

    /// Skips a module by name.
    pub fn exclude(mut self, module: impl Into<String>) -> Self {
        self.exclude.push(module.into());
        self
    }

    /// Adds the sources and exclusions of a configuration file.
    ///
    /// Relative source paths are resolved against `base`, usually the
    /// directory holding the configuration file.
    pub fn with_config(mut self, config: &CompilerConfig, base: &Path) -> Self {
        self.sources.extend(config.source_paths(base));
        self.exclude.extend(config.exclude.iter().cloned());
        self
    }

    /// Loads and merges every configured source.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::NoSourcesAvailable`] if no source was added or
    /// nothing is left after exclusions, or the first error raised while
    /// loading a source.
    pub fn build(self) -> Result<SchemaLoader> {
        if self.sources.is_empty() {
            return Err(LoaderError::NoSourcesAvailable);
        }

        let mut merged = SchemaLoader::from_documents([])?;
        let mut loaded = Vec::with_capacity(self.sources.len());
        for path in &self.sources {
            let loader = if path.is_dir() {
                SchemaLoader::from_dir(path)?
            } else {
                SchemaLoader::from_file(path)?
            };
            debug!(source = %path.display(), modules = loader.len(), "loaded source");
            loaded.push(loader.source.clone());
            for (_, document) in loader.documents {
                merged.insert(document)?;
            }
        }

        for module in &self.exclude {
            if merged.remove(module).is_some() {
                debug!(module = %module, "excluded module");
            }
        }
        if merged.is_empty() {
            return Err(LoaderError::NoSourcesAvailable);
        }

        merged.source = match loaded.len() {
            1 => loaded.remove(0),
            _ => DocumentSource::Multiple(loaded),
        };
        info!(modules = merged.len(), "loaded schema documents");
        Ok(merged)
    }
}
