//! Error types for document loading and module compilation.
//!
//! Covers I/O and deserialization failures, name resolution inside
//! documents, and schema errors raised while driving or building modules.

use std::path::PathBuf;

use thiserror::Error;
use yang_model_core::SchemaError;

/// Errors that can occur while loading documents or compiling modules.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// A file extension other than `json`, `yaml` or `yml`.
    #[error("unsupported document format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// A prefixed name uses a prefix that is neither the module's own nor
    /// one of its imports.
    #[error("module {module}: unknown prefix '{prefix}'")]
    UnknownPrefix { module: String, prefix: String },

    /// An import names a module that was not loaded.
    #[error("module {module}: imported module '{import}' is not loaded")]
    UnknownImport { module: String, import: String },

    /// A schema error raised while populating one module's builders.
    #[error("module {module}: {source}")]
    Module {
        module: String,
        #[source]
        source: SchemaError,
    },

    /// A schema error raised while compiling the assembled context.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// No source produced any document.
    #[error("no schema sources available")]
    NoSourcesAvailable,
}

/// Convenience alias for results with [`LoaderError`].
pub type Result<T> = std::result::Result<T, LoaderError>;
