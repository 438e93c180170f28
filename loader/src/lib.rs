//! Statement-tree document loading and module compilation.
//!
//! This crate reads already-parsed YANG modules stored as JSON or YAML
//! statement trees, drives the builders of [`yang_model_core`] with them,
//! and compiles the result into a shared [`SchemaContext`](yang_model_core::SchemaContext).
//!
//! # Quick start
//!
//! ```no_run
//! use std::path::Path;
//! use yang_model_loader::{CompilerConfig, SchemaLoader};
//!
//! // Load documents listed in a configuration file
//! let config = CompilerConfig::load("schemas/.yang-compile.yml").unwrap();
//! let loader = SchemaLoader::builder()
//!     .with_config(&config, Path::new("schemas"))
//!     .build()
//!     .unwrap();
//!
//! let context = loader.compile(&config.build).unwrap();
//! for module in context.modules() {
//!     println!("{} ({} rpcs)", module.name(), module.rpcs().len());
//! }
//! ```
//!
//! Builders reject statements their node kind cannot hold. A document with a
//! `leaf` directly under an `rpc` fails with [`LoaderError::Module`] wrapping
//! [`SchemaError::UnsupportedStructure`](yang_model_core::SchemaError::UnsupportedStructure).

mod config;
mod document;
mod driver;
mod error;
mod loader;

pub use config::CompilerConfig;
pub use document::{
    AugmentStatement, BodyStatement, ContainerStatement, DocumentFormat, GroupingStatement, Import,
    LeafListStatement, LeafStatement, ListStatement, ModuleDocument, RpcStatement, Statement,
    StatementMeta, TypedefStatement, UsesStatement,
};
pub use error::{LoaderError, Result};
pub use loader::{DocumentSource, LoaderBuilder, SchemaLoader};
