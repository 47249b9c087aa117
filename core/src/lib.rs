#![deny(missing_docs)]

//! # Schemagen Core
//!
//! Resolves OpenAPI / JSON-Schema component schemas into typed field trees
//! ready for code emission.

/// Shared error types.
pub mod error;

/// Generator configuration.
pub mod config;

/// Input schema model (serde shims over the document).
pub mod document;

/// Document loaders.
pub mod loader;

/// URL and JSON Pointer helpers.
pub mod ref_utils;

/// Identifier and serialized-name derivation.
pub mod naming;

/// Output field model.
pub mod fields;

/// Schema registry.
pub mod registry;

/// Recursive schema resolution.
pub mod resolver;

/// Generation entry points.
pub mod generator;

pub use config::{
    CompositionMode, DegradePolicy, GeneratorConfig, MergePolicy, ReferenceMode, UnknownTypePolicy,
};
pub use document::{parse_document, SchemaDocument, SchemaNode};
pub use error::{GenerationFailure, GenerationReport, SchemaError, SchemaResult};
pub use fields::{Field, FieldBase, Fields};
pub use generator::load_and_generate;
pub use loader::{DocumentLoader, FsLoader, InMemoryLoader};
pub use naming::{JSON_CONTENT_TYPE, XML_CONTENT_TYPE};
pub use registry::{SchemaGen, SchemaInfo};
