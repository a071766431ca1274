//! # xsdbind
//!
//! Compiles XML Schema (XSD) documents into the type model of a content
//! repository: named schemas made of simple, complex and list types, fields
//! and value constraints.
//!
//! ## Features
//!
//! - Order-independent resolution of named types, including self-referencing
//!   and mutually referencing complex types
//! - Deterministic names for anonymous types
//! - `maxLength` and `enumeration` facets as constraints
//! - Repeated elements and groups as list types
//! - Default, fixed and nillable declarations as field flags
//! - A shared registry that only ever sees complete schemas
//!
//! ## Example
//!
//! ```rust,ignore
//! use xsdbind::XsdLoader;
//!
//! let loader = XsdLoader::new();
//! let schema = loader.load_schema_file("note", "nxs", "note.xsd", false)?;
//!
//! let registry = loader.registry();
//! let title = registry.get_schema("note").and_then(|s| s.field("title").cloned());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;

// Utilities
pub mod namespaces;
pub mod names;
pub mod locations;

// Resource loading
pub mod loaders;
pub mod documents;

// Parsed schema object model
pub mod xsd;

// Repository type model
pub mod types;
pub mod registry;
pub mod compiler;
pub mod dump;

// Re-exports for convenience
pub use compiler::{Compilation, Diagnostic, XsdLoader};
pub use error::{BindError, Error, ParseError, Result};
pub use namespaces::Namespace;
pub use registry::SchemaRegistry;
pub use types::{Constraint, Field, FieldFlags, PrimitiveType, Schema, Type};

/// Version of the xsdbind library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// XSD 1.0 namespace
pub const XSD_NAMESPACE: &str = xsd::builtins::XSD_NAMESPACE;

/// XML namespace
pub const XML_NAMESPACE: &str = namespaces::XML_NAMESPACE;
