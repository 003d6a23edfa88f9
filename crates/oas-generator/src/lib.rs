//! # oas-generator
//!
//! Turns captured HTTP exchanges into a normalized, multi-file OpenAPI
//! document tree: parameterizes observed paths, infers JSON Schemas from
//! observed bodies, deduplicates (path, method, status) patterns, and emits
//! a `$ref`-linked file hierarchy a bundler can flatten into one spec.

pub mod error;
pub mod naming;
pub mod path;
pub mod pipeline;
pub mod schema;
pub mod writers;

pub use error::{GenerateError, GenerateResult};
pub use naming::SchemaKind;
pub use pipeline::{Pipeline, RunReport};
pub use schema::{ScalarKind, SchemaNode};
