//! Document writers
//!
//! One writer per node kind of the output document tree. Every writer
//! computes its own destination from its inputs, creates parent directories
//! itself, and produces the same bytes for the same inputs. Aggregating
//! writers (response pattern, method pattern, endpoint pattern, schema
//! index) scan the filesystem they were written into, so they must run
//! after the leaves they aggregate.

mod component_schema;
mod endpoint_pattern;
mod index;
mod method;
mod method_pattern;
mod response_content;
mod response_pattern;
mod schema_index;

pub use component_schema::ComponentSchemaWriter;
pub use endpoint_pattern::EndpointPatternWriter;
pub use index::SpecIndexWriter;
pub use method::EndpointMethodWriter;
pub use method_pattern::EndpointMethodPatternWriter;
pub use response_content::ResponseContentWriter;
pub use response_pattern::ResponsePatternWriter;
pub use schema_index::SchemaIndexWriter;

use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::path::Path;

use crate::error::GenerateResult;

/// OpenAPI version stamped into the spec index
pub const OPENAPI_VERSION: &str = "3.0.0";

/// Serialize a node to YAML at `dest`, creating parent directories
pub(crate) fn write_yaml<T: Serialize>(dest: &Path, node: &T) -> GenerateResult<()> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let yaml = serde_yaml::to_string(node)?;
    std::fs::write(dest, yaml)?;
    Ok(())
}

/// `{$ref: target}` node
pub(crate) fn ref_map(target: impl Into<String>) -> Value {
    let mut mapping = Mapping::new();
    mapping.insert(Value::from("$ref"), Value::from(target.into()));
    Value::Mapping(mapping)
}

/// `../` repeated `levels` times, for refs that climb back to the output root
pub(crate) fn up(levels: usize) -> String {
    "../".repeat(levels)
}
