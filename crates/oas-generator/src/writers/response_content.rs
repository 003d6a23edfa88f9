//! Response content writer
//!
//! Leaf node of the document tree:
//!
//! ```yaml
//! description: Expected response to a valid request
//! content:
//!   application/json:
//!     schema:
//!       type: object
//!       properties:
//!         id:
//!           type: integer
//! ```

use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};

use oasdump_core::HttpMethod;

use crate::error::GenerateResult;
use crate::path::{endpoint_dir, response_description};
use crate::schema::SchemaNode;
use crate::writers::{ref_map, write_yaml};

pub struct ResponseContentWriter<'a> {
    dest_root: &'a Path,
    template: &'a str,
    method: HttpMethod,
    status_code: u16,
    /// Inlined schema, when the body was present and decodable
    schema: Option<&'a SchemaNode>,
    /// Relative `$ref` into `components/schemas`, when externalized
    schema_ref: Option<String>,
}

impl<'a> ResponseContentWriter<'a> {
    pub fn new(
        dest_root: &'a Path,
        template: &'a str,
        method: HttpMethod,
        status_code: u16,
        schema: Option<&'a SchemaNode>,
        schema_ref: Option<String>,
    ) -> Self {
        Self {
            dest_root,
            template,
            method,
            status_code,
            schema,
            schema_ref,
        }
    }

    pub fn dest(&self) -> PathBuf {
        self.dest_root
            .join(endpoint_dir(self.template))
            .join(self.method.as_lower())
            .join("responses")
            .join(self.status_code.to_string())
            .join("_index.yml")
    }

    pub fn write(&self) -> GenerateResult<PathBuf> {
        let dest = self.dest();
        write_yaml(&dest, &self.build()?)?;
        Ok(dest)
    }

    fn build(&self) -> GenerateResult<Value> {
        let mut node = Mapping::new();
        node.insert(
            Value::from("description"),
            Value::from(response_description(self.status_code)),
        );

        let schema = match (&self.schema_ref, self.schema) {
            (Some(target), _) => Some(ref_map(target.clone())),
            (None, Some(schema)) => Some(serde_yaml::to_value(schema)?),
            (None, None) => None,
        };
        if let Some(schema) = schema {
            let mut media = Mapping::new();
            media.insert(Value::from("schema"), schema);
            let mut content = Mapping::new();
            content.insert(Value::from("application/json"), Value::Mapping(media));
            node.insert(Value::from("content"), Value::Mapping(content));
        }
        Ok(Value::Mapping(node))
    }
}
