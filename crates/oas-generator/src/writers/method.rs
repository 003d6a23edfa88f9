//! Endpoint method writer
//!
//! ```yaml
//! summary: ''
//! operationId: getPostComments
//! responses:
//!   $ref: responses/_index.yml
//! parameters:
//!   - in: path
//!     name: post_id
//!     required: true
//!     schema:
//!       type: integer
//! ```

use indexmap::IndexMap;
use serde_yaml::{Mapping, Sequence, Value};
use std::path::{Path, PathBuf};
use tracing::warn;

use oasdump_core::HttpMethod;

use crate::error::GenerateResult;
use crate::naming::operation_id;
use crate::path::{endpoint_dir, is_numeric, is_placeholder};
use crate::schema::{ScalarKind, SchemaNode};
use crate::writers::{ref_map, write_yaml};

pub struct EndpointMethodWriter<'a> {
    dest_root: &'a Path,
    template: &'a str,
    method: HttpMethod,
    /// Raw path of the first observed exchange, used to type path parameters
    raw_path: &'a str,
    query: &'a IndexMap<String, String>,
    /// Inlined request body schema
    request_schema: Option<&'a SchemaNode>,
    /// Relative `$ref` into `components/schemas`, when externalized
    request_body_ref: Option<String>,
}

impl<'a> EndpointMethodWriter<'a> {
    pub fn new(
        dest_root: &'a Path,
        template: &'a str,
        method: HttpMethod,
        raw_path: &'a str,
        query: &'a IndexMap<String, String>,
        request_schema: Option<&'a SchemaNode>,
        request_body_ref: Option<String>,
    ) -> Self {
        Self {
            dest_root,
            template,
            method,
            raw_path,
            query,
            request_schema,
            request_body_ref,
        }
    }

    pub fn dest(&self) -> PathBuf {
        self.dest_root
            .join(endpoint_dir(self.template))
            .join(self.method.as_lower())
            .join("_index.yml")
    }

    pub fn write(&self) -> GenerateResult<PathBuf> {
        let dest = self.dest();
        write_yaml(&dest, &self.build()?)?;
        Ok(dest)
    }

    fn build(&self) -> GenerateResult<Value> {
        let mut node = Mapping::new();
        node.insert(Value::from("summary"), Value::from(""));
        node.insert(
            Value::from("operationId"),
            Value::from(operation_id(self.method, self.template)),
        );
        node.insert(Value::from("responses"), ref_map("responses/_index.yml"));

        let mut parameters = Sequence::new();
        for (name, kind) in self.path_params() {
            parameters.push(parameter(name, "path", true, kind));
        }
        for name in self.query.keys() {
            parameters.push(parameter(name.clone(), "query", false, ScalarKind::String));
        }
        if !parameters.is_empty() {
            node.insert(Value::from("parameters"), Value::Sequence(parameters));
        }

        let schema = match (&self.request_body_ref, self.request_schema) {
            (Some(target), _) => Some(ref_map(target.clone())),
            (None, Some(schema)) => Some(serde_yaml::to_value(schema)?),
            (None, None) => None,
        };
        if let Some(schema) = schema {
            let mut media = Mapping::new();
            media.insert(Value::from("schema"), schema);
            let mut content = Mapping::new();
            content.insert(Value::from("application/json"), Value::Mapping(media));
            let mut body = Mapping::new();
            body.insert(Value::from("content"), Value::Mapping(content));
            node.insert(Value::from("requestBody"), Value::Mapping(body));
        }
        Ok(Value::Mapping(node))
    }

    /// Pair each template placeholder with the raw segment it replaced,
    /// typing the parameter from the observed value
    fn path_params(&self) -> Vec<(String, ScalarKind)> {
        let template_segments: Vec<&str> = self.template.split('/').collect();
        let raw_segments: Vec<&str> = self.raw_path.split('/').collect();
        if template_segments.len() != raw_segments.len() {
            warn!(
                "raw path {:?} does not line up with template {:?}, path parameters untyped",
                self.raw_path, self.template
            );
        }
        template_segments
            .iter()
            .enumerate()
            .filter(|(_, segment)| is_placeholder(segment))
            .map(|(i, segment)| {
                let name = segment[1..segment.len() - 1].to_string();
                let kind = match raw_segments.get(i) {
                    Some(raw) if is_numeric(raw) => ScalarKind::Integer,
                    _ => ScalarKind::String,
                };
                (name, kind)
            })
            .collect()
    }
}

fn parameter(name: impl Into<String>, location: &str, required: bool, kind: ScalarKind) -> Value {
    let mut schema = Mapping::new();
    schema.insert(Value::from("type"), Value::from(kind.as_str()));
    let mut node = Mapping::new();
    node.insert(Value::from("in"), Value::from(location));
    node.insert(Value::from("name"), Value::from(name.into()));
    node.insert(Value::from("required"), Value::from(required));
    node.insert(Value::from("schema"), Value::Mapping(schema));
    Value::Mapping(node)
}
