//! Component schema writer (externalized-schema mode)
//!
//! Persists one inferred schema under `components/schemas/`, at a location
//! the schema index can classify back into a component name:
//!
//! - `components/schemas/<dir>/<method>/request_params.yml`
//! - `components/schemas/<dir>/<method>/request_body.yml`
//! - `components/schemas/<dir>/<method>/responses/<status>/_index.yml`

use std::path::{Path, PathBuf};

use oasdump_core::HttpMethod;

use crate::error::GenerateResult;
use crate::naming::SchemaKind;
use crate::path::{schema_dir, to_dir_token, SCHEMA_DELIMITER};
use crate::schema::SchemaNode;
use crate::writers::write_yaml;

pub struct ComponentSchemaWriter<'a> {
    dest_root: &'a Path,
    template: &'a str,
    method: HttpMethod,
    kind: SchemaKind,
    /// Set for response body schemas only
    status_code: Option<u16>,
    schema: &'a SchemaNode,
}

impl<'a> ComponentSchemaWriter<'a> {
    pub fn request_params(
        dest_root: &'a Path,
        template: &'a str,
        method: HttpMethod,
        schema: &'a SchemaNode,
    ) -> Self {
        Self {
            dest_root,
            template,
            method,
            kind: SchemaKind::RequestParams,
            status_code: None,
            schema,
        }
    }

    pub fn request_body(
        dest_root: &'a Path,
        template: &'a str,
        method: HttpMethod,
        schema: &'a SchemaNode,
    ) -> Self {
        Self {
            dest_root,
            template,
            method,
            kind: SchemaKind::RequestBody,
            status_code: None,
            schema,
        }
    }

    pub fn response_body(
        dest_root: &'a Path,
        template: &'a str,
        method: HttpMethod,
        status_code: u16,
        schema: &'a SchemaNode,
    ) -> Self {
        Self {
            dest_root,
            template,
            method,
            kind: SchemaKind::ResponseBody,
            status_code: Some(status_code),
            schema,
        }
    }

    /// Destination relative to the output root, with `/` separators, usable
    /// as the tail of a `$ref` from elsewhere in the tree
    pub fn root_relative_ref(&self) -> String {
        let token = to_dir_token(self.template, SCHEMA_DELIMITER);
        let method = self.method.as_lower();
        match (self.kind, self.status_code) {
            (SchemaKind::RequestParams, _) => {
                format!("components/schemas/{token}/{method}/request_params.yml")
            }
            (SchemaKind::RequestBody, _) => {
                format!("components/schemas/{token}/{method}/request_body.yml")
            }
            (SchemaKind::ResponseBody, Some(status)) => {
                format!("components/schemas/{token}/{method}/responses/{status}/_index.yml")
            }
            (SchemaKind::ResponseBody, None) => {
                unreachable!("response body writers always carry a status code")
            }
        }
    }

    pub fn dest(&self) -> PathBuf {
        let dir = self.dest_root.join(schema_dir(self.template)).join(self.method.as_lower());
        match (self.kind, self.status_code) {
            (SchemaKind::RequestParams, _) => dir.join("request_params.yml"),
            (SchemaKind::RequestBody, _) => dir.join("request_body.yml"),
            (SchemaKind::ResponseBody, Some(status)) => {
                dir.join("responses").join(status.to_string()).join("_index.yml")
            }
            (SchemaKind::ResponseBody, None) => {
                unreachable!("response body writers always carry a status code")
            }
        }
    }

    pub fn write(&self) -> GenerateResult<PathBuf> {
        let dest = self.dest();
        write_yaml(&dest, self.schema)?;
        Ok(dest)
    }
}
