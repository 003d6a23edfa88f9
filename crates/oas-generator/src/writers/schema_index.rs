//! Schema index writer (externalized-schema mode)
//!
//! Walks `components/schemas/`, classifies each schema file by its suffix,
//! derives a component name for it, and emits the component map:
//!
//! ```yaml
//! GetPostCommentsRequestParams:
//!   $ref: v1-posts-{post_id}-comments/get/request_params.yml
//! PostPostsRequestBody:
//!   $ref: v1-posts/post/request_body.yml
//! ```
//!
//! Unclassifiable files are logged and skipped. Two files mapping to the
//! same component name is a defect in the naming rule and fails the run.

use indexmap::IndexMap;
use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

use oasdump_core::HttpMethod;

use crate::error::{GenerateError, GenerateResult};
use crate::naming::{schema_component_name, SchemaKind};
use crate::path::{from_dir_token, SCHEMA_DELIMITER};
use crate::writers::{ref_map, write_yaml};

pub struct SchemaIndexWriter<'a> {
    dest_root: &'a Path,
}

impl<'a> SchemaIndexWriter<'a> {
    pub fn new(dest_root: &'a Path) -> Self {
        Self { dest_root }
    }

    pub fn dest(&self) -> PathBuf {
        self.dest_root
            .join("components")
            .join("schemas")
            .join("_index.yml")
    }

    pub fn write(&self) -> GenerateResult<PathBuf> {
        let dest = self.dest();
        write_yaml(&dest, &self.build()?)?;
        Ok(dest)
    }

    fn build(&self) -> GenerateResult<Value> {
        let schemas_root = self.dest_root.join("components").join("schemas");
        let rex_request_params =
            Regex::new(r"^(?P<dir>.+)/(?P<method>get|post|put|delete)/request_params\.ya?ml$")
                .unwrap();
        let rex_request_body =
            Regex::new(r"^(?P<dir>.+)/(?P<method>get|post|put|delete)/request_body\.ya?ml$")
                .unwrap();
        let rex_response_body = Regex::new(
            r"^(?P<dir>.+)/(?P<method>get|post|put|delete)/responses/(?P<status>\d{3})/[^/]+\.ya?ml$",
        )
        .unwrap();

        let mut components: IndexMap<String, String> = IndexMap::new();
        if schemas_root.is_dir() {
            for entry in WalkDir::new(&schemas_root).sort_by_file_name() {
                let entry = entry.map_err(|e| {
                    GenerateError::Io(e.into_io_error().unwrap_or_else(|| {
                        std::io::Error::new(std::io::ErrorKind::Other, "walkdir loop")
                    }))
                })?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let rel: PathBuf = entry
                    .path()
                    .strip_prefix(&schemas_root)
                    .unwrap_or(entry.path())
                    .to_path_buf();
                let Some(rel) = rel.to_str() else {
                    warn!("skipping non-UTF-8 schema path {:?}", rel);
                    continue;
                };
                let rel = rel.replace(std::path::MAIN_SEPARATOR, "/");
                if rel == "_index.yml" || !rel.ends_with(".yml") && !rel.ends_with(".yaml") {
                    continue;
                }

                let classified = rex_request_params
                    .captures(&rel)
                    .map(|c| (c, SchemaKind::RequestParams))
                    .or_else(|| {
                        rex_request_body
                            .captures(&rel)
                            .map(|c| (c, SchemaKind::RequestBody))
                    })
                    .or_else(|| {
                        rex_response_body
                            .captures(&rel)
                            .map(|c| (c, SchemaKind::ResponseBody))
                    });
                let Some((captures, kind)) = classified else {
                    warn!("unexpected schema path {:?}, skipped", rel);
                    continue;
                };

                let token = &captures["dir"];
                let template = match from_dir_token(token, SCHEMA_DELIMITER) {
                    Ok(template) => template,
                    Err(e) => {
                        warn!("skipping schema path {:?}: {}", rel, e);
                        continue;
                    }
                };
                let Some(method) = HttpMethod::parse(&captures["method"]) else {
                    continue;
                };

                let component = schema_component_name(method, &template, kind);
                if let Some(existing) = components.get(&component) {
                    if existing != &rel {
                        return Err(GenerateError::NamingCollision(format!(
                            "{component} maps to both {existing} and {rel}"
                        )));
                    }
                }
                components.insert(component, rel);
            }
        }

        let mut node = Mapping::new();
        for (component, rel) in components {
            node.insert(Value::from(component), ref_map(rel));
        }
        Ok(Value::Mapping(node))
    }
}
