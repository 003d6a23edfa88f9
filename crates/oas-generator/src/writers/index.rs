//! Spec index writer
//!
//! The document root:
//!
//! ```yaml
//! openapi: 3.0.0
//! info:
//!   version: 0.0.1
//!   title: Captured API
//!   description: OpenAPI spec generated from captured traffic
//! servers:
//!   - url: https://example.com
//! paths:
//!   $ref: paths/_index.yml
//! ```

use serde_yaml::{Mapping, Sequence, Value};
use std::path::{Path, PathBuf};

use oasdump_core::DumpSettings;

use crate::error::GenerateResult;
use crate::writers::{ref_map, write_yaml, OPENAPI_VERSION};

pub struct SpecIndexWriter<'a> {
    dest_root: &'a Path,
    settings: &'a DumpSettings,
}

impl<'a> SpecIndexWriter<'a> {
    pub fn new(dest_root: &'a Path, settings: &'a DumpSettings) -> Self {
        Self { dest_root, settings }
    }

    pub fn dest(&self) -> PathBuf {
        self.dest_root.join("index.yml")
    }

    pub fn write(&self) -> GenerateResult<PathBuf> {
        let dest = self.dest();
        write_yaml(&dest, &self.build())?;
        Ok(dest)
    }

    fn build(&self) -> Value {
        let mut info = Mapping::new();
        info.insert(Value::from("version"), Value::from(self.settings.version.clone()));
        info.insert(Value::from("title"), Value::from(self.settings.title.clone()));
        info.insert(
            Value::from("description"),
            Value::from(self.settings.description.clone()),
        );

        let servers: Sequence = self
            .settings
            .server_urls
            .iter()
            .map(|url| {
                let mut server = Mapping::new();
                server.insert(Value::from("url"), Value::from(url.clone()));
                Value::Mapping(server)
            })
            .collect();

        let mut node = Mapping::new();
        node.insert(Value::from("openapi"), Value::from(OPENAPI_VERSION));
        node.insert(Value::from("info"), Value::Mapping(info));
        node.insert(Value::from("servers"), Value::Sequence(servers));
        node.insert(Value::from("paths"), ref_map("paths/_index.yml"));
        Value::Mapping(node)
    }
}
