//! Endpoint method pattern writer
//!
//! Aggregates the sibling method directories of one endpoint:
//!
//! ```yaml
//! get:
//!   $ref: get/_index.yml
//! post:
//!   $ref: post/_index.yml
//! ```

use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};

use oasdump_core::HttpMethod;

use crate::error::GenerateResult;
use crate::path::endpoint_dir;
use crate::writers::{ref_map, write_yaml};

pub struct EndpointMethodPatternWriter<'a> {
    dest_root: &'a Path,
    template: &'a str,
}

impl<'a> EndpointMethodPatternWriter<'a> {
    pub fn new(dest_root: &'a Path, template: &'a str) -> Self {
        Self { dest_root, template }
    }

    pub fn dest(&self) -> PathBuf {
        self.dest_root
            .join(endpoint_dir(self.template))
            .join("_index.yml")
    }

    pub fn write(&self) -> GenerateResult<PathBuf> {
        let dest = self.dest();
        write_yaml(&dest, &self.build(&dest))?;
        Ok(dest)
    }

    fn build(&self, dest: &Path) -> Value {
        let endpoint = dest.parent().expect("dest always has a parent");
        let mut node = Mapping::new();
        // Fixed method order keeps output stable across filesystems
        for method in HttpMethod::ALL {
            let lower = method.as_lower();
            if endpoint.join(lower).join("_index.yml").is_file() {
                node.insert(Value::from(lower), ref_map(format!("{lower}/_index.yml")));
            }
        }
        Value::Mapping(node)
    }
}
