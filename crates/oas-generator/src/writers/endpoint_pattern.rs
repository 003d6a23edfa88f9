//! Endpoint pattern writer
//!
//! Aggregates the endpoint directories under `paths/` into the path map,
//! recovering each path template from its directory token:
//!
//! ```yaml
//! /v1/posts/{post_id}/comments:
//!   $ref: v1_posts_{post_id}_comments/_index.yml
//! ```

use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::GenerateResult;
use crate::path::{from_dir_token, PATHS_DELIMITER};
use crate::writers::{ref_map, write_yaml};

pub struct EndpointPatternWriter<'a> {
    dest_root: &'a Path,
}

impl<'a> EndpointPatternWriter<'a> {
    pub fn new(dest_root: &'a Path) -> Self {
        Self { dest_root }
    }

    pub fn dest(&self) -> PathBuf {
        self.dest_root.join("paths").join("_index.yml")
    }

    pub fn write(&self) -> GenerateResult<PathBuf> {
        let dest = self.dest();
        write_yaml(&dest, &self.build()?)?;
        Ok(dest)
    }

    fn build(&self) -> GenerateResult<Value> {
        let paths_dir = self.dest_root.join("paths");
        let mut tokens: Vec<String> = Vec::new();
        if paths_dir.is_dir() {
            for entry in std::fs::read_dir(&paths_dir)? {
                let entry = entry?;
                if !entry.file_type()?.is_dir() {
                    continue;
                }
                match entry.file_name().into_string() {
                    Ok(token) => tokens.push(token),
                    Err(name) => warn!("skipping non-UTF-8 endpoint directory {:?}", name),
                }
            }
        }
        tokens.sort_unstable();

        let mut node = Mapping::new();
        for token in tokens {
            let template = match from_dir_token(&token, PATHS_DELIMITER) {
                Ok(template) => template,
                Err(e) => {
                    warn!("skipping endpoint directory {:?}: {}", token, e);
                    continue;
                }
            };
            node.insert(Value::from(template), ref_map(format!("{token}/_index.yml")));
        }
        Ok(Value::Mapping(node))
    }
}
