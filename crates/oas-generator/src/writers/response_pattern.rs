//! Response pattern writer
//!
//! Aggregates the status-code leaves already written under a method's
//! `responses/` directory:
//!
//! ```yaml
//! '200':
//!   $ref: 200/_index.yml
//! ```
//!
//! Read-after-write: the directory scan only sees leaves written earlier in
//! the same run, so this writer must run after every response content write
//! it should include.

use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};

use oasdump_core::HttpMethod;

use crate::error::GenerateResult;
use crate::path::endpoint_dir;
use crate::writers::{ref_map, write_yaml};

pub struct ResponsePatternWriter<'a> {
    dest_root: &'a Path,
    template: &'a str,
    method: HttpMethod,
}

impl<'a> ResponsePatternWriter<'a> {
    pub fn new(dest_root: &'a Path, template: &'a str, method: HttpMethod) -> Self {
        Self {
            dest_root,
            template,
            method,
        }
    }

    pub fn dest(&self) -> PathBuf {
        self.dest_root
            .join(endpoint_dir(self.template))
            .join(self.method.as_lower())
            .join("responses")
            .join("_index.yml")
    }

    pub fn write(&self) -> GenerateResult<PathBuf> {
        let dest = self.dest();
        write_yaml(&dest, &self.build(&dest)?)?;
        Ok(dest)
    }

    fn build(&self, dest: &Path) -> GenerateResult<Value> {
        let responses_dir = dest.parent().expect("dest always has a parent");
        let mut statuses: Vec<u16> = Vec::new();
        if responses_dir.is_dir() {
            for entry in std::fs::read_dir(responses_dir)? {
                let entry = entry?;
                if !entry.file_type()?.is_dir() {
                    continue;
                }
                let name = entry.file_name();
                let Some(status) = name.to_str().and_then(|s| s.parse::<u16>().ok()) else {
                    continue;
                };
                if entry.path().join("_index.yml").is_file() {
                    statuses.push(status);
                }
            }
        }
        statuses.sort_unstable();

        let mut node = Mapping::new();
        for status in statuses {
            node.insert(
                Value::from(status.to_string()),
                ref_map(format!("{status}/_index.yml")),
            );
        }
        Ok(Value::Mapping(node))
    }
}
