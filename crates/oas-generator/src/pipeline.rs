//! Pipeline driver
//!
//! Walks the capture store and emits the document tree in dependency order:
//! response content leaves first, then per-method and per-endpoint
//! aggregates, then the roll-up indexes. A run-scoped pattern set guarantees
//! each (template, method, status) triple is rendered at most once per run.
//! Store and filesystem failures abort; everything else degrades to a
//! warning and the run still reaches its terminal state.

use indexmap::{IndexMap, IndexSet};
use std::collections::HashSet;
use tracing::{debug, info, warn};

use oasdump_core::{DumpSettings, ExchangeStore, HttpMethod};

use crate::error::GenerateResult;
use crate::path::parameterize;
use crate::schema::{self, ScalarKind, SchemaNode};
use crate::writers::{
    up, ComponentSchemaWriter, EndpointMethodPatternWriter, EndpointMethodWriter,
    EndpointPatternWriter, ResponseContentWriter, ResponsePatternWriter, SchemaIndexWriter,
    SpecIndexWriter,
};

/// Dedup key: one output per (template, method, status) per run
type Pattern = (String, HttpMethod, u16);

/// Facts recorded from the first exchange observed for a (template, method)
struct MethodFacts {
    raw_path: String,
    query: IndexMap<String, String>,
    request_schema: Option<SchemaNode>,
}

/// Counters for one completed run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Exchanges read from the store
    pub exchanges_seen: usize,
    /// Exchanges sharing an already-rendered pattern
    pub patterns_deduped: usize,
    /// Response content leaves written
    pub patterns_written: usize,
    /// Endpoints aggregated
    pub endpoints_written: usize,
}

/// Single-threaded generation pipeline over a capture store
pub struct Pipeline<'a, S> {
    store: &'a S,
    settings: &'a DumpSettings,
}

// Directory depth below the output root, for refs that climb back up
const RESPONSE_DIR_DEPTH: usize = 5; // paths/<dir>/<method>/responses/<status>/
const METHOD_DIR_DEPTH: usize = 3; // paths/<dir>/<method>/

impl<'a, S: ExchangeStore> Pipeline<'a, S> {
    pub fn new(store: &'a S, settings: &'a DumpSettings) -> Self {
        Self { store, settings }
    }

    pub async fn run(&self) -> GenerateResult<RunReport> {
        let out_root = self.settings.out_root.as_path();
        let mut report = RunReport::default();
        let mut seen: HashSet<Pattern> = HashSet::new();
        let mut methods: IndexMap<(String, HttpMethod), MethodFacts> = IndexMap::new();

        let raw_paths = self.store.list_distinct_paths().await?;
        info!("generating spec for {} distinct raw paths", raw_paths.len());

        for raw_path in &raw_paths {
            let template = parameterize(raw_path);
            debug!("processing {} as {}", raw_path, template);

            for exchange in self.store.list_exchanges(raw_path).await? {
                report.exchanges_seen += 1;
                let pattern = (template.clone(), exchange.method, exchange.status_code);
                if !seen.insert(pattern) {
                    report.patterns_deduped += 1;
                    debug!(
                        "pattern ({}, {}, {}) already rendered, skipping",
                        template, exchange.method, exchange.status_code
                    );
                    continue;
                }

                let response_schema = exchange.response_body.as_ref().and_then(schema::infer);
                let mut schema_ref = None;
                if self.settings.externalize_schemas {
                    if let Some(response_schema) = &response_schema {
                        let writer = ComponentSchemaWriter::response_body(
                            out_root,
                            &template,
                            exchange.method,
                            exchange.status_code,
                            response_schema,
                        );
                        writer.write()?;
                        schema_ref =
                            Some(format!("{}{}", up(RESPONSE_DIR_DEPTH), writer.root_relative_ref()));
                    }
                }
                ResponseContentWriter::new(
                    out_root,
                    &template,
                    exchange.method,
                    exchange.status_code,
                    if schema_ref.is_some() { None } else { response_schema.as_ref() },
                    schema_ref,
                )
                .write()?;
                report.patterns_written += 1;

                methods
                    .entry((template.clone(), exchange.method))
                    .or_insert_with(|| MethodFacts {
                        raw_path: raw_path.clone(),
                        query: exchange.query.clone(),
                        request_schema: exchange.request_body.as_ref().and_then(schema::infer),
                    });
            }
        }

        // Aggregates only after every leaf for every endpoint is on disk
        for ((template, method), facts) in &methods {
            let mut request_body_ref = None;
            if self.settings.externalize_schemas {
                if !facts.query.is_empty() {
                    let params_schema = query_schema(&facts.query);
                    ComponentSchemaWriter::request_params(out_root, template, *method, &params_schema)
                        .write()?;
                }
                if let Some(request_schema) = &facts.request_schema {
                    let writer =
                        ComponentSchemaWriter::request_body(out_root, template, *method, request_schema);
                    writer.write()?;
                    request_body_ref =
                        Some(format!("{}{}", up(METHOD_DIR_DEPTH), writer.root_relative_ref()));
                }
            }

            ResponsePatternWriter::new(out_root, template, *method).write()?;
            EndpointMethodWriter::new(
                out_root,
                template,
                *method,
                &facts.raw_path,
                &facts.query,
                if request_body_ref.is_some() { None } else { facts.request_schema.as_ref() },
                request_body_ref,
            )
            .write()?;
        }

        let endpoints: IndexSet<&String> = methods.keys().map(|(template, _)| template).collect();
        for template in endpoints {
            EndpointMethodPatternWriter::new(out_root, template).write()?;
            report.endpoints_written += 1;
        }

        EndpointPatternWriter::new(out_root).write()?;
        if self.settings.externalize_schemas {
            SchemaIndexWriter::new(out_root).write()?;
        }
        SpecIndexWriter::new(out_root, self.settings).write()?;

        if report.patterns_deduped > 0 {
            warn!(
                "{} of {} exchanges shared an already-rendered pattern",
                report.patterns_deduped, report.exchanges_seen
            );
        }
        info!(
            "wrote {} response patterns across {} endpoints to {}",
            report.patterns_written,
            report.endpoints_written,
            out_root.display()
        );
        Ok(report)
    }
}

/// Schema for observed query parameters; values arrive as strings
fn query_schema(query: &IndexMap<String, String>) -> SchemaNode {
    SchemaNode::Object {
        properties: query
            .keys()
            .map(|name| (name.clone(), SchemaNode::scalar(ScalarKind::String)))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oasdump_core::{Exchange, MemoryStore};
    use serde_json::json;
    use tempfile::TempDir;

    fn exchange(path: &str, method: HttpMethod, status: u16, body: Option<serde_json::Value>) -> Exchange {
        Exchange {
            raw_path: path.to_string(),
            method,
            query: Default::default(),
            request_body: None,
            status_code: status,
            response_body: body,
        }
    }

    fn settings(dir: &TempDir) -> DumpSettings {
        DumpSettings {
            out_root: dir.path().to_path_buf(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_pattern_rendered_once() {
        let dir = TempDir::new().unwrap();
        let store: MemoryStore = [
            exchange("/v1/posts", HttpMethod::Post, 200, Some(json!({"id": 101}))),
            exchange("/v1/posts", HttpMethod::Post, 200, Some(json!({"id": 102, "extra": true}))),
        ]
        .into_iter()
        .collect();
        let settings = settings(&dir);

        let report = Pipeline::new(&store, &settings).run().await.unwrap();
        assert_eq!(report.exchanges_seen, 2);
        assert_eq!(report.patterns_written, 1);
        assert_eq!(report.patterns_deduped, 1);

        // First body wins
        let leaf = dir.path().join("paths/v1_posts/post/responses/200/_index.yml");
        let value: serde_yaml::Value =
            serde_yaml::from_str(&std::fs::read_to_string(&leaf).unwrap()).unwrap();
        let properties = value["content"]["application/json"]["schema"]["properties"]
            .as_mapping()
            .unwrap();
        assert_eq!(properties.len(), 1);
    }

    #[tokio::test]
    async fn test_raw_paths_sharing_template_collapse() {
        let dir = TempDir::new().unwrap();
        let store: MemoryStore = [
            exchange("/v1/posts/1", HttpMethod::Get, 200, Some(json!({"id": 1}))),
            exchange("/v1/posts/2", HttpMethod::Get, 200, Some(json!({"id": 2}))),
            exchange("/v1/posts/2", HttpMethod::Get, 404, None),
        ]
        .into_iter()
        .collect();
        let settings = settings(&dir);

        let report = Pipeline::new(&store, &settings).run().await.unwrap();
        assert_eq!(report.patterns_written, 2);
        assert_eq!(report.patterns_deduped, 1);
        assert_eq!(report.endpoints_written, 1);

        assert!(dir
            .path()
            .join("paths/v1_posts_{post_id}/get/responses/200/_index.yml")
            .is_file());
        assert!(dir
            .path()
            .join("paths/v1_posts_{post_id}/get/responses/404/_index.yml")
            .is_file());
    }

    #[tokio::test]
    async fn test_empty_store_still_reaches_done() {
        let dir = TempDir::new().unwrap();
        let store = MemoryStore::new();
        let settings = settings(&dir);

        let report = Pipeline::new(&store, &settings).run().await.unwrap();
        assert_eq!(report, RunReport::default());
        assert!(dir.path().join("index.yml").is_file());
        assert!(dir.path().join("paths/_index.yml").is_file());
    }

    #[tokio::test]
    async fn test_externalized_schema_refs_resolve() {
        let dir = TempDir::new().unwrap();
        let store: MemoryStore =
            [exchange("/v1/posts", HttpMethod::Get, 200, Some(json!({"id": 1})))]
                .into_iter()
                .collect();
        let mut settings = settings(&dir);
        settings.externalize_schemas = true;

        Pipeline::new(&store, &settings).run().await.unwrap();

        let leaf = dir.path().join("paths/v1_posts/get/responses/200/_index.yml");
        let value: serde_yaml::Value =
            serde_yaml::from_str(&std::fs::read_to_string(&leaf).unwrap()).unwrap();
        let target = value["content"]["application/json"]["schema"]["$ref"]
            .as_str()
            .unwrap()
            .to_string();

        // The ref must resolve relative to the referencing file's directory
        let resolved = leaf.parent().unwrap().join(&target);
        assert!(resolved.canonicalize().unwrap().is_file());
        assert!(dir.path().join("components/schemas/_index.yml").is_file());
    }
}
