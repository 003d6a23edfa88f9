//! The store boundary the pipeline reads exchanges from
//!
//! Any backend able to answer "which distinct raw paths were captured" and
//! "what was captured for this raw path" can feed the generator. The capture
//! agent that fills the store is a separate process with its own queueing
//! discipline; this crate only reads.

use async_trait::async_trait;
use indexmap::IndexSet;
use std::io::BufRead;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::Result;
use crate::exchange::{CapturedRecord, Exchange};

/// Trait for queryable capture stores
#[async_trait]
pub trait ExchangeStore: Send + Sync {
    /// List the distinct raw request paths present in the store
    async fn list_distinct_paths(&self) -> Result<Vec<String>>;

    /// List all recorded exchanges for a raw request path
    async fn list_exchanges(&self, raw_path: &str) -> Result<Vec<Exchange>>;
}

/// In-memory store, insertion ordered
#[derive(Debug, Default)]
pub struct MemoryStore {
    exchanges: Vec<Exchange>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, exchange: Exchange) {
        self.exchanges.push(exchange);
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }
}

impl FromIterator<Exchange> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = Exchange>>(iter: I) -> Self {
        Self {
            exchanges: iter.into_iter().collect(),
        }
    }
}

#[async_trait]
impl ExchangeStore for MemoryStore {
    async fn list_distinct_paths(&self) -> Result<Vec<String>> {
        let paths: IndexSet<&str> = self.exchanges.iter().map(|e| e.raw_path.as_str()).collect();
        Ok(paths.into_iter().map(str::to_string).collect())
    }

    async fn list_exchanges(&self, raw_path: &str) -> Result<Vec<Exchange>> {
        Ok(self
            .exchanges
            .iter()
            .filter(|e| e.raw_path == raw_path)
            .cloned()
            .collect())
    }
}

/// File-backed store: one JSON capture record per line
///
/// The whole file is loaded at open; malformed lines are skipped with a
/// warning, I/O failures are fatal.
#[derive(Debug)]
pub struct JsonlStore {
    inner: MemoryStore,
}

impl JsonlStore {
    pub fn open(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let mut inner = MemoryStore::new();
        let mut skipped = 0usize;

        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: CapturedRecord = match serde_json::from_str(&line) {
                Ok(record) => record,
                Err(e) => {
                    warn!("skipping malformed record at {}:{}: {}", path.display(), lineno + 1, e);
                    skipped += 1;
                    continue;
                }
            };
            match record.into_exchange() {
                Ok(exchange) => inner.insert(exchange),
                Err(e) => {
                    warn!("skipping record at {}:{}: {}", path.display(), lineno + 1, e);
                    skipped += 1;
                }
            }
        }

        debug!(
            "loaded {} exchanges from {} ({} skipped)",
            inner.len(),
            path.display(),
            skipped
        );
        Ok(Self { inner })
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[async_trait]
impl ExchangeStore for JsonlStore {
    async fn list_distinct_paths(&self) -> Result<Vec<String>> {
        self.inner.list_distinct_paths().await
    }

    async fn list_exchanges(&self, raw_path: &str) -> Result<Vec<Exchange>> {
        self.inner.list_exchanges(raw_path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::HttpMethod;
    use std::io::Write;

    fn exchange(path: &str, method: HttpMethod, status: u16) -> Exchange {
        Exchange {
            raw_path: path.to_string(),
            method,
            query: Default::default(),
            request_body: None,
            status_code: status,
            response_body: None,
        }
    }

    #[tokio::test]
    async fn test_memory_store_distinct_paths_keep_order() {
        let store: MemoryStore = [
            exchange("/v1/posts", HttpMethod::Get, 200),
            exchange("/v1/users", HttpMethod::Get, 200),
            exchange("/v1/posts", HttpMethod::Post, 200),
        ]
        .into_iter()
        .collect();

        let paths = store.list_distinct_paths().await.unwrap();
        assert_eq!(paths, vec!["/v1/posts", "/v1/users"]);

        let posts = store.list_exchanges("/v1/posts").await.unwrap();
        assert_eq!(posts.len(), 2);
    }

    #[tokio::test]
    async fn test_jsonl_store_skips_malformed_lines() {
        let dir = tempfile::TempDir::new().unwrap();
        let file_path = dir.path().join("captures.jsonl");
        let mut file = std::fs::File::create(&file_path).unwrap();
        writeln!(
            file,
            r#"{{"request": {{"path": "/v1/posts", "method": "GET", "query": "{{}}", "content": ""}}, "response": {{"status_code": 200, "content": "[]"}}}}"#
        )
        .unwrap();
        writeln!(file, "not json at all").unwrap();
        writeln!(
            file,
            r#"{{"request": {{"path": "/v1/posts", "method": "BREW", "query": "", "content": ""}}, "response": {{"status_code": 200, "content": ""}}}}"#
        )
        .unwrap();
        drop(file);

        let store = JsonlStore::open(&file_path).unwrap();
        assert_eq!(store.len(), 1);
        let paths = store.list_distinct_paths().await.unwrap();
        assert_eq!(paths, vec!["/v1/posts"]);
    }

    #[test]
    fn test_jsonl_store_missing_file_is_fatal() {
        let result = JsonlStore::open(Path::new("/nonexistent/captures.jsonl"));
        assert!(result.is_err());
    }
}
