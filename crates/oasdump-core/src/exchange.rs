//! Captured exchange types
//!
//! A capture agent persists one record per observed HTTP exchange. This
//! module holds the clean in-memory form (`Exchange`) and the raw persisted
//! form (`CapturedRecord`), which stores bodies and query maps as JSON
//! strings the way the capture store keeps them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::{DumpError, Result};

/// HTTP methods the pipeline understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 4] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Lowercase form used for directory names and operation id prefixes
    pub fn as_lower(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
        }
    }

    /// Parse a method name, case-insensitively
    pub fn parse(s: &str) -> Option<HttpMethod> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "DELETE" => Some(HttpMethod::Delete),
            _ => None,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One observed request/response pair, immutable once read from the store
#[derive(Debug, Clone)]
pub struct Exchange {
    /// Raw request path as observed (e.g. "/v1/posts/1/comments")
    pub raw_path: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Query parameters, multi-valued keys collapsed to first-seen
    pub query: IndexMap<String, String>,
    /// Decoded JSON request body, if any
    pub request_body: Option<Value>,
    /// Response status code
    pub status_code: u16,
    /// Decoded JSON response body; `None` if empty or undecodable
    pub response_body: Option<Value>,
}

// --- Raw persisted record structures ---

/// One persisted capture record
#[derive(Debug, Clone, Deserialize)]
pub struct CapturedRecord {
    pub request: CapturedRequest,
    pub response: CapturedResponse,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CapturedRequest {
    pub path: String,
    pub method: String,
    /// Query parameters as a JSON object string (e.g. `{"id": "1"}`)
    #[serde(default)]
    pub query: String,
    /// Request body as a JSON string, empty when absent
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CapturedResponse {
    pub status_code: u16,
    /// Response body as a JSON string, empty when absent
    #[serde(default)]
    pub content: String,
}

impl CapturedRecord {
    /// Convert a raw record into a clean `Exchange`.
    ///
    /// Undecodable bodies degrade to `None` with a warning; an unusable
    /// method or path rejects the whole record.
    pub fn into_exchange(self) -> Result<Exchange> {
        let method = HttpMethod::parse(&self.request.method).ok_or_else(|| {
            DumpError::InvalidRecord(format!(
                "unsupported method {:?} for path {}",
                self.request.method, self.request.path
            ))
        })?;
        if self.request.path.is_empty() {
            return Err(DumpError::InvalidRecord("empty request path".into()));
        }

        let query = decode_query(&self.request.query, &self.request.path);
        let request_body = decode_body(&self.request.content, &self.request.path, "request");
        let response_body = decode_body(&self.response.content, &self.request.path, "response");

        Ok(Exchange {
            raw_path: self.request.path,
            method,
            query,
            request_body,
            status_code: self.response.status_code,
            response_body,
        })
    }
}

fn decode_body(content: &str, path: &str, which: &str) -> Option<Value> {
    if content.trim().is_empty() {
        return None;
    }
    match serde_json::from_str(content) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("undecodable {} body for path {}: {}", which, path, e);
            None
        }
    }
}

fn decode_query(query: &str, path: &str) -> IndexMap<String, String> {
    let mut map = IndexMap::new();
    if query.trim().is_empty() {
        return map;
    }
    let parsed: Value = match serde_json::from_str(query) {
        Ok(value) => value,
        Err(e) => {
            warn!("undecodable query for path {}: {}", path, e);
            return map;
        }
    };
    let Value::Object(entries) = parsed else {
        warn!("query for path {} is not an object, ignored", path);
        return map;
    };
    for (key, value) in entries {
        // Multi-valued parameters collapse to the first-seen value
        let first = match value {
            Value::Array(items) => items.into_iter().next(),
            other => Some(other),
        };
        let Some(first) = first else { continue };
        let rendered = match first {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => {
                warn!("query value for {:?} on path {} has unexpected shape {}", key, path, other);
                continue;
            }
        };
        map.entry(key).or_insert(rendered);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(method: &str, path: &str, query: &str, content: &str, status: u16, response: &str) -> CapturedRecord {
        CapturedRecord {
            request: CapturedRequest {
                path: path.to_string(),
                method: method.to_string(),
                query: query.to_string(),
                content: content.to_string(),
            },
            response: CapturedResponse {
                status_code: status,
                content: response.to_string(),
            },
        }
    }

    #[test]
    fn test_into_exchange() {
        let exchange = record(
            "GET",
            "/v1/posts/1/comments",
            r#"{"id": "1"}"#,
            "",
            200,
            r#"{"postId": 1}"#,
        )
        .into_exchange()
        .unwrap();

        assert_eq!(exchange.method, HttpMethod::Get);
        assert_eq!(exchange.raw_path, "/v1/posts/1/comments");
        assert_eq!(exchange.query.get("id").map(String::as_str), Some("1"));
        assert!(exchange.request_body.is_none());
        assert_eq!(exchange.status_code, 200);
        assert!(exchange.response_body.is_some());
    }

    #[test]
    fn test_unsupported_method_rejected() {
        let result = record("BREW", "/v1/posts", "{}", "", 200, "{}").into_exchange();
        assert!(matches!(result, Err(DumpError::InvalidRecord(_))));
    }

    #[test]
    fn test_undecodable_body_degrades_to_none() {
        let exchange = record("GET", "/v1/posts", "", "", 200, "<html>not json</html>")
            .into_exchange()
            .unwrap();
        assert!(exchange.response_body.is_none());
    }

    #[test]
    fn test_multivalued_query_collapses_to_first() {
        let exchange = record(
            "GET",
            "/v1/posts",
            r#"{"tag": ["a", "b"], "page": 2}"#,
            "",
            200,
            "",
        )
        .into_exchange()
        .unwrap();
        assert_eq!(exchange.query.get("tag").map(String::as_str), Some("a"));
        assert_eq!(exchange.query.get("page").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_method_parse_case_insensitive() {
        assert_eq!(HttpMethod::parse("delete"), Some(HttpMethod::Delete));
        assert_eq!(HttpMethod::parse("Get"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::parse("PATCH"), None);
    }
}
