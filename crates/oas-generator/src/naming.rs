//! Identifier synthesis
//!
//! Derives operation ids and component schema names from
//! (method, path template, schema kind). The naming rule, stated once:
//! strip a leading `/v<digits>` segment, drop parameter and digit segments,
//! then camel-case the remaining static segments, singularizing a segment
//! exactly when its singular form occurs in one of the template's parameter
//! names. `operation_id` prefixes the lowercase method; component names
//! prefix the capitalized method and append the kind suffix.
//!
//! Two distinct (method, template, kind) triples collide only if their
//! templates camel-case to the same string; the schema index treats that as
//! a defect and fails the run.

use oasdump_core::HttpMethod;

use crate::path::{is_numeric, is_placeholder, singularize};

/// Which schema of an operation a component name refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    RequestParams,
    RequestBody,
    ResponseBody,
}

impl SchemaKind {
    pub fn suffix(&self) -> &'static str {
        match self {
            SchemaKind::RequestParams => "RequestParams",
            SchemaKind::RequestBody => "RequestBody",
            SchemaKind::ResponseBody => "Response",
        }
    }
}

/// Operation id for a (method, template) pair.
///
/// `GET /v1/posts/{post_id}/comments` -> `getPostComments`
/// `POST /v1/posts` -> `postPosts`
pub fn operation_id(method: HttpMethod, template: &str) -> String {
    format!("{}{}", method.as_lower(), camel_segments(template))
}

/// Component schema name for a (method, template, kind) triple.
///
/// `GET /v1/posts/{post_id}/photos` + ResponseBody -> `GetPostPhotosResponse`
pub fn schema_component_name(method: HttpMethod, template: &str, kind: SchemaKind) -> String {
    format!(
        "{}{}{}",
        capitalize(method.as_lower()),
        camel_segments(template),
        kind.suffix()
    )
}

/// Parameter names appearing in a template, brace-stripped
pub fn param_names(template: &str) -> Vec<&str> {
    template
        .split('/')
        .filter(|s| is_placeholder(s))
        .map(|s| &s[1..s.len() - 1])
        .collect()
}

fn camel_segments(template: &str) -> String {
    let params = param_names(template);
    let mut out = String::new();
    let mut segments = template.split('/').filter(|s| !s.is_empty()).peekable();
    // Leading version segment (v1, v2, ...) never contributes to the name
    if segments.peek().is_some_and(|s| is_version(s)) {
        segments.next();
    }
    for segment in segments {
        if is_placeholder(segment) || is_numeric(segment) {
            continue;
        }
        let singular = singularize(segment);
        let base = if params.iter().any(|p| p.contains(singular)) {
            singular
        } else {
            segment
        };
        out.push_str(&capitalize(base));
    }
    out
}

fn is_version(segment: &str) -> bool {
    segment.len() > 1
        && segment.starts_with('v')
        && segment[1..].bytes().all(|b| b.is_ascii_digit())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_id_singularizes_parameterized_segments() {
        assert_eq!(
            operation_id(HttpMethod::Get, "/v1/posts/{post_id}/comments"),
            "getPostComments"
        );
    }

    #[test]
    fn test_operation_id_collection() {
        assert_eq!(operation_id(HttpMethod::Post, "/v1/posts"), "postPosts");
    }

    #[test]
    fn test_operation_id_without_version_prefix() {
        assert_eq!(operation_id(HttpMethod::Get, "/posts/{post_id}"), "getPost");
    }

    #[test]
    fn test_operation_id_nested_params() {
        assert_eq!(
            operation_id(HttpMethod::Delete, "/v2/posts/{post_id}/comments/{comment_id}"),
            "deletePostComment"
        );
    }

    #[test]
    fn test_schema_component_names() {
        assert_eq!(
            schema_component_name(
                HttpMethod::Get,
                "/v1/posts/{post_id}/comments",
                SchemaKind::RequestParams
            ),
            "GetPostCommentsRequestParams"
        );
        assert_eq!(
            schema_component_name(HttpMethod::Post, "/v1/posts", SchemaKind::RequestBody),
            "PostPostsRequestBody"
        );
        assert_eq!(
            schema_component_name(
                HttpMethod::Get,
                "/v1/posts/{post_id}/photos",
                SchemaKind::ResponseBody
            ),
            "GetPostPhotosResponse"
        );
    }

    #[test]
    fn test_distinct_kinds_never_collide() {
        let names: Vec<String> = [
            SchemaKind::RequestParams,
            SchemaKind::RequestBody,
            SchemaKind::ResponseBody,
        ]
        .iter()
        .map(|kind| schema_component_name(HttpMethod::Get, "/v1/posts", *kind))
        .collect();
        assert_eq!(names.len(), 3);
        assert!(names.iter().all(|n| names.iter().filter(|m| *m == n).count() == 1));
    }

    #[test]
    fn test_param_names() {
        assert_eq!(
            param_names("/v1/posts/{post_id}/comments/{comment_id}"),
            vec!["post_id", "comment_id"]
        );
        assert!(param_names("/v1/posts").is_empty());
    }
}
