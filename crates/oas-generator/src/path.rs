//! Path normalization
//!
//! Raw observed paths are parameterized into templates
//! (`/v1/posts/100/comments/2` -> `/v1/posts/{post_id}/comments/{comment_id}`)
//! and templates are encoded into filesystem-safe directory tokens. The
//! `paths/` tree uses `_` as the segment delimiter, the `components/schemas/`
//! tree uses `-`; the inverse transform treats `{...}` spans as atomic so a
//! placeholder's own underscores never split a token.

use std::path::PathBuf;
use tracing::warn;

use crate::error::{GenerateError, GenerateResult};

/// Delimiter for the `paths/` document tree
pub const PATHS_DELIMITER: char = '_';
/// Delimiter for the `components/schemas/` document tree
pub const SCHEMA_DELIMITER: char = '-';

/// Strip a trailing plural `s` (`posts` -> `post`). Irregular plurals are
/// left to the same rule; flagged as a known heuristic, not fixed.
pub fn singularize(segment: &str) -> &str {
    segment.strip_suffix('s').unwrap_or(segment)
}

pub(crate) fn is_numeric(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

pub(crate) fn is_placeholder(segment: &str) -> bool {
    segment.starts_with('{') && segment.ends_with('}')
}

/// Replace each decimal-integer segment with `{<singular(prev)>_id}`.
///
/// Idempotent: placeholder segments are not digit-only, so an already
/// parameterized path is returned unchanged. A numeric segment with no
/// usable previous segment is left as-is with a warning.
pub fn parameterize(raw_path: &str) -> String {
    let segments: Vec<&str> = raw_path.split('/').collect();
    let mut out: Vec<String> = Vec::with_capacity(segments.len());
    for (i, segment) in segments.iter().enumerate() {
        if !is_numeric(segment) {
            out.push((*segment).to_string());
            continue;
        }
        let prev = if i > 0 { segments[i - 1] } else { "" };
        if prev.is_empty() || is_numeric(prev) || is_placeholder(prev) {
            warn!(
                "no parameter name derivable for numeric segment {:?} in {:?}, left as-is",
                segment, raw_path
            );
            out.push((*segment).to_string());
        } else {
            out.push(format!("{{{}_id}}", singularize(prev)));
        }
    }
    out.join("/")
}

/// Encode a path template as a directory token: leading slash dropped,
/// remaining slashes replaced by `delim`.
pub fn to_dir_token(template: &str, delim: char) -> String {
    let trimmed = template.strip_prefix('/').unwrap_or(template);
    trimmed.replace('/', &delim.to_string())
}

/// Decode a directory token back into a path template.
///
/// Delimiters inside `{...}` spans belong to the parameter name and are
/// preserved; everything else becomes a path separator.
pub fn from_dir_token(token: &str, delim: char) -> GenerateResult<String> {
    let mut template = String::with_capacity(token.len() + 1);
    template.push('/');
    let mut in_placeholder = false;
    for c in token.chars() {
        match c {
            '{' => {
                if in_placeholder {
                    return Err(GenerateError::InvalidDirToken(token.to_string()));
                }
                in_placeholder = true;
                template.push(c);
            }
            '}' => {
                if !in_placeholder {
                    return Err(GenerateError::InvalidDirToken(token.to_string()));
                }
                in_placeholder = false;
                template.push(c);
            }
            c if c == delim && !in_placeholder => template.push('/'),
            c => template.push(c),
        }
    }
    if in_placeholder {
        return Err(GenerateError::InvalidDirToken(token.to_string()));
    }
    Ok(template)
}

/// Relative directory of an endpoint under the output root
pub fn endpoint_dir(template: &str) -> PathBuf {
    PathBuf::from("paths").join(to_dir_token(template, PATHS_DELIMITER))
}

/// Relative directory of an endpoint's component schemas under the output root
pub fn schema_dir(template: &str) -> PathBuf {
    PathBuf::from("components")
        .join("schemas")
        .join(to_dir_token(template, SCHEMA_DELIMITER))
}

/// Response description derived from the status code alone
pub fn response_description(status_code: u16) -> &'static str {
    if (200..300).contains(&status_code) {
        "Expected response to a valid request"
    } else {
        "Error response"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameterize() {
        assert_eq!(
            parameterize("/v1/posts/100/comments/2"),
            "/v1/posts/{post_id}/comments/{comment_id}"
        );
        assert_eq!(parameterize("/v1/posts"), "/v1/posts");
    }

    #[test]
    fn test_parameterize_is_idempotent() {
        let once = parameterize("/v1/posts/100/comments/2");
        assert_eq!(parameterize(&once), once);
    }

    #[test]
    fn test_parameterize_leading_numeric_segment_left_alone() {
        assert_eq!(parameterize("/123/posts"), "/123/posts");
    }

    #[test]
    fn test_parameterize_consecutive_numeric_segments() {
        // Second numeric segment has no usable previous segment
        assert_eq!(parameterize("/v1/posts/1/2"), "/v1/posts/{post_id}/2");
    }

    #[test]
    fn test_to_dir_token() {
        assert_eq!(to_dir_token("/v1/posts", PATHS_DELIMITER), "v1_posts");
        assert_eq!(to_dir_token("/v1/posts", SCHEMA_DELIMITER), "v1-posts");
        assert_eq!(
            to_dir_token("/v1/posts/{post_id}/comments", PATHS_DELIMITER),
            "v1_posts_{post_id}_comments"
        );
    }

    #[test]
    fn test_from_dir_token() {
        assert_eq!(from_dir_token("v1-posts", SCHEMA_DELIMITER).unwrap(), "/v1/posts");
        assert_eq!(
            from_dir_token("v1-posts-{post_id}-comments-{comment_id}", SCHEMA_DELIMITER).unwrap(),
            "/v1/posts/{post_id}/comments/{comment_id}"
        );
        // Placeholder underscores survive the `_` delimiter
        assert_eq!(
            from_dir_token("v1_posts_{post_id}_comments", PATHS_DELIMITER).unwrap(),
            "/v1/posts/{post_id}/comments"
        );
    }

    #[test]
    fn test_dir_token_round_trip() {
        for template in [
            "/v1/posts",
            "/v1/posts/{post_id}",
            "/v1/posts/{post_id}/comments/{comment_id}",
            "/v1/home/layout",
        ] {
            for delim in [PATHS_DELIMITER, SCHEMA_DELIMITER] {
                let token = to_dir_token(template, delim);
                assert_eq!(from_dir_token(&token, delim).unwrap(), template);
            }
        }
    }

    #[test]
    fn test_from_dir_token_rejects_unbalanced_braces() {
        assert!(from_dir_token("v1_posts_{post_id", PATHS_DELIMITER).is_err());
        assert!(from_dir_token("v1_posts_post_id}", PATHS_DELIMITER).is_err());
    }

    #[test]
    fn test_response_description() {
        assert_eq!(response_description(200), "Expected response to a valid request");
        assert_eq!(response_description(204), "Expected response to a valid request");
        assert_eq!(response_description(404), "Error response");
        assert_eq!(response_description(500), "Error response");
    }
}
