use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use super::HeaderVec;

/// Canonical reason phrase for the status codes this crate produces.
#[must_use]
pub fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "OK",
    }
}

/// Response written into a [`Context`](super::Context) by a handler, a hook
/// or the terminal writer of the hook pipeline.
///
/// A `Value::String` body is sent verbatim when the content type is not
/// JSON (HTML pages, plain text); everything else is encoded as JSON.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HandlerResponse {
    /// HTTP status code (200, 404, 500, etc.)
    pub status: u16,
    /// HTTP response headers (stack-allocated for ≤16 headers)
    #[serde(skip_serializing)]
    pub headers: HeaderVec,
    /// Response body
    pub body: Value,
}

impl HandlerResponse {
    #[must_use]
    pub fn new(status: u16, headers: HeaderVec, body: Value) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// JSON response with a `content-type: application/json` header.
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), "application/json".to_string()));
        Self {
            status,
            headers,
            body,
        }
    }

    /// HTML page; the markup travels as a string body.
    #[must_use]
    pub fn html(status: u16, markup: String) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((
            Arc::from("content-type"),
            "text/html; charset=utf-8".to_string(),
        ));
        Self {
            status,
            headers,
            body: Value::String(markup),
        }
    }

    /// `{"error": message}` with the given status.
    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, serde_json::json!({ "error": message }))
    }

    #[must_use]
    pub fn reason(&self) -> &'static str {
        status_reason(self.status)
    }

    /// Get a header by name (case-insensitive)
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a header
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }

    /// Encoded body bytes as a transport would write them.
    ///
    /// # Errors
    ///
    /// Returns the serializer error for bodies that cannot be encoded.
    pub fn body_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        match &self.body {
            Value::String(s) if !self.is_json() => Ok(s.clone().into_bytes()),
            other => serde_json::to_vec(other),
        }
    }

    /// Whether the content type is JSON, or unset.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.get_header("content-type").map_or(true, |ct| {
            let mime = ct.split(';').next().unwrap_or_default().trim();
            mime.eq_ignore_ascii_case("application/json") || mime.ends_with("+json")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_reason() {
        assert_eq!(status_reason(200), "OK");
        assert_eq!(status_reason(404), "Not Found");
        assert_eq!(status_reason(500), "Internal Server Error");
    }

    #[test]
    fn test_set_header_replaces_case_insensitively() {
        let mut resp = HandlerResponse::json(200, json!({}));
        resp.set_header("Content-Type", "text/plain".to_string());
        assert_eq!(resp.headers.len(), 1);
        assert_eq!(resp.get_header("content-type"), Some("text/plain"));
    }

    #[test]
    fn test_string_body_is_sent_verbatim() {
        let resp = HandlerResponse::html(200, "<p>hi</p>".to_string());
        assert_eq!(resp.body_bytes().unwrap_or_default(), b"<p>hi</p>".to_vec());
        let resp = HandlerResponse::json(200, json!({"a": 1}));
        assert_eq!(resp.body_bytes().unwrap_or_default(), br#"{"a":1}"#.to_vec());
    }

    #[test]
    fn test_json_string_body_is_quoted() {
        let resp = HandlerResponse::json(200, json!("hello"));
        assert!(resp.is_json());
        let bytes = resp.body_bytes().unwrap();
        assert_eq!(bytes, br#""hello""#.to_vec());
        assert_eq!(serde_json::from_slice::<Value>(&bytes).unwrap(), json!("hello"));

        let mut text = HandlerResponse::json(200, json!("hello"));
        text.set_header("Content-Type", "text/plain; charset=utf-8".to_string());
        assert!(!text.is_json());
        assert_eq!(text.body_bytes().unwrap(), b"hello".to_vec());
    }
}
