use http::Method;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::{HandlerResponse, HeaderVec, ParamVec};
use crate::binding::SourceKind;
use crate::hooks::HookPipeline;
use crate::ids::RequestId;

/// Live request context handed to every request-handling unit.
///
/// This is the crate's view of the transport: the request parts a transport
/// adapter parsed (method, path, query, headers, JSON body), the path
/// parameters filled in by the router, an ambient key/value store decorators
/// can write to, and a response slot the handler chain writes into.
///
/// `Context` is a cheap handle; clones share the same request. A request
/// type that declares a field of type `Context` receives such a clone.
#[derive(Clone)]
pub struct Context {
    inner: Arc<Inner>,
}

struct Inner {
    request_id: RequestId,
    method: Method,
    path: String,
    query_params: ParamVec,
    headers: HeaderVec,
    body: Option<Value>,
    path_params: RwLock<ParamVec>,
    values: RwLock<HashMap<String, Value>>,
    response: Mutex<Option<HandlerResponse>>,
    pipeline: RwLock<Arc<HookPipeline>>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("request_id", &self.inner.request_id)
            .field("method", &self.inner.method)
            .field("path", &self.inner.path)
            .field("query_params", &self.inner.query_params)
            .field("path_params", &*self.inner.path_params.read())
            .finish_non_exhaustive()
    }
}

impl Context {
    /// Start building a context for `method` and `uri`. A query string in
    /// `uri` is split off and decoded.
    #[must_use]
    pub fn builder(method: Method, uri: &str) -> ContextBuilder {
        ContextBuilder::new(method, uri)
    }

    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.inner.request_id
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.inner.method
    }

    /// Request path without the query string.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.inner.path
    }

    /// First query parameter with this name.
    #[must_use]
    pub fn query(&self, name: &str) -> Option<&str> {
        self.inner
            .query_params
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn query_params(&self) -> &ParamVec {
        &self.inner.query_params
    }

    /// Path parameter captured by the router.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<String> {
        self.inner
            .path_params
            .read()
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.clone())
    }

    #[must_use]
    pub fn path_params(&self) -> ParamVec {
        self.inner.path_params.read().clone()
    }

    pub fn set_path_params(&self, params: ParamVec) {
        *self.inner.path_params.write() = params;
    }

    /// Header by name (case-insensitive)
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner
            .headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderVec {
        &self.inner.headers
    }

    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        self.inner.body.as_ref()
    }

    /// Read a value from the ambient store.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.values.read().get(key).cloned()
    }

    /// Write a value into the ambient store, replacing any previous one.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.inner.values.write().insert(key.into(), value.into());
    }

    /// Raw string at a wire location, as the binder sees it.
    ///
    /// Ambient values that are not JSON strings are rendered as JSON text.
    /// The body is never a string location and always yields `None`.
    #[must_use]
    pub fn lookup(&self, source: SourceKind, name: &str) -> Option<String> {
        match source {
            SourceKind::Query => self.query(name).map(str::to_owned),
            SourceKind::Path => self.param(name),
            SourceKind::Header => self.header(name).map(str::to_owned),
            SourceKind::Ambient => self.get(name).map(|value| match value {
                Value::String(s) => s,
                other => other.to_string(),
            }),
            SourceKind::Body => None,
        }
    }

    /// Write the response, replacing whatever was written before.
    pub fn respond(&self, response: HandlerResponse) {
        *self.inner.response.lock() = Some(response);
    }

    /// Shorthand for a JSON response.
    pub fn json(&self, status: u16, body: Value) {
        self.respond(HandlerResponse::json(status, body));
    }

    #[must_use]
    pub fn is_written(&self) -> bool {
        self.inner.response.lock().is_some()
    }

    /// Snapshot of the response written so far.
    #[must_use]
    pub fn response(&self) -> Option<HandlerResponse> {
        self.inner.response.lock().clone()
    }

    /// Modify the written response in place; no-op when nothing was written.
    pub fn update_response<F>(&self, update: F)
    where
        F: FnOnce(&mut HandlerResponse),
    {
        if let Some(response) = self.inner.response.lock().as_mut() {
            update(response);
        }
    }

    /// Remove and return the written response.
    #[must_use]
    pub fn take_response(&self) -> Option<HandlerResponse> {
        self.inner.response.lock().take()
    }

    /// Hook chains the serving registry attached to this request. A context
    /// that was never attached carries empty chains.
    #[must_use]
    pub fn pipeline(&self) -> Arc<HookPipeline> {
        Arc::clone(&*self.inner.pipeline.read())
    }

    pub fn attach_pipeline(&self, pipeline: Arc<HookPipeline>) {
        *self.inner.pipeline.write() = pipeline;
    }
}

/// Builder used by transport adapters (and tests) to assemble a [`Context`].
#[derive(Debug)]
pub struct ContextBuilder {
    method: Method,
    path: String,
    query_params: ParamVec,
    path_params: ParamVec,
    headers: HeaderVec,
    body: Option<Value>,
    values: HashMap<String, Value>,
}

impl ContextBuilder {
    fn new(method: Method, uri: &str) -> Self {
        let (path, query) = match uri.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (uri, None),
        };
        let mut builder = Self {
            method,
            path: path.to_string(),
            query_params: ParamVec::new(),
            path_params: ParamVec::new(),
            headers: HeaderVec::new(),
            body: None,
            values: HashMap::new(),
        };
        if let Some(query) = query {
            builder = builder.query_string(query);
        }
        builder
    }

    /// Append every pair of a URL-encoded query string.
    #[must_use]
    pub fn query_string(mut self, query: &str) -> Self {
        for (k, v) in url::form_urlencoded::parse(query.as_bytes()) {
            self.query_params.push((Arc::from(k.as_ref()), v.into_owned()));
        }
        self
    }

    #[must_use]
    pub fn query(mut self, name: &str, value: impl Into<String>) -> Self {
        self.query_params.push((Arc::from(name), value.into()));
        self
    }

    #[must_use]
    pub fn path_param(mut self, name: &str, value: impl Into<String>) -> Self {
        self.path_params.push((Arc::from(name), value.into()));
        self
    }

    #[must_use]
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((Arc::from(name), value.into()));
        self
    }

    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Seed the ambient store.
    #[must_use]
    pub fn value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn build(self) -> Context {
        let request_id = RequestId::from_headers(&self.headers);
        Context {
            inner: Arc::new(Inner {
                request_id,
                method: self.method,
                path: self.path,
                query_params: self.query_params,
                headers: self.headers,
                body: self.body,
                path_params: RwLock::new(self.path_params),
                values: RwLock::new(self.values),
                response: Mutex::new(None),
                pipeline: RwLock::new(Arc::new(HookPipeline::default())),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_uri_query_string_is_decoded() {
        let ctx = Context::builder(Method::GET, "/search?q=hello%20world&page=2&q=again").build();
        assert_eq!(ctx.path(), "/search");
        assert_eq!(ctx.query("q"), Some("hello world"));
        assert_eq!(ctx.query("page"), Some("2"));
        assert_eq!(ctx.query("missing"), None);
    }

    #[test]
    fn test_lookup_per_source() {
        let ctx = Context::builder(Method::GET, "/pets/7?limit=5")
            .path_param("id", "7")
            .header("X-Token", "abc")
            .value("user", json!("alice"))
            .value("tenant", json!(42))
            .body(json!({"name": "x"}))
            .build();
        assert_eq!(ctx.lookup(SourceKind::Query, "limit").as_deref(), Some("5"));
        assert_eq!(ctx.lookup(SourceKind::Path, "id").as_deref(), Some("7"));
        assert_eq!(ctx.lookup(SourceKind::Header, "x-token").as_deref(), Some("abc"));
        assert_eq!(ctx.lookup(SourceKind::Ambient, "user").as_deref(), Some("alice"));
        assert_eq!(ctx.lookup(SourceKind::Ambient, "tenant").as_deref(), Some("42"));
        assert_eq!(ctx.lookup(SourceKind::Body, "name"), None);
    }

    #[test]
    fn test_clones_share_response_slot() {
        let ctx = Context::builder(Method::POST, "/x").build();
        let other = ctx.clone();
        other.json(201, json!({"ok": true}));
        assert!(ctx.is_written());
        let resp = ctx.take_response().unwrap_or_else(|| HandlerResponse::error(500, "none"));
        assert_eq!(resp.status, 201);
        assert!(!other.is_written());
    }

    #[test]
    fn test_request_id_header_is_honoured() {
        let id = RequestId::new();
        let ctx = Context::builder(Method::GET, "/")
            .header("X-Request-Id", id.to_string())
            .build();
        assert_eq!(ctx.request_id(), id);
    }
}
