//! Error types.
//!
//! Two families live here:
//!
//! - [`ApiError`], the value an endpoint's `execute` returns on failure. It
//!   carries a numeric code and a message, flows through the error hook
//!   chain, and unless a hook takes over is written as
//!   `{"code": .., "message": ..}` with its HTTP status.
//! - [`RegistrationError`], raised while a handler is inspected and
//!   registered. These are programming errors in handler code and the route
//!   is never added.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::binding::BindError;
use crate::schema::SchemaError;

/// Domain error produced by an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{message} (code {code})")]
pub struct ApiError {
    pub code: i64,
    pub message: String,
    /// HTTP status used by the terminal error writer.
    #[serde(skip)]
    pub status: u16,
}

impl ApiError {
    /// Error with the given code, answered with a 500 by default.
    #[must_use]
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: 500,
        }
    }

    /// Error whose code doubles as the HTTP status.
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self {
            code: i64::from(status),
            message: message.into(),
            status,
        }
    }

    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::http(400, message)
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::http(404, message)
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::http(500, message)
    }

    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Body written when the error chain runs to completion.
    #[must_use]
    pub fn body(&self) -> serde_json::Value {
        serde_json::json!({ "code": self.code, "message": self.message })
    }
}

/// Conversion into the error capability value.
///
/// An endpoint's `Error` type must implement this so every failure can be
/// routed through the error hook chain.
pub trait IntoApiError {
    fn into_api_error(self) -> ApiError;
}

impl IntoApiError for ApiError {
    fn into_api_error(self) -> ApiError {
        self
    }
}

impl IntoApiError for BindError {
    fn into_api_error(self) -> ApiError {
        let status = self.status();
        ApiError::http(status, self.to_string())
    }
}

impl IntoApiError for anyhow::Error {
    fn into_api_error(self) -> ApiError {
        ApiError::internal(format!("{self:#}"))
    }
}

/// Endpoints that never fail.
impl IntoApiError for std::convert::Infallible {
    fn into_api_error(self) -> ApiError {
        match self {}
    }
}

/// Fatal failure while registering a handler.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// The handler has no execute capability.
    #[error("handler `{name}` has no execute capability")]
    MissingExecute { name: String },

    /// The verb capability returned something that is not an HTTP method.
    #[error("handler `{name}` declares unknown HTTP verb `{verb}`")]
    MalformedVerb { name: String, verb: String },

    /// The init capability failed.
    #[error("init of handler `{name}` failed")]
    Init {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    /// Registration attempted after the registry was frozen.
    #[error("cannot register {target}: registry is frozen")]
    Frozen { target: String },

    /// A route pattern did not compile into a matcher.
    #[error("route pattern `{path}` is invalid")]
    Route {
        path: String,
        #[source]
        source: regex::Error,
    },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl RegistrationError {
    pub(crate) fn missing_execute(name: impl fmt::Display) -> Self {
        RegistrationError::MissingExecute {
            name: name.to_string(),
        }
    }

    pub(crate) fn malformed_verb(name: impl fmt::Display, verb: impl Into<String>) -> Self {
        RegistrationError::MalformedVerb {
            name: name.to_string(),
            verb: verb.into(),
        }
    }

    pub(crate) fn frozen(target: impl fmt::Display) -> Self {
        RegistrationError::Frozen {
            target: target.to_string(),
        }
    }

    pub(crate) fn init(name: impl fmt::Display, source: anyhow::Error) -> Self {
        RegistrationError::Init {
            name: name.to_string(),
            source,
        }
    }
}
