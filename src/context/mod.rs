//! # Context Module
//!
//! The request context is the one object every request-handling unit sees:
//! request parts parsed by the transport, path parameters captured by the
//! router, an ambient key/value store, and the response slot.
//!
//! Transport adapters build a [`Context`] per inbound request with
//! [`Context::builder`], hand it to [`AppService::call`](crate::server::AppService::call)
//! and write the returned [`HandlerResponse`] back to the wire.
//!
//! ```rust
//! use http::Method;
//! use izroute::Context;
//!
//! let ctx = Context::builder(Method::GET, "/pets/7?verbose=true")
//!     .header("accept", "application/json")
//!     .build();
//! assert_eq!(ctx.query("verbose"), Some("true"));
//! ```

mod core;
mod response;

use smallvec::SmallVec;
use std::sync::Arc;

pub use self::core::{Context, ContextBuilder};
pub use response::{status_reason, HandlerResponse};

/// Maximum number of path/query parameters before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Maximum inline headers before heap allocation.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Name/value pairs for path and query parameters.
///
/// Names are `Arc<str>` because the router hands out the same parameter
/// names for every request on a route.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Header storage for requests and responses.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;
