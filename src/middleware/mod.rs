//! Middleware: before/after hooks adapted into decorators.
//!
//! Endpoints list middleware in their decorators capability:
//!
//! ```rust
//! use izroute::middleware::{into_decorator, tracing_decorator, RequestIdMiddleware};
//! use izroute::handler::Decorator;
//!
//! let decorators: Vec<Decorator> = vec![
//!     tracing_decorator("GetPet"),
//!     into_decorator(RequestIdMiddleware),
//! ];
//! # assert_eq!(decorators.len(), 2);
//! ```

mod core;
mod metrics;
mod request_id;
mod tracing;

pub use self::core::{from_shared, into_decorator, Middleware};
pub use self::tracing::tracing_decorator;
pub use metrics::MetricsMiddleware;
pub use request_id::{RequestIdMiddleware, REQUEST_ID_KEY};
