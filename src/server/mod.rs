//! # Server Module
//!
//! [`AppService`] is the boundary between a transport and the handlers in a
//! [`FrozenRegistry`](crate::registry::FrozenRegistry). It owns the routing
//! table, the hook chains and the generated schema document; it does not
//! own sockets. A transport adapter builds a [`Context`](crate::Context)
//! per request and writes back whatever [`AppService::call`] returns.
//!
//! ```rust
//! use http::Method;
//! use izroute::config::ServiceConfig;
//! use izroute::endpoint::RawEndpoint;
//! use izroute::registry::RouteRegistry;
//! use izroute::server::AppService;
//! use izroute::Context;
//! use serde_json::json;
//!
//! let mut registry = RouteRegistry::new();
//! registry
//!     .register_raw("/ping", RawEndpoint::new("Ping").execute(|_| json!({"pong": true})))
//!     .unwrap();
//! let service = AppService::new(registry.freeze(), &ServiceConfig::default()).unwrap();
//!
//! let response = service.call(&Context::builder(Method::GET, "/ping").build());
//! assert_eq!(response.status, 200);
//! assert_eq!(response.body, json!({"pong": true}));
//!
//! let missing = service.call(&Context::builder(Method::GET, "/nope").build());
//! assert_eq!(missing.status, 404);
//! ```

mod service;

pub use service::AppService;
