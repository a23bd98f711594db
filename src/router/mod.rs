//! # Router Module
//!
//! Path matching over a [`FrozenRegistry`](crate::registry::FrozenRegistry).
//!
//! At startup every registered path pattern (e.g. `/pets/{id}` or
//! `/pets/:id`) is compiled into an anchored regex. For each request the
//! router walks the compiled table, static routes first, and returns the
//! descriptor together with the captured path parameters.
//!
//! ```rust
//! use http::Method;
//! use izroute::endpoint::RawEndpoint;
//! use izroute::registry::RouteRegistry;
//! use izroute::router::Router;
//! use serde_json::json;
//!
//! let mut registry = RouteRegistry::new();
//! registry
//!     .register_raw("/pets/{id}", RawEndpoint::new("GetPet").execute(|_| json!({})))
//!     .unwrap();
//! let router = Router::new(&registry.freeze()).unwrap();
//!
//! let m = router.route(&Method::GET, "/pets/42").unwrap();
//! assert_eq!(m.get_path_param("id"), Some("42"));
//! assert!(router.route(&Method::POST, "/pets/42").is_none());
//! ```

mod core;

pub(crate) use self::core::param_name;
pub use self::core::{RouteMatch, Router};
