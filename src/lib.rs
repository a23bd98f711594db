//! # izroute
//!
//! **izroute** turns plain handler values into routable HTTP endpoints.
//!
//! An endpoint declares what it needs through optional capabilities: the
//! request type it binds, the verb it answers, an init step, decorators
//! wrapping it, a summary for the documentation. At registration time
//! the crate inspects those capabilities once and produces a
//! [`HandlerDescriptor`](handler::HandlerDescriptor): a composed, ready to
//! call request-handling unit plus the metadata the schema generator needs.
//!
//! ## Architecture
//!
//! - **[`binding`]** - Field binding tables, type metadata and the request binder
//! - **[`endpoint`]** - The [`Endpoint`] trait, [`RawEndpoint`](endpoint::RawEndpoint) and the capability inspector
//! - **[`handler`]** - Decorator composition and handler descriptors
//! - **[`hooks`]** - Error and success hook chains
//! - **[`middleware`]** - Before/after middleware adapted into decorators
//! - **[`registry`]** - Route registration, freezing and the process-wide registry
//! - **[`router`]** - Path matching over a frozen registry
//! - **[`schema`]** - Swagger 2.0 style document generation and the viewer page
//! - **[`server`]** - [`AppService`](server::AppService), the dispatch surface for a transport
//! - **[`config`]** / **[`logging`]** - Startup configuration and structured logging
//!
//! ## Quick Start
//!
//! ```rust
//! use http::Method;
//! use izroute::config::ServiceConfig;
//! use izroute::registry::RouteRegistry;
//! use izroute::server::AppService;
//! use izroute::{ApiError, ApiSchema, Bindable, Context, Endpoint};
//! use serde::Serialize;
//!
//! #[derive(Debug, Default, Bindable)]
//! struct GetPetRequest {
//!     #[bind(from = "path", required, description = "pet id")]
//!     id: i64,
//!     #[bind(from = "query", default = "false")]
//!     verbose: bool,
//! }
//!
//! #[derive(Debug, Serialize, ApiSchema)]
//! struct Pet {
//!     id: i64,
//!     name: String,
//! }
//!
//! struct GetPet;
//!
//! impl Endpoint for GetPet {
//!     type Request = GetPetRequest;
//!     type Response = Pet;
//!     type Error = ApiError;
//!
//!     fn execute(&self, req: GetPetRequest) -> Result<Pet, ApiError> {
//!         if req.id <= 0 {
//!             return Err(ApiError::not_found("no such pet"));
//!         }
//!         Ok(Pet { id: req.id, name: "Rex".into() })
//!     }
//! }
//!
//! let mut registry = RouteRegistry::new();
//! registry.register("/pets/{id}", GetPet).unwrap();
//! let service = AppService::new(registry.freeze(), &ServiceConfig::default()).unwrap();
//!
//! let response = service.call(&Context::builder(Method::GET, "/pets/7").build());
//! assert_eq!(response.status, 200);
//! assert_eq!(response.body["name"], "Rex");
//!
//! let doc = service.schema();
//! assert!(doc.paths["/pets/{id}"].contains_key("get"));
//! assert!(doc.definitions.contains_key("Pet"));
//! ```

extern crate self as izroute;

pub mod binding;
pub mod config;
pub mod context;
pub mod endpoint;
pub mod error;
pub mod handler;
pub mod hooks;
pub mod ids;
pub mod logging;
pub mod middleware;
pub mod registry;
pub mod router;
pub mod schema;
pub mod server;

pub use binding::{Bindable, BindingPolicy, Described};
pub use context::{Context, HandlerResponse};
pub use endpoint::Endpoint;
pub use error::{ApiError, IntoApiError, RegistrationError};
pub use izroute_macros::{ApiSchema, Bindable};
