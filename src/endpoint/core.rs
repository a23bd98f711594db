use serde::Serialize;

use crate::binding::{Bindable, Described};
use crate::error::IntoApiError;
use crate::handler::Decorator;

/// An HTTP endpoint declared as a plain value.
///
/// `execute` is the only mandatory capability. Every other capability has a
/// default returning `None`, meaning "not implemented"; override the ones
/// the endpoint needs. The registry resolves them once, when the endpoint is
/// registered, into a [`CapabilitySet`](super::CapabilitySet).
///
/// ```rust
/// use izroute::{ApiError, ApiSchema, Bindable, Endpoint};
/// use serde::Serialize;
///
/// #[derive(Bindable)]
/// struct GetPetRequest {
///     #[bind(from = "path", mapping = "id")]
///     id: i64,
/// }
///
/// #[derive(Serialize, ApiSchema)]
/// struct Pet {
///     id: i64,
///     name: String,
/// }
///
/// struct GetPet;
///
/// impl Endpoint for GetPet {
///     type Request = GetPetRequest;
///     type Response = Pet;
///     type Error = ApiError;
///
///     fn execute(&self, req: GetPetRequest) -> Result<Pet, ApiError> {
///         if req.id <= 0 {
///             return Err(ApiError::not_found("no such pet"));
///         }
///         Ok(Pet { id: req.id, name: "Rex".into() })
///     }
///
///     fn verb(&self) -> Option<&str> {
///         Some("GET")
///     }
/// }
/// ```
pub trait Endpoint: Send + Sync + 'static {
    /// Input type, bound from the request per its binding table.
    type Request: Bindable;
    /// Output type, serialised into the success chain.
    type Response: Serialize + Described;
    /// Failure type, routed through the error chain.
    type Error: IntoApiError;

    fn execute(&self, request: Self::Request) -> Result<Self::Response, Self::Error>;

    /// One-time setup, run synchronously at registration before the
    /// endpoint can be dispatched. `None` when the endpoint has no setup.
    fn init(&mut self) -> Option<anyhow::Result<()>> {
        None
    }

    /// HTTP method; `None` means `GET`.
    fn verb(&self) -> Option<&str> {
        None
    }

    /// Decorators, first-declared outermost. `None` means no wrapping.
    fn decorators(&self) -> Option<Vec<Decorator>> {
        None
    }

    /// Name used as the operation tag; defaults to the type name.
    fn display_name(&self) -> Option<&str> {
        None
    }

    /// One-line operation summary for the schema document.
    fn summary(&self) -> Option<&str> {
        None
    }
}
