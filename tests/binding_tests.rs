mod common;

use common::{body_as, get, pet_store, post_json, service, GetPetRequest, Pet};
use http::Method;
use izroute::binding::{BindError, FieldBindingSpec, SourceKind};
use izroute::config::ServiceConfig;
use izroute::registry::RouteRegistry;
use izroute::server::AppService;
use izroute::{ApiError, Bindable, BindingPolicy, Context, Endpoint};
use serde_json::json;

#[test]
fn test_path_query_and_header_fields_bind() {
    let svc = service(pet_store());
    let ctx = Context::builder(Method::GET, "/pets/42?verbose=true")
        .header("X-Tenant", "acme")
        .build();
    let res = svc.call(&ctx);
    assert_eq!(res.status, 200);
    let pet: Pet = body_as(&res);
    assert_eq!(pet.id, 42);
    assert_eq!(pet.tags, vec!["verbose".to_string(), "acme".to_string()]);
}

#[test]
fn test_unparseable_path_value_binds_zero_value() {
    let specs = GetPetRequest::binding_specs();
    let ctx = Context::builder(Method::GET, "/pets/abc")
        .path_param("id", "abc")
        .build();
    let req = GetPetRequest::bind(&ctx, &specs, BindingPolicy::Lenient).unwrap();
    assert_eq!(req.pet_id, 0);
    assert!(!req.verbose);
    assert_eq!(req.tenant, None);
}

#[test]
fn test_strict_policy_rejects_unparseable_path_value() {
    let specs = GetPetRequest::binding_specs();
    let ctx = Context::builder(Method::GET, "/pets/abc")
        .path_param("id", "abc")
        .build();
    let err = GetPetRequest::bind(&ctx, &specs, BindingPolicy::Strict).unwrap_err();
    assert!(matches!(
        err,
        BindError::InvalidValue { name: "id", location: SourceKind::Path, .. }
    ));
}

#[test]
fn test_default_hint_applies_when_absent() {
    let svc = service(pet_store());
    let res = svc.call(&get("/pets"));
    assert_eq!(res.status, 200);
    let pets: Vec<Pet> = body_as(&res);
    // limit defaults to 10, capped to 3 by the endpoint
    assert_eq!(pets.len(), 3);

    let res = svc.call(&get("/pets?limit=2&status=sold"));
    let pets: Vec<Pet> = body_as(&res);
    assert_eq!(pets.len(), 2);
    assert!(pets.iter().all(|p| p.status == "sold"));
}

#[test]
fn test_enum_is_documentation_only() {
    let svc = service(pet_store());
    let res = svc.call(&get("/pets?limit=1&status=lost"));
    assert_eq!(res.status, 200);
    let pets: Vec<Pet> = body_as(&res);
    assert_eq!(pets[0].status, "lost");
}

#[test]
fn test_structured_field_decodes_from_body() {
    let svc = service(pet_store());
    let res = svc.call(&post_json(
        "/pets/new",
        json!({"id": 7, "name": "Tom", "status": "pending"}),
    ));
    assert_eq!(res.status, 200);
    let pet: Pet = body_as(&res);
    assert_eq!(pet.name, "Tom");
    assert!(pet.tags.is_empty());
}

#[test]
fn test_undecodable_body_is_zero_value_when_lenient() {
    let svc = service(pet_store());
    let res = svc.call(&post_json("/pets/new", json!({"id": "seven"})));
    assert_eq!(res.status, 200);
    assert_eq!(body_as::<Pet>(&res), Pet::default());
}

#[test]
fn test_strict_service_answers_400_through_error_chain() {
    let mut registry = RouteRegistry::with_policy(BindingPolicy::Strict);
    common::register_pet_store(&mut registry);
    let svc = AppService::new(registry.freeze(), &ServiceConfig::default()).unwrap();

    let res = svc.call(&post_json("/pets/new", json!({"id": "seven"})));
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], 400);

    let res = svc.call(&Context::builder(Method::POST, "/pets/new").build());
    assert_eq!(res.status, 400);
    assert!(res.body["message"].as_str().unwrap().contains("pet"));
}

#[test]
fn test_required_not_enforced_when_lenient() {
    let svc = service(pet_store());
    let res = svc.call(&Context::builder(Method::POST, "/pets/new").build());
    assert_eq!(res.status, 200);
    assert_eq!(body_as::<Pet>(&res), Pet::default());
}

#[derive(Debug, Bindable)]
struct WhoAmI {
    #[bind(from = "ctx", mapping = "user")]
    user: String,
    #[bind(from = "ctx", mapping = "roles")]
    roles: String,
    ctx: Context,
    #[bind(skip)]
    ignored: u8,
}

struct WhoAmIEndpoint;

impl Endpoint for WhoAmIEndpoint {
    type Request = WhoAmI;
    type Response = serde_json::Value;
    type Error = ApiError;

    fn execute(&self, req: WhoAmI) -> Result<serde_json::Value, ApiError> {
        Ok(json!({
            "user": req.user,
            "roles": req.roles,
            "path": req.ctx.path(),
            "ignored": req.ignored,
        }))
    }
}

#[test]
fn test_ambient_values_and_context_injection() {
    let specs: Vec<FieldBindingSpec> = WhoAmI::binding_specs();
    assert_eq!(specs.len(), 3);
    assert!(specs[2].is_injected());

    let mut registry = RouteRegistry::new();
    registry.register("/me", WhoAmIEndpoint).unwrap();
    let svc = service(registry);

    let ctx = Context::builder(Method::GET, "/me")
        .value("user", "ada")
        .value("roles", json!(["admin"]))
        .build();
    let res = svc.call(&ctx);
    assert_eq!(res.status, 200);
    assert_eq!(
        res.body,
        json!({"user": "ada", "roles": "[\"admin\"]", "path": "/me", "ignored": 0})
    );
}
