mod common;

use common::{get, pet_store, service, AddPetRequest, GetPetRequest, ListPetsRequest};
use izroute::binding::{Described, FieldBindingSpec, SourceKind};
use izroute::config::ServiceConfig;
use izroute::registry::RouteRegistry;
use izroute::schema::{Info, SchemaError, SchemaGenerator};
use izroute::server::AppService;
use izroute::{ApiError, ApiSchema, Bindable, Endpoint, RegistrationError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeSet;

fn pet_store_doc() -> izroute::schema::SchemaDocument {
    SchemaGenerator::generate(
        Info {
            title: "Pet Store".into(),
            description: "pets".into(),
            version: "1.0.0".into(),
        },
        &pet_store().freeze(),
    )
    .unwrap()
}

#[test]
fn test_document_layout() {
    let doc = pet_store_doc();
    assert_eq!(doc.swagger, "2.0");
    assert_eq!(doc.info.title, "Pet Store");

    let paths: Vec<&str> = doc.paths.keys().map(String::as_str).collect();
    assert_eq!(paths, vec!["/pets", "/pets/new", "/pets/{id}"]);

    let get_pet = &doc.paths["/pets/{id}"]["get"];
    assert_eq!(get_pet.tags, vec!["GetPet".to_string()]);
    assert_eq!(get_pet.summary, "Find pet by id");
    assert!(doc.paths["/pets/new"].contains_key("post"));
}

#[test]
fn test_scalar_parameters_carry_type_and_hints() {
    let doc = pet_store_doc();
    let params = &doc.paths["/pets/{id}"]["get"].parameters;

    let id = params.iter().find(|p| p.name == "id").unwrap();
    assert_eq!(id.location, "path");
    assert!(id.required);
    assert_eq!(id.param_type.as_deref(), Some("integer"));
    assert_eq!(id.format.as_deref(), Some("int64"));
    assert_eq!(id.description, "pet id");
    assert!(id.schema.is_none());

    let tenant = params.iter().find(|p| p.name == "x-tenant").unwrap();
    assert_eq!(tenant.location, "header");
    assert_eq!(tenant.param_type.as_deref(), Some("string"));

    let list = &doc.paths["/pets"]["get"].parameters;
    let limit = list.iter().find(|p| p.name == "limit").unwrap();
    assert_eq!(limit.default.as_deref(), Some("10"));
    assert_eq!(limit.format.as_deref(), Some("int64"));
    let status = list.iter().find(|p| p.name == "status").unwrap();
    assert_eq!(status.enum_values, vec!["available", "pending", "sold"]);
}

#[test]
fn test_structured_type_is_one_shared_definition() {
    let doc = pet_store_doc();

    let body = &doc.paths["/pets/new"]["post"].parameters[0];
    assert_eq!(body.location, "body");
    assert!(body.param_type.is_none());
    assert_eq!(body.schema.as_ref().and_then(|s| s.ref_name()), Some("Pet"));

    let get_ok = &doc.paths["/pets/{id}"]["get"].responses["200"];
    assert_eq!(get_ok.schema.ref_name(), Some("Pet"));
    let post_ok = &doc.paths["/pets/new"]["post"].responses["200"];
    assert_eq!(post_ok.schema.ref_name(), Some("Pet"));

    let list_ok = &doc.paths["/pets"]["get"].responses["200"];
    assert_eq!(list_ok.schema.schema_type.as_deref(), Some("array"));
    assert_eq!(
        list_ok.schema.items.as_ref().and_then(|s| s.ref_name()),
        Some("Pet")
    );

    assert_eq!(doc.definitions.len(), 1);
    let pet = &doc.definitions["Pet"];
    assert_eq!(pet.def_type, "object");
    assert_eq!(pet.description.as_deref(), Some("A pet in the store"));
    assert_eq!(pet.required, vec!["name".to_string()]);
    assert_eq!(pet.properties["status"].enum_values.len(), 3);
    assert_eq!(pet.properties["tags"].schema_type.as_deref(), Some("array"));
    assert_eq!(doc.paths["/pets/{id}"]["get"].responses["400"].description, "Invalid input");
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ApiSchema)]
#[schema(body)]
struct Address {
    street: String,
}

#[derive(Debug, Serialize, ApiSchema)]
struct Customer {
    #[serde(rename = "homeAddress")]
    home: Address,
    work: Address,
    #[serde(skip)]
    #[allow(dead_code)]
    internal: u8,
}

#[test]
fn test_same_named_nested_type_is_referenced_twice() {
    struct GetCustomer;

    impl Endpoint for GetCustomer {
        type Request = ();
        type Response = Customer;
        type Error = ApiError;

        fn execute(&self, _: ()) -> Result<Customer, ApiError> {
            Ok(Customer {
                home: Address::default(),
                work: Address::default(),
                internal: 0,
            })
        }
    }

    let mut registry = RouteRegistry::new();
    registry.register("/customer", GetCustomer).unwrap();
    let doc = SchemaGenerator::generate(Info::default(), &registry.freeze()).unwrap();

    let customer = &doc.definitions["Customer"];
    let keys: Vec<&str> = customer.properties.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["homeAddress", "work"]);
    assert_eq!(customer.properties["homeAddress"].ref_name(), Some("Address"));
    assert_eq!(customer.properties["work"].ref_name(), Some("Address"));
    assert!(doc.definitions.contains_key("Address"));
    assert_eq!(doc.definitions.len(), 2);
}

fn binder_locations(specs: &[FieldBindingSpec]) -> BTreeSet<(String, String)> {
    specs
        .iter()
        .filter_map(FieldBindingSpec::location)
        .map(|(source, name)| (source.as_str().to_string(), name.to_string()))
        .collect()
}

#[test]
fn test_documented_parameters_match_binder_locations() {
    let doc = pet_store_doc();
    let cases = [
        ("/pets/{id}", "get", GetPetRequest::binding_specs()),
        ("/pets/new", "post", AddPetRequest::binding_specs()),
        ("/pets", "get", ListPetsRequest::binding_specs()),
    ];
    for (path, verb, specs) in cases {
        let documented: BTreeSet<(String, String)> = doc.paths[path][verb]
            .parameters
            .iter()
            .map(|p| (p.location.clone(), p.name.clone()))
            .collect();
        assert_eq!(documented, binder_locations(&specs), "{verb} {path}");
    }
}

#[test]
fn test_complex_fields_are_always_body_parameters() {
    let specs = AddPetRequest::binding_specs();
    assert_eq!(specs[0].source, SourceKind::Body);
    assert!(Vec::<String>::describe().is_complex());
}

#[derive(Debug, Default, Bindable)]
struct Initials {
    first: char,
}

struct GetInitials;

impl Endpoint for GetInitials {
    type Request = Initials;
    type Response = String;
    type Error = ApiError;

    fn execute(&self, req: Initials) -> Result<String, ApiError> {
        Ok(req.first.to_string())
    }
}

#[test]
fn test_unsupported_field_type_is_fatal() {
    let mut registry = RouteRegistry::new();
    registry.register("/initials", GetInitials).unwrap();
    let err = AppService::new(registry.freeze(), &ServiceConfig::default()).unwrap_err();
    match err {
        RegistrationError::Schema(SchemaError::UnsupportedType { type_name, location }) => {
            assert_eq!(type_name, "char");
            assert!(location.contains("first"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_schema_endpoint_serves_generated_document() {
    let svc = service(pet_store());
    let res = svc.call(&get("/openapi.json"));
    assert_eq!(res.status, 200);
    assert_eq!(res.body["swagger"], json!("2.0"));
    assert_eq!(res.body, serde_json::to_value(svc.schema()).unwrap());
    assert!(res.body["paths"]["/pets/{id}"]["get"]["parameters"].is_array());
    assert_eq!(
        res.body["definitions"]["Pet"]["properties"]["status"]["enum"],
        json!(["available", "pending", "sold"])
    );
}
