#![allow(dead_code)]

//! Pet-store endpoints and request helpers shared by the integration tests.

use http::Method;
use izroute::config::ServiceConfig;
use izroute::registry::RouteRegistry;
use izroute::server::AppService;
use izroute::{ApiError, ApiSchema, Bindable, Context, Endpoint, HandlerResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ApiSchema)]
#[schema(body, description = "A pet in the store")]
pub struct Pet {
    pub id: i64,
    #[schema(required, description = "pet name")]
    pub name: String,
    #[schema(enum = "available,pending,sold")]
    pub status: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Default, Bindable)]
pub struct GetPetRequest {
    #[bind(from = "path", mapping = "id", required, description = "pet id")]
    pub pet_id: i64,
    #[bind(from = "query", default = "false")]
    pub verbose: bool,
    #[bind(from = "header", mapping = "x-tenant")]
    pub tenant: Option<String>,
}

pub struct GetPet;

impl Endpoint for GetPet {
    type Request = GetPetRequest;
    type Response = Pet;
    type Error = ApiError;

    fn execute(&self, req: GetPetRequest) -> Result<Pet, ApiError> {
        if req.pet_id <= 0 {
            return Err(ApiError::not_found(format!("pet {} not found", req.pet_id)));
        }
        let mut tags = Vec::new();
        if req.verbose {
            tags.push("verbose".to_string());
        }
        if let Some(tenant) = req.tenant {
            tags.push(tenant);
        }
        Ok(Pet {
            id: req.pet_id,
            name: "Rex".to_string(),
            status: "available".to_string(),
            tags,
        })
    }

    fn summary(&self) -> Option<&str> {
        Some("Find pet by id")
    }
}

#[derive(Debug, Default, Bindable)]
pub struct AddPetRequest {
    #[bind(required)]
    pub pet: Pet,
}

pub struct AddPet;

impl Endpoint for AddPet {
    type Request = AddPetRequest;
    type Response = Pet;
    type Error = ApiError;

    fn execute(&self, req: AddPetRequest) -> Result<Pet, ApiError> {
        Ok(req.pet)
    }

    fn verb(&self) -> Option<&str> {
        Some("post")
    }
}

#[derive(Debug, Default, Bindable)]
pub struct ListPetsRequest {
    #[bind(default = "10", description = "page size")]
    pub limit: u32,
    #[bind(enum = "available,pending,sold")]
    pub status: Option<String>,
}

pub struct ListPets;

impl Endpoint for ListPets {
    type Request = ListPetsRequest;
    type Response = Vec<Pet>;
    type Error = ApiError;

    fn execute(&self, req: ListPetsRequest) -> Result<Vec<Pet>, ApiError> {
        let status = req.status.unwrap_or_else(|| "available".to_string());
        Ok((1..=i64::from(req.limit.min(3)))
            .map(|id| Pet {
                id,
                name: format!("pet-{id}"),
                status: status.clone(),
                tags: Vec::new(),
            })
            .collect())
    }
}

/// Registry with the three pet-store routes.
pub fn pet_store() -> RouteRegistry {
    let mut registry = RouteRegistry::new();
    register_pet_store(&mut registry);
    registry
}

pub fn register_pet_store(registry: &mut RouteRegistry) {
    registry.register("/pets/{id}", GetPet).unwrap();
    registry.register("/pets/new", AddPet).unwrap();
    registry.register("/pets", ListPets).unwrap();
}

pub fn service(registry: RouteRegistry) -> AppService {
    AppService::new(registry.freeze(), &ServiceConfig::default()).unwrap()
}

pub fn get(uri: &str) -> Context {
    Context::builder(Method::GET, uri).build()
}

pub fn post_json(uri: &str, body: Value) -> Context {
    Context::builder(Method::POST, uri).body(body).build()
}

/// Decode a response body as `T`.
pub fn body_as<T: serde::de::DeserializeOwned>(response: &HandlerResponse) -> T {
    serde_json::from_value(response.body.clone()).unwrap()
}
