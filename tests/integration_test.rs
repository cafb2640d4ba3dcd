use openapi_from_router::{
    document::{Operation, Parameter, ParameterLocation},
    openapi_builder::OpenApiBuilder,
    router::{HandlerId, HttpMethod, RouteLayer, Router},
    schema::Schema,
    serializer::{deserialize_yaml, serialize_json, serialize_yaml},
    Error,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

/// Handlers of a small pet-store style application
struct Handlers {
    list_pets: HandlerId,
    get_pet: HandlerId,
    create_pet: HandlerId,
    list_owners: HandlerId,
    search: HandlerId,
    auth: HandlerId,
    body_parser: HandlerId,
}

impl Handlers {
    fn new() -> Self {
        Self {
            list_pets: HandlerId::new(),
            get_pet: HandlerId::new(),
            create_pet: HandlerId::new(),
            list_owners: HandlerId::new(),
            search: HandlerId::new(),
            auth: HandlerId::new(),
            body_parser: HandlerId::new(),
        }
    }
}

/// app
///  ├─ body_parser (middleware)
///  ├─ GET /health            (undocumented)
///  └─ router "v1"            mounted at /api/v1
///      ├─ router "pets"      mounted at /pets
///      │   ├─ GET  /
///      │   ├─ POST /          behind `auth`
///      │   └─ GET  /:petId{/:format}
///      ├─ router "owners"    mounted at /owners
///      │   └─ GET  /
///      └─ GET ["/search/:term", "/find/:term"]
fn create_test_app(handlers: &Handlers) -> (Router, Arc<Router>, Arc<Router>, Arc<Router>) {
    let pets = Arc::new(
        Router::new("pets")
            .route(HttpMethod::Get, "/", "list_pets", handlers.list_pets)
            .route_with(
                HttpMethod::Post,
                "/",
                vec![("auth".to_string(), handlers.auth)],
                "create_pet",
                handlers.create_pet,
            )
            .route(HttpMethod::Get, "/:petId{/:format}", "get_pet", handlers.get_pet),
    );
    let owners = Arc::new(Router::new("owners").route(
        HttpMethod::Get,
        "/",
        "list_owners",
        handlers.list_owners,
    ));
    let v1 = Arc::new(
        Router::new("v1")
            .nest(Arc::clone(&pets))
            .nest(Arc::clone(&owners))
            .route_many(
                HttpMethod::Get,
                vec!["/search/:term", "/find/:term"],
                "search",
                handlers.search,
            ),
    );
    let app = Router::new("app")
        .middleware("body_parser", handlers.body_parser)
        .route(HttpMethod::Get, "/health", "health", HandlerId::new())
        .nest(Arc::clone(&v1));

    (app, v1, pets, owners)
}

fn create_builder(handlers: &Handlers, v1: &Router, pets: &Router, owners: &Router) -> OpenApiBuilder {
    let mut builder = OpenApiBuilder::new()
        .with_info("Pet Store".to_string(), "1.2.0".to_string(), None)
        .with_server("https://pets.example.com/api/v1");

    builder.register_mount(v1.id(), "/api/v1");
    builder.register_mount(pets.id(), "/pets");
    builder.register_mount(owners.id(), "/owners");

    builder.register_operation(
        handlers.list_pets,
        Operation::new()
            .with_summary("List pets")
            .with_tag("pets")
            .with_parameter(Parameter::new("limit", ParameterLocation::Query, false))
            .with_response(200, "A page of pets"),
    );
    builder.register_operation(
        handlers.create_pet,
        Operation::new()
            .with_summary("Create a pet")
            .with_response(201, "Created"),
    );
    builder.register_operation(
        handlers.get_pet,
        Operation::new()
            .with_summary("Get a pet")
            .with_parameter(
                Parameter::path("petId", true)
                    .with_description("Pet identifier")
                    .with_schema(Schema::of_type("integer")),
            )
            .with_response(200, "The pet")
            .with_response(404, "Not found"),
    );
    builder.register_operation(
        handlers.list_owners,
        Operation::new().with_summary("List owners").with_response(200, "ok"),
    );
    builder.register_operation(
        handlers.search,
        Operation::new()
            .with_summary("Search")
            .with_description("Full text search")
            .with_response(200, "Results"),
    );

    builder
}

#[test]
fn test_end_to_end_generation() {
    let handlers = Handlers::new();
    let (app, v1, pets, owners) = create_test_app(&handlers);
    let mut builder = create_builder(&handlers, &v1, &pets, &owners);

    let document = builder.traverse(&app).expect("traversal should succeed");

    let paths: Vec<_> = document.paths.keys().map(String::as_str).collect();
    assert_eq!(
        paths,
        vec![
            "/find/{term}",
            "/owners/",
            "/pets/",
            "/pets/{petId}/{format}",
            "/search/{term}",
        ]
    );

    let pets_item = &document.paths["/pets/"];
    assert_eq!(pets_item.len(), 2);
    assert_eq!(
        pets_item.operation(HttpMethod::Get).unwrap().summary.as_deref(),
        Some("List pets")
    );
    assert_eq!(
        pets_item.operation(HttpMethod::Post).unwrap().summary.as_deref(),
        Some("Create a pet")
    );

    let get_pet = document
        .operation("/pets/{petId}/{format}", HttpMethod::Get)
        .unwrap();
    assert_eq!(
        serde_json::to_value(&get_pet.parameters).unwrap(),
        json!([
            {
                "name": "petId",
                "in": "path",
                "required": true,
                "description": "Pet identifier",
                "schema": {"type": "integer"}
            },
            {
                "name": "format",
                "in": "path",
                "required": false,
                "schema": {"type": "string"}
            }
        ])
    );
}

#[test]
fn test_query_parameters_follow_path_parameters() {
    let handlers = Handlers::new();
    let (app, v1, pets, owners) = create_test_app(&handlers);
    let mut builder = create_builder(&handlers, &v1, &pets, &owners);

    builder.traverse(&app).unwrap();

    let list = builder.operation(handlers.list_pets).unwrap();
    assert_eq!(list.parameters.len(), 1);
    assert_eq!(list.parameters[0].location, ParameterLocation::Query);
}

#[test]
fn test_fan_out_paths_share_operation() {
    let handlers = Handlers::new();
    let (app, v1, pets, owners) = create_test_app(&handlers);
    let mut builder = create_builder(&handlers, &v1, &pets, &owners);

    let document = builder.traverse(&app).unwrap();

    let search = document.operation("/search/{term}", HttpMethod::Get).unwrap();
    let find = document.operation("/find/{term}", HttpMethod::Get).unwrap();
    assert_eq!(search, find);
    assert_eq!(search.description.as_deref(), Some("Full text search"));
    assert_eq!(search.parameters, vec![Parameter::path("term", true)]);
}

#[test]
fn test_traverse_twice_equals_once() {
    let handlers = Handlers::new();
    let (app, v1, pets, owners) = create_test_app(&handlers);
    let mut builder = create_builder(&handlers, &v1, &pets, &owners);

    let once = builder.traverse(&app).unwrap().clone();
    let twice = builder.traverse(&app).unwrap().clone();

    assert_eq!(twice, once);
    assert_eq!(
        serialize_json(&twice).unwrap(),
        serialize_json(&once).unwrap()
    );
}

#[test]
fn test_missing_mount_registration() {
    let handlers = Handlers::new();
    let (app, v1, pets, _owners) = create_test_app(&handlers);

    let mut builder = OpenApiBuilder::new();
    builder.register_mount(v1.id(), "/api/v1");
    builder.register_mount(pets.id(), "/pets");
    builder.register_operation(
        handlers.list_owners,
        Operation::new().with_summary("List owners"),
    );

    let err = builder.traverse(&app).unwrap_err();
    match err {
        Error::RouterRegistration {
            name,
            path,
            stack_size,
        } => {
            assert_eq!(name, "owners");
            assert_eq!(path, "/api/v1");
            assert_eq!(stack_size, 1);
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(builder.document().paths.is_empty());
}

#[test]
fn test_wildcard_route_is_rejected() {
    let files = HandlerId::new();
    let app = Router::new("app").layer(RouteLayer::route(
        "/files/*path",
        vec![RouteLayer::endpoint("download", HttpMethod::Get, files)],
    ));

    let mut builder = OpenApiBuilder::new();
    builder.register_operation(files, Operation::new().with_summary("Download"));

    let err = builder.traverse(&app).unwrap_err();
    assert_eq!(
        err.to_string(),
        "route `download` uses wildcard path `/files/*path`, which cannot be documented"
    );
    assert!(builder.document().paths.is_empty());
}

#[test]
fn test_users_example_without_server() {
    let get_user = HandlerId::new();
    let app = Router::new("app").route(HttpMethod::Get, "/users/:id", "get_user", get_user);

    let mut builder = OpenApiBuilder::new();
    let mut declared = Operation::new();
    declared.responses = serde_json::from_value(json!({"200": {"description": "ok"}})).unwrap();
    builder.register_operation(get_user, declared);

    let document = builder.traverse(&app).unwrap();
    let value = serde_json::to_value(document).unwrap();
    assert_eq!(
        value["paths"]["/users/{id}"]["get"]["parameters"][0],
        json!({"name": "id", "in": "path", "required": true, "schema": {"type": "string"}})
    );
}

#[test]
fn test_base_document_from_yaml_config() {
    let base = deserialize_yaml(
        r#"
openapi: 3.0.3
info:
  title: Config API
  version: 0.9.0
servers:
  - url: /api/v1
components:
  securitySchemes:
    apiKey:
      type: apiKey
      in: header
      name: X-API-Key
"#,
    )
    .unwrap();

    let handler = HandlerId::new();
    let api = Arc::new(Router::new("api").route(HttpMethod::Get, "/test", "test", handler));
    let app = Router::new("app").nest(Arc::clone(&api));

    let mut builder = OpenApiBuilder::from_document(base);
    builder.register_mount(api.id(), "/api/v1");
    builder.register_operation(handler, Operation::new().with_response(200, "ok"));
    builder.traverse(&app).unwrap();

    let document = builder.build();
    assert!(document.paths.contains_key("/test"));
    assert!(!document.paths.contains_key("/api/v1/test"));

    let yaml = serialize_yaml(&document).unwrap();
    assert!(yaml.contains("securitySchemes"));
    assert!(yaml.contains("Config API"));
}
