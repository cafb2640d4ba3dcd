//! OpenAPI from Router - OpenAPI documentation generated from a live router tree.
//!
//! Instead of reading source code, this library walks the router a web application has
//! actually assembled: its ordered stack of middleware, routes and mounted sub-routers. Every
//! handler the caller has documented is recorded in an OpenAPI document under its full,
//! normalized path, so the document cannot drift from the routing table.
//!
//! # Architecture
//!
//! 1. [`router`] - Traversal model of a framework router (layers, routes, sub-routers)
//! 2. [`path_template`] - Converts framework path syntax (`:id`, `{/:opt}`, `*rest`) to
//!    OpenAPI path templates
//! 3. [`registry`] - Handler -> operation and router -> mount path side tables
//! 4. [`walker`] - Recursive traversal that records operations into the document
//! 5. [`openapi_builder`] - Caller-facing entry point tying the pieces together
//! 6. [`document`] / [`schema`] - The OpenAPI document model
//! 7. [`serializer`] - YAML / JSON rendering and base-document loading
//!
//! # Example Usage
//!
//! ```
//! use openapi_from_router::{
//!     document::Operation,
//!     openapi_builder::OpenApiBuilder,
//!     router::{HandlerId, HttpMethod, Router},
//! };
//! use std::sync::Arc;
//!
//! let get_user = HandlerId::new();
//! let users = Arc::new(Router::new("users").route(HttpMethod::Get, "/:id", "get_user", get_user));
//! let app = Router::new("app").nest(Arc::clone(&users));
//!
//! let mut builder = OpenApiBuilder::new().with_server("/api");
//! builder.register_operation(get_user, Operation::new().with_response(200, "ok"));
//! builder.register_mount(users.id(), "/api/users");
//!
//! let document = builder.traverse(&app).unwrap();
//! assert!(document.operation("/users/{id}", HttpMethod::Get).is_some());
//! ```

pub mod document;
pub mod error;
pub mod openapi_builder;
pub mod path_template;
pub mod registry;
pub mod router;
pub mod schema;
pub mod serializer;
pub mod walker;

pub use error::{Error, Result};
pub use openapi_builder::OpenApiBuilder;
