//! Traversal model of a framework router tree.
//!
//! These types describe a router the way the host framework lays it out at runtime: an ordered
//! stack of layers, where each layer is plain middleware, a declared route (with its own
//! middleware/handler stack), or a mounted sub-router. A framework adapter builds them once the
//! application is assembled; the walker only ever reads them.
//!
//! Handler and router identities are opaque ids handed out from a process-wide counter, so two
//! handlers with identical code stay distinguishable.
//!
//! # Example
//!
//! ```
//! use openapi_from_router::router::{HandlerId, HttpMethod, Router};
//!
//! let get_user = HandlerId::new();
//! let users = Router::new("users").route(HttpMethod::Get, "/:id", "get_user", get_user);
//! let app = Router::new("app").middleware("json", HandlerId::new()).nest(users);
//!
//! assert_eq!(app.stack().len(), 2);
//! ```

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_HANDLER_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_ROUTER_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of a request handler or middleware function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

impl HandlerId {
    /// Allocate a fresh, never-reused handler identity
    pub fn new() -> Self {
        Self(NEXT_HANDLER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for HandlerId {
    fn default() -> Self {
        Self::new()
    }
}

/// Opaque identity of a router instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouterId(u64);

impl RouterId {
    fn next() -> Self {
        Self(NEXT_ROUTER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// HTTP methods that can appear on a terminal route layer.
///
/// Serialized in lowercase, which is also how they key an OpenAPI path item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    /// Every method, in OpenAPI path item order
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Patch,
        HttpMethod::Trace,
    ];

    /// Lowercase name, as used for OpenAPI path item keys
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
            HttpMethod::Trace => "trace",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "put" => Ok(HttpMethod::Put),
            "post" => Ok(HttpMethod::Post),
            "delete" => Ok(HttpMethod::Delete),
            "options" => Ok(HttpMethod::Options),
            "head" => Ok(HttpMethod::Head),
            "patch" => Ok(HttpMethod::Patch),
            "trace" => Ok(HttpMethod::Trace),
            _ => Err(Error::UnsupportedMethod(s.to_string())),
        }
    }
}

/// What a layer dispatches to.
///
/// The adapter decides this when it builds the layer; the walker never probes shapes.
#[derive(Debug, Clone)]
pub enum LayerHandle {
    /// A terminal handler, a middleware function or a route dispatcher
    Handler(HandlerId),
    /// A mounted sub-router
    Router(Arc<Router>),
}

/// Path(s) a route descriptor is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutePath {
    Single(String),
    /// The same handler chain serves every listed path
    Many(Vec<String>),
}

impl From<&str> for RoutePath {
    fn from(path: &str) -> Self {
        RoutePath::Single(path.to_string())
    }
}

impl From<String> for RoutePath {
    fn from(path: String) -> Self {
        RoutePath::Single(path)
    }
}

impl From<Vec<String>> for RoutePath {
    fn from(paths: Vec<String>) -> Self {
        RoutePath::Many(paths)
    }
}

impl From<Vec<&str>> for RoutePath {
    fn from(paths: Vec<&str>) -> Self {
        RoutePath::Many(paths.into_iter().map(str::to_string).collect())
    }
}

/// A declared endpoint: its path(s) and the middleware chain ending in the real handler.
#[derive(Debug, Clone)]
pub struct RouteDescriptor {
    pub path: RoutePath,
    pub stack: Vec<RouteLayer>,
}

/// One entry in a router's ordered traversal stack.
#[derive(Debug, Clone)]
pub struct RouteLayer {
    /// Diagnostic label (handler function name, "router" for mounts, ...)
    pub name: String,
    pub handle: LayerHandle,
    /// Present only on terminal route layers
    pub method: Option<HttpMethod>,
    pub route: Option<RouteDescriptor>,
}

impl RouteLayer {
    /// Plain middleware, or any handler layer with no route of its own
    pub fn handler(name: impl Into<String>, handler: HandlerId) -> Self {
        Self {
            name: name.into(),
            handle: LayerHandle::Handler(handler),
            method: None,
            route: None,
        }
    }

    /// A terminal layer inside a route stack, bound to one HTTP method
    pub fn endpoint(name: impl Into<String>, method: HttpMethod, handler: HandlerId) -> Self {
        Self {
            name: name.into(),
            handle: LayerHandle::Handler(handler),
            method: Some(method),
            route: None,
        }
    }

    /// A route layer: a dispatcher carrying the route's path(s) and its own stack
    pub fn route(path: impl Into<RoutePath>, stack: Vec<RouteLayer>) -> Self {
        Self {
            name: "route".to_string(),
            handle: LayerHandle::Handler(HandlerId::new()),
            method: None,
            route: Some(RouteDescriptor {
                path: path.into(),
                stack,
            }),
        }
    }

    /// A sub-router mount
    pub fn router(router: Arc<Router>) -> Self {
        Self {
            name: "router".to_string(),
            handle: LayerHandle::Router(router),
            method: None,
            route: None,
        }
    }
}

/// A router: an identity plus an ordered stack of layers.
///
/// Cloning yields a new router with a fresh identity, so a clone needs its own mount
/// registration.
#[derive(Debug)]
pub struct Router {
    id: RouterId,
    name: String,
    stack: Vec<RouteLayer>,
}

impl Clone for Router {
    fn clone(&self) -> Self {
        Self {
            id: RouterId::next(),
            name: self.name.clone(),
            stack: self.stack.clone(),
        }
    }
}

impl Router {
    /// Create an empty router with a fresh identity
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: RouterId::next(),
            name: name.into(),
            stack: Vec::new(),
        }
    }

    pub fn id(&self) -> RouterId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stack(&self) -> &[RouteLayer] {
        &self.stack
    }

    /// Append an arbitrary layer
    pub fn layer(mut self, layer: RouteLayer) -> Self {
        self.stack.push(layer);
        self
    }

    /// Append a router-level middleware layer
    pub fn middleware(self, name: impl Into<String>, handler: HandlerId) -> Self {
        self.layer(RouteLayer::handler(name, handler))
    }

    /// Declare `method path` handled by `handler`
    pub fn route(
        self,
        method: HttpMethod,
        path: impl Into<RoutePath>,
        name: impl Into<String>,
        handler: HandlerId,
    ) -> Self {
        self.layer(RouteLayer::route(
            path,
            vec![RouteLayer::endpoint(name, method, handler)],
        ))
    }

    /// Declare a route whose handler runs behind route-level middleware
    pub fn route_with(
        self,
        method: HttpMethod,
        path: impl Into<RoutePath>,
        middleware: Vec<(String, HandlerId)>,
        name: impl Into<String>,
        handler: HandlerId,
    ) -> Self {
        let mut stack: Vec<RouteLayer> = middleware
            .into_iter()
            .map(|(mw_name, id)| RouteLayer::endpoint(mw_name, method, id))
            .collect();
        stack.push(RouteLayer::endpoint(name, method, handler));
        self.layer(RouteLayer::route(path, stack))
    }

    /// Declare one handler serving several paths interchangeably
    pub fn route_many(
        self,
        method: HttpMethod,
        paths: Vec<&str>,
        name: impl Into<String>,
        handler: HandlerId,
    ) -> Self {
        self.route(method, paths, name, handler)
    }

    /// Mount a sub-router; its mount path is registered separately
    pub fn nest(self, router: impl Into<Arc<Router>>) -> Self {
        self.layer(RouteLayer::router(router.into()))
    }
}
