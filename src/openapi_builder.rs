use crate::document::{Info, OpenApiDocument, Operation, Server};
use crate::error::Result;
use crate::registry::HandlerRegistry;
use crate::router::{HandlerId, Router, RouterId};
use crate::walker::RouterWalker;
use log::{debug, info};
use std::collections::BTreeMap;

/// OpenAPI document builder driven by a live router tree.
///
/// Callers declare operations for handlers and mount paths for sub-routers, then traverse the
/// root router. Traversal merges into the document held by the builder, so it can be repeated
/// or run against several roots.
pub struct OpenApiBuilder {
    document: OpenApiDocument,
    registry: HandlerRegistry,
    /// Taken from the first declared server when the document is set
    base_path: String,
    traversed: bool,
}

impl OpenApiBuilder {
    /// Create a new OpenApiBuilder with default info
    pub fn new() -> Self {
        Self::from_document(OpenApiDocument::default())
    }

    /// Start from a caller-supplied base document (info, servers, tags, components, ...)
    ///
    /// # Arguments
    ///
    /// * `document` - Base document; recorded paths are merged into it
    ///
    /// # Returns
    ///
    /// A builder whose base path comes from the document's first server
    pub fn from_document(document: OpenApiDocument) -> Self {
        debug!("Initializing OpenApiBuilder for `{}`", document.info.title);
        let base_path = document.base_path();
        Self {
            document,
            registry: HandlerRegistry::new(),
            base_path,
            traversed: false,
        }
    }

    /// Set custom info for the API
    ///
    /// # Arguments
    ///
    /// * `title` - API title
    /// * `version` - API version
    /// * `description` - Optional API description
    pub fn with_info(mut self, title: String, version: String, description: Option<String>) -> Self {
        self.document.info = Info {
            title,
            version,
            description,
            extensions: BTreeMap::new(),
        };
        self
    }

    /// Declare a server; the first one declared sets the base path
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute or relative server URL
    pub fn with_server(mut self, url: impl Into<String>) -> Self {
        self.document.servers.push(Server::new(url));
        self.base_path = self.document.base_path();
        self
    }

    /// Declare the operation documented by `handler`
    ///
    /// # Arguments
    ///
    /// * `handler` - Identity of the handler as it appears in router stacks
    /// * `operation` - Declared metadata; replaces any earlier declaration for `handler`
    pub fn register_operation(&mut self, handler: HandlerId, operation: Operation) {
        self.registry.register(handler, operation);
    }

    /// Declare the path `router` is mounted at. Required before traversal reaches it.
    ///
    /// # Arguments
    ///
    /// * `router` - Identity of the mounted router
    /// * `path` - Mount path, in framework syntax
    pub fn register_mount(&mut self, router: RouterId, path: impl Into<String>) {
        self.registry.register_mount(router, path);
    }

    /// Walk `root` and merge everything documented beneath it into the document.
    ///
    /// # Arguments
    ///
    /// * `root` - Top-level router of the application
    ///
    /// # Returns
    ///
    /// The document after merging
    ///
    /// # Errors
    ///
    /// See [`RouterWalker::walk`]. Paths recorded before the failure stay in the document.
    pub fn traverse(&mut self, root: &Router) -> Result<&OpenApiDocument> {
        info!("Traversing router `{}`", root.name());
        RouterWalker::new(&mut self.registry, &mut self.document, &self.base_path).walk(root)?;
        self.traversed = true;
        info!(
            "Document now has {} paths, {} operations",
            self.document.paths.len(),
            self.document.operation_count()
        );
        Ok(&self.document)
    }

    /// Traverse `root` only if no traversal has succeeded yet
    ///
    /// # Errors
    ///
    /// Same as [`OpenApiBuilder::traverse`]; a failed traversal does not latch.
    pub fn traverse_once(&mut self, root: &Router) -> Result<&OpenApiDocument> {
        if self.traversed {
            debug!("Skipping traversal of `{}`, already traversed", root.name());
            return Ok(&self.document);
        }
        self.traverse(root)
    }

    /// Current document, without triggering a traversal
    pub fn document(&self) -> &OpenApiDocument {
        &self.document
    }

    /// Operation currently registered for `handler` (enriched once traversed)
    pub fn operation(&self, handler: HandlerId) -> Option<&Operation> {
        self.registry.lookup(handler)
    }

    /// Declared operations and mount paths
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Build the final OpenAPI document
    pub fn build(self) -> OpenApiDocument {
        self.document
    }
}

impl Default for OpenApiBuilder {
    fn default() -> Self {
        Self::new()
    }
}
