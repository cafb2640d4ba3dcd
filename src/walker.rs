//! Recursive traversal of a router tree into an OpenAPI document.
//!
//! The walker visits every layer of a router's stack, carrying the path prefix accumulated so
//! far. Prefixes grow by plain string concatenation; slashes are never normalized, so a router
//! mounted at `/` holding a route at `/` is recorded at `//`.
//!
//! For each layer:
//!
//! 1. If the layer's handler has a registered operation and the layer carries an HTTP method,
//!    the accumulated path is translated and the operation is recorded under it.
//! 2. A mounted sub-router is entered with its registered mount path appended.
//! 3. A route is entered with its path appended. A route bound to several paths is entered once
//!    per path, targeting only its first documented handler.
//! 4. Anything else is plain middleware and ends the descent.

use crate::document::{OpenApiDocument, Operation, Parameter, ParameterLocation};
use crate::error::{Error, Result};
use crate::path_template;
use crate::registry::HandlerRegistry;
use crate::router::{HandlerId, HttpMethod, LayerHandle, RouteLayer, RoutePath, Router};
use log::{debug, warn};

/// One traversal pass over a router tree.
///
/// Borrows the registry and the document mutably for the duration of the pass: recorded
/// operations are merged into the document and written back into the registry.
pub struct RouterWalker<'a> {
    registry: &'a mut HandlerRegistry,
    document: &'a mut OpenApiDocument,
    base_path: &'a str,
}

impl<'a> RouterWalker<'a> {
    /// `base_path` is stripped from the front of every recorded path; `/` strips nothing.
    pub fn new(
        registry: &'a mut HandlerRegistry,
        document: &'a mut OpenApiDocument,
        base_path: &'a str,
    ) -> Self {
        Self {
            registry,
            document,
            base_path,
        }
    }

    /// Walk every top-level layer of `root`, starting from an empty prefix.
    ///
    /// # Errors
    ///
    /// - [`Error::RouterRegistration`] when a sub-router has no registered mount path.
    /// - [`Error::WildcardPath`] when a documented route uses a wildcard.
    /// - [`Error::PathSyntax`] when a documented route path cannot be tokenized.
    ///
    /// Operations recorded before the error stay in the document.
    pub fn walk(&mut self, root: &Router) -> Result<()> {
        debug!(
            "Walking router `{}` ({} layers)",
            root.name(),
            root.stack().len()
        );
        for layer in root.stack() {
            self.process_layer("", layer)?;
        }
        Ok(())
    }

    fn process_layer(&mut self, prefix: &str, layer: &RouteLayer) -> Result<()> {
        debug!("Visiting layer `{}` at `{}`", layer.name, prefix);

        if let (LayerHandle::Handler(handler), Some(method)) = (&layer.handle, layer.method) {
            self.record(*handler, method, prefix, &layer.name)?;
        }

        if let LayerHandle::Router(router) = &layer.handle {
            let mount = self
                .registry
                .resolve_mount(router.id())
                .ok_or_else(|| Error::RouterRegistration {
                    name: router.name().to_string(),
                    path: prefix.to_string(),
                    stack_size: router.stack().len(),
                })?
                .to_string();
            let nested = format!("{}{}", prefix, mount);
            debug!("Entering router `{}` mounted at `{}`", router.name(), nested);
            for child in router.stack() {
                self.process_layer(&nested, child)?;
            }
        }

        if let Some(route) = &layer.route {
            match &route.path {
                RoutePath::Single(path) => {
                    let nested = format!("{}{}", prefix, path);
                    for child in &route.stack {
                        self.process_layer(&nested, child)?;
                    }
                }
                RoutePath::Many(paths) => {
                    let target = route.stack.iter().find(|child| match child.handle {
                        LayerHandle::Handler(id) => self.registry.lookup(id).is_some(),
                        LayerHandle::Router(_) => false,
                    });
                    match target {
                        Some(target) => {
                            debug!(
                                "Route `{}` fans out to {} paths via `{}`",
                                layer.name,
                                paths.len(),
                                target.name
                            );
                            for path in paths {
                                let nested = format!("{}{}", prefix, path);
                                self.process_layer(&nested, target)?;
                            }
                        }
                        None => warn!(
                            "No documented handler behind {:?} under `{}`",
                            paths, prefix
                        ),
                    }
                }
            }
        }

        Ok(())
    }

    fn record(
        &mut self,
        handler: HandlerId,
        method: HttpMethod,
        prefix: &str,
        name: &str,
    ) -> Result<()> {
        let Some(declared) = self.registry.lookup(handler) else {
            return Ok(());
        };

        let full_path = self.document_path(prefix);
        let translated = path_template::translate(&full_path, name, &declared.parameters)?;

        let mut operation: Operation = declared.clone();
        operation.parameters =
            merge_parameters(translated.parameters, &declared.parameters, &translated.path);

        debug!(
            "Recording {} {} (handler `{}`)",
            method.as_str().to_uppercase(),
            translated.path,
            name
        );
        self.document
            .insert_operation(translated.path, method, operation.clone());
        self.registry.register(handler, operation);
        Ok(())
    }

    fn document_path(&self, prefix: &str) -> String {
        let stripped = if self.base_path == "/" {
            prefix
        } else {
            // Only strip on a segment boundary: `/api` is not a prefix of `/apiary`
            prefix
                .strip_prefix(self.base_path)
                .filter(|rest| rest.is_empty() || rest.starts_with('/'))
                .unwrap_or(prefix)
        };

        if stripped.is_empty() {
            "/".to_string()
        } else {
            stripped.to_string()
        }
    }
}

/// Resolved path parameters first, then every declared non-path parameter.
fn merge_parameters(
    resolved: Vec<Parameter>,
    declared: &[Parameter],
    path: &str,
) -> Vec<Parameter> {
    let mut parameters = resolved;
    for parameter in declared {
        if parameter.location != ParameterLocation::Path {
            parameters.push(parameter.clone());
        } else if !parameters.iter().any(|p| p.name == parameter.name) {
            debug!(
                "Dropping declared path parameter `{}` absent from {}",
                parameter.name, path
            );
        }
    }
    parameters
}
