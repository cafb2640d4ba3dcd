use crate::document::Operation;
use crate::router::{HandlerId, RouterId};
use log::debug;
use std::collections::HashMap;

/// Side tables the walker consults while traversing.
///
/// - handler identity -> declared operation metadata
/// - router identity -> path prefix the router is mounted at
///
/// Operations are overwritten by the walker once their path parameters are resolved, so a
/// lookup after traversal returns the enriched operation rather than the original declaration.
#[derive(Debug, Default, Clone)]
pub struct HandlerRegistry {
    operations: HashMap<HandlerId, Operation>,
    mounts: HashMap<RouterId, String>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store (or overwrite) the operation documented by `handler`
    ///
    /// # Arguments
    ///
    /// * `handler` - Handler identity, as carried by router layers
    /// * `operation` - Operation metadata to associate with it
    pub fn register(&mut self, handler: HandlerId, operation: Operation) {
        if self.operations.insert(handler, operation).is_some() {
            debug!("Replaced operation for handler {:?}", handler);
        }
    }

    /// Operation declared for `handler`
    ///
    /// # Returns
    ///
    /// The registered operation, or `None` when the handler is plain middleware
    pub fn lookup(&self, handler: HandlerId) -> Option<&Operation> {
        self.operations.get(&handler)
    }

    /// Record where `router` is mounted. The last registration wins.
    ///
    /// # Arguments
    ///
    /// * `router` - Identity of the mounted router
    /// * `path` - Mount path, in framework syntax
    pub fn register_mount(&mut self, router: RouterId, path: impl Into<String>) {
        let path = path.into();
        if let Some(previous) = self.mounts.insert(router, path.clone()) {
            debug!(
                "Mount path for router {:?} changed from {} to {}",
                router, previous, path
            );
        }
    }

    /// Mount path registered for `router`
    ///
    /// # Returns
    ///
    /// The path, or `None` when the router was never registered; the walker treats that as an
    /// error
    pub fn resolve_mount(&self, router: RouterId) -> Option<&str> {
        self.mounts.get(&router).map(String::as_str)
    }

    /// Number of handlers with a registered operation
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Number of routers with a registered mount path
    pub fn mount_count(&self) -> usize {
        self.mounts.len()
    }
}
