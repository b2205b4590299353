//! Application state for the web layer.

use std::sync::Arc;

use crate::idfm::TransitClient;
use crate::resolver::Resolver;
use crate::tables::LineTables;

/// Shared application state.
///
/// Holds the read-only table snapshot (through the resolver) and the
/// transit API client.
#[derive(Clone)]
pub struct AppState {
    /// Line and station resolver
    pub resolver: Arc<Resolver<TransitClient>>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(resolver: Resolver<TransitClient>) -> Self {
        Self {
            resolver: Arc::new(resolver),
        }
    }

    /// The line table snapshot.
    pub fn tables(&self) -> &LineTables {
        self.resolver.tables()
    }

    /// The transit API client.
    pub fn transit(&self) -> &TransitClient {
        self.resolver.source()
    }
}
