use std::sync::Arc;

use crate::services::catalog::CatalogSnapshot;

/// Shared application state
///
/// Everything a request reads is loaded before the server starts and never
/// written again, so the state is one reference-counted snapshot with no
/// lock around it. Each scoring run sees a single consistent version of the
/// catalogs and the keyword graph.
#[derive(Clone)]
pub struct AppState {
    pub catalogs: Arc<CatalogSnapshot>,
}

impl AppState {
    /// Wraps a loaded snapshot for sharing across requests
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        Self {
            catalogs: Arc::new(snapshot),
        }
    }
}
