//! Application state shared across handlers

use std::sync::Arc;

use crate::rates::RateGateway;
use crate::storage::Store;

/// Application state shared across handlers
///
/// The store backend is chosen once at startup and injected here; handlers
/// only ever see the trait object.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub rate_gateway: RateGateway,
}
