pub mod deadline_handlers;
pub mod details_handlers;

use rsvp_shared::config::{EventConfig, ServiceConfig};
use rsvp_shared::deadline::DeadlineResolver;
use std::sync::Arc;

/// Shared state for every route.
pub struct AppState<D> {
    pub directory: Arc<D>,
    pub resolver: DeadlineResolver,
    pub event: EventConfig,
    pub config: ServiceConfig,
}
