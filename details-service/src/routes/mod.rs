use axum::{
    extract::Request,
    middleware,
    routing::{get, post},
    Router,
};
use log::{info, warn};
use rsvp_shared::config::{EventConfig, ServiceConfig};
use rsvp_shared::deadline::global_resolver;
use rsvp_shared::directory::{HttpInvitationDirectory, InvitationDirectory};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::handlers::{
    deadline_handlers::get_deadline,
    details_handlers::{create_ticket, get_details},
    AppState,
};

/// Creates a router backed by the invitation site's HTTP endpoints
pub fn create_router() -> Router {
    let config = ServiceConfig::from_env();
    info!("Creating router with HTTP directory at {}", config.api_base_url);

    let directory = Arc::new(HttpInvitationDirectory::new(config.api_base_url.clone()));

    // Check if we should remove the base path prefix
    let remove_base_path = std::env::var("REMOVE_BASE_PATH")
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(false);

    let prefix = if remove_base_path { "" } else { "/Prod" };
    info!("Using API route prefix: {}", prefix);

    let state = AppState {
        directory,
        resolver: global_resolver().clone(),
        event: EventConfig::wedding(),
        config,
    };

    create_router_with_state(state, prefix)
}

/// Creates a router over a given directory implementation
pub fn create_router_with_state<D>(state: AppState<D>, prefix: &str) -> Router
where
    D: InvitationDirectory + 'static,
{
    info!("Setting up API routes with prefix: '{}'", prefix);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    async fn logging_middleware(
        req: Request,
        next: axum::middleware::Next,
    ) -> impl axum::response::IntoResponse {
        info!(
            "Router received request: method={}, uri={}",
            req.method(),
            req.uri()
        );
        next.run(req).await
    }

    let api_routes = Router::new()
        .route("/deadline", get(get_deadline))
        .route("/invitations/:token/details", get(get_details))
        .route("/invitations/:token/ticket", post(create_ticket))
        .with_state(Arc::new(state));

    let router = if prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(prefix, api_routes)
    };

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware))
        .fallback(|req: Request| async move {
            warn!("No route matched for: {} {}", req.method(), req.uri());
            AppError::not_found("The requested resource was not found".to_string())
        })
}
