use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use log::debug;
use rsvp_shared::deadline::DeadlineConfig;
use rsvp_shared::directory::InvitationDirectory;
use std::sync::Arc;

use super::AppState;
use crate::models::{DeadlineQuery, DeadlineResponse};

impl From<DeadlineConfig> for DeadlineResponse {
    fn from(config: DeadlineConfig) -> Self {
        Self {
            passed: config.has_passed_at(Utc::now()),
            cutoff: config.cutoff,
            label: config.label,
            extended: config.extended,
        }
    }
}

// GET /deadline?token=
pub async fn get_deadline<D>(
    State(state): State<Arc<AppState<D>>>,
    Query(query): Query<DeadlineQuery>,
) -> Json<DeadlineResponse>
where
    D: InvitationDirectory,
{
    let config = state.resolver.resolve(query.token.as_deref());
    debug!(
        "Resolved deadline for token={:?}: extended={}",
        query.token, config.extended
    );
    Json(config.into())
}
