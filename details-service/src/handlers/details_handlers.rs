use axum::{
    extract::{Path, Query, State},
    Json,
};
use log::info;
use rsvp_shared::credential::{build_payload, encode};
use rsvp_shared::directory::InvitationDirectory;
use rsvp_shared::summary::format_submitted_at;
use rsvp_shared::ticket::{CredentialImage, TicketDocument, TicketRenderer};
use std::sync::Arc;
use std::time::Duration;

use super::AppState;
use crate::calendar::google_calendar_url;
use crate::error::{AppError, Result};
use crate::models::{DetailsQuery, DetailsResponse, TicketRequest};
use crate::session::{load_session, DetailsSession};

const MAX_TOKEN_LEN: usize = 128;

/// Tokens are matched exactly, so padded tokens are refused rather than trimmed.
fn validate_token(token: &str) -> Result<&str> {
    if token.is_empty() || token.len() > MAX_TOKEN_LEN {
        return Err(AppError::bad_request(format!(
            "Invalid invitation token: must be 1-{} characters",
            MAX_TOKEN_LEN
        )));
    }
    if token.trim() != token {
        return Err(AppError::bad_request(
            "Invalid invitation token: surrounding whitespace".to_string(),
        ));
    }
    Ok(token)
}

async fn load<D>(state: &AppState<D>, token: &str, query: &DetailsQuery) -> DetailsSession
where
    D: InvitationDirectory,
{
    load_session(
        state.directory.as_ref(),
        token,
        query.n.as_deref(),
        Duration::from_millis(state.config.lookup_timeout_ms),
    )
    .await
}

// GET /invitations/:token/details
pub async fn get_details<D>(
    State(state): State<Arc<AppState<D>>>,
    Path(token): Path<String>,
    Query(query): Query<DetailsQuery>,
) -> Result<Json<DetailsResponse>>
where
    D: InvitationDirectory,
{
    let token = validate_token(&token)?;
    let session = load(&state, token, &query).await;
    let summary = session.summary().cloned();

    let payload = build_payload(
        state.event.event_id,
        session.display_name(),
        session.seats(),
        Some(token),
        summary.as_ref().and_then(|s| s.hash.as_deref()),
    );

    info!(
        "Details for token={}: seats={}, confirmed={}",
        token,
        session.seats(),
        summary.is_some()
    );

    Ok(Json(DetailsResponse {
        display_name: session.display_name().to_string(),
        seats: session.seats(),
        deadline: state.resolver.resolve(Some(token)).into(),
        confirmed: summary.is_some(),
        submitted_at_label: summary
            .as_ref()
            .and_then(|s| s.submitted_at.as_deref())
            .and_then(format_submitted_at),
        summary,
        entry_credential: encode(&payload),
        calendar_url: google_calendar_url(&state.event),
    }))
}

// POST /invitations/:token/ticket
pub async fn create_ticket<D>(
    State(state): State<Arc<AppState<D>>>,
    Path(token): Path<String>,
    Query(query): Query<DetailsQuery>,
    Json(request): Json<TicketRequest>,
) -> Result<Json<TicketDocument>>
where
    D: InvitationDirectory,
{
    let token = validate_token(&token)?;

    if !request.credential_image.starts_with("data:image/") {
        return Err(AppError::bad_request(
            "credentialImage must be an image data URL".to_string(),
        ));
    }

    let session = load(&state, token, &query).await;

    let logo = match state.config.logo_url.as_deref() {
        Some(url) => state.directory.fetch_asset(url).await,
        None => None,
    };

    let credential = CredentialImage {
        data_url: request.credential_image,
    };
    let document = TicketRenderer::new(state.event.title)
        .with_logo(logo.as_deref())
        .render(
            &credential,
            session.display_name(),
            session.summary(),
            session.seats(),
        );

    info!(
        "Rendered ticket for token={} with {} elements",
        token,
        document.elements.len()
    );

    Ok(Json(document))
}
