use chrono::{DateTime, Utc};
use rsvp_shared::summary::ConfirmationSummary;
use serde::{Deserialize, Serialize};

// Request DTOs
#[derive(Deserialize, Debug, Default)]
pub struct DetailsQuery {
    /// Display name carried in the invitation link.
    pub n: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct DeadlineQuery {
    pub token: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TicketRequest {
    pub credential_image: String,
}

// Response DTOs
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DeadlineResponse {
    pub cutoff: DateTime<Utc>,
    pub label: &'static str,
    pub extended: bool,
    pub passed: bool,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DetailsResponse {
    pub display_name: String,
    pub seats: u32,
    pub deadline: DeadlineResponse,
    pub confirmed: bool,
    pub summary: Option<ConfirmationSummary>,
    pub submitted_at_label: Option<String>,
    pub entry_credential: String,
    pub calendar_url: String,
}
