//! Entry credential carried by the scannable code.
//!
//! Wire format: compact JSON with keys in the order `type`, `event`, `name`,
//! `seats`, `token`, `hash` (the last only when known), UTF-8 encoded, then
//! standard base64 with padding.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::error;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::GUEST_PLACEHOLDER;

pub const ENTRY_TYPE: &str = "wedding-entry";

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Credential is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Credential is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Credential is not a valid entry payload: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct EntryPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub event: String,
    pub name: String,
    pub seats: u32,
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

pub fn build_payload(
    event_id: &str,
    name: &str,
    seats: u32,
    token: Option<&str>,
    summary_hash: Option<&str>,
) -> EntryPayload {
    EntryPayload {
        kind: ENTRY_TYPE.to_string(),
        event: event_id.to_string(),
        name: if name.is_empty() {
            GUEST_PLACEHOLDER.to_string()
        } else {
            name.to_string()
        },
        seats,
        token: token.filter(|t| !t.is_empty()).map(str::to_string),
        hash: summary_hash.filter(|h| !h.is_empty()).map(str::to_string),
    }
}

pub fn encode(payload: &EntryPayload) -> String {
    match serde_json::to_string(payload) {
        Ok(json) => STANDARD.encode(json.as_bytes()),
        Err(e) => {
            error!("Failed to serialize entry payload: {}", e);
            String::new()
        }
    }
}

/// Inverse of [`encode`]. Does not check that the payload belongs to this event.
pub fn decode(encoded: &str) -> Result<EntryPayload, CredentialError> {
    let bytes = STANDARD.decode(encoded.trim())?;
    let json = String::from_utf8(bytes)?;
    Ok(serde_json::from_str(&json)?)
}
