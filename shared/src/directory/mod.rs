use async_trait::async_trait;
use thiserror::Error;

use crate::models::{PartyLookup, StatusLookup};

pub mod http;

pub use http::HttpInvitationDirectory;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Unexpected response status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// Source of party and RSVP records for an invitation token.
#[async_trait]
pub trait InvitationDirectory: Send + Sync {
    async fn fetch_party(&self, token: &str) -> Result<PartyLookup, DirectoryError>;

    async fn fetch_status(&self, token: &str) -> Result<StatusLookup, DirectoryError>;

    /// Downloads a static asset as a `data:` URL. Failures yield `None`.
    async fn fetch_asset(&self, url: &str) -> Option<String>;
}
