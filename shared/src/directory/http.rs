use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{debug, error, info};
use reqwest::Client;
use serde::de::DeserializeOwned;

use super::{DirectoryError, InvitationDirectory};
use crate::models::{PartyLookup, StatusLookup};

const PARTY_PATH: &str = "/api/party";
const STATUS_PATH: &str = "/api/rsvp-status";

/// Talks to the invitation site's JSON endpoints.
#[derive(Clone)]
pub struct HttpInvitationDirectory {
    client: Client,
    base_url: String,
}

impl HttpInvitationDirectory {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!("Invitation directory using base URL: {}", base_url);
        Self { client, base_url }
    }

    async fn get_json<T>(&self, path: &str, token: &str) -> Result<T, DirectoryError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} for token={}", url, token);

        let response = self
            .client
            .get(&url)
            .query(&[("token", token)])
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                error!("Request to {} failed: {}", url, e);
                DirectoryError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("{} returned error status {}: {}", url, status, body);
            return Err(DirectoryError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        response.json::<T>().await.map_err(|e| {
            error!("Failed to parse response from {}: {}", url, e);
            DirectoryError::Decode(e.to_string())
        })
    }
}

#[async_trait]
impl InvitationDirectory for HttpInvitationDirectory {
    async fn fetch_party(&self, token: &str) -> Result<PartyLookup, DirectoryError> {
        self.get_json(PARTY_PATH, token).await
    }

    async fn fetch_status(&self, token: &str) -> Result<StatusLookup, DirectoryError> {
        self.get_json(STATUS_PATH, token).await
    }

    async fn fetch_asset(&self, url: &str) -> Option<String> {
        let response = match self.client.get(url).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                error!("Asset {} returned status {}", url, response.status());
                return None;
            }
            Err(e) => {
                error!("Failed to fetch asset {}: {}", url, e);
                return None;
            }
        };

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();

        match response.bytes().await {
            Ok(bytes) => Some(format!("data:{};base64,{}", content_type, STANDARD.encode(&bytes))),
            Err(e) => {
                error!("Failed to read asset {}: {}", url, e);
                None
            }
        }
    }
}
