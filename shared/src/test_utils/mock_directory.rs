use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::directory::{DirectoryError, InvitationDirectory};
use crate::models::{PartyLookup, StatusLookup};

#[derive(Clone)]
enum Canned<T> {
    Found(T),
    Fail,
}

/// In-memory directory with optional per-lookup delays, for ordering tests.
#[derive(Default)]
pub struct MockInvitationDirectory {
    parties: Mutex<HashMap<String, Canned<PartyLookup>>>,
    statuses: Mutex<HashMap<String, Canned<StatusLookup>>>,
    assets: Mutex<HashMap<String, String>>,
    party_delay: Mutex<Option<Duration>>,
    status_delay: Mutex<Option<Duration>>,
    status_calls: AtomicUsize,
}

impl MockInvitationDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_party(self, token: &str, party: serde_json::Value) -> Self {
        let lookup = serde_json::from_value(party).expect("invalid party lookup fixture");
        self.parties
            .lock()
            .unwrap()
            .insert(token.to_string(), Canned::Found(lookup));
        self
    }

    pub fn with_status(self, token: &str, status: serde_json::Value) -> Self {
        let lookup = serde_json::from_value(status).expect("invalid status lookup fixture");
        self.statuses
            .lock()
            .unwrap()
            .insert(token.to_string(), Canned::Found(lookup));
        self
    }

    pub fn with_failing_party(self, token: &str) -> Self {
        self.parties
            .lock()
            .unwrap()
            .insert(token.to_string(), Canned::Fail);
        self
    }

    pub fn with_failing_status(self, token: &str) -> Self {
        self.statuses
            .lock()
            .unwrap()
            .insert(token.to_string(), Canned::Fail);
        self
    }

    pub fn with_asset(self, url: &str, data_url: &str) -> Self {
        self.assets
            .lock()
            .unwrap()
            .insert(url.to_string(), data_url.to_string());
        self
    }

    pub fn with_party_delay(self, delay: Duration) -> Self {
        *self.party_delay.lock().unwrap() = Some(delay);
        self
    }

    pub fn with_status_delay(self, delay: Duration) -> Self {
        *self.status_delay.lock().unwrap() = Some(delay);
        self
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }
}

async fn pause(delay: Option<Duration>) {
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
}

fn answer<T: Default>(canned: Option<Canned<T>>, what: &str) -> Result<T, DirectoryError> {
    match canned {
        Some(Canned::Found(lookup)) => Ok(lookup),
        Some(Canned::Fail) => Err(DirectoryError::Transport(format!("mock {} lookup failed", what))),
        None => Ok(T::default()),
    }
}

#[async_trait]
impl InvitationDirectory for MockInvitationDirectory {
    async fn fetch_party(&self, token: &str) -> Result<PartyLookup, DirectoryError> {
        let delay = *self.party_delay.lock().unwrap();
        pause(delay).await;
        let canned = self.parties.lock().unwrap().get(token).cloned();
        answer(canned, "party")
    }

    async fn fetch_status(&self, token: &str) -> Result<StatusLookup, DirectoryError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.status_delay.lock().unwrap();
        pause(delay).await;
        let canned = self.statuses.lock().unwrap().get(token).cloned();
        answer(canned, "status")
    }

    async fn fetch_asset(&self, url: &str) -> Option<String> {
        self.assets.lock().unwrap().get(url).cloned()
    }
}
