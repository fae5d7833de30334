//! Per-request view state fed by the two concurrent lookups.

use log::{debug, error, warn};
use rsvp_shared::directory::InvitationDirectory;
use rsvp_shared::models::{PartyLookup, StatusLookup};
use rsvp_shared::summary::{summarize, ConfirmationSummary};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DetailsSession {
    display_name: String,
    name_from_link: bool,
    seats: u32,
    summary: Option<ConfirmationSummary>,
    cancelled: bool,
}

impl DetailsSession {
    pub fn new(link_name: Option<&str>) -> Self {
        let link_name = link_name.map(str::trim).filter(|n| !n.is_empty());
        Self {
            display_name: link_name.unwrap_or_default().to_string(),
            name_from_link: link_name.is_some(),
            seats: 1,
            summary: None,
            cancelled: false,
        }
    }

    pub fn apply_party(&mut self, lookup: PartyLookup) {
        if self.cancelled {
            debug!("Discarding party lookup for cancelled session");
            return;
        }
        let Some(party) = lookup.into_party() else {
            return;
        };

        self.seats = party.seat_count();

        // An already computed summary keeps the fallback name it was built with.
        if !self.name_from_link {
            if let Some(name) = party.display_name {
                self.display_name = name;
            }
        }
    }

    pub fn apply_status(&mut self, lookup: StatusLookup) {
        if self.cancelled {
            debug!("Discarding status lookup for cancelled session");
            return;
        }
        if self.summary.is_some() {
            return;
        }
        let Some(status) = lookup.into_status() else {
            return;
        };

        let fallback_name = status
            .name
            .clone()
            .unwrap_or_else(|| self.display_name.clone());
        self.summary = Some(summarize(&status, &fallback_name));
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn seats(&self) -> u32 {
        self.seats
    }

    pub fn summary(&self) -> Option<&ConfirmationSummary> {
        self.summary.as_ref()
    }
}

/// Runs the party and status lookups concurrently, applying each result as it
/// arrives. Lookups still pending when `timeout` elapses are abandoned.
pub async fn load_session<D>(
    directory: &D,
    token: &str,
    link_name: Option<&str>,
    timeout: Duration,
) -> DetailsSession
where
    D: InvitationDirectory + ?Sized,
{
    let mut session = DetailsSession::new(link_name);

    let party = directory.fetch_party(token);
    let status = directory.fetch_status(token);
    let deadline = tokio::time::sleep(timeout);
    tokio::pin!(party, status, deadline);

    let mut party_done = false;
    let mut status_done = false;

    while !(party_done && status_done) {
        tokio::select! {
            result = &mut party, if !party_done => {
                party_done = true;
                match result {
                    Ok(lookup) => session.apply_party(lookup),
                    Err(e) => error!("Failed to load party for token={}: {}", token, e),
                }
            }
            result = &mut status, if !status_done => {
                status_done = true;
                match result {
                    Ok(lookup) => session.apply_status(lookup),
                    Err(e) => error!("Failed to load RSVP status for token={}: {}", token, e),
                }
            }
            _ = &mut deadline => {
                warn!(
                    "Lookups for token={} timed out after {:?} (party_done={}, status_done={})",
                    token, timeout, party_done, status_done
                );
                session.cancel();
                break;
            }
        }
    }

    session
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsvp_shared::test_utils::mock_directory::MockInvitationDirectory;
    use serde_json::json;

    fn party(value: serde_json::Value) -> PartyLookup {
        serde_json::from_value(value).unwrap()
    }

    fn status(value: serde_json::Value) -> StatusLookup {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_party_sets_seats_and_name() {
        let mut session = DetailsSession::new(None);
        session.apply_party(party(json!({
            "ok": true,
            "party": { "members": ["Ana", ""], "allowedExtra": 1, "displayName": "Familia Pérez" }
        })));
        assert_eq!(session.seats(), 2);
        assert_eq!(session.display_name(), "Familia Pérez");
    }

    #[test]
    fn test_link_name_wins_over_party_name() {
        let mut session = DetailsSession::new(Some("Tía Carmen"));
        session.apply_party(party(json!({
            "ok": true,
            "party": { "members": ["Carmen"], "displayName": "Familia Pérez" }
        })));
        assert_eq!(session.display_name(), "Tía Carmen");
    }

    #[test]
    fn test_party_name_does_not_rewrite_summary() {
        let mut session = DetailsSession::new(None);
        session.apply_status(status(json!({ "ok": true, "status": { "answer": "si" } })));
        session.apply_party(party(json!({
            "ok": true,
            "party": { "members": ["Ana", "Luis"], "displayName": "Familia Pérez" }
        })));

        assert_eq!(session.display_name(), "Familia Pérez");
        assert_eq!(session.seats(), 2);
        assert!(session.summary().unwrap().members.is_empty());
    }

    #[test]
    fn test_status_uses_display_name_as_fallback() {
        let mut session = DetailsSession::new(Some("Tía Carmen"));
        session.apply_status(status(json!({ "ok": true, "status": { "answer": "sí" } })));

        let summary = session.summary().unwrap();
        assert_eq!(summary.members[0].name, "Tía Carmen");
        assert_eq!(summary.confirmed, 1);
    }

    #[test]
    fn test_first_summary_is_kept() {
        let mut session = DetailsSession::new(None);
        session.apply_status(status(json!({ "ok": true, "status": { "name": "Ana", "answer": "si" } })));
        session.apply_status(status(json!({ "ok": true, "status": { "name": "Luis", "answer": "no" } })));
        assert_eq!(session.summary().unwrap().members[0].name, "Ana");
    }

    #[test]
    fn test_cancelled_session_ignores_results() {
        let mut session = DetailsSession::new(None);
        session.cancel();
        session.apply_party(party(json!({ "ok": true, "party": { "members": ["A", "B", "C"] } })));
        session.apply_status(status(json!({ "ok": true, "status": { "name": "Ana" } })));

        assert_eq!(session.seats(), 1);
        assert!(session.summary().is_none());
    }

    #[test]
    fn test_failed_envelopes_leave_defaults() {
        let mut session = DetailsSession::new(None);
        session.apply_party(party(json!({ "ok": false })));
        session.apply_status(status(json!({ "ok": true })));
        assert_eq!(session.seats(), 1);
        assert!(session.summary().is_none());
    }

    #[tokio::test]
    async fn test_load_applies_party_name_before_late_status() {
        let directory = MockInvitationDirectory::new()
            .with_party("tok", json!({ "ok": true, "party": { "members": ["Ana"], "displayName": "Ana López" } }))
            .with_status("tok", json!({ "ok": true, "status": { "answer": "si" } }))
            .with_status_delay(Duration::from_millis(50));

        let session = load_session(&directory, "tok", None, Duration::from_secs(5)).await;
        assert_eq!(session.display_name(), "Ana López");
        assert_eq!(session.summary().unwrap().members[0].name, "Ana López");
    }

    #[tokio::test]
    async fn test_load_keeps_fallback_when_status_first() {
        let directory = MockInvitationDirectory::new()
            .with_party("tok", json!({ "ok": true, "party": { "members": ["Ana"], "displayName": "Ana López" } }))
            .with_status("tok", json!({ "ok": true, "status": { "answer": "si" } }))
            .with_party_delay(Duration::from_millis(50));

        let session = load_session(&directory, "tok", None, Duration::from_secs(5)).await;
        assert_eq!(session.display_name(), "Ana López");
        assert!(session.summary().unwrap().members.is_empty());
    }

    #[tokio::test]
    async fn test_load_survives_failures() {
        let directory = MockInvitationDirectory::new()
            .with_failing_party("tok")
            .with_failing_status("tok");

        let session = load_session(&directory, "tok", Some("Ana"), Duration::from_secs(5)).await;
        assert_eq!(session.display_name(), "Ana");
        assert_eq!(session.seats(), 1);
        assert!(session.summary().is_none());
    }

    #[tokio::test]
    async fn test_load_times_out() {
        let directory = MockInvitationDirectory::new()
            .with_party("tok", json!({ "ok": true, "party": { "members": ["A", "B"] } }))
            .with_status("tok", json!({ "ok": true, "status": { "name": "Ana" } }))
            .with_status_delay(Duration::from_secs(30));

        let session = load_session(&directory, "tok", None, Duration::from_millis(100)).await;
        assert_eq!(session.seats(), 2);
        assert!(session.summary().is_none());
    }
}
