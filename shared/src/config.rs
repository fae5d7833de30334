use chrono::{DateTime, FixedOffset, TimeZone};
use std::env;

/// Placeholder used wherever a guest name is missing.
pub const GUEST_PLACEHOLDER: &str = "Invitado/a";

const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 8000;

/// Guatemala does not observe daylight saving time.
pub const EVENT_UTC_OFFSET_SECS: i32 = -6 * 3600;

/// Fixed facts about the single event this deployment serves.
#[derive(Debug, Clone)]
pub struct EventConfig {
    pub event_id: &'static str,
    pub title: &'static str,
    pub calendar_title: &'static str,
    pub calendar_details: &'static str,
    pub location: &'static str,
    pub starts_at: DateTime<FixedOffset>,
    pub ends_at: DateTime<FixedOffset>,
}

impl EventConfig {
    pub fn wedding() -> Self {
        Self {
            event_id: "boda-marielos-guillermo-2025",
            title: "Boda Marielos & Guillermo",
            calendar_title: "Boda de Marielos y Guillermo",
            calendar_details: "Te esperamos para celebrar con nosotros.",
            location: "San José Catedral y Hotel Soleil La Antigua",
            starts_at: event_time(2025, 12, 27, 16),
            ends_at: event_time(2025, 12, 28, 0),
        }
    }
}

fn event_time(year: i32, month: u32, day: u32, hour: u32) -> DateTime<FixedOffset> {
    match event_offset().with_ymd_and_hms(year, month, day, hour, 0, 0).single() {
        Some(instant) => instant,
        None => unreachable!("event time {}-{}-{} {}:00 is valid in a fixed offset", year, month, day, hour),
    }
}

pub fn event_offset() -> FixedOffset {
    match FixedOffset::east_opt(EVENT_UTC_OFFSET_SECS) {
        Some(offset) => offset,
        None => unreachable!("UTC-6 is within the valid offset range"),
    }
}

/// Runtime settings read from the environment.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub api_base_url: String,
    pub logo_url: Option<String>,
    pub lookup_timeout_ms: u64,
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        let api_base_url = env::var("RSVP_API_BASE_URL")
            .ok()
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let logo_url = env::var("TICKET_LOGO_URL")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let lookup_timeout_ms = env::var("LOOKUP_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_LOOKUP_TIMEOUT_MS);

        Self {
            api_base_url,
            logo_url,
            lookup_timeout_ms,
        }
    }
}

/// Splits a comma-separated token list, dropping blanks.
pub fn parse_token_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
