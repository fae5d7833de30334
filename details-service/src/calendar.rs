use chrono::Utc;
use log::error;
use reqwest::Url;
use rsvp_shared::config::EventConfig;

const GOOGLE_CALENDAR_URL: &str = "https://calendar.google.com/calendar/render";

/// "Add to Google Calendar" link for the event window.
pub fn google_calendar_url(event: &EventConfig) -> String {
    let format = "%Y%m%dT%H%M%SZ";
    let dates = format!(
        "{}/{}",
        event.starts_at.with_timezone(&Utc).format(format),
        event.ends_at.with_timezone(&Utc).format(format)
    );

    let params = [
        ("action", "TEMPLATE"),
        ("text", event.calendar_title),
        ("dates", dates.as_str()),
        ("details", event.calendar_details),
        ("location", event.location),
    ];

    match Url::parse_with_params(GOOGLE_CALENDAR_URL, &params) {
        Ok(url) => url.to_string(),
        Err(e) => {
            error!("Failed to build calendar URL: {}", e);
            GOOGLE_CALENDAR_URL.to_string()
        }
    }
}
