use chrono::{DateTime, Datelike};
use serde::Serialize;

use crate::answer::{normalize_answer, YES};
use crate::config::event_offset;
use crate::models::{Member, RawRsvpRecord, StoredNote, StructuredNote};

const MONTHS_ES: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SummaryKind {
    Individual,
    Grupo,
}

/// Canonical view of a stored confirmation.
///
/// `guests` is whatever the store recorded, while `confirmed` is always
/// recomputed from members and extras. The two may disagree.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationSummary {
    #[serde(rename = "type")]
    pub kind: SummaryKind,
    pub submitted_at: Option<String>,
    pub note: Option<String>,
    pub guests: u32,
    pub confirmed: u32,
    pub confirmed_members: u32,
    pub members: Vec<Member>,
    pub extras: Vec<String>,
    pub hash: Option<String>,
}

pub fn summarize(record: &RawRsvpRecord, fallback_name: &str) -> ConfirmationSummary {
    let note = StoredNote::parse(record.note.as_ref());
    let structured = match &note {
        StoredNote::Structured(structured) => Some(structured),
        _ => None,
    };

    let mut members: Vec<Member> = structured
        .and_then(|n| n.members.as_ref())
        .map(|entries| {
            entries
                .iter()
                .map(|entry| Member {
                    name: entry
                        .name
                        .clone()
                        .unwrap_or_else(|| fallback_name.to_string()),
                    answer: normalize_answer(entry.answer.as_deref()),
                })
                .collect()
        })
        .unwrap_or_default();

    if members.is_empty() {
        let name = record
            .name
            .as_deref()
            .or_else(|| Some(fallback_name).filter(|n| !n.is_empty()));
        if let Some(name) = name {
            members.push(Member {
                name: name.to_string(),
                answer: normalize_answer(record.answer.as_deref()),
            });
        }
    }

    let extras = structured.map(|n| n.extras.clone()).unwrap_or_default();
    let comment = summary_comment(&note, structured);

    let confirmed_members = members
        .iter()
        .filter(|m| normalize_answer(Some(&m.answer)) == YES)
        .count() as u32;
    let confirmed = confirmed_members + extras.len() as u32;
    let guests = record.guests.unwrap_or(confirmed);

    ConfirmationSummary {
        kind: if members.len() > 1 {
            SummaryKind::Grupo
        } else {
            SummaryKind::Individual
        },
        submitted_at: record
            .received_at
            .clone()
            .or_else(|| record.timestamp.clone()),
        note: comment,
        guests,
        confirmed,
        confirmed_members,
        members,
        extras,
        hash: record.entry_hash.clone(),
    }
}

fn summary_comment(note: &StoredNote, structured: Option<&StructuredNote>) -> Option<String> {
    let from_structured = structured
        .and_then(|n| n.comment.as_deref())
        .map(str::trim)
        .filter(|c| !c.is_empty());

    match (from_structured, note) {
        (Some(comment), _) => Some(comment.to_string()),
        (None, StoredNote::Plain(text)) => {
            let trimmed = text.trim();
            // Blank text is kept exactly as stored.
            Some(if trimmed.is_empty() { text.clone() } else { trimmed.to_string() })
        }
        _ => None,
    }
}

/// Renders `submitted_at` in event-local time, e.g. `16 nov 2025, 14:05`.
pub fn format_submitted_at(submitted_at: &str) -> Option<String> {
    let parsed = DateTime::parse_from_rfc3339(submitted_at).ok()?;
    let local = parsed.with_timezone(&event_offset());
    Some(format!(
        "{} {} {}, {}",
        local.day(),
        MONTHS_ES[local.month0() as usize],
        local.year(),
        local.format("%H:%M")
    ))
}
