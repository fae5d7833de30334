use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub mod note;

pub use note::{NoteMember, StoredNote, StructuredNote};

/// A party member with an already normalized answer.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub answer: String,
}

/// RSVP record as kept by the external store. Only the fields read here are
/// modelled, and each one tolerates being absent or oddly typed.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawRsvpRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub answer: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub guests: Option<u32>,
    #[serde(default)]
    pub note: Option<Value>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub received_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub entry_hash: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    #[serde(default, deserialize_with = "lenient_list")]
    pub members: Vec<Value>,
    #[serde(default, deserialize_with = "numeric_count")]
    pub allowed_extra: Option<u32>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub display_name: Option<String>,
}

impl Party {
    /// Seats held for the party: listed members plus allowed extras, at least one.
    pub fn seat_count(&self) -> u32 {
        let members = self.members.iter().filter(|m| is_truthy(m)).count() as u32;
        let total = members + self.allowed_extra.unwrap_or(0);
        total.max(1)
    }
}

/// Envelope returned by the party lookup endpoint.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct PartyLookup {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub party: Option<Party>,
}

/// Envelope returned by the RSVP status endpoint.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct StatusLookup {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub status: Option<RawRsvpRecord>,
}

impl PartyLookup {
    pub fn into_party(self) -> Option<Party> {
        if self.ok {
            self.party
        } else {
            None
        }
    }
}

impl StatusLookup {
    pub fn into_status(self) -> Option<RawRsvpRecord> {
        if self.ok {
            self.status
        } else {
            None
        }
    }
}

/// Empty strings, `null`, `false`, zero and NaN count as "not there".
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Text form of a scalar JSON value; `null` and empty strings yield `None`.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_text))
}

/// Counts must be JSON numbers. Fractions truncate and negatives count as absent.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64().and_then(count_from_f64),
        _ => None,
    })
}

/// Like [`lenient_count`], but numeric text such as `"3"` is accepted too.
/// Blank text is zero.
fn numeric_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64().and_then(count_from_f64),
        Some(Value::String(s)) if s.trim().is_empty() => Some(0),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().and_then(count_from_f64),
        _ => None,
    })
}

fn count_from_f64(f: f64) -> Option<u32> {
    if f.is_finite() && f >= 0.0 {
        Some(f.min(u32::MAX as f64) as u32)
    } else {
        None
    }
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_seat_count_skips_empty_members() {
        let party: Party = serde_json::from_value(json!({
            "members": ["Ana", ""],
            "allowedExtra": 1
        }))
        .unwrap();
        assert_eq!(party.seat_count(), 2);
    }

    #[test]
    fn test_seat_count_floors_at_one() {
        let party: Party = serde_json::from_value(json!({ "members": [] })).unwrap();
        assert_eq!(party.seat_count(), 1);

        let party: Party = serde_json::from_value(json!({
            "members": [null, "", false],
            "allowedExtra": "dos"
        }))
        .unwrap();
        assert_eq!(party.allowed_extra, None);
        assert_eq!(party.seat_count(), 1);
    }

    #[test]
    fn test_seat_count_accepts_numeric_text_extras() {
        let party: Party = serde_json::from_value(json!({
            "members": ["Ana"],
            "allowedExtra": "3"
        }))
        .unwrap();
        assert_eq!(party.allowed_extra, Some(3));
        assert_eq!(party.seat_count(), 4);

        let party: Party = serde_json::from_value(json!({
            "members": ["Ana", "Luis"],
            "allowedExtra": " "
        }))
        .unwrap();
        assert_eq!(party.seat_count(), 2);
    }

    #[test]
    fn test_guests_must_be_a_non_negative_number() {
        let guests = |raw: serde_json::Value| {
            serde_json::from_value::<RawRsvpRecord>(json!({ "guests": raw }))
                .unwrap()
                .guests
        };
        assert_eq!(guests(json!(0)), Some(0));
        assert_eq!(guests(json!(2.5)), Some(2));
        assert_eq!(guests(json!(-1)), None);
        assert_eq!(guests(json!("3")), None);
    }

    #[test]
    fn test_seat_count_counts_object_members() {
        let party: Party = serde_json::from_value(json!({
            "members": [{"name": "Ana"}, {"name": "Luis"}, "Marta"],
            "allowedExtra": 2,
            "displayName": "Familia Pérez"
        }))
        .unwrap();
        assert_eq!(party.seat_count(), 5);
        assert_eq!(party.display_name.as_deref(), Some("Familia Pérez"));
    }

    #[test]
    fn test_record_tolerates_odd_types() {
        let record: RawRsvpRecord = serde_json::from_value(json!({
            "name": "Ana",
            "answer": true,
            "guests": "3",
            "receivedAt": "",
            "timestamp": "2025-11-02T20:05:00Z",
            "entryHash": null
        }))
        .unwrap();
        assert_eq!(record.name.as_deref(), Some("Ana"));
        assert_eq!(record.answer.as_deref(), Some("true"));
        assert_eq!(record.guests, None);
        assert_eq!(record.received_at, None);
        assert_eq!(record.timestamp.as_deref(), Some("2025-11-02T20:05:00Z"));
        assert_eq!(record.entry_hash, None);
    }

    #[test]
    fn test_lookup_envelopes_require_ok() {
        let lookup: StatusLookup = serde_json::from_value(json!({
            "ok": false,
            "status": { "name": "Ana" }
        }))
        .unwrap();
        assert!(lookup.into_status().is_none());

        let lookup: PartyLookup = serde_json::from_value(json!({ "ok": true })).unwrap();
        assert!(lookup.into_party().is_none());
    }
}
