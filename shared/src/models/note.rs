use serde_json::{Map, Value};

use super::value_text;

/// The `note` field of a stored RSVP, resolved into one of its known shapes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StoredNote {
    #[default]
    Empty,
    /// Free text left by the guest.
    Plain(String),
    /// Group confirmation written by the RSVP form.
    Structured(StructuredNote),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StructuredNote {
    /// `None` when the note carries no `members` array at all.
    pub members: Option<Vec<NoteMember>>,
    /// One entry per array element; `null` and non-text blanks become `""`.
    pub extras: Vec<String>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NoteMember {
    pub name: Option<String>,
    pub answer: Option<String>,
}

impl StoredNote {
    /// Never fails: text that is not a JSON object is kept as a plain comment,
    /// and non-text, non-object values are ignored.
    pub fn parse(raw: Option<&Value>) -> Self {
        match raw {
            None | Some(Value::Null) => StoredNote::Empty,
            Some(Value::String(text)) if text.is_empty() => StoredNote::Empty,
            Some(Value::String(text)) => match serde_json::from_str::<Value>(text) {
                Ok(Value::Object(fields)) => StoredNote::Structured(StructuredNote::from_map(&fields)),
                _ => StoredNote::Plain(text.clone()),
            },
            Some(Value::Object(fields)) => StoredNote::Structured(StructuredNote::from_map(fields)),
            Some(_) => StoredNote::Empty,
        }
    }
}

impl StructuredNote {
    fn from_map(fields: &Map<String, Value>) -> Self {
        let members = match fields.get("members") {
            Some(Value::Array(items)) => Some(items.iter().map(NoteMember::from_value).collect()),
            _ => None,
        };

        let extras = match fields.get("extras") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| value_text(item).unwrap_or_default())
                .collect(),
            _ => Vec::new(),
        };

        let comment = match fields.get("comment") {
            Some(Value::String(text)) => Some(text.clone()),
            _ => None,
        };

        Self {
            members,
            extras,
            comment,
        }
    }
}

impl NoteMember {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(fields) => Self {
                name: fields.get("name").and_then(value_text),
                answer: fields.get("answer").and_then(value_text),
            },
            _ => Self::default(),
        }
    }
}
