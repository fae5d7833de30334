use unicode_normalization::UnicodeNormalization;

pub const YES: &str = "Sí";
pub const NO: &str = "No";

/// Comparison keys (lower-cased, accents stripped) that count as attending.
const AFFIRMATIVE_KEYS: &[&str] = &["si", "yes", "y"];
const NEGATIVE_KEYS: &[&str] = &["no", "n"];

/// Maps a free-form RSVP answer onto `"Sí"`, `"No"`, or the trimmed input.
///
/// Recognised tokens are matched case- and accent-insensitively. Anything else
/// is passed through trimmed but otherwise untouched, so `" Maybe "` comes back
/// as `"Maybe"`.
pub fn normalize_answer(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };
    let base = raw.trim();
    let key = comparison_key(base);

    if AFFIRMATIVE_KEYS.contains(&key.as_str()) {
        YES.to_string()
    } else if NEGATIVE_KEYS.contains(&key.as_str()) {
        NO.to_string()
    } else {
        base.to_string()
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    normalize_answer(Some(answer)) == YES
}

/// Answer as printed on a ticket: blank answers read as a decline.
pub fn readable_answer(answer: &str) -> &str {
    let trimmed = answer.trim();
    if is_affirmative(trimmed) {
        YES
    } else if trimmed.is_empty() || trimmed.to_lowercase() == "no" {
        NO
    } else {
        answer
    }
}

fn comparison_key(value: &str) -> String {
    value
        .to_lowercase()
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect()
}
