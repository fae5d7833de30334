//! Confirmation cutoffs.
//!
//! Every party gets the base cutoff unless its invitation token appears in the
//! extension allow-list, which is read once per process from
//! `RSVP_EXTENDED_TOKENS`.

use chrono::{DateTime, TimeZone, Utc};
use log::info;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashSet;
use std::env;

use crate::config::parse_token_list;

const BASE_DEADLINE_LABEL: &str = "15 de noviembre de 2025";
const EXTENDED_DEADLINE_LABEL: &str = "30 de noviembre de 2025";

static RESOLVER: Lazy<DeadlineResolver> = Lazy::new(DeadlineResolver::from_env);

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeadlineConfig {
    pub cutoff: DateTime<Utc>,
    pub label: &'static str,
    pub extended: bool,
}

impl DeadlineConfig {
    pub fn has_passed_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.cutoff
    }
}

#[derive(Debug, Clone)]
pub struct DeadlineResolver {
    base: DateTime<Utc>,
    extended: DateTime<Utc>,
    extension_tokens: HashSet<String>,
}

impl DeadlineResolver {
    pub fn new<I>(extension_tokens: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            base: cutoff(2025, 11, 16),
            extended: cutoff(2025, 12, 1),
            extension_tokens: extension_tokens.into_iter().collect(),
        }
    }

    pub fn from_env() -> Self {
        let tokens = env::var("RSVP_EXTENDED_TOKENS")
            .map(|raw| parse_token_list(&raw))
            .unwrap_or_default();
        info!("Loaded {} extended RSVP tokens", tokens.len());
        Self::new(tokens)
    }

    pub fn resolve(&self, token: Option<&str>) -> DeadlineConfig {
        match token {
            Some(token) if !token.is_empty() && self.extension_tokens.contains(token) => {
                DeadlineConfig {
                    cutoff: self.extended,
                    label: EXTENDED_DEADLINE_LABEL,
                    extended: true,
                }
            }
            _ => DeadlineConfig {
                cutoff: self.base,
                label: BASE_DEADLINE_LABEL,
                extended: false,
            },
        }
    }

    pub fn has_passed(&self, token: Option<&str>, now: DateTime<Utc>) -> bool {
        self.resolve(token).has_passed_at(now)
    }
}

// Both cutoffs fall at 06:00 UTC, i.e. midnight in Guatemala.
fn cutoff(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(year, month, day, 6, 0, 0).single() {
        Some(instant) => instant,
        None => unreachable!("cutoff {}-{}-{} is a valid UTC date", year, month, day),
    }
}

/// The resolver built from the environment on first use.
pub fn global_resolver() -> &'static DeadlineResolver {
    &RESOLVER
}

/// Resolves the cutoff for `token` against the process-wide allow-list.
pub fn resolve_deadline(token: Option<&str>) -> DeadlineConfig {
    RESOLVER.resolve(token)
}

pub fn has_deadline_passed(token: Option<&str>) -> bool {
    RESOLVER.has_passed(token, Utc::now())
}
