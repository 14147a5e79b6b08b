use chrono::{Duration, NaiveDateTime};
use log::info;
use rand::Rng;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::domain::{Event, EventKind};

const DAY_START_HOUR: u32 = 9;
const MIN_LEAD_MINUTES: i64 = 5;
const MAX_LEAD_MINUTES: i64 = 90;

/// Decorator over the live event source for demo histories: inject a
/// synthetic HookedUp ahead of every resolution that lacks one.
///
/// The synthetic hook lands at a random instant between the boat's 09:00
/// day start and the resolution, and shares a correlation id with its
/// resolution so the pair can be matched explicitly instead of by FIFO
/// order. Duplicate correlation ids are rejected.
pub fn inject_synthetic_hookups(events: Vec<Event>) -> Vec<Event> {
    let mut rng = rand::thread_rng();
    inject_with(events, |max| rng.gen_range(MIN_LEAD_MINUTES..=max))
}

fn inject_with<F>(events: Vec<Event>, mut lead_minutes: F) -> Vec<Event>
where
    F: FnMut(i64) -> i64,
{
    let mut events: Vec<Event> = events
        .into_iter()
        .filter(|e| !is_angler_summary(&e.details))
        .collect();
    events.sort_by_key(|e| e.timestamp);

    let mut used_ids = HashSet::new();
    let mut synthetic = Vec::new();

    for event in events.iter_mut() {
        if !event.is_resolution() {
            continue;
        }

        let correlation = format!("{}_{}", event.uid, event.timestamp.format("%Y-%m-%dT%H:%M:%S"));
        if !used_ids.insert(correlation.clone()) {
            continue;
        }

        let hook_ts = synthetic_hook_time(event.timestamp, &mut lead_minutes);
        synthetic.push(Event {
            timestamp: hook_ts,
            kind: EventKind::HookedUp,
            boat: event.boat.clone(),
            uid: event.uid.clone(),
            details: "Hooked up!".to_string(),
            hookup_id: Some(correlation.clone()),
        });
        event.hookup_id = Some(correlation);
    }

    let injected = synthetic.len();
    events.extend(synthetic);
    events.sort_by_key(|e| e.timestamp);
    info!("Built {} demo events ({} synthetic hook-ups)", events.len(), injected);
    events
}

fn synthetic_hook_time<F>(resolution: NaiveDateTime, lead_minutes: &mut F) -> NaiveDateTime
where
    F: FnMut(i64) -> i64,
{
    let day_start = resolution
        .date()
        .and_hms_opt(DAY_START_HOUR, 0, 0)
        .unwrap_or(resolution);
    let lead = Duration::minutes(lead_minutes(MAX_LEAD_MINUTES));
    (resolution - lead).max(day_start)
}

/// Rows like "John Smith released ..." summarize an angler rather than
/// reporting a boat event; they are dropped before injection.
fn is_angler_summary(details: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"(?i)^[A-Z][a-z]+\s+[A-Z][a-z]+\s+(released|boated|weighed)").unwrap()
    });
    re.is_match(details)
}
