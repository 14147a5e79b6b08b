pub mod classify;
pub mod parser;

pub use classify::classify;
pub use parser::{parse_events, parse_feed_timestamp};

use std::collections::HashSet;

use crate::domain::Event;

/// Merge a page's events into the accumulated list, deduplicating on the
/// (uid, kind, timestamp) triple. Returns how many events were new; the
/// caller feeds that into the consecutive-empty stop tally.
pub fn merge_events(all: &mut Vec<Event>, page_events: Vec<Event>) -> usize {
    let mut seen: HashSet<_> = all.iter().map(Event::dedup_key).collect();
    let mut added = 0;

    for event in page_events {
        if seen.insert(event.dedup_key()) {
            all.push(event);
            added += 1;
        }
    }

    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EventKind;
    use chrono::NaiveDate;

    fn event(uid: &str, kind: EventKind, minute: u32) -> Event {
        Event {
            timestamp: NaiveDate::from_ymd_opt(2025, 6, 14)
                .unwrap()
                .and_hms_opt(14, minute, 0)
                .unwrap(),
            kind,
            boat: uid.to_string(),
            uid: uid.to_string(),
            details: String::new(),
            hookup_id: None,
        }
    }

    #[test]
    fn test_merge_dedups_on_triple() {
        let mut all = Vec::new();
        let added = merge_events(
            &mut all,
            vec![
                event("reel_tight", EventKind::Released, 5),
                event("reel_tight", EventKind::Released, 5),
            ],
        );
        assert_eq!(added, 1);

        // Overlapping re-scrape of the same page set adds nothing.
        let added = merge_events(&mut all, vec![event("reel_tight", EventKind::Released, 5)]);
        assert_eq!(added, 0);
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn test_merge_keeps_distinct_triples() {
        let mut all = Vec::new();
        merge_events(
            &mut all,
            vec![
                event("reel_tight", EventKind::Released, 5),
                event("reel_tight", EventKind::Boated, 5),
                event("reel_tight", EventKind::Released, 6),
                event("wave_dancer", EventKind::Released, 5),
            ],
        );
        assert_eq!(all.len(), 4);
    }
}
