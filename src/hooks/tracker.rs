use std::collections::{HashMap, HashSet, VecDeque};

use crate::domain::{Event, EventKind};

/// Derive the set of catch attempts still open ("currently hooked") from the
/// full event history.
///
/// Events are processed in ascending timestamp order. Each HookedUp pushes
/// onto its boat's FIFO queue; each resolution pops that boat's oldest open
/// entry. Resolutions with no open hook are discarded: they close a hook
/// opened before the observed history window. Returns the open hooks
/// newest-first.
pub fn active_hooks(events: &[Event]) -> Vec<Event> {
    let mut ordered: Vec<&Event> = events.iter().collect();
    ordered.sort_by_key(|e| e.timestamp);

    let mut open: HashMap<String, VecDeque<&Event>> = HashMap::new();

    for event in ordered {
        if event.kind == EventKind::HookedUp {
            open.entry(event.uid.clone()).or_default().push_back(event);
        } else if event.is_resolution() {
            if let Some(queue) = open.get_mut(&event.uid) {
                queue.pop_front();
            }
        }
    }

    let mut active: Vec<Event> = open
        .into_values()
        .flatten()
        .cloned()
        .collect();
    active.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    active
}

/// Demo-mode variant: hooks and resolutions carry a shared `hookup_id`, so
/// pairing is explicit instead of FIFO. A HookedUp event stays active until
/// a resolution with the same correlation id appears.
pub fn active_hooks_by_correlation(events: &[Event]) -> Vec<Event> {
    let resolved: HashSet<&str> = events
        .iter()
        .filter(|e| e.is_resolution())
        .filter_map(|e| e.hookup_id.as_deref())
        .collect();

    let mut active: Vec<Event> = events
        .iter()
        .filter(|e| e.kind == EventKind::HookedUp)
        .filter(|e| match e.hookup_id.as_deref() {
            Some(id) => !resolved.contains(id),
            None => true,
        })
        .cloned()
        .collect();
    active.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    active
}
