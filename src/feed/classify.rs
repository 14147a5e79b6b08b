use crate::domain::EventKind;

/// Ordered classification table. The first matching substring wins, so the
/// priority between overlapping phrases is explicit and testable rather
/// than buried in branch order.
const CLASSIFIERS: &[(&str, EventKind)] = &[
    ("released", EventKind::Released),
    ("boated", EventKind::Boated),
    ("pulled hook", EventKind::PulledHook),
    ("wrong species", EventKind::WrongSpecies),
    ("hooked up", EventKind::HookedUp),
];

/// Classify an event from its free-text detail string.
pub fn classify(details: &str) -> EventKind {
    let lowered = details.to_lowercase();
    CLASSIFIERS
        .iter()
        .find(|(needle, _)| lowered.contains(needle))
        .map(|(_, kind)| *kind)
        .unwrap_or(EventKind::Other)
}
