use regex::Regex;
use std::sync::OnceLock;

/// Hull builders recognized when deciding whether a name-block suffix is a
/// boat description rather than angler text.
const KNOWN_BUILDERS: &[&str] = &[
    "viking",
    "jarrett",
    "jarrett bay",
    "bayliss",
    "hatteras",
    "post",
    "ocean",
    "bertram",
    "carolina",
    "spencer",
    "garlington",
    "rampage",
    "custom",
    "contender",
    "freeman",
    "maverick",
];

const MAX_SHORT_TYPE_LEN: usize = 40;

pub fn contains_builder(text: &str) -> bool {
    let lowered = text.to_lowercase();
    KNOWN_BUILDERS.iter().any(|b| lowered.contains(b))
}

pub fn contains_length(text: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\b\d{2,3}\s*(?:ft|feet|')").unwrap());
    re.is_match(&text.to_lowercase())
}

/// Split a leaderboard name block into boat name and optional type string.
///
/// The trailing fragment becomes the type when it carries a length
/// measurement, a known builder keyword, or is simply short. Failing that,
/// a dash-delimited name like "Boat – 68' Jarrett Bay" is split in place.
pub fn split_boat_and_type(name: &str, trailing: &str) -> (String, Option<String>) {
    let name = name.trim();
    let trailing = squeeze_whitespace(trailing);

    if trailing.is_empty() {
        return (name.to_string(), None);
    }

    if contains_length(&trailing) || contains_builder(&trailing) || trailing.len() <= MAX_SHORT_TYPE_LEN
    {
        return (name.to_string(), Some(trailing));
    }

    if let Some((boat, kind)) = split_on_dash(name) {
        return (boat, Some(format!("{kind} {trailing}")));
    }

    (name.to_string(), None)
}

fn split_on_dash(name: &str) -> Option<(String, String)> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"(.*?)[\-–—]\s*(.*)$").unwrap());
    let captures = re.captures(name)?;
    let boat = captures.get(1)?.as_str().trim().to_string();
    let kind = captures.get(2)?.as_str().trim().to_string();
    if boat.is_empty() || kind.is_empty() {
        return None;
    }
    Some((boat, kind))
}

fn squeeze_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract the numeric points value: the first decimal/integer run in the
/// raw text, commas stripped. Unparseable text yields zero.
pub fn parse_points_number(points_text: &str) -> f64 {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"[\d.,]+").unwrap());

    re.find(points_text)
        .and_then(|m| m.as_str().replace(',', "").parse().ok())
        .unwrap_or(0.0)
}
