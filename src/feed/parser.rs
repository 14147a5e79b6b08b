use chrono::{Datelike, NaiveDateTime};
use log::debug;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;

use super::classify::classify;
use crate::domain::{Boat, Event};
use crate::identity::normalize;

const ARTICLE_SELECTOR: &str =
    "article.m-b-20, article.entry, div.activity, li.event, div.feed-item";
const TIME_SELECTOR: &str = "p.pull-right, time, .time";
const NAME_SELECTOR: &str = "h4.montserrat, h4, h3";
const DETAIL_SELECTOR: &str = "p > strong, strong, .desc, .details";

/// Parse all events out of one feed page.
///
/// Rows missing a timestamp, boat name, or detail string are skipped; a page
/// contributes zero or more events and never aborts. Boat names are resolved
/// through the roster so events carry the canonical display name.
pub fn parse_events(page: &Html, roster: &HashMap<String, Boat>, year: i32) -> Vec<Event> {
    let article_selector = Selector::parse(ARTICLE_SELECTOR).unwrap();

    page.select(&article_selector)
        .filter_map(|article| parse_row(article, roster, year))
        .collect()
}

fn parse_row(article: ElementRef, roster: &HashMap<String, Boat>, year: i32) -> Option<Event> {
    let raw_time = select_text(article, TIME_SELECTOR)?;
    let raw_name = select_text(article, NAME_SELECTOR)?;
    let details = select_text(article, DETAIL_SELECTOR)?;

    let timestamp = match parse_feed_timestamp(&raw_time, year) {
        Some(ts) => ts,
        None => {
            debug!("Skipping feed row with unparseable time: {}", raw_time);
            return None;
        }
    };

    let uid = normalize(&raw_name);
    let boat = roster
        .get(&uid)
        .map(|entry| entry.boat.clone())
        .unwrap_or(raw_name);

    Some(Event {
        timestamp,
        kind: classify(&details),
        boat,
        uid,
        details,
        hookup_id: None,
    })
}

fn select_text(article: ElementRef, pattern: &str) -> Option<String> {
    let selector = Selector::parse(pattern).unwrap();
    let element = article.select(&selector).next()?;
    let text = element.text().collect::<String>().trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

const TIMESTAMP_FORMATS: &[&str] = &[
    "%b %d %I:%M %p %Y",
    "%B %d %I:%M %p %Y",
    "%b %d, %I:%M %p %Y",
    "%m/%d %I:%M %p %Y",
    "%b %d %H:%M %Y",
];

/// Parse a feed timestamp, coercing to the given year. The source feed
/// omits the year from its timestamps, so the caller supplies the current
/// tournament year.
pub fn parse_feed_timestamp(raw: &str, year: i32) -> Option<NaiveDateTime> {
    let cleaned = raw
        .replace('@', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if let Ok(ts) = NaiveDateTime::parse_from_str(&cleaned, "%Y-%m-%dT%H:%M:%S") {
        return coerce_year(ts, year);
    }

    let with_year = format!("{cleaned} {year}");
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&with_year, fmt).ok())
}

fn coerce_year(ts: NaiveDateTime, year: i32) -> Option<NaiveDateTime> {
    ts.date().with_year(year).map(|date| date.and_time(ts.time()))
}
