use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

use crate::domain::Boat;
use crate::identity::normalize;
use crate::pagination::urls::resolve;

const ARTICLE_SELECTOR: &str = "article.post.format-image, article";
const NAME_SELECTOR: &str = "h2.post-title, h2, h3";
const TYPE_SELECTOR: &str = "ul.post-meta li";
const IMAGE_SELECTOR: &str = "img";

/// Lazy-loading galleries stash the real source in data attributes.
const IMAGE_SRC_ATTRS: &[&str] = &["src", "data-src", "data-lazy-src", "data-original", "data-image"];

/// A roster boat together with its image source, when the page offers one.
#[derive(Debug, Clone)]
pub struct RosterEntry {
    pub boat: Boat,
    pub image_url: Option<String>,
}

/// Parse a participants page into roster entries.
///
/// Duplicate display names (case-insensitive) keep the first occurrence, and
/// comma-carrying names are dropped as crew listings rather than boats.
/// Image hrefs are resolved against the page URL.
pub fn parse_roster(page: &Html, page_url: &str) -> Vec<RosterEntry> {
    let article_selector = Selector::parse(ARTICLE_SELECTOR).unwrap();
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for article in page.select(&article_selector) {
        let Some(name) = boat_name(article) else {
            continue;
        };
        if name.contains(',') || !seen.insert(name.to_lowercase()) {
            continue;
        }

        let uid = normalize(&name);
        entries.push(RosterEntry {
            boat: Boat {
                image_path: format!("/boat-image/{uid}"),
                uid,
                boat: name,
                boat_type: boat_type(article),
            },
            image_url: image_source(article).and_then(|src| resolve(page_url, &src)),
        });
    }

    entries
}

fn boat_name(article: ElementRef) -> Option<String> {
    let selector = Selector::parse(NAME_SELECTOR).unwrap();
    let name = element_text(article.select(&selector).next()?);
    if name.is_empty() { None } else { Some(name) }
}

fn boat_type(article: ElementRef) -> String {
    let selector = Selector::parse(TYPE_SELECTOR).unwrap();
    article
        .select(&selector)
        .next()
        .map(element_text)
        .unwrap_or_default()
}

fn image_source(article: ElementRef) -> Option<String> {
    let selector = Selector::parse(IMAGE_SELECTOR).unwrap();
    let img = article.select(&selector).next()?;

    IMAGE_SRC_ATTRS
        .iter()
        .filter_map(|attr| img.value().attr(attr))
        .map(str::trim)
        .find(|val| !val.is_empty())
        .map(str::to_string)
}

fn element_text(element: ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROSTER_PAGE: &str = r#"
        <html><body>
            <article class="post format-image">
                <h2 class="post-title">Reel Tight</h2>
                <ul class="post-meta"><li>68' Bayliss</li></ul>
                <img data-lazy-src="/uploads/reel-tight.jpg" src="">
            </article>
            <article class="post format-image">
                <h2 class="post-title">Wave Dancer</h2>
                <img src="https://cdn.example.com/wave-dancer.jpg">
            </article>
            <article class="post format-image">
                <h2 class="post-title">reel tight</h2>
            </article>
            <article class="post format-image">
                <h2 class="post-title">Smith, Jones &amp; Crew</h2>
            </article>
            <article class="post format-image">
                <p>No headline here</p>
            </article>
        </body></html>
    "#;

    #[test]
    fn test_parses_boats_with_types_and_images() {
        let page = Html::parse_document(ROSTER_PAGE);
        let entries = parse_roster(&page, "https://tournament.example.com/participants/");

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].boat.uid, "reel_tight");
        assert_eq!(entries[0].boat.boat_type, "68' Bayliss");
        assert_eq!(entries[0].boat.image_path, "/boat-image/reel_tight");
        assert_eq!(
            entries[0].image_url.as_deref(),
            Some("https://tournament.example.com/uploads/reel-tight.jpg")
        );
    }

    #[test]
    fn test_lazy_src_attributes_preferred_over_empty_src() {
        let page = Html::parse_document(ROSTER_PAGE);
        let entries = parse_roster(&page, "https://tournament.example.com/participants/");
        assert!(entries[0].image_url.as_deref().unwrap().ends_with("reel-tight.jpg"));
    }

    #[test]
    fn test_duplicates_and_crew_listings_skipped() {
        let page = Html::parse_document(ROSTER_PAGE);
        let entries = parse_roster(&page, "https://tournament.example.com/participants/");

        let names: Vec<&str> = entries.iter().map(|e| e.boat.boat.as_str()).collect();
        assert_eq!(names, vec!["Reel Tight", "Wave Dancer"]);
    }

    #[test]
    fn test_absolute_image_url_kept() {
        let page = Html::parse_document(ROSTER_PAGE);
        let entries = parse_roster(&page, "https://tournament.example.com/participants/");
        assert_eq!(
            entries[1].image_url.as_deref(),
            Some("https://cdn.example.com/wave-dancer.jpg")
        );
    }
}
