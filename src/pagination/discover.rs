use scraper::{Html, Selector};

use super::urls;

/// Hard cap when explicit pager links are present.
pub const MAX_EXPLICIT_PAGES: usize = 8;
/// Hard cap when falling back to probe URLs.
pub const MAX_PROBE_PAGES: usize = 5;

const PAGER_SELECTORS: &[&str] = &[
    "ul.pagination a",
    "nav.pagination a",
    ".pagination a",
    "a.page-numbers",
    "ul.page-numbers a",
    "a[rel='next']",
    "a[rel='prev']",
];

/// Enumerate the ordered list of feed page URLs, starting with the feed URL
/// itself. Prefers explicit pager links found on the first page; otherwise
/// generates a bounded set of probe URLs. Both branches are capped so a
/// refresh makes a bounded number of round-trips.
pub fn discover(feed_url: &str, first_page: &Html) -> Vec<String> {
    let explicit = collect_pager_links(feed_url, first_page);

    if !explicit.is_empty() {
        return order_explicit(feed_url, explicit);
    }

    build_probes(feed_url)
}

fn collect_pager_links(feed_url: &str, page: &Html) -> Vec<String> {
    let mut links = Vec::new();

    for pattern in PAGER_SELECTORS {
        let Ok(selector) = Selector::parse(pattern) else {
            continue;
        };
        for anchor in page.select(&selector) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let Some(resolved) = urls::resolve(feed_url, href) else {
                continue;
            };
            if resolved != feed_url && urls::same_path_root(feed_url, &resolved) {
                links.push(resolved);
            }
        }
    }

    dedup_preserving_order(links)
}

fn order_explicit(feed_url: &str, mut links: Vec<String>) -> Vec<String> {
    links.sort_by_key(|u| urls::page_indicator(u));

    let mut ordered = vec![feed_url.to_string()];
    ordered.extend(links);
    ordered.truncate(MAX_EXPLICIT_PAGES);
    ordered
}

/// Path and query candidates are interleaved per page number so both probe
/// styles get tried before the budget runs out.
fn build_probes(feed_url: &str) -> Vec<String> {
    let mut probes = vec![feed_url.to_string()];

    for page in 2..=MAX_PROBE_PAGES {
        probes.push(urls::build_path_probe(feed_url, page));
        probes.push(urls::build_query_probe(feed_url, page));
    }

    let mut probes = dedup_preserving_order(probes);
    probes.truncate(MAX_PROBE_PAGES);
    probes
}

fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items.into_iter().filter(|u| seen.insert(u.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED_URL: &str = "https://tournament.example.com/live/events/";

    #[test]
    fn test_explicit_links_sorted_by_page_number() {
        let html = Html::parse_document(
            r#"
            <ul class="pagination">
                <a href="/live/events/page/3/">3</a>
                <a href="/live/events/page/2/">2</a>
                <a href="/live/events/page/4/">4</a>
            </ul>
            "#,
        );

        let pages = discover(FEED_URL, &html);
        assert_eq!(
            pages,
            vec![
                FEED_URL.to_string(),
                "https://tournament.example.com/live/events/page/2/".to_string(),
                "https://tournament.example.com/live/events/page/3/".to_string(),
                "https://tournament.example.com/live/events/page/4/".to_string(),
            ]
        );
    }

    #[test]
    fn test_offsite_links_are_dropped() {
        let html = Html::parse_document(
            r#"
            <nav class="pagination">
                <a href="https://elsewhere.example.org/page/2/">2</a>
                <a href="/live/events/page/2/">2</a>
            </nav>
            "#,
        );

        let pages = discover(FEED_URL, &html);
        assert_eq!(pages.len(), 2);
        assert!(pages.iter().all(|u| u.contains("tournament.example.com")));
    }

    #[test]
    fn test_explicit_links_capped_at_eight() {
        let anchors: String = (2..=20)
            .map(|n| format!(r#"<a class="page-numbers" href="/live/events/page/{n}/">{n}</a>"#))
            .collect();
        let html = Html::parse_document(&format!("<div>{anchors}</div>"));

        let pages = discover(FEED_URL, &html);
        assert_eq!(pages.len(), MAX_EXPLICIT_PAGES);
        assert_eq!(pages[0], FEED_URL);
    }

    #[test]
    fn test_probe_fallback_capped_at_five() {
        let html = Html::parse_document("<article>no pager here</article>");

        let pages = discover(FEED_URL, &html);
        assert_eq!(pages.len(), MAX_PROBE_PAGES);
        assert_eq!(pages[0], FEED_URL);
        assert_eq!(
            pages[1],
            "https://tournament.example.com/live/events/page/2/"
        );
    }

    #[test]
    fn test_probe_fallback_tries_both_url_styles() {
        let html = Html::parse_document("<article>no pager here</article>");

        let pages = discover(FEED_URL, &html);
        assert!(pages.iter().any(|u| u.contains("/page/")));
        assert!(pages.iter().any(|u| u.contains("?page=")));
        // Interleaved per page number: path probe first, query probe next.
        assert_eq!(
            pages[2],
            "https://tournament.example.com/live/events/?page=2"
        );
    }
}
