use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// Build a path-style probe URL: `<base>/page/<n>/`
pub fn build_path_probe(base: &str, page: usize) -> String {
    format!("{}/page/{}/", base.trim_end_matches('/'), page)
}

/// Build a query-style probe URL: `<base>?page=<n>` (or `&page=<n>`)
pub fn build_query_probe(base: &str, page: usize) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{}{}page={}", base, separator, page)
}

/// Extract a numeric page indicator from a pagination URL's path or query.
/// URLs without one sort as page 1.
pub fn page_indicator(url: &str) -> usize {
    path_page(url).or_else(|| query_page(url)).unwrap_or(1)
}

fn path_page(url: &str) -> Option<usize> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"/page/(\d+)/?$").unwrap());
    re.captures(url)?.get(1)?.as_str().parse().ok()
}

fn query_page(url: &str) -> Option<usize> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"[?&](?:page|paged|p)=(\d+)").unwrap());
    re.captures(url)?.get(1)?.as_str().parse().ok()
}

/// Whether two URLs share scheme, host, and their first two path segments.
/// Keeps the discoverer from following off-site pager links.
pub fn same_path_root(a: &str, b: &str) -> bool {
    match (Url::parse(a), Url::parse(b)) {
        (Ok(a), Ok(b)) => {
            a.scheme() == b.scheme()
                && a.host_str() == b.host_str()
                && leading_segments(&a) == leading_segments(&b)
        }
        // Unparseable URLs are tolerated rather than dropped.
        _ => true,
    }
}

fn leading_segments(url: &Url) -> Vec<String> {
    url.path_segments()
        .map(|segments| segments.take(2).map(str::to_string).collect())
        .unwrap_or_default()
}

/// Resolve a possibly relative href against a base URL.
pub fn resolve(base: &str, href: &str) -> Option<String> {
    let base = Url::parse(base).ok()?;
    base.join(href.trim()).ok().map(|u| u.to_string())
}
