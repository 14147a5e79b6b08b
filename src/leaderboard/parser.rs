use log::warn;
use scraper::{ElementRef, Html, Selector};

use super::split::{contains_builder, parse_points_number, split_boat_and_type};
use crate::domain::LeaderboardRow;
use crate::identity::normalize;

const CATEGORY_SELECTOR: &str = "ul.dropdown-menu li a.leaderboard-nav, a[data-toggle='tab']";
const ANCHOR_SELECTOR: &str = "a";
const TABLE_SELECTOR: &str = "table";
const ROW_SELECTOR: &str = "tr.montserrat, tr";
const CELL_SELECTOR: &str = "td";
const NAME_SELECTOR: &str = "h4, strong, b";

/// Parse every standings row on a leaderboard page, unranked. Categories
/// come from tab labels; a page without tabs falls back to its first table
/// under an "Overall" label.
pub fn parse_rows(page: &Html) -> Vec<LeaderboardRow> {
    let categories = detect_categories(page);
    let mut rows = Vec::new();

    if categories.is_empty() {
        warn!("No leaderboard categories found; attempting single-table parse");
        if let Some(table) = select_first(page, TABLE_SELECTOR) {
            collect_rows(table, "Overall", &mut rows);
        }
        return rows;
    }

    for category in &categories {
        match category_container(page, category) {
            Some(container) => collect_rows(container, category, &mut rows),
            None => warn!("No tab container found for category '{}'", category),
        }
    }

    rows
}

fn detect_categories(page: &Html) -> Vec<String> {
    let selector = Selector::parse(CATEGORY_SELECTOR).unwrap();
    let mut seen = std::collections::HashSet::new();

    page.select(&selector)
        .map(element_text)
        .filter(|label| !label.is_empty())
        .filter(|label| seen.insert(label.clone()))
        .collect()
}

/// Resolve a category's tab container through its anchor's fragment href.
fn category_container<'a>(page: &'a Html, category: &str) -> Option<ElementRef<'a>> {
    let anchors = Selector::parse(ANCHOR_SELECTOR).unwrap();
    let href = page
        .select(&anchors)
        .find(|a| element_text(*a) == category)
        .and_then(|a| a.value().attr("href"))?;

    if !href.starts_with('#') {
        return None;
    }
    let selector = Selector::parse(href).ok()?;
    page.select(&selector).next()
}

fn select_first<'a>(page: &'a Html, pattern: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(pattern).unwrap();
    page.select(&selector).next()
}

fn collect_rows(container: ElementRef, category: &str, out: &mut Vec<LeaderboardRow>) {
    let row_selector = Selector::parse(ROW_SELECTOR).unwrap();
    let cell_selector = Selector::parse(CELL_SELECTOR).unwrap();

    for row in container.select(&row_selector) {
        let cells: Vec<ElementRef> = row.select(&cell_selector).collect();
        if cells.len() < 2 {
            continue;
        }

        let rank_raw = element_text(cells[0]);
        let points = element_text(cells[cells.len() - 1]);
        out.push(build_row(category, &rank_raw, cells[1], points));
    }
}

fn build_row(
    category: &str,
    rank_raw: &str,
    name_block: ElementRef,
    points: String,
) -> LeaderboardRow {
    let name = headline_name(name_block);
    let text_after = element_text(name_block).replace(&name, "").trim().to_string();

    let (angler, boat, boat_type) = if is_angler_row(&points, &text_after) {
        (Some(name), None, None)
    } else {
        let (boat, boat_type) = split_boat_and_type(&name, &text_after);
        (None, Some(boat), boat_type)
    };

    let fallback = format!("rank_{rank_raw}");
    let uid = normalize(
        boat.as_deref()
            .or(angler.as_deref())
            .unwrap_or(&fallback),
    );

    LeaderboardRow {
        rank: 0,
        category: category.to_string(),
        angler,
        boat,
        boat_type,
        points_num: parse_points_number(&points),
        points,
        image_path: format!("/boat-image/{uid}"),
        uid,
    }
}

fn headline_name(name_block: ElementRef) -> String {
    let selector = Selector::parse(NAME_SELECTOR).unwrap();
    name_block
        .select(&selector)
        .next()
        .map(element_text)
        .unwrap_or_else(|| element_text(name_block))
}

/// A weight-valued points cell with no builder keyword in the suffix marks
/// an angler category row.
fn is_angler_row(points: &str, text_after: &str) -> bool {
    points.to_lowercase().contains("lb") && !contains_builder(text_after)
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

    const LEADERBOARD_PAGE: &str = r##"
        <html><body>
            <ul class="dropdown-menu">
                <li><a class="leaderboard-nav" href="#billfish">Billfish Release</a></li>
                <li><a class="leaderboard-nav" href="#heaviest">Heaviest Tuna</a></li>
            </ul>
            <div id="billfish">
                <table>
                    <tr class="montserrat">
                        <td>1</td>
                        <td><h4>Reel Tight</h4> 68' Bayliss</td>
                        <td>400 pts</td>
                    </tr>
                    <tr class="montserrat">
                        <td>2</td>
                        <td><h4>Wave Dancer</h4></td>
                        <td>400 pts</td>
                    </tr>
                    <tr class="montserrat">
                        <td>3</td>
                        <td><h4>Sea Quest</h4></td>
                        <td>250 pts</td>
                    </tr>
                </table>
            </div>
            <div id="heaviest">
                <table>
                    <tr class="montserrat">
                        <td>1</td>
                        <td><h4>Jane Angler</h4></td>
                        <td>52.5 lb</td>
                    </tr>
                </table>
            </div>
        </body></html>
    "##;

    #[test]
    fn test_parses_categories_from_tabs() {
        let page = Html::parse_document(LEADERBOARD_PAGE);
        let rows = parse_rows(&page);

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].category, "Billfish Release");
        assert_eq!(rows[3].category, "Heaviest Tuna");
    }

    #[test]
    fn test_boat_rows_split_type() {
        let page = Html::parse_document(LEADERBOARD_PAGE);
        let rows = parse_rows(&page);

        assert_eq!(rows[0].boat.as_deref(), Some("Reel Tight"));
        assert_eq!(rows[0].boat_type.as_deref(), Some("68' Bayliss"));
        assert_eq!(rows[0].points_num, 400.0);
        assert_eq!(rows[0].uid, "reel_tight");
    }

    #[test]
    fn test_weight_rows_without_builder_are_angler_only() {
        let page = Html::parse_document(LEADERBOARD_PAGE);
        let rows = parse_rows(&page);

        let angler_row = &rows[3];
        assert_eq!(angler_row.angler.as_deref(), Some("Jane Angler"));
        assert!(angler_row.boat.is_none());
        assert_eq!(angler_row.points_num, 52.5);
    }

    #[test]
    fn test_untabbed_page_falls_back_to_single_table() {
        let page = Html::parse_document(
            r#"
            <table>
                <tr><td>1</td><td><strong>Lone Boat</strong></td><td>100</td></tr>
            </table>
            "#,
        );
        let rows = parse_rows(&page);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, "Overall");
        assert_eq!(rows[0].boat.as_deref(), Some("Lone Boat"));
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let page = Html::parse_document(
            r#"
            <table>
                <tr><td>header only</td></tr>
                <tr><td>1</td><td><strong>Valid Boat</strong></td><td>10</td></tr>
            </table>
            "#,
        );
        assert_eq!(parse_rows(&page).len(), 1);
    }
}
