use std::cmp::Ordering;
use std::collections::HashMap;

use crate::domain::LeaderboardRow;

/// Re-rank rows per category with tie-aware positions.
///
/// Within a category, rows sort by descending numeric points with the
/// display name as a stable tie-break. Every row sharing a point value
/// carries the rank of the first row attaining it, so [100, 100, 80]
/// ranks as [1, 1, 3]. Category order follows first appearance.
pub fn apply_tie_ranks(rows: Vec<LeaderboardRow>) -> Vec<LeaderboardRow> {
    let mut category_order = Vec::new();
    let mut by_category: HashMap<String, Vec<LeaderboardRow>> = HashMap::new();

    for row in rows {
        if !by_category.contains_key(&row.category) {
            category_order.push(row.category.clone());
        }
        by_category.entry(row.category.clone()).or_default().push(row);
    }

    let mut ranked = Vec::new();
    for category in category_order {
        if let Some(group) = by_category.remove(&category) {
            ranked.extend(rank_category(group));
        }
    }
    ranked
}

fn rank_category(mut rows: Vec<LeaderboardRow>) -> Vec<LeaderboardRow> {
    rows.sort_by(compare_rows);

    let mut last_points: Option<f64> = None;
    let mut position = 0;

    for (index, row) in rows.iter_mut().enumerate() {
        if last_points != Some(row.points_num) {
            position = index as u32 + 1;
            last_points = Some(row.points_num);
        }
        row.rank = position;
    }

    rows
}

fn compare_rows(a: &LeaderboardRow, b: &LeaderboardRow) -> Ordering {
    b.points_num
        .partial_cmp(&a.points_num)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.display_name().cmp(b.display_name()))
}
