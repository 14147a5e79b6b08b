pub mod parser;
pub mod rank;
pub mod split;

pub use rank::apply_tie_ranks;

use scraper::Html;

use crate::domain::LeaderboardRow;

/// Parse a standings page and return its rows with tie-aware ranks applied
/// per category.
pub fn build_leaderboard(page: &Html) -> Vec<LeaderboardRow> {
    apply_tie_ranks(parser::parse_rows(page))
}
