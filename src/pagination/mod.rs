pub mod discover;
pub mod tally;
pub mod urls;

pub use discover::{discover, MAX_EXPLICIT_PAGES, MAX_PROBE_PAGES};
pub use tally::EmptyPageTally;
