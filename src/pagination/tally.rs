/// Tracks consecutive pages that produced no new events.
///
/// Policy: the counter covers the first page too. A first page with zero
/// events starts the count at 1; every later empty (or unfetchable) page
/// increments it; any productive page resets it. Iteration stops once two
/// consecutive pages in a row came up empty, so spurious probe URLs cannot
/// stall a refresh.
pub struct EmptyPageTally {
    consecutive: usize,
    threshold: usize,
}

pub const DEFAULT_EMPTY_THRESHOLD: usize = 2;

impl EmptyPageTally {
    pub fn new() -> Self {
        Self {
            consecutive: 0,
            threshold: DEFAULT_EMPTY_THRESHOLD,
        }
    }

    /// Record a page result. Returns true when scraping should stop.
    pub fn record(&mut self, events_found: usize) -> bool {
        if events_found == 0 {
            self.consecutive += 1;
        } else {
            self.consecutive = 0;
        }
        self.should_stop()
    }

    pub fn should_stop(&self) -> bool {
        self.consecutive >= self.threshold
    }
}

impl Default for EmptyPageTally {
    fn default() -> Self {
        Self::new()
    }
}
