use std::collections::HashSet;

use common::{ConfluenceFactor, Direction, FeedbackRecord, FeedbackResult};

/// Minimum confluence-set overlap for a past loss to count against a new
/// signal.
pub const MATCH_THRESHOLD: f64 = 0.70;

/// How many of an asset's most recent records feed the win/loss balance
/// adjustment.
pub const RECENT_WINDOW: usize = 20;

/// Ratio of shared confluence factors between two sets.
///
/// The denominator is the larger set, not the union. Deliberate: the
/// accumulated feedback history was scored against this ratio, and a
/// symmetric Jaccard index would change which losses match.
/// Empty input on either side never matches.
pub fn overlap_ratio(a: &[ConfluenceFactor], b: &[ConfluenceFactor]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let a_set: HashSet<ConfluenceFactor> = a.iter().copied().collect();
    let b_set: HashSet<ConfluenceFactor> = b.iter().copied().collect();
    let shared = a_set.intersection(&b_set).count();
    shared as f64 / a_set.len().max(b_set.len()) as f64
}

/// Ordered, append-only collection of outcome records. The scanner and
/// analyzer only read and append; records are never rewritten.
#[derive(Debug, Clone, Default)]
pub struct FeedbackHistory {
    records: Vec<FeedbackRecord>,
}

impl FeedbackHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<FeedbackRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[FeedbackRecord] {
        &self.records
    }

    pub fn append(&mut self, record: FeedbackRecord) {
        self.records.push(record);
    }

    pub fn wins(&self) -> usize {
        self.records.iter().filter(|r| r.result == FeedbackResult::Win).count()
    }

    pub fn losses(&self) -> usize {
        self.records.iter().filter(|r| r.result == FeedbackResult::Loss).count()
    }

    /// Prior losses on `asset` in the same `direction` whose recorded
    /// confluence set overlaps the current one by at least 70%. Records
    /// without a context snapshot never match.
    pub fn matching_losses(
        &self,
        asset: &str,
        direction: Direction,
        confluences: &[ConfluenceFactor],
    ) -> usize {
        self.records
            .iter()
            .filter(|r| {
                r.asset == asset
                    && r.direction == direction
                    && r.result == FeedbackResult::Loss
            })
            .filter(|r| {
                r.context
                    .as_ref()
                    .map(|ctx| overlap_ratio(&ctx.confluences, confluences) >= MATCH_THRESHOLD)
                    .unwrap_or(false)
            })
            .count()
    }

    /// Win/loss balance over the asset's most recent 20 records, any
    /// direction: excess losses cost 2 points each, excess wins recover 1
    /// point each, a tie contributes nothing.
    pub fn recent_balance_adjustment(&self, asset: &str) -> f64 {
        let recent: Vec<&FeedbackRecord> =
            self.records.iter().filter(|r| r.asset == asset).collect();
        let start = recent.len().saturating_sub(RECENT_WINDOW);
        let window = &recent[start..];

        let wins = window.iter().filter(|r| r.result == FeedbackResult::Win).count();
        let losses = window.iter().filter(|r| r.result == FeedbackResult::Loss).count();

        if losses > wins {
            -2.0 * (losses - wins) as f64
        } else if wins > losses {
            (wins - losses) as f64
        } else {
            0.0
        }
    }
}
