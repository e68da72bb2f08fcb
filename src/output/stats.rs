//! Statistics gathered while a crawl runs
//!
//! The coordinator records every terminal visit outcome here; the totals are
//! printed at the end of a run.

use crate::crawler::VisitOutcome;
use crate::state::VisitState;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Failure kind recorded for visit tasks that panicked or were cancelled
pub const ABORTED_KIND: &str = "aborted";

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// When the crawl started
    pub started_at: DateTime<Utc>,

    /// When the crawl finished, once it has
    pub finished_at: Option<DateTime<Utc>>,

    /// Count of visits by terminal state
    pub visits_by_state: HashMap<VisitState, u64>,

    /// Failed visits by failure kind
    pub failures_by_kind: HashMap<&'static str, u64>,

    /// Total outgoing links found on completed pages, duplicates included
    pub links_discovered: u64,
}

impl CrawlStatistics {
    /// Starts an empty tally stamped with the current time
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            visits_by_state: HashMap::new(),
            failures_by_kind: HashMap::new(),
            links_discovered: 0,
        }
    }

    /// Records one finished visit
    pub fn record(&mut self, outcome: &VisitOutcome) {
        *self.visits_by_state.entry(outcome.state()).or_insert(0) += 1;

        match outcome {
            VisitOutcome::Failed(e) => {
                *self.failures_by_kind.entry(e.kind()).or_insert(0) += 1;
            }
            VisitOutcome::Completed { links } => {
                self.links_discovered += links.len() as u64;
            }
            VisitOutcome::Rejected | VisitOutcome::Skipped => {}
        }
    }

    /// Records a visit task that never returned an outcome
    pub fn record_aborted(&mut self) {
        *self.visits_by_state.entry(VisitState::Failed).or_insert(0) += 1;
        *self.failures_by_kind.entry(ABORTED_KIND).or_insert(0) += 1;
    }

    /// Stamps the finish time
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Visits that ended in `state`
    pub fn count(&self, state: VisitState) -> u64 {
        self.visits_by_state.get(&state).copied().unwrap_or(0)
    }

    /// Failed visits of the given kind
    pub fn failures(&self, kind: &str) -> u64 {
        self.failures_by_kind.get(kind).copied().unwrap_or(0)
    }

    /// Every visit recorded, whatever its outcome
    pub fn total_visits(&self) -> u64 {
        self.visits_by_state.values().sum()
    }

    /// Whole seconds between start and finish
    pub fn duration_seconds(&self) -> Option<u64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds().max(0) as u64)
    }

    /// Percentage of claimed pages that completed
    ///
    /// Claimed pages are those that either completed or failed; rejected and
    /// skipped visits never reached a fetch.
    pub fn success_rate(&self) -> f64 {
        let completed = self.count(VisitState::Completed);
        let claimed = completed + self.count(VisitState::Failed);
        if claimed == 0 {
            0.0
        } else {
            (completed as f64 / claimed as f64) * 100.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Started: {}", stats.started_at.to_rfc3339());
    if let Some(finished) = stats.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    if let Some(seconds) = stats.duration_seconds() {
        println!("  Duration: {}s", seconds);
    }
    println!("  Total visits: {}", stats.total_visits());
    println!("  Total links found: {}", stats.links_discovered);
    println!();

    println!("Visits by State:");
    let total = stats.total_visits();
    for state in VisitState::terminal_states() {
        let count = stats.count(state);
        let percentage = if total > 0 {
            (count as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", state, count, percentage);
    }
    println!();

    if !stats.failures_by_kind.is_empty() {
        println!("Failure Summary:");
        let mut failure_counts: Vec<_> = stats.failures_by_kind.iter().collect();
        failure_counts.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));

        for (kind, count) in failure_counts {
            println!("  {}: {}", kind, count);
        }
        println!();
    }

    let completed = stats.count(VisitState::Completed);
    let claimed = completed + stats.count(VisitState::Failed);
    println!(
        "Success Rate: {:.1}% ({} / {} claimed pages completed)",
        stats.success_rate(),
        completed,
        claimed
    );
}
